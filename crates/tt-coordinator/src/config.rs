//! Coordinator configuration, read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use tt_store::{DashMapBackend, KvResultStore, MemoryStore, ResultStore};
use tt_sweep::Launcher;
use tt_types::{config_error, TtError, TtResult};

use crate::launcher::{DryRunLauncher, ProcessLauncher};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_CALLBACK_URL: &str = "http://localhost:8000/report_result";
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";

/// Which launcher turns jobs into workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LauncherKind {
    #[default]
    DryRun,
    Process,
}

impl FromStr for LauncherKind {
    type Err = TtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dry-run" | "dryrun" => Ok(Self::DryRun),
            "process" => Ok(Self::Process),
            other => Err(config_error!("unknown launcher '{other}'")),
        }
    }
}

/// Which store backs the sweep state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    #[default]
    Memory,
    Kv,
}

impl FromStr for StoreKind {
    type Err = TtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "kv" => Ok(Self::Kv),
            other => Err(config_error!("unknown store '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorConfig {
    /// `TT_BIND_ADDR`
    pub bind_addr: SocketAddr,
    /// `TT_CALLBACK_URL`: handed to every job as its report address.
    pub callback_url: String,
    /// `TT_TEMPLATE_DIR`: directory holding `index.html`.
    pub template_dir: PathBuf,
    /// `TT_LAUNCHER`
    pub launcher: LauncherKind,
    /// `TT_WORKER_COMMAND`: required for the process launcher.
    pub worker_command: Option<String>,
    /// `TT_STORE`
    pub store: StoreKind,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 8000))),
            callback_url: DEFAULT_CALLBACK_URL.to_string(),
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            launcher: LauncherKind::default(),
            worker_command: None,
            store: StoreKind::default(),
        }
    }
}

impl CoordinatorConfig {
    pub fn from_env() -> TtResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> TtResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("TT_BIND_ADDR") {
            config.bind_addr = addr
                .parse()
                .map_err(|e| config_error!("invalid TT_BIND_ADDR '{addr}': {e}"))?;
        }
        if let Some(url) = lookup("TT_CALLBACK_URL") {
            config.callback_url = url;
        }
        if let Some(dir) = lookup("TT_TEMPLATE_DIR") {
            config.template_dir = PathBuf::from(dir);
        }
        if let Some(kind) = lookup("TT_LAUNCHER") {
            config.launcher = kind.parse()?;
        }
        config.worker_command = lookup("TT_WORKER_COMMAND").filter(|c| !c.trim().is_empty());
        if let Some(kind) = lookup("TT_STORE") {
            config.store = kind.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> TtResult<()> {
        if self.launcher == LauncherKind::Process && self.worker_command.is_none() {
            return Err(config_error!(
                "TT_WORKER_COMMAND must be set when TT_LAUNCHER=process"
            ));
        }
        Ok(())
    }

    pub fn build_store(&self) -> Arc<dyn ResultStore> {
        match self.store {
            StoreKind::Memory => Arc::new(MemoryStore::new()),
            StoreKind::Kv => Arc::new(KvResultStore::new(DashMapBackend::new())),
        }
    }

    pub fn build_launcher(&self) -> TtResult<Arc<dyn Launcher>> {
        match self.launcher {
            LauncherKind::DryRun => Ok(Arc::new(DryRunLauncher)),
            LauncherKind::Process => {
                let command = self.worker_command.as_deref().unwrap_or_default();
                Ok(Arc::new(ProcessLauncher::from_command_line(command)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = CoordinatorConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CoordinatorConfig::default());
        assert_eq!(config.bind_addr.port(), 8000);
        assert_eq!(config.launcher, LauncherKind::DryRun);
        assert_eq!(config.store, StoreKind::Memory);
    }

    #[test]
    fn reads_every_key() {
        let config = CoordinatorConfig::from_lookup(lookup(&[
            ("TT_BIND_ADDR", "127.0.0.1:9100"),
            ("TT_CALLBACK_URL", "http://master:9100/report_result"),
            ("TT_TEMPLATE_DIR", "/srv/templates"),
            ("TT_LAUNCHER", "process"),
            ("TT_WORKER_COMMAND", "tt-worker"),
            ("TT_STORE", "kv"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.port(), 9100);
        assert_eq!(config.callback_url, "http://master:9100/report_result");
        assert_eq!(config.template_dir, PathBuf::from("/srv/templates"));
        assert_eq!(config.launcher, LauncherKind::Process);
        assert_eq!(config.worker_command.as_deref(), Some("tt-worker"));
        assert_eq!(config.store, StoreKind::Kv);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        for pairs in [
            [("TT_BIND_ADDR", "not-an-addr")],
            [("TT_LAUNCHER", "docker")],
            [("TT_STORE", "redis")],
        ] {
            let err = CoordinatorConfig::from_lookup(lookup(&pairs)).unwrap_err();
            assert!(matches!(err, TtError::Config(_)), "{pairs:?} -> {err}");
        }
    }

    #[test]
    fn process_launcher_requires_command() {
        let err = CoordinatorConfig::from_lookup(lookup(&[("TT_LAUNCHER", "process")])).unwrap_err();
        assert!(err.to_string().contains("TT_WORKER_COMMAND"));
    }

    #[test]
    fn builds_configured_launcher() {
        let config = CoordinatorConfig {
            launcher: LauncherKind::Process,
            worker_command: Some("tt-worker --once".into()),
            ..Default::default()
        };
        assert_eq!(config.build_launcher().unwrap().name(), "process");
        assert_eq!(
            CoordinatorConfig::default().build_launcher().unwrap().name(),
            "dry-run"
        );
    }
}
