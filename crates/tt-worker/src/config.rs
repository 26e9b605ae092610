use std::time::Duration;

use tt_types::{config_error, Combination, TtResult};

pub const DEFAULT_ACCEL: f64 = 2.0;
pub const DEFAULT_TAU: f64 = 1.2;
pub const DEFAULT_STARTUP_DELAY: f64 = 0.0;
pub const DEFAULT_PING_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_REPORT_TIMEOUT_SECS: u64 = 10;

/// Worker settings. Parameter names match what the process launcher exports.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerConfig {
    /// `ACCEL`, `TAU`, `STARTUP_DELAY`
    pub combination: Combination,
    /// `MASTER_URL`: the coordinator's report address.
    pub master_url: Option<String>,
    /// `TT_SIM_COMMAND`
    pub sim_command: Option<String>,
    /// `TT_PING_TIMEOUT_SECS`
    pub ping_timeout: Duration,
    /// `TT_REPORT_TIMEOUT_SECS`
    pub report_timeout: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            combination: Combination::new(DEFAULT_ACCEL, DEFAULT_TAU, DEFAULT_STARTUP_DELAY),
            master_url: None,
            sim_command: None,
            ping_timeout: Duration::from_secs(DEFAULT_PING_TIMEOUT_SECS),
            report_timeout: Duration::from_secs(DEFAULT_REPORT_TIMEOUT_SECS),
        }
    }
}

impl WorkerConfig {
    pub fn from_env() -> TtResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> TtResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let c = &mut config.combination;

        if let Some(v) = lookup("ACCEL") {
            c.accel = parse_param("ACCEL", &v)?;
        }
        if let Some(v) = lookup("TAU") {
            c.tau = parse_param("TAU", &v)?;
        }
        if let Some(v) = lookup("STARTUP_DELAY") {
            c.startup_delay = parse_param("STARTUP_DELAY", &v)?;
        }

        config.master_url = lookup("MASTER_URL").filter(|u| !u.trim().is_empty());
        config.sim_command = lookup("TT_SIM_COMMAND").filter(|c| !c.trim().is_empty());

        if let Some(v) = lookup("TT_PING_TIMEOUT_SECS") {
            config.ping_timeout = parse_secs("TT_PING_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("TT_REPORT_TIMEOUT_SECS") {
            config.report_timeout = parse_secs("TT_REPORT_TIMEOUT_SECS", &v)?;
        }

        Ok(config)
    }
}

fn parse_param(key: &str, raw: &str) -> TtResult<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|e| config_error!("invalid {key} '{raw}': {e}"))?;
    if !value.is_finite() {
        return Err(config_error!("{key} must be finite, got {raw}"));
    }
    Ok(value)
}

fn parse_secs(key: &str, raw: &str) -> TtResult<Duration> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| config_error!("invalid {key} '{raw}': {e}"))
}
