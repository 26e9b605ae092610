//! Launchers: how a dispatched job becomes a running worker.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, error, info, warn};
use tt_sweep::{Job, Launcher};
use tt_types::LaunchError;

/// Logs each job instead of starting anything.
#[derive(Debug, Default, Clone)]
pub struct DryRunLauncher;

#[async_trait]
impl Launcher for DryRunLauncher {
    async fn launch(&self, job: &Job) -> Result<(), LaunchError> {
        info!(
            job_id = %job.id,
            sequence = job.sequence,
            combination = %job.combination,
            callback = %job.callback_url,
            "would run worker"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}

/// Spawns one OS process per job.
///
/// The worker receives its parameters through the environment (`ACCEL`,
/// `TAU`, `STARTUP_DELAY`, `MASTER_URL`, `TT_JOB_ID`). `launch` returns as
/// soon as the process is spawned; a detached task reaps it.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    program: String,
    args: Vec<String>,
}

impl ProcessLauncher {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Split a whitespace-separated command line into program and arguments.
    pub fn from_command_line(command: &str) -> Result<Self, LaunchError> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(LaunchError::MissingCommand)?;
        Ok(Self::new(program, parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

#[async_trait]
impl Launcher for ProcessLauncher {
    async fn launch(&self, job: &Job) -> Result<(), LaunchError> {
        let c = job.combination;
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("ACCEL", c.accel.to_string())
            .env("TAU", c.tau.to_string())
            .env("STARTUP_DELAY", c.startup_delay.to_string())
            .env("MASTER_URL", &job.callback_url)
            .env("TT_JOB_ID", job.id.to_string())
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| LaunchError::SpawnFailed {
                job_id: job.id.to_string(),
                message: e.to_string(),
            })?;

        debug!(job_id = %job.id, pid = ?child.id(), combination = %c, "worker process started");

        let job_id = job.id;
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => debug!(%job_id, "worker exited"),
                Ok(status) => warn!(%job_id, %status, "worker exited with failure"),
                Err(e) => error!(%job_id, error = %e, "failed to wait on worker"),
            }
        });

        Ok(())
    }

    fn name(&self) -> &str {
        "process"
    }
}
