//! The simulation black box: parameters in, named measurements out.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};
use tt_types::{config_error, internal_error, Combination, Measurements, TtResult};

#[async_trait]
pub trait Simulator: Send + Sync {
    async fn run(&self, combination: Combination) -> TtResult<Measurements>;

    fn name(&self) -> &str;
}

/// Runs an external program with the combination exported as `ACCEL`, `TAU`
/// and `STARTUP_DELAY`, and reads a JSON object of measurements from its
/// stdout.
#[derive(Debug, Clone)]
pub struct CommandSimulator {
    program: String,
    args: Vec<String>,
}

impl CommandSimulator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_command_line(command: &str) -> TtResult<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| config_error!("simulator command is empty"))?;
        Ok(Self::new(program, parts.collect()))
    }
}

#[async_trait]
impl Simulator for CommandSimulator {
    async fn run(&self, combination: Combination) -> TtResult<Measurements> {
        info!(program = %self.program, %combination, "starting simulation");

        let output = Command::new(&self.program)
            .args(&self.args)
            .env("ACCEL", combination.accel.to_string())
            .env("TAU", combination.tau.to_string())
            .env("STARTUP_DELAY", combination.startup_delay.to_string())
            .stdin(Stdio::null())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(internal_error!(
                "simulator exited with {}: {}",
                output.status,
                stderr.trim()
            ));
        }

        let measurements: Measurements = serde_json::from_slice(&output.stdout)?;
        debug!(?measurements, "simulation finished");
        Ok(measurements)
    }

    fn name(&self) -> &str {
        "command"
    }
}
