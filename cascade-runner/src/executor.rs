//! Stage execution
//!
//! Runs pipeline stages as external commands. Each stage process inherits the
//! run parameters plus its own environment variables and is killed when its
//! timeout elapses. Infrastructure failures (a command that cannot be
//! spawned) are reported as stage failures rather than errors so the driver
//! records them on the job like any other failed stage.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::Config;
use crate::definition::StageDefinition;

/// Outcome of executing a single stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Success,
    Failure { error: String },
    Timeout,
}

impl StageOutcome {
    /// True when the stage exited successfully
    pub fn is_success(&self) -> bool {
        matches!(self, StageOutcome::Success)
    }

    /// The message recorded on the job's status log for this outcome
    pub fn message(&self, stage_name: &str) -> String {
        match self {
            StageOutcome::Success => format!("Stage '{}' completed", stage_name),
            StageOutcome::Failure { error } => {
                format!("Stage '{}' failed: {}", stage_name, error)
            }
            StageOutcome::Timeout => format!("Stage '{}' timed out", stage_name),
        }
    }
}

/// Service trait for executing pipeline stages
#[async_trait]
pub trait StageExecutor: Send + Sync {
    /// Executes a single stage and reports its outcome
    async fn execute(&self, stage: &StageDefinition, config: &Config) -> StageOutcome;
}

/// Executes stages by spawning their commands as child processes
pub struct ProcessExecutor;

impl ProcessExecutor {
    /// Creates a new process executor
    pub fn new() -> Self {
        Self
    }

    fn build_command(&self, stage: &StageDefinition, config: &Config) -> Command {
        let mut command = Command::new(&stage.command);
        command.args(&stage.args);
        command.envs(&config.params);
        command.envs(&stage.env);
        if let Some(dir) = &stage.working_dir {
            command.current_dir(dir);
        }
        command.stdin(Stdio::null());
        command.kill_on_drop(true);
        command
    }
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StageExecutor for ProcessExecutor {
    async fn execute(&self, stage: &StageDefinition, config: &Config) -> StageOutcome {
        let limit = stage
            .timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(config.stage_timeout);

        debug!(
            "Spawning stage '{}': {} {:?} (timeout: {:?})",
            stage.name, stage.command, stage.args, limit
        );

        let mut command = self.build_command(stage, config);
        let status = match tokio::time::timeout(limit, command.status()).await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => {
                warn!("Failed to spawn stage '{}': {}", stage.name, e);
                return StageOutcome::Failure {
                    error: format!("failed to spawn '{}': {}", stage.command, e),
                };
            }
            Err(_) => {
                warn!("Stage '{}' exceeded its timeout ({:?})", stage.name, limit);
                return StageOutcome::Timeout;
            }
        };

        if status.success() {
            StageOutcome::Success
        } else {
            let error = match status.code() {
                Some(code) => format!("exit code {}", code),
                None => "terminated by signal".to_string(),
            };
            StageOutcome::Failure { error }
        }
    }
}
