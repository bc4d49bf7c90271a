//! Runner configuration
//!
//! Defines all configurable parameters for a pipeline run including the
//! default stage timeout, the failure policy, and where status snapshots are
//! published.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Runner configuration
///
/// The stage timeout is a default; individual stage definitions may override
/// it. Run params are exported into every stage's environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum time a stage may run before it is marked failed
    pub stage_timeout: Duration,

    /// Keep executing remaining stages after a stage fails
    pub continue_on_error: bool,

    /// Where to write status snapshots, if file publishing is enabled
    pub status_path: Option<PathBuf>,

    /// Run parameters exported to every stage's environment
    pub params: HashMap<String, String>,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new() -> Self {
        Self {
            stage_timeout: Duration::from_secs(300), // 5 minutes
            continue_on_error: false,
            status_path: None,
            params: HashMap::new(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - CASCADE_STAGE_TIMEOUT (optional, seconds, default: 300)
    /// - CASCADE_CONTINUE_ON_ERROR (optional, "1" or "true", default: false)
    /// - CASCADE_STATUS_PATH (optional, no default)
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let Some(timeout) = std::env::var("CASCADE_STAGE_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.stage_timeout = Duration::from_secs(timeout);
        }

        if let Ok(value) = std::env::var("CASCADE_CONTINUE_ON_ERROR") {
            config.continue_on_error = value == "1" || value.eq_ignore_ascii_case("true");
        }

        if let Ok(path) = std::env::var("CASCADE_STATUS_PATH") {
            if !path.is_empty() {
                config.status_path = Some(PathBuf::from(path));
            }
        }

        config
    }

    /// Adds a run parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.stage_timeout.as_secs() == 0 {
            anyhow::bail!("stage_timeout must be greater than 0");
        }

        if let Some(path) = &self.status_path {
            if path.as_os_str().is_empty() {
                anyhow::bail!("status_path cannot be empty");
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
