//! Pipeline definitions
//!
//! A definition describes a pipeline as a named, ordered sequence of stages,
//! each executed as an external command. Definitions are stored as JSON and
//! validated after parsing; the structure deliberately carries no execution
//! state, which lives in the status aggregate.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or validating a pipeline definition
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// Definition file could not be read
    #[error("failed to read definition file: {0}")]
    Io(#[from] std::io::Error),

    /// Definition is not valid JSON for the expected shape
    #[error("failed to parse definition: {0}")]
    Parse(#[from] serde_json::Error),

    /// Definition parsed but violates a structural requirement
    #[error("invalid definition: {0}")]
    Invalid(String),
}

/// A pipeline definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub stages: Vec<StageDefinition>,
}

/// One stage of a pipeline, executed as an external command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDefinition {
    pub name: String,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Extra environment variables for this stage, layered over the run params
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
    /// Overrides the runner's default stage timeout when set
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    /// Stages marked skip are recorded as SKIPPED without being executed
    #[serde(default)]
    pub skip: bool,
}

impl PipelineDefinition {
    /// Loads and validates a definition from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parses and validates a definition from a JSON string
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        let definition: Self = serde_json::from_str(json)?;
        definition.validate()?;
        Ok(definition)
    }

    /// Validates structural requirements
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.name.trim().is_empty() {
            return Err(DefinitionError::Invalid(
                "pipeline name cannot be empty".to_string(),
            ));
        }

        if self.stages.is_empty() {
            return Err(DefinitionError::Invalid(
                "pipeline must define at least one stage".to_string(),
            ));
        }

        for stage in &self.stages {
            if stage.name.trim().is_empty() {
                return Err(DefinitionError::Invalid(
                    "stage name cannot be empty".to_string(),
                ));
            }
            if stage.command.trim().is_empty() && !stage.skip {
                return Err(DefinitionError::Invalid(format!(
                    "stage '{}' has no command",
                    stage.name
                )));
            }
        }

        Ok(())
    }
}
