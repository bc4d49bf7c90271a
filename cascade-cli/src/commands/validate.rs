//! Validate command handler
//!
//! Parses and validates a pipeline definition without running it.

use anyhow::{Context, Result};
use cascade_runner::definition::PipelineDefinition;
use colored::*;
use std::path::Path;

/// Validate a pipeline definition file
pub fn handle_validate(path: &Path) -> Result<()> {
    let definition = PipelineDefinition::from_file(path)
        .with_context(|| format!("invalid pipeline definition at {}", path.display()))?;

    println!(
        "{} '{}' is a valid pipeline definition",
        "✓".green(),
        definition.name
    );
    if let Some(description) = &definition.description {
        println!("  {}", description.dimmed());
    }
    println!("  Stages: {}", definition.stages.len());
    for stage in &definition.stages {
        let marker = if stage.skip {
            "skip".yellow()
        } else {
            "run ".green()
        };
        println!("    [{}] {}", marker, stage.name);
    }

    Ok(())
}
