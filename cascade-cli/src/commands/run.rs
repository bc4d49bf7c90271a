//! Run command handler
//!
//! Loads a pipeline definition, drives it through the runner, and reports
//! the final state. Exits non-zero when the pipeline ends failed so shell
//! pipelines and schedulers can react.

use anyhow::{Context, Result};
use cascade_core::domain::pipeline::{PipelineState, PipelineStatus, PublishCallback};
use cascade_runner::config::Config;
use cascade_runner::definition::PipelineDefinition;
use cascade_runner::driver::PipelineDriver;
use cascade_runner::executor::ProcessExecutor;
use cascade_runner::sink::FileSink;
use colored::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::commands::status::colorize_job_state;

/// Run a pipeline definition to completion
pub async fn handle_run(
    definition_path: &Path,
    status_out: Option<PathBuf>,
    params: Vec<(String, String)>,
    continue_on_error: bool,
    timeout: Option<u64>,
) -> Result<()> {
    let definition = PipelineDefinition::from_file(definition_path).with_context(|| {
        format!(
            "failed to load pipeline definition from {}",
            definition_path.display()
        )
    })?;

    let mut config = Config::from_env();
    if let Some(secs) = timeout {
        config.stage_timeout = Duration::from_secs(secs);
    }
    if continue_on_error {
        config.continue_on_error = true;
    }
    if let Some(path) = status_out {
        config.status_path = Some(path);
    }
    for (key, value) in params {
        config = config.with_param(key, value);
    }
    config.validate()?;

    let sink: Option<Box<dyn PublishCallback>> = config
        .status_path
        .clone()
        .map(|path| Box::new(FileSink::new(path)) as Box<dyn PublishCallback>);

    let driver = PipelineDriver::new(config.clone(), Arc::new(ProcessExecutor::new()));
    let status = driver.run(&definition, sink).await?;

    print_summary(&status);

    if let Some(path) = &config.status_path {
        println!("\nStatus snapshot: {}", path.display().to_string().cyan());
    }

    if status.state == PipelineState::Failed {
        std::process::exit(1);
    }
    Ok(())
}

/// Print a run summary with per-job outcomes
fn print_summary(status: &PipelineStatus) {
    let headline = match status.state {
        PipelineState::Complete => format!("✓ Pipeline '{}' completed", status.name).green(),
        PipelineState::Failed => format!("✗ Pipeline '{}' failed", status.name).red(),
        _ => format!("Pipeline '{}' is {:?}", status.name, status.state).yellow(),
    };
    println!("\n{}", headline.bold());

    for job in &status.jobs {
        println!("  {} {} {}", "▸".cyan(), colorize_job_state(job.state), job.name);
    }
}
