//! Status command handler
//!
//! Decodes a published status snapshot and pretty-prints the pipeline state,
//! its message log, and every job.

use anyhow::{Context, Result};
use cascade_core::domain::job::{JobState, JobStatus};
use cascade_core::domain::pipeline::{PipelineState, PipelineStatus};
use chrono::{DateTime, Utc};
use colored::*;
use std::path::Path;

/// Pretty-print a status snapshot file
pub fn handle_status(path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read status snapshot from {}", path.display()))?;
    let status = PipelineStatus::from_json(&contents).context("failed to parse status snapshot")?;

    println!("{}", "Pipeline Status:".bold());
    println!("  Name:          {}", status.name.cyan());
    println!("  State:         {}", colorize_pipeline_state(status.state));
    println!("  Started:       {}", format_time(status.start_time));
    println!("  Completed:     {}", format_time(status.complete_time));
    println!("  Failed:        {}", format_time(status.fail_time));

    if !status.messages.is_empty() {
        println!("\n{}", "Messages:".bold());
        for message in &status.messages {
            println!(
                "  {}  {}",
                message
                    .time
                    .format("%Y-%m-%d %H:%M:%S%.3f")
                    .to_string()
                    .dimmed(),
                message.message
            );
        }
    }

    if !status.jobs.is_empty() {
        println!("\n{}", format!("Jobs ({}):", status.jobs.len()).bold());
        for job in &status.jobs {
            print_job(job);
        }
    }

    Ok(())
}

fn print_job(job: &JobStatus) {
    println!("  {} {}", "▸".cyan(), job.name);
    println!("    State:     {}", colorize_job_state(job.state));
    println!("    Started:   {}", format_time(job.start_time));
    println!("    Completed: {}", format_time(job.complete_time));
    println!("    Failed:    {}", format_time(job.fail_time));
    for message in &job.messages {
        println!(
            "    {}  {}",
            message
                .time
                .format("%Y-%m-%d %H:%M:%S%.3f")
                .to_string()
                .dimmed(),
            message.message
        );
    }
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(time) => time.to_rfc3339(),
        None => "-".to_string(),
    }
}

fn colorize_pipeline_state(state: PipelineState) -> colored::ColoredString {
    let text = format!("{:?}", state).to_uppercase();
    match state {
        PipelineState::Ready => text.normal(),
        PipelineState::Queued | PipelineState::Scheduled => text.yellow(),
        PipelineState::Running => text.cyan(),
        PipelineState::Failed => text.red(),
        PipelineState::Complete => text.green(),
    }
}

pub(crate) fn colorize_job_state(state: JobState) -> colored::ColoredString {
    let text = format!("{:?}", state).to_uppercase();
    match state {
        JobState::Ready => text.normal(),
        JobState::Queued | JobState::Scheduled => text.yellow(),
        JobState::Skipped => text.dimmed(),
        JobState::Running => text.cyan(),
        JobState::Failed => text.red(),
        JobState::Complete => text.green(),
    }
}
