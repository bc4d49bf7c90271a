//! Job status domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::message::StatusMessage;

/// Lifecycle states of a job
///
/// `Complete`, `Failed`, and `Skipped` are terminal. `Queued` and `Scheduled`
/// exist so an external scheduler can record pre-execution states by writing
/// the `state` field directly; no lifecycle method produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobState {
    Ready,
    Queued,
    Scheduled,
    Skipped,
    Running,
    Failed,
    Complete,
}

/// Status record for one job within a pipeline
///
/// Owned by the `PipelineStatus` that created it via `add_job` and retained
/// for the life of the pipeline snapshot. Unlike the pipeline lifecycle, job
/// lifecycle calls are not idempotent: every call appends a message and
/// overwrites the corresponding timestamp, even from a terminal state. A job
/// that failed stays failed; callers wanting a fresh attempt add a new job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub name: String,
    pub state: JobState,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub complete_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fail_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub messages: Vec<StatusMessage>,
}

impl JobStatus {
    /// Creates a job record in the `Ready` state
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: JobState::Ready,
            start_time: None,
            complete_time: None,
            fail_time: None,
            messages: Vec::new(),
        }
    }

    /// Appends a message to the job's log
    ///
    /// Returns the message's timestamp so callers can reuse it as a lifecycle
    /// timestamp without a second clock read.
    pub fn add_message(&mut self, message: impl Into<String>) -> DateTime<Utc> {
        let status_message = StatusMessage::new(message);
        let time = status_message.time;
        self.messages.push(status_message);
        time
    }

    /// Marks the job as skipped
    ///
    /// Records a message but sets no timestamp field.
    pub fn skip(&mut self) {
        self.skip_with_message("Job skipped");
    }

    /// Marks the job as skipped with a custom message
    pub fn skip_with_message(&mut self, message: impl Into<String>) {
        self.add_message(message);
        self.state = JobState::Skipped;
    }

    /// Marks the job as started
    pub fn start(&mut self) {
        self.start_with_message("Job started");
    }

    /// Marks the job as started with a custom message
    pub fn start_with_message(&mut self, message: impl Into<String>) {
        self.start_time = Some(self.add_message(message));
        self.state = JobState::Running;
    }

    /// Marks the job as complete
    pub fn complete(&mut self) {
        self.complete_with_message("Job completed");
    }

    /// Marks the job as complete with a custom message
    pub fn complete_with_message(&mut self, message: impl Into<String>) {
        self.complete_time = Some(self.add_message(message));
        self.state = JobState::Complete;
    }

    /// Marks the job as failed
    pub fn fail(&mut self) {
        self.fail_with_message("Job failed");
    }

    /// Marks the job as failed with a custom message
    pub fn fail_with_message(&mut self, message: impl Into<String>) {
        self.fail_time = Some(self.add_message(message));
        self.state = JobState::Failed;
    }
}
