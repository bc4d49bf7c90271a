//! Pipeline status domain types
//!
//! A `PipelineStatus` is the aggregate the rest of the system reports into:
//! the driver creates one per run, mutates it through lifecycle calls, and
//! hands snapshots to an external transport via the publish extension point.
//! One task owns the aggregate exclusively; workers report through the owner
//! rather than mutating it directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::job::JobStatus;
use super::message::StatusMessage;

/// Lifecycle states of a pipeline
///
/// `Complete` and `Failed` are terminal. `Queued` and `Scheduled` exist so an
/// external scheduler can record pre-execution states by writing the `state`
/// field directly; no lifecycle method produces them and none records a
/// message or timestamp for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PipelineState {
    Ready,
    Queued,
    Scheduled,
    Running,
    Failed,
    Complete,
}

/// Consumer of pipeline status snapshots
///
/// Implementations are injected via [`PipelineStatus::set_publish_callback`]
/// and invoked synchronously by [`PipelineStatus::publish`] with the live
/// aggregate, not a copy. Any copying or serialization the sink needs is its
/// own responsibility, and errors it returns surface unchanged to the caller
/// of `publish`.
pub trait PublishCallback: Send {
    fn publish(&self, status: &PipelineStatus) -> anyhow::Result<()>;
}

impl<F> PublishCallback for F
where
    F: Fn(&PipelineStatus) -> anyhow::Result<()> + Send,
{
    fn publish(&self, status: &PipelineStatus) -> anyhow::Result<()> {
        self(status)
    }
}

/// Status record for a whole pipeline run
///
/// Owns its `messages` and `jobs` exclusively; both are append-only. The
/// pipeline lifecycle calls are idempotent against re-entering their own
/// state (`start` on a running pipeline is a no-op), in contrast with
/// [`JobStatus`](super::job::JobStatus), whose calls always record. The
/// `start` guard only checks `Running`, so a pipeline in a terminal state
/// transitions back to `Running`; callers must not assume terminal states
/// are sticky.
#[derive(Serialize, Deserialize)]
pub struct PipelineStatus {
    pub name: String,
    pub state: PipelineState,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub complete_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fail_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub messages: Vec<StatusMessage>,
    #[serde(default)]
    pub jobs: Vec<JobStatus>,

    // Runtime-only fields; never serialized, unset after deserialization.
    #[serde(skip)]
    active_job_index: Option<usize>,
    #[serde(skip)]
    publish_callback: Option<Box<dyn PublishCallback>>,
}

impl PipelineStatus {
    /// Creates a pipeline record in the `Ready` state
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: PipelineState::Ready,
            start_time: None,
            complete_time: None,
            fail_time: None,
            messages: Vec::new(),
            jobs: Vec::new(),
            active_job_index: None,
            publish_callback: None,
        }
    }

    /// Sets the sink invoked by [`publish`](Self::publish)
    ///
    /// Replaces any previously configured sink.
    pub fn set_publish_callback(&mut self, callback: impl PublishCallback + 'static) {
        self.publish_callback = Some(Box::new(callback));
    }

    /// Hands the live aggregate to the configured sink, if any
    ///
    /// The sink runs synchronously, so a slow sink blocks the caller. A sink
    /// error propagates unchanged; no retry is attempted. Without a sink this
    /// is a no-op.
    pub fn publish(&self) -> anyhow::Result<()> {
        if let Some(callback) = &self.publish_callback {
            callback.publish(self)?;
        }
        Ok(())
    }

    /// The most recently added job, or `None` if no job has been added yet
    pub fn active_job(&self) -> Option<&JobStatus> {
        self.active_job_index.and_then(|index| self.jobs.get(index))
    }

    /// Mutable access to the most recently added job
    pub fn active_job_mut(&mut self) -> Option<&mut JobStatus> {
        match self.active_job_index {
            Some(index) => self.jobs.get_mut(index),
            None => None,
        }
    }

    /// Adds a new job with the given name and makes it the active job
    ///
    /// Names are not validated for uniqueness: each call is a new stage
    /// instance, not a lookup key.
    pub fn add_job(&mut self, name: impl Into<String>) -> &mut JobStatus {
        let index = self.jobs.len();
        self.jobs.push(JobStatus::new(name));
        self.active_job_index = Some(index);
        &mut self.jobs[index]
    }

    /// Appends a message to the pipeline's log
    ///
    /// Returns the message's timestamp so callers can reuse it as a lifecycle
    /// timestamp without a second clock read.
    pub fn add_message(&mut self, message: impl Into<String>) -> DateTime<Utc> {
        let status_message = StatusMessage::new(message);
        let time = status_message.time;
        self.messages.push(status_message);
        time
    }

    /// Marks the pipeline as started
    ///
    /// No-op if the pipeline is already running: no message is recorded and
    /// `start_time` is untouched.
    pub fn start(&mut self) {
        self.start_with_message("Pipeline started");
    }

    /// Marks the pipeline as started with a custom message
    pub fn start_with_message(&mut self, message: impl Into<String>) {
        if self.state == PipelineState::Running {
            return;
        }
        self.start_time = Some(self.add_message(message));
        self.state = PipelineState::Running;
    }

    /// Marks the pipeline as complete
    ///
    /// No-op if the pipeline is already complete.
    pub fn complete(&mut self) {
        self.complete_with_message("Pipeline completed");
    }

    /// Marks the pipeline as complete with a custom message
    pub fn complete_with_message(&mut self, message: impl Into<String>) {
        if self.state == PipelineState::Complete {
            return;
        }
        self.complete_time = Some(self.add_message(message));
        self.state = PipelineState::Complete;
    }

    /// Marks the pipeline as failed
    ///
    /// No-op if the pipeline is already failed.
    pub fn fail(&mut self) {
        self.fail_with_message("Pipeline failed");
    }

    /// Marks the pipeline as failed with a custom message
    pub fn fail_with_message(&mut self, message: impl Into<String>) {
        if self.state == PipelineState::Failed {
            return;
        }
        self.fail_time = Some(self.add_message(message));
        self.state = PipelineState::Failed;
    }

    /// Serializes the status to a JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Serializes the status to a JSON value
    pub fn to_json_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    /// Reconstructs a status from its serialized form
    ///
    /// Missing `jobs`, `messages`, and timestamp fields default to empty;
    /// missing `name` or `state` is a parse error. The publish sink and
    /// active-job reference are runtime-only and start unset.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Reconstructs a status from a JSON value
    pub fn from_json_value(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

impl fmt::Debug for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineStatus")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("start_time", &self.start_time)
            .field("complete_time", &self.complete_time)
            .field("fail_time", &self.fail_time)
            .field("messages", &self.messages)
            .field("jobs", &self.jobs)
            .field("active_job_index", &self.active_job_index)
            .finish_non_exhaustive()
    }
}

impl PartialEq for PipelineStatus {
    // Serialized fields only; the publish sink and active-job reference do
    // not participate in equality.
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.state == other.state
            && self.start_time == other.start_time
            && self.complete_time == other.complete_time
            && self.fail_time == other.fail_time
            && self.messages == other.messages
            && self.jobs == other.jobs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::job::JobState;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_new_pipeline_is_ready() {
        let pipeline = PipelineStatus::new("ingest");
        assert_eq!(pipeline.name, "ingest");
        assert_eq!(pipeline.state, PipelineState::Ready);
        assert!(pipeline.start_time.is_none());
        assert!(pipeline.messages.is_empty());
        assert!(pipeline.jobs.is_empty());
        assert!(pipeline.active_job().is_none());
    }

    #[test]
    fn test_start_sets_state_and_time() {
        let mut pipeline = PipelineStatus::new("ingest");
        pipeline.start();

        assert_eq!(pipeline.state, PipelineState::Running);
        assert_eq!(pipeline.messages.len(), 1);
        assert_eq!(pipeline.messages[0].message, "Pipeline started");
        assert_eq!(pipeline.start_time, Some(pipeline.messages[0].time));
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut pipeline = PipelineStatus::new("ingest");
        pipeline.start();
        let start_time = pipeline.start_time;

        pipeline.start();
        assert_eq!(pipeline.messages.len(), 1);
        assert_eq!(pipeline.start_time, start_time);
    }

    #[test]
    fn test_complete_is_idempotent() {
        let mut pipeline = PipelineStatus::new("ingest");
        pipeline.complete();
        let complete_time = pipeline.complete_time;

        pipeline.complete();
        assert_eq!(pipeline.state, PipelineState::Complete);
        assert_eq!(pipeline.messages.len(), 1);
        assert_eq!(pipeline.complete_time, complete_time);
    }

    #[test]
    fn test_fail_is_idempotent() {
        let mut pipeline = PipelineStatus::new("ingest");
        pipeline.fail_with_message("decoder crashed");
        let fail_time = pipeline.fail_time;

        pipeline.fail();
        assert_eq!(pipeline.state, PipelineState::Failed);
        assert_eq!(pipeline.messages.len(), 1);
        assert_eq!(pipeline.fail_time, fail_time);
    }

    // Only the Running guard exists; terminal pipelines can be re-started.
    #[test]
    fn test_start_after_complete_reenters_running() {
        let mut pipeline = PipelineStatus::new("ingest");
        pipeline.complete();
        pipeline.start();

        assert_eq!(pipeline.state, PipelineState::Running);
        assert_eq!(pipeline.messages.len(), 2);
        assert!(pipeline.complete_time.is_some());
    }

    #[test]
    fn test_add_job_activates_latest() {
        let mut pipeline = PipelineStatus::new("ingest");

        pipeline.add_job("stage1");
        assert_eq!(pipeline.active_job().map(|j| j.name.as_str()), Some("stage1"));

        pipeline.add_job("stage2");
        assert_eq!(pipeline.jobs.len(), 2);
        assert_eq!(pipeline.jobs[0].name, "stage1");
        assert_eq!(pipeline.jobs[1].name, "stage2");
        assert_eq!(pipeline.active_job().map(|j| j.name.as_str()), Some("stage2"));
    }

    #[test]
    fn test_add_job_permits_duplicate_names() {
        let mut pipeline = PipelineStatus::new("ingest");
        pipeline.add_job("resize");
        pipeline.add_job("resize");
        assert_eq!(pipeline.jobs.len(), 2);
    }

    #[test]
    fn test_add_message_returns_logged_time() {
        let mut pipeline = PipelineStatus::new("ingest");
        let time = pipeline.add_message("halfway there");

        assert_eq!(pipeline.messages.len(), 1);
        assert_eq!(pipeline.messages[0].time, time);
    }

    #[test]
    fn test_publish_without_sink_is_noop() {
        let pipeline = PipelineStatus::new("ingest");
        assert!(pipeline.publish().is_ok());
    }

    #[test]
    fn test_publish_invokes_sink_once_with_live_status() {
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = seen.clone();

        let mut pipeline = PipelineStatus::new("ingest");
        pipeline.set_publish_callback(move |status: &PipelineStatus| {
            sink_seen.lock().unwrap().push(status.name.clone());
            Ok(())
        });

        pipeline.publish().unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["ingest".to_string()]);
    }

    #[test]
    fn test_publish_propagates_sink_error() {
        let mut pipeline = PipelineStatus::new("ingest");
        pipeline.set_publish_callback(|_: &PipelineStatus| Err(anyhow::anyhow!("queue full")));

        let err = pipeline.publish().unwrap_err();
        assert!(err.to_string().contains("queue full"));
    }

    #[test]
    fn test_set_publish_callback_replaces_sink() {
        let count = Arc::new(Mutex::new(0u32));
        let first = count.clone();
        let second = count.clone();

        let mut pipeline = PipelineStatus::new("ingest");
        pipeline.set_publish_callback(move |_: &PipelineStatus| {
            *first.lock().unwrap() += 1;
            Ok(())
        });
        pipeline.set_publish_callback(move |_: &PipelineStatus| {
            *second.lock().unwrap() += 10;
            Ok(())
        });

        pipeline.publish().unwrap();
        assert_eq!(*count.lock().unwrap(), 10);
    }

    #[test]
    fn test_round_trip() {
        let mut pipeline = PipelineStatus::new("ingest");
        pipeline.start();
        pipeline.add_message("decoding input");

        pipeline.add_job("resize");
        if let Some(job) = pipeline.active_job_mut() {
            job.start();
            job.complete();
        }
        pipeline.add_job("detect-objects");
        if let Some(job) = pipeline.active_job_mut() {
            job.start();
            job.fail_with_message("model file missing");
        }
        pipeline.complete();

        let json = pipeline.to_json().unwrap();
        let restored = PipelineStatus::from_json(&json).unwrap();

        assert_eq!(restored, pipeline);
        // Runtime fields are not part of the wire format.
        assert!(restored.active_job().is_none());
        assert!(restored.publish().is_ok());
    }

    #[test]
    fn test_decode_defaults_missing_collections() {
        let pipeline =
            PipelineStatus::from_json(r#"{"name": "ingest", "state": "READY"}"#).unwrap();
        assert_eq!(pipeline.name, "ingest");
        assert_eq!(pipeline.state, PipelineState::Ready);
        assert!(pipeline.start_time.is_none());
        assert!(pipeline.messages.is_empty());
        assert!(pipeline.jobs.is_empty());
    }

    #[test]
    fn test_decode_requires_name_and_state() {
        assert!(PipelineStatus::from_json(r#"{"state": "READY"}"#).is_err());
        assert!(PipelineStatus::from_json(r#"{"name": "ingest"}"#).is_err());
        assert!(PipelineStatus::from_json(r#"{"name": "ingest", "state": "PAUSED"}"#).is_err());
    }

    #[test]
    fn test_serialized_state_is_uppercase() {
        let value = PipelineStatus::new("ingest").to_json_value().unwrap();
        assert_eq!(value["state"], serde_json::json!("READY"));
    }

    // Pipeline completion is independent of job outcomes: aggregating job
    // failure into pipeline failure is a driver policy, not a core behavior.
    #[test]
    fn test_completion_independent_of_job_failure() {
        let mut pipeline = PipelineStatus::new("ingest");
        pipeline.start();
        assert_eq!(pipeline.state, PipelineState::Running);
        assert_eq!(pipeline.messages.len(), 1);

        pipeline.add_job("resize");
        if let Some(job) = pipeline.active_job_mut() {
            job.start();
            assert_eq!(job.state, JobState::Running);
            job.fail();
            assert_eq!(job.state, JobState::Failed);
            assert!(job.fail_time.is_some());
            assert_eq!(job.messages.len(), 2);
        }

        pipeline.complete();
        assert_eq!(pipeline.state, PipelineState::Complete);
    }

    #[test]
    fn test_scheduler_states_settable_directly() {
        let mut pipeline = PipelineStatus::new("ingest");
        pipeline.state = PipelineState::Queued;
        pipeline.state = PipelineState::Scheduled;

        // Direct state writes carry no message or timestamp side effects.
        assert!(pipeline.messages.is_empty());
        assert!(pipeline.start_time.is_none());
    }
}
