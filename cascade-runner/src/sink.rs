//! Publish sinks
//!
//! `PublishCallback` implementations that hand status snapshots to the
//! outside world. The core invokes whichever sink is configured with the
//! live aggregate; each sink here serializes what it needs and returns
//! errors to the publishing caller unchanged.

use anyhow::{Context, Result};
use cascade_core::domain::pipeline::{PipelineStatus, PublishCallback};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Writes each published snapshot to a JSON file
///
/// The snapshot is written to a temporary sibling and renamed into place so
/// readers never observe a partially written file.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Creates a sink writing to the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path snapshots are written to
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl PublishCallback for FileSink {
    fn publish(&self, status: &PipelineStatus) -> Result<()> {
        let json = status
            .to_json()
            .context("failed to serialize status snapshot")?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to move snapshot to {}", self.path.display()))?;

        Ok(())
    }
}

/// Logs a one-line summary of each published snapshot
pub struct LogSink;

impl PublishCallback for LogSink {
    fn publish(&self, status: &PipelineStatus) -> Result<()> {
        info!(
            "Pipeline '{}' is {:?} ({} job(s), {} message(s))",
            status.name,
            status.state,
            status.jobs.len(),
            status.messages.len()
        );
        Ok(())
    }
}

/// Buffers serialized snapshots in memory
///
/// Intended for tests and embedders that want to inspect the full sequence
/// of published snapshots after a run. Clones share the same buffer.
#[derive(Clone, Default)]
pub struct MemorySink {
    snapshots: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    /// Creates an empty memory sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the serialized snapshots published so far, in order
    pub fn snapshots(&self) -> Vec<String> {
        self.snapshots.lock().unwrap().clone()
    }

    /// Number of snapshots published so far
    pub fn len(&self) -> usize {
        self.snapshots.lock().unwrap().len()
    }

    /// True when nothing has been published yet
    pub fn is_empty(&self) -> bool {
        self.snapshots.lock().unwrap().is_empty()
    }
}

impl PublishCallback for MemorySink {
    fn publish(&self, status: &PipelineStatus) -> Result<()> {
        let json = status.to_json()?;
        self.snapshots.lock().unwrap().push(json);
        Ok(())
    }
}
