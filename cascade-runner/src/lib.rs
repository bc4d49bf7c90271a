//! Cascade Runner
//!
//! Drives media-analytics pipeline definitions through the status core.
//!
//! Architecture:
//! - Definitions: JSON descriptions of a pipeline and its stages
//! - Configuration: run settings from environment or defaults
//! - Executor: runs each stage as an external command under a timeout
//! - Driver: owns the PipelineStatus for a run, publishing after every transition
//! - Sinks: publish callbacks that hand snapshots to files, logs, or memory

pub mod config;
pub mod definition;
pub mod driver;
pub mod executor;
pub mod sink;
