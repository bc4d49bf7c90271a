//! Cascade Core
//!
//! Core status-tracking types for the Cascade media-analytics pipeline system.
//!
//! This crate contains:
//! - Domain types: status aggregates (PipelineStatus, JobStatus, StatusMessage)
//! - The publish extension point used to hand snapshots to an external transport

pub mod domain;
