//! Core domain types
//!
//! This module contains the status aggregates shared between the pipeline
//! driver (which mutates them through lifecycle calls) and publish sinks
//! (which consume serialized snapshots).

pub mod job;
pub mod message;
pub mod pipeline;
