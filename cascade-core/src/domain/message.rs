//! Status message domain type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A timestamped status update attached to a pipeline or job
///
/// Messages are immutable once created: the owning log appends them and never
/// rewrites them. A message decoded without a `time` field is stamped with the
/// current time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
    #[serde(default = "Utc::now")]
    pub time: DateTime<Utc>,
}

impl StatusMessage {
    /// Creates a message stamped with the current time
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            time: Utc::now(),
        }
    }

    /// Creates a message with an explicit timestamp
    pub fn at(message: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            message: message.into(),
            time,
        }
    }
}
