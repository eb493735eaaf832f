//! Serializable progress reports.
//!
//! A report is a point-in-time copy of a sequencer's observable state, meant
//! for logs, dashboards and test assertions. It carries no actions, so it
//! cannot be turned back into a live sequencer.

use crate::core::{RunLog, Status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::ReportError;

/// Snapshot of a sequencer, produced by
/// [`Sequencer::report`](crate::engine::Sequencer::report).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Sequencer identifier
    pub id: Uuid,

    /// Optional label given at build time
    pub label: Option<String>,

    /// Status when the report was taken
    pub status: Status,

    /// Index of the next action to execute
    pub cursor: usize,

    /// Length of the action list
    pub total_actions: usize,

    /// Every action executed so far
    pub log: RunLog,

    /// Message of the last recorded error
    pub last_error: Option<String>,

    /// When the sequencer was created
    pub created_at: DateTime<Utc>,

    /// Last change to status, log or error
    pub updated_at: DateTime<Utc>,

    /// When this report was taken
    pub generated_at: DateTime<Utc>,
}

impl RunReport {
    /// Number of actions not yet executed.
    pub fn remaining(&self) -> usize {
        self.total_actions.saturating_sub(self.cursor)
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        serde_json::to_string(self).map_err(|e| ReportError::SerializationFailed(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, ReportError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ReportError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        serde_json::from_str(json).map_err(|e| ReportError::DeserializationFailed(e.to_string()))
    }
}
