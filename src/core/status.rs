//! Sequencer machine states.
//!
//! A sequencer moves through a small, fixed set of states. Three of them are
//! terminal: once reached, the sequencer never changes again.

use super::control::Control;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current state of a [`Sequencer`](crate::engine::Sequencer).
///
/// All methods are pure.
///
/// # Example
///
/// ```rust
/// use stepline::core::Status;
///
/// assert!(!Status::Suspended.is_terminal());
/// assert!(Status::Stopped.is_terminal());
/// assert!(Status::Failed.is_error());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Constructed, never resumed
    #[default]
    Created,
    /// Inside the execution loop
    Running,
    /// Paused, awaiting a decision
    Suspended,
    /// Terminated by a failing action or a `fail` decision
    Failed,
    /// Terminated early by a `stop` signal or decision
    Stopped,
    /// Every action ran to the end of the list
    Completed,
}

impl Status {
    /// Get the state's name for display/logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Suspended => "suspended",
            Self::Failed => "failed",
            Self::Stopped => "stopped",
            Self::Completed => "completed",
        }
    }

    /// Check if this is a terminal state.
    ///
    /// Terminal states reject every further `resume`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed | Self::Stopped | Self::Completed)
    }

    /// Check if this is the error state.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// State a sequencer settles in after receiving `signal`.
    ///
    /// Returns `None` for [`Control::Continue`], which keeps the loop running.
    pub fn after(signal: Control) -> Option<Self> {
        match signal {
            Control::Continue => None,
            Control::Suspend => Some(Self::Suspended),
            Control::Fail => Some(Self::Failed),
            Control::Stop => Some(Self::Stopped),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
