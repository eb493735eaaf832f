//! Engine error types.

use super::action::ActionError;
use crate::core::{Control, Status};
use thiserror::Error;

/// Errors returned by [`Sequencer::resume`](super::Sequencer::resume).
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Another `resume` on the same sequencer is in flight
    #[error("Sequencer is already running")]
    AlreadyRunning,

    /// The sequencer reached a terminal status and cannot resume
    #[error("Sequencer has terminated with status '{status}'")]
    Terminated { status: Status },

    /// The sequencer is waiting and `resume` was called without a decision
    #[error("Sequencer is {status} and requires a decision to resume")]
    DecisionRequired { status: Status },

    /// A decision was supplied while nothing was waiting for one
    #[error("Decision '{decision}' is unexpected while sequencer is {status}")]
    DecisionUnexpected { status: Status, decision: Control },

    /// The workflow payload is missing or of another type
    #[error("Workflow payload is not of the expected type '{expected}'")]
    AdaptationFailed { expected: &'static str },

    /// An action callback raised an error
    #[error("Action '{action}' failed: {source}")]
    Action {
        action: String,
        #[source]
        source: ActionError,
    },
}

impl EngineError {
    /// The error raised by user code, if this is an action failure.
    pub fn action_error(&self) -> Option<&ActionError> {
        match self {
            Self::Action { source, .. } => Some(source),
            _ => None,
        }
    }
}
