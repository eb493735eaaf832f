//! Control signals returned by actions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Signal an action reports back to the sequencer.
///
/// The same values are accepted as decisions by
/// [`Sequencer::resume`](crate::engine::Sequencer::resume) to unblock a
/// suspended sequence.
///
/// # Example
///
/// ```rust
/// use stepline::core::Control;
///
/// assert!(Control::Continue.is_continue());
/// assert!(!Control::Suspend.is_continue());
/// assert_eq!(Control::Stop.name(), "stop");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    /// Proceed to the next action immediately
    Continue,
    /// Pause until an external decision is delivered through `resume`
    Suspend,
    /// Terminate as failed
    Fail,
    /// Terminate as successfully concluded, skipping remaining actions
    Stop,
}

impl Control {
    /// Get the signal's name for display/logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::Suspend => "suspend",
            Self::Fail => "fail",
            Self::Stop => "stop",
        }
    }

    /// Check if the signal lets the execution loop proceed.
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
