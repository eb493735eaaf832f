//! The sequencing engine.
//!
//! A [`Sequencer`] owns an ordered list of [`Action`]s and walks it one
//! action at a time. Each action returns a [`Control`](crate::core::Control)
//! signal or raises an [`ActionError`]:
//!
//! - `continue` runs the next action immediately
//! - `suspend` returns from `resume`, leaving the sequencer waiting
//! - `stop` ends the sequence successfully, skipping the rest
//! - `fail` ends the sequence as failed
//!
//! A suspended sequencer continues only when someone calls
//! [`Sequencer::resume`] with a decision. Concurrent or re-entrant calls are
//! rejected with [`EngineError::AlreadyRunning`] instead of waiting.

mod action;
mod error;
mod sequencer;

pub use action::{action, Action, ActionCallback, ActionError, ActionResult};
pub use error::EngineError;
pub use sequencer::Sequencer;
pub(crate) use sequencer::Workflow;
