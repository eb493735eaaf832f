//! Core sequencer types.
//!
//! This module contains the plain value types the engine is built from:
//! - Control signals reported by actions
//! - Machine status
//! - The append-only run log
//! - The non-blocking single-flight guard
//!
//! Nothing in here invokes user code.

mod control;
mod guard;
mod log;
mod status;

pub use control::Control;
pub use guard::{RunGuard, RunPermit};
pub use log::{LogEntry, RunLog};
pub use status::Status;
