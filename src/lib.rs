//! Stepline: a sequential step engine with suspend and resume
//!
//! A [`Sequencer`] runs an ordered list of named actions one at a time. Any
//! action may let the sequence continue, suspend it until an external
//! decision arrives, stop it early, or fail it. Multi-step workflows that
//! wait on user input or network callbacks can be written as a flat list of
//! steps instead of a hand-rolled state machine.
//!
//! # Core Concepts
//!
//! - **Action**: a named callback returning a [`Control`] signal or an error
//! - **Status**: where the sequencer is: created, running, suspended, or one
//!   of the terminal states failed, stopped and completed
//! - **Run log**: append-only record of every action execution
//! - **Bridge**: actions that hand work to a [`Dispatcher`](bridge::Dispatcher)
//!   and resume the sequencer when the work finishes
//!
//! # Example
//!
//! ```rust
//! use stepline::{action, Control, EngineError, Sequencer, Status};
//!
//! let sequencer = Sequencer::new(vec![
//!     action("load cart", |_| Ok(Control::Continue)),
//!     action("confirm payment", |_| Ok(Control::Suspend)),
//!     action("ship", |_| Ok(Control::Continue)),
//! ]);
//!
//! sequencer.resume(None).unwrap();
//! assert_eq!(sequencer.status(), Status::Suspended);
//!
//! // A decision is required to continue.
//! assert!(matches!(
//!     sequencer.resume(None),
//!     Err(EngineError::DecisionRequired { .. })
//! ));
//!
//! sequencer.resume(Some(Control::Continue)).unwrap();
//! assert_eq!(sequencer.status(), Status::Completed);
//! assert_eq!(
//!     sequencer.log().action_names(),
//!     vec!["load cart", "confirm payment", "ship"]
//! );
//! ```

pub mod bridge;
pub mod builder;
pub mod core;
pub mod engine;
pub mod report;

// Re-export commonly used types
pub use builder::{SequencerBuilder, StartPolicy};
pub use core::{Control, LogEntry, RunLog, Status};
pub use engine::{action, Action, ActionError, ActionResult, EngineError, Sequencer};
pub use report::RunReport;
