//! Bridge between synchronous steps and asynchronous external work.
//!
//! An action built with [`async_action`] schedules its work on a
//! [`Dispatcher`] and suspends the sequencer right away. The work later
//! delivers a decision through [`Sequencer::resume`](crate::engine::Sequencer::resume),
//! from whichever thread the dispatcher ran it on.
//!
//! Dispatchers provided here:
//! - [`QueueDispatcher`]: jobs wait until the host drains the queue
//! - [`ThreadDispatcher`]: one OS thread per job
//! - `TokioDispatcher`: Tokio's blocking pool (feature `tokio`)

mod action;
mod dispatcher;

pub use action::async_action;
#[cfg(feature = "tokio")]
pub use dispatcher::TokioDispatcher;
pub use dispatcher::{Dispatcher, Job, QueueDispatcher, ThreadDispatcher};
