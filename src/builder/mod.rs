//! Builder API for ergonomic sequencer construction.
//!
//! This module is where a sequencer is configured: its actions, the workflow
//! payload actions can adapt to, the start policy, and a label.

pub mod macros;
pub mod policy;
pub mod sequencer;

pub use policy::StartPolicy;
pub use sequencer::SequencerBuilder;
