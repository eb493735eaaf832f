//! Start policy for freshly created sequencers.

use serde::{Deserialize, Serialize};

/// How a sequencer in the `created` state may be started.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartPolicy {
    /// `resume(None)` starts the sequence; a decision is rejected.
    #[default]
    Implicit,

    /// A created sequencer waits for a decision like a suspended one:
    /// `resume(Some(Control::Continue))` starts it and `resume(None)` is
    /// rejected with `DecisionRequired`.
    Explicit,
}
