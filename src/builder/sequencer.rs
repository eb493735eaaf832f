//! Builder for constructing sequencers.

use super::policy::StartPolicy;
use crate::engine::{Action, ActionResult, Sequencer, Workflow};
use std::any::Any;
use std::sync::Arc;

/// Builder for constructing sequencers with a fluent API.
///
/// # Example
///
/// ```rust
/// use stepline::builder::{SequencerBuilder, StartPolicy};
/// use stepline::core::{Control, Status};
/// use stepline::engine::ActionError;
///
/// struct Signup {
///     source: &'static str,
/// }
///
/// let sequencer = SequencerBuilder::new()
///     .label("signup")
///     .workflow(Signup { source: "web" })
///     .start_policy(StartPolicy::Implicit)
///     .step("check source", |sequencer| {
///         let signup = sequencer.workflow::<Signup>().map_err(ActionError::new)?;
///         assert_eq!(signup.source, "web");
///         Ok(Control::Continue)
///     })
///     .build();
///
/// sequencer.resume(None).unwrap();
/// assert_eq!(sequencer.status(), Status::Completed);
/// ```
#[derive(Default)]
pub struct SequencerBuilder {
    actions: Vec<Action>,
    workflow: Option<Workflow>,
    policy: StartPolicy,
    label: Option<String>,
}

impl SequencerBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pre-built action.
    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Append an action built from a name and a callback.
    pub fn step<F>(self, name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&Arc<Sequencer>) -> ActionResult + Send + Sync + 'static,
    {
        self.action(Action::new(name, callback))
    }

    /// Append several actions at once, keeping their order.
    pub fn actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Attach the workflow payload actions can downcast to.
    pub fn workflow<T>(self, workflow: T) -> Self
    where
        T: Any + Send + Sync,
    {
        self.shared_workflow(Arc::new(workflow))
    }

    /// Attach a workflow payload the caller keeps a handle to.
    pub fn shared_workflow<T>(mut self, workflow: Arc<T>) -> Self
    where
        T: Any + Send + Sync,
    {
        self.workflow = Some(workflow);
        self
    }

    /// Choose how a freshly created sequencer may be started.
    pub fn start_policy(mut self, policy: StartPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set a human-readable label used in reports.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Build the sequencer.
    pub fn build(self) -> Arc<Sequencer> {
        Arc::new(Sequencer::from_parts(
            self.actions,
            self.workflow,
            self.policy,
            self.label,
        ))
    }
}
