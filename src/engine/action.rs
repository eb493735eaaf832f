//! Named actions and the errors they raise.

use super::sequencer::Sequencer;
use crate::core::Control;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Error raised by user action code.
///
/// Wraps any `Error + Send + Sync` behind an `Arc`, so the copy stored as the
/// sequencer's last error and the copy returned to the `resume` caller are the
/// same object.
///
/// # Example
///
/// ```rust
/// use stepline::engine::ActionError;
///
/// let error = ActionError::msg("upstream timed out");
/// assert_eq!(error.to_string(), "upstream timed out");
///
/// let io = ActionError::new(std::io::Error::other("disk full"));
/// assert!(io.downcast_ref::<std::io::Error>().is_some());
/// ```
#[derive(Clone)]
pub struct ActionError(Arc<dyn StdError + Send + Sync + 'static>);

impl ActionError {
    /// Wrap an existing error.
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self(Arc::new(error))
    }

    /// Create an error from a plain message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(Message(message.into()))
    }

    /// Borrow the wrapped error as a concrete type.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        self.0.downcast_ref::<E>()
    }

    /// Check whether both handles point at the same underlying error.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl StdError for ActionError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

#[derive(Debug)]
struct Message(String);

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for Message {}

/// Outcome of running one action.
pub type ActionResult = Result<Control, ActionError>;

/// Callback invoked with the running sequencer.
pub type ActionCallback = Arc<dyn Fn(&Arc<Sequencer>) -> ActionResult + Send + Sync>;

/// A named unit of work in a sequence.
///
/// Names are labels for logging and need not be unique.
#[derive(Clone)]
pub struct Action {
    name: String,
    callback: ActionCallback,
}

impl Action {
    /// Create an action from a name and a callback.
    pub fn new<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&Arc<Sequencer>) -> ActionResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            callback: Arc::new(callback),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn invoke(&self, sequencer: &Arc<Sequencer>) -> ActionResult {
        (self.callback)(sequencer)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Shorthand for [`Action::new`].
///
/// # Example
///
/// ```rust
/// use stepline::core::{Control, Status};
/// use stepline::engine::{action, Sequencer};
///
/// let sequencer = Sequencer::new(vec![
///     action("validate", |_| Ok(Control::Continue)),
///     action("publish", |_| Ok(Control::Continue)),
/// ]);
///
/// sequencer.resume(None).unwrap();
/// assert_eq!(sequencer.status(), Status::Completed);
/// ```
pub fn action<F>(name: impl Into<String>, callback: F) -> Action
where
    F: Fn(&Arc<Sequencer>) -> ActionResult + Send + Sync + 'static,
{
    Action::new(name, callback)
}
