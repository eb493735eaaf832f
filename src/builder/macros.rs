//! Macros for ergonomic action list construction.

/// Build a `Vec<Action>` from `name => callback` pairs.
///
/// # Example
///
/// ```
/// use stepline::actions;
/// use stepline::core::{Control, Status};
/// use stepline::engine::Sequencer;
///
/// let sequencer = Sequencer::new(actions![
///     "reserve seat" => |_| Ok(Control::Continue),
///     "charge card" => |_| Ok(Control::Stop),
/// ]);
///
/// sequencer.resume(None).unwrap();
/// assert_eq!(sequencer.status(), Status::Stopped);
/// ```
#[macro_export]
macro_rules! actions {
    ($($name:expr => $callback:expr),* $(,)?) => {
        ::std::vec![$($crate::engine::Action::new($name, $callback)),*]
    };
}
