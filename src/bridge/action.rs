//! Actions that hand their work to a dispatcher and suspend.

use super::dispatcher::Dispatcher;
use crate::core::Control;
use crate::engine::{Action, ActionError, Sequencer};
use std::any::Any;
use std::sync::Arc;
use tracing::{debug, warn};

/// Build an action that runs `work` asynchronously and suspends the sequence.
///
/// When the action executes it:
/// 1. adapts the sequencer's workflow payload to `T`, failing with
///    [`EngineError::AdaptationFailed`](crate::engine::EngineError::AdaptationFailed)
///    if it has another type;
/// 2. schedules `work` on `dispatcher` without waiting for it;
/// 3. returns [`Control::Suspend`].
///
/// `work` is expected to arrange for
/// [`deliver(decision)`](Sequencer::deliver) once its outcome is known,
/// typically from a completion handler. If `work` itself returns an error,
/// the error is recorded on the sequencer and a `fail` decision is delivered
/// on its behalf, even when the work finishes before the action has
/// suspended. Nothing is propagated: observe the outcome through `status()`
/// and `last_error()`.
///
/// # Example
///
/// ```rust
/// use std::sync::Mutex;
/// use stepline::bridge::{async_action, QueueDispatcher};
/// use stepline::core::{Control, Status};
/// use stepline::engine::Sequencer;
///
/// #[derive(Default)]
/// struct Answers {
///     name: Mutex<Option<String>>,
/// }
///
/// let main_queue = QueueDispatcher::new();
/// let sequencer = Sequencer::builder()
///     .workflow(Answers::default())
///     .action(async_action(
///         "ask name",
///         main_queue.clone(),
///         |answers: &Answers, sequencer| {
///             *answers.name.lock().unwrap() = Some("Ada".to_string());
///             sequencer
///                 .deliver(Control::Continue)
///                 .map_err(stepline::engine::ActionError::new)
///         },
///     ))
///     .build();
///
/// sequencer.resume(None).unwrap();
/// assert_eq!(sequencer.status(), Status::Suspended);
///
/// main_queue.run_pending();
/// assert_eq!(sequencer.status(), Status::Completed);
/// ```
pub fn async_action<T, D, F>(name: impl Into<String>, dispatcher: D, work: F) -> Action
where
    T: Any + Send + Sync,
    D: Dispatcher + 'static,
    F: Fn(&T, &Arc<Sequencer>) -> Result<(), ActionError> + Send + Sync + 'static,
{
    let name = name.into();
    let work = Arc::new(work);

    Action::new(name.clone(), move |sequencer| {
        let workflow = sequencer.workflow::<T>().map_err(ActionError::new)?;

        let sequencer = Arc::clone(sequencer);
        let work = Arc::clone(&work);
        let action = name.clone();
        dispatcher.dispatch(Box::new(move || {
            let Err(error) = (*work)(&workflow, &sequencer) else {
                return;
            };

            warn!(%action, %error, "asynchronous work failed");
            sequencer.record_error(error);
            if let Err(rejected) = sequencer.deliver(Control::Fail) {
                debug!(%action, error = %rejected, "fail decision was not applied");
            }
        }));

        Ok(Control::Suspend)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{Job, QueueDispatcher, ThreadDispatcher};
    use crate::core::Status;
    use crate::engine::{action, EngineError};
    use std::sync::mpsc;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct Signup {
        name: Mutex<Option<String>>,
        email: Mutex<Option<String>>,
    }

    fn name(signup: &Signup) -> &Mutex<Option<String>> {
        &signup.name
    }

    fn email(signup: &Signup) -> &Mutex<Option<String>> {
        &signup.email
    }

    fn prompt(
        field: fn(&Signup) -> &Mutex<Option<String>>,
        answer: &'static str,
    ) -> impl Fn(&Signup, &Arc<Sequencer>) -> Result<(), ActionError> + Send + Sync {
        move |signup: &Signup, sequencer: &Arc<Sequencer>| {
            *field(signup).lock().unwrap() = Some(answer.to_string());
            sequencer
                .deliver(Control::Continue)
                .map_err(ActionError::new)
        }
    }

    /// Runs each job before `dispatch` returns.
    struct Inline;

    impl Dispatcher for Inline {
        fn dispatch(&self, job: Job) {
            job();
        }
    }

    #[test]
    fn suspends_until_work_resumes() {
        let queue = QueueDispatcher::new();
        let signup = Arc::new(Signup::default());
        let sequencer = Sequencer::builder()
            .shared_workflow(Arc::clone(&signup))
            .action(async_action("name", queue.clone(), prompt(name, "Ada")))
            .action(async_action(
                "email",
                queue.clone(),
                prompt(email, "ada@example.com"),
            ))
            .build();

        sequencer.resume(None).unwrap();
        assert_eq!(sequencer.status(), Status::Suspended);
        assert_eq!(queue.pending(), 1);
        assert!(signup.name.lock().unwrap().is_none());

        assert!(queue.run_next());
        assert_eq!(sequencer.status(), Status::Suspended);
        assert_eq!(signup.name.lock().unwrap().as_deref(), Some("Ada"));
        assert!(signup.email.lock().unwrap().is_none());

        assert!(queue.run_next());
        assert_eq!(sequencer.status(), Status::Completed);
        assert_eq!(
            signup.email.lock().unwrap().as_deref(),
            Some("ada@example.com")
        );
        assert_eq!(
            sequencer.log().signals(),
            vec![Control::Suspend, Control::Suspend]
        );
    }

    #[test]
    fn wrong_workflow_type_fails_adaptation() {
        let queue = QueueDispatcher::new();
        let sequencer = Sequencer::builder()
            .workflow(7_u8)
            .action(async_action("name", queue.clone(), prompt(name, "Ada")))
            .build();

        let err = sequencer.resume(None).unwrap_err();

        let adaptation = err
            .action_error()
            .and_then(|e| e.downcast_ref::<EngineError>())
            .unwrap();
        assert!(matches!(adaptation, EngineError::AdaptationFailed { .. }));
        assert_eq!(sequencer.status(), Status::Failed);
        assert_eq!(sequencer.log().signals(), vec![Control::Fail]);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn work_failure_is_recorded_and_fails_sequence() {
        let queue = QueueDispatcher::new();
        let sequencer = Sequencer::builder()
            .workflow(Signup::default())
            .action(async_action("upload", queue.clone(), |_: &Signup, _| {
                Err(ActionError::msg("network unreachable"))
            }))
            .action(action("never", |_| panic!("this action should not be called")))
            .build();

        sequencer.resume(None).unwrap();
        queue.run_pending();

        assert_eq!(sequencer.status(), Status::Failed);
        assert_eq!(
            sequencer.last_error().unwrap().to_string(),
            "network unreachable"
        );
        assert_eq!(sequencer.cursor(), 1);
    }

    #[test]
    fn failure_before_suspend_still_fails_sequence() {
        let sequencer = Sequencer::builder()
            .workflow(Signup::default())
            .action(async_action("upload", Inline, |_: &Signup, _| {
                Err(ActionError::msg("network unreachable"))
            }))
            .action(action("never", |_| panic!("this action should not be called")))
            .build();

        sequencer.resume(None).unwrap();

        assert_eq!(sequencer.status(), Status::Failed);
        assert_eq!(
            sequencer.last_error().unwrap().to_string(),
            "network unreachable"
        );
        assert_eq!(sequencer.log().signals(), vec![Control::Suspend]);
        assert!(!sequencer.is_running());
    }

    #[test]
    fn answer_before_suspend_continues_sequence() {
        let sequencer = Sequencer::builder()
            .workflow(Signup::default())
            .action(async_action("name", Inline, prompt(name, "Ada")))
            .action(async_action("email", Inline, prompt(email, "ada@example.com")))
            .build();

        sequencer.resume(None).unwrap();

        assert_eq!(sequencer.status(), Status::Completed);
        let signup = sequencer.workflow::<Signup>().unwrap();
        assert_eq!(signup.name.lock().unwrap().as_deref(), Some("Ada"));
        assert_eq!(
            signup.email.lock().unwrap().as_deref(),
            Some("ada@example.com")
        );
    }

    #[test]
    fn work_runs_on_worker_thread() {
        let (go_tx, go_rx) = mpsc::channel::<()>();
        let go_rx = Mutex::new(go_rx);
        let sequencer = Sequencer::builder()
            .workflow(Signup::default())
            .action(async_action(
                "remote",
                ThreadDispatcher::new("remote-call"),
                move |signup: &Signup, sequencer| {
                    // wait until the outer resume has returned
                    go_rx.lock().unwrap().recv().map_err(ActionError::new)?;
                    *signup.name.lock().unwrap() = Some("remote".to_string());
                    sequencer
                        .deliver(Control::Continue)
                        .map_err(ActionError::new)
                },
            ))
            .build();

        sequencer.resume(None).unwrap();
        assert_eq!(sequencer.status(), Status::Suspended);
        go_tx.send(()).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while sequencer.status() != Status::Completed && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(sequencer.status(), Status::Completed);
        let signup = sequencer.workflow::<Signup>().unwrap();
        assert_eq!(signup.name.lock().unwrap().as_deref(), Some("remote"));
    }
}
