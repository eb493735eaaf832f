//! Sequencer that executes actions one at a time.

use super::action::{Action, ActionError};
use super::error::EngineError;
use crate::builder::{SequencerBuilder, StartPolicy};
use crate::core::{Control, LogEntry, RunGuard, RunLog, RunPermit, Status};
use crate::report::RunReport;
use chrono::{DateTime, Utc};
use std::any::{type_name, Any};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, debug_span, error, info, warn};
use uuid::Uuid;

/// Type-erased workflow payload attached to a sequencer.
pub(crate) type Workflow = Arc<dyn Any + Send + Sync>;

/// Mutable part of a sequencer. Only locked briefly, never across a callback.
#[derive(Debug)]
struct Progress {
    cursor: usize,
    status: Status,
    log: RunLog,
    last_error: Option<ActionError>,
    /// Decision delivered while a call was in flight.
    parked: Option<Control>,
    updated_at: DateTime<Utc>,
}

/// Executes an ordered list of actions, pausing and resuming on request.
///
/// The action list is fixed at construction. All state changes happen
/// inside [`resume`](Self::resume), which runs at most once at a time per
/// instance.
///
/// # Example
///
/// ```rust
/// use stepline::core::{Control, Status};
/// use stepline::engine::{action, Sequencer};
///
/// let sequencer = Sequencer::new(vec![
///     action("ask for name", |_| Ok(Control::Suspend)),
///     action("greet", |_| Ok(Control::Continue)),
/// ]);
///
/// sequencer.resume(None).unwrap();
/// assert_eq!(sequencer.status(), Status::Suspended);
///
/// sequencer.resume(Some(Control::Continue)).unwrap();
/// assert_eq!(sequencer.status(), Status::Completed);
/// assert_eq!(sequencer.log().action_names(), vec!["ask for name", "greet"]);
/// ```
pub struct Sequencer {
    id: Uuid,
    label: Option<String>,
    created_at: DateTime<Utc>,
    policy: StartPolicy,
    actions: Vec<Action>,
    workflow: Option<Workflow>,
    guard: RunGuard,
    progress: Mutex<Progress>,
}

impl Sequencer {
    /// Create a sequencer over `actions` with default settings.
    ///
    /// Use [`SequencerBuilder`] to attach a workflow payload or change the
    /// start policy.
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Arc<Self> {
        SequencerBuilder::new().actions(actions).build()
    }

    /// Start configuring a sequencer.
    pub fn builder() -> SequencerBuilder {
        SequencerBuilder::new()
    }

    pub(crate) fn from_parts(
        actions: Vec<Action>,
        workflow: Option<Workflow>,
        policy: StartPolicy,
        label: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            label,
            created_at: now,
            policy,
            actions,
            workflow,
            guard: RunGuard::new(),
            progress: Mutex::new(Progress {
                cursor: 0,
                status: Status::Created,
                log: RunLog::new(),
                last_error: None,
                parked: None,
                updated_at: now,
            }),
        }
    }

    /// Advance the sequence.
    ///
    /// `decision` unblocks a pending suspension and must be `None` otherwise.
    /// A decision other than [`Control::Continue`] is applied without running
    /// any further action.
    ///
    /// Returns `Ok(())` when the loop stops for any ordinary reason
    /// (exhaustion, suspend, stop, or a `fail` signal). Returns an error when
    /// the call itself is invalid or an action raised an error.
    pub fn resume(self: &Arc<Self>, decision: Option<Control>) -> Result<(), EngineError> {
        let span = debug_span!("resume", sequencer = %self.id, decision = ?decision);
        let _entered = span.enter();

        let Some(permit) = self.guard.try_acquire() else {
            warn!("resume rejected: sequencer is already running");
            return Err(EngineError::AlreadyRunning);
        };

        self.drive(permit, decision)
    }

    /// Deliver a decision from a completion handler.
    ///
    /// When no `resume` is in flight this is `resume(Some(decision))`. While
    /// another call holds the sequencer, the decision is parked instead and
    /// applied by that call before it returns, so work that finishes before
    /// its action has suspended is not lost.
    ///
    /// One decision can be parked at a time. A second one is rejected with
    /// [`EngineError::AlreadyRunning`], except `fail`, which replaces it.
    pub fn deliver(self: &Arc<Self>, decision: Control) -> Result<(), EngineError> {
        let span = debug_span!("deliver", sequencer = %self.id, %decision);
        let _entered = span.enter();

        loop {
            if let Some(permit) = self.guard.try_acquire() {
                return self.drive(permit, Some(decision));
            }

            let mut progress = self.progress();
            // the holder releases under this lock, so a held guard here is
            // guaranteed to look at the parked slot before letting go
            if !self.guard.is_held() {
                continue;
            }
            if progress.parked.is_some() && decision != Control::Fail {
                warn!("decision rejected: another decision is already parked");
                return Err(EngineError::AlreadyRunning);
            }
            progress.parked = Some(decision);
            debug!("decision parked until the running call settles");
            return Ok(());
        }
    }

    /// Apply `decision`, then any decision parked meanwhile, and release.
    fn drive(
        self: &Arc<Self>,
        permit: RunPermit<'_>,
        decision: Option<Control>,
    ) -> Result<(), EngineError> {
        let mut outcome = self.advance(decision);

        loop {
            let mut progress = self.progress();
            let Some(parked) = progress.parked.take() else {
                drop(permit);
                return outcome;
            };
            drop(progress);

            debug!(decision = %parked, "applying parked decision");
            match self.advance(Some(parked)) {
                Ok(()) => {}
                Err(err @ EngineError::Action { .. }) => outcome = outcome.and(Err(err)),
                Err(err) => debug!(decision = %parked, error = %err, "parked decision dropped"),
            }
        }
    }

    fn advance(self: &Arc<Self>, decision: Option<Control>) -> Result<(), EngineError> {
        let status = self.status();
        if let Err(err) = admit(status, decision, self.policy) {
            warn!(%status, error = %err, "resume rejected");
            return Err(err);
        }

        if let Some(settled) = decision.and_then(Status::after) {
            self.settle(settled);
            info!(status = %settled, "decision applied");
            return Ok(());
        }

        self.progress().status = Status::Running;
        self.run()
    }

    fn run(self: &Arc<Self>) -> Result<(), EngineError> {
        while let Some((position, action)) = self.next_action() {
            debug!(action = action.name(), position, "executing action");

            let invocation = Invocation::new(self, action, position);
            let result = action.invoke(self);
            invocation.finish();

            match result {
                Ok(signal) => {
                    let settled = Status::after(signal);
                    {
                        let mut progress = self.progress();
                        progress
                            .log
                            .push(LogEntry::new(action.name(), signal, position));
                        if let Some(status) = settled {
                            progress.status = status;
                        }
                        progress.updated_at = Utc::now();
                    }
                    if let Some(status) = settled {
                        info!(
                            action = action.name(),
                            %signal,
                            %status,
                            "sequence paused or ended"
                        );
                        return Ok(());
                    }
                }
                Err(error) => {
                    warn!(action = action.name(), %error, "action failed");
                    {
                        let mut progress = self.progress();
                        progress
                            .log
                            .push(LogEntry::new(action.name(), Control::Fail, position));
                        progress.last_error = Some(error.clone());
                        progress.status = Status::Failed;
                        progress.updated_at = Utc::now();
                    }
                    return Err(EngineError::Action {
                        action: action.name().to_string(),
                        source: error,
                    });
                }
            }
        }

        self.settle(Status::Completed);
        info!(actions = self.actions.len(), "sequence completed");
        Ok(())
    }

    /// Claim the action under the cursor, moving the cursor past it.
    fn next_action(&self) -> Option<(usize, &Action)> {
        let mut progress = self.progress();
        let position = progress.cursor;
        let action = self.actions.get(position)?;
        progress.cursor += 1;
        Some((position, action))
    }

    fn settle(&self, status: Status) {
        let mut progress = self.progress();
        progress.status = status;
        progress.updated_at = Utc::now();
    }

    fn progress(&self) -> MutexGuard<'_, Progress> {
        self.progress.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attach an error to the sequencer.
    ///
    /// Intended for callbacks that report [`Control::Fail`] and for
    /// asynchronous work that is about to deliver a `fail` decision. Ignored
    /// once the sequencer is terminal; returns whether the error was stored.
    pub fn record_error(&self, error: ActionError) -> bool {
        let mut progress = self.progress();
        if progress.status.is_terminal() {
            return false;
        }
        progress.last_error = Some(error);
        progress.updated_at = Utc::now();
        true
    }

    pub fn status(&self) -> Status {
        self.progress().status
    }

    /// Snapshot of the run log.
    pub fn log(&self) -> RunLog {
        self.progress().log.clone()
    }

    pub fn last_error(&self) -> Option<ActionError> {
        self.progress().last_error.clone()
    }

    /// Index of the next action to execute.
    pub fn cursor(&self) -> usize {
        self.progress().cursor
    }

    /// Number of actions in the sequence.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn action_names(&self) -> Vec<&str> {
        self.actions.iter().map(Action::name).collect()
    }

    /// Check whether a `resume` call is in flight.
    pub fn is_running(&self) -> bool {
        self.guard.is_held()
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn start_policy(&self) -> StartPolicy {
        self.policy
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.progress().updated_at
    }

    /// Borrow the workflow payload as `T`.
    ///
    /// Fails with [`EngineError::AdaptationFailed`] when no payload was
    /// attached or it has another type.
    pub fn workflow<T>(&self) -> Result<Arc<T>, EngineError>
    where
        T: Any + Send + Sync,
    {
        self.workflow
            .clone()
            .and_then(|workflow| workflow.downcast::<T>().ok())
            .ok_or(EngineError::AdaptationFailed {
                expected: type_name::<T>(),
            })
    }

    /// Capture a serializable report of the current progress.
    pub fn report(&self) -> RunReport {
        let progress = self.progress();
        RunReport {
            id: self.id,
            label: self.label.clone(),
            status: progress.status,
            cursor: progress.cursor,
            total_actions: self.actions.len(),
            log: progress.log.clone(),
            last_error: progress.last_error.as_ref().map(ToString::to_string),
            created_at: self.created_at,
            updated_at: progress.updated_at,
            generated_at: Utc::now(),
        }
    }
}

impl fmt::Debug for Sequencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let progress = self.progress();
        f.debug_struct("Sequencer")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("status", &progress.status)
            .field("cursor", &progress.cursor)
            .field("actions", &self.actions)
            .finish_non_exhaustive()
    }
}

/// Marks the sequencer failed if an action unwinds instead of returning.
struct Invocation<'a> {
    sequencer: &'a Sequencer,
    action: &'a Action,
    position: usize,
    finished: bool,
}

impl<'a> Invocation<'a> {
    fn new(sequencer: &'a Sequencer, action: &'a Action, position: usize) -> Self {
        Self {
            sequencer,
            action,
            position,
            finished: false,
        }
    }

    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for Invocation<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        let name = self.action.name();
        error!(action = name, position = self.position, "action panicked");
        let mut progress = self.sequencer.progress();
        progress
            .log
            .push(LogEntry::new(name, Control::Fail, self.position));
        progress.last_error = Some(ActionError::msg(format!("action `{name}` panicked")));
        progress.status = Status::Failed;
        progress.updated_at = Utc::now();
    }
}

/// Decide whether a resume with `decision` is allowed from `status` (pure).
fn admit(
    status: Status,
    decision: Option<Control>,
    policy: StartPolicy,
) -> Result<(), EngineError> {
    if status.is_terminal() {
        return Err(EngineError::Terminated { status });
    }
    if status == Status::Running {
        return Err(EngineError::AlreadyRunning);
    }

    let awaiting = match status {
        Status::Suspended => true,
        Status::Created => policy == StartPolicy::Explicit,
        _ => false,
    };

    match (awaiting, decision) {
        (true, None) => Err(EngineError::DecisionRequired { status }),
        (false, Some(decision)) => Err(EngineError::DecisionUnexpected { status, decision }),
        _ => Ok(()),
    }
}
