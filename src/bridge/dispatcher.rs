//! Execution contexts that run scheduled work.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use tracing::error;

/// Unit of work handed to a dispatcher.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs jobs later, on an execution context of the dispatcher's choosing.
///
/// `dispatch` must not run the job before returning.
pub trait Dispatcher: Send + Sync {
    fn dispatch(&self, job: Job);
}

impl<D: Dispatcher + ?Sized> Dispatcher for Arc<D> {
    fn dispatch(&self, job: Job) {
        (**self).dispatch(job)
    }
}

/// FIFO queue drained explicitly by the host, like a UI main queue.
///
/// Clones share the same queue, so one handle can be given to actions while
/// the host keeps another to drain it.
///
/// # Example
///
/// ```rust
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use stepline::bridge::{Dispatcher, QueueDispatcher};
///
/// let queue = QueueDispatcher::new();
/// let ran = Arc::new(AtomicBool::new(false));
///
/// let flag = Arc::clone(&ran);
/// queue.dispatch(Box::new(move || flag.store(true, Ordering::SeqCst)));
/// assert!(!ran.load(Ordering::SeqCst));
///
/// assert_eq!(queue.run_pending(), 1);
/// assert!(ran.load(Ordering::SeqCst));
/// ```
#[derive(Clone, Default)]
pub struct QueueDispatcher {
    queue: Arc<Mutex<VecDeque<Job>>>,
}

impl QueueDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the oldest queued job. Returns `false` if the queue was empty.
    pub fn run_next(&self) -> bool {
        // the lock is released before the job runs so it can enqueue more work
        let job = self.queue().pop_front();
        match job {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Run jobs until the queue is empty, including jobs enqueued meanwhile.
    ///
    /// Returns how many jobs ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }

    /// Number of jobs waiting to run.
    pub fn pending(&self) -> usize {
        self.queue().len()
    }

    fn queue(&self) -> MutexGuard<'_, VecDeque<Job>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Dispatcher for QueueDispatcher {
    fn dispatch(&self, job: Job) {
        self.queue().push_back(job);
    }
}

/// Runs every job on its own OS thread.
#[derive(Clone, Debug)]
pub struct ThreadDispatcher {
    name: String,
}

impl ThreadDispatcher {
    /// Create a dispatcher whose threads are named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for ThreadDispatcher {
    fn default() -> Self {
        Self::new("stepline-worker")
    }
}

impl Dispatcher for ThreadDispatcher {
    fn dispatch(&self, job: Job) {
        if let Err(err) = thread::Builder::new().name(self.name.clone()).spawn(job) {
            error!(thread = %self.name, error = %err, "failed to spawn worker thread; job dropped");
        }
    }
}

/// Runs jobs on a Tokio runtime's blocking pool.
#[cfg(feature = "tokio")]
#[derive(Clone, Debug)]
pub struct TokioDispatcher {
    handle: tokio::runtime::Handle,
}

#[cfg(feature = "tokio")]
impl TokioDispatcher {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Dispatcher bound to the runtime the caller is running on, if any.
    pub fn current() -> Option<Self> {
        tokio::runtime::Handle::try_current().ok().map(Self::new)
    }
}

#[cfg(feature = "tokio")]
impl Dispatcher for TokioDispatcher {
    fn dispatch(&self, job: Job) {
        // detached: completion is reported back through `resume`
        drop(self.handle.spawn_blocking(job));
    }
}
