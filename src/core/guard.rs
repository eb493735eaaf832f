//! Single-flight guard for sequencer advancement.
//!
//! The guard is acquired without blocking. Failing to acquire it is an
//! ordinary outcome the caller reports immediately, never a reason to wait.

use std::sync::atomic::{AtomicBool, Ordering};

/// Exclusive, non-blocking access token.
///
/// # Example
///
/// ```rust
/// use stepline::core::RunGuard;
///
/// let guard = RunGuard::new();
///
/// let permit = guard.try_acquire().expect("guard is free");
/// assert!(guard.is_held());
/// assert!(guard.try_acquire().is_none());
///
/// drop(permit);
/// assert!(!guard.is_held());
/// ```
#[derive(Debug, Default)]
pub struct RunGuard {
    held: AtomicBool,
}

impl RunGuard {
    pub fn new() -> Self {
        Self {
            held: AtomicBool::new(false),
        }
    }

    /// Try to take the guard.
    ///
    /// Returns `None` if another holder already has it. The returned permit
    /// releases the guard when dropped, including during unwinding.
    pub fn try_acquire(&self) -> Option<RunPermit<'_>> {
        self.held
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| RunPermit { guard: self })
    }

    /// Check whether a permit is currently outstanding.
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

/// Proof of exclusive access, released on drop.
#[derive(Debug)]
#[must_use = "the guard is released as soon as the permit is dropped"]
pub struct RunPermit<'a> {
    guard: &'a RunGuard,
}

impl Drop for RunPermit<'_> {
    fn drop(&mut self) {
        self.guard.held.store(false, Ordering::Release);
    }
}
