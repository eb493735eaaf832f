//! Run log of executed actions.
//!
//! Every action execution appends one entry. The log is never pruned, so it
//! reflects the exact order in which actions ran.

use super::control::Control;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single action execution.
///
/// # Example
///
/// ```rust
/// use stepline::core::{Control, LogEntry};
///
/// let entry = LogEntry::new("fetch profile", Control::Continue, 0);
/// assert_eq!(entry.action, "fetch profile");
/// assert_eq!(entry.signal, Control::Continue);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Name of the action that ran
    pub action: String,
    /// Signal the action produced (`fail` when it raised an error)
    pub signal: Control,
    /// Index of the action in the sequencer's list
    pub position: usize,
    /// When the action finished
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// Create an entry stamped with the current time.
    pub fn new(action: impl Into<String>, signal: Control, position: usize) -> Self {
        Self {
            action: action.into(),
            signal,
            position,
            timestamp: Utc::now(),
        }
    }
}

/// Ordered, append-only log of action executions.
///
/// # Example
///
/// ```rust
/// use stepline::core::{Control, LogEntry, RunLog};
///
/// let mut log = RunLog::new();
/// log.push(LogEntry::new("A", Control::Continue, 0));
/// log.push(LogEntry::new("B", Control::Suspend, 1));
///
/// assert_eq!(log.action_names(), vec!["A", "B"]);
/// assert_eq!(log.signals(), vec![Control::Continue, Control::Suspend]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunLog {
    entries: Vec<LogEntry>,
}

impl RunLog {
    /// Create a new empty log.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an entry.
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// Get all entries in execution order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Names of the executed actions, in order.
    pub fn action_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.action.as_str()).collect()
    }

    /// Signals produced by the executed actions, in order.
    pub fn signals(&self) -> Vec<Control> {
        self.entries.iter().map(|e| e.signal).collect()
    }

    /// Most recent entry, if any.
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Time elapsed between the first and last entry.
    ///
    /// Returns `None` for an empty log.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.entries.first()?, self.entries.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }
}

impl<'a> IntoIterator for &'a RunLog {
    type Item = &'a LogEntry;
    type IntoIter = std::slice::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_log_is_empty() {
        let log = RunLog::new();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
        assert!(log.last().is_none());
        assert!(log.duration().is_none());
    }

    #[test]
    fn push_preserves_order() {
        let mut log = RunLog::new();
        log.push(LogEntry::new("first", Control::Continue, 0));
        log.push(LogEntry::new("second", Control::Continue, 1));
        log.push(LogEntry::new("third", Control::Stop, 2));

        assert_eq!(log.action_names(), vec!["first", "second", "third"]);
        assert_eq!(
            log.entries().iter().map(|e| e.position).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(log.last().map(|e| e.signal), Some(Control::Stop));
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let mut log = RunLog::new();
        log.push(LogEntry::new("start", Control::Continue, 0));

        std::thread::sleep(Duration::from_millis(10));

        log.push(LogEntry::new("end", Control::Continue, 1));

        let duration = log.duration().unwrap();
        assert!(duration >= Duration::from_millis(10));
    }

    #[test]
    fn single_entry_has_duration_zero() {
        let mut log = RunLog::new();
        log.push(LogEntry::new("only", Control::Continue, 0));

        assert_eq!(log.duration(), Some(Duration::from_secs(0)));
    }

    #[test]
    fn log_serializes_correctly() {
        let mut log = RunLog::new();
        log.push(LogEntry::new("A", Control::Continue, 0));
        log.push(LogEntry::new("B", Control::Fail, 1));

        let json = serde_json::to_string(&log).unwrap();
        let deserialized: RunLog = serde_json::from_str(&json).unwrap();

        assert_eq!(log, deserialized);
    }

    #[test]
    fn iterates_by_reference() {
        let mut log = RunLog::new();
        log.push(LogEntry::new("A", Control::Continue, 0));

        let names: Vec<&str> = (&log).into_iter().map(|e| e.action.as_str()).collect();
        assert_eq!(names, vec!["A"]);
    }
}
