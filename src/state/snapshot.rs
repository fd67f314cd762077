//! Copy state snapshot: pure transitions, no I/O.
//!
//! Every change to the observable copy state goes through
//! [`CopyState::apply`], which returns a fresh snapshot. The adapter
//! publishes whole snapshots so readers never see a half-updated state.

use std::collections::VecDeque;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::time::Instant;

use crate::writer::CopyValue;

/// A successfully copied value.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub value: CopyValue,
    /// Unix epoch milliseconds when the copy finished.
    pub timestamp: u64,
    /// Monotonic instant of the same moment, for recency checks.
    pub copied_at: Instant,
}

impl HistoryEntry {
    pub fn now(value: CopyValue) -> Self {
        Self {
            value,
            timestamp: epoch_millis(),
            copied_at: Instant::now(),
        }
    }
}

/// Current time as Unix epoch milliseconds.
pub(crate) fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Transitions of the copy state machine.
#[derive(Debug, Clone)]
pub enum CopyEvent {
    /// A copy call began.
    Started,
    /// The write of copy call `attempt` finished.
    Succeeded {
        attempt: u64,
        entry: HistoryEntry,
        keep_history: bool,
    },
    /// The write of copy call `attempt` failed.
    Failed { attempt: u64 },
    /// The reset delay scheduled by copy call `attempt` elapsed.
    ResetElapsed { attempt: u64 },
}

/// Observable copy state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CopyState {
    /// True while a copy is in flight and until its reset delay elapses.
    pub is_copying: bool,
    pub last_copied: Option<HistoryEntry>,
    /// Most recent first. Only filled when history is enabled.
    pub history: VecDeque<HistoryEntry>,
    /// Successful copies.
    pub copy_count: u64,
    /// Copy calls started. Only the latest one owns the flag and
    /// `last_copied`.
    pub attempts: u64,
    /// Resets that cleared the in-flight flag.
    pub resets: u64,
}

impl CopyState {
    pub fn apply(&self, event: CopyEvent) -> CopyState {
        let mut next = self.clone();
        match event {
            CopyEvent::Started => {
                next.is_copying = true;
                next.attempts += 1;
            }
            CopyEvent::Succeeded {
                attempt,
                entry,
                keep_history,
            } => {
                if keep_history {
                    next.history.push_front(entry.clone());
                }
                if attempt == next.attempts {
                    next.last_copied = Some(entry);
                }
                next.copy_count += 1;
            }
            CopyEvent::Failed { attempt } => {
                if attempt == next.attempts {
                    next.is_copying = false;
                }
            }
            CopyEvent::ResetElapsed { attempt } => {
                // A newer call owns the flag now.
                if attempt == next.attempts && next.is_copying {
                    next.is_copying = false;
                    next.resets += 1;
                }
            }
        }
        next
    }

    /// Whether the last copy finished less than `reset_delay` before `now`.
    pub fn has_copied_recently(&self, now: Instant, reset_delay: Duration) -> bool {
        self.last_copied
            .as_ref()
            .is_some_and(|entry| now.saturating_duration_since(entry.copied_at) < reset_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str) -> HistoryEntry {
        HistoryEntry::now(CopyValue::from(text))
    }

    fn succeeded(attempt: u64, text: &str, keep_history: bool) -> CopyEvent {
        CopyEvent::Succeeded {
            attempt,
            entry: entry(text),
            keep_history,
        }
    }

    #[test]
    fn started_sets_flag_and_counts_attempt() {
        let s = CopyState::default().apply(CopyEvent::Started);
        assert!(s.is_copying);
        assert_eq!(s.attempts, 1);
        assert_eq!(s.copy_count, 0);
    }

    #[test]
    fn success_records_entry_and_keeps_flag() {
        let s = CopyState::default()
            .apply(CopyEvent::Started)
            .apply(succeeded(1, "a", false));
        assert!(s.is_copying);
        assert_eq!(s.copy_count, 1);
        assert_eq!(s.last_copied.unwrap().value, CopyValue::from("a"));
        assert!(s.history.is_empty());
    }

    #[test]
    fn history_is_most_recent_first() {
        let s = CopyState::default()
            .apply(CopyEvent::Started)
            .apply(succeeded(1, "a", true))
            .apply(CopyEvent::Started)
            .apply(succeeded(2, "b", true));
        let values: Vec<_> = s.history.iter().map(|e| e.value.clone()).collect();
        assert_eq!(values, vec![CopyValue::from("b"), CopyValue::from("a")]);
    }

    #[test]
    fn failure_clears_flag_without_recording() {
        let s = CopyState::default()
            .apply(CopyEvent::Started)
            .apply(CopyEvent::Failed { attempt: 1 });
        assert!(!s.is_copying);
        assert!(s.last_copied.is_none());
        assert_eq!(s.copy_count, 0);
    }

    #[test]
    fn reset_for_latest_attempt_clears_flag() {
        let s = CopyState::default()
            .apply(CopyEvent::Started)
            .apply(succeeded(1, "a", false))
            .apply(CopyEvent::ResetElapsed { attempt: 1 });
        assert!(!s.is_copying);
        assert_eq!(s.resets, 1);
    }

    #[test]
    fn stale_reset_is_ignored() {
        let s = CopyState::default()
            .apply(CopyEvent::Started)
            .apply(succeeded(1, "a", false))
            .apply(CopyEvent::Started)
            .apply(CopyEvent::ResetElapsed { attempt: 1 });
        assert!(s.is_copying);
        assert_eq!(s.resets, 0);
    }

    #[test]
    fn late_success_of_older_call_keeps_newer_value() {
        let s = CopyState::default()
            .apply(CopyEvent::Started)
            .apply(CopyEvent::Started)
            .apply(succeeded(2, "b", true))
            .apply(succeeded(1, "a", true));
        assert!(s.is_copying);
        assert_eq!(s.last_copied.unwrap().value, CopyValue::from("b"));
        assert_eq!(s.copy_count, 2);
        assert_eq!(s.history.len(), 2);
    }

    #[test]
    fn late_failure_of_older_call_keeps_flag() {
        let s = CopyState::default()
            .apply(CopyEvent::Started)
            .apply(CopyEvent::Started)
            .apply(succeeded(2, "b", false))
            .apply(CopyEvent::Failed { attempt: 1 });
        assert!(s.is_copying);
        assert_eq!(s.last_copied.unwrap().value, CopyValue::from("b"));
    }

    #[test]
    fn apply_leaves_previous_snapshot_intact() {
        let before = CopyState::default();
        let after = before.apply(CopyEvent::Started);
        assert!(!before.is_copying);
        assert!(after.is_copying);
    }

    #[test]
    fn recency_follows_reset_delay() {
        let e = entry("a");
        let at = e.copied_at;
        let s = CopyState {
            last_copied: Some(e),
            ..CopyState::default()
        };
        let delay = Duration::from_millis(2000);
        assert!(s.has_copied_recently(at + Duration::from_millis(1999), delay));
        assert!(!s.has_copied_recently(at + delay, delay));
        assert!(!CopyState::default().has_copied_recently(at, delay));
    }
}
