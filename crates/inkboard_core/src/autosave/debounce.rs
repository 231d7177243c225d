//! Trailing-edge debounce state machine.
//!
//! Pure deadline bookkeeping, shared by every autosave sink. The host event
//! loop supplies `Instant`s; nothing here owns a timer thread.

use std::time::{Duration, Instant};

/// Default quiet interval before pending changes are flushed.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(200);

/// Tuning for one debounced sink.
#[derive(Debug, Clone, Copy)]
pub struct DebouncePolicy {
    /// Minimum duration with no new notifications before a flush runs.
    pub quiet_period: Duration,
}

impl Default for DebouncePolicy {
    fn default() -> Self {
        Self {
            quiet_period: DEFAULT_QUIET_PERIOD,
        }
    }
}

/// `Idle -> Pending{deadline} -> Idle` debounce machine.
///
/// Every notification re-arms the single deadline (trailing edge: the flush
/// waits for quiet, it does not fire on the first event of a burst).
#[derive(Debug, Clone, Copy)]
pub struct DebouncedSink {
    policy: DebouncePolicy,
    deadline: Option<Instant>,
}

impl DebouncedSink {
    pub fn new(policy: DebouncePolicy) -> Self {
        Self {
            policy,
            deadline: None,
        }
    }

    /// Records one observed mutation.
    ///
    /// Never blocks and never reads state; it only moves the deadline to
    /// `now + quiet_period`, cancelling any previously armed one.
    pub fn notify_changed(&mut self, now: Instant) {
        self.deadline = Some(now + self.policy.quiet_period);
    }

    /// Whether a pending flush exists (due or not).
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Whether the pending flush deadline has elapsed.
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Consumes a due deadline, returning whether the caller should flush.
    ///
    /// Transitions back to idle on `true`; the flush itself (and its
    /// success or failure) is the caller's business, so a failed write does
    /// not leave a stale deadline re-firing forever.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    /// Drops any pending deadline. Safe when idle.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
