//! Cancellable deadlines polled from the event loop.
//!
//! A [`TimerSlot`] holds at most one pending deadline. Scheduling always
//! replaces whatever was pending, so a stale deadline can never fire after
//! its owner has moved on. Owners cancel their slots on teardown.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerSlot {
    deadline: Option<Instant>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm the slot to fire `delay` after `now`, dropping any pending deadline.
    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn schedule_at(&mut self, deadline: Instant) {
        self.deadline = Some(deadline);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Disarm and return the deadline if it has passed.
    pub fn take_if_due(&mut self, now: Instant) -> Option<Instant> {
        match self.deadline {
            Some(deadline) if deadline <= now => self.deadline.take(),
            _ => None,
        }
    }

    /// Time left until the slot fires, zero if overdue.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

/// Earliest of several optional wakeups.
pub fn earliest(wakeups: impl IntoIterator<Item = Option<Duration>>) -> Option<Duration> {
    wakeups.into_iter().flatten().min()
}
