use std::time::{Duration, Instant};

use tracing::debug;

use crate::timer::TimerSlot;

pub const TICK_INTERVAL: Duration = Duration::from_secs(60);

/// Reading time accrued while the reading toggle is on.
#[derive(Debug, Clone, Default)]
pub struct ReadingSession {
    active: bool,
    accumulated_minutes: u64,
    session_start: Option<Instant>,
    tick: TimerSlot,
}

impl ReadingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn accumulated_minutes(&self) -> u64 {
        self.accumulated_minutes
    }

    pub fn session_start(&self) -> Option<Instant> {
        self.session_start
    }

    /// Flip the toggle; returns whether reading is now active.
    pub fn toggle(&mut self, now: Instant) -> bool {
        if self.active {
            self.pause(now);
        } else {
            self.start(now);
        }
        self.active
    }

    pub fn start(&mut self, now: Instant) {
        if self.active {
            return;
        }
        self.active = true;
        self.session_start = Some(now);
        self.tick.schedule(now, TICK_INTERVAL);
    }

    pub fn pause(&mut self, now: Instant) {
        if !self.active {
            return;
        }
        self.accrue(now);
        self.active = false;
        self.session_start = None;
        self.tick.cancel();
    }

    /// Run the minute tick if due. Returns the minutes added.
    pub fn poll(&mut self, now: Instant) -> u64 {
        if self.tick.take_if_due(now).is_none() {
            return 0;
        }
        let added = self.accrue(now);
        if let Some(start) = self.session_start {
            self.tick.schedule_at(start + TICK_INTERVAL);
        }
        added
    }

    // Whole minutes since the session start move into the total; the start
    // advances by exactly what was counted so the remainder carries over.
    fn accrue(&mut self, now: Instant) -> u64 {
        let Some(start) = self.session_start else {
            return 0;
        };
        let minutes = now.saturating_duration_since(start).as_secs() / 60;
        if minutes > 0 {
            self.accumulated_minutes += minutes;
            self.session_start = Some(start + Duration::from_secs(minutes * 60));
            debug!(minutes, total = self.accumulated_minutes, "reading time accrued");
        }
        minutes
    }

    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        self.tick.remaining(now)
    }

    pub fn teardown(&mut self) {
        self.tick.cancel();
    }
}

/// `round(current / total * 100)`, zero for an unloaded book.
pub fn progress_percent(current_page: u32, total_pages: u32) -> u32 {
    if total_pages == 0 {
        return 0;
    }
    ((current_page as f64 / total_pages as f64) * 100.0).round() as u32
}
