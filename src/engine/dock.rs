use std::time::{Duration, Instant};

use crate::timer::TimerSlot;

pub const DOCK_QUIET_PERIOD: Duration = Duration::from_secs(3);

/// Navigation dock that hides itself after a quiet period in fullscreen.
#[derive(Debug, Clone)]
pub struct Dock {
    fullscreen: bool,
    visible: bool,
    hide: TimerSlot,
}

impl Default for Dock {
    fn default() -> Self {
        Self::new()
    }
}

impl Dock {
    pub fn new() -> Self {
        Self {
            fullscreen: false,
            visible: true,
            hide: TimerSlot::new(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn enter_fullscreen(&mut self, now: Instant) {
        self.fullscreen = true;
        self.show_temporarily(now);
    }

    pub fn exit_fullscreen(&mut self) {
        self.fullscreen = false;
        self.visible = true;
        self.hide.cancel();
    }

    pub fn toggle_fullscreen(&mut self, now: Instant) {
        if self.fullscreen {
            self.exit_fullscreen();
        } else {
            self.enter_fullscreen(now);
        }
    }

    /// Show the dock and restart the quiet period.
    pub fn show_temporarily(&mut self, now: Instant) {
        self.visible = true;
        if self.fullscreen {
            self.hide.schedule(now, DOCK_QUIET_PERIOD);
        }
    }

    /// Hide the dock if the quiet period has elapsed. Returns true on change.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.hide.take_if_due(now).is_none() || !self.fullscreen {
            return false;
        }
        let changed = self.visible;
        self.visible = false;
        changed
    }

    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        self.hide.remaining(now)
    }

    pub fn teardown(&mut self) {
        self.hide.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn hides_after_quiet_period_in_fullscreen() {
        let t0 = Instant::now();
        let mut dock = Dock::new();
        assert!(dock.is_visible());

        dock.enter_fullscreen(t0);
        assert!(!dock.poll(t0 + ms(2999)));
        assert!(dock.is_visible());
        assert!(dock.poll(t0 + ms(3000)));
        assert!(!dock.is_visible());
    }

    #[test]
    fn interaction_restarts_quiet_period() {
        let t0 = Instant::now();
        let mut dock = Dock::new();
        dock.enter_fullscreen(t0);

        dock.show_temporarily(t0 + ms(2000));
        dock.poll(t0 + ms(3000));
        assert!(dock.is_visible());
        dock.poll(t0 + ms(4999));
        assert!(dock.is_visible());
        dock.poll(t0 + ms(5000));
        assert!(!dock.is_visible());

        dock.show_temporarily(t0 + ms(6000));
        assert!(dock.is_visible());
    }

    #[test]
    fn exiting_fullscreen_forces_visible() {
        let t0 = Instant::now();
        let mut dock = Dock::new();
        dock.enter_fullscreen(t0);
        dock.poll(t0 + ms(3500));
        assert!(!dock.is_visible());

        dock.exit_fullscreen();
        assert!(dock.is_visible());
        assert_eq!(dock.next_wakeup(t0), None);
        dock.poll(t0 + ms(10_000));
        assert!(dock.is_visible());
    }

    #[test]
    fn never_hides_outside_fullscreen() {
        let t0 = Instant::now();
        let mut dock = Dock::new();
        dock.show_temporarily(t0);
        assert!(!dock.poll(t0 + ms(60_000)));
        assert!(dock.is_visible());
    }
}
