use std::time::{Duration, Instant};

use crate::timer::TimerSlot;

pub const SLIDER_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderState {
    Idle,
    Dragging { pending: u32 },
}

/// Couples the continuous page slider to discrete navigation.
///
/// While dragging, the displayed value follows the pointer and a navigation is
/// committed only when the pointer has rested for [`SLIDER_DEBOUNCE`] or is
/// released.
#[derive(Debug, Clone)]
pub struct SliderSync {
    state: SliderState,
    debounce: TimerSlot,
    // Last page committed by the debounce during the current drag.
    committed: Option<u32>,
}

impl Default for SliderSync {
    fn default() -> Self {
        Self::new()
    }
}

impl SliderSync {
    pub fn new() -> Self {
        Self {
            state: SliderState::Idle,
            debounce: TimerSlot::new(),
            committed: None,
        }
    }

    pub fn state(&self) -> SliderState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, SliderState::Dragging { .. })
    }

    pub fn begin_drag(&mut self, now: Instant, value: u32) {
        self.committed = None;
        self.drag_to(now, value);
    }

    pub fn drag_to(&mut self, now: Instant, value: u32) {
        self.state = SliderState::Dragging { pending: value };
        self.debounce.schedule(now, SLIDER_DEBOUNCE);
    }

    /// End the drag and return the page to commit right away, or `None` when
    /// the debounce already committed that page.
    pub fn release(&mut self, value: u32) -> Option<u32> {
        self.debounce.cancel();
        self.state = SliderState::Idle;
        let committed = self.committed.take();
        (committed != Some(value)).then_some(value)
    }

    /// Page to navigate to if the debounce has elapsed mid-drag.
    pub fn poll(&mut self, now: Instant) -> Option<u32> {
        self.debounce.take_if_due(now)?;
        match self.state {
            SliderState::Dragging { pending } => {
                self.committed = Some(pending);
                Some(pending)
            }
            SliderState::Idle => None,
        }
    }

    pub fn display_value(&self, current_page: u32) -> u32 {
        match self.state {
            SliderState::Dragging { pending } => pending,
            SliderState::Idle => current_page,
        }
    }

    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        self.debounce.remaining(now)
    }

    pub fn teardown(&mut self) {
        self.debounce.cancel();
        self.state = SliderState::Idle;
        self.committed = None;
    }
}
