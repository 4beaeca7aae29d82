//! Polled button debouncer.
//!
//! The panel buttons are mechanical switches on plain GPIOs; the host loop
//! samples them every control tick and feeds the raw level in here.  An
//! edge is reported only after the level has been stable for the debounce
//! window, so contact bounce never produces spurious presses.
//!
//! The debounced *level* is also exposed: the emergency-stop chord is
//! "all three buttons held", which is a level question, not an edge one.

use crate::config::DEBOUNCE_MS;

/// A debounced edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEdge {
    Pressed,
    Released,
}

/// Debounce state for one button.
pub struct DebouncedButton {
    /// Debounced level (true = pressed).
    stable: bool,
    /// Most recent raw sample.
    last_raw: bool,
    /// When the raw level last changed.
    last_change_ms: u64,
}

impl DebouncedButton {
    pub fn new() -> Self {
        Self {
            stable: false,
            last_raw: false,
            last_change_ms: 0,
        }
    }

    /// Feed one raw sample.  Returns the edge if the debounced level
    /// changed on this sample.
    pub fn update(&mut self, pressed: bool, now_ms: u64) -> Option<ButtonEdge> {
        if pressed != self.last_raw {
            self.last_raw = pressed;
            self.last_change_ms = now_ms;
            return None;
        }

        let held_for = now_ms.saturating_sub(self.last_change_ms);
        if pressed != self.stable && held_for >= u64::from(DEBOUNCE_MS) {
            self.stable = pressed;
            return Some(if pressed {
                ButtonEdge::Pressed
            } else {
                ButtonEdge::Released
            });
        }
        None
    }

    /// Debounced level.
    pub fn is_pressed(&self) -> bool {
        self.stable
    }
}

impl Default for DebouncedButton {
    fn default() -> Self {
        Self::new()
    }
}
