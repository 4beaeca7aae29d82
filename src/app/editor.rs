//! Duration edit session — the panel's timer adjustment UI state.
//!
//! The operator scrolls to a timer, nudges it up or down one second per
//! button press, and confirms.  The editor holds a scratch value only;
//! nothing is persisted (or even visible to the rest of the system) until
//! [`confirm`](DurationEditor::confirm) hands the result back to the
//! service, which routes it through the duration store.  Cancelling simply
//! drops the editor.

use crate::config::{EDIT_STEP_MS, TimerField, clamp_duration};

/// An in-progress edit of one phase timer.
#[derive(Debug, Clone, Copy)]
pub struct DurationEditor {
    field: TimerField,
    value_ms: u32,
}

impl DurationEditor {
    /// Open an edit session on `field`, seeded with its current value.
    pub fn begin(field: TimerField, current_ms: u32) -> Self {
        Self {
            field,
            value_ms: clamp_duration(current_ms),
        }
    }

    /// The field being edited.
    pub fn field(&self) -> TimerField {
        self.field
    }

    /// The scratch value, always in range.
    pub fn value_ms(&self) -> u32 {
        self.value_ms
    }

    /// One UP press: +1 s, pinned at the maximum.
    pub fn increment(&mut self) {
        self.value_ms = clamp_duration(self.value_ms.saturating_add(EDIT_STEP_MS));
    }

    /// One DOWN press: -1 s, pinned at the minimum.
    pub fn decrement(&mut self) {
        self.value_ms = clamp_duration(self.value_ms.saturating_sub(EDIT_STEP_MS));
    }

    /// Close the session, yielding the field and final value for the
    /// service to persist.
    pub fn confirm(self) -> (TimerField, u32) {
        (self.field, self.value_ms)
    }
}
