//! Phase durations and timing constants
//!
//! The five operator-editable phase durations for the MouldBot sequence,
//! plus the fixed timing constants the sequencer and drivers share.
//! Edited values are persisted via the duration store (`crate::store`).

// ---------------------------------------------------------------------------
// Timer limits and fixed timing constants
// ---------------------------------------------------------------------------

/// Minimum accepted phase duration (1 second).
pub const MIN_TIMER_MS: u32 = 1_000;
/// Maximum accepted phase duration (5 minutes).
pub const MAX_TIMER_MS: u32 = 300_000;

/// Mixer spin-up time before material feeding begins (fixed, not editable).
pub const MIXER_PREP_MS: u32 = 2_000;
/// Door closing travel time (fixed, not editable).
pub const DOOR_CLOSE_MS: u32 = 2_000;

/// Settle pause after each relay command, lets the coil and supply rail
/// stabilise before a dependent command is issued.
pub const RELAY_SETTLE_MS: u32 = 50;
/// Extra quiet interval between switching one relay off and the next on
/// during phase hand-over.
pub const RELAY_SWAP_DELAY_MS: u32 = 100;

/// Button debounce window.
pub const DEBOUNCE_MS: u32 = 50;
/// Step size for duration edits (one second per button press).
pub const EDIT_STEP_MS: u32 = 1_000;

/// Polling interval of the main control loop.
pub const CONTROL_TICK_MS: u32 = 50;
/// Status snapshot refresh interval during a run.
pub const STATUS_TICK_MS: u32 = 1_000;

/// Clamp a duration into the legal `[MIN_TIMER_MS, MAX_TIMER_MS]` range.
///
/// Out-of-range values are silently clamped rather than rejected — this
/// matches the edit UI, where holding a button past the limit simply pins
/// the value at the limit.  Idempotent.
pub const fn clamp_duration(ms: u32) -> u32 {
    if ms < MIN_TIMER_MS {
        MIN_TIMER_MS
    } else if ms > MAX_TIMER_MS {
        MAX_TIMER_MS
    } else {
        ms
    }
}

// ---------------------------------------------------------------------------
// Editable phase durations
// ---------------------------------------------------------------------------

/// Identifies one of the five editable phase timers.
///
/// Also fixes the field order of the persisted record — see
/// [`TimerField::ALL`] and `crate::store`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TimerField {
    Feeder = 0,
    Shredder = 1,
    Pump = 2,
    Mixer = 3,
    Door = 4,
}

impl TimerField {
    /// All fields in persisted record order.
    pub const ALL: [TimerField; 5] = [
        TimerField::Feeder,
        TimerField::Shredder,
        TimerField::Pump,
        TimerField::Mixer,
        TimerField::Door,
    ];

    /// Short label for menus and logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::Feeder => "Starch",
            Self::Shredder => "Paper",
            Self::Pump => "Water",
            Self::Mixer => "Mixing",
            Self::Door => "Door",
        }
    }
}

/// The five phase durations, in milliseconds.
///
/// Owned by the duration store; a by-value copy is lent to the sequencer
/// at run start so that edits made mid-run never alter the deadline of the
/// phase currently executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDurations {
    /// Starch feeder on-time.
    pub feeder_ms: u32,
    /// Paper shredder on-time.
    pub shredder_ms: u32,
    /// Water pump on-time.
    pub pump_ms: u32,
    /// Main mixing time (after all material is in).
    pub mixer_ms: u32,
    /// Door open hold time per mould.
    pub door_ms: u32,
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            feeder_ms: 5_000,
            shredder_ms: 10_000,
            pump_ms: 8_000,
            mixer_ms: 30_000,
            door_ms: 5_000,
        }
    }
}

impl PhaseDurations {
    /// Read one field.
    pub fn get(&self, field: TimerField) -> u32 {
        match field {
            TimerField::Feeder => self.feeder_ms,
            TimerField::Shredder => self.shredder_ms,
            TimerField::Pump => self.pump_ms,
            TimerField::Mixer => self.mixer_ms,
            TimerField::Door => self.door_ms,
        }
    }

    /// Write one field, silently clamping into the legal range.
    pub fn set(&mut self, field: TimerField, ms: u32) {
        let ms = clamp_duration(ms);
        match field {
            TimerField::Feeder => self.feeder_ms = ms,
            TimerField::Shredder => self.shredder_ms = ms,
            TimerField::Pump => self.pump_ms = ms,
            TimerField::Mixer => self.mixer_ms = ms,
            TimerField::Door => self.door_ms = ms,
        }
    }

    /// Return a copy with every field clamped into the legal range.
    /// Applied on load so the sequencer never sees an out-of-range value,
    /// whatever ended up in storage.
    pub fn clamped(self) -> Self {
        Self {
            feeder_ms: clamp_duration(self.feeder_ms),
            shredder_ms: clamp_duration(self.shredder_ms),
            pump_ms: clamp_duration(self.pump_ms),
            mixer_ms: clamp_duration(self.mixer_ms),
            door_ms: clamp_duration(self.door_ms),
        }
    }
}
