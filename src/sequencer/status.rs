//! Status snapshots — a read-only view of the sequencer for reporting.
//!
//! Snapshots are plain values recomputed on demand; holding one never
//! blocks or perturbs the run.  The render helpers target the 20-column
//! character LCD on the control panel, so lines are `heapless` strings
//! truncated at 20 characters.

use core::fmt::Write as _;

use heapless::String;

use super::Phase;

/// Width of one display line.
pub const LINE_WIDTH: usize = 20;

/// One display line.
pub type Line = String<LINE_WIDTH>;

/// Point-in-time view of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Phase at the moment of the snapshot.
    pub phase: Phase,
    /// Time spent in that phase so far.  Zero while idle.
    pub elapsed_ms: u64,
    /// Time until the next timed transition, saturated at zero.
    /// `None` for phases with no deadline (idle, mould prompt, complete).
    pub remaining_ms: Option<u64>,
}

impl StatusSnapshot {
    /// Whole seconds until the next timed transition.
    pub fn remaining_secs(&self) -> Option<u64> {
        self.remaining_ms.map(|ms| ms / 1_000)
    }

    /// Top display line: the current phase.
    pub fn phase_line(&self) -> Line {
        let mut line = Line::new();
        match self.phase {
            Phase::AwaitingMould => {
                let _ = line.push_str("Add Mould & Press");
            }
            other => {
                let _ = write!(line, "Status: {}", phase_label(other));
            }
        }
        line
    }

    /// Bottom display line: countdown or operator prompt.
    pub fn detail_line(&self) -> Line {
        let mut line = Line::new();
        match (self.phase, self.remaining_secs()) {
            (Phase::AwaitingMould, _) => {
                let _ = line.push_str("ENTER to continue");
            }
            (Phase::Complete, _) => {
                let _ = line.push_str("Press ENTER");
            }
            (Phase::Idle, _) => {}
            (_, Some(secs)) => {
                let _ = write!(line, "Time Left: {secs}s");
            }
            (_, None) => {}
        }
        line
    }
}

/// Human-readable phase name, as shown on the panel.
pub fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "Idle",
        Phase::MixerPrep => "Mixer Prep",
        Phase::ShredderRun => "Paper Feed",
        Phase::FeederRun => "Starch Feed",
        Phase::PumpRun => "Water Pump",
        Phase::MixRun => "Mixing",
        Phase::AwaitingMould => "Add Mould",
        Phase::DoorOpen => "Door Open",
        Phase::DoorClosing => "Door Close",
        Phase::Complete => "Complete",
    }
}
