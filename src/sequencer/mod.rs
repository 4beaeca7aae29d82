//! Phase sequencer — the automated run state machine.
//!
//! One batch run walks a fixed sequence of timed phases, pauses for the
//! operator at the moulding prompt, and then loops the door cycle for as
//! many moulds as the operator wants:
//!
//! ```text
//!  IDLE ──start──▶ MIXER_PREP ──▶ SHREDDER ──▶ FEEDER ──▶ PUMP ──▶ MIX
//!    ▲                (2s)         (timer)      (timer)   (timer)  (timer)
//!    │                                                               │
//!    │              ┌──────────── AWAITING_MOULD ◀───────────────────┘
//!    │              │ continue          ▲
//!    │              ▼                   │
//!    │           DOOR_OPEN ──▶ DOOR_CLOSING (2s, loops back)
//!    │             (timer)
//!    │
//!    └── abort (any state) / acknowledge (Complete) — all outputs off
//! ```
//!
//! The mixer is switched on entering `MixerPrep` and is deliberately never
//! switched off by the sequence itself: the pulp needs continuous agitation
//! through the whole mould-repeat loop.  Only `all_off()` — on abort or on
//! run acknowledgement — stops it.
//!
//! The sequencer is purely polled: it advances only inside [`Sequencer::tick`],
//! comparing elapsed wall-clock time against the duration snapshot lent to it
//! at run start.  It never blocks and never spawns concurrent activity, so
//! phase boundaries are only as precise as the polling interval.

pub mod status;

use log::{info, warn};

use crate::app::ports::{Actuator, ActuatorPort};
use crate::config::{DOOR_CLOSE_MS, MIXER_PREP_MS, PhaseDurations, RELAY_SWAP_DELAY_MS};

pub use status::StatusSnapshot;

// ---------------------------------------------------------------------------
// Phase identity
// ---------------------------------------------------------------------------

/// One named step of the automated run.  Exactly one phase is current at
/// any time; every transition lives in the single `match` inside
/// [`Sequencer::tick`] or in one of the event handlers, so adding or
/// removing a phase is a compile-checked, single-point change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No run active; all outputs off.
    Idle,
    /// Mixer spinning up before any material is fed (fixed 2 s).
    MixerPrep,
    /// Paper shredder feeding pulp.
    ShredderRun,
    /// Starch feeder dosing binder.
    FeederRun,
    /// Water pump filling the mixing chamber.
    PumpRun,
    /// Main mixing time; mixer has been on since `MixerPrep`.
    MixRun,
    /// Waiting for the operator to place a mould and press ENTER.
    /// No timeout — the batch keeps mixing until someone acts.
    AwaitingMould,
    /// Door held open, dispensing into the mould.
    DoorOpen,
    /// Door travelling closed (fixed 2 s), then back to the mould prompt.
    DoorClosing,
    /// Run finished, waiting for acknowledgement.  The door loop never
    /// enters this on its own — see `DOOR_CLOSING` below.
    Complete,
}

impl Phase {
    /// Duration of this phase, or `None` for event-gated phases with no
    /// deadline.  Editable phases read from the lent duration snapshot.
    fn duration_ms(self, durations: &PhaseDurations) -> Option<u32> {
        match self {
            Phase::Idle | Phase::AwaitingMould | Phase::Complete => None,
            Phase::MixerPrep => Some(MIXER_PREP_MS),
            Phase::ShredderRun => Some(durations.shredder_ms),
            Phase::FeederRun => Some(durations.feeder_ms),
            Phase::PumpRun => Some(durations.pump_ms),
            Phase::MixRun => Some(durations.mixer_ms),
            Phase::DoorOpen => Some(durations.door_ms),
            Phase::DoorClosing => Some(DOOR_CLOSE_MS),
        }
    }
}

// ---------------------------------------------------------------------------
// Sequencer
// ---------------------------------------------------------------------------

/// The run state machine.  Constructed once at startup and re-entered via
/// [`start`](Sequencer::start) for each batch.
pub struct Sequencer {
    phase: Phase,
    /// Monotonic timestamp of the most recent transition.  Elapsed time is
    /// always measured from here, never accumulated across phases.
    phase_started_ms: u64,
    /// By-value snapshot of the durations, taken at run start.  Edits made
    /// while the run executes land in the store, not here.
    durations: PhaseDurations,
    running: bool,
}

impl Sequencer {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            phase_started_ms: 0,
            durations: PhaseDurations::default(),
            running: false,
        }
    }

    // ── External run events ───────────────────────────────────

    /// Begin a run: `Idle → MixerPrep`.  Takes the duration snapshot the
    /// whole run will use.  Ignored if a run is already active.
    pub fn start(
        &mut self,
        now_ms: u64,
        durations: PhaseDurations,
        hw: &mut impl ActuatorPort,
    ) {
        if self.running {
            warn!("start ignored: run already active in {:?}", self.phase);
            return;
        }

        // Range-checking is the store's job: the snapshot arrives already
        // clamped and is used verbatim for the whole run.
        self.durations = durations;
        self.running = true;

        hw.all_off();
        hw.set_actuator(Actuator::Mixer, true);
        self.transition(Phase::MixerPrep, now_ms);
    }

    /// Operator pressed ENTER at the moulding prompt:
    /// `AwaitingMould → DoorOpen`.  Ignored in any other phase.
    pub fn continue_moulding(&mut self, now_ms: u64, hw: &mut impl ActuatorPort) {
        if self.phase != Phase::AwaitingMould {
            return;
        }
        hw.set_actuator(Actuator::Door, true);
        self.transition(Phase::DoorOpen, now_ms);
    }

    /// Operator acknowledged a finished run: `Complete → Idle`.
    pub fn acknowledge_complete(&mut self, hw: &mut impl ActuatorPort) {
        if self.phase != Phase::Complete {
            return;
        }
        self.enter_idle(hw);
    }

    /// Emergency abort.  Recognised in *any* phase while a run is active:
    /// the run is discarded, every output is forced off, and the machine
    /// returns to `Idle`.  There is no resume.
    pub fn abort(&mut self, hw: &mut impl ActuatorPort) {
        if !self.running {
            return;
        }
        warn!("ABORT: run stopped in {:?}, shutting all outputs off", self.phase);
        self.enter_idle(hw);
    }

    // ── Polling ───────────────────────────────────────────────

    /// Advance the run by one polling tick.  Timed transitions fire when
    /// elapsed time reaches the phase duration; event-gated phases do
    /// nothing here.  Abort is *not* checked in this function — the host
    /// loop delivers it with priority before ticking (see `events`).
    pub fn tick(&mut self, now_ms: u64, hw: &mut impl ActuatorPort) {
        if !self.running {
            return;
        }

        let elapsed = now_ms.saturating_sub(self.phase_started_ms);
        let expired = self
            .phase
            .duration_ms(&self.durations)
            .is_some_and(|d| elapsed >= u64::from(d));

        match self.phase {
            // Event-gated phases: nothing to do until an external event.
            Phase::Idle | Phase::AwaitingMould | Phase::Complete => {}

            Phase::MixerPrep => {
                if expired {
                    hw.set_actuator(Actuator::Shredder, true);
                    self.transition(Phase::ShredderRun, now_ms);
                }
            }

            Phase::ShredderRun => {
                if expired {
                    hw.set_actuator(Actuator::Shredder, false);
                    hw.rest(RELAY_SWAP_DELAY_MS);
                    hw.set_actuator(Actuator::Feeder, true);
                    self.transition(Phase::FeederRun, now_ms);
                }
            }

            Phase::FeederRun => {
                if expired {
                    hw.set_actuator(Actuator::Feeder, false);
                    hw.rest(RELAY_SWAP_DELAY_MS);
                    hw.set_actuator(Actuator::Pump, true);
                    self.transition(Phase::PumpRun, now_ms);
                }
            }

            Phase::PumpRun => {
                if expired {
                    hw.set_actuator(Actuator::Pump, false);
                    // Mixer already on since MixerPrep.
                    self.transition(Phase::MixRun, now_ms);
                }
            }

            Phase::MixRun => {
                if expired {
                    // Keep the mixer running through the mould loop.
                    self.transition(Phase::AwaitingMould, now_ms);
                }
            }

            Phase::DoorOpen => {
                if expired {
                    hw.set_actuator(Actuator::Door, false);
                    self.transition(Phase::DoorClosing, now_ms);
                }
            }

            Phase::DoorClosing => {
                if expired {
                    // Back to the prompt — the operator may mould as many
                    // times as the batch allows.  There is no automatic
                    // path to Complete from here.
                    self.transition(Phase::AwaitingMould, now_ms);
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a run is active (`false` only in `Idle`).
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The duration snapshot the active run is using.
    pub fn run_durations(&self) -> &PhaseDurations {
        &self.durations
    }

    /// Phase + timing snapshot for the status reporter.  Recomputed on
    /// demand each polling tick; `remaining_ms` saturates at zero and is
    /// `None` for open-ended phases.
    pub fn status(&self, now_ms: u64) -> StatusSnapshot {
        let elapsed_ms = if self.running {
            now_ms.saturating_sub(self.phase_started_ms)
        } else {
            0
        };
        let remaining_ms = self
            .phase
            .duration_ms(&self.durations)
            .map(|d| u64::from(d).saturating_sub(elapsed_ms));
        StatusSnapshot {
            phase: self.phase,
            elapsed_ms,
            remaining_ms,
        }
    }

    /// Force an immediate transition (debug / test tooling only — normal
    /// operation goes through the event handlers and `tick`).
    pub fn force_phase(&mut self, phase: Phase, now_ms: u64) {
        self.running = phase != Phase::Idle;
        self.transition(phase, now_ms);
    }

    // ── Internal ──────────────────────────────────────────────

    fn transition(&mut self, next: Phase, now_ms: u64) {
        info!("phase: {:?} -> {:?}", self.phase, next);
        self.phase = next;
        self.phase_started_ms = now_ms;
    }

    fn enter_idle(&mut self, hw: &mut impl ActuatorPort) {
        hw.all_off();
        self.running = false;
        info!("phase: {:?} -> Idle (run ended)", self.phase);
        self.phase = Phase::Idle;
    }
}
