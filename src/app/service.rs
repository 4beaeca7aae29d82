//! Application service — the command/event hub wiring ports to the domain.
//!
//! Single-threaded by construction: the host loop owns the service and
//! calls into it with explicit timestamps, so there is no interior locking
//! and tests can drive any interleaving deterministically.
//!
//! Responsibilities:
//! - enforce per-phase command acceptance (edits and manual toggles only
//!   while idle, continue only at the mould prompt, abort everywhere)
//! - take the duration snapshot at run start
//! - detect phase changes around every entry point and publish them
//! - persist timer edits synchronously before reporting them

use log::{info, warn};

use crate::app::commands::AppCommand;
use crate::app::events::AppEvent;
use crate::app::ports::{Actuator, ActuatorPort, EepromPort, EventSink};
use crate::error::Result;
use crate::sequencer::{Phase, Sequencer, StatusSnapshot};
use crate::store::DurationStore;

/// Orchestrates the sequencer, the duration store and the ports.
pub struct AppService {
    sequencer: Sequencer,
    /// Manual test-mode actuator states, valid only while idle.  Cleared
    /// whenever a run starts so the safety reset leaves no stale record.
    manual_on: [bool; Actuator::ALL.len()],
}

impl AppService {
    pub fn new() -> Self {
        Self {
            sequencer: Sequencer::new(),
            manual_on: [false; Actuator::ALL.len()],
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply one command.  Commands not valid in the current phase are
    /// logged and dropped, never queued.
    pub fn handle_command<S: EepromPort>(
        &mut self,
        cmd: AppCommand,
        now_ms: u64,
        hw: &mut impl ActuatorPort,
        store: &mut DurationStore<S>,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let before = self.sequencer.phase();

        match cmd {
            AppCommand::StartRun => {
                if self.sequencer.is_running() {
                    warn!("StartRun ignored: run already active");
                } else {
                    self.manual_on = [false; Actuator::ALL.len()];
                    self.sequencer.start(now_ms, store.snapshot(), hw);
                    sink.emit(&AppEvent::RunStarted);
                }
            }

            AppCommand::ContinueMoulding => {
                self.sequencer.continue_moulding(now_ms, hw);
            }

            AppCommand::Abort => {
                if self.sequencer.is_running() {
                    self.sequencer.abort(hw);
                    sink.emit(&AppEvent::RunAborted);
                }
            }

            AppCommand::AcknowledgeComplete => {
                let was_complete = self.sequencer.phase() == Phase::Complete;
                self.sequencer.acknowledge_complete(hw);
                if was_complete {
                    sink.emit(&AppEvent::RunAcknowledged);
                }
            }

            AppCommand::SetDuration { field, ms } => {
                if self.sequencer.is_running() {
                    warn!("SetDuration ignored while a run is active");
                } else {
                    store.set(field, ms)?;
                    sink.emit(&AppEvent::DurationChanged {
                        field,
                        ms: store.get(field),
                    });
                }
            }

            AppCommand::ToggleActuator(actuator) => {
                if self.sequencer.is_running() {
                    warn!("ToggleActuator ignored while a run is active");
                } else {
                    let idx = actuator as usize;
                    let on = !self.manual_on[idx];
                    self.manual_on[idx] = on;
                    info!("manual: {} -> {}", actuator.label(), if on { "ON" } else { "OFF" });
                    hw.set_actuator(actuator, on);
                }
            }

            AppCommand::ForcePhase(phase) => {
                warn!("forced transition to {phase:?}");
                self.sequencer.force_phase(phase, now_ms);
            }
        }

        self.publish_phase_change(before, sink);
        Ok(())
    }

    // ── Periodic ticks ────────────────────────────────────────

    /// One sequencer polling tick.
    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        let before = self.sequencer.phase();
        self.sequencer.tick(now_ms, hw);
        self.publish_phase_change(before, sink);
    }

    /// One status refresh tick.
    pub fn status_tick(&self, now_ms: u64, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Status(self.sequencer.status(now_ms)));
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.sequencer.phase()
    }

    pub fn is_running(&self) -> bool {
        self.sequencer.is_running()
    }

    pub fn status(&self, now_ms: u64) -> StatusSnapshot {
        self.sequencer.status(now_ms)
    }

    // ── Internal ──────────────────────────────────────────────

    fn publish_phase_change(&self, before: Phase, sink: &mut impl EventSink) {
        let after = self.sequencer.phase();
        if before != after {
            sink.emit(&AppEvent::PhaseChanged {
                from: before,
                to: after,
            });
        }
    }
}

impl Default for AppService {
    fn default() -> Self {
        Self::new()
    }
}
