//! Commands accepted by the application service.
//!
//! Every way of poking the machine — panel buttons, serial console, test
//! harness — is normalised into one of these before it reaches the domain,
//! so the acceptance rules (what is allowed in which phase) live in exactly
//! one place: [`AppService::handle_command`](super::service::AppService::handle_command).

use crate::app::ports::Actuator;
use crate::config::TimerField;
use crate::sequencer::Phase;

/// A request for the machine to do something.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Begin an automated run (accepted only while idle).
    StartRun,
    /// Dispense into the mould and repeat the door cycle
    /// (accepted only at the mould prompt).
    ContinueMoulding,
    /// Emergency abort: discard the run, outputs off
    /// (accepted in every phase).
    Abort,
    /// Dismiss a finished run (accepted only in the complete phase).
    AcknowledgeComplete,
    /// Set one phase timer, clamped and persisted
    /// (accepted only while idle).
    SetDuration { field: TimerField, ms: u32 },
    /// Manually toggle one actuator for commissioning checks
    /// (accepted only while idle).
    ToggleActuator(Actuator),
    /// Jump the sequencer to an arbitrary phase.  Debug tooling only.
    ForcePhase(Phase),
}
