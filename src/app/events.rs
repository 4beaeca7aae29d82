//! Events emitted by the application service.
//!
//! These flow out through the [`EventSink`](super::ports::EventSink) port to
//! whatever wants to observe the machine: the serial log, the panel display,
//! or a test recorder.

use crate::config::TimerField;
use crate::sequencer::{Phase, StatusSnapshot};

/// Something observable happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// An automated run began.
    RunStarted,
    /// The sequencer moved from one phase to another.
    PhaseChanged { from: Phase, to: Phase },
    /// The run was aborted; all outputs are off.
    RunAborted,
    /// A finished run was acknowledged by the operator.
    RunAcknowledged,
    /// A phase timer was edited and persisted.
    DurationChanged { field: TimerField, ms: u32 },
    /// Periodic status refresh.
    Status(StatusSnapshot),
}
