//! Event sink adapter that renders application events to the serial log.
//!
//! The panel LCD driver consumes the same events through its own sink; this
//! one keeps the serial console useful on boards without a display fitted.

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::sequencer::status::phase_label;

pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::RunStarted => info!("run started"),
            AppEvent::PhaseChanged { from, to } => {
                info!("{} -> {}", phase_label(*from), phase_label(*to));
            }
            AppEvent::RunAborted => info!("run ABORTED, outputs off"),
            AppEvent::RunAcknowledged => info!("run acknowledged"),
            AppEvent::DurationChanged { field, ms } => {
                info!("{} timer -> {} ms", field.label(), ms);
            }
            // 1 Hz during a run; keep it off the info log.
            AppEvent::Status(snap) => {
                debug!("{} | {}", snap.phase_line(), snap.detail_line());
            }
        }
    }
}
