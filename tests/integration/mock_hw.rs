//! Shared mock adapters for the integration suite.

use mouldbot::app::events::AppEvent;
use mouldbot::app::ports::{Actuator, ActuatorPort, EepromPort, EventSink};
use mouldbot::error::StorageError;

/// One recorded actuator-port call, in issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Set(Actuator, bool),
    AllOff,
    Rest(u32),
}

/// Actuator port that tracks per-output state and the full call sequence.
pub struct MockHardware {
    pub on: [bool; 5],
    pub calls: Vec<ActuatorCall>,
}

impl MockHardware {
    pub fn new() -> Self {
        Self {
            on: [false; 5],
            calls: Vec::new(),
        }
    }

    pub fn is_on(&self, actuator: Actuator) -> bool {
        self.on[actuator as usize]
    }

    pub fn all_outputs_off(&self) -> bool {
        self.on.iter().all(|&b| !b)
    }
}

impl ActuatorPort for MockHardware {
    fn set_actuator(&mut self, actuator: Actuator, on: bool) {
        self.on[actuator as usize] = on;
        self.calls.push(ActuatorCall::Set(actuator, on));
    }

    fn all_off(&mut self) {
        self.on = [false; 5];
        self.calls.push(ActuatorCall::AllOff);
    }

    fn rest(&mut self, ms: u32) {
        self.calls.push(ActuatorCall::Rest(ms));
    }
}

/// In-memory EEPROM, initialised to erased flash (`0xFF`).
pub struct MemEeprom {
    pub bytes: [u8; 64],
}

impl MemEeprom {
    pub fn blank() -> Self {
        Self { bytes: [0xFF; 64] }
    }
}

impl EepromPort for MemEeprom {
    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        let end = offset
            .checked_add(buf.len())
            .ok_or(StorageError::OutOfBounds)?;
        let src = self.bytes.get(offset..end).ok_or(StorageError::OutOfBounds)?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        let end = offset
            .checked_add(data.len())
            .ok_or(StorageError::OutOfBounds)?;
        let dst = self
            .bytes
            .get_mut(offset..end)
            .ok_or(StorageError::OutOfBounds)?;
        dst.copy_from_slice(data);
        Ok(())
    }
}

/// Event sink that records everything it is handed.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}
