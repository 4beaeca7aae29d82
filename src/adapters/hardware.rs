//! Actuator port adapter over the PCF8575 relay bank.
//!
//! Maps the logical [`Actuator`] identities onto relay channels and absorbs
//! bus failures: actuator commands are fire-and-forget, so an I2C error is
//! logged here and never reaches the sequencer.  Generic over the
//! `embedded-hal` bus and delay traits, so the same adapter runs on the
//! target (I2C driver + FreeRTOS delay) and under tests (mock bus).

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::error;

use crate::app::ports::{Actuator, ActuatorPort};
use crate::drivers::RelayBank;
use crate::pins;

pub struct RelayAdapter<I2C, D> {
    bank: RelayBank<I2C, D>,
}

impl<I2C: I2c, D: DelayNs> RelayAdapter<I2C, D> {
    /// Wrap an initialised relay bank.
    pub fn new(bank: RelayBank<I2C, D>) -> Self {
        Self { bank }
    }

    fn channel_for(actuator: Actuator) -> u8 {
        match actuator {
            Actuator::Feeder => pins::RELAY_FEEDER,
            Actuator::Shredder => pins::RELAY_SHREDDER,
            Actuator::Pump => pins::RELAY_PUMP,
            Actuator::Mixer => pins::RELAY_MIXER,
            Actuator::Door => pins::RELAY_DOOR,
        }
    }
}

impl<I2C: I2c, D: DelayNs> ActuatorPort for RelayAdapter<I2C, D> {
    fn set_actuator(&mut self, actuator: Actuator, on: bool) {
        if let Err(e) = self.bank.set(Self::channel_for(actuator), on) {
            error!("relay {} command failed: {e}", actuator.label());
        }
    }

    fn all_off(&mut self) {
        // One channel at a time; each flush carries its own settle pause.
        for actuator in Actuator::ALL {
            self.set_actuator(actuator, false);
        }
    }

    fn rest(&mut self, ms: u32) {
        self.bank.rest(ms);
    }
}
