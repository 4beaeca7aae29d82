//! PCF8575 relay bank driver.
//!
//! The expander exposes 16 quasi-bidirectional port lines; a write
//! transaction is simply two bytes, P07..P00 then P17..P10.  The relay
//! board is wired active-low: driving a line LOW energises the relay, and
//! the power-on state (all lines HIGH) leaves every relay released.
//!
//! That inversion is owned entirely by this driver.  Callers speak logical
//! on/off; nobody above this layer ever sees a port word.
//!
//! Every flush is followed by a settle pause so back-to-back commands give
//! the coil and the supply rail time to stabilise.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::config::RELAY_SETTLE_MS;
use crate::error::ActuatorError;

/// Port width of the PCF8575.
const CHANNELS: u8 = 16;

/// Driver for one PCF8575-backed relay board.
pub struct RelayBank<I2C, D> {
    i2c: I2C,
    delay: D,
    addr: u8,
    /// Shadow of the port word as last written.  Bit HIGH = relay released.
    state: u16,
}

impl<I2C: I2c, D: DelayNs> RelayBank<I2C, D> {
    /// Create the driver with every relay released.  No bus traffic until
    /// [`init`](Self::init).
    pub fn new(i2c: I2C, delay: D, addr: u8) -> Self {
        Self {
            i2c,
            delay,
            addr,
            state: 0xFFFF,
        }
    }

    /// Push the all-released state to the expander.  Called once at boot so
    /// the shadow word and the hardware agree before any sequencing.
    pub fn init(&mut self) -> Result<(), ActuatorError> {
        self.state = 0xFFFF;
        self.flush()
    }

    /// Switch one relay channel.  `on` is the logical state; the active-low
    /// inversion happens here.
    pub fn set(&mut self, channel: u8, on: bool) -> Result<(), ActuatorError> {
        if channel >= CHANNELS {
            return Err(ActuatorError::InvalidChannel);
        }
        let mask = 1u16 << channel;
        if on {
            self.state &= !mask; // energise: drive LOW
        } else {
            self.state |= mask; // release: drive HIGH
        }
        self.flush()
    }

    /// Hold the bus quiet for `ms`.  Used for the longer inter-phase
    /// hand-over interval, on top of the per-flush settle.
    pub fn rest(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Logical state of one channel per the shadow word.
    pub fn is_on(&self, channel: u8) -> bool {
        channel < CHANNELS && self.state & (1u16 << channel) == 0
    }

    fn flush(&mut self) -> Result<(), ActuatorError> {
        let bytes = self.state.to_le_bytes();
        self.i2c
            .write(self.addr, &bytes)
            .map_err(|_| ActuatorError::BusWriteFailed)?;
        self.delay.delay_ms(RELAY_SETTLE_MS);
        Ok(())
    }
}
