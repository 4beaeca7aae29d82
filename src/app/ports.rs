//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (relay bank, EEPROM, event sinks) implement these traits.
//! The [`AppService`](super::service::AppService) consumes them via generics,
//! so the domain core never touches hardware directly.

use crate::error::StorageError;

// ───────────────────────────────────────────────────────────────
// Actuator identity
// ───────────────────────────────────────────────────────────────

/// The five machine actuators, each mapped 1:1 to a relay channel.
///
/// "On" here is the *logical* state.  The relays are wired active-low;
/// that inversion is owned by the relay driver and invisible everywhere
/// else in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actuator {
    Feeder,
    Shredder,
    Pump,
    Mixer,
    Door,
}

impl Actuator {
    /// All actuators, in safety shutdown order.
    pub const ALL: [Actuator; 5] = [
        Actuator::Feeder,
        Actuator::Shredder,
        Actuator::Pump,
        Actuator::Mixer,
        Actuator::Door,
    ];

    /// Short label for menus and logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::Feeder => "Starch",
            Self::Shredder => "Paper",
            Self::Pump => "Water",
            Self::Mixer => "Mixer",
            Self::Door => "Door",
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → relay hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
///
/// ## Settle contract
///
/// Implementations guarantee that when a call returns, the commanded line
/// has had at least [`RELAY_SETTLE_MS`](crate::config::RELAY_SETTLE_MS) to
/// stabilise — a dependent command never reaches the hardware before the
/// prior command's settle interval has elapsed.  The reference adapter
/// blocks the (single) control thread for the interval; an async
/// implementation may satisfy the same ordering without blocking.
///
/// Commands are fire-and-forget: there is no acknowledgement channel from
/// the relays, so delivery failures are logged by the adapter and not
/// surfaced to the sequencer.
pub trait ActuatorPort {
    /// Drive one actuator to the requested logical state.
    fn set_actuator(&mut self, actuator: Actuator, on: bool);

    /// Turn every actuator off, one at a time with a settle interval
    /// between each.  The unconditional safety reset used on entry to
    /// idle and on abort.
    fn all_off(&mut self);

    /// Hold the bus quiet for at least `ms` before the next command.
    /// Used for the longer inter-phase relay swap interval.
    fn rest(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// EEPROM port (driven adapter: domain ↔ persistent bytes)
// ───────────────────────────────────────────────────────────────

/// Offset-addressed persistent byte storage for the duration record.
///
/// The byte-level driver is a thin I/O wrapper; all layout knowledge
/// (marker byte, field order, offsets) lives in [`crate::store`].
/// Writes are durable once the call returns: a read immediately after a
/// `write` observes exactly the written bytes.
pub trait EepromPort {
    /// Fill `buf` from persistent storage starting at `offset`.
    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError>;

    /// Write `data` to persistent storage starting at `offset`.
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError>;
}

// Lets callers keep ownership of a backend while lending it out, e.g.
// across a simulated power cycle in tests.
impl<T: EepromPort + ?Sized> EepromPort for &mut T {
    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        (**self).read(offset, buf)
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        (**self).write(offset, data)
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / display)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go — serial log, LCD
/// status renderer, or a test recorder.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
