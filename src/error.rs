//! Unified error types for the MouldBot controller.
//!
//! Follows embedded best practice: a single `Error` enum that every subsystem
//! can convert into, keeping the top-level control loop's error handling
//! uniform.  All variants are `Copy` so they can be cheaply passed around
//! without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level controller error
// ---------------------------------------------------------------------------

/// Every fallible operation in the controller funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An actuator command could not be delivered to the relay expander.
    Actuator(ActuatorError),
    /// Persistent storage failed.
    Storage(StorageError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

/// Relay command failures.
///
/// The sequence itself is fire-and-forget: there is no acknowledgement
/// channel from the relays, so these only ever surface from the I2C bus
/// transaction and are logged rather than escalated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// I2C write to the relay expander failed.
    BusWriteFailed,
    /// Relay index outside the expander's port width.
    InvalidChannel,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusWriteFailed => write!(f, "I2C bus write failed"),
            Self::InvalidChannel => write!(f, "invalid relay channel"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

/// Errors from the byte-level persistent store backing the duration record.
///
/// Note that an *uninitialised* store (missing marker byte) is not an error:
/// the duration store treats it as a normal first-boot condition and
/// repopulates defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Read or write beyond the persisted region.
    OutOfBounds,
    /// Generic I/O error from the storage backend.
    IoError,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => write!(f, "access out of bounds"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Controller-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
