//! Duration store — persistence for the five editable phase timers.
//!
//! The record occupies a fixed 21-byte region of the byte-level storage
//! behind [`EepromPort`]:
//!
//! ```text
//! offset 0        : marker byte 0xAB ("record present")
//! offset 1  .. 5  : feeder_ms    u32 LE
//! offset 5  .. 9  : shredder_ms  u32 LE
//! offset 9  .. 13 : pump_ms      u32 LE
//! offset 13 .. 17 : mixer_ms     u32 LE
//! offset 17 .. 21 : door_ms      u32 LE
//! ```
//!
//! Any other marker value means the storage has never held our record (or
//! held someone else's) and is treated as a normal first boot: defaults are
//! installed and persisted immediately, so a power cycle straight after
//! first boot already finds a valid record.
//!
//! Every field is clamped into `[MIN_TIMER_MS, MAX_TIMER_MS]` on the way in
//! *and* on the way out, so the rest of the system never observes an
//! out-of-range duration regardless of what the bytes say.

use log::{info, warn};

use crate::app::ports::EepromPort;
use crate::config::{PhaseDurations, TimerField, clamp_duration};
use crate::error::StorageError;

/// Marker byte identifying an initialised record.
pub const RECORD_MARKER: u8 = 0xAB;
/// Offset of the marker byte.
pub const MARKER_OFFSET: usize = 0;
/// Offset of the first duration field.
pub const DATA_OFFSET: usize = 1;
/// Total persisted footprint: marker + five `u32` fields.
pub const RECORD_LEN: usize = DATA_OFFSET + TimerField::ALL.len() * 4;

/// Owns the authoritative [`PhaseDurations`] and keeps them in sync with
/// the persistent record.  Writes are write-through: every edit is durable
/// before the mutating call returns.
pub struct DurationStore<S: EepromPort> {
    backend: S,
    durations: PhaseDurations,
}

impl<S: EepromPort> DurationStore<S> {
    /// Load the record from `backend`, installing and persisting defaults
    /// if no valid record is present.
    pub fn load(backend: S) -> Result<Self, StorageError> {
        let mut store = Self {
            backend,
            durations: PhaseDurations::default(),
        };

        let mut marker = [0u8; 1];
        store.backend.read(MARKER_OFFSET, &mut marker)?;

        if marker[0] == RECORD_MARKER {
            store.durations = store.read_record()?;
            info!("duration record loaded: {:?}", store.durations);
        } else {
            warn!(
                "no duration record (marker {:#04x}), installing defaults",
                marker[0]
            );
            store.persist()?;
        }
        Ok(store)
    }

    /// The current durations.  Always in range.
    pub fn durations(&self) -> &PhaseDurations {
        &self.durations
    }

    /// A by-value copy for the sequencer to use as its run snapshot.
    pub fn snapshot(&self) -> PhaseDurations {
        self.durations
    }

    /// Read one timer field.
    pub fn get(&self, field: TimerField) -> u32 {
        self.durations.get(field)
    }

    /// Update one timer field (clamped) and persist the whole record.
    pub fn set(&mut self, field: TimerField, ms: u32) -> Result<(), StorageError> {
        self.durations.set(field, ms);
        self.persist()?;
        info!("{} timer set to {} ms", field.label(), self.durations.get(field));
        Ok(())
    }

    /// Replace every field (each clamped) and persist once.
    pub fn set_all(&mut self, durations: PhaseDurations) -> Result<(), StorageError> {
        self.durations = durations.clamped();
        self.persist()
    }

    // ── Record encoding ───────────────────────────────────────

    fn read_record(&self) -> Result<PhaseDurations, StorageError> {
        let mut raw = [0u8; RECORD_LEN - DATA_OFFSET];
        self.backend.read(DATA_OFFSET, &mut raw)?;

        let mut durations = PhaseDurations::default();
        for (i, field) in TimerField::ALL.into_iter().enumerate() {
            let off = i * 4;
            let bytes = [raw[off], raw[off + 1], raw[off + 2], raw[off + 3]];
            durations.set(field, clamp_duration(u32::from_le_bytes(bytes)));
        }
        Ok(durations)
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let mut raw = [0u8; RECORD_LEN];
        raw[MARKER_OFFSET] = RECORD_MARKER;
        for (i, field) in TimerField::ALL.into_iter().enumerate() {
            let off = DATA_OFFSET + i * 4;
            raw[off..off + 4].copy_from_slice(&self.durations.get(field).to_le_bytes());
        }
        self.backend.write(0, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MAX_TIMER_MS, MIN_TIMER_MS};

    /// In-memory byte array standing in for the EEPROM.
    struct MemBackend {
        bytes: [u8; 64],
    }

    impl MemBackend {
        fn blank() -> Self {
            Self { bytes: [0xFF; 64] }
        }
    }

    impl EepromPort for MemBackend {
        fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError> {
            let end = offset.checked_add(buf.len()).ok_or(StorageError::OutOfBounds)?;
            let src = self.bytes.get(offset..end).ok_or(StorageError::OutOfBounds)?;
            buf.copy_from_slice(src);
            Ok(())
        }

        fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
            let end = offset.checked_add(data.len()).ok_or(StorageError::OutOfBounds)?;
            let dst = self
                .bytes
                .get_mut(offset..end)
                .ok_or(StorageError::OutOfBounds)?;
            dst.copy_from_slice(data);
            Ok(())
        }
    }

    #[test]
    fn first_boot_installs_and_persists_defaults() {
        let store = DurationStore::load(MemBackend::blank()).unwrap();
        assert_eq!(*store.durations(), PhaseDurations::default());
        // The record must already be durable: a second load over the same
        // bytes finds the marker and reads it back.
        assert_eq!(store.backend.bytes[MARKER_OFFSET], RECORD_MARKER);
        let reloaded = DurationStore::load(store.backend).unwrap();
        assert_eq!(*reloaded.durations(), PhaseDurations::default());
    }

    #[test]
    fn set_round_trips_through_the_backend() {
        let mut store = DurationStore::load(MemBackend::blank()).unwrap();
        store.set(TimerField::Shredder, 12_000).unwrap();
        store.set(TimerField::Door, 3_000).unwrap();

        let reloaded = DurationStore::load(store.backend).unwrap();
        assert_eq!(reloaded.get(TimerField::Shredder), 12_000);
        assert_eq!(reloaded.get(TimerField::Door), 3_000);
        // Untouched fields keep their defaults.
        assert_eq!(reloaded.get(TimerField::Mixer), 30_000);
    }

    #[test]
    fn foreign_marker_is_treated_as_first_boot() {
        let mut backend = MemBackend::blank();
        backend.bytes[MARKER_OFFSET] = 0x5A;
        // Garbage that would decode as durations if trusted.
        backend.bytes[DATA_OFFSET..DATA_OFFSET + 4].copy_from_slice(&77_000u32.to_le_bytes());

        let store = DurationStore::load(backend).unwrap();
        assert_eq!(*store.durations(), PhaseDurations::default());
        assert_eq!(store.backend.bytes[MARKER_OFFSET], RECORD_MARKER);
    }

    #[test]
    fn out_of_range_stored_values_are_clamped_on_load() {
        // Build a valid record by hand with illegal field values.
        let mut backend = MemBackend::blank();
        backend.bytes[MARKER_OFFSET] = RECORD_MARKER;
        let fields: [u32; 5] = [0, u32::MAX, 8_000, 30_000, 500];
        for (i, v) in fields.into_iter().enumerate() {
            let off = DATA_OFFSET + i * 4;
            backend.bytes[off..off + 4].copy_from_slice(&v.to_le_bytes());
        }

        let store = DurationStore::load(backend).unwrap();
        assert_eq!(store.get(TimerField::Feeder), MIN_TIMER_MS);
        assert_eq!(store.get(TimerField::Shredder), MAX_TIMER_MS);
        assert_eq!(store.get(TimerField::Pump), 8_000);
        assert_eq!(store.get(TimerField::Mixer), 30_000);
        assert_eq!(store.get(TimerField::Door), MIN_TIMER_MS);
    }

    #[test]
    fn set_clamps_before_persisting() {
        let mut store = DurationStore::load(MemBackend::blank()).unwrap();
        store.set(TimerField::Pump, 0).unwrap();
        assert_eq!(store.get(TimerField::Pump), MIN_TIMER_MS);
        let reloaded = DurationStore::load(store.backend).unwrap();
        assert_eq!(reloaded.get(TimerField::Pump), MIN_TIMER_MS);
    }

    #[test]
    fn record_layout_is_stable() {
        let mut store = DurationStore::load(MemBackend::blank()).unwrap();
        store
            .set_all(PhaseDurations {
                feeder_ms: 1_000,
                shredder_ms: 2_000,
                pump_ms: 3_000,
                mixer_ms: 4_000,
                door_ms: 5_000,
            })
            .unwrap();

        let b = &store.backend.bytes;
        assert_eq!(b[0], 0xAB);
        assert_eq!(&b[1..5], &1_000u32.to_le_bytes());
        assert_eq!(&b[5..9], &2_000u32.to_le_bytes());
        assert_eq!(&b[9..13], &3_000u32.to_le_bytes());
        assert_eq!(&b[13..17], &4_000u32.to_le_bytes());
        assert_eq!(&b[17..21], &5_000u32.to_le_bytes());
        assert_eq!(RECORD_LEN, 21);
    }

    #[test]
    fn backend_failure_propagates_from_load() {
        struct Broken;
        impl EepromPort for Broken {
            fn read(&self, _: usize, _: &mut [u8]) -> Result<(), StorageError> {
                Err(StorageError::IoError)
            }
            fn write(&mut self, _: usize, _: &[u8]) -> Result<(), StorageError> {
                Err(StorageError::IoError)
            }
        }
        assert_eq!(
            DurationStore::load(Broken).err(),
            Some(StorageError::IoError)
        );
    }
}
