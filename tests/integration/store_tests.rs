//! Duration persistence across simulated power cycles.
//!
//! The EEPROM bytes outlive the store instances here, standing in for
//! flash contents surviving a reboot.

use mouldbot::app::commands::AppCommand;
use mouldbot::app::service::AppService;
use mouldbot::config::{PhaseDurations, TimerField};
use mouldbot::store::{DurationStore, MARKER_OFFSET, RECORD_MARKER};

use crate::mock_hw::{MemEeprom, MockHardware, RecordingSink};

#[test]
fn edits_survive_a_power_cycle() {
    let mut eeprom = MemEeprom::blank();

    {
        let mut store = DurationStore::load(&mut eeprom).unwrap();
        store.set(TimerField::Mixer, 45_000).unwrap();
        store.set(TimerField::Feeder, 7_000).unwrap();
    }

    let reloaded = DurationStore::load(&mut eeprom).unwrap();
    assert_eq!(reloaded.get(TimerField::Mixer), 45_000);
    assert_eq!(reloaded.get(TimerField::Feeder), 7_000);
    assert_eq!(reloaded.get(TimerField::Shredder), 10_000, "defaults kept");
}

#[test]
fn first_boot_record_is_durable_before_any_edit() {
    let mut eeprom = MemEeprom::blank();
    {
        let store = DurationStore::load(&mut eeprom).unwrap();
        assert_eq!(*store.durations(), PhaseDurations::default());
    }
    // The marker was written during that first load, so a crash straight
    // after boot still leaves a valid record behind.
    assert_eq!(eeprom.bytes[MARKER_OFFSET], RECORD_MARKER);
    let reloaded = DurationStore::load(&mut eeprom).unwrap();
    assert_eq!(*reloaded.durations(), PhaseDurations::default());
}

#[test]
fn foreign_contents_are_replaced_not_trusted() {
    let mut eeprom = MemEeprom::blank();
    // Simulate a board whose storage last belonged to different firmware.
    eeprom.bytes[..8].copy_from_slice(&[0x42, 0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x01, 0x02]);

    let store = DurationStore::load(&mut eeprom).unwrap();
    assert_eq!(*store.durations(), PhaseDurations::default());
    drop(store);
    assert_eq!(eeprom.bytes[MARKER_OFFSET], RECORD_MARKER);
}

#[test]
fn edit_through_the_service_is_persisted_synchronously() {
    let mut eeprom = MemEeprom::blank();
    let mut store = DurationStore::load(&mut eeprom).unwrap();
    let mut svc = AppService::new();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::default();

    svc.handle_command(
        AppCommand::SetDuration {
            field: TimerField::Door,
            ms: 9_000,
        },
        0,
        &mut hw,
        &mut store,
        &mut sink,
    )
    .unwrap();
    drop(store);

    // No shutdown hook ran; the bytes are already on "flash".
    let reloaded = DurationStore::load(&mut eeprom).unwrap();
    assert_eq!(reloaded.get(TimerField::Door), 9_000);
}

#[test]
fn run_snapshot_ignores_subsequent_edits_and_new_run_sees_them() {
    let mut eeprom = MemEeprom::blank();
    let mut store = DurationStore::load(&mut eeprom).unwrap();
    let mut svc = AppService::new();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::default();

    store.set(TimerField::Shredder, 2_000).unwrap();
    svc.handle_command(AppCommand::StartRun, 0, &mut hw, &mut store, &mut sink)
        .unwrap();

    // Edit lands in the store only (and is refused anyway while running).
    svc.handle_command(AppCommand::Abort, 100, &mut hw, &mut store, &mut sink)
        .unwrap();
    svc.handle_command(
        AppCommand::SetDuration {
            field: TimerField::Shredder,
            ms: 20_000,
        },
        200,
        &mut hw,
        &mut store,
        &mut sink,
    )
    .unwrap();

    svc.handle_command(AppCommand::StartRun, 1_000, &mut hw, &mut store, &mut sink)
        .unwrap();
    svc.tick(3_000, &mut hw, &mut sink); // MixerPrep done -> ShredderRun

    // Old value would end the shredder phase at t=5000.
    svc.tick(5_500, &mut hw, &mut sink);
    assert_eq!(svc.phase(), mouldbot::sequencer::Phase::ShredderRun);
    svc.tick(23_000, &mut hw, &mut sink);
    assert_eq!(svc.phase(), mouldbot::sequencer::Phase::FeederRun);
}
