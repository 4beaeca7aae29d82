//! End-to-end sequencer runs against the mock hardware, driven by a
//! simulated clock.

use mouldbot::app::commands::AppCommand;
use mouldbot::app::events::AppEvent;
use mouldbot::app::ports::Actuator;
use mouldbot::app::service::AppService;
use mouldbot::config::PhaseDurations;
use mouldbot::sequencer::{Phase, Sequencer};
use mouldbot::store::DurationStore;

use crate::mock_hw::{ActuatorCall, MemEeprom, MockHardware, RecordingSink};

/// The reference walkthrough: a run with short timers stepped through a
/// simulated clock, checked phase by phase against the commissioning
/// protocol for the machine.
#[test]
fn reference_run_walkthrough() {
    let durations = PhaseDurations {
        shredder_ms: 2_000,
        feeder_ms: 3_000,
        pump_ms: 1_000,
        mixer_ms: 500,
        door_ms: 1_000,
    };
    let mut seq = Sequencer::new();
    let mut hw = MockHardware::new();

    seq.start(0, durations, &mut hw);
    assert_eq!(seq.phase(), Phase::MixerPrep);
    assert!(hw.is_on(Actuator::Mixer));

    // MixerPrep: fixed 2000ms.
    seq.tick(2_000, &mut hw);
    assert_eq!(seq.phase(), Phase::ShredderRun);
    assert!(hw.is_on(Actuator::Shredder));

    // ShredderRun: 2000ms.
    seq.tick(4_000, &mut hw);
    assert_eq!(seq.phase(), Phase::FeederRun);
    assert!(hw.is_on(Actuator::Feeder) && !hw.is_on(Actuator::Shredder));

    // FeederRun: 3000ms.
    seq.tick(7_000, &mut hw);
    assert_eq!(seq.phase(), Phase::PumpRun);
    assert!(hw.is_on(Actuator::Pump) && !hw.is_on(Actuator::Feeder));

    // PumpRun: 1000ms.
    seq.tick(8_000, &mut hw);
    assert_eq!(seq.phase(), Phase::MixRun);
    assert!(!hw.is_on(Actuator::Pump));

    // MixRun: 500ms, then the mould prompt with the mixer still on.
    seq.tick(8_500, &mut hw);
    assert_eq!(seq.phase(), Phase::AwaitingMould);
    assert!(hw.is_on(Actuator::Mixer));

    // Operator presses ENTER.
    seq.continue_moulding(9_000, &mut hw);
    assert_eq!(seq.phase(), Phase::DoorOpen);
    assert!(hw.is_on(Actuator::Door));

    // DoorOpen: 1000ms.
    seq.tick(10_000, &mut hw);
    assert_eq!(seq.phase(), Phase::DoorClosing);
    assert!(!hw.is_on(Actuator::Door));

    // DoorClosing: fixed 2000ms, looping back to the prompt.
    seq.tick(12_000, &mut hw);
    assert_eq!(seq.phase(), Phase::AwaitingMould);
}

#[test]
fn phase_handover_call_ordering() {
    let durations = PhaseDurations {
        shredder_ms: 1_000,
        feeder_ms: 1_000,
        pump_ms: 1_000,
        mixer_ms: 1_000,
        door_ms: 1_000,
    };
    let mut seq = Sequencer::new();
    let mut hw = MockHardware::new();
    seq.start(0, durations, &mut hw);
    hw.calls.clear();

    seq.tick(2_000, &mut hw); // -> ShredderRun
    seq.tick(3_000, &mut hw); // -> FeederRun
    seq.tick(4_000, &mut hw); // -> PumpRun
    seq.tick(5_000, &mut hw); // -> MixRun

    // Material hand-overs switch the old relay off, rest, then the new one
    // on.  The pump-to-mix boundary only switches the pump off.
    assert_eq!(
        hw.calls,
        vec![
            ActuatorCall::Set(Actuator::Shredder, true),
            ActuatorCall::Set(Actuator::Shredder, false),
            ActuatorCall::Rest(100),
            ActuatorCall::Set(Actuator::Feeder, true),
            ActuatorCall::Set(Actuator::Feeder, false),
            ActuatorCall::Rest(100),
            ActuatorCall::Set(Actuator::Pump, true),
            ActuatorCall::Set(Actuator::Pump, false),
        ]
    );
}

#[test]
fn door_loop_supports_many_moulds() {
    let mut seq = Sequencer::new();
    let mut hw = MockHardware::new();
    seq.start(0, PhaseDurations::default(), &mut hw);

    let mut now = 0u64;
    while seq.phase() != Phase::AwaitingMould {
        now += 1_000;
        seq.tick(now, &mut hw);
        assert!(now < 120_000, "run never reached the mould prompt");
    }

    for _ in 0..5 {
        seq.continue_moulding(now, &mut hw);
        assert_eq!(seq.phase(), Phase::DoorOpen);
        now += 5_000; // default door_ms
        seq.tick(now, &mut hw);
        assert_eq!(seq.phase(), Phase::DoorClosing);
        now += 2_000;
        seq.tick(now, &mut hw);
        assert_eq!(seq.phase(), Phase::AwaitingMould);
        assert!(hw.is_on(Actuator::Mixer));
    }
}

#[test]
fn emergency_abort_mid_run_through_the_service() {
    let mut svc = AppService::new();
    let mut hw = MockHardware::new();
    let mut store = DurationStore::load(MemEeprom::blank()).unwrap();
    let mut sink = RecordingSink::default();

    svc.handle_command(AppCommand::StartRun, 0, &mut hw, &mut store, &mut sink)
        .unwrap();
    svc.tick(2_000, &mut hw, &mut sink); // -> ShredderRun
    assert!(hw.is_on(Actuator::Shredder));
    sink.events.clear();

    svc.handle_command(AppCommand::Abort, 2_500, &mut hw, &mut store, &mut sink)
        .unwrap();
    assert_eq!(svc.phase(), Phase::Idle);
    assert!(!svc.is_running());
    assert!(hw.all_outputs_off());
    assert_eq!(hw.calls.last(), Some(&ActuatorCall::AllOff));
    assert!(sink.events.contains(&AppEvent::RunAborted));

    // The machine is immediately usable again.
    svc.handle_command(AppCommand::StartRun, 3_000, &mut hw, &mut store, &mut sink)
        .unwrap();
    assert_eq!(svc.phase(), Phase::MixerPrep);
}

#[test]
fn full_run_with_default_timers_over_the_service() {
    let mut svc = AppService::new();
    let mut hw = MockHardware::new();
    let mut store = DurationStore::load(MemEeprom::blank()).unwrap();
    let mut sink = RecordingSink::default();

    svc.handle_command(AppCommand::StartRun, 0, &mut hw, &mut store, &mut sink)
        .unwrap();

    // Defaults: prep 2s, shredder 10s, feeder 5s, pump 8s, mix 30s.
    let mut now = 0u64;
    while svc.phase() != Phase::AwaitingMould {
        now += 500;
        svc.tick(now, &mut hw, &mut sink);
        assert!(now <= 60_000, "stuck in {:?}", svc.phase());
    }
    assert_eq!(now, 55_000);

    let phases: Vec<Phase> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::PhaseChanged { to, .. } => Some(*to),
            _ => None,
        })
        .collect();
    assert_eq!(
        phases,
        vec![
            Phase::MixerPrep,
            Phase::ShredderRun,
            Phase::FeederRun,
            Phase::PumpRun,
            Phase::MixRun,
            Phase::AwaitingMould,
        ]
    );
}
