//! MouldBot Firmware — Main Entry Point
//!
//! Hexagonal architecture with a polled event loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                 │
//! │                                                          │
//! │  RelayAdapter      EepromAdapter    LogSink   TimeAdapter│
//! │  (ActuatorPort)    (EepromPort)     (EventSink)          │
//! │                                                          │
//! │  ───────────── Port Trait Boundary ─────────────────     │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │         AppService (pure logic)                    │  │
//! │  │  Sequencer · DurationStore · DurationEditor        │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The loop runs every [`CONTROL_TICK_MS`]: sample the panel buttons,
//! drain the event queue (emergency stop first, always), tick the
//! sequencer, refresh the status once a second.
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info, warn};

use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyIOPin, PinDriver, Pull};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::FromValueType;

use mouldbot::adapters::{EepromAdapter, LogSink, RelayAdapter, TimeAdapter};
use mouldbot::app::{AppCommand, AppService, DurationEditor};
use mouldbot::config::{CONTROL_TICK_MS, STATUS_TICK_MS, TimerField};
use mouldbot::drivers::{ButtonEdge, DebouncedButton, RelayBank};
use mouldbot::events::{self, Event, push_event};
use mouldbot::pins;
use mouldbot::sequencer::Phase;
use mouldbot::store::DurationStore;

// ── Panel menu ────────────────────────────────────────────────
//
// While idle, UP/DOWN scroll a flat menu (start entry + the five
// timers) and ENTER activates the selection.  Activating a timer
// opens a DurationEditor; UP/DOWN then nudge the value and ENTER
// confirms it into the store.

const MENU_LEN: usize = 1 + TimerField::ALL.len();

fn menu_label(index: usize) -> &'static str {
    if index == 0 {
        "Start Run"
    } else {
        TimerField::ALL[index - 1].label()
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("MouldBot v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripherals and relay bank ─────────────────────────
    let peripherals = Peripherals::take()?;

    let i2c = I2cDriver::new(
        peripherals.i2c0,
        unsafe { AnyIOPin::new(pins::I2C_SDA_GPIO) },
        unsafe { AnyIOPin::new(pins::I2C_SCL_GPIO) },
        &I2cConfig::new().baudrate(100.kHz().into()),
    )?;

    let mut bank = RelayBank::new(i2c, FreeRtos, pins::RELAY_EXPANDER_ADDR);
    if let Err(e) = bank.init() {
        // Without the relay bank the machine cannot be made safe — halt
        // and let the operator power-cycle.
        error!("relay bank init failed: {e} — halting");
        #[allow(clippy::empty_loop)]
        loop {}
    }
    let mut hw = RelayAdapter::new(bank);

    // ── 3. Duration store ─────────────────────────────────────
    let eeprom = EepromAdapter::new().map_err(|e| anyhow::anyhow!("storage init: {e}"))?;
    let mut store =
        DurationStore::load(eeprom).map_err(|e| anyhow::anyhow!("duration record: {e}"))?;

    // ── 4. Panel buttons (active-low, internal pull-ups) ──────
    let mut btn_up_pin = PinDriver::input(unsafe { AnyIOPin::new(pins::BTN_UP_GPIO) })?;
    let mut btn_down_pin = PinDriver::input(unsafe { AnyIOPin::new(pins::BTN_DOWN_GPIO) })?;
    let mut btn_enter_pin = PinDriver::input(unsafe { AnyIOPin::new(pins::BTN_ENTER_GPIO) })?;
    btn_up_pin.set_pull(Pull::Up)?;
    btn_down_pin.set_pull(Pull::Up)?;
    btn_enter_pin.set_pull(Pull::Up)?;

    let mut btn_up = DebouncedButton::new();
    let mut btn_down = DebouncedButton::new();
    let mut btn_enter = DebouncedButton::new();

    // ── 5. App service ────────────────────────────────────────
    let mut service = AppService::new();
    let mut sink = LogSink;
    let clock = TimeAdapter::new();

    let mut selected: usize = 0;
    let mut editor: Option<DurationEditor> = None;
    let mut chord_latched = false;
    let mut status_elapsed_ms: u32 = 0;

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        FreeRtos::delay_ms(CONTROL_TICK_MS);
        let now_ms = clock.now_ms();

        // Sample buttons and turn debounced edges into events.
        sample_button(&mut btn_up, btn_up_pin.is_low(), now_ms, Event::BtnUp);
        sample_button(&mut btn_down, btn_down_pin.is_low(), now_ms, Event::BtnDown);
        sample_button(&mut btn_enter, btn_enter_pin.is_low(), now_ms, Event::BtnEnter);

        // Emergency-stop chord: all three buttons held during a run.
        // Latched so one chord raises exactly one event.
        let chord = btn_up.is_pressed() && btn_down.is_pressed() && btn_enter.is_pressed();
        if chord && !chord_latched && service.is_running() {
            warn!("emergency-stop chord detected");
            push_event(Event::EmergencyStop);
        }
        chord_latched = chord;

        push_event(Event::ControlTick);
        status_elapsed_ms += CONTROL_TICK_MS;
        if status_elapsed_ms >= STATUS_TICK_MS {
            status_elapsed_ms = 0;
            if service.is_running() {
                push_event(Event::StatusTick);
            }
        }

        // Collect the batch first so an emergency stop queued behind
        // ordinary events still pre-empts them.
        let mut batch: heapless::Vec<Event, 32> = heapless::Vec::new();
        events::drain_events(|event| {
            let _ = batch.push(event);
        });

        if batch.contains(&Event::EmergencyStop) {
            editor = None;
            dispatch(&mut service, AppCommand::Abort, now_ms, &mut hw, &mut store, &mut sink);
        }

        for event in batch {
            match event {
                Event::EmergencyStop => {} // handled above

                Event::ControlTick => service.tick(now_ms, &mut hw, &mut sink),

                Event::StatusTick => service.status_tick(now_ms, &mut sink),

                Event::BtnEnter => match service.phase() {
                    Phase::AwaitingMould => dispatch(
                        &mut service,
                        AppCommand::ContinueMoulding,
                        now_ms,
                        &mut hw,
                        &mut store,
                        &mut sink,
                    ),
                    Phase::Complete => dispatch(
                        &mut service,
                        AppCommand::AcknowledgeComplete,
                        now_ms,
                        &mut hw,
                        &mut store,
                        &mut sink,
                    ),
                    Phase::Idle => {
                        if let Some(e) = editor.take() {
                            let (field, ms) = e.confirm();
                            dispatch(
                                &mut service,
                                AppCommand::SetDuration { field, ms },
                                now_ms,
                                &mut hw,
                                &mut store,
                                &mut sink,
                            );
                        } else if selected == 0 {
                            dispatch(
                                &mut service,
                                AppCommand::StartRun,
                                now_ms,
                                &mut hw,
                                &mut store,
                                &mut sink,
                            );
                        } else {
                            let field = TimerField::ALL[selected - 1];
                            let e = DurationEditor::begin(field, store.get(field));
                            info!("edit {}: {} ms", field.label(), e.value_ms());
                            editor = Some(e);
                        }
                    }
                    // Timed phases ignore ENTER.
                    _ => {}
                },

                Event::BtnUp | Event::BtnDown => {
                    if service.is_running() {
                        continue;
                    }
                    if let Some(e) = editor.as_mut() {
                        if event == Event::BtnUp {
                            e.increment();
                        } else {
                            e.decrement();
                        }
                        info!("edit {}: {} ms", e.field().label(), e.value_ms());
                    } else {
                        selected = if event == Event::BtnUp {
                            (selected + MENU_LEN - 1) % MENU_LEN
                        } else {
                            (selected + 1) % MENU_LEN
                        };
                        info!("menu: {}", menu_label(selected));
                    }
                }
            }
        }
    }
}

fn sample_button(button: &mut DebouncedButton, pressed: bool, now_ms: u64, event: Event) {
    if button.update(pressed, now_ms) == Some(ButtonEdge::Pressed) {
        push_event(event);
    }
}

fn dispatch(
    service: &mut AppService,
    cmd: AppCommand,
    now_ms: u64,
    hw: &mut RelayAdapter<I2cDriver<'static>, FreeRtos>,
    store: &mut DurationStore<EepromAdapter>,
    sink: &mut LogSink,
) {
    if let Err(e) = service.handle_command(cmd, now_ms, hw, store, sink) {
        error!("command failed: {e}");
    }
}
