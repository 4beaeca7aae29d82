//! MouldBot paper-pulp moulding machine controller.
//!
//! Hexagonal layout:
//! - [`sequencer`] — the run state machine (pure domain, host-testable)
//! - [`store`] — persisted phase durations
//! - [`app`] — ports, commands, events and the orchestrating service
//! - [`drivers`] — `embedded-hal` hardware drivers (relay bank, buttons)
//! - [`adapters`] — ESP32 implementations of the ports, with simulation
//!   backends for host tests
//!
//! The domain layers never touch a clock or a bus directly; timestamps and
//! port implementations are handed in by the host loop in `main.rs`.

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod events;
pub mod pins;
pub mod sequencer;
pub mod store;
