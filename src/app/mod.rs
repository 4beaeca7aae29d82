//! Application layer: ports, commands, events and the service that ties
//! the sequencer, the duration store and the hardware adapters together.

pub mod commands;
pub mod editor;
pub mod events;
pub mod ports;
pub mod service;

pub use commands::AppCommand;
pub use editor::DurationEditor;
pub use events::AppEvent;
pub use ports::{Actuator, ActuatorPort, EepromPort, EventSink};
pub use service::AppService;
