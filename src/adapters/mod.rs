//! Platform adapters: implementations of the application ports for the
//! ESP32 target, with simulation backends for host-side testing.

pub mod eeprom;
pub mod hardware;
pub mod log_sink;
pub mod time;

pub use eeprom::EepromAdapter;
pub use hardware::RelayAdapter;
pub use log_sink::LogSink;
pub use time::TimeAdapter;
