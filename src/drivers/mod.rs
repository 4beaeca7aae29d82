//! Hardware drivers, written against `embedded-hal` traits so they run
//! unchanged on the target and under host tests with mock buses.

pub mod button;
pub mod relay;

pub use button::{ButtonEdge, DebouncedButton};
pub use relay::RelayBank;
