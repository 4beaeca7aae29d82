//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a subsystem against the
//! mock adapters in `mock_hw`.  All tests run on the host with a simulated
//! clock — no real hardware required.

mod mock_hw;
mod sequencer_tests;
mod store_tests;
