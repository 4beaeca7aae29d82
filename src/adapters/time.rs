//! Monotonic time adapter.
//!
//! - **`target_os = "espidf"`** — wraps `esp_timer_get_time()` (microsecond
//!   resolution, monotonic since boot).
//! - **`not(target_os = "espidf")`** — `std::time::Instant`, for host tests.
//!
//! Everything in the domain takes `now_ms` as an argument instead of
//! reading a clock, so this adapter is only touched by the host loop.

pub struct TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Milliseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn now_ms(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000
    }

    /// Milliseconds since boot (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Default for TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}
