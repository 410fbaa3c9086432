//! ESP32 time adapter.
//!
//! Monotonic time since boot.
//!
//! - **`target_os = "espidf"`**: `esp_timer_get_time()` (microsecond,
//!   monotonic, safe from ISR context).
//! - **`not(target_os = "espidf")`**: `std::time::Instant` for host-side
//!   testing and simulation.

/// Time adapter for the ESP32-S3 platform.
pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Seconds since boot.
    pub fn uptime_secs(&self) -> u64 {
        self.uptime_us() / 1_000_000
    }

    /// Milliseconds since boot, truncated to the width the debounce clocks
    /// use (wraps after ~49 days).
    pub fn uptime_ms(&self) -> u32 {
        (self.uptime_us() / 1_000) as u32
    }

    #[cfg(target_os = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        now_us()
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

/// Microseconds since boot.  Callable from an ISR.
#[cfg(target_os = "espidf")]
pub fn now_us() -> u64 {
    // SAFETY: esp_timer_get_time is a counter read with no side effects.
    (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
}
