//! Blocking delay used for playback pauses.
//!
//! On ESP-IDF this is the FreeRTOS tick delay, which yields the core to
//! other tasks.  On host it is `std::thread::sleep`.

use embedded_hal::delay::DelayNs;

#[derive(Debug, Clone, Copy, Default)]
pub struct SysDelay;

#[cfg(target_os = "espidf")]
impl DelayNs for SysDelay {
    fn delay_ns(&mut self, ns: u32) {
        esp_idf_hal::delay::FreeRtos.delay_ns(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }
}

#[cfg(not(target_os = "espidf"))]
impl DelayNs for SysDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(ns as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(ms as u64));
    }
}
