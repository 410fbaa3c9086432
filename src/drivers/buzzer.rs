//! Passive buzzer on an LEDC PWM channel.
//!
//! A tone is the LEDC timer retuned to the requested frequency with the
//! channel at 50 % duty, held for the duration, then silenced.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives LEDC timer 0 / channel 0 via hw_init helpers.
//! On host/test: logs the tone and sleeps for its duration.

use log::debug;

use crate::app::ports::TonePort;
use crate::drivers::hw_init;

#[derive(Debug, Default)]
pub struct Buzzer {
    tones_played: u32,
}

impl Buzzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tones_played(&self) -> u32 {
        self.tones_played
    }

    #[cfg(target_os = "espidf")]
    fn hold(duration_ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(duration_ms);
    }

    #[cfg(not(target_os = "espidf"))]
    fn hold(duration_ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(duration_ms as u64));
    }
}

impl TonePort for Buzzer {
    fn play_tone(&mut self, freq_hz: u32, duration_ms: u32) {
        debug!("buzzer: {} Hz for {} ms", freq_hz, duration_ms);
        hw_init::buzzer_on(freq_hz);
        Self::hold(duration_ms);
        hw_init::buzzer_off();
        self.tones_played = self.tones_played.wrapping_add(1);
    }
}
