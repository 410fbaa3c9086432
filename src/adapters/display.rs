//! Text display adapter.
//!
//! Implements [`DisplayPort`] by keeping the current screen contents and
//! echoing every redraw to the log console.  A panel driver would implement
//! the same trait.

use heapless::String;
use log::info;

use crate::app::ports::DisplayPort;
use crate::message::INCOMING_CAPACITY;

/// Readiness banner shown once at boot.
pub const BOOT_BANNER: &str = "TiltMorse ready";

#[derive(Debug, Default)]
pub struct LogDisplay {
    screen: String<INCOMING_CAPACITY>,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// What the screen currently shows.
    pub fn contents(&self) -> &str {
        &self.screen
    }
}

impl DisplayPort for LogDisplay {
    fn clear(&mut self) {
        self.screen.clear();
    }

    fn write_text(&mut self, text: &str) {
        self.screen.clear();
        for c in text.chars() {
            if self.screen.push(c).is_err() {
                break;
            }
        }
        info!("LCD   | {}", self.screen);
    }
}
