//! Port traits: the hexagonal boundary between the messenger core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ TiltClassifier / Transmitter / ReceiverIngest / DisplayPlayer
//! ```
//!
//! The motion sensor, text display, tone output and byte transport are
//! external collaborators with narrow contracts.  Components take them as
//! generics so every one can be driven by a mock in tests.  Pauses use
//! `embedded_hal::delay::DelayNs` directly.

use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{SensorError, TransportError};
use crate::sensors::ImuSample;

// ───────────────────────────────────────────────────────────────
// Motion sensor (driven adapter: hardware → core)
// ───────────────────────────────────────────────────────────────

/// Calibrated six-axis reading plus temperature.
pub trait ImuPort {
    fn read_sample(&mut self) -> Result<ImuSample, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Display (driven adapter: core → screen)
// ───────────────────────────────────────────────────────────────

pub trait DisplayPort {
    fn clear(&mut self);
    /// Replace the screen contents with `text`.
    fn write_text(&mut self, text: &str);
}

/// The Transmitter and the DisplayPlayer both draw on one screen.
impl<D: DisplayPort> DisplayPort for Arc<Mutex<D>> {
    fn clear(&mut self) {
        self.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn write_text(&mut self, text: &str) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .write_text(text);
    }
}

// ───────────────────────────────────────────────────────────────
// Tone output
// ───────────────────────────────────────────────────────────────

pub trait TonePort {
    /// Sound `freq_hz` for `duration_ms`.  Blocks for the whole duration.
    fn play_tone(&mut self, freq_hz: u32, duration_ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Byte transport (serial link)
// ───────────────────────────────────────────────────────────────

pub trait ByteTransport {
    /// Non-blocking: `None` when nothing is waiting.
    fn try_read_byte(&mut self) -> Option<u8>;

    /// Write the whole buffer or fail.
    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink (driven adapter: core → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// Components emit structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

impl<E: EventSink + ?Sized> EventSink for &mut E {
    fn emit(&mut self, event: &super::events::AppEvent) {
        (**self).emit(event);
    }
}
