//! Mock adapters for integration tests.
//!
//! Every mock records what the core asked of it so tests can assert on
//! the full call history without a sensor, screen, buzzer or serial port.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use embedded_hal::delay::DelayNs;
use tiltmorse::app::events::AppEvent;
use tiltmorse::app::ports::{ByteTransport, DisplayPort, EventSink, ImuPort, TonePort};
use tiltmorse::error::{SensorError, TransportError};
use tiltmorse::sensors::ImuSample;

// ── IMU ───────────────────────────────────────────────────────

/// Reports whatever X-axis acceleration the test last set.  Cloned
/// handles share the value, so a test can tilt the device while a task
/// owns the sensor.
#[derive(Clone, Default)]
pub struct MockImu {
    ax: Arc<Mutex<Option<f32>>>,
}

#[allow(dead_code)]
impl MockImu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tilt(&self, ax: f32) {
        *self.ax.lock().unwrap() = Some(ax);
    }

    /// Subsequent reads fail with a bus error.
    pub fn unplug(&self) {
        *self.ax.lock().unwrap() = None;
    }
}

impl ImuPort for MockImu {
    fn read_sample(&mut self) -> Result<ImuSample, SensorError> {
        match *self.ax.lock().unwrap() {
            Some(ax) => Ok(ImuSample {
                ax,
                az: 1.0,
                ..ImuSample::default()
            }),
            None => Err(SensorError::Bus),
        }
    }
}

// ── Serial link ───────────────────────────────────────────────

#[derive(Default)]
pub struct WireState {
    pub inbox: VecDeque<u8>,
    pub outbox: Vec<u8>,
    pub fail_writes: bool,
}

/// Both directions of the serial link.  Cloned handles share state.
#[derive(Clone, Default)]
pub struct MockWire(pub Arc<Mutex<WireState>>);

#[allow(dead_code)]
impl MockWire {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&self, bytes: &[u8]) {
        self.0.lock().unwrap().inbox.extend(bytes.iter().copied());
    }

    pub fn sent(&self) -> Vec<u8> {
        self.0.lock().unwrap().outbox.clone()
    }

    pub fn pending_inbound(&self) -> usize {
        self.0.lock().unwrap().inbox.len()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.0.lock().unwrap().fail_writes = fail;
    }
}

impl ByteTransport for MockWire {
    fn try_read_byte(&mut self) -> Option<u8> {
        self.0.lock().unwrap().inbox.pop_front()
    }

    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), TransportError> {
        let mut wire = self.0.lock().unwrap();
        if wire.fail_writes {
            return Err(TransportError::ShortWrite {
                written: 0,
                expected: buf.len(),
            });
        }
        wire.outbox.extend_from_slice(buf);
        Ok(())
    }
}

// ── Display ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCall {
    Clear,
    Text(String),
}

#[derive(Clone, Default)]
pub struct MockDisplay(pub Arc<Mutex<Vec<DisplayCall>>>);

#[allow(dead_code)]
impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<DisplayCall> {
        self.0.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                DisplayCall::Text(t) => Some(t),
                DisplayCall::Clear => None,
            })
            .collect()
    }
}

impl DisplayPort for MockDisplay {
    fn clear(&mut self) {
        self.0.lock().unwrap().push(DisplayCall::Clear);
    }

    fn write_text(&mut self, text: &str) {
        self.0.lock().unwrap().push(DisplayCall::Text(text.to_owned()));
    }
}

// ── Tone + delay ──────────────────────────────────────────────

/// One entry per tone or pause, in the order they happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Tone { freq_hz: u32, duration_ms: u32 },
    Pause { duration_ms: u32 },
}

/// Shared timeline written by [`MockTone`] and [`MockDelay`].  Nothing
/// actually sleeps.
#[derive(Clone, Default)]
pub struct Timeline(pub Arc<Mutex<Vec<Sound>>>);

#[allow(dead_code)]
impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sounds(&self) -> Vec<Sound> {
        self.0.lock().unwrap().clone()
    }

    pub fn tones(&self) -> Vec<u32> {
        self.sounds()
            .into_iter()
            .filter_map(|s| match s {
                Sound::Tone { duration_ms, .. } => Some(duration_ms),
                Sound::Pause { .. } => None,
            })
            .collect()
    }

    pub fn tone(&self) -> MockTone {
        MockTone(self.clone())
    }

    pub fn delay(&self) -> MockDelay {
        MockDelay(self.clone())
    }
}

pub struct MockTone(Timeline);

impl TonePort for MockTone {
    fn play_tone(&mut self, freq_hz: u32, duration_ms: u32) {
        self.0
            .0
            .lock()
            .unwrap()
            .push(Sound::Tone { freq_hz, duration_ms });
    }
}

pub struct MockDelay(Timeline);

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.0.lock().unwrap().push(Sound::Pause {
            duration_ms: ns / 1_000_000,
        });
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.0.lock().unwrap().push(Sound::Pause { duration_ms: ms });
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecordingSink(pub Arc<Mutex<Vec<AppEvent>>>);

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AppEvent> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}
