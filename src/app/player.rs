//! DisplayPlayer: renders the received message and plays it back.
//!
//! ## Cadence
//!
//! | Byte  | Cue                                  |
//! |-------|--------------------------------------|
//! | `.`   | tone `dot_ms`, then `symbol_gap_ms`  |
//! | `-`   | tone `dash_ms`, then `symbol_gap_ms` |
//! | ` `   | silence `word_gap_ms`                |
//! | other | nothing                              |
//!
//! After the last cue the player holds for `display_hold_ms`, then clears
//! the receive buffer and returns the register to Idle.  The text stays on
//! screen until the next message or acknowledgement replaces it.
//!
//! Playback blocks this task for the whole sequence.  The register stays
//! in DisplayUpdate throughout, so nothing else is waiting on this task.

use embedded_hal::delay::DelayNs;
use heapless::String;
use log::{error, info};

use crate::config::SystemConfig;
use crate::fsm::{SystemState, Trigger};
use crate::message::{INCOMING_CAPACITY, Symbol};

use super::events::AppEvent;
use super::ports::{DisplayPort, EventSink, TonePort};
use super::shared::Shared;

/// Shown in place of bytes that are not printable ASCII.
pub const REPLACEMENT_CHAR: char = '?';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackTiming {
    pub tone_freq_hz: u32,
    pub dot_ms: u32,
    pub dash_ms: u32,
    pub symbol_gap_ms: u32,
    pub word_gap_ms: u32,
    pub hold_ms: u32,
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self::from_config(&SystemConfig::default())
    }
}

impl PlaybackTiming {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            tone_freq_hz: config.tone_freq_hz,
            dot_ms: config.dot_ms,
            dash_ms: config.dash_ms,
            symbol_gap_ms: config.symbol_gap_ms,
            word_gap_ms: config.word_gap_ms,
            hold_ms: config.display_hold_ms,
        }
    }
}

/// One step of the audible sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Tone { freq_hz: u32, duration_ms: u32 },
    Silence { duration_ms: u32 },
}

impl Cue {
    pub fn duration_ms(self) -> u32 {
        match self {
            Self::Tone { duration_ms, .. } | Self::Silence { duration_ms } => duration_ms,
        }
    }
}

/// The cue sequence for `bytes`.
pub fn playback_plan<'a>(
    bytes: &'a [u8],
    timing: &'a PlaybackTiming,
) -> impl Iterator<Item = Cue> + 'a {
    bytes
        .iter()
        .filter_map(|&b| Symbol::from_byte(b))
        .flat_map(move |symbol| {
            let tone = |duration_ms| Cue::Tone {
                freq_hz: timing.tone_freq_hz,
                duration_ms,
            };
            let gap = Cue::Silence {
                duration_ms: timing.symbol_gap_ms,
            };
            let (first, second) = match symbol {
                Symbol::Dot => (tone(timing.dot_ms), Some(gap)),
                Symbol::Dash => (tone(timing.dash_ms), Some(gap)),
                Symbol::Space => (
                    Cue::Silence {
                        duration_ms: timing.word_gap_ms,
                    },
                    None,
                ),
            };
            core::iter::once(first).chain(second)
        })
}

/// Screen text for `bytes`: printable ASCII as-is, everything else `?`.
pub fn render_text(bytes: &[u8]) -> String<INCOMING_CAPACITY> {
    let mut text = String::new();
    for &b in bytes {
        let c = if b.is_ascii_graphic() || b == b' ' {
            b as char
        } else {
            REPLACEMENT_CHAR
        };
        // Capacity equals the receive buffer's, one char per byte.
        let _ = text.push(c);
    }
    text
}

pub struct DisplayPlayer<'a, D: DisplayPort, T: TonePort, P: DelayNs, S: EventSink> {
    shared: &'a Shared,
    display: D,
    tone: T,
    delay: P,
    timing: PlaybackTiming,
    sink: S,
}

impl<'a, D: DisplayPort, T: TonePort, P: DelayNs, S: EventSink> DisplayPlayer<'a, D, T, P, S> {
    pub fn new(
        shared: &'a Shared,
        display: D,
        tone: T,
        delay: P,
        timing: PlaybackTiming,
        sink: S,
    ) -> Self {
        Self {
            shared,
            display,
            tone,
            delay,
            timing,
            sink,
        }
    }

    /// Play the received message if the register holds DisplayUpdate.
    /// Returns `false` when there was nothing to do.
    pub fn service(&mut self) -> bool {
        if self.shared.state.load() != SystemState::DisplayUpdate {
            return false;
        }

        let message = self.shared.with_incoming(|m| m.clone());
        let bytes = message.as_bytes();

        self.display.clear();
        self.display.write_text(&render_text(bytes));

        for cue in playback_plan(bytes, &self.timing) {
            match cue {
                Cue::Tone {
                    freq_hz,
                    duration_ms,
                } => self.tone.play_tone(freq_hz, duration_ms),
                Cue::Silence { duration_ms } => self.delay.delay_ms(duration_ms),
            }
        }

        self.delay.delay_ms(self.timing.hold_ms);
        self.shared.with_incoming(|m| m.clear());

        info!("playback finished ({} bytes)", bytes.len());
        self.sink
            .emit(&AppEvent::PlaybackFinished { len: bytes.len() });
        match self
            .shared
            .state
            .transition(SystemState::DisplayUpdate, Trigger::PlaybackComplete)
        {
            Ok(to) => self.sink.emit(&AppEvent::StateChanged {
                from: SystemState::DisplayUpdate,
                to,
            }),
            Err(e) => error!("player could not leave DisplayUpdate: {}", e),
        }
        true
    }
}
