//! Fuzz target: `ReceiverIngest::poll` + `DisplayPlayer::service`
//!
//! Streams arbitrary bytes over a fake serial link and plays every message
//! that completes.  The incoming buffer must never exceed its capacity,
//! the rendered text must match it byte for byte, and every message must
//! end back in Idle.
//!
//! cargo fuzz run fuzz_receiver

#![no_main]

use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use libfuzzer_sys::fuzz_target;
use tiltmorse::adapters::display::LogDisplay;
use tiltmorse::app::events::AppEvent;
use tiltmorse::app::player::{DisplayPlayer, PlaybackTiming, render_text};
use tiltmorse::app::ports::{ByteTransport, EventSink, TonePort};
use tiltmorse::app::receiver::ReceiverIngest;
use tiltmorse::app::shared::Shared;
use tiltmorse::error::TransportError;
use tiltmorse::fsm::SystemState;
use tiltmorse::message::INCOMING_CAPACITY;

struct Feed(VecDeque<u8>);

impl ByteTransport for Feed {
    fn try_read_byte(&mut self) -> Option<u8> {
        self.0.pop_front()
    }

    fn write_bytes(&mut self, _buf: &[u8]) -> Result<(), TransportError> {
        Ok(())
    }
}

struct Mute;

impl TonePort for Mute {
    fn play_tone(&mut self, _freq_hz: u32, _duration_ms: u32) {}
}

impl DelayNs for Mute {
    fn delay_ns(&mut self, _ns: u32) {}
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let shared = Shared::new();
    let mut receiver = ReceiverIngest::new(&shared, Feed(data.iter().copied().collect()), Discard);
    let mut player = DisplayPlayer::new(
        &shared,
        LogDisplay::new(),
        Mute,
        Mute,
        PlaybackTiming::default(),
        Discard,
    );

    loop {
        let consumed = receiver.poll();
        let len = shared.with_incoming(|m| m.len());
        assert!(len <= INCOMING_CAPACITY);

        if shared.state.load() == SystemState::DisplayUpdate {
            let text = shared.with_incoming(|m| render_text(m.as_bytes()));
            assert_eq!(text.len(), len);
            assert!(player.service());
            assert_eq!(shared.state.load(), SystemState::Idle);
            assert!(shared.with_incoming(|m| m.is_empty()));
        } else if consumed == 0 {
            break;
        }
    }

    // Whatever is left is an unterminated message.
    assert!(matches!(
        shared.state.load(),
        SystemState::Idle | SystemState::Receiving
    ));
});
