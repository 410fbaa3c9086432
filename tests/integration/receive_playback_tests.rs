//! Inbound flow: serial bytes in, screen text and tones out.

use tiltmorse::app::events::AppEvent;
use tiltmorse::app::player::{DisplayPlayer, PlaybackTiming};
use tiltmorse::app::receiver::ReceiverIngest;
use tiltmorse::app::router::{ButtonEventRouter, RouteOutcome};
use tiltmorse::app::shared::Shared;
use tiltmorse::drivers::button::ButtonId;
use tiltmorse::events::ButtonEdge;
use tiltmorse::fsm::SystemState;
use tiltmorse::message::INCOMING_CAPACITY;

use crate::mock_hw::{DisplayCall, MockDisplay, MockWire, RecordingSink, Sound, Timeline};

struct Rig<'a> {
    shared: &'a Shared,
    receiver: ReceiverIngest<'a, MockWire, RecordingSink>,
    player: DisplayPlayer<'a, MockDisplay, crate::mock_hw::MockTone, crate::mock_hw::MockDelay, RecordingSink>,
    wire: MockWire,
    display: MockDisplay,
    timeline: Timeline,
    sink: RecordingSink,
}

impl<'a> Rig<'a> {
    fn new(shared: &'a Shared) -> Self {
        let wire = MockWire::new();
        let display = MockDisplay::new();
        let timeline = Timeline::new();
        let sink = RecordingSink::new();
        Self {
            shared,
            receiver: ReceiverIngest::new(shared, wire.clone(), sink.clone()),
            player: DisplayPlayer::new(
                shared,
                display.clone(),
                timeline.tone(),
                timeline.delay(),
                PlaybackTiming::default(),
                sink.clone(),
            ),
            wire,
            display,
            timeline,
            sink,
        }
    }
}

#[test]
fn dash_dot_dash_plays_long_short_long() {
    let shared = Shared::new();
    let mut rig = Rig::new(&shared);
    let t = PlaybackTiming::default();

    rig.wire.feed(b"-.-\n");
    assert_eq!(rig.receiver.poll(), 4);
    assert_eq!(shared.state.load(), SystemState::DisplayUpdate);

    assert!(rig.player.service());

    assert_eq!(rig.timeline.tones(), [t.dash_ms, t.dot_ms, t.dash_ms]);
    assert_eq!(
        rig.timeline.sounds(),
        [
            Sound::Tone { freq_hz: t.tone_freq_hz, duration_ms: t.dash_ms },
            Sound::Pause { duration_ms: t.symbol_gap_ms },
            Sound::Tone { freq_hz: t.tone_freq_hz, duration_ms: t.dot_ms },
            Sound::Pause { duration_ms: t.symbol_gap_ms },
            Sound::Tone { freq_hz: t.tone_freq_hz, duration_ms: t.dash_ms },
            Sound::Pause { duration_ms: t.symbol_gap_ms },
            Sound::Pause { duration_ms: t.hold_ms },
        ]
    );
    assert_eq!(
        rig.display.calls(),
        [DisplayCall::Clear, DisplayCall::Text("-.-".into())]
    );
    assert_eq!(shared.state.load(), SystemState::Idle);
    assert!(shared.with_incoming(|m| m.is_empty()));
}

#[test]
fn message_split_across_polls() {
    let shared = Shared::new();
    let mut rig = Rig::new(&shared);

    rig.wire.feed(b"..");
    assert_eq!(rig.receiver.poll(), 2);
    assert_eq!(shared.state.load(), SystemState::Receiving);
    assert!(!rig.player.service());

    rig.wire.feed(b" -\n");
    rig.receiver.poll();
    assert_eq!(shared.state.load(), SystemState::DisplayUpdate);
    assert_eq!(shared.with_incoming(|m| m.as_bytes().to_vec()), b".. -");

    rig.player.service();
    assert_eq!(rig.display.texts(), [".. -"]);
}

#[test]
fn bytes_after_terminator_wait_for_next_message() {
    let shared = Shared::new();
    let mut rig = Rig::new(&shared);

    rig.wire.feed(b".\n-\n");
    assert_eq!(rig.receiver.poll(), 2);
    assert_eq!(rig.wire.pending_inbound(), 2);

    // Nothing is read while the first message plays.
    assert_eq!(rig.receiver.poll(), 0);
    rig.player.service();

    assert_eq!(rig.receiver.poll(), 2);
    rig.player.service();
    assert_eq!(rig.display.texts(), [".", "-"]);
    assert_eq!(shared.counters.snapshot().messages_received, 2);
}

#[test]
fn non_morse_bytes_render_as_replacement_and_stay_silent() {
    let shared = Shared::new();
    let mut rig = Rig::new(&shared);

    rig.wire.feed(b"a.\x01\n");
    rig.receiver.poll();
    rig.player.service();

    assert_eq!(rig.display.texts(), ["a.?"]);
    assert_eq!(rig.timeline.tones(), [PlaybackTiming::default().dot_ms]);
}

#[test]
fn overflow_drops_excess_bytes() {
    let shared = Shared::new();
    let mut rig = Rig::new(&shared);

    let long = vec![b'.'; INCOMING_CAPACITY + 10];
    rig.wire.feed(&long);
    rig.wire.feed(b"\n");
    while shared.state.load() != SystemState::DisplayUpdate {
        assert!(rig.receiver.poll() > 0);
    }

    assert_eq!(shared.with_incoming(|m| m.len()), INCOMING_CAPACITY);
    assert_eq!(shared.counters.snapshot().bytes_dropped, 10);
    rig.player.service();
    assert_eq!(rig.timeline.tones().len(), INCOMING_CAPACITY);
}

#[test]
fn bare_newline_is_an_empty_message() {
    let shared = Shared::new();
    let mut rig = Rig::new(&shared);

    rig.wire.feed(b"\n");
    rig.receiver.poll();
    assert_eq!(shared.state.load(), SystemState::DisplayUpdate);

    rig.player.service();
    assert!(rig.timeline.tones().is_empty());
    assert_eq!(shared.state.load(), SystemState::Idle);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::PlaybackFinished { len: 0 })),
        1
    );
}

#[test]
fn inbound_bytes_wait_while_composing() {
    let shared = Shared::new();
    let mut rig = Rig::new(&shared);
    let mut router = ButtonEventRouter::new(&shared, RecordingSink::new());

    let edge = ButtonEdge {
        button: ButtonId::Symbol,
        at_ms: 1_000,
    };
    assert_eq!(router.handle_edge(edge), RouteOutcome::StartedRecording(None));

    rig.wire.feed(b"-\n");
    assert_eq!(rig.receiver.poll(), 0);
    assert_eq!(rig.wire.pending_inbound(), 2);
    assert_eq!(rig.shared.state.load(), SystemState::Recording);
}

#[test]
fn symbol_press_during_receive_is_ignored() {
    let shared = Shared::new();
    let mut rig = Rig::new(&shared);
    let mut router = ButtonEventRouter::new(&shared, RecordingSink::new());

    rig.wire.feed(b".");
    rig.receiver.poll();

    let edge = ButtonEdge {
        button: ButtonId::Symbol,
        at_ms: 1_000,
    };
    assert_eq!(
        router.handle_edge(edge),
        RouteOutcome::Ignored(SystemState::Receiving)
    );
    assert!(shared.with_outgoing(|m| m.is_empty()));
}
