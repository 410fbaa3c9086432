//! Composition and send flow: buttons and tilt in, bytes on the wire out.
//!
//! Edges go through the real ISR path (`on_edge` → `EdgeQueue`) and are
//! drained into the router the way the composition task does.

use tiltmorse::app::events::AppEvent;
use tiltmorse::app::router::{ButtonEventRouter, RouteOutcome};
use tiltmorse::app::shared::Shared;
use tiltmorse::app::tilt::TiltClassifier;
use tiltmorse::app::transmitter::{ACK_TEXT, SEND_FAILED_TEXT, Transmitter};
use tiltmorse::drivers::button::{ButtonId, EdgeOutcome, on_edge};
use tiltmorse::events::drain_edges;
use tiltmorse::fsm::SystemState;
use tiltmorse::message::{BufferError, OutgoingMessage, Symbol};
use tiltmorse::sensors::tilt::{TiltCategory, TiltThresholds};

use crate::mock_hw::{DisplayCall, MockDisplay, MockImu, MockWire, RecordingSink};

const LEFT: f32 = -0.8;
const MIDDLE: f32 = 0.0;
const RIGHT: f32 = 0.8;

struct Rig<'a> {
    shared: &'a Shared,
    router: ButtonEventRouter<'a, RecordingSink>,
    tilt: TiltClassifier<'a, MockImu, RecordingSink>,
    transmitter: Transmitter<'a, MockWire, MockDisplay, RecordingSink>,
    imu: MockImu,
    wire: MockWire,
    display: MockDisplay,
    sink: RecordingSink,
    now_ms: u32,
}

impl<'a> Rig<'a> {
    fn new(shared: &'a Shared) -> Self {
        let imu = MockImu::new();
        let wire = MockWire::new();
        let display = MockDisplay::new();
        let sink = RecordingSink::new();
        Self {
            shared,
            router: ButtonEventRouter::new(shared, sink.clone()),
            tilt: TiltClassifier::new(shared, imu.clone(), TiltThresholds::default(), sink.clone()),
            transmitter: Transmitter::new(shared, wire.clone(), display.clone(), sink.clone()),
            imu,
            wire,
            display,
            sink,
            now_ms: 1_000,
        }
    }

    /// A press well outside the debounce window of the previous one.
    fn press(&mut self, button: ButtonId) -> Vec<RouteOutcome> {
        self.now_ms += 300;
        assert_eq!(on_edge(self.shared, button, self.now_ms), EdgeOutcome::Accepted);
        let mut outcomes = Vec::new();
        drain_edges(&self.shared.edges, |edge| outcomes.push(self.router.handle_edge(edge)));
        outcomes
    }

    fn tilt_and_press(&mut self, ax: f32) -> Vec<RouteOutcome> {
        self.imu.tilt(ax);
        self.tilt.sample();
        self.press(ButtonId::Symbol)
    }
}

#[test]
fn compose_three_tilts_and_send() {
    let shared = Shared::new();
    let mut rig = Rig::new(&shared);

    // Nothing sampled yet, so the first press only starts the recording.
    assert_eq!(rig.press(ButtonId::Symbol), [RouteOutcome::StartedRecording(None)]);
    assert_eq!(rig.tilt_and_press(LEFT), [RouteOutcome::Appended(Symbol::Dot)]);
    assert_eq!(rig.tilt_and_press(MIDDLE), [RouteOutcome::Appended(Symbol::Space)]);
    assert_eq!(rig.tilt_and_press(RIGHT), [RouteOutcome::Appended(Symbol::Dash)]);
    assert_eq!(rig.press(ButtonId::Send), [RouteOutcome::Sealed]);
    assert_eq!(shared.state.load(), SystemState::Sending);

    assert!(rig.transmitter.service());

    assert_eq!(rig.wire.sent(), b". -  \n");
    assert_eq!(shared.state.load(), SystemState::Idle);
    assert!(shared.with_outgoing(|m| m.is_empty()));
    assert_eq!(
        rig.display.calls(),
        [DisplayCall::Clear, DisplayCall::Text(ACK_TEXT.into())]
    );
    assert_eq!(shared.counters.snapshot().messages_sent, 1);
    assert_eq!(shared.counters.snapshot().symbols_appended, 3);
}

#[test]
fn second_message_starts_from_empty_buffer() {
    let shared = Shared::new();
    let mut rig = Rig::new(&shared);

    rig.press(ButtonId::Symbol);
    rig.tilt_and_press(RIGHT);
    rig.press(ButtonId::Send);
    rig.transmitter.service();

    // The last sample (Right) is still current when the next recording
    // starts, so the entering press appends a dash.
    assert_eq!(
        rig.press(ButtonId::Symbol),
        [RouteOutcome::StartedRecording(Some(Symbol::Dash))]
    );
    rig.tilt_and_press(LEFT);
    rig.tilt_and_press(LEFT);
    rig.press(ButtonId::Send);
    rig.transmitter.service();

    assert_eq!(rig.wire.sent(), b"-  \n-..  \n");
}

#[test]
fn send_with_no_symbols_is_refused() {
    let shared = Shared::new();
    let mut rig = Rig::new(&shared);

    rig.press(ButtonId::Symbol);
    assert_eq!(
        rig.press(ButtonId::Send),
        [RouteOutcome::Refused(BufferError::Empty)]
    );
    assert_eq!(shared.state.load(), SystemState::Recording);
    assert!(!rig.transmitter.service());
    assert!(rig.wire.sent().is_empty());
}

#[test]
fn send_button_in_idle_is_ignored() {
    let shared = Shared::new();
    let mut rig = Rig::new(&shared);

    assert_eq!(
        rig.press(ButtonId::Send),
        [RouteOutcome::Ignored(SystemState::Idle)]
    );
    assert_eq!(shared.state.load(), SystemState::Idle);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::EdgeIgnored { .. })),
        1
    );
}

#[test]
fn unknown_tilt_appends_nothing() {
    let shared = Shared::new();
    let mut rig = Rig::new(&shared);

    rig.press(ButtonId::Symbol);
    rig.imu.unplug();
    rig.tilt.sample();
    assert_eq!(shared.tilt.load(), TiltCategory::Unknown);
    assert_eq!(rig.press(ButtonId::Symbol), [RouteOutcome::NoTilt]);
    assert!(shared.with_outgoing(|m| m.is_empty()));
    assert_eq!(shared.counters.snapshot().sensor_failures, 1);
}

#[test]
fn sensor_failure_keeps_last_tilt() {
    let shared = Shared::new();
    let mut rig = Rig::new(&shared);

    rig.press(ButtonId::Symbol);
    rig.imu.tilt(RIGHT);
    rig.tilt.sample();
    rig.imu.unplug();
    assert_eq!(rig.tilt.sample(), None);
    assert_eq!(shared.tilt.load(), TiltCategory::Right);
    assert_eq!(rig.press(ButtonId::Symbol), [RouteOutcome::Appended(Symbol::Dash)]);
}

#[test]
fn sensor_is_not_read_outside_recording() {
    let shared = Shared::new();
    let mut rig = Rig::new(&shared);

    rig.imu.tilt(LEFT);
    assert_eq!(rig.tilt.sample(), None);
    assert_eq!(shared.tilt.load(), TiltCategory::Unknown);
}

#[test]
fn buttons_during_sending_are_ignored() {
    let shared = Shared::new();
    let mut rig = Rig::new(&shared);

    rig.press(ButtonId::Symbol);
    rig.tilt_and_press(LEFT);
    rig.press(ButtonId::Send);

    assert_eq!(
        rig.tilt_and_press(RIGHT),
        [RouteOutcome::Ignored(SystemState::Sending)]
    );
    assert_eq!(
        rig.press(ButtonId::Send),
        [RouteOutcome::Ignored(SystemState::Sending)]
    );
    rig.transmitter.service();
    assert_eq!(rig.wire.sent(), b".  \n");
}

#[test]
fn chatter_inside_debounce_window_is_dropped() {
    let shared = Shared::new();
    let rig = Rig::new(&shared);

    assert_eq!(on_edge(rig.shared, ButtonId::Symbol, 5_000), EdgeOutcome::Accepted);
    assert_eq!(on_edge(rig.shared, ButtonId::Symbol, 5_020), EdgeOutcome::Debounced);
    assert_eq!(on_edge(rig.shared, ButtonId::Symbol, 5_199), EdgeOutcome::Debounced);
    // The other button has its own clock.
    assert_eq!(on_edge(rig.shared, ButtonId::Send, 5_010), EdgeOutcome::Accepted);

    let mut n = 0;
    drain_edges(&shared.edges, |_| n += 1);
    assert_eq!(n, 2);
    assert_eq!(shared.counters.snapshot().edges_debounced, 2);
}

#[test]
fn transport_failure_still_returns_to_idle() {
    let shared = Shared::new();
    let mut rig = Rig::new(&shared);
    rig.wire.fail_writes(true);

    rig.press(ButtonId::Symbol);
    rig.tilt_and_press(LEFT);
    rig.press(ButtonId::Send);
    assert!(rig.transmitter.service());

    assert_eq!(shared.state.load(), SystemState::Idle);
    assert!(shared.with_outgoing(|m| m.is_empty()));
    assert_eq!(rig.display.texts(), [SEND_FAILED_TEXT]);
    assert_eq!(shared.counters.snapshot().transmit_failures, 1);
}

#[test]
fn full_buffer_refuses_symbols_but_still_sends() {
    let shared = Shared::new();
    let mut rig = Rig::new(&shared);

    rig.press(ButtonId::Symbol);
    rig.imu.tilt(LEFT);
    rig.tilt.sample();
    for _ in 0..OutgoingMessage::max_symbols() {
        shared.with_outgoing(|m| m.push_symbol(Symbol::Dot)).unwrap();
    }

    assert_eq!(
        rig.press(ButtonId::Symbol),
        [RouteOutcome::Refused(BufferError::Full)]
    );
    assert_eq!(rig.press(ButtonId::Send), [RouteOutcome::Sealed]);
    rig.transmitter.service();

    let sent = rig.wire.sent();
    assert_eq!(sent.len(), OutgoingMessage::max_symbols() + 3);
    assert!(sent.ends_with(b"  \n"));
}
