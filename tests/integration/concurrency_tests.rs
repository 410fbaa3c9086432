//! Multi-threaded runs: edges injected from an "ISR" thread while the
//! composition, tilt and transmitter work runs on its own threads, plus
//! one run of the real task loops against mocks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tiltmorse::app::router::ButtonEventRouter;
use tiltmorse::app::shared::Shared;
use tiltmorse::app::transmitter::{ACK_TEXT, Transmitter};
use tiltmorse::config::SystemConfig;
use tiltmorse::drivers::button::{ButtonId, on_edge};
use tiltmorse::events::drain_edges;
use tiltmorse::fsm::SystemState;
use tiltmorse::sensors::tilt::TiltCategory;
use tiltmorse::tasks::{self, Peripherals};

use crate::mock_hw::{MockDisplay, MockImu, MockWire, RecordingSink, Timeline};

/// Every message on the wire is one or more symbols followed by `"  \n"`.
fn assert_well_formed(wire: &[u8]) {
    assert!(wire.is_empty() || wire.ends_with(b"\n"), "torn message: {:?}", wire);
    for chunk in wire.split(|&b| b == b'\n').filter(|c| !c.is_empty()) {
        assert!(chunk.len() >= 3, "message without a symbol: {:?}", chunk);
        assert!(chunk.ends_with(b"  "), "missing terminator: {:?}", chunk);
        assert!(
            chunk.iter().all(|b| matches!(b, b'.' | b'-' | b' ')),
            "foreign byte in {:?}",
            chunk
        );
    }
}

fn wait_until(what: &str, mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for {}", what);
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn edges_during_transmit_never_tear_a_message() {
    let shared = Shared::new();
    let wire = MockWire::new();
    let stop = AtomicBool::new(false);

    std::thread::scope(|s| {
        // ISR: alternating bursts of symbol and send presses.
        s.spawn(|| {
            let mut now_ms = 1_000u32;
            for i in 0..3_000u32 {
                now_ms += 210;
                let button = if i % 7 == 6 { ButtonId::Send } else { ButtonId::Symbol };
                on_edge(&shared, button, now_ms);
                if i % 64 == 0 {
                    std::thread::yield_now();
                }
            }
            stop.store(true, Ordering::Release);
        });

        // Tilt publisher.
        s.spawn(|| {
            let cycle = [TiltCategory::Left, TiltCategory::Middle, TiltCategory::Right];
            let mut i = 0;
            while !stop.load(Ordering::Acquire) {
                shared.tilt.store(cycle[i % cycle.len()]);
                i += 1;
                std::thread::yield_now();
            }
        });

        // Composition.
        s.spawn(|| {
            let mut router = ButtonEventRouter::new(&shared, RecordingSink::new());
            loop {
                let done = stop.load(Ordering::Acquire);
                drain_edges(&shared.edges, |edge| {
                    router.handle_edge(edge);
                });
                if done {
                    break;
                }
                std::thread::yield_now();
            }
        });

        // Transmitter.
        s.spawn(|| {
            let mut tx = Transmitter::new(&shared, wire.clone(), MockDisplay::new(), RecordingSink::new());
            loop {
                let done = stop.load(Ordering::Acquire);
                tx.service();
                if done {
                    break;
                }
                std::thread::yield_now();
            }
        });
    });

    let sent = wire.sent();
    assert_well_formed(&sent);

    let newlines = sent.iter().filter(|&&b| b == b'\n').count() as u32;
    let counters = shared.counters.snapshot();
    assert_eq!(counters.messages_sent, newlines);
    assert!(counters.messages_sent > 0);
    assert_eq!(
        counters.edges_accepted + counters.edges_debounced + counters.edges_dropped,
        3_000
    );

    let state = shared.state.load();
    assert!(matches!(state, SystemState::Idle | SystemState::Recording | SystemState::Sending));
    if state != SystemState::Sending {
        assert!(!shared.with_outgoing(|m| m.is_sealed()));
    }
}

#[test]
fn spawned_tasks_receive_then_compose_and_send() {
    let shared: &'static Shared = Box::leak(Box::new(Shared::new()));
    let config = SystemConfig::default();
    shared.apply_config(&config);

    let imu = MockImu::new();
    let wire = MockWire::new();
    let display = MockDisplay::new();
    let timeline = Timeline::new();

    tasks::spawn_all(
        shared,
        &config,
        Peripherals {
            imu: imu.clone(),
            display: display.clone(),
            serial: wire.clone(),
            tone: timeline.tone(),
            delay: timeline.delay(),
            sink: RecordingSink::new(),
        },
    )
    .unwrap();

    // Inbound message is shown, played and cleared.
    wire.feed(b".-\n");
    wait_until("playback", || display.texts().iter().any(|t| t == ".-"));
    wait_until("return to idle", || {
        shared.state.load() == SystemState::Idle && shared.with_incoming(|m| m.is_empty())
    });
    assert_eq!(timeline.tones(), [config.dot_ms, config.dash_ms]);

    // Compose dashes and send them.
    imu.tilt(0.9);
    on_edge(shared, ButtonId::Symbol, 10_000);
    wait_until("recording", || shared.state.load() == SystemState::Recording);
    wait_until("tilt sampled", || shared.tilt.load() == TiltCategory::Right);

    // The entering press may already have seen the new tilt.
    let entered = shared.with_outgoing(|m| m.len());
    assert!(entered <= 1);
    on_edge(shared, ButtonId::Symbol, 10_300);
    wait_until("symbol appended", || shared.with_outgoing(|m| m.len()) == entered + 1);

    let expected = format!("{}  \n", "-".repeat(entered + 1));
    on_edge(shared, ButtonId::Send, 10_600);
    wait_until("message sent", || wire.sent() == expected.as_bytes());
    wait_until("ack shown", || display.texts().last().map(String::as_str) == Some(ACK_TEXT));
    wait_until("idle after send", || shared.state.load() == SystemState::Idle);
}
