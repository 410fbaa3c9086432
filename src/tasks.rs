//! Task loops and startup wiring.
//!
//! ```text
//!  Core 1 (App)                          Core 0 (Pro)
//!  ┌─────────────┐ pri 5                 ┌──────────────┐ pri 2
//!  │ tilt        │ wait Recording        │ receiver     │ poll serial
//!  ├─────────────┤ pri 4                 ├──────────────┤ pri 2
//!  │ composition │ drain EdgeQueue       │ player       │ wait DisplayUpdate
//!  ├─────────────┤ pri 2                 └──────────────┘
//!  │ transmitter │ wait Sending
//!  └─────────────┘
//! ```
//!
//! Each task is a `std` thread (a FreeRTOS task on target) running one
//! async loop under `futures_lite::future::block_on`.  Loops that wait on
//! a state park in [`StateCell::wait_for`](crate::fsm::StateCell::wait_for)
//! and wake on the transition; the config periods bound the latency when a
//! wake-up is missed.  The composition task is never woken by an ISR; it
//! drains the edge queue every `edge_poll_ms`.

use core::time::Duration;
use std::thread::JoinHandle;

use async_io_mini::Timer;
use embedded_hal::delay::DelayNs;
use futures_lite::future::block_on;
use log::info;

use crate::app::player::{DisplayPlayer, PlaybackTiming};
use crate::app::ports::{ByteTransport, DisplayPort, EventSink, ImuPort, TonePort};
use crate::app::receiver::ReceiverIngest;
use crate::app::router::ButtonEventRouter;
use crate::app::shared::Shared;
use crate::app::tilt::TiltClassifier;
use crate::app::transmitter::Transmitter;
use crate::config::SystemConfig;
use crate::drivers::task_pin::{Core, TaskSpec, spawn_on_core};
use crate::error::Error;
use crate::events::drain_edges;
use crate::fsm::{SystemState, Waiter};
use crate::sensors::tilt::TiltThresholds;

// ── Task table ────────────────────────────────────────────────

pub const TILT_TASK: TaskSpec = TaskSpec {
    core: Core::App,
    priority: 5,
    stack_kb: 8,
    name: "tilt\0",
};

pub const COMPOSITION_TASK: TaskSpec = TaskSpec {
    core: Core::App,
    priority: 4,
    stack_kb: 8,
    name: "compose\0",
};

pub const TRANSMITTER_TASK: TaskSpec = TaskSpec {
    core: Core::App,
    priority: 2,
    stack_kb: 8,
    name: "transmit\0",
};

pub const RECEIVER_TASK: TaskSpec = TaskSpec {
    core: Core::Pro,
    priority: 2,
    stack_kb: 6,
    name: "receive\0",
};

pub const PLAYER_TASK: TaskSpec = TaskSpec {
    core: Core::Pro,
    priority: 2,
    stack_kb: 8,
    name: "player\0",
};

fn ms(period_ms: u32) -> Duration {
    Duration::from_millis(period_ms as u64)
}

// ── Loops ─────────────────────────────────────────────────────

/// Sample the IMU every `period` while Recording; park otherwise.
pub async fn tilt_loop<I: ImuPort, S: EventSink>(
    shared: &Shared,
    mut classifier: TiltClassifier<'_, I, S>,
    period: Duration,
) {
    loop {
        shared
            .state
            .wait_for(Waiter::TiltClassifier, SystemState::Recording, period)
            .await;
        classifier.sample();
        Timer::after(period).await;
    }
}

/// Apply every edge the ISRs enqueue, in order, once per `period`.
pub async fn composition_loop<S: EventSink>(
    shared: &Shared,
    mut router: ButtonEventRouter<'_, S>,
    period: Duration,
) {
    loop {
        drain_edges(&shared.edges, |edge| {
            router.handle_edge(edge);
        });
        Timer::after(period).await;
    }
}

pub async fn transmitter_loop<T: ByteTransport, D: DisplayPort, S: EventSink>(
    shared: &Shared,
    mut transmitter: Transmitter<'_, T, D, S>,
    fallback: Duration,
) {
    loop {
        shared
            .state
            .wait_for(Waiter::Transmitter, SystemState::Sending, fallback)
            .await;
        transmitter.service();
    }
}

/// Drain the serial link every `period`.
pub async fn receiver_loop<T: ByteTransport, S: EventSink>(
    mut receiver: ReceiverIngest<'_, T, S>,
    period: Duration,
) {
    loop {
        receiver.poll();
        Timer::after(period).await;
    }
}

pub async fn player_loop<D: DisplayPort, T: TonePort, P: DelayNs, S: EventSink>(
    shared: &Shared,
    mut player: DisplayPlayer<'_, D, T, P, S>,
    fallback: Duration,
) {
    loop {
        shared
            .state
            .wait_for(Waiter::DisplayPlayer, SystemState::DisplayUpdate, fallback)
            .await;
        player.service();
    }
}

// ── Spawning ──────────────────────────────────────────────────

/// Hardware handed to [`spawn_all`].  Each task gets its own copy of the
/// cheap handles; the display is shared by the transmitter and the player.
pub struct Peripherals<I, D, X, T, P, S> {
    pub imu: I,
    pub display: D,
    pub serial: X,
    pub tone: T,
    pub delay: P,
    pub sink: S,
}

/// Start the five messenger tasks against `shared`.
pub fn spawn_all<I, D, X, T, P, S>(
    shared: &'static Shared,
    config: &SystemConfig,
    hw: Peripherals<I, D, X, T, P, S>,
) -> Result<Vec<JoinHandle<()>>, Error>
where
    I: ImuPort + Send + 'static,
    D: DisplayPort + Clone + Send + 'static,
    X: ByteTransport + Clone + Send + 'static,
    T: TonePort + Send + 'static,
    P: DelayNs + Send + 'static,
    S: EventSink + Clone + Send + 'static,
{
    let Peripherals {
        imu,
        display,
        serial,
        tone,
        delay,
        sink,
    } = hw;
    let mut handles = Vec::with_capacity(5);

    let thresholds = TiltThresholds::from_config(config);
    let period = ms(config.tilt_sample_period_ms);
    let tilt_sink = sink.clone();
    handles.push(spawn_on_core(TILT_TASK, move || {
        let classifier = TiltClassifier::new(shared, imu, thresholds, tilt_sink);
        block_on(tilt_loop(shared, classifier, period));
    })?);

    let period = ms(config.edge_poll_ms);
    let router_sink = sink.clone();
    handles.push(spawn_on_core(COMPOSITION_TASK, move || {
        let router = ButtonEventRouter::new(shared, router_sink);
        block_on(composition_loop(shared, router, period));
    })?);

    let fallback = ms(config.transmit_poll_ms);
    let (tx_serial, tx_display, tx_sink) = (serial.clone(), display.clone(), sink.clone());
    handles.push(spawn_on_core(TRANSMITTER_TASK, move || {
        let transmitter = Transmitter::new(shared, tx_serial, tx_display, tx_sink);
        block_on(transmitter_loop(shared, transmitter, fallback));
    })?);

    let period = ms(config.ingest_poll_ms);
    let rx_sink = sink.clone();
    handles.push(spawn_on_core(RECEIVER_TASK, move || {
        let receiver = ReceiverIngest::new(shared, serial, rx_sink);
        block_on(receiver_loop(receiver, period));
    })?);

    let timing = PlaybackTiming::from_config(config);
    let fallback = ms(config.display_poll_ms);
    handles.push(spawn_on_core(PLAYER_TASK, move || {
        let player = DisplayPlayer::new(shared, display, tone, delay, timing, sink);
        block_on(player_loop(shared, player, fallback));
    })?);

    info!("tasks: {} started", handles.len());
    Ok(handles)
}
