//! Process-wide state shared by the ISRs and every task.
//!
//! Created once at startup with empty buffers and `Idle`, never destroyed.
//!
//! | Field        | Written by                           | Read by            |
//! |--------------|--------------------------------------|--------------------|
//! | `state`      | router, transmitter, receiver, player | everyone           |
//! | `tilt`       | TiltClassifier                       | router             |
//! | `outgoing`   | router (Recording), transmitter (Sending) | telemetry     |
//! | `incoming`   | receiver (Idle/Receiving), player (DisplayUpdate) | telemetry |
//! | `*_clock`    | button ISR                           | button ISR         |
//! | `edges`      | button ISR                           | composition task   |
//!
//! The buffers sit behind critical-section mutexes.  The state register
//! already decides who may touch which buffer; the lock only keeps a
//! reader from seeing a half-finished append.

use core::cell::RefCell;
use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::config::SystemConfig;
use crate::drivers::button::{ButtonId, DebounceClock};
use crate::events::EdgeQueue;
use crate::fsm::StateCell;
use crate::message::{IncomingMessage, OutgoingMessage};
use crate::sensors::tilt::TiltCell;

use super::events::TelemetryData;

/// The one instance the ISRs and tasks use on target.
pub static SHARED: Shared = Shared::new();

pub struct Shared {
    pub state: StateCell,
    pub tilt: TiltCell,
    pub outgoing: Mutex<CriticalSectionRawMutex, RefCell<OutgoingMessage>>,
    pub incoming: Mutex<CriticalSectionRawMutex, RefCell<IncomingMessage>>,
    pub symbol_clock: DebounceClock,
    pub send_clock: DebounceClock,
    /// Debounce window, copied from config at boot.
    pub debounce_ms: AtomicU32,
    pub edges: EdgeQueue,
    pub counters: Counters,
}

impl Default for Shared {
    fn default() -> Self {
        Self::new()
    }
}

impl Shared {
    pub const fn new() -> Self {
        Self {
            state: StateCell::new(),
            tilt: TiltCell::new(),
            outgoing: Mutex::new(RefCell::new(OutgoingMessage::new())),
            incoming: Mutex::new(RefCell::new(IncomingMessage::new())),
            symbol_clock: DebounceClock::new(),
            send_clock: DebounceClock::new(),
            debounce_ms: AtomicU32::new(200),
            edges: EdgeQueue::new(),
            counters: Counters::new(),
        }
    }

    /// Copy the runtime-tunable fields out of `config`.
    pub fn apply_config(&self, config: &SystemConfig) {
        self.debounce_ms.store(config.debounce_ms, Ordering::Relaxed);
    }

    pub fn clock(&self, button: ButtonId) -> &DebounceClock {
        match button {
            ButtonId::Symbol => &self.symbol_clock,
            ButtonId::Send => &self.send_clock,
        }
    }

    pub fn with_outgoing<R>(&self, f: impl FnOnce(&mut OutgoingMessage) -> R) -> R {
        self.outgoing.lock(|cell| f(&mut cell.borrow_mut()))
    }

    pub fn with_incoming<R>(&self, f: impl FnOnce(&mut IncomingMessage) -> R) -> R {
        self.incoming.lock(|cell| f(&mut cell.borrow_mut()))
    }

    pub fn telemetry(&self, uptime_secs: u64) -> TelemetryData {
        TelemetryData {
            uptime_secs,
            state: self.state.load(),
            tilt: self.tilt.load(),
            outgoing_len: self.with_outgoing(|m| m.len()),
            incoming_len: self.with_incoming(|m| m.len()),
            counters: self.counters.snapshot(),
        }
    }
}

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

/// Monotonic event counters for telemetry.  Relaxed ordering throughout;
/// they are statistics, not synchronisation.
#[derive(Default)]
pub struct Counters {
    pub edges_accepted: AtomicU32,
    pub edges_debounced: AtomicU32,
    pub edges_dropped: AtomicU32,
    pub edges_ignored: AtomicU32,
    pub symbols_appended: AtomicU32,
    pub symbols_dropped: AtomicU32,
    pub messages_sent: AtomicU32,
    pub transmit_failures: AtomicU32,
    pub messages_received: AtomicU32,
    pub bytes_dropped: AtomicU32,
    pub sensor_failures: AtomicU32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub edges_accepted: u32,
    pub edges_debounced: u32,
    pub edges_dropped: u32,
    pub edges_ignored: u32,
    pub symbols_appended: u32,
    pub symbols_dropped: u32,
    pub messages_sent: u32,
    pub transmit_failures: u32,
    pub messages_received: u32,
    pub bytes_dropped: u32,
    pub sensor_failures: u32,
}

impl Counters {
    pub const fn new() -> Self {
        Self {
            edges_accepted: AtomicU32::new(0),
            edges_debounced: AtomicU32::new(0),
            edges_dropped: AtomicU32::new(0),
            edges_ignored: AtomicU32::new(0),
            symbols_appended: AtomicU32::new(0),
            symbols_dropped: AtomicU32::new(0),
            messages_sent: AtomicU32::new(0),
            transmit_failures: AtomicU32::new(0),
            messages_received: AtomicU32::new(0),
            bytes_dropped: AtomicU32::new(0),
            sensor_failures: AtomicU32::new(0),
        }
    }

    pub fn bump(counter: &AtomicU32) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        let get = |c: &AtomicU32| c.load(Ordering::Relaxed);
        CounterSnapshot {
            edges_accepted: get(&self.edges_accepted),
            edges_debounced: get(&self.edges_debounced),
            edges_dropped: get(&self.edges_dropped),
            edges_ignored: get(&self.edges_ignored),
            symbols_appended: get(&self.symbols_appended),
            symbols_dropped: get(&self.symbols_dropped),
            messages_sent: get(&self.messages_sent),
            transmit_failures: get(&self.transmit_failures),
            messages_received: get(&self.messages_received),
            bytes_dropped: get(&self.bytes_dropped),
            sensor_failures: get(&self.sensor_failures),
        }
    }
}
