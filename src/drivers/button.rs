//! ISR-side button handling: per-button debounce and edge hand-off.
//!
//! ## Hardware
//!
//! Two active-low momentary switches with pull-ups.  Each GPIO fires on
//! the falling edge; the ISR calls [`button_isr_handler`] with a
//! millisecond timestamp.
//!
//! ## ISR contract
//!
//! | Step | Work                                              | Blocking |
//! |------|---------------------------------------------------|----------|
//! | 1    | `DebounceClock::try_accept` (CAS on an AtomicU32) | never    |
//! | 2    | `push_edge` into the lock-free `EdgeQueue`        | never    |
//!
//! Nothing here reads the tilt, touches a buffer, takes a lock or moves
//! the state register.  No task waker runs in interrupt context.  That happens in the composition task
//! ([`ButtonEventRouter`](crate::app::router::ButtonEventRouter)).

use core::sync::atomic::{AtomicU32, Ordering};

use crate::app::shared::{Counters, SHARED, Shared};
use crate::events::{ButtonEdge, push_edge};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    /// Appends the symbol selected by the current tilt.
    Symbol,
    /// Seals the message and hands it to the transmitter.
    Send,
}

/// What the ISR did with one raw edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOutcome {
    Accepted,
    /// Inside the debounce window of the previous accepted edge.
    Debounced,
    /// Accepted but the queue was full.
    QueueFull,
}

/// Timestamp (ms since boot) of the last accepted edge of one button.
///
/// Starts at zero, so edges inside the first window after boot are
/// discarded.
pub struct DebounceClock(AtomicU32);

impl Default for DebounceClock {
    fn default() -> Self {
        Self::new()
    }
}

impl DebounceClock {
    pub const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    /// Accept the edge at `now_ms` if at least `window_ms` have passed since
    /// the last accepted one, and record it.  Lock-free; safe from an ISR.
    pub fn try_accept(&self, now_ms: u32, window_ms: u32) -> bool {
        let mut last = self.0.load(Ordering::Acquire);
        loop {
            if now_ms.wrapping_sub(last) < window_ms {
                return false;
            }
            match self
                .0
                .compare_exchange_weak(last, now_ms, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return true,
                Err(actual) => last = actual,
            }
        }
    }

    pub fn last_ms(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }
}

/// Debounce one raw edge and forward it to the composition task.
pub fn on_edge(shared: &Shared, button: ButtonId, now_ms: u32) -> EdgeOutcome {
    let window = shared.debounce_ms.load(Ordering::Relaxed);
    if !shared.clock(button).try_accept(now_ms, window) {
        Counters::bump(&shared.counters.edges_debounced);
        return EdgeOutcome::Debounced;
    }
    if !push_edge(&shared.edges, ButtonEdge { button, at_ms: now_ms }) {
        Counters::bump(&shared.counters.edges_dropped);
        return EdgeOutcome::QueueFull;
    }
    Counters::bump(&shared.counters.edges_accepted);
    EdgeOutcome::Accepted
}

/// ISR handler: register this on each button's falling edge.
pub fn button_isr_handler(button: ButtonId, now_ms: u32) {
    on_edge(&SHARED, button, now_ms);
}
