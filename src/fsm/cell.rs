//! Atomic state register.
//!
//! Written from several tasks and read from all of them.  A transition is a
//! compare-and-set from the state the caller observed to the table's target,
//! so two components racing to leave Idle (composer vs. receiver) cannot both
//! win.  Every successful transition wakes the tasks parked in
//! [`StateCell::wait_for`]; the fallback period only bounds latency if a
//! wake-up is missed.
//!
//! [`StateCell::transition`] is task-context only.  Each `Signal` runs the
//! parked task's waker while holding its critical section, and on ESP-IDF
//! that waker takes a pthread mutex.  The critical section there is
//! esp-idf-hal's task-level lock, so this is legal from a task and never
//! from an ISR.  The button ISRs only touch the edge queue and the
//! debounce clocks.

use core::sync::atomic::{AtomicU8, Ordering};
use core::time::Duration;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use log::info;

use super::table::next_state;
use super::{SystemState, TransitionError, Trigger};

/// Tasks that park on the register waiting for a specific state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Waiter {
    TiltClassifier = 0,
    Transmitter = 1,
    DisplayPlayer = 2,
}

impl Waiter {
    pub const COUNT: usize = 3;
}

pub struct StateCell {
    raw: AtomicU8,
    wake: [Signal<CriticalSectionRawMutex, SystemState>; Waiter::COUNT],
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}

impl StateCell {
    /// A register holding `Idle`.
    pub const fn new() -> Self {
        Self {
            raw: AtomicU8::new(SystemState::Idle as u8),
            wake: [const { Signal::new() }; Waiter::COUNT],
        }
    }

    pub fn load(&self) -> SystemState {
        SystemState::from_index(self.raw.load(Ordering::Acquire) as usize)
    }

    /// Fire `trigger` from the `observed` state.
    ///
    /// Returns the new state.  Self-loops (`Recording` on a symbol edge,
    /// `Receiving` on a byte) leave the register untouched but still fail
    /// with [`TransitionError::Stale`] if the register moved on.
    pub fn transition(
        &self,
        observed: SystemState,
        trigger: Trigger,
    ) -> Result<SystemState, TransitionError> {
        let next = next_state(observed, trigger).ok_or(TransitionError::Rejected {
            from: observed,
            trigger,
        })?;

        if next == observed {
            let actual = self.load();
            if actual != observed {
                return Err(TransitionError::Stale {
                    expected: observed,
                    actual,
                });
            }
            return Ok(next);
        }

        self.raw
            .compare_exchange(observed as u8, next as u8, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|actual| TransitionError::Stale {
                expected: observed,
                actual: SystemState::from_index(actual as usize),
            })?;

        info!("FSM transition: {} -> {} ({:?})", observed, next, trigger);
        for signal in &self.wake {
            signal.signal(next);
        }
        Ok(next)
    }

    /// Park until the register holds `target`.
    ///
    /// Wakes on every transition; `fallback` is the poll period used when
    /// no transition arrives.
    pub async fn wait_for(&self, waiter: Waiter, target: SystemState, fallback: Duration) {
        let signal = &self.wake[waiter as usize];
        loop {
            if self.load() == target {
                return;
            }
            futures_lite::future::or(
                async {
                    signal.wait().await;
                },
                async {
                    async_io_mini::Timer::after(fallback).await;
                },
            )
            .await;
        }
    }
}
