//! System state register and transition table.
//!
//! One global mode register gates which component may act:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                                                              │
//! │   IDLE ──[symbol edge]──▶ RECORDING ◀─┐ [symbol edge]        │
//! │    ▲ │                        │  └─────┘                     │
//! │    │ │                  [send edge]                          │
//! │    │ │                        ▼                              │
//! │    │ │                     SENDING ──[send complete]──▶ IDLE │
//! │    │ │                                                       │
//! │    │ └──[byte rx]──▶ RECEIVING ◀─┐ [byte rx]                 │
//! │    │                     │  └────┘                           │
//! │    │             [terminator rx]                             │
//! │    │                     ▼                                   │
//! │    └──[playback done]── DISPLAY_UPDATE                       │
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows live in [`table::next_state`].  The register itself is a
//! [`StateCell`]: every transition is a single compare-and-set from the
//! state the caller observed, so a component can only leave a state it
//! actually saw.

pub mod cell;
pub mod table;

pub use cell::{StateCell, Waiter};

use core::fmt;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all possible system states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SystemState {
    Idle = 0,
    Recording = 1,
    Sending = 2,
    Receiving = 3,
    DisplayUpdate = 4,
}

impl SystemState {
    /// Total number of states.
    pub const COUNT: usize = 5;

    /// Every state, in discriminant order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Idle,
        Self::Recording,
        Self::Sending,
        Self::Receiving,
        Self::DisplayUpdate,
    ];

    /// Convert a raw index back to `SystemState`.  Panics on out-of-range in
    /// debug builds; returns `Idle` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::Recording,
            2 => Self::Sending,
            3 => Self::Receiving,
            4 => Self::DisplayUpdate,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Recording => "Recording",
            Self::Sending => "Sending",
            Self::Receiving => "Receiving",
            Self::DisplayUpdate => "DisplayUpdate",
        }
    }

    /// ReceiverIngest may read the transport only in these states.
    pub const fn accepts_inbound(self) -> bool {
        matches!(self, Self::Idle | Self::Receiving)
    }
}

impl fmt::Display for SystemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Triggers
// ---------------------------------------------------------------------------

/// Events that drive the state register.  Guards (room in the buffer, at
/// least one symbol composed) are evaluated by the component before it
/// fires the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Debounced edge on the symbol button.
    SymbolEdge,
    /// Debounced edge on the send button, guards satisfied.
    SendEdge,
    /// Transmitter finished draining the outgoing buffer.
    SendComplete,
    /// A non-terminator inbound byte arrived.
    ByteReceived,
    /// The inbound terminator arrived.
    TerminatorReceived,
    /// DisplayPlayer finished rendering and playback.
    PlaybackComplete,
}

impl Trigger {
    pub const ALL: [Self; 6] = [
        Self::SymbolEdge,
        Self::SendEdge,
        Self::SendComplete,
        Self::ByteReceived,
        Self::TerminatorReceived,
        Self::PlaybackComplete,
    ];
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a [`StateCell::transition`] did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// The table has no row for `trigger` in state `from`.
    Rejected { from: SystemState, trigger: Trigger },
    /// The register no longer holds the state the caller observed.
    Stale {
        expected: SystemState,
        actual: SystemState,
    },
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { from, trigger } => {
                write!(f, "{:?} not allowed in {}", trigger, from)
            }
            Self::Stale { expected, actual } => {
                write!(f, "expected {} but register holds {}", expected, actual)
            }
        }
    }
}
