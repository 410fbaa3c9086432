//! Outbound application events.
//!
//! Components emit these through the [`EventSink`](super::ports::EventSink)
//! port.  Adapters on the other side decide what to do with them.

use crate::drivers::button::ButtonId;
use crate::error::{SensorError, TransportError};
use crate::fsm::SystemState;
use crate::message::{BufferError, Symbol};
use crate::sensors::tilt::TiltCategory;

use super::shared::CounterSnapshot;

/// Structured events emitted by the messenger core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Boot finished; carries the initial state.
    Started(SystemState),

    /// The state register moved.
    StateChanged { from: SystemState, to: SystemState },

    /// A new tilt category was published.
    TiltChanged { from: TiltCategory, to: TiltCategory },

    /// A symbol was composed.  `len` is the new symbol count.
    SymbolAppended { symbol: Symbol, len: usize },

    /// A symbol edge could not be applied to the buffer.
    SymbolDropped(BufferError),

    /// A debounced edge arrived in a state where it has no effect.
    EdgeIgnored { button: ButtonId, state: SystemState },

    /// The terminator was appended and the message handed to the transmitter.
    MessageSealed { len: usize },

    /// The outgoing message went out.  `len` includes the terminator.
    MessageSent { len: usize },

    /// The transport failed; the message is discarded.
    TransmitFailed(TransportError),

    /// An inbound terminator arrived.  `len` bytes await playback.
    MessageReceived { len: usize },

    /// An inbound byte arrived with the receive buffer full.
    ByteDropped(u8),

    /// DisplayPlayer finished with a message of `len` bytes.
    PlaybackFinished { len: usize },

    /// The motion sensor read failed; the previous tilt stays in force.
    SensorReadFailed(SensorError),

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time telemetry snapshot suitable for logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryData {
    pub uptime_secs: u64,
    pub state: SystemState,
    pub tilt: TiltCategory,
    pub outgoing_len: usize,
    pub incoming_len: usize,
    pub counters: CounterSnapshot,
}
