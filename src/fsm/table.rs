//! The transition table.
//!
//! | From          | Trigger            | To            |
//! |---------------|--------------------|---------------|
//! | Idle          | SymbolEdge         | Recording     |
//! | Recording     | SymbolEdge         | Recording     |
//! | Recording     | SendEdge           | Sending       |
//! | Sending       | SendComplete       | Idle          |
//! | Idle          | ByteReceived       | Receiving     |
//! | Receiving     | ByteReceived       | Receiving     |
//! | Receiving     | TerminatorReceived | DisplayUpdate |
//! | DisplayUpdate | PlaybackComplete   | Idle          |
//!
//! Anything not listed is rejected.  There is no terminal state.

use super::{SystemState, Trigger};

/// Look up the target state for `trigger` fired in `from`.
pub const fn next_state(from: SystemState, trigger: Trigger) -> Option<SystemState> {
    use SystemState::{DisplayUpdate, Idle, Receiving, Recording, Sending};
    use Trigger::{
        ByteReceived, PlaybackComplete, SendComplete, SendEdge, SymbolEdge, TerminatorReceived,
    };

    match (from, trigger) {
        (Idle, SymbolEdge) | (Recording, SymbolEdge) => Some(Recording),
        (Recording, SendEdge) => Some(Sending),
        (Sending, SendComplete) => Some(Idle),
        (Idle, ByteReceived) | (Receiving, ByteReceived) => Some(Receiving),
        (Receiving, TerminatorReceived) => Some(DisplayUpdate),
        (DisplayUpdate, PlaybackComplete) => Some(Idle),
        _ => None,
    }
}
