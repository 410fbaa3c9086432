//! Transmitter: drains the sealed message onto the byte transport.
//!
//! The only component that clears the outgoing buffer and the only one
//! that leaves Sending.  The buffer is swapped out under the lock and
//! written after the lock is released, so the transport never runs inside
//! a critical section.

use log::{error, info, warn};

use crate::fsm::{SystemState, Trigger};

use super::events::AppEvent;
use super::ports::{ByteTransport, DisplayPort, EventSink};
use super::shared::{Counters, Shared};

/// Shown once the message has gone out.
pub const ACK_TEXT: &str = "Msg sent!";
/// Shown when the transport refused the message.
pub const SEND_FAILED_TEXT: &str = "Send failed!";

pub struct Transmitter<'a, T: ByteTransport, D: DisplayPort, S: EventSink> {
    shared: &'a Shared,
    transport: T,
    display: D,
    sink: S,
}

impl<'a, T: ByteTransport, D: DisplayPort, S: EventSink> Transmitter<'a, T, D, S> {
    pub fn new(shared: &'a Shared, transport: T, display: D, sink: S) -> Self {
        Self {
            shared,
            transport,
            display,
            sink,
        }
    }

    /// Send the pending message if the register holds Sending.
    ///
    /// Returns `false` when there was nothing to do.  Once started the
    /// buffer ends up empty and the register ends up Idle whether or not
    /// the transport succeeded.
    pub fn service(&mut self) -> bool {
        if self.shared.state.load() != SystemState::Sending {
            return false;
        }

        let message = self.shared.with_outgoing(|m| m.take());
        let bytes = message.as_bytes();

        let ack = match self.transport.write_bytes(bytes) {
            Ok(()) => {
                info!("sent {} bytes", bytes.len());
                Counters::bump(&self.shared.counters.messages_sent);
                self.sink.emit(&AppEvent::MessageSent { len: bytes.len() });
                ACK_TEXT
            }
            Err(e) => {
                warn!("transmit failed: {} ({} bytes discarded)", e, bytes.len());
                Counters::bump(&self.shared.counters.transmit_failures);
                self.sink.emit(&AppEvent::TransmitFailed(e));
                SEND_FAILED_TEXT
            }
        };

        self.display.clear();
        self.display.write_text(ack);

        match self
            .shared
            .state
            .transition(SystemState::Sending, Trigger::SendComplete)
        {
            Ok(to) => self.sink.emit(&AppEvent::StateChanged {
                from: SystemState::Sending,
                to,
            }),
            Err(e) => error!("transmitter could not leave Sending: {}", e),
        }
        true
    }
}
