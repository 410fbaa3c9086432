//! ReceiverIngest: accumulates inbound bytes until the terminator.
//!
//! ```text
//!   Idle ──byte──▶ Receiving ──byte──▶ Receiving ──'\n'──▶ DisplayUpdate
//! ```
//!
//! The transport is read only while the register holds Idle or Receiving.
//! In any other state bytes stay in the transport until the machine is
//! back in Idle.  If the composer wins the race out of Idle after a byte
//! has already been read, the byte is held back and replayed first.

use log::{debug, info, warn};

use crate::fsm::{SystemState, Trigger};
use crate::message::INBOUND_TERMINATOR;

use super::events::AppEvent;
use super::ports::{ByteTransport, EventSink};
use super::shared::{Counters, Shared};

/// Upper bound on bytes handled per poll.
pub const MAX_BYTES_PER_POLL: usize = 64;

pub struct ReceiverIngest<'a, T: ByteTransport, S: EventSink> {
    shared: &'a Shared,
    transport: T,
    pending: Option<u8>,
    sink: S,
}

impl<'a, T: ByteTransport, S: EventSink> ReceiverIngest<'a, T, S> {
    pub fn new(shared: &'a Shared, transport: T, sink: S) -> Self {
        Self {
            shared,
            transport,
            pending: None,
            sink,
        }
    }

    /// Drain what the transport has.  Returns the number of bytes consumed.
    pub fn poll(&mut self) -> usize {
        let mut consumed = 0;
        while consumed < MAX_BYTES_PER_POLL {
            let state = self.shared.state.load();
            if !state.accepts_inbound() {
                break;
            }
            let Some(byte) = self.pending.take().or_else(|| self.transport.try_read_byte())
            else {
                break;
            };

            if state == SystemState::Idle && !self.begin_message() {
                self.pending = Some(byte);
                break;
            }
            consumed += 1;

            if byte == INBOUND_TERMINATOR {
                self.finish_message();
                break;
            }
            self.store(byte);
        }
        consumed
    }

    /// Idle → Receiving.  `false` if the register moved first.
    fn begin_message(&mut self) -> bool {
        match self
            .shared
            .state
            .transition(SystemState::Idle, Trigger::ByteReceived)
        {
            Ok(to) => {
                self.sink.emit(&AppEvent::StateChanged {
                    from: SystemState::Idle,
                    to,
                });
                true
            }
            Err(e) => {
                debug!("inbound byte deferred: {}", e);
                false
            }
        }
    }

    fn store(&mut self, byte: u8) {
        if self.shared.with_incoming(|m| m.push(byte)).is_err() {
            Counters::bump(&self.shared.counters.bytes_dropped);
            self.sink.emit(&AppEvent::ByteDropped(byte));
        }
    }

    fn finish_message(&mut self) {
        let len = self.shared.with_incoming(|m| m.len());
        match self
            .shared
            .state
            .transition(SystemState::Receiving, Trigger::TerminatorReceived)
        {
            Ok(to) => {
                info!("received message ({} bytes)", len);
                Counters::bump(&self.shared.counters.messages_received);
                self.sink.emit(&AppEvent::MessageReceived { len });
                self.sink.emit(&AppEvent::StateChanged {
                    from: SystemState::Receiving,
                    to,
                });
            }
            Err(e) => warn!("terminator not applied: {}", e),
        }
    }
}
