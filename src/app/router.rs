//! ButtonEventRouter: applies debounced edges to the composition state.
//!
//! Runs in the composition task, one edge at a time, in queue order.
//!
//! ```text
//!  Symbol edge ─┬─ Idle      → Recording, then append as below
//!               ├─ Recording → append Symbol::from_tilt(tilt)
//!               └─ otherwise → ignored
//!
//!  Send edge ───┬─ Recording, ≥1 symbol, room → seal "  \n", → Sending
//!               └─ otherwise → ignored, no terminator written
//! ```

use log::{debug, info};

use crate::drivers::button::ButtonId;
use crate::events::ButtonEdge;
use crate::fsm::{SystemState, TransitionError, Trigger};
use crate::message::{BufferError, Symbol};

use super::events::AppEvent;
use super::ports::EventSink;
use super::shared::{Counters, Shared};

/// What one edge did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Idle → Recording, plus the symbol the same edge appended (`None`
    /// when the tilt was still `Unknown`).
    StartedRecording(Option<Symbol>),
    Appended(Symbol),
    /// Tilt was `Unknown`; nothing appended.
    NoTilt,
    /// The buffer refused the symbol or the terminator.
    Refused(BufferError),
    /// Recording → Sending with the terminator in place.
    Sealed,
    /// The edge has no effect in this state.
    Ignored(SystemState),
}

pub struct ButtonEventRouter<'a, S: EventSink> {
    shared: &'a Shared,
    sink: S,
}

impl<'a, S: EventSink> ButtonEventRouter<'a, S> {
    pub fn new(shared: &'a Shared, sink: S) -> Self {
        Self { shared, sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn handle_edge(&mut self, edge: ButtonEdge) -> RouteOutcome {
        let outcome = match edge.button {
            ButtonId::Symbol => self.on_symbol(),
            ButtonId::Send => self.on_send(),
        };

        if let RouteOutcome::Ignored(state) = outcome {
            Counters::bump(&self.shared.counters.edges_ignored);
            debug!("{:?} edge ignored in {}", edge.button, state);
            self.sink.emit(&AppEvent::EdgeIgnored {
                button: edge.button,
                state,
            });
        }
        outcome
    }

    fn on_symbol(&mut self) -> RouteOutcome {
        let state = self.shared.state.load();
        match state {
            SystemState::Idle => {
                match self.shared.state.transition(state, Trigger::SymbolEdge) {
                    Ok(to) => {
                        self.sink.emit(&AppEvent::StateChanged { from: state, to });
                        match self.append() {
                            RouteOutcome::Appended(symbol) => RouteOutcome::StartedRecording(Some(symbol)),
                            RouteOutcome::NoTilt => RouteOutcome::StartedRecording(None),
                            other => other,
                        }
                    }
                    Err(e) => RouteOutcome::Ignored(actual_state(e)),
                }
            }
            SystemState::Recording => self.append(),
            other => RouteOutcome::Ignored(other),
        }
    }

    fn append(&mut self) -> RouteOutcome {
        let Some(symbol) = Symbol::from_tilt(self.shared.tilt.load()) else {
            debug!("symbol edge with unknown tilt");
            return RouteOutcome::NoTilt;
        };

        let state = &self.shared.state;
        let result = self.shared.with_outgoing(|msg| -> Result<Result<usize, BufferError>, SystemState> {
            state
                .transition(SystemState::Recording, Trigger::SymbolEdge)
                .map_err(actual_state)?;
            Ok(msg.push_symbol(symbol).map(|()| msg.symbol_count()))
        });

        match result {
            Err(state) => RouteOutcome::Ignored(state),
            Ok(Ok(len)) => {
                Counters::bump(&self.shared.counters.symbols_appended);
                self.sink.emit(&AppEvent::SymbolAppended { symbol, len });
                RouteOutcome::Appended(symbol)
            }
            Ok(Err(e)) => {
                Counters::bump(&self.shared.counters.symbols_dropped);
                self.sink.emit(&AppEvent::SymbolDropped(e));
                RouteOutcome::Refused(e)
            }
        }
    }

    fn on_send(&mut self) -> RouteOutcome {
        let state = self.shared.state.load();
        if state != SystemState::Recording {
            return RouteOutcome::Ignored(state);
        }

        // Seal under the lock, transition after releasing it.  Nothing else
        // writes the buffer while Recording.
        let sealed = self.shared.with_outgoing(|msg| msg.seal().map(|()| msg.len()));
        let result = match sealed {
            Err(e) => Err(SendRefusal::Buffer(e)),
            Ok(len) => match self.shared.state.transition(state, Trigger::SendEdge) {
                Ok(_) => Ok(len),
                Err(e) => {
                    self.shared.with_outgoing(|msg| msg.unseal());
                    Err(SendRefusal::State(actual_state(e)))
                }
            },
        };

        match result {
            Ok(len) => {
                info!("message sealed ({} bytes)", len);
                self.sink.emit(&AppEvent::MessageSealed { len });
                self.sink.emit(&AppEvent::StateChanged {
                    from: SystemState::Recording,
                    to: SystemState::Sending,
                });
                RouteOutcome::Sealed
            }
            Err(SendRefusal::Buffer(e)) => {
                debug!("send refused: {}", e);
                RouteOutcome::Refused(e)
            }
            Err(SendRefusal::State(s)) => RouteOutcome::Ignored(s),
        }
    }
}

enum SendRefusal {
    Buffer(BufferError),
    State(SystemState),
}

/// The state the register actually held when a transition was refused.
fn actual_state(e: TransitionError) -> SystemState {
    match e {
        TransitionError::Stale { actual, .. } => actual,
        TransitionError::Rejected { from, .. } => from,
    }
}
