//! Messenger core: pure coordination logic, zero I/O.
//!
//! Every component here is level-triggered on the shared state register
//! and touches hardware only through the port traits in [`ports`], so the
//! whole compose / send / receive / play cycle runs against mocks.

pub mod events;
pub mod player;
pub mod ports;
pub mod receiver;
pub mod router;
pub mod shared;
pub mod tilt;
pub mod transmitter;
