//! Interrupt-to-task edge queue.
//!
//! The button ISR never touches the buffers or the state register.  It
//! debounces, then hands a [`ButtonEdge`] to the composition task through
//! this bounded queue.
//!
//! ```text
//! ┌─────────────┐  ButtonEdge  ┌──────────────┐  drain  ┌──────────────────┐
//! │ Symbol ISR  │─────────────▶│              │ (timer) │                  │
//! │ Send ISR    │─────────────▶│  EdgeQueue   │────────▶│ Composition task │
//! └─────────────┘  (enqueue)   │  (depth 16)  │         │ (router)         │
//!                              └──────────────┘         └──────────────────┘
//! ```
//!
//! The queue is a lock-free MPMC ring: both ISRs may produce, the
//! composition task consumes.  The ISR side is a handful of atomic
//! operations and never takes a lock or runs a waker.  The consumer is not
//! woken by an enqueue; it drains the queue on its poll period.  A full
//! queue drops the edge.

use heapless::mpmc::MpMcQueue;

use crate::drivers::button::ButtonId;

/// Queue depth (a power of two).  At the default debounce window two
/// buttons produce at most ten edges per second, so a full queue means the
/// composition task has stalled.
pub const EDGE_QUEUE_DEPTH: usize = 16;

/// One accepted (already debounced) falling edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEdge {
    pub button: ButtonId,
    /// Milliseconds since boot when the ISR fired.
    pub at_ms: u32,
}

pub type EdgeQueue = MpMcQueue<ButtonEdge, EDGE_QUEUE_DEPTH>;

/// Enqueue from interrupt context.  Returns `false` if the edge was dropped.
pub fn push_edge(queue: &EdgeQueue, edge: ButtonEdge) -> bool {
    queue.enqueue(edge).is_ok()
}

/// Drain every pending edge into `handler`, in FIFO order.
/// Returns the number of edges handled.
pub fn drain_edges(queue: &EdgeQueue, mut handler: impl FnMut(ButtonEdge)) -> usize {
    let mut n = 0;
    while let Some(edge) = queue.dequeue() {
        handler(edge);
        n += 1;
    }
    n
}
