//! Symbol alphabet and the two fixed-capacity message buffers.
//!
//! ```text
//!  OutgoingMessage (C₁ = 2048)
//!  ┌──────────────────────────────────────────────┬──────────┐
//!  │ symbols: '.' '-' ' ' …   (≤ C₁ − W bytes)     │ reserved │
//!  └──────────────────────────────────────────────┴──────────┘
//!                                                   W = 4: "  \n" + sentinel
//!
//!  IncomingMessage (C₂ = 128): free-form bytes, terminator never stored
//! ```
//!
//! Both buffers are `heapless` vectors so every append is capacity-checked;
//! overflow is a typed [`BufferError`], never a partial write.

use core::fmt;

use heapless::Vec;

use crate::sensors::tilt::TiltCategory;

/// Outgoing buffer capacity.
pub const OUTGOING_CAPACITY: usize = 2048;
/// Incoming buffer capacity.
pub const INCOMING_CAPACITY: usize = 128;
/// Bytes kept free at the tail of the outgoing buffer for the terminator.
pub const TERMINATOR_RESERVE: usize = 4;
/// Appended verbatim when a message is sealed for sending.
pub const TERMINATOR: &[u8; 3] = b"  \n";
/// Ends an inbound message.  Never stored.
pub const INBOUND_TERMINATOR: u8 = b'\n';

// ---------------------------------------------------------------------------
// Alphabet
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Dot,
    Dash,
    Space,
}

impl Symbol {
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Dot => b'.',
            Self::Dash => b'-',
            Self::Space => b' ',
        }
    }

    pub const fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'.' => Some(Self::Dot),
            b'-' => Some(Self::Dash),
            b' ' => Some(Self::Space),
            _ => None,
        }
    }

    /// Left → dot, Middle → space, Right → dash.  Unknown selects nothing.
    pub const fn from_tilt(tilt: TiltCategory) -> Option<Self> {
        match tilt {
            TiltCategory::Left => Some(Self::Dot),
            TiltCategory::Middle => Some(Self::Space),
            TiltCategory::Right => Some(Self::Dash),
            TiltCategory::Unknown => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// No room left (for outgoing: the reserved tail would be entered).
    Full,
    /// Sealing requires at least one symbol.
    Empty,
    /// The terminator is already in place.
    Sealed,
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "buffer full"),
            Self::Empty => write!(f, "nothing composed"),
            Self::Sealed => write!(f, "message already sealed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Outgoing
// ---------------------------------------------------------------------------

/// The message being composed.
///
/// Holds at most `OUTGOING_CAPACITY - TERMINATOR_RESERVE` symbols.  Once
/// sealed it ends with [`TERMINATOR`] and accepts nothing further until it
/// is taken or cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingMessage {
    bytes: Vec<u8, OUTGOING_CAPACITY>,
    sealed: bool,
}

impl OutgoingMessage {
    pub const fn new() -> Self {
        Self {
            bytes: Vec::new(),
            sealed: false,
        }
    }

    /// Largest number of symbols a message can hold.
    pub const fn max_symbols() -> usize {
        OUTGOING_CAPACITY - TERMINATOR_RESERVE
    }

    /// Append one symbol.  The buffer is untouched on error.
    pub fn push_symbol(&mut self, symbol: Symbol) -> Result<(), BufferError> {
        if self.sealed {
            return Err(BufferError::Sealed);
        }
        if self.bytes.len() + 1 + TERMINATOR_RESERVE > OUTGOING_CAPACITY {
            return Err(BufferError::Full);
        }
        self.bytes
            .push(symbol.as_byte())
            .map_err(|_| BufferError::Full)
    }

    /// Append the terminator.  Either all of it is written or none of it.
    pub fn seal(&mut self) -> Result<(), BufferError> {
        if self.sealed {
            return Err(BufferError::Sealed);
        }
        if self.bytes.is_empty() {
            return Err(BufferError::Empty);
        }
        if self.bytes.len() + TERMINATOR_RESERVE > OUTGOING_CAPACITY {
            return Err(BufferError::Full);
        }
        self.bytes
            .extend_from_slice(TERMINATOR)
            .map_err(|_| BufferError::Full)?;
        self.sealed = true;
        Ok(())
    }

    /// Undo a [`seal`](Self::seal) that could not be followed by a state
    /// transition.
    pub fn unseal(&mut self) {
        if self.sealed {
            self.bytes.truncate(self.bytes.len() - TERMINATOR.len());
            self.sealed = false;
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Composed symbols, excluding any terminator.
    pub fn symbol_count(&self) -> usize {
        if self.sealed {
            self.bytes.len() - TERMINATOR.len()
        } else {
            self.bytes.len()
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Move the contents out, leaving an empty buffer behind.
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
        self.sealed = false;
    }
}

// ---------------------------------------------------------------------------
// Incoming
// ---------------------------------------------------------------------------

/// Bytes received since the last terminator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomingMessage {
    bytes: Vec<u8, INCOMING_CAPACITY>,
}

impl IncomingMessage {
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    pub fn push(&mut self, byte: u8) -> Result<(), BufferError> {
        self.bytes.push(byte).map_err(|_| BufferError::Full)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}
