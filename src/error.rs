//! Unified error types for the TiltMorse firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! boot path's error handling uniform.  All variants are `Copy` so they can
//! be passed between tasks and into [`AppEvent`](crate::app::events::AppEvent)s
//! without allocation.

use core::fmt;

use crate::config::ConfigError;
use crate::fsm::TransitionError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The motion sensor could not be read.
    Sensor(SensorError),
    /// The serial byte transport failed.
    Transport(TransportError),
    /// A state-register transition was refused.
    Transition(TransitionError),
    /// Configuration is invalid or could not be parsed.
    Config(ConfigError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// A task could not be created.
    Spawn(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Transition(e) => write!(f, "transition: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Spawn(name) => write!(f, "spawn: task '{name}' could not be created"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The I2C transaction failed (NACK, arbitration loss, timeout).
    Bus,
    /// WHO_AM_I returned something other than the expected part ID.
    UnexpectedDevice(u8),
    /// The sensor has not been started yet.
    NotStarted,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "I2C bus error"),
            Self::UnexpectedDevice(id) => write!(f, "unexpected device id 0x{id:02X}"),
            Self::NotStarted => write!(f, "sensor not started"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The driver accepted fewer bytes than requested.
    ShortWrite { written: usize, expected: usize },
    /// The driver reported an error code.
    Driver(i32),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortWrite { written, expected } => {
                write!(f, "short write ({written}/{expected} bytes)")
            }
            Self::Driver(rc) => write!(f, "driver error (rc={rc})"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<TransitionError> for Error {
    fn from(e: TransitionError) -> Self {
        Self::Transition(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
