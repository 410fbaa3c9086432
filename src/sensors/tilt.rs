//! Tilt classification.
//!
//! A pure function of the X-axis acceleration against two thresholds:
//!
//! ```text
//!        Left        │        Middle        │       Right
//!  ──────────────────┼──────────────────────┼──────────────────▶ ax (g)
//!                  −0.3                   +0.3
//! ```
//!
//! Whether a reading exactly on a threshold is tilted is configurable
//! (strict by default, so ±0.3 g itself is Middle).

use core::sync::atomic::{AtomicU8, Ordering};

use crate::config::SystemConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TiltCategory {
    Left = 0,
    Middle = 1,
    Right = 2,
    Unknown = 3,
}

impl TiltCategory {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Left,
            1 => Self::Middle,
            2 => Self::Right,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltThresholds {
    pub left_g: f32,
    pub right_g: f32,
    pub inclusive: bool,
}

impl Default for TiltThresholds {
    fn default() -> Self {
        Self::from_config(&SystemConfig::default())
    }
}

impl TiltThresholds {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            left_g: config.tilt_left_threshold_g,
            right_g: config.tilt_right_threshold_g,
            inclusive: config.tilt_inclusive_thresholds,
        }
    }

    /// Classify one X-axis reading.  Non-finite readings are `Unknown`.
    pub fn classify(&self, ax: f32) -> TiltCategory {
        if !ax.is_finite() {
            return TiltCategory::Unknown;
        }
        let (left, right) = if self.inclusive {
            (ax <= self.left_g, ax >= self.right_g)
        } else {
            (ax < self.left_g, ax > self.right_g)
        };
        if left {
            TiltCategory::Left
        } else if right {
            TiltCategory::Right
        } else {
            TiltCategory::Middle
        }
    }
}

/// Last published tilt.  Written by the classifier, read by the router.
pub struct TiltCell(AtomicU8);

impl Default for TiltCell {
    fn default() -> Self {
        Self::new()
    }
}

impl TiltCell {
    /// Starts `Unknown` until the first successful sample.
    pub const fn new() -> Self {
        Self(AtomicU8::new(TiltCategory::Unknown as u8))
    }

    pub fn load(&self) -> TiltCategory {
        TiltCategory::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Publish `tilt`, returning the previous value.
    pub fn store(&self, tilt: TiltCategory) -> TiltCategory {
        TiltCategory::from_u8(self.0.swap(tilt as u8, Ordering::AcqRel))
    }
}
