//! System configuration parameters
//!
//! All tunable parameters for the TiltMorse firmware.  The tilt thresholds
//! and debounce window are empirically tuned per device, so they live here
//! rather than in the protocol code.  Values can be overridden at build time
//! with a JSON document (see [`SystemConfig::from_json`]).

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Tilt classification ---
    /// X-axis acceleration (g) below which the device counts as tilted left
    pub tilt_left_threshold_g: f32,
    /// X-axis acceleration (g) above which the device counts as tilted right
    pub tilt_right_threshold_g: f32,
    /// `true`: a reading exactly on a threshold counts as tilted (`<=`/`>=`).
    /// `false`: strict comparison, the threshold itself is Middle.
    pub tilt_inclusive_thresholds: bool,

    // --- Buttons ---
    /// Minimum spacing between two accepted edges of the same button (ms)
    pub debounce_ms: u32,

    // --- Task periods ---
    /// Composition task edge-queue drain period (ms)
    pub edge_poll_ms: u32,
    /// Tilt sampling period while Recording (ms)
    pub tilt_sample_period_ms: u32,
    /// Transmitter fallback poll period (ms)
    pub transmit_poll_ms: u32,
    /// Serial ingest poll period (ms)
    pub ingest_poll_ms: u32,
    /// Display player fallback poll period (ms)
    pub display_poll_ms: u32,

    // --- Playback ---
    /// Buzzer frequency for both dot and dash (Hz)
    pub tone_freq_hz: u32,
    /// Dot tone length (ms)
    pub dot_ms: u32,
    /// Dash tone length (ms)
    pub dash_ms: u32,
    /// Silence after every dot or dash (ms)
    pub symbol_gap_ms: u32,
    /// Silence for a space symbol (ms)
    pub word_gap_ms: u32,
    /// Hold after playback before the player returns to Idle (ms)
    pub display_hold_ms: u32,

    // --- Telemetry ---
    /// Telemetry report interval (seconds)
    pub telemetry_interval_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Tilt
            tilt_left_threshold_g: -0.3,
            tilt_right_threshold_g: 0.3,
            tilt_inclusive_thresholds: false,

            // Buttons
            debounce_ms: 200,

            // Task periods
            edge_poll_ms: 10,
            tilt_sample_period_ms: 50,
            transmit_poll_ms: 50,
            ingest_poll_ms: 10,
            display_poll_ms: 50,

            // Playback
            tone_freq_hz: 1000,
            dot_ms: 100,
            dash_ms: 300,
            symbol_gap_ms: 100,
            word_gap_ms: 700,
            display_hold_ms: 1500,

            // Telemetry
            telemetry_interval_secs: 60, // 1/min
        }
    }
}

impl SystemConfig {
    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tilt_left_threshold_g.is_finite() || !self.tilt_right_threshold_g.is_finite() {
            return Err(ConfigError::ValidationFailed("tilt thresholds must be finite"));
        }
        if self.tilt_left_threshold_g >= self.tilt_right_threshold_g {
            return Err(ConfigError::ValidationFailed(
                "tilt_left_threshold_g must be below tilt_right_threshold_g",
            ));
        }
        if self.debounce_ms == 0 {
            return Err(ConfigError::ValidationFailed("debounce_ms must be non-zero"));
        }
        if self.edge_poll_ms == 0
            || self.tilt_sample_period_ms == 0
            || self.transmit_poll_ms == 0
            || self.ingest_poll_ms == 0
            || self.display_poll_ms == 0
        {
            return Err(ConfigError::ValidationFailed("task periods must be non-zero"));
        }
        if self.dot_ms == 0 || self.dot_ms >= self.dash_ms {
            return Err(ConfigError::ValidationFailed("dot_ms must be non-zero and shorter than dash_ms"));
        }
        if !(20..=20_000).contains(&self.tone_freq_hz) {
            return Err(ConfigError::ValidationFailed("tone_freq_hz outside 20-20000 Hz"));
        }
        if self.telemetry_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed("telemetry_interval_secs must be non-zero"));
        }
        Ok(())
    }

    /// Parse a JSON override.  Missing fields keep their defaults; the
    /// result is validated before it is returned.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }
}

/// Errors from loading or validating a [`SystemConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The override document is not valid JSON for this schema.
    Parse,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Parse => write!(f, "config parse error"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}
