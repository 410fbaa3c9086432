//! Motion sensing: the ICM-42670-P driver and tilt classification.
//!
//! The driver produces calibrated [`ImuSample`]s; [`tilt`] turns the X-axis
//! acceleration into a [`tilt::TiltCategory`] the composition path reads.

pub mod icm42670;
pub mod tilt;

/// One six-axis reading plus die temperature.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImuSample {
    /// Acceleration in g.
    pub ax: f32,
    pub ay: f32,
    pub az: f32,
    /// Angular rate in degrees per second.
    pub gx: f32,
    pub gy: f32,
    pub gz: f32,
    pub temperature_c: f32,
}
