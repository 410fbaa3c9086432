//! GPIO / peripheral pin assignments for the TiltMorse board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Buttons (active-low, internal pull-up, falling-edge interrupt)
// ---------------------------------------------------------------------------

/// Appends the symbol selected by the current tilt.
pub const SYMBOL_BUTTON_GPIO: i32 = 4;
/// Seals and sends the composed message.
pub const SEND_BUTTON_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// I²C bus (ICM-42670-P IMU)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 8;
pub const I2C_SCL_GPIO: i32 = 9;
/// Fast-mode I²C.
pub const I2C_BAUD_HZ: u32 = 400_000;

// ---------------------------------------------------------------------------
// Buzzer (passive piezo on LEDC)
// ---------------------------------------------------------------------------

pub const BUZZER_GPIO: i32 = 10;
/// LEDC timer resolution (bits) for the buzzer channel.
pub const BUZZER_DUTY_BITS: u32 = 10;
/// 50 % duty at `BUZZER_DUTY_BITS` resolution.
pub const BUZZER_DUTY_ON: u32 = 1 << (BUZZER_DUTY_BITS - 1);
