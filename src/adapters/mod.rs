//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements      | Connects to                  |
//! |-------------|-----------------|------------------------------|
//! | `log_sink`  | EventSink       | Serial log output            |
//! | `display`   | DisplayPort     | Screen text (log-echoed)     |
//! | `serial`    | ByteTransport   | USB-Serial-JTAG              |
//! | `delay`     | DelayNs         | FreeRTOS tick delay          |
//! | `time`      |                 | ESP32 high-resolution timer  |
//!
//! The IMU port is implemented by the sensor driver itself
//! ([`Icm42670`](crate::sensors::icm42670::Icm42670)) and the tone port by
//! the [`Buzzer`](crate::drivers::buzzer::Buzzer).

pub mod delay;
pub mod display;
pub mod log_sink;
pub mod serial;
pub mod time;
