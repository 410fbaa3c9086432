//! Button ISR handling, buzzer output, hardware initialisation, and
//! task spawning.

pub mod button;
pub mod buzzer;
pub mod hw_init;
pub mod task_pin;
