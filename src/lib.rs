//! TiltMorse firmware library.
//!
//! Exposes the messenger core for integration testing. All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module, with host fallbacks beside it.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod fsm;
pub mod message;
pub mod pins;
pub mod tasks;

pub mod adapters;
pub mod drivers;
pub mod sensors;
