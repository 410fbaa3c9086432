//! Core-pinned thread spawning for ESP32-S3 dual-core.
//!
//! Wraps `esp_pthread_set_cfg()` so that `std::thread::spawn` creates a
//! FreeRTOS task pinned to a specific CPU core with explicit priority
//! and stack size. On non-ESP targets, falls back to plain thread spawn.
//!
//! # ESP-IDF Threading Model
//!
//! ESP-IDF implements `std::thread` via pthreads, which are thin wrappers
//! around FreeRTOS tasks. `esp_pthread_set_cfg()` sets thread-local
//! configuration that applies to the *next* `pthread_create()` call from
//! the calling thread. This means the config→spawn pair must not be
//! interleaved with other thread creation on the same thread.

use crate::error::Error;

/// CPU core identifiers for the ESP32-S3 Xtensa LX7 dual-core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// Core 0 (PRO_CPU): USB, logging, telemetry.
    Pro = 0,
    /// Core 1 (APP_CPU): the messenger tasks.
    App = 1,
}

/// Everything needed to start one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    pub core: Core,
    pub priority: u8,
    pub stack_kb: usize,
    /// Null-terminated, e.g. `"tilt\0"`.
    pub name: &'static str,
}

/// Spawn a thread pinned to a specific core with explicit priority and stack.
///
/// On ESP-IDF, uses `esp_pthread_set_cfg()` to configure core affinity,
/// priority, and stack size before `std::thread::spawn`.
///
/// On non-ESP targets only `name` is used; host threads get the platform
/// default stack.
#[cfg(target_os = "espidf")]
pub fn spawn_on_core(
    spec: TaskSpec,
    f: impl FnOnce() + Send + 'static,
) -> Result<std::thread::JoinHandle<()>, Error> {
    let display_name = spec.name.trim_end_matches('\0');
    // SAFETY: the config struct lives on this stack frame for the call;
    // `name` is a 'static null-terminated string.
    let ret = unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.pin_to_core = spec.core as i32;
        cfg.prio = spec.priority as i32;
        cfg.stack_size = (spec.stack_kb * 1024) as _;
        cfg.thread_name = spec.name.as_ptr() as *const _;
        esp_idf_sys::esp_pthread_set_cfg(&cfg)
    };
    if ret != esp_idf_sys::ESP_OK as i32 {
        log::error!("esp_pthread_set_cfg failed for '{}': {}", display_name, ret);
        return Err(Error::Spawn(display_name));
    }

    log::info!(
        "Spawning '{}' on {:?} (pri={}, stack={}KB)",
        display_name,
        spec.core,
        spec.priority,
        spec.stack_kb
    );

    std::thread::Builder::new()
        .name(display_name.into())
        .spawn(f)
        .map_err(|_| Error::Spawn(display_name))
}

/// Simulation fallback: a plain named thread.
#[cfg(not(target_os = "espidf"))]
pub fn spawn_on_core(
    spec: TaskSpec,
    f: impl FnOnce() + Send + 'static,
) -> Result<std::thread::JoinHandle<()>, Error> {
    let display_name = spec.name.trim_end_matches('\0');
    log::info!(
        "Spawning '{}' (sim, no core pinning)",
        display_name
    );

    std::thread::Builder::new()
        .name(display_name.into())
        .spawn(f)
        .map_err(|_| Error::Spawn(display_name))
}
