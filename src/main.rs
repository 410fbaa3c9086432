//! TiltMorse Firmware: Main Entry Point
//!
//! Hexagonal core, one task per component, wired through a single
//! [`Shared`] block.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  Icm42670    LogDisplay     Buzzer     UsbSerial     LogSink   │
//! │  (ImuPort)   (DisplayPort)  (TonePort) (ByteTransport)(Events) │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │  TiltClassifier · ButtonEventRouter · Transmitter      │    │
//! │  │  ReceiverIngest · DisplayPlayer · StateCell            │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Button ISRs ──▶ EdgeQueue ──▶ composition task                │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::{Arc, Mutex};

use anyhow::Result;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{error, info, warn};

use tiltmorse::adapters::delay::SysDelay;
use tiltmorse::adapters::display::{BOOT_BANNER, LogDisplay};
use tiltmorse::adapters::log_sink::LogEventSink;
use tiltmorse::adapters::serial::UsbSerial;
use tiltmorse::adapters::time::Esp32TimeAdapter;
use tiltmorse::app::events::AppEvent;
use tiltmorse::app::ports::{DisplayPort, EventSink};
use tiltmorse::app::shared::{SHARED, Shared};
use tiltmorse::config::SystemConfig;
use tiltmorse::drivers::buzzer::Buzzer;
use tiltmorse::drivers::hw_init;
use tiltmorse::pins;
use tiltmorse::sensors::icm42670::Icm42670;
use tiltmorse::tasks::{self, Peripherals as TaskPeripherals};

fn halt() -> ! {
    // Task watchdog resets the chip after its timeout.
    loop {
        std::thread::sleep(std::time::Duration::from_secs(1));
    }
}

fn load_config() -> SystemConfig {
    match option_env!("TILTMORSE_CONFIG_JSON") {
        Some(json) => match SystemConfig::from_json(json) {
            Ok(cfg) => {
                info!("Config loaded from build override");
                cfg
            }
            Err(e) => {
                warn!("Config override rejected ({}), using defaults", e);
                SystemConfig::default()
            }
        },
        None => SystemConfig::default(),
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  TiltMorse v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config ─────────────────────────────────────────────
    let config = load_config();
    let shared: &'static Shared = &SHARED;
    shared.apply_config(&config);

    // ── 3. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        error!("HAL init failed: {}, halting", e);
        halt();
    }
    if let Err(e) = hw_init::init_isr_service() {
        error!("ISR service init failed: {}, halting", e);
        halt();
    }

    let p = Peripherals::take()?;
    let i2c_cfg = I2cConfig::new().baudrate(Hertz(pins::I2C_BAUD_HZ));
    let i2c = I2cDriver::new(p.i2c0, p.pins.gpio8, p.pins.gpio9, &i2c_cfg)?;
    let mut imu = Icm42670::new(i2c);
    if let Err(e) = imu.start(&mut SysDelay) {
        error!("IMU start failed: {}, halting", e);
        halt();
    }

    let mut display = Arc::new(Mutex::new(LogDisplay::new()));
    display.write_text(BOOT_BANNER);

    // ── 4. Tasks ──────────────────────────────────────────────
    let mut log_sink = LogEventSink::new();
    let hw = TaskPeripherals {
        imu,
        display,
        serial: UsbSerial::new(),
        tone: Buzzer::new(),
        delay: SysDelay,
        sink: log_sink,
    };
    if let Err(e) = tasks::spawn_all(shared, &config, hw) {
        error!("Task spawn failed: {}, halting", e);
        halt();
    }
    log_sink.emit(&AppEvent::Started(shared.state.load()));

    info!("System ready. Entering telemetry loop.");

    // ── 5. Telemetry ──────────────────────────────────────────
    let time = Esp32TimeAdapter::new();
    let interval = std::time::Duration::from_secs(config.telemetry_interval_secs as u64);
    loop {
        std::thread::sleep(interval);
        log_sink.emit(&AppEvent::Telemetry(shared.telemetry(time.uptime_secs())));
    }
}
