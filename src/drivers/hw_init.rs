//! One-shot hardware peripheral initialization.
//!
//! Configures the button GPIOs, the buzzer LEDC timer/channel and the
//! USB-Serial-JTAG driver using raw ESP-IDF sys calls, then installs the
//! button ISRs.  Called once from `main()` before any task starts.  The
//! I²C bus is brought up separately through `esp-idf-hal`.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
    SerialInstallFailed(i32),
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc) => write!(f, "LEDC timer/channel config failed (rc={})", rc),
            Self::SerialInstallFailed(rc) => write!(f, "USB serial driver install failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

impl From<HwInitError> for crate::error::Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(match e {
            HwInitError::GpioConfigFailed(_) => "button GPIO",
            HwInitError::LedcInitFailed(_) => "buzzer LEDC",
            HwInitError::SerialInstallFailed(_) => "USB serial",
            HwInitError::IsrInstallFailed(_) => "GPIO ISR service",
        })
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
fn check(ret: esp_err_t, err: fn(i32) -> HwInitError) -> Result<(), HwInitError> {
    if ret == ESP_OK as i32 { Ok(()) } else { Err(err(ret)) }
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before any task starts; single-threaded.
    unsafe {
        init_buttons()?;
        init_buzzer()?;
        init_serial()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── Buttons ───────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_buttons() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: (1u64 << pins::SYMBOL_BUTTON_GPIO) | (1u64 << pins::SEND_BUTTON_GPIO),
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
        ..Default::default()
    };
    check(unsafe { gpio_config(&cfg) }, HwInitError::GpioConfigFailed)?;
    info!("hw_init: buttons on GPIO{} / GPIO{}", pins::SYMBOL_BUTTON_GPIO, pins::SEND_BUTTON_GPIO);
    Ok(())
}

// ── Buzzer (LEDC) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
const BUZZER_TIMER: ledc_timer_t = ledc_timer_t_LEDC_TIMER_0;
#[cfg(target_os = "espidf")]
const BUZZER_CHANNEL: ledc_channel_t = ledc_channel_t_LEDC_CHANNEL_0;

#[cfg(target_os = "espidf")]
unsafe fn init_buzzer() -> Result<(), HwInitError> {
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: BUZZER_TIMER,
        duty_resolution: pins::BUZZER_DUTY_BITS,
        freq_hz: 1_000,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    check(unsafe { ledc_timer_config(&timer) }, HwInitError::LedcInitFailed)?;

    let channel = ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: BUZZER_CHANNEL,
        timer_sel: BUZZER_TIMER,
        gpio_num: pins::BUZZER_GPIO,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    };
    check(unsafe { ledc_channel_config(&channel) }, HwInitError::LedcInitFailed)?;

    info!("hw_init: buzzer LEDC on GPIO{}", pins::BUZZER_GPIO);
    Ok(())
}

/// Start a square wave at `freq_hz`.
#[cfg(target_os = "espidf")]
pub fn buzzer_on(freq_hz: u32) {
    // SAFETY: timer and channel were configured in init_buzzer(); only the
    // player task drives the buzzer.
    unsafe {
        ledc_set_freq(ledc_mode_t_LEDC_LOW_SPEED_MODE, BUZZER_TIMER, freq_hz);
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, BUZZER_CHANNEL, pins::BUZZER_DUTY_ON);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, BUZZER_CHANNEL);
    }
}

#[cfg(target_os = "espidf")]
pub fn buzzer_off() {
    // SAFETY: see buzzer_on().
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, BUZZER_CHANNEL, 0);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, BUZZER_CHANNEL);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn buzzer_on(_freq_hz: u32) {}

#[cfg(not(target_os = "espidf"))]
pub fn buzzer_off() {}

// ── USB serial ────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_serial() -> Result<(), HwInitError> {
    let mut cfg = usb_serial_jtag_driver_config_t {
        tx_buffer_size: 1024,
        rx_buffer_size: 256,
    };
    check(
        unsafe { usb_serial_jtag_driver_install(&mut cfg) },
        HwInitError::SerialInstallFailed,
    )?;
    info!("hw_init: USB-Serial-JTAG driver installed");
    Ok(())
}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
use crate::drivers::button::{ButtonId, button_isr_handler};

#[cfg(target_os = "espidf")]
fn isr_now_ms() -> u32 {
    (crate::adapters::time::now_us() / 1_000) as u32
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn symbol_button_isr(_arg: *mut core::ffi::c_void) {
    button_isr_handler(ButtonId::Symbol, isr_now_ms());
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn send_button_isr(_arg: *mut core::ffi::c_void) {
    button_isr_handler(ButtonId::Send, isr_now_ms());
}

/// Install per-pin GPIO ISR service and register the button handlers.
/// Call after init_peripherals() and before the tasks start.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed.  The handlers only debounce and
    // enqueue into the edge channel.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        for (pin, handler) in [
            (pins::SYMBOL_BUTTON_GPIO, symbol_button_isr as unsafe extern "C" fn(_)),
            (pins::SEND_BUTTON_GPIO, send_button_isr as unsafe extern "C" fn(_)),
        ] {
            check(
                gpio_isr_handler_add(pin, Some(handler), core::ptr::null_mut()),
                HwInitError::IsrInstallFailed,
            )?;
            check(gpio_intr_enable(pin), HwInitError::IsrInstallFailed)?;
        }

        info!("hw_init: ISR service installed (symbol, send)");
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
