//! USB serial byte transport.
//!
//! - **`target_os = "espidf"`**: the USB-Serial-JTAG driver, installed by
//!   [`hw_init`](crate::drivers::hw_init).  Reads never block; writes wait
//!   up to [`WRITE_TIMEOUT_TICKS`] for room in the TX ring.
//! - **`not(target_os = "espidf")`**: nothing arrives; writes are logged.
//!
//! The driver is internally locked, so the handle is `Copy` and the
//! receiver and transmitter tasks each hold one.

use crate::app::ports::ByteTransport;
use crate::error::TransportError;

/// FreeRTOS ticks a write may wait for TX ring space.
pub const WRITE_TIMEOUT_TICKS: u32 = 100;

#[derive(Debug, Clone, Copy, Default)]
pub struct UsbSerial;

impl UsbSerial {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "espidf")]
impl ByteTransport for UsbSerial {
    fn try_read_byte(&mut self) -> Option<u8> {
        let mut byte = 0u8;
        // SAFETY: one-byte buffer on the stack; zero ticks never blocks.
        let n = unsafe {
            esp_idf_svc::sys::usb_serial_jtag_read_bytes(
                (&mut byte as *mut u8).cast(),
                1,
                0,
            )
        };
        (n == 1).then_some(byte)
    }

    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), TransportError> {
        let mut written = 0usize;
        while written < buf.len() {
            let rest = &buf[written..];
            // SAFETY: `rest` is a live slice for the duration of the call.
            let n = unsafe {
                esp_idf_svc::sys::usb_serial_jtag_write_bytes(
                    rest.as_ptr().cast(),
                    rest.len(),
                    WRITE_TIMEOUT_TICKS,
                )
            };
            if n < 0 {
                return Err(TransportError::Driver(n));
            }
            if n == 0 {
                return Err(TransportError::ShortWrite {
                    written,
                    expected: buf.len(),
                });
            }
            written += n as usize;
        }
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
impl ByteTransport for UsbSerial {
    fn try_read_byte(&mut self) -> Option<u8> {
        None
    }

    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), TransportError> {
        log::info!("serial(sim) | {:?}", String::from_utf8_lossy(buf));
        Ok(())
    }
}
