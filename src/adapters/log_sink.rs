//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production).

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                let c = &t.counters;
                info!(
                    "TELEM | up={}s | state={} tilt={:?} | out={}B in={}B | \
                     edges ok={} bounce={} drop={} ignored={} | \
                     sym ok={} drop={} | tx ok={} fail={} | rx msg={} drop={} | imu_fail={}",
                    t.uptime_secs,
                    t.state,
                    t.tilt,
                    t.outgoing_len,
                    t.incoming_len,
                    c.edges_accepted,
                    c.edges_debounced,
                    c.edges_dropped,
                    c.edges_ignored,
                    c.symbols_appended,
                    c.symbols_dropped,
                    c.messages_sent,
                    c.transmit_failures,
                    c.messages_received,
                    c.bytes_dropped,
                    c.sensor_failures,
                );
            }
            AppEvent::Started(state) => info!("START | initial_state={}", state),
            AppEvent::StateChanged { from, to } => info!("STATE | {} -> {}", from, to),
            AppEvent::TiltChanged { from, to } => debug!("TILT  | {:?} -> {:?}", from, to),
            AppEvent::SymbolAppended { symbol, len } => {
                debug!("SYM   | +{:?} (len={})", symbol, len)
            }
            AppEvent::SymbolDropped(e) => warn!("SYM   | dropped: {}", e),
            AppEvent::EdgeIgnored { button, state } => {
                debug!("EDGE  | {:?} ignored in {}", button, state)
            }
            AppEvent::MessageSealed { len } => info!("SEND  | sealed {} bytes", len),
            AppEvent::MessageSent { len } => info!("SEND  | {} bytes out", len),
            AppEvent::TransmitFailed(e) => warn!("SEND  | failed: {}", e),
            AppEvent::MessageReceived { len } => info!("RECV  | {} bytes", len),
            AppEvent::ByteDropped(b) => warn!("RECV  | buffer full, dropped 0x{:02X}", b),
            AppEvent::PlaybackFinished { len } => info!("PLAY  | done ({} bytes)", len),
            AppEvent::SensorReadFailed(e) => warn!("IMU   | {}", e),
        }
    }
}
