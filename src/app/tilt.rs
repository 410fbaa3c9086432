//! TiltClassifier: samples the IMU while composing and publishes the tilt.

use log::{debug, warn};

use crate::fsm::SystemState;
use crate::sensors::tilt::{TiltCategory, TiltThresholds};

use super::events::AppEvent;
use super::ports::{EventSink, ImuPort};
use super::shared::{Counters, Shared};

pub struct TiltClassifier<'a, I: ImuPort, S: EventSink> {
    shared: &'a Shared,
    imu: I,
    thresholds: TiltThresholds,
    sink: S,
}

impl<'a, I: ImuPort, S: EventSink> TiltClassifier<'a, I, S> {
    pub fn new(shared: &'a Shared, imu: I, thresholds: TiltThresholds, sink: S) -> Self {
        Self {
            shared,
            imu,
            thresholds,
            sink,
        }
    }

    /// One sampling period.
    ///
    /// Outside Recording the sensor is not touched and `None` is returned.
    /// A failed read is logged and counted; the published tilt stays as it
    /// was.
    pub fn sample(&mut self) -> Option<TiltCategory> {
        if self.shared.state.load() != SystemState::Recording {
            return None;
        }

        let reading = match self.imu.read_sample() {
            Ok(r) => r,
            Err(e) => {
                warn!("IMU read failed: {} (keeping {:?})", e, self.shared.tilt.load());
                Counters::bump(&self.shared.counters.sensor_failures);
                self.sink.emit(&AppEvent::SensorReadFailed(e));
                return None;
            }
        };

        let tilt = self.thresholds.classify(reading.ax);
        let previous = self.shared.tilt.store(tilt);
        if previous != tilt {
            debug!("tilt {:?} -> {:?} (ax={:.3} g)", previous, tilt, reading.ax);
            self.sink.emit(&AppEvent::TiltChanged {
                from: previous,
                to: tilt,
            });
        }
        Some(tilt)
    }
}
