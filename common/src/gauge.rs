//! The per-tick loop body: read, correct, smooth, render, present.
//!
//! [`Gauge`] owns the single display attitude together with everything that
//! depends on it (calibration offset, peak tracker, composer). Hosts only
//! supply the collaborators and the clock:
//!
//! ```ignore
//! let offset = calibration::load_or_default(&mut store);
//! let peaks = peaks::load_or_default(&mut store);
//! let mut gauge = Gauge::new(GaugeConfig::DEFAULT, offset, peaks)?;
//! gauge.check_sink(&display)?;
//!
//! loop {
//!     gauge.tick(&mut sensor, &mut display, now_ms())?;
//!     gauge.persist_peaks(&mut store, now_ms());
//! }
//! ```
//!
//! # Fault Handling
//!
//! - Sensor faults skip the smoothing step; the previous display attitude is
//!   rendered again so alerts keep flashing.
//! - Display faults abort the tick and are returned to the host.
//! - Storage faults are logged and otherwise ignored.

use tracing::{info, warn};

use crate::alert::AlertState;
use crate::calibration::{self, CalibrationOffset, CalibrationStore};
use crate::composer::{FrameComposer, Overlay};
use crate::config::GaugeConfig;
use crate::error::{ConfigError, SensorFault, SinkFault};
use crate::frame::{DisplaySink, Frame};
use crate::peaks::{PeakAngles, PeakStore, PeakTracker};
use crate::smoother::{AngleSmoother, Attitude};

/// Source of raw roll/pitch samples in degrees.
pub trait AttitudeSensor {
    fn read(&mut self) -> Result<Attitude, SensorFault>;
}

/// What one tick did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickOutcome {
    /// Display attitude the frame was rendered with.
    pub attitude: Attitude,
    pub alert: AlertState,
    /// Set when the sensor sample was skipped.
    pub sensor_fault: Option<SensorFault>,
}

/// Coarse alert level, only used to log transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AlertLevel {
    Normal,
    Warning,
    Critical,
}

impl From<&AlertState> for AlertLevel {
    fn from(state: &AlertState) -> Self {
        match state {
            AlertState::Normal => Self::Normal,
            AlertState::Warning(_) => Self::Warning,
            AlertState::Critical(_) => Self::Critical,
        }
    }
}

pub struct Gauge {
    composer: FrameComposer,
    smoother: AngleSmoother,
    offset: CalibrationOffset,
    peaks: PeakTracker,
    calibrating_until_ms: Option<u64>,
    last_level: AlertLevel,
}

impl Gauge {
    /// Validate the configuration and build the composer caches.
    pub fn new(
        config: GaugeConfig,
        offset: CalibrationOffset,
        peaks: PeakAngles,
    ) -> Result<Self, ConfigError> {
        Ok(Self::with_composer(FrameComposer::new(config)?, offset, peaks))
    }

    pub fn with_composer(
        composer: FrameComposer,
        offset: CalibrationOffset,
        peaks: PeakAngles,
    ) -> Self {
        let smoother = AngleSmoother::new(composer.config().smoothing_alpha);
        Self {
            composer,
            smoother,
            offset,
            peaks: PeakTracker::new(peaks.sanitized()),
            calibrating_until_ms: None,
            last_level: AlertLevel::Normal,
        }
    }

    #[inline]
    pub const fn config(&self) -> &GaugeConfig { self.composer.config() }

    #[inline]
    pub const fn composer(&self) -> &FrameComposer { &self.composer }

    #[inline]
    pub const fn display_attitude(&self) -> Attitude { self.smoother.current() }

    #[inline]
    pub const fn offset(&self) -> CalibrationOffset { self.offset }

    #[inline]
    pub const fn peaks(&self) -> &PeakAngles { self.peaks.peaks() }

    /// Fail early if `sink` can't take this gauge's frames.
    pub fn check_sink<D>(
        &self,
        sink: &D,
    ) -> Result<(), SinkFault>
    where
        D: DisplaySink + ?Sized,
    {
        let panel = sink.size();
        let frame = self.config().frame_size();
        if panel != frame {
            return Err(SinkFault::SizeMismatch {
                expected_width: panel.width,
                expected_height: panel.height,
                actual_width: frame.width,
                actual_height: frame.height,
            });
        }
        Ok(())
    }

    /// Run one tick at `now_ms` (any monotonic millisecond clock).
    pub fn tick<S, D>(
        &mut self,
        sensor: &mut S,
        sink: &mut D,
        now_ms: u64,
    ) -> Result<TickOutcome, SinkFault>
    where
        S: AttitudeSensor + ?Sized,
        D: DisplaySink + ?Sized,
    {
        let sensor_fault = self.sample(sensor);
        let attitude = self.smoother.current();

        let overlay = Overlay {
            peaks: *self.peaks.peaks(),
            calibrating: self.is_calibrating(now_ms),
        };
        let (raster, alert) = self.composer.compose(attitude, now_ms, &overlay);
        self.log_transition(&alert, attitude);

        sink.show(&Frame::from_raster(&raster))?;

        Ok(TickOutcome {
            attitude,
            alert,
            sensor_fault,
        })
    }

    fn sample<S>(
        &mut self,
        sensor: &mut S,
    ) -> Option<SensorFault>
    where
        S: AttitudeSensor + ?Sized,
    {
        match sensor.read() {
            Ok(raw) if raw.is_finite() => {
                let display = self.smoother.update(self.offset.apply(raw));
                self.peaks.update(display);
                None
            }
            Ok(_) => {
                warn!("sensor produced a non-finite sample, keeping previous attitude");
                Some(SensorFault::NonFinite)
            }
            Err(fault) => {
                warn!(%fault, "sensor read failed, keeping previous attitude");
                Some(fault)
            }
        }
    }

    fn log_transition(
        &mut self,
        alert: &AlertState,
        attitude: Attitude,
    ) {
        let level = AlertLevel::from(alert);
        if level == self.last_level {
            return;
        }
        match alert {
            AlertState::Critical(axes) => {
                warn!(axes = axes.label(), roll = attitude.roll, pitch = attitude.pitch, "critical tilt");
            }
            AlertState::Warning(warning) => {
                info!(intensity = warning.intensity(), "tilt warning");
            }
            AlertState::Normal => info!("tilt back to normal"),
        }
        self.last_level = level;
    }

    /// Zero the gauge at its current attitude.
    ///
    /// The current display attitude is folded into the offset, smoothing and
    /// peaks restart from zero, the new offset is saved (best-effort) and the
    /// "CALIBRATING..." banner is shown for
    /// [`calibration_banner_ms`](GaugeConfig::calibration_banner_ms).
    pub fn calibrate<C>(
        &mut self,
        store: &mut C,
        now_ms: u64,
    ) where
        C: CalibrationStore + ?Sized,
    {
        let display = self.smoother.current();
        self.offset = self.offset.absorb(display);
        self.smoother.reset();
        self.peaks.reset();
        self.calibrating_until_ms = Some(now_ms.saturating_add(self.config().calibration_banner_ms));

        info!(
            roll_offset = self.offset.roll_offset,
            pitch_offset = self.offset.pitch_offset,
            "calibrated"
        );
        calibration::save_best_effort(store, &self.offset);
    }

    /// Forget peak values without touching the calibration.
    pub fn reset_peaks(&mut self) {
        self.peaks.reset();
        info!("peaks reset");
    }

    #[inline]
    pub fn is_calibrating(
        &self,
        now_ms: u64,
    ) -> bool {
        self.calibrating_until_ms.is_some_and(|until| now_ms < until)
    }

    /// Save peaks if they changed and the save interval has passed.
    /// Returns `true` if a save succeeded.
    pub fn persist_peaks<P>(
        &mut self,
        store: &mut P,
        now_ms: u64,
    ) -> bool
    where
        P: PeakStore + ?Sized,
    {
        if !self.peaks.save_due(now_ms, self.config().peak_save_interval_ms) {
            return false;
        }
        let saved = match store.save_peaks(self.peaks.peaks()) {
            Ok(()) => true,
            Err(fault) => {
                warn!(%fault, "failed to save peaks");
                false
            }
        };
        self.peaks.mark_saved(now_ms, saved);
        saved
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use embedded_graphics::prelude::*;

    use super::*;
    use crate::alert::AxisSet;
    use crate::calibration::tests::MemoryStore;
    use crate::error::PersistenceFault;

    /// Replays a script of readings, repeating the last one.
    struct ScriptedSensor {
        script: Vec<Result<Attitude, SensorFault>>,
        next: usize,
    }

    impl ScriptedSensor {
        fn new(script: Vec<Result<Attitude, SensorFault>>) -> Self { Self { script, next: 0 } }

        fn steady(attitude: Attitude) -> Self { Self::new(alloc::vec![Ok(attitude)]) }
    }

    impl AttitudeSensor for ScriptedSensor {
        fn read(&mut self) -> Result<Attitude, SensorFault> {
            let i = self.next.min(self.script.len() - 1);
            self.next += 1;
            self.script[i]
        }
    }

    struct RecordingSink {
        size: Size,
        frames: Vec<Frame>,
    }

    impl RecordingSink {
        fn new(side: u32) -> Self {
            Self {
                size: Size::new(side, side),
                frames: Vec::new(),
            }
        }
    }

    impl DisplaySink for RecordingSink {
        fn size(&self) -> Size { self.size }

        fn show(
            &mut self,
            frame: &Frame,
        ) -> Result<(), SinkFault> {
            frame.check_fits(self.size)?;
            self.frames.push(frame.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct PeakMemory {
        saved: Vec<PeakAngles>,
        fail: bool,
    }

    impl PeakStore for PeakMemory {
        fn load_peaks(&mut self) -> Result<PeakAngles, PersistenceFault> {
            self.saved.last().copied().ok_or(PersistenceFault::Missing)
        }

        fn save_peaks(
            &mut self,
            peaks: &PeakAngles,
        ) -> Result<(), PersistenceFault> {
            if self.fail {
                return Err(PersistenceFault::Io);
            }
            self.saved.push(*peaks);
            Ok(())
        }
    }

    fn config() -> GaugeConfig {
        let mut config = GaugeConfig::DEFAULT;
        config.smoothing_alpha = 1.0;
        config.sprite_min_deg = -2;
        config.sprite_max_deg = 2;
        config
    }

    fn gauge() -> Gauge { Gauge::new(config(), CalibrationOffset::ZERO, PeakAngles::ZERO).unwrap() }

    #[test]
    fn test_tick_pushes_one_frame() {
        let mut gauge = gauge();
        let mut sensor = ScriptedSensor::steady(Attitude::ZERO);
        let mut sink = RecordingSink::new(240);

        let outcome = gauge.tick(&mut sensor, &mut sink, 0).unwrap();
        assert_eq!(outcome.alert, AlertState::Normal);
        assert_eq!(outcome.sensor_fault, None);
        assert_eq!(sink.frames.len(), 1);
    }

    #[test]
    fn test_offset_is_subtracted() {
        let mut gauge = Gauge::new(config(), CalibrationOffset::new(5.0, -5.0), PeakAngles::ZERO).unwrap();
        let mut sensor = ScriptedSensor::steady(Attitude::new(5.0, -5.0));
        let mut sink = RecordingSink::new(240);
        let outcome = gauge.tick(&mut sensor, &mut sink, 0).unwrap();
        assert_eq!(outcome.attitude, Attitude::ZERO);
    }

    #[test]
    fn test_sensor_fault_keeps_previous_attitude() {
        let mut gauge = gauge();
        let mut sensor = ScriptedSensor::new(alloc::vec![
            Ok(Attitude::new(12.0, 3.0)),
            Err(SensorFault::Bus),
            Ok(Attitude::new(f32::NAN, 0.0)),
            Ok(Attitude::new(14.0, 3.0)),
        ]);
        let mut sink = RecordingSink::new(240);

        assert_eq!(gauge.tick(&mut sensor, &mut sink, 0).unwrap().attitude, Attitude::new(12.0, 3.0));

        let faulted = gauge.tick(&mut sensor, &mut sink, 20).unwrap();
        assert_eq!(faulted.sensor_fault, Some(SensorFault::Bus));
        assert_eq!(faulted.attitude, Attitude::new(12.0, 3.0));

        let nan = gauge.tick(&mut sensor, &mut sink, 40).unwrap();
        assert_eq!(nan.sensor_fault, Some(SensorFault::NonFinite));
        assert_eq!(nan.attitude, Attitude::new(12.0, 3.0));

        assert_eq!(gauge.tick(&mut sensor, &mut sink, 60).unwrap().attitude, Attitude::new(14.0, 3.0));
        // A frame was still pushed on every tick
        assert_eq!(sink.frames.len(), 4);
    }

    #[test]
    fn test_sink_mismatch_is_fatal() {
        let mut gauge = gauge();
        let mut sensor = ScriptedSensor::steady(Attitude::ZERO);
        let mut sink = RecordingSink::new(200);

        assert!(matches!(gauge.check_sink(&sink), Err(SinkFault::SizeMismatch { .. })));
        let result = gauge.tick(&mut sensor, &mut sink, 0);
        assert!(matches!(result, Err(SinkFault::SizeMismatch { .. })));
        assert!(sink.frames.is_empty());
    }

    #[test]
    fn test_critical_roll_scenario() {
        let mut gauge = gauge();
        let mut sensor = ScriptedSensor::steady(Attitude::new(50.0, 0.0));
        let mut sink = RecordingSink::new(240);
        let outcome = gauge.tick(&mut sensor, &mut sink, 0).unwrap();
        assert_eq!(outcome.alert, AlertState::Critical(AxisSet { roll: true, pitch: false }));
    }

    #[test]
    fn test_calibrate_zeroes_current_attitude() {
        let mut gauge = gauge();
        let mut store = MemoryStore::default();
        let mut sensor = ScriptedSensor::steady(Attitude::new(7.0, -3.0));
        let mut sink = RecordingSink::new(240);

        gauge.tick(&mut sensor, &mut sink, 0).unwrap();
        assert_eq!(gauge.peaks().roll_max, 7.0);

        gauge.calibrate(&mut store, 100);
        assert_eq!(gauge.offset(), CalibrationOffset::new(7.0, -3.0));
        assert_eq!(store.stored, Some(CalibrationOffset::new(7.0, -3.0)));
        assert_eq!(gauge.display_attitude(), Attitude::ZERO);
        assert_eq!(*gauge.peaks(), PeakAngles::ZERO);

        let outcome = gauge.tick(&mut sensor, &mut sink, 120).unwrap();
        assert_eq!(outcome.attitude, Attitude::ZERO);
    }

    #[test]
    fn test_calibration_banner_expires() {
        let mut gauge = gauge();
        let mut store = MemoryStore::default();
        assert!(!gauge.is_calibrating(0));
        gauge.calibrate(&mut store, 1000);
        assert!(gauge.is_calibrating(1000));
        assert!(gauge.is_calibrating(2999));
        assert!(!gauge.is_calibrating(3000));
    }

    #[test]
    fn test_calibrate_survives_store_failure() {
        let mut gauge = gauge();
        let mut store = MemoryStore {
            fail_save: true,
            ..MemoryStore::default()
        };
        gauge.calibrate(&mut store, 0);
        assert_eq!(store.stored, None);
        assert!(gauge.is_calibrating(10));
    }

    #[test]
    fn test_peaks_persist_throttled() {
        let mut gauge = gauge();
        let mut store = PeakMemory::default();
        let mut sensor = ScriptedSensor::new(alloc::vec![Ok(Attitude::new(10.0, 0.0)), Ok(Attitude::new(20.0, 0.0))]);
        let mut sink = RecordingSink::new(240);

        assert!(!gauge.persist_peaks(&mut store, 0), "nothing to save yet");

        gauge.tick(&mut sensor, &mut sink, 0).unwrap();
        assert!(gauge.persist_peaks(&mut store, 0));
        assert_eq!(store.saved.len(), 1);

        gauge.tick(&mut sensor, &mut sink, 1000).unwrap();
        assert!(!gauge.persist_peaks(&mut store, 1000), "inside the interval");
        assert!(gauge.persist_peaks(&mut store, 5000));
        assert_eq!(store.saved.last().map(|p| p.roll_max), Some(20.0));
    }

    #[test]
    fn test_peak_save_failure_is_not_fatal() {
        let mut gauge = gauge();
        let mut store = PeakMemory {
            fail: true,
            ..PeakMemory::default()
        };
        gauge.reset_peaks();
        assert!(!gauge.persist_peaks(&mut store, 0));
        store.fail = false;
        assert!(!gauge.persist_peaks(&mut store, 100), "waits for the interval after a failure");
        assert!(gauge.persist_peaks(&mut store, 5000));
    }
}
