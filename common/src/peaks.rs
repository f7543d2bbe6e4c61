//! Peak tracking: the most extreme roll and pitch since the last calibration.
//!
//! Peaks are shown as small red dots on the arcs and survive restarts via a
//! [`PeakStore`]. Saves are throttled: the tracker marks itself dirty on every
//! new extreme and the gauge writes at most once per
//! [`GaugeConfig::peak_save_interval_ms`](crate::config::GaugeConfig).
//!
//! This is no_std compatible and uses caller-supplied milliseconds instead
//! of `std::time`.

use tracing::{info, warn};

use crate::error::PersistenceFault;
use crate::geometry::Axis;
use crate::smoother::Attitude;

/// Signed extremes per axis. Minimums are <= 0, maximums >= 0.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeakAngles {
    pub roll_min: f32,
    pub roll_max: f32,
    pub pitch_min: f32,
    pub pitch_max: f32,
}

impl PeakAngles {
    pub const ZERO: Self = Self {
        roll_min: 0.0,
        roll_max: 0.0,
        pitch_min: 0.0,
        pitch_max: 0.0,
    };

    /// `(min, max)` for one axis.
    #[inline]
    pub const fn range(
        &self,
        axis: Axis,
    ) -> (f32, f32) {
        match axis {
            Axis::Roll => (self.roll_min, self.roll_max),
            Axis::Pitch => (self.pitch_min, self.pitch_max),
        }
    }

    /// Stored values that are non-finite or on the wrong side of zero are
    /// replaced with zero.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let low = |v: f32| if v.is_finite() { v.min(0.0) } else { 0.0 };
        let high = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            roll_min: low(self.roll_min),
            roll_max: high(self.roll_max),
            pitch_min: low(self.pitch_min),
            pitch_max: high(self.pitch_max),
        }
    }
}

/// Persistence for peak values, same best-effort contract as
/// [`CalibrationStore`](crate::calibration::CalibrationStore).
pub trait PeakStore {
    fn load_peaks(&mut self) -> Result<PeakAngles, PersistenceFault>;

    fn save_peaks(
        &mut self,
        peaks: &PeakAngles,
    ) -> Result<(), PersistenceFault>;
}

/// Load stored peaks, starting from zero if nothing usable is stored.
pub fn load_or_default<S>(store: &mut S) -> PeakAngles
where
    S: PeakStore + ?Sized,
{
    match store.load_peaks() {
        Ok(peaks) => {
            let peaks = peaks.sanitized();
            info!(
                roll_min = peaks.roll_min,
                roll_max = peaks.roll_max,
                pitch_min = peaks.pitch_min,
                pitch_max = peaks.pitch_max,
                "loaded peaks"
            );
            peaks
        }
        Err(PersistenceFault::Missing) => {
            info!("no stored peaks, starting from zero");
            PeakAngles::ZERO
        }
        Err(fault) => {
            warn!(%fault, "failed to load peaks, starting from zero");
            PeakAngles::ZERO
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PeakTracker {
    peaks: PeakAngles,
    dirty: bool,
    last_save_ms: Option<u64>,
}

impl PeakTracker {
    pub const fn new(initial: PeakAngles) -> Self {
        Self {
            peaks: initial,
            dirty: false,
            last_save_ms: None,
        }
    }

    /// Fold in the current display attitude. Returns `true` if any extreme
    /// moved.
    pub fn update(
        &mut self,
        attitude: Attitude,
    ) -> bool {
        if !attitude.is_finite() {
            return false;
        }
        let before = self.peaks;
        self.peaks.roll_min = self.peaks.roll_min.min(attitude.roll);
        self.peaks.roll_max = self.peaks.roll_max.max(attitude.roll);
        self.peaks.pitch_min = self.peaks.pitch_min.min(attitude.pitch);
        self.peaks.pitch_max = self.peaks.pitch_max.max(attitude.pitch);

        let changed = self.peaks != before;
        self.dirty |= changed;
        changed
    }

    #[inline]
    pub const fn peaks(&self) -> &PeakAngles { &self.peaks }

    #[inline]
    pub const fn is_dirty(&self) -> bool { self.dirty }

    /// Zero all peaks. The reset itself is a change worth saving.
    pub fn reset(&mut self) {
        self.peaks = PeakAngles::ZERO;
        self.dirty = true;
    }

    /// Dirty and at least `interval_ms` since the last save (or never saved).
    pub fn save_due(
        &self,
        now_ms: u64,
        interval_ms: u64,
    ) -> bool {
        self.dirty
            && self
                .last_save_ms
                .is_none_or(|last| now_ms.saturating_sub(last) >= interval_ms)
    }

    /// Record a save attempt. The timer restarts even when the save failed so
    /// a broken store isn't hammered every tick.
    pub fn mark_saved(
        &mut self,
        now_ms: u64,
        succeeded: bool,
    ) {
        self.last_save_ms = Some(now_ms);
        if succeeded {
            self.dirty = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_tracks_signed_extremes() {
        let mut tracker = PeakTracker::default();
        assert!(tracker.update(Attitude::new(10.0, -5.0)));
        assert!(tracker.update(Attitude::new(-20.0, 8.0)));
        assert!(!tracker.update(Attitude::new(5.0, 0.0)));

        let peaks = tracker.peaks();
        assert_eq!(peaks.range(Axis::Roll), (-20.0, 10.0));
        assert_eq!(peaks.range(Axis::Pitch), (-5.0, 8.0));
    }

    #[test]
    fn test_non_finite_samples_ignored() {
        let mut tracker = PeakTracker::default();
        assert!(!tracker.update(Attitude::new(f32::NAN, 3.0)));
        assert_eq!(*tracker.peaks(), PeakAngles::ZERO);
        assert!(!tracker.is_dirty());
    }

    #[test]
    fn test_reset_marks_dirty() {
        let mut tracker = PeakTracker::new(PeakAngles {
            roll_max: 12.0,
            ..PeakAngles::ZERO
        });
        assert!(!tracker.is_dirty());
        tracker.reset();
        assert_eq!(*tracker.peaks(), PeakAngles::ZERO);
        assert!(tracker.is_dirty());
    }

    #[test]
    fn test_save_throttle() {
        let mut tracker = PeakTracker::default();
        assert!(!tracker.save_due(0, 5000), "clean tracker never saves");

        tracker.update(Attitude::new(3.0, 0.0));
        assert!(tracker.save_due(100, 5000), "first save is immediate");
        tracker.mark_saved(100, true);
        assert!(!tracker.is_dirty());

        tracker.update(Attitude::new(4.0, 0.0));
        assert!(!tracker.save_due(2000, 5000));
        assert!(tracker.save_due(5100, 5000));

        // Failed save keeps the data dirty but still waits a full interval
        tracker.mark_saved(5100, false);
        assert!(tracker.is_dirty());
        assert!(!tracker.save_due(6000, 5000));
        assert!(tracker.save_due(10_100, 5000));
    }

    struct FixedStore(Result<PeakAngles, PersistenceFault>);

    impl PeakStore for FixedStore {
        fn load_peaks(&mut self) -> Result<PeakAngles, PersistenceFault> { self.0 }

        fn save_peaks(
            &mut self,
            _peaks: &PeakAngles,
        ) -> Result<(), PersistenceFault> {
            Ok(())
        }
    }

    #[test]
    fn test_load_or_default() {
        let stored = PeakAngles {
            roll_min: -12.0,
            roll_max: f32::NAN,
            ..PeakAngles::ZERO
        };
        let loaded = load_or_default(&mut FixedStore(Ok(stored)));
        assert_eq!(loaded.roll_min, -12.0);
        assert_eq!(loaded.roll_max, 0.0);

        assert_eq!(load_or_default(&mut FixedStore(Err(PersistenceFault::Missing))), PeakAngles::ZERO);
        assert_eq!(load_or_default(&mut FixedStore(Err(PersistenceFault::Corrupt))), PeakAngles::ZERO);
    }

    #[test]
    fn test_sanitized() {
        let stored = PeakAngles {
            roll_min: 4.0,
            roll_max: f32::INFINITY,
            pitch_min: -7.0,
            pitch_max: 9.0,
        };
        assert_eq!(
            stored.sanitized(),
            PeakAngles {
                roll_min: 0.0,
                roll_max: 0.0,
                pitch_min: -7.0,
                pitch_max: 9.0,
            }
        );
    }
}
