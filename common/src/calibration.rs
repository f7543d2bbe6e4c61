//! Zero offsets and the calibration persistence seam.
//!
//! The offset is subtracted from every raw sample before smoothing. It is
//! loaded once at startup and only changes through
//! [`Gauge::calibrate`](crate::gauge::Gauge::calibrate), which folds the
//! current display attitude into it so the gauge reads zero afterwards.
//!
//! Storage is best-effort: a failed load falls back to zero offsets and a
//! failed save is logged. Neither ever stops the gauge.

use tracing::{info, warn};

use crate::error::PersistenceFault;
use crate::smoother::Attitude;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationOffset {
    pub roll_offset: f32,
    pub pitch_offset: f32,
}

impl CalibrationOffset {
    pub const ZERO: Self = Self {
        roll_offset: 0.0,
        pitch_offset: 0.0,
    };

    #[inline]
    pub const fn new(
        roll_offset: f32,
        pitch_offset: f32,
    ) -> Self {
        Self {
            roll_offset,
            pitch_offset,
        }
    }

    /// Offset-corrected target for the smoother.
    #[inline]
    pub fn apply(
        self,
        raw: Attitude,
    ) -> Attitude {
        Attitude::new(raw.roll - self.roll_offset, raw.pitch - self.pitch_offset)
    }

    /// New offset under which `display` would read as zero.
    #[inline]
    #[must_use]
    pub fn absorb(
        self,
        display: Attitude,
    ) -> Self {
        Self::new(self.roll_offset + display.roll, self.pitch_offset + display.pitch)
    }

    #[inline]
    pub fn is_finite(self) -> bool { self.roll_offset.is_finite() && self.pitch_offset.is_finite() }
}

/// Key-value persistence for the calibration offset.
pub trait CalibrationStore {
    fn load(&mut self) -> Result<CalibrationOffset, PersistenceFault>;

    fn save(
        &mut self,
        offset: &CalibrationOffset,
    ) -> Result<(), PersistenceFault>;
}

/// Load the stored offset, or zero offsets if nothing usable is stored.
pub fn load_or_default<S>(store: &mut S) -> CalibrationOffset
where
    S: CalibrationStore + ?Sized,
{
    match store.load() {
        Ok(offset) if offset.is_finite() => {
            info!(roll = offset.roll_offset, pitch = offset.pitch_offset, "loaded calibration");
            offset
        }
        Ok(_) => {
            warn!("stored calibration is not finite, using zero offsets");
            CalibrationOffset::ZERO
        }
        Err(PersistenceFault::Missing) => {
            info!("no stored calibration, using zero offsets");
            CalibrationOffset::ZERO
        }
        Err(fault) => {
            warn!(%fault, "failed to load calibration, using zero offsets");
            CalibrationOffset::ZERO
        }
    }
}

/// Save the offset, logging instead of failing.
pub fn save_best_effort<S>(
    store: &mut S,
    offset: &CalibrationOffset,
) -> bool
where
    S: CalibrationStore + ?Sized,
{
    match store.save(offset) {
        Ok(()) => true,
        Err(fault) => {
            warn!(%fault, "failed to save calibration");
            false
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// In-memory store with switchable failures.
    #[derive(Default)]
    pub struct MemoryStore {
        pub stored: Option<CalibrationOffset>,
        pub fail_load: Option<PersistenceFault>,
        pub fail_save: bool,
        pub saves: usize,
    }

    impl CalibrationStore for MemoryStore {
        fn load(&mut self) -> Result<CalibrationOffset, PersistenceFault> {
            if let Some(fault) = self.fail_load {
                return Err(fault);
            }
            self.stored.ok_or(PersistenceFault::Missing)
        }

        fn save(
            &mut self,
            offset: &CalibrationOffset,
        ) -> Result<(), PersistenceFault> {
            if self.fail_save {
                return Err(PersistenceFault::Io);
            }
            self.saves += 1;
            self.stored = Some(*offset);
            Ok(())
        }
    }

    #[test]
    fn test_apply_subtracts_offset() {
        let offset = CalibrationOffset::new(2.0, -3.0);
        assert_eq!(offset.apply(Attitude::new(10.0, 10.0)), Attitude::new(8.0, 13.0));
    }

    #[test]
    fn test_absorb_zeroes_current_display() {
        let offset = CalibrationOffset::new(1.0, 1.0);
        let display = Attitude::new(4.0, -2.0);
        let raw = Attitude::new(5.0, -1.0);
        assert_eq!(offset.apply(raw), display);

        let new_offset = offset.absorb(display);
        assert_eq!(new_offset.apply(raw), Attitude::ZERO);
    }

    #[test]
    fn test_load_or_default() {
        let mut store = MemoryStore {
            stored: Some(CalibrationOffset::new(1.5, -0.5)),
            ..MemoryStore::default()
        };
        assert_eq!(load_or_default(&mut store), CalibrationOffset::new(1.5, -0.5));

        let mut empty = MemoryStore::default();
        assert_eq!(load_or_default(&mut empty), CalibrationOffset::ZERO);

        let mut broken = MemoryStore {
            stored: Some(CalibrationOffset::new(1.5, -0.5)),
            fail_load: Some(PersistenceFault::Corrupt),
            ..MemoryStore::default()
        };
        assert_eq!(load_or_default(&mut broken), CalibrationOffset::ZERO);

        let mut nan = MemoryStore {
            stored: Some(CalibrationOffset::new(f32::NAN, 0.0)),
            ..MemoryStore::default()
        };
        assert_eq!(load_or_default(&mut nan), CalibrationOffset::ZERO);
    }

    #[test]
    fn test_save_best_effort() {
        let mut store = MemoryStore::default();
        assert!(save_best_effort(&mut store, &CalibrationOffset::new(1.0, 2.0)));
        assert_eq!(store.stored, Some(CalibrationOffset::new(1.0, 2.0)));

        store.fail_save = true;
        assert!(!save_best_effort(&mut store, &CalibrationOffset::ZERO));
        assert_eq!(store.stored, Some(CalibrationOffset::new(1.0, 2.0)));
    }
}
