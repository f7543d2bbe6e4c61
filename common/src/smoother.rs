//! Exponential smoothing of the measured attitude.
//!
//! ```text
//! display += (target - display) * alpha
//! ```
//!
//! With `alpha` in (0, 1] the displayed value approaches a held target
//! monotonically and never overshoots it. `alpha = 1.0` follows the sensor
//! directly. No clamping happens here; the dial, sprite cache and alert
//! evaluation each clamp or saturate where they need to.

use crate::config::MIN_SMOOTHING_ALPHA;

/// Roll and pitch in degrees, signed.
///
/// Used for raw sensor samples, offset-corrected targets and the smoothed
/// display angle alike.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Attitude {
    pub roll: f32,
    pub pitch: f32,
}

impl Attitude {
    pub const ZERO: Self = Self { roll: 0.0, pitch: 0.0 };

    #[inline]
    pub const fn new(
        roll: f32,
        pitch: f32,
    ) -> Self {
        Self { roll, pitch }
    }

    #[inline]
    pub const fn get(
        self,
        axis: crate::geometry::Axis,
    ) -> f32 {
        match axis {
            crate::geometry::Axis::Roll => self.roll,
            crate::geometry::Axis::Pitch => self.pitch,
        }
    }

    #[inline]
    pub fn is_finite(self) -> bool { self.roll.is_finite() && self.pitch.is_finite() }
}

/// Owns the single displayed attitude.
#[derive(Clone, Debug)]
pub struct AngleSmoother {
    alpha: f32,
    current: Attitude,
}

impl AngleSmoother {
    /// Create a smoother starting at zero. `alpha` is forced into
    /// `[MIN_SMOOTHING_ALPHA, 1.0]`; NaN falls back to 1.0.
    pub fn new(alpha: f32) -> Self {
        let alpha = if alpha.is_nan() {
            1.0
        } else {
            alpha.clamp(MIN_SMOOTHING_ALPHA, 1.0)
        };
        Self {
            alpha,
            current: Attitude::ZERO,
        }
    }

    /// Smoothing as a percentage (1..=100), as exposed on the device menu.
    pub fn from_percent(percent: u8) -> Self { Self::new(f32::from(percent.clamp(1, 100)) / 100.0) }

    /// Step toward `target` and return the new display attitude.
    pub fn update(
        &mut self,
        target: Attitude,
    ) -> Attitude {
        self.current.roll += (target.roll - self.current.roll) * self.alpha;
        self.current.pitch += (target.pitch - self.current.pitch) * self.alpha;
        self.current
    }

    #[inline]
    pub const fn current(&self) -> Attitude { self.current }

    #[inline]
    pub const fn alpha(&self) -> f32 { self.alpha }

    /// Jump back to zero, used after calibration.
    pub fn reset(&mut self) { self.current = Attitude::ZERO; }
}
