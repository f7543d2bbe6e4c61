//! Gauge configuration and layout constants.
//!
//! # Reference Geometry
//!
//! All layout constants are expressed in *design units* on a 466-unit round
//! dial (the largest panel the gauge was laid out for). At runtime they are
//! multiplied by [`GaugeConfig::scale`], so the same pipeline renders a 240px
//! panel, a 466px panel or anything in between. Bitmap fonts are the only
//! thing that does not scale.
//!
//! ```text
//!                 ┌──────────── 466 ────────────┐
//!                 │        rear (roll) sprite    │  y = -80
//!   roll scale ─▶ │  -75,-25 "12°"   "3°" 75,-25 │ ◀─ pitch scale
//!   (9 o'clock)   │  -75,+25 ROLL   PITCH 75,+25 │    (3 o'clock)
//!                 │        side (pitch) sprite   │  y = +100
//!                 └──────────────────────────────┘
//! ```

use embedded_graphics::prelude::*;

use crate::alert::AlertThresholds;
use crate::error::ConfigError;

// =============================================================================
// Display Configuration
// =============================================================================

/// Side length of the reference dial all layout constants are designed on.
pub const REFERENCE_SIZE: f32 = 466.0;

/// Default panel: 1.28" round GC9A01, 240x240.
pub const DEFAULT_SIZE: u32 = 240;

/// Default smoothing factor. 0.3 settles within ~10 ticks without visible lag.
pub const DEFAULT_SMOOTHING_ALPHA: f32 = 0.3;

/// Smallest accepted smoothing factor (1 %).
pub const MIN_SMOOTHING_ALPHA: f32 = 0.01;

// =============================================================================
// Scale Layout (design units)
// =============================================================================

/// Scale spans +/- this many degrees around each arc's center.
pub const SCALE_HALF_SPAN_DEG: i32 = 40;

/// Degrees between minor ticks.
pub const MINOR_TICK_STEP_DEG: i32 = 5;

/// Degrees between major (labelled) ticks.
pub const MAJOR_TICK_STEP_DEG: i32 = 10;

/// Major ticks beyond this offset are drawn but not labelled.
pub const LABEL_LIMIT_DEG: i32 = 30;

const _: () = assert!(MAJOR_TICK_STEP_DEG % MINOR_TICK_STEP_DEG == 0);
const _: () = assert!(LABEL_LIMIT_DEG <= SCALE_HALF_SPAN_DEG);

pub const TICK_OUTER_RADIUS: f32 = 230.0;
pub const MAJOR_TICK_INNER_RADIUS: f32 = 200.0;
pub const MINOR_TICK_INNER_RADIUS: f32 = 215.0;
pub const NUMERAL_RADIUS: f32 = 175.0;
pub const MAJOR_TICK_WIDTH: f32 = 4.0;
pub const MINOR_TICK_WIDTH: f32 = 2.0;
pub const DIAL_ARC_RADIUS: f32 = 231.0;

// =============================================================================
// Pointer & Markers (design units)
// =============================================================================

/// Pointer tip sits just inside the major ticks and points outward.
pub const POINTER_TIP_RADIUS: f32 = 210.0;
pub const POINTER_LENGTH: f32 = 30.0;
pub const POINTER_BASE_WIDTH: f32 = 20.0;

pub const PEAK_MARKER_RADIUS: f32 = 195.0;
pub const PEAK_MARKER_DIAMETER: f32 = 10.0;

/// Peak markers are pinned to the scale ends beyond this angle.
pub const PEAK_MARKER_LIMIT_DEG: f32 = 45.0;

// =============================================================================
// Center Cluster (design units, relative to the dial center)
// =============================================================================

pub const READOUT_OFFSET_X: f32 = 75.0;
pub const READOUT_OFFSET_Y: f32 = -25.0;
pub const AXIS_LABEL_OFFSET_Y: f32 = 25.0;

/// Rear view (roll) sits in the upper half.
pub const REAR_SPRITE_OFFSET_Y: f32 = -80.0;

/// Side view (pitch) sits in the lower half.
pub const SIDE_SPRITE_OFFSET_Y: f32 = 100.0;

/// Sprites are drawn on a 64-unit grid and shown 1.25x larger.
pub const SPRITE_ZOOM: f32 = 1.25;

// =============================================================================
// Gauge Configuration
// =============================================================================

/// Runtime configuration of one gauge instance.
///
/// Construct from [`GaugeConfig::DEFAULT`] and adjust with the `with_*`
/// builders; [`Gauge::new`](crate::gauge::Gauge::new) calls [`validate`]
/// before building any caches.
///
/// [`validate`]: GaugeConfig::validate
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaugeConfig {
    /// Panel width and height in pixels (the panel is round, so square).
    pub size: u32,
    /// Exponential smoothing factor in (0, 1]. 1.0 disables smoothing.
    pub smoothing_alpha: f32,
    pub thresholds: AlertThresholds,
    /// Inclusive sprite cache range in whole degrees.
    pub sprite_min_deg: i32,
    pub sprite_max_deg: i32,
    /// How long the "CALIBRATING..." banner stays up after a calibration.
    pub calibration_banner_ms: u64,
    /// Minimum time between two peak saves.
    pub peak_save_interval_ms: u64,
}

impl GaugeConfig {
    pub const DEFAULT: Self = Self {
        size: DEFAULT_SIZE,
        smoothing_alpha: DEFAULT_SMOOTHING_ALPHA,
        thresholds: AlertThresholds::DEFAULT,
        sprite_min_deg: -45,
        sprite_max_deg: 45,
        calibration_banner_ms: 2000,
        peak_save_interval_ms: 5000,
    };

    #[must_use]
    pub const fn with_size(
        mut self,
        size: u32,
    ) -> Self {
        self.size = size;
        self
    }

    /// Set smoothing as a percentage: 100 follows the sensor directly, 1 is
    /// the heaviest smoothing. Values outside 1..=100 are clamped.
    #[must_use]
    pub fn with_smoothing_percent(
        mut self,
        percent: u8,
    ) -> Self {
        self.smoothing_alpha = f32::from(percent.clamp(1, 100)) / 100.0;
        self
    }

    #[must_use]
    pub const fn with_thresholds(
        mut self,
        thresholds: AlertThresholds,
    ) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::ZeroSize);
        }
        // Written as a negated range check so NaN is rejected too
        if !(self.smoothing_alpha >= MIN_SMOOTHING_ALPHA && self.smoothing_alpha <= 1.0) {
            return Err(ConfigError::SmoothingOutOfRange);
        }
        if self.sprite_min_deg > self.sprite_max_deg {
            return Err(ConfigError::EmptySpriteRange);
        }
        self.thresholds.validate()
    }

    /// Pixels per design unit.
    #[inline]
    pub fn scale(&self) -> f32 { self.size as f32 / REFERENCE_SIZE }

    /// Dial center in pixels.
    #[inline]
    pub const fn center(&self) -> Point {
        let half = (self.size / 2) as i32;
        Point::new(half, half)
    }

    /// Dial center in pixels as floats, for sub-pixel geometry.
    #[inline]
    pub fn center_f(&self) -> (f32, f32) {
        let half = self.size as f32 / 2.0;
        (half, half)
    }

    /// Convert an offset from the dial center in design units to a pixel.
    pub fn design_point(
        &self,
        dx: f32,
        dy: f32,
    ) -> Point {
        let (cx, cy) = self.center_f();
        let scale = self.scale();
        Point::new(
            crate::math::round(cx + dx * scale) as i32,
            crate::math::round(cy + dy * scale) as i32,
        )
    }

    pub const fn frame_size(&self) -> Size { Size::new(self.size, self.size) }
}

impl Default for GaugeConfig {
    fn default() -> Self { Self::DEFAULT }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(GaugeConfig::DEFAULT.validate(), Ok(()));
    }

    #[test]
    fn test_zero_size_rejected() {
        let config = GaugeConfig::DEFAULT.with_size(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroSize));
    }

    #[test]
    fn test_smoothing_alpha_bounds() {
        let mut config = GaugeConfig::DEFAULT;
        config.smoothing_alpha = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::SmoothingOutOfRange));
        config.smoothing_alpha = 1.5;
        assert_eq!(config.validate(), Err(ConfigError::SmoothingOutOfRange));
        config.smoothing_alpha = f32::NAN;
        assert_eq!(config.validate(), Err(ConfigError::SmoothingOutOfRange));
        config.smoothing_alpha = 1.0;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_smoothing_percent_is_clamped() {
        assert!((GaugeConfig::DEFAULT.with_smoothing_percent(0).smoothing_alpha - 0.01).abs() < 1e-6);
        assert!((GaugeConfig::DEFAULT.with_smoothing_percent(40).smoothing_alpha - 0.4).abs() < 1e-6);
        assert!((GaugeConfig::DEFAULT.with_smoothing_percent(250).smoothing_alpha - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_sprite_range_rejected() {
        let mut config = GaugeConfig::DEFAULT;
        config.sprite_min_deg = 10;
        config.sprite_max_deg = -10;
        assert_eq!(config.validate(), Err(ConfigError::EmptySpriteRange));
    }

    #[test]
    fn test_scale_and_center() {
        let config = GaugeConfig::DEFAULT.with_size(466);
        assert!((config.scale() - 1.0).abs() < 1e-6);
        assert_eq!(config.center(), Point::new(233, 233));

        let small = GaugeConfig::DEFAULT;
        assert_eq!(small.center(), Point::new(120, 120));
        assert_eq!(small.design_point(0.0, 0.0), Point::new(120, 120));
        // 75 design units on a 240px panel is ~38.6px
        assert_eq!(small.design_point(-75.0, 0.0), Point::new(81, 120));
    }
}
