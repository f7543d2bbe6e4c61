//! Alert evaluation: Normal, Warning(intensity) or Critical(axes).
//!
//! The state is recomputed from scratch every tick from the display attitude
//! and the current time. There is no hysteresis and nothing is stored, so
//! the same inputs always give the same state and the same flash phase.
//!
//! ```text
//!  max(|roll|, |pitch|)
//!  ──────────────┬──────────────────────┬──────────────▶
//!     Normal     │  Warning(0 ─▶ 1)     │  Critical
//!              T_warn                 T_crit
//! ```
//!
//! # Critical
//!
//! Full-frame flash between (red background, white text) and (black
//! background, red text), toggling every half period (~4 Hz). The phase is
//! derived from the clock so it stays steady regardless of frame rate.
//!
//! # Warning
//!
//! The normal dial with a red tint laid over it. The tint alpha is
//! `intensity * max_opacity * envelope(t)`, where the envelope is a raised
//! sine whose frequency climbs linearly with intensity (1 Hz to 10 Hz by
//! default): the closer to critical, the faster the pulse.

use core::f32::consts::TAU;

use embedded_graphics::pixelcolor::Rgb888;

use crate::colors::{BLACK, RED, WHITE};
use crate::error::ConfigError;
use crate::geometry::Axis;
use crate::math;
use crate::smoother::Attitude;
use crate::thresholds::{
    CRITICAL_DEG,
    CRITICAL_FLASH_HALF_PERIOD_MS,
    WARNING_DEG,
    WARNING_FLASH_MAX_HZ,
    WARNING_FLASH_MIN_HZ,
    WARNING_TINT_MAX_OPACITY,
};

// =============================================================================
// Thresholds
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlertThresholds {
    pub warning_deg: f32,
    pub critical_deg: f32,
    pub max_tint_opacity: f32,
    pub warning_min_hz: f32,
    pub warning_max_hz: f32,
    pub critical_half_period_ms: u64,
}

impl AlertThresholds {
    pub const DEFAULT: Self = Self {
        warning_deg: WARNING_DEG,
        critical_deg: CRITICAL_DEG,
        max_tint_opacity: WARNING_TINT_MAX_OPACITY,
        warning_min_hz: WARNING_FLASH_MIN_HZ,
        warning_max_hz: WARNING_FLASH_MAX_HZ,
        critical_half_period_ms: CRITICAL_FLASH_HALF_PERIOD_MS,
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.warning_deg > 0.0 && self.warning_deg < self.critical_deg) {
            return Err(ConfigError::ThresholdOrder);
        }
        if !(self.max_tint_opacity > 0.0 && self.max_tint_opacity <= 1.0) {
            return Err(ConfigError::TintOpacity);
        }
        if !(self.warning_min_hz > 0.0 && self.warning_min_hz <= self.warning_max_hz) {
            return Err(ConfigError::FlashFrequency);
        }
        if self.critical_half_period_ms == 0 {
            return Err(ConfigError::FlashPeriod);
        }
        Ok(())
    }
}

impl Default for AlertThresholds {
    fn default() -> Self { Self::DEFAULT }
}

// =============================================================================
// State
// =============================================================================

/// Which axes are over the critical threshold. At least one is set whenever
/// this appears in [`AlertState::Critical`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisSet {
    pub roll: bool,
    pub pitch: bool,
}

impl AxisSet {
    #[inline]
    pub const fn contains(
        self,
        axis: Axis,
    ) -> bool {
        match axis {
            Axis::Roll => self.roll,
            Axis::Pitch => self.pitch,
        }
    }

    /// Axis name(s) for the critical screen.
    pub const fn label(self) -> &'static str {
        match (self.roll, self.pitch) {
            (true, true) => "PITCH / ROLL",
            (false, true) => "PITCH",
            _ => "ROLL",
        }
    }
}

/// Warning severity; `intensity` is in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Warning {
    intensity: f32,
}

impl Warning {
    #[inline]
    pub const fn intensity(self) -> f32 { self.intensity }

    /// Tint opacity at the top of the envelope.
    #[inline]
    pub fn peak_opacity(
        self,
        thresholds: &AlertThresholds,
    ) -> f32 {
        self.intensity * thresholds.max_tint_opacity
    }

    /// Envelope frequency in Hz.
    #[inline]
    pub fn flash_hz(
        self,
        thresholds: &AlertThresholds,
    ) -> f32 {
        thresholds.warning_min_hz + self.intensity * (thresholds.warning_max_hz - thresholds.warning_min_hz)
    }

    /// Raised sine in [0, 1] at `now_ms`.
    pub fn envelope(
        self,
        now_ms: u64,
        thresholds: &AlertThresholds,
    ) -> f32 {
        // f64 keeps the phase exact for long uptimes; f32 ms runs out of
        // mantissa after a few hours
        let cycles = now_ms as f64 * f64::from(self.flash_hz(thresholds)) / 1000.0;
        let phase = (cycles % 1.0) as f32;
        ((math::sin(TAU * phase) + 1.0) / 2.0).clamp(0.0, 1.0)
    }

    /// Final tint alpha for this frame.
    pub fn tint_alpha(
        self,
        now_ms: u64,
        thresholds: &AlertThresholds,
    ) -> f32 {
        self.peak_opacity(thresholds) * self.envelope(now_ms, thresholds)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertState {
    Normal,
    Warning(Warning),
    Critical(AxisSet),
}

impl AlertState {
    #[inline]
    pub const fn is_critical(&self) -> bool { matches!(self, Self::Critical(_)) }
}

/// Classify a display attitude.
///
/// Critical iff either axis exceeds `critical_deg`; Warning iff the larger
/// magnitude exceeds `warning_deg` but not `critical_deg`; Normal otherwise.
/// NaN compares false everywhere and therefore reads as Normal.
pub fn evaluate(
    attitude: Attitude,
    thresholds: &AlertThresholds,
) -> AlertState {
    let roll = math::abs(attitude.roll);
    let pitch = math::abs(attitude.pitch);

    let critical = AxisSet {
        roll: roll > thresholds.critical_deg,
        pitch: pitch > thresholds.critical_deg,
    };
    if critical.roll || critical.pitch {
        return AlertState::Critical(critical);
    }

    let max = roll.max(pitch);
    if max > thresholds.warning_deg {
        let intensity =
            ((max - thresholds.warning_deg) / (thresholds.critical_deg - thresholds.warning_deg)).clamp(0.0, 1.0);
        return AlertState::Warning(Warning { intensity });
    }

    AlertState::Normal
}

// =============================================================================
// Critical Flash
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlashPhase {
    /// Red background, white text.
    Lit,
    /// Black background, red text.
    Dark,
}

impl FlashPhase {
    /// Phase at `now_ms`: toggles every `half_period_ms`.
    pub const fn at(
        now_ms: u64,
        half_period_ms: u64,
    ) -> Self {
        if half_period_ms == 0 || (now_ms / half_period_ms) % 2 == 0 {
            Self::Lit
        } else {
            Self::Dark
        }
    }

    pub const fn background(self) -> Rgb888 {
        match self {
            Self::Lit => RED,
            Self::Dark => BLACK,
        }
    }

    pub const fn text(self) -> Rgb888 {
        match self {
            Self::Lit => WHITE,
            Self::Dark => RED,
        }
    }
}
