//! Centralized alert threshold configuration.
//!
//! All thresholds are compile-time constants with validation assertions, so
//! the alert evaluation, the warning tint and the tests agree on one set of
//! numbers. [`AlertThresholds::DEFAULT`](crate::alert::AlertThresholds::DEFAULT)
//! is built from these values.
//!
//! # Compile-Time Validation
//!
//! Each threshold group includes `const` assertions that verify ordering at
//! compile time. If thresholds are configured incorrectly (e.g.,
//! `CRITICAL_DEG < WARNING_DEG`), compilation fails.

// =============================================================================
// Tilt Thresholds (shared by roll and pitch)
// =============================================================================

/// Tilt where the warning tint starts (strictly greater than).
/// At exactly this angle the warning intensity is zero.
pub const WARNING_DEG: f32 = 30.0;

/// Tilt where the gauge switches to the full-frame critical flash
/// (strictly greater than). At exactly this angle the warning is at full
/// intensity.
pub const CRITICAL_DEG: f32 = 45.0;

// Compile-time validation: thresholds must be in ascending order
const _: () = assert!(0.0 < WARNING_DEG);
const _: () = assert!(WARNING_DEG < CRITICAL_DEG);

// =============================================================================
// Critical Flash
// =============================================================================

/// The critical flash toggles between its two color pairs every half period.
/// 250 ms toggles at ~4 Hz, fast enough to read as an alarm.
pub const CRITICAL_FLASH_HALF_PERIOD_MS: u64 = 250;

const _: () = assert!(CRITICAL_FLASH_HALF_PERIOD_MS > 0);

// =============================================================================
// Warning Tint
// =============================================================================

/// Envelope frequency at zero intensity (just above [`WARNING_DEG`]).
pub const WARNING_FLASH_MIN_HZ: f32 = 1.0;

/// Envelope frequency at full intensity (at [`CRITICAL_DEG`]).
pub const WARNING_FLASH_MAX_HZ: f32 = 10.0;

/// Tint opacity at full intensity and envelope peak.
/// Kept below 1.0 so the dial stays readable under the tint.
pub const WARNING_TINT_MAX_OPACITY: f32 = 0.55;

const _: () = assert!(0.0 < WARNING_FLASH_MIN_HZ);
const _: () = assert!(WARNING_FLASH_MIN_HZ < WARNING_FLASH_MAX_HZ);
const _: () = assert!(0.0 < WARNING_TINT_MAX_OPACITY);
const _: () = assert!(WARNING_TINT_MAX_OPACITY <= 1.0);

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::assertions_on_constants)] // Intentional compile-time validation of threshold ordering
mod tests {
    use super::*;

    #[test]
    fn test_tilt_threshold_ordering() {
        assert!(WARNING_DEG < CRITICAL_DEG);
    }

    #[test]
    fn test_warning_band_width() {
        // 35 degrees sits one third into the band with the default thresholds
        let fraction = (35.0 - WARNING_DEG) / (CRITICAL_DEG - WARNING_DEG);
        assert!((fraction - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_critical_flash_is_about_4hz() {
        let toggles_per_second = 1000 / CRITICAL_FLASH_HALF_PERIOD_MS;
        assert_eq!(toggles_per_second, 4);
    }

    #[test]
    fn test_warning_frequency_range() {
        assert!(WARNING_FLASH_MIN_HZ < WARNING_FLASH_MAX_HZ);
        assert!(WARNING_TINT_MAX_OPACITY <= 1.0);
    }
}
