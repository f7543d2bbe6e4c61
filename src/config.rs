//! Simulator configuration constants.
//!
//! Gauge geometry and thresholds live in [`inclinometer_common::GaugeConfig`];
//! this module only holds what is specific to the desktop host.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

// =============================================================================
// Display Configuration
// =============================================================================

/// Panel side in pixels (round 240x240 module).
pub const PANEL_SIZE: u32 = 240;

/// Window pixels per panel pixel.
pub const WINDOW_SCALE: u32 = 2;

pub const WINDOW_TITLE: &str = "Inclinometer Sim";

// =============================================================================
// Timing Configuration
// =============================================================================

/// Target frame time (~30 FPS). The main loop sleeps if a frame completes early.
pub const FRAME_TIME: Duration = Duration::from_millis(33);

/// How often frame statistics are logged.
pub const STATS_INTERVAL: Duration = Duration::from_secs(1);

// =============================================================================
// Gauge Tuning
// =============================================================================

/// Smoothing strength in percent of the remaining gap closed per tick.
pub const SMOOTHING_PERCENT: u8 = 30;

// =============================================================================
// Simulated Sensor
// =============================================================================

/// Every Nth read fails with a bus fault.
pub const FAULT_EVERY_N_READS: u32 = 150;

/// Degrees added per arrow key press.
pub const NUDGE_STEP_DEG: f32 = 2.5;

// =============================================================================
// Persistence
// =============================================================================

/// Environment variable overriding [`DEFAULT_SETTINGS_FILE`].
pub const SETTINGS_ENV: &str = "INCLINOMETER_SETTINGS";

pub const DEFAULT_SETTINGS_FILE: &str = "inclinometer-settings.json";

/// Settings file path, `INCLINOMETER_SETTINGS` wins when set and non-empty.
pub fn settings_path() -> PathBuf {
    env::var_os(SETTINGS_ENV)
        .filter(|value| !value.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE), PathBuf::from)
}
