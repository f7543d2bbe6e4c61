// Crate-level lints: Allow common embedded/graphics patterns that pedantic lints flag
#![allow(clippy::cast_possible_truncation)] // Intentional u128->u64/u32 casts for timings
#![allow(clippy::cast_precision_loss)] // u32->f32 for FPS

//! Desktop simulator for the round-display roll/pitch inclinometer.
//!
//! Runs the [`inclinometer_common::Gauge`] against a sweeping simulated
//! sensor and presents frames in an `embedded-graphics-simulator` window.
//! Calibration and peak values persist in a JSON file between runs.
//!
//! # Controls
//!
//! | Key | Action |
//! |-----|--------|
//! | `C` | Calibrate: the current attitude becomes zero |
//! | `R` | Reset peak markers |
//! | `Space` | Pause / resume the sweep |
//! | Arrows | Nudge roll (left/right) and pitch (up/down) |
//!
//! Key repeat is honored for the arrows only, so holding `C` doesn't
//! recalibrate every frame.
//!
//! # Logging
//!
//! Uses `tracing` with an env filter: `RUST_LOG=debug` shows cache builds
//! and settings writes, the default `info` shows alert transitions,
//! calibrations and frame stats once per second.
//!
//! # Settings
//!
//! Stored in `inclinometer-settings.json` in the working directory, or
//! wherever `INCLINOMETER_SETTINGS` points.

mod config;
mod profiling;
mod sensor;
mod sink;
mod storage;

use std::process::ExitCode;
use std::thread;
use std::time::Instant;

use config::{
    FAULT_EVERY_N_READS,
    FRAME_TIME,
    NUDGE_STEP_DEG,
    PANEL_SIZE,
    SMOOTHING_PERCENT,
    STATS_INTERVAL,
    WINDOW_SCALE,
    WINDOW_TITLE,
};
use embedded_graphics_simulator::SimulatorEvent;
use embedded_graphics_simulator::sdl2::Keycode;
use inclinometer_common::{Gauge, GaugeConfig, PeakStore, calibration, peaks};
use profiling::FrameStats;
use sensor::SweepSensor;
use sink::SimulatorSink;
use storage::JsonFileStore;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // ==========================================================================
    // Startup: settings, caches, window
    // ==========================================================================

    let mut store = JsonFileStore::new(config::settings_path());
    info!(path = %store.path().display(), "settings file");
    let offset = calibration::load_or_default(&mut store);
    let stored_peaks = peaks::load_or_default(&mut store);

    let gauge_config = GaugeConfig::DEFAULT
        .with_size(PANEL_SIZE)
        .with_smoothing_percent(SMOOTHING_PERCENT);

    let build_start = Instant::now();
    let mut gauge = match Gauge::new(gauge_config, offset, stored_peaks) {
        Ok(gauge) => gauge,
        Err(err) => {
            error!(%err, "invalid gauge configuration");
            return ExitCode::FAILURE;
        }
    };
    info!(
        sprites = gauge.composer().sprites().len(),
        elapsed_ms = build_start.elapsed().as_millis() as u64,
        "caches built"
    );

    let mut sink = SimulatorSink::new(PANEL_SIZE, WINDOW_SCALE, WINDOW_TITLE);
    if let Err(fault) = gauge.check_sink(&sink) {
        error!(%fault, "display does not match gauge size");
        return ExitCode::FAILURE;
    }

    let mut sensor = SweepSensor::new(FAULT_EVERY_N_READS);
    let mut stats = FrameStats::new();
    let clock = Instant::now();

    // ==========================================================================
    // Main Loop
    // ==========================================================================

    let exit = 'frames: loop {
        let frame_start = Instant::now();
        let now_ms = clock.elapsed().as_millis() as u64;

        match gauge.tick(&mut sensor, &mut sink, now_ms) {
            Ok(outcome) => {
                if outcome.sensor_fault.is_some() {
                    stats.record_fault();
                }
            }
            Err(fault) => {
                error!(%fault, "display failed");
                break ExitCode::FAILURE;
            }
        }
        gauge.persist_peaks(&mut store, now_ms);

        let render_time = frame_start.elapsed();

        // Events are only available once the window has been shown, i.e.
        // after the first tick
        for ev in sink.events() {
            match ev {
                SimulatorEvent::Quit => break 'frames ExitCode::SUCCESS,
                SimulatorEvent::KeyDown { keycode, repeat, .. } => match keycode {
                    Keycode::C if !repeat => gauge.calibrate(&mut store, now_ms),
                    Keycode::R if !repeat => gauge.reset_peaks(),
                    Keycode::Space if !repeat => {
                        let paused = sensor.toggle_pause();
                        info!(paused, "sweep");
                    }
                    Keycode::Left => sensor.nudge(-NUDGE_STEP_DEG, 0.0),
                    Keycode::Right => sensor.nudge(NUDGE_STEP_DEG, 0.0),
                    Keycode::Up => sensor.nudge(0.0, NUDGE_STEP_DEG),
                    Keycode::Down => sensor.nudge(0.0, -NUDGE_STEP_DEG),
                    _ => {}
                },
                _ => {}
            }
        }

        // Sleep to maintain target frame rate
        if let Some(remaining) = FRAME_TIME.checked_sub(frame_start.elapsed()) {
            thread::sleep(remaining);
        }

        stats.record_frame(frame_start.elapsed(), render_time);
        stats.report_if_due(STATS_INTERVAL);
    };

    // Throttling may have held back the latest peaks
    if let Err(fault) = store.save_peaks(gauge.peaks()) {
        warn!(%fault, "failed to save peaks on exit");
    }
    info!(frames = stats.total_frames, "shutting down");
    exit
}
