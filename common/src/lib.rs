//! Rendering core for the round-display roll/pitch inclinometer.
//!
//! This crate contains the platform-agnostic part of the gauge, shared between
//! the desktop simulator and embedded targets:
//!
//! - [`smoother`]: exponential angle smoothing and the [`Attitude`] value type
//! - [`calibration`]: zero offsets and the calibration persistence seam
//! - [`sprites`]: pre-rotated vehicle silhouettes, one per integer degree
//! - [`backdrop`]: the static tick scale, built once
//! - [`alert`]: Normal / Warning / Critical evaluation and flash timing
//! - [`composer`]: assembles a finished [`Frame`] from all of the above
//! - [`gauge`]: the per-tick glue (read, correct, smooth, render, push)
//!
//! # no_std Compatibility
//!
//! The crate is `no_std` + `alloc`. Time is passed in as milliseconds so there
//! is no dependency on `std::time` or a particular executor. Trigonometry goes
//! through `micromath`.

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

extern crate alloc;

pub mod alert;
pub mod backdrop;
pub mod calibration;
pub mod colors;
pub mod composer;
pub mod config;
pub mod error;
pub mod frame;
pub mod gauge;
pub mod geometry;
mod math;
pub mod peaks;
pub mod raster;
pub mod smoother;
pub mod sprites;
pub mod styles;
pub mod thresholds;
pub mod widgets;

// Re-export commonly used items
pub use alert::{AlertState, AlertThresholds, AxisSet};
pub use calibration::{CalibrationOffset, CalibrationStore};
pub use composer::FrameComposer;
pub use config::GaugeConfig;
pub use error::{ConfigError, PersistenceFault, SensorFault, SinkFault};
pub use frame::{DisplaySink, Frame};
pub use gauge::{AttitudeSensor, Gauge, TickOutcome};
pub use geometry::Axis;
pub use peaks::{PeakAngles, PeakStore, PeakTracker};
pub use smoother::{AngleSmoother, Attitude};
pub use sprites::{SpriteCache, SpriteView};
