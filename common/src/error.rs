//! Error taxonomy for the gauge.
//!
//! | Error              | Severity  | Handling                                   |
//! |--------------------|-----------|--------------------------------------------|
//! | [`SensorFault`]    | transient | skip the update, keep the previous angle   |
//! | [`PersistenceFault`] | non-fatal | log, fall back to defaults               |
//! | [`SinkFault`]      | fatal     | propagate, the display is misconfigured    |
//! | [`ConfigError`]    | fatal     | rejected when the gauge is constructed     |
//!
//! Out-of-range angles are never errors; they are clamped where they are used.

use thiserror::Error;

/// The attitude sensor could not produce a sample this tick.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorFault {
    #[error("sensor bus transfer failed")]
    Bus,
    #[error("sensor has no sample ready")]
    NotReady,
    #[error("sensor produced a non-finite sample")]
    NonFinite,
}

/// Loading or saving calibration data failed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PersistenceFault {
    #[error("no stored value")]
    Missing,
    #[error("stored value could not be decoded")]
    Corrupt,
    #[error("storage I/O failed")]
    Io,
}

/// The display refused a frame.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SinkFault {
    #[error("frame is {actual_width}x{actual_height}, display expects {expected_width}x{expected_height}")]
    SizeMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },
    #[error("frame buffer holds {actual} bytes, expected {expected}")]
    BufferLength { expected: usize, actual: usize },
    #[error("display is no longer available")]
    Disconnected,
}

/// Invalid static configuration.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    #[error("display size must be non-zero")]
    ZeroSize,
    #[error("smoothing factor must be in (0, 1]")]
    SmoothingOutOfRange,
    #[error("warning threshold must be positive and below the critical threshold")]
    ThresholdOrder,
    #[error("warning tint opacity must be in (0, 1]")]
    TintOpacity,
    #[error("warning flash frequencies must be positive and ascending")]
    FlashFrequency,
    #[error("critical flash half period must be non-zero")]
    FlashPeriod,
    #[error("sprite angle range is empty")]
    EmptySpriteRange,
}
