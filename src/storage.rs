//! JSON settings file backing both persistence seams.
//!
//! One file holds the calibration offset and the peak values:
//!
//! ```json
//! {
//!   "calibration": { "roll_offset": 1.5, "pitch_offset": -0.4 },
//!   "peaks": { "roll_min": -12.0, "roll_max": 30.5, "pitch_min": -4.0, "pitch_max": 8.0 }
//! }
//! ```
//!
//! Saving one half keeps the other. Writes go to a sibling temp file first
//! and are renamed into place, so a crash mid-write leaves the old file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use inclinometer_common::{CalibrationOffset, CalibrationStore, PeakAngles, PeakStore, PersistenceFault};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    calibration: Option<CalibrationOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    peaks: Option<PeakAngles>,
}

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    #[inline]
    pub fn path(&self) -> &Path { &self.path }

    fn read(&self) -> Result<Settings, PersistenceFault> {
        let text = fs::read_to_string(&self.path).map_err(io_fault)?;
        serde_json::from_str(&text).map_err(|_| PersistenceFault::Corrupt)
    }

    /// Current settings for a read-modify-write. A missing or corrupt file
    /// starts over from empty rather than blocking the save.
    fn read_for_update(&self) -> Result<Settings, PersistenceFault> {
        match self.read() {
            Ok(settings) => Ok(settings),
            Err(PersistenceFault::Missing | PersistenceFault::Corrupt) => Ok(Settings::default()),
            Err(fault) => Err(fault),
        }
    }

    fn write(
        &self,
        settings: &Settings,
    ) -> Result<(), PersistenceFault> {
        let text = serde_json::to_string_pretty(settings).map_err(|_| PersistenceFault::Io)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text).map_err(io_fault)?;
        fs::rename(&tmp, &self.path).map_err(io_fault)?;
        debug!(path = %self.path.display(), "settings written");
        Ok(())
    }
}

fn io_fault(err: io::Error) -> PersistenceFault {
    match err.kind() {
        io::ErrorKind::NotFound => PersistenceFault::Missing,
        io::ErrorKind::InvalidData => PersistenceFault::Corrupt,
        _ => PersistenceFault::Io,
    }
}

impl CalibrationStore for JsonFileStore {
    fn load(&mut self) -> Result<CalibrationOffset, PersistenceFault> {
        self.read()?.calibration.ok_or(PersistenceFault::Missing)
    }

    fn save(
        &mut self,
        offset: &CalibrationOffset,
    ) -> Result<(), PersistenceFault> {
        let mut settings = self.read_for_update()?;
        settings.calibration = Some(*offset);
        self.write(&settings)
    }
}

impl PeakStore for JsonFileStore {
    fn load_peaks(&mut self) -> Result<PeakAngles, PersistenceFault> {
        self.read()?.peaks.ok_or(PersistenceFault::Missing)
    }

    fn save_peaks(
        &mut self,
        peaks: &PeakAngles,
    ) -> Result<(), PersistenceFault> {
        let mut settings = self.read_for_update()?;
        settings.peaks = Some(*peaks);
        self.write(&settings)
    }
}
