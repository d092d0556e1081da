//! File input.
//!
//! Frames are decoded from a fully buffered file. Raw file names follow the
//! buoy archive convention `buoy.<station>.<level>.<YYYYMMDD>.<HHMMSS>.imu.bin`;
//! the parsed name is reported alongside the data but never used to pick a
//! frame layout.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::PrimitiveDateTime;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read a whole frame file into memory.
pub fn read_frame_file(path: &Path) -> Result<Vec<u8>, SourceError> {
    let bytes = fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read frame file");
    Ok(bytes)
}

/// Metadata carried by an archive file name.
///
/// # Examples
/// ```
/// use buoyimu_core::source::RawFileName;
///
/// let name = RawFileName::parse("buoy.z06.00.20201201.000000.imu.bin").unwrap();
/// assert_eq!(name.station, "z06");
/// assert_eq!(name.start_time, "2020-12-01T00:00:00Z");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFileName {
    /// Buoy station identifier (e.g., `z05`).
    pub station: String,
    /// Archive data level (`00` for raw).
    pub level: String,
    /// RFC3339 start time encoded in the name.
    pub start_time: String,
}

impl RawFileName {
    /// Parse a bare file name; returns `None` for names outside the
    /// convention.
    pub fn parse(file_name: &str) -> Option<Self> {
        let parts: Vec<&str> = file_name.split('.').collect();
        let [prefix, station, level, date, clock, kind, ext] = parts.as_slice() else {
            return None;
        };
        if *prefix != "buoy" || *kind != "imu" || *ext != "bin" {
            return None;
        }
        if station.is_empty() || level.is_empty() {
            return None;
        }
        let stamp = format!("{date}{clock}");
        let start = PrimitiveDateTime::parse(
            &stamp,
            format_description!("[year][month][day][hour][minute][second]"),
        )
        .ok()?
        .assume_utc()
        .format(&Rfc3339)
        .ok()?;
        Some(Self {
            station: station.to_string(),
            level: level.to_string(),
            start_time: start,
        })
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(Self::parse)
    }
}
