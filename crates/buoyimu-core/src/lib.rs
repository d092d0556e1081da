//! Buoy IMU core library for decoding raw motion-sensor frame files.
//!
//! The sensor writes fixed-size big-endian frames with no file header. Two
//! buoy installs write slightly different layouts (see
//! [`frame::layout::FrameLayout`]); the layout is chosen from how the data
//! decodes, never from the file name. Decoding runs bottom-up: field reader
//! -> frame stream decoder -> layout selection -> GPS time reconstruction ->
//! channel assembly, producing one [`Dataset`] on a shared UTC time axis.
//! All I/O is isolated in [`source`]; everything else is pure.
//!
//! Invariants:
//! - Every channel has exactly one sample per time-axis entry; missing
//!   samples are [`FILL_VALUE`], channels are never truncated.
//! - The time axis comes from the first GPS record of each frame only.
//! - Decoding the same bytes twice yields identical output.
//!
//! Version française (résumé):
//! Cette crate décode les trames binaires du capteur IMU des bouées : lecture
//! des champs, décodage du flux, choix du format (Morro ou Humboldt) selon le
//! résultat du décodage, reconstruction du temps GPS, puis assemblage des
//! canaux complétés par la valeur de remplissage -9999.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use buoyimu_core::{DecodeOptions, decode_imu_file};
//!
//! let path = Path::new("buoy.z06.00.20201201.000000.imu.bin");
//! let report = decode_imu_file(path, &DecodeOptions::default())?;
//! println!("samples: {}", report.summary.samples);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

pub mod assemble;
mod decode;
pub mod frame;
pub mod gps_time;
pub mod select;
pub mod source;
pub mod summary;
pub mod synth;

pub use assemble::{Dataset, Padding};
pub use decode::{DecodeError, DecodeOptions, DecodeOutput, decode_bytes, decode_imu_file};
pub use frame::layout::FrameLayout;
pub use frame::parser::Termination;
pub use source::RawFileName;
pub use summary::MotionSummary;

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Sentinel stored in channel samples the input did not provide.
pub const FILL_VALUE: f32 = -9999.0;

/// Decoding report: provenance, decode outcome, summary, and the dataset.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// Input file metadata.
    pub input: InputInfo,
    /// Layout and termination details; absent until a decode ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decode: Option<DecodeInfo>,
    pub summary: MotionSummary,
    /// Decoded channels; dropped for summary-only output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<Dataset>,
}

/// Tool metadata embedded in reports.
///
/// # Examples
/// ```
/// use buoyimu_core::ToolInfo;
///
/// let tool = ToolInfo {
///     name: "buoyimu".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(tool.name, "buoyimu");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Input file metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the decoder.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
    /// Archive name fields, when the name follows the buoy convention.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<RawFileName>,
}

/// How the frame stream decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodeInfo {
    pub layout: FrameLayout,
    pub frame_size: usize,
    pub frames_complete: usize,
    pub termination: Termination,
    /// Complete frames decoded despite unexpected header bytes.
    pub header_warnings: usize,
    pub leap_seconds: i64,
    /// Fill counts per channel.
    pub padding: Padding,
}

/// Build a report with provenance filled and no decode results.
///
/// # Examples
/// ```
/// use buoyimu_core::make_report;
///
/// let report = make_report("buoy.z06.00.20201201.000000.imu.bin", 820);
/// assert_eq!(report.report_version, buoyimu_core::REPORT_VERSION);
/// assert!(report.dataset.is_none());
/// ```
pub fn make_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "buoyimu".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
            file_name: None,
        },
        decode: None,
        summary: MotionSummary::default(),
        dataset: None,
    }
}
