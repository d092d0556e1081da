use std::path::Path;

use thiserror::Error;

use crate::assemble::{AssembleError, Dataset, Padding, assemble_channels};
use crate::frame::layout::FrameLayout;
use crate::frame::parser::{Mismatch, Termination};
use crate::gps_time::{GPS_UTC_LEAP_SECONDS, TimeError, reconstruct_time};
use crate::select::{decode_with_layout, select_layout};
use crate::source::{RawFileName, SourceError, read_frame_file};
use crate::summary::summarize;
use crate::{DecodeInfo, Report, make_report};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("no frame layout matches the input: {}", join_mismatches(.0))]
    NoMatchingLayout(Vec<Mismatch>),
    #[error("time reconstruction failed: {0}")]
    Time(#[from] TimeError),
    #[error("channel assembly failed: {0}")]
    Assemble(#[from] AssembleError),
    #[error("source error: {0}")]
    Source(#[from] SourceError),
}

fn join_mismatches(mismatches: &[Mismatch]) -> String {
    mismatches
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Decoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Force one layout; `None` selects it from the data.
    pub layout: Option<FrameLayout>,
    /// GPS-UTC offset subtracted from every time of week.
    pub leap_seconds: i64,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            layout: None,
            leap_seconds: GPS_UTC_LEAP_SECONDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodeOutput {
    pub layout: FrameLayout,
    pub frames_complete: usize,
    pub termination: Termination,
    pub header_warnings: usize,
    pub padding: Padding,
    pub dataset: Dataset,
}

/// Decode a complete in-memory frame file.
///
/// # Examples
/// ```
/// use buoyimu_core::{DecodeOptions, decode_bytes};
///
/// let output = decode_bytes(&[], &DecodeOptions::default())?;
/// assert!(output.dataset.is_empty());
/// # Ok::<(), buoyimu_core::DecodeError>(())
/// ```
pub fn decode_bytes(bytes: &[u8], options: &DecodeOptions) -> Result<DecodeOutput, DecodeError> {
    let decoded = match options.layout {
        Some(layout) => decode_with_layout(bytes, layout)
            .map_err(|mismatch| DecodeError::NoMatchingLayout(vec![mismatch]))?,
        None => select_layout(bytes).map_err(DecodeError::NoMatchingLayout)?,
    };

    let time = reconstruct_time(
        &decoded.channels.tow,
        &decoded.channels.week_number,
        options.leap_seconds,
    )?;
    let (dataset, padding) = assemble_channels(time, decoded.channels)?;

    tracing::info!(
        layout = decoded.layout.name(),
        frames = decoded.frames_complete,
        header_warnings = decoded.header_warnings,
        samples = dataset.len(),
        padded = padding.total(),
        "decoded frame stream"
    );

    Ok(DecodeOutput {
        layout: decoded.layout,
        frames_complete: decoded.frames_complete,
        termination: decoded.termination,
        header_warnings: decoded.header_warnings,
        padding,
        dataset,
    })
}

/// Read and decode one raw IMU file into a report.
pub fn decode_imu_file(path: &Path, options: &DecodeOptions) -> Result<Report, DecodeError> {
    let bytes = read_frame_file(path)?;
    let output = decode_bytes(&bytes, options)?;

    let mut report = make_report(&path.display().to_string(), bytes.len() as u64);
    report.input.file_name = RawFileName::from_path(path);
    report.decode = Some(DecodeInfo {
        layout: output.layout,
        frame_size: output.layout.frame_size(),
        frames_complete: output.frames_complete,
        termination: output.termination,
        header_warnings: output.header_warnings,
        leap_seconds: options.leap_seconds,
        padding: output.padding,
    });
    report.summary = summarize(&output.dataset);
    report.dataset = Some(output.dataset);
    Ok(report)
}
