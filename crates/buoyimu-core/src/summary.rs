use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::FILL_VALUE;
use crate::assemble::Dataset;

/// Headline statistics for a decoded file: extent of the time axis and the
/// mean buoy tilt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionSummary {
    pub samples: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
    /// Mean roll over real (non-fill) samples.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_mean: Option<f64>,
    /// Mean pitch over real (non-fill) samples.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch_mean: Option<f64>,
}

pub fn summarize(dataset: &Dataset) -> MotionSummary {
    let stamp = |instant: Option<&OffsetDateTime>| instant.and_then(|t| t.format(&Rfc3339).ok());
    MotionSummary {
        samples: dataset.len(),
        time_start: stamp(dataset.time.first()),
        time_end: stamp(dataset.time.last()),
        roll_mean: mean_ignoring_fill(&dataset.roll),
        pitch_mean: mean_ignoring_fill(&dataset.pitch),
    }
}

fn mean_ignoring_fill(values: &[f32]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .filter(|value| **value != FILL_VALUE)
        .fold((0.0f64, 0usize), |(sum, count), value| {
            (sum + f64::from(*value), count + 1)
        });
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
