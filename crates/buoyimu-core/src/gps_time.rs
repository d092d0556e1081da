//! GPS week / time-of-week to UTC.

use thiserror::Error;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

/// Start of GPS week 0.
pub const GPS_EPOCH: OffsetDateTime = datetime!(1980-01-06 0:00 UTC);
/// GPS-UTC offset applied to every sample. Fixed; not derived from the
/// sample date.
pub const GPS_UTC_LEAP_SECONDS: i64 = 18;

const SECONDS_PER_WEEK: i64 = 7 * 86_400;
/// Widest time-of-week accepted; anything larger is corrupt input.
const MAX_TOW_SECONDS: f64 = 1.0e9;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimeError {
    #[error("time of week at sample {index} is not finite or out of range: {tow}")]
    InvalidTow { index: usize, tow: f64 },
    #[error("timestamp at sample {index} is outside the representable range")]
    OutOfRange { index: usize },
}

/// Build the time axis: one UTC instant per sample that has both a week
/// number and a time of week.
///
/// # Examples
/// ```
/// use buoyimu_core::gps_time::{GPS_EPOCH, GPS_UTC_LEAP_SECONDS, reconstruct_time};
///
/// let time = reconstruct_time(&[18.0], &[0], GPS_UTC_LEAP_SECONDS).unwrap();
/// assert_eq!(time, vec![GPS_EPOCH]);
/// ```
pub fn reconstruct_time(
    tow: &[f64],
    week_number: &[u16],
    leap_seconds: i64,
) -> Result<Vec<OffsetDateTime>, TimeError> {
    tow.iter()
        .zip(week_number)
        .enumerate()
        .map(|(index, (&tow, &week))| gps_to_utc(index, week, tow, leap_seconds))
        .collect()
}

fn gps_to_utc(
    index: usize,
    week: u16,
    tow: f64,
    leap_seconds: i64,
) -> Result<OffsetDateTime, TimeError> {
    if !tow.is_finite() || tow.abs() > MAX_TOW_SECONDS {
        return Err(TimeError::InvalidTow { index, tow });
    }
    let whole = tow.floor();
    let mut nanos = ((tow - whole) * 1e9).round() as i64;
    let mut seconds = whole as i64;
    if nanos >= 1_000_000_000 {
        seconds += 1;
        nanos -= 1_000_000_000;
    }
    let seconds = i64::from(week) * SECONDS_PER_WEEK + seconds - leap_seconds;
    let offset = Duration::new(seconds, nanos as i32);
    GPS_EPOCH
        .checked_add(offset)
        .ok_or(TimeError::OutOfRange { index })
}
