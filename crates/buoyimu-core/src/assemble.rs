use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::FILL_VALUE;
use crate::frame::parser::RawChannels;

/// Labels of the vector component axis.
pub const SPACE: [&str; 3] = ["x", "y", "z"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssembleError {
    #[error("channel {channel} has {len} samples, longer than the {time_len}-sample time axis")]
    ChannelOverrun {
        channel: &'static str,
        len: usize,
        time_len: usize,
    },
}

/// Decoded channels on a shared time axis.
///
/// Every channel holds exactly `time.len()` samples; samples the input did
/// not provide are [`FILL_VALUE`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    #[serde(serialize_with = "serialize_rfc3339")]
    pub time: Vec<OffsetDateTime>,
    pub space: [&'static str; 3],
    pub roll: Vec<f32>,
    pub pitch: Vec<f32>,
    pub yaw: Vec<f32>,
    pub pres: Vec<f32>,
    pub gyro: Vec<[f32; 3]>,
    pub accel: Vec<[f32; 3]>,
    pub mag: Vec<[f32; 3]>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Fill counts per channel, for vectors the count of rows with at least one
/// filled component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Padding {
    pub roll: usize,
    pub pitch: usize,
    pub yaw: usize,
    pub pres: usize,
    pub gyro: usize,
    pub accel: usize,
    pub mag: usize,
}

impl Padding {
    pub fn total(&self) -> usize {
        self.roll + self.pitch + self.yaw + self.pres + self.gyro + self.accel + self.mag
    }
}

/// Align raw accumulators to `time`, right-padding short ones with
/// [`FILL_VALUE`].
///
/// # Errors
/// Returns [`AssembleError::ChannelOverrun`] if any accumulator is longer
/// than the time axis. Nothing is ever truncated.
pub fn assemble_channels(
    time: Vec<OffsetDateTime>,
    raw: RawChannels,
) -> Result<(Dataset, Padding), AssembleError> {
    let time_len = time.len();
    let mut padding = Padding::default();

    let roll = pad_scalar("roll", raw.roll, time_len, &mut padding.roll)?;
    let pitch = pad_scalar("pitch", raw.pitch, time_len, &mut padding.pitch)?;
    let yaw = pad_scalar("yaw", raw.yaw, time_len, &mut padding.yaw)?;
    let pres = pad_scalar("pres", raw.pres, time_len, &mut padding.pres)?;
    let gyro = pad_vector("gyro", raw.gyro, time_len, &mut padding.gyro)?;
    let accel = pad_vector("accel", raw.accel, time_len, &mut padding.accel)?;
    let mag = pad_vector("mag", raw.mag, time_len, &mut padding.mag)?;

    if padding.total() > 0 {
        tracing::debug!(?padding, time_len, "padded short channels");
    }

    Ok((
        Dataset {
            time,
            space: SPACE,
            roll,
            pitch,
            yaw,
            pres,
            gyro,
            accel,
            mag,
        },
        padding,
    ))
}

fn pad_scalar(
    channel: &'static str,
    mut values: Vec<f32>,
    time_len: usize,
    filled: &mut usize,
) -> Result<Vec<f32>, AssembleError> {
    if values.len() > time_len {
        return Err(AssembleError::ChannelOverrun {
            channel,
            len: values.len(),
            time_len,
        });
    }
    *filled = time_len - values.len();
    values.resize(time_len, FILL_VALUE);
    Ok(values)
}

fn pad_vector(
    channel: &'static str,
    components: [Vec<f32>; 3],
    time_len: usize,
    filled_rows: &mut usize,
) -> Result<Vec<[f32; 3]>, AssembleError> {
    let shortest = components.iter().map(Vec::len).min().unwrap_or(0);
    let [x, y, z] = components.map(|mut values| {
        if values.len() <= time_len {
            values.resize(time_len, FILL_VALUE);
        }
        values
    });
    for values in [&x, &y, &z] {
        if values.len() > time_len {
            return Err(AssembleError::ChannelOverrun {
                channel,
                len: values.len(),
                time_len,
            });
        }
    }
    *filled_rows = time_len.saturating_sub(shortest);
    Ok((0..time_len).map(|i| [x[i], y[i], z[i]]).collect())
}

fn serialize_rfc3339<S: Serializer>(
    time: &[OffsetDateTime],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let formatted = time
        .iter()
        .map(|instant| instant.format(&Rfc3339))
        .collect::<Result<Vec<_>, _>>()
        .map_err(serde::ser::Error::custom)?;
    formatted.serialize(serializer)
}
