use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::error::FrameError;
use super::layout::{self, FieldType, FrameLayout, Slot};
use super::reader::{FieldReader, Scalar};

/// Per-slot sample accumulators for one decode attempt.
///
/// Every vector grows in frame order. After a truncated tail the slots read
/// before the cut hold one more sample than the slots after it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawChannels {
    pub tow: Vec<f64>,
    pub week_number: Vec<u16>,
    pub roll: Vec<f32>,
    pub pitch: Vec<f32>,
    pub yaw: Vec<f32>,
    pub gyro: [Vec<f32>; 3],
    pub accel: [Vec<f32>; 3],
    pub mag: [Vec<f32>; 3],
    pub pres: Vec<f32>,
}

impl RawChannels {
    pub fn with_capacity(frames: usize) -> Self {
        let vec3 = || std::array::from_fn(|_| Vec::with_capacity(frames));
        Self {
            tow: Vec::with_capacity(frames),
            week_number: Vec::with_capacity(frames),
            roll: Vec::with_capacity(frames),
            pitch: Vec::with_capacity(frames),
            yaw: Vec::with_capacity(frames),
            gyro: vec3(),
            accel: vec3(),
            mag: vec3(),
            pres: Vec::with_capacity(frames),
        }
    }

    pub fn push(&mut self, slot: Slot, value: Scalar) {
        match slot {
            Slot::Tow => self.tow.push(value.as_f64()),
            Slot::WeekNumber => self.week_number.push(match value {
                Scalar::U16(week) => week,
                other => other.as_f64() as u16,
            }),
            Slot::Roll => self.roll.push(value.as_f32()),
            Slot::Pitch => self.pitch.push(value.as_f32()),
            Slot::Yaw => self.yaw.push(value.as_f32()),
            Slot::GyroX => self.gyro[0].push(value.as_f32()),
            Slot::GyroY => self.gyro[1].push(value.as_f32()),
            Slot::GyroZ => self.gyro[2].push(value.as_f32()),
            Slot::AccelX => self.accel[0].push(value.as_f32()),
            Slot::AccelY => self.accel[1].push(value.as_f32()),
            Slot::AccelZ => self.accel[2].push(value.as_f32()),
            Slot::MagX => self.mag[0].push(value.as_f32()),
            Slot::MagY => self.mag[1].push(value.as_f32()),
            Slot::MagZ => self.mag[2].push(value.as_f32()),
            Slot::Pres => self.pres.push(value.as_f32()),
        }
    }
}

/// How a decode under one layout came to a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Termination {
    /// Input ended exactly on a frame boundary.
    Clean,
    /// Input ended inside the frame starting at `offset`.
    Truncated { offset: usize },
}

/// Treatment of the first frame's header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstFrame {
    /// Reject the layout when frame 0 announces another candidate's payload
    /// size. Used while the layout is unknown.
    Discriminate,
    /// The layout is given; header bytes never reject it.
    Trust,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamDecode {
    pub layout: FrameLayout,
    /// Frames read in full, header to checksum.
    pub frames_complete: usize,
    pub termination: Termination,
    /// Complete frames whose sync bytes or payload size disagree with the
    /// layout. They are decoded like any other frame.
    pub header_warnings: usize,
    pub channels: RawChannels,
}

/// The layout does not describe the input: the first frame could not be
/// read under it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{layout} layout rejected in first frame: {source}")]
pub struct Mismatch {
    pub layout: FrameLayout,
    #[source]
    pub source: FrameError,
}

/// Decode `bytes` as a run of `layout` frames.
///
/// Frames are read until the input is exhausted. Failures inside the first
/// frame mean the layout is wrong and return [`Mismatch`]; a later
/// `EndOfStream` ends the stream and keeps what was read. Header bytes only
/// matter for frame 0 under [`FirstFrame::Discriminate`].
///
/// # Examples
/// ```
/// use buoyimu_core::frame::layout::FrameLayout;
/// use buoyimu_core::frame::parser::{FirstFrame, Termination, decode_stream};
///
/// let decoded = decode_stream(&[], FrameLayout::Morro, FirstFrame::Trust).unwrap();
/// assert_eq!(decoded.frames_complete, 0);
/// assert_eq!(decoded.termination, Termination::Clean);
/// ```
pub fn decode_stream(
    bytes: &[u8],
    layout: FrameLayout,
    first_frame: FirstFrame,
) -> Result<StreamDecode, Mismatch> {
    let frame_size = layout.frame_size();
    let mut reader = FieldReader::new(bytes);
    let mut channels = RawChannels::with_capacity(bytes.len() / frame_size + 1);
    let mut frames_complete = 0usize;
    let mut header_warnings = 0usize;

    let termination = loop {
        if reader.is_exhausted() {
            break Termination::Clean;
        }
        let frame_start = reader.offset();
        let discriminate = frames_complete == 0 && first_frame == FirstFrame::Discriminate;
        match read_frame(&mut reader, layout, discriminate, &mut channels) {
            Ok(header) => {
                frames_complete += 1;
                if !header.matches(layout) {
                    header_warnings += 1;
                    if header_warnings == 1 {
                        tracing::warn!(
                            layout = layout.name(),
                            offset = frame_start,
                            sync = ?header.sync,
                            payload_size = header.payload_size,
                            "unexpected frame header, decoding anyway"
                        );
                    } else {
                        tracing::debug!(offset = frame_start, "unexpected frame header");
                    }
                }
            }
            Err(source) if frames_complete == 0 => {
                return Err(Mismatch { layout, source });
            }
            Err(err) => {
                debug_assert!(err.is_end_of_stream());
                tracing::warn!(
                    layout = layout.name(),
                    offset = frame_start,
                    trailing_bytes = bytes.len() - frame_start,
                    "partial trailing frame"
                );
                break Termination::Truncated {
                    offset: frame_start,
                };
            }
        }
    };

    Ok(StreamDecode {
        layout,
        frames_complete,
        termination,
        header_warnings,
        channels,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrameHeader {
    sync: [u8; 2],
    payload_size: u8,
}

impl FrameHeader {
    fn matches(&self, layout: FrameLayout) -> bool {
        self.sync == [layout::SYNC1, layout::SYNC2]
            && usize::from(self.payload_size) == layout.payload_size()
    }
}

fn read_frame(
    reader: &mut FieldReader<'_>,
    layout: FrameLayout,
    discriminate: bool,
    channels: &mut RawChannels,
) -> Result<FrameHeader, FrameError> {
    debug_assert_eq!(layout.records()[0], layout::HEADER);

    let offset = reader.offset();
    let header = read_header(reader)?;
    if discriminate {
        let announced = FrameLayout::from_payload_size(usize::from(header.payload_size));
        if let Some(announced) = announced.filter(|announced| *announced != layout) {
            return Err(FrameError::ForeignPayloadSize {
                offset,
                found: header.payload_size,
                announced,
            });
        }
    }
    for record in &layout.records()[1..] {
        for field in record.fields {
            let value = reader.read(field.ty)?;
            if let Some(slot) = field.slot {
                channels.push(slot, value);
            }
        }
    }
    Ok(header)
}

fn read_header(reader: &mut FieldReader<'_>) -> Result<FrameHeader, FrameError> {
    debug_assert!(layout::HEADER.fields.iter().all(|f| f.ty == FieldType::U8));

    let mut bytes = [0u8; layout::HEADER_SIZE];
    for (byte, field) in bytes.iter_mut().zip(layout::HEADER.fields) {
        if let Scalar::U8(value) = reader.read(field.ty)? {
            *byte = value;
        }
    }
    let [sync1, sync2, _descriptor_set, payload_size] = bytes;
    Ok(FrameHeader {
        sync: [sync1, sync2],
        payload_size,
    })
}

#[cfg(test)]
mod tests {
    use super::{FirstFrame, Termination, decode_stream};
    use crate::frame::error::FrameError;
    use crate::frame::layout::FrameLayout;
    use crate::synth::{SyntheticFrame, encode_frames};

    fn frames(count: usize) -> Vec<SyntheticFrame> {
        (0..count).map(SyntheticFrame::numbered).collect()
    }

    fn zero_headers(bytes: &mut [u8], layout: FrameLayout) {
        for frame in bytes.chunks_mut(layout.frame_size()) {
            frame[..4].fill(0);
        }
    }

    #[test]
    fn exact_multiple_decodes_every_frame() {
        let bytes = encode_frames(FrameLayout::Morro, &frames(4));
        assert_eq!(bytes.len(), 4 * FrameLayout::Morro.frame_size());

        let decoded = decode_stream(&bytes, FrameLayout::Morro, FirstFrame::Discriminate).unwrap();
        assert_eq!(decoded.frames_complete, 4);
        assert_eq!(decoded.termination, Termination::Clean);
        assert_eq!(decoded.header_warnings, 0);
        assert_eq!(decoded.channels.tow.len(), 4);
        assert_eq!(decoded.channels.pres.len(), 4);
        assert_eq!(decoded.channels.mag[2].len(), 4);
    }

    #[test]
    fn partial_tail_keeps_fields_read_before_the_cut() {
        let frame_size = FrameLayout::Morro.frame_size();
        let mut bytes = encode_frames(FrameLayout::Morro, &frames(3));
        // header + gps_time + rpy + gyro field header + gyro x
        let tail = 4 + 14 + 14 + 2 + 4;
        bytes.truncate(2 * frame_size + tail);

        let decoded = decode_stream(&bytes, FrameLayout::Morro, FirstFrame::Discriminate).unwrap();
        assert_eq!(decoded.frames_complete, 2);
        assert_eq!(
            decoded.termination,
            Termination::Truncated {
                offset: 2 * frame_size
            }
        );
        let channels = &decoded.channels;
        assert_eq!(channels.tow.len(), 3);
        assert_eq!(channels.week_number.len(), 3);
        assert_eq!(channels.yaw.len(), 3);
        assert_eq!(channels.gyro[0].len(), 3);
        assert_eq!(channels.gyro[1].len(), 2);
        assert_eq!(channels.accel[0].len(), 2);
        assert_eq!(channels.pres.len(), 2);
    }

    #[test]
    fn tail_inside_header_adds_nothing() {
        let mut bytes = encode_frames(FrameLayout::Morro, &frames(2));
        bytes.truncate(FrameLayout::Morro.frame_size() + 3);

        let decoded = decode_stream(&bytes, FrameLayout::Morro, FirstFrame::Discriminate).unwrap();
        assert_eq!(decoded.frames_complete, 1);
        assert_eq!(decoded.channels.tow.len(), 1);
        assert_eq!(decoded.channels.roll.len(), 1);
    }

    #[test]
    fn humboldt_input_is_rejected_by_morro_in_first_frame() {
        let bytes = encode_frames(FrameLayout::Humboldt, &frames(3));
        let mismatch =
            decode_stream(&bytes, FrameLayout::Morro, FirstFrame::Discriminate).unwrap_err();
        assert_eq!(mismatch.layout, FrameLayout::Morro);
        assert_eq!(
            mismatch.source,
            FrameError::ForeignPayloadSize {
                offset: 0,
                found: 90,
                announced: FrameLayout::Humboldt,
            }
        );
    }

    #[test]
    fn morro_input_is_rejected_by_humboldt() {
        let bytes = encode_frames(FrameLayout::Morro, &frames(3));
        let mismatch =
            decode_stream(&bytes, FrameLayout::Humboldt, FirstFrame::Discriminate).unwrap_err();
        assert!(matches!(
            mismatch.source,
            FrameError::ForeignPayloadSize {
                announced: FrameLayout::Morro,
                ..
            }
        ));
    }

    #[test]
    fn first_frame_truncation_is_a_mismatch() {
        let mut bytes = encode_frames(FrameLayout::Morro, &frames(1));
        bytes.truncate(40);
        for first_frame in [FirstFrame::Discriminate, FirstFrame::Trust] {
            let mismatch = decode_stream(&bytes, FrameLayout::Morro, first_frame).unwrap_err();
            assert!(mismatch.source.is_end_of_stream());
        }
    }

    #[test]
    fn corrupt_sync_in_later_frame_keeps_decoding() {
        let frame_size = FrameLayout::Morro.frame_size();
        let mut bytes = encode_frames(FrameLayout::Morro, &frames(3));
        bytes[frame_size] = 0x00;

        let decoded = decode_stream(&bytes, FrameLayout::Morro, FirstFrame::Discriminate).unwrap();
        assert_eq!(decoded.frames_complete, 3);
        assert_eq!(decoded.termination, Termination::Clean);
        assert_eq!(decoded.header_warnings, 1);
        assert_eq!(decoded.channels.tow, vec![18.0, 19.0, 20.0]);
        assert_eq!(decoded.channels.roll.len(), 3);
    }

    #[test]
    fn foreign_payload_size_after_first_frame_is_only_a_warning() {
        let frame_size = FrameLayout::Morro.frame_size();
        let mut bytes = encode_frames(FrameLayout::Morro, &frames(4));
        bytes[2 * frame_size + 3] = 90;

        let decoded = decode_stream(&bytes, FrameLayout::Morro, FirstFrame::Discriminate).unwrap();
        assert_eq!(decoded.frames_complete, 4);
        assert_eq!(decoded.header_warnings, 1);
        assert_eq!(decoded.channels.pres.len(), 4);
    }

    #[test]
    fn zeroed_headers_decode_when_layout_is_trusted() {
        let mut bytes = encode_frames(FrameLayout::Morro, &frames(5));
        zero_headers(&mut bytes, FrameLayout::Morro);

        let decoded = decode_stream(&bytes, FrameLayout::Morro, FirstFrame::Trust).unwrap();
        assert_eq!(decoded.frames_complete, 5);
        assert_eq!(decoded.termination, Termination::Clean);
        assert_eq!(decoded.header_warnings, 5);
        assert_eq!(decoded.channels.roll.len(), 5);
    }

    #[test]
    fn zeroed_headers_carry_no_evidence_against_a_candidate() {
        let mut bytes = encode_frames(FrameLayout::Morro, &frames(5));
        zero_headers(&mut bytes, FrameLayout::Morro);

        let decoded = decode_stream(&bytes, FrameLayout::Morro, FirstFrame::Discriminate).unwrap();
        assert_eq!(decoded.frames_complete, 5);
    }

    #[test]
    fn trusted_layout_ignores_foreign_payload_size() {
        let bytes = encode_frames(FrameLayout::Humboldt, &frames(1));
        let decoded = decode_stream(&bytes, FrameLayout::Morro, FirstFrame::Trust).unwrap();
        assert_eq!(decoded.layout, FrameLayout::Morro);
        assert_eq!(decoded.frames_complete, 1);
        assert_eq!(decoded.header_warnings, 1);
    }

    #[test]
    fn duplicate_gps_record_is_not_accumulated() {
        let bytes = encode_frames(FrameLayout::Humboldt, &frames(2));
        let decoded =
            decode_stream(&bytes, FrameLayout::Humboldt, FirstFrame::Discriminate).unwrap();
        assert_eq!(decoded.channels.tow, vec![18.0, 19.0]);
        assert_eq!(decoded.channels.week_number.len(), 2);
    }
}
