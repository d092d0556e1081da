//! Synthetic frame encoder.
//!
//! Builds byte-exact frames for either layout from known sample values. Used
//! by the fixture generator and by tests; the decoder never depends on it.

use crate::frame::layout::{self, FieldType, FrameLayout, Slot, SubRecord};
use crate::frame::reader::Scalar;

const DESCRIPTOR_SET_IMU: u8 = 0x80;

/// Sample values carried by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticFrame {
    pub tow: f64,
    pub week_number: u16,
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub gyro: [f32; 3],
    pub accel: [f32; 3],
    pub mag: [f32; 3],
    pub pres: f32,
}

impl SyntheticFrame {
    /// Frame `index` of a deterministic series: one second apart starting at
    /// the GPS epoch (UTC), with every channel distinct per index.
    pub fn numbered(index: usize) -> Self {
        let i = index as f32;
        Self {
            tow: 18.0 + index as f64,
            week_number: 0,
            roll: 1.0 + i,
            pitch: -2.0 - i,
            yaw: 90.0 + i,
            gyro: [0.01 * i, 0.02 * i, 0.03 * i],
            accel: [0.1, -0.1, -9.81 + 0.001 * i],
            mag: [0.25, 0.5 + i, -0.75],
            pres: 1013.25 + i,
        }
    }

    fn slot_value(&self, slot: Slot) -> Scalar {
        match slot {
            Slot::Tow => Scalar::F64(self.tow),
            Slot::WeekNumber => Scalar::U16(self.week_number),
            Slot::Roll => Scalar::F32(self.roll),
            Slot::Pitch => Scalar::F32(self.pitch),
            Slot::Yaw => Scalar::F32(self.yaw),
            Slot::GyroX => Scalar::F32(self.gyro[0]),
            Slot::GyroY => Scalar::F32(self.gyro[1]),
            Slot::GyroZ => Scalar::F32(self.gyro[2]),
            Slot::AccelX => Scalar::F32(self.accel[0]),
            Slot::AccelY => Scalar::F32(self.accel[1]),
            Slot::AccelZ => Scalar::F32(self.accel[2]),
            Slot::MagX => Scalar::F32(self.mag[0]),
            Slot::MagY => Scalar::F32(self.mag[1]),
            Slot::MagZ => Scalar::F32(self.mag[2]),
            Slot::Pres => Scalar::F32(self.pres),
        }
    }
}

/// Encode one frame. The checksum is a Fletcher-16 over the preceding bytes,
/// as the sensor writes it.
pub fn encode_frame(layout: FrameLayout, frame: &SyntheticFrame) -> Vec<u8> {
    let mut out = Vec::with_capacity(layout.frame_size());
    for record in layout.records() {
        if record.name == layout::CHECKSUM.name {
            let [msb, lsb] = fletcher16(&out);
            out.extend_from_slice(&[msb, lsb]);
            continue;
        }
        for field in record.fields {
            let value = match field.slot {
                Some(slot) => frame.slot_value(slot),
                None => filler_value(layout, record, field.name, frame),
            };
            put(&mut out, field.ty, value);
        }
    }
    debug_assert_eq!(out.len(), layout.frame_size());
    out
}

pub fn encode_frames(layout: FrameLayout, frames: &[SyntheticFrame]) -> Vec<u8> {
    frames
        .iter()
        .flat_map(|frame| encode_frame(layout, frame))
        .collect()
}

fn filler_value(
    layout: FrameLayout,
    record: &SubRecord,
    name: &str,
    frame: &SyntheticFrame,
) -> Scalar {
    match name {
        "sync1" => Scalar::U8(layout::SYNC1),
        "sync2" => Scalar::U8(layout::SYNC2),
        "descriptor_set" => Scalar::U8(DESCRIPTOR_SET_IMU),
        "payload_size" => Scalar::U8(layout.payload_size() as u8),
        "field_len" => Scalar::U8(record.size() as u8),
        "descriptor" => Scalar::U8(field_descriptor(record.name)),
        // the duplicated GPS record repeats the primary one
        "tow" => Scalar::F64(frame.tow),
        "week_number" => Scalar::U16(frame.week_number),
        _ => Scalar::U8(0),
    }
}

fn field_descriptor(record: &str) -> u8 {
    match record {
        "gps_time" | "gps_time_duplicate" => 0x12,
        "rpy" => 0x0c,
        "gyro" => 0x05,
        "accel" => 0x04,
        "mag" => 0x06,
        "pressure" => 0x17,
        _ => 0x00,
    }
}

fn put(out: &mut Vec<u8>, ty: FieldType, value: Scalar) {
    match (ty, value) {
        (FieldType::U8, Scalar::U8(v)) => out.push(v),
        (FieldType::U16, Scalar::U16(v)) => out.extend_from_slice(&v.to_be_bytes()),
        (FieldType::F32, Scalar::F32(v)) => out.extend_from_slice(&v.to_be_bytes()),
        (FieldType::F64, Scalar::F64(v)) => out.extend_from_slice(&v.to_be_bytes()),
        // flags and other unnamed filler
        (FieldType::U16, _) => out.extend_from_slice(&[0, 0]),
        (FieldType::F32, other) => out.extend_from_slice(&other.as_f32().to_be_bytes()),
        (FieldType::F64, other) => out.extend_from_slice(&other.as_f64().to_be_bytes()),
        (FieldType::U8, other) => out.push(other.as_f64() as u8),
    }
}

fn fletcher16(bytes: &[u8]) -> [u8; 2] {
    let (mut a, mut b) = (0u8, 0u8);
    for byte in bytes {
        a = a.wrapping_add(*byte);
        b = b.wrapping_add(a);
    }
    [a, b]
}
