use super::error::FrameError;
use super::layout::FieldType;

/// One decoded field value, tagged with its wire type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    U8(u8),
    U16(u16),
    F32(f32),
    F64(f64),
}

impl Scalar {
    pub fn as_f64(self) -> f64 {
        match self {
            Scalar::U8(value) => f64::from(value),
            Scalar::U16(value) => f64::from(value),
            Scalar::F32(value) => f64::from(value),
            Scalar::F64(value) => value,
        }
    }

    /// Narrowing view used by the float channels. Integer values convert
    /// exactly; `F64` is rounded to the nearest `f32`.
    pub fn as_f32(self) -> f32 {
        match self {
            Scalar::U8(value) => f32::from(value),
            Scalar::U16(value) => f32::from(value),
            Scalar::F32(value) => value,
            Scalar::F64(value) => value as f32,
        }
    }
}

/// Forward-only cursor over a frame byte buffer.
///
/// # Examples
/// ```
/// use buoyimu_core::frame::layout::FieldType;
/// use buoyimu_core::frame::reader::{FieldReader, Scalar};
///
/// let mut reader = FieldReader::new(&[0x01, 0x02, 0xff]);
/// assert_eq!(reader.read(FieldType::U16).unwrap(), Scalar::U16(0x0102));
/// assert!(reader.read(FieldType::U16).is_err());
/// assert_eq!(reader.offset(), 2);
/// ```
pub struct FieldReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Read one big-endian scalar and advance past it. On `EndOfStream` the
    /// cursor stays where it was.
    pub fn read(&mut self, ty: FieldType) -> Result<Scalar, FrameError> {
        let value = match ty {
            FieldType::U8 => Scalar::U8(u8::from_be_bytes(self.take::<1>()?)),
            FieldType::U16 => Scalar::U16(u16::from_be_bytes(self.take::<2>()?)),
            FieldType::F32 => Scalar::F32(f32::from_be_bytes(self.take::<4>()?)),
            FieldType::F64 => Scalar::F64(f64::from_be_bytes(self.take::<8>()?)),
        };
        Ok(value)
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], FrameError> {
        let end = self.offset + N;
        let bytes = self
            .bytes
            .get(self.offset..end)
            .ok_or(FrameError::EndOfStream {
                offset: self.offset,
                needed: N,
                remaining: self.remaining(),
            })?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.offset = end;
        Ok(out)
    }
}
