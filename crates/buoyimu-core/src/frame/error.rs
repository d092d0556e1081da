use thiserror::Error;

use super::layout::FrameLayout;

/// Field-level failures raised while walking a frame.
///
/// # Examples
/// ```
/// use buoyimu_core::frame::error::FrameError;
///
/// let err = FrameError::EndOfStream { offset: 80, needed: 4, remaining: 2 };
/// assert!(err.to_string().contains("end of stream"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("end of stream at offset {offset}: need {needed} bytes, {remaining} left")]
    EndOfStream {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    #[error("frame at offset {offset} announces a {announced} payload ({found} bytes)")]
    ForeignPayloadSize {
        offset: usize,
        found: u8,
        announced: FrameLayout,
    },
}

impl FrameError {
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, FrameError::EndOfStream { .. })
    }
}
