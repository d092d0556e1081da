//! Frame layout selection.
//!
//! The input carries no layout tag. Candidates are tried in the fixed order
//! of [`FrameLayout::CANDIDATES`]. A candidate is rejected when its first
//! frame cannot be read, or when that frame's payload size belongs to another
//! candidate; its partial results are then dropped and the next candidate
//! decodes from the start. Other header bytes never reject a candidate.

use crate::frame::layout::FrameLayout;
use crate::frame::parser::{FirstFrame, Mismatch, StreamDecode, decode_stream};

/// Decode `bytes` with the first layout that accepts them.
///
/// # Errors
/// Returns every candidate's [`Mismatch`] when none accepts the input.
///
/// # Examples
/// ```
/// use buoyimu_core::frame::layout::FrameLayout;
/// use buoyimu_core::select::select_layout;
/// use buoyimu_core::synth::{SyntheticFrame, encode_frames};
///
/// let bytes = encode_frames(FrameLayout::Humboldt, &[SyntheticFrame::numbered(0)]);
/// let decoded = select_layout(&bytes).unwrap();
/// assert_eq!(decoded.layout, FrameLayout::Humboldt);
/// ```
pub fn select_layout(bytes: &[u8]) -> Result<StreamDecode, Vec<Mismatch>> {
    let mut rejected = Vec::with_capacity(FrameLayout::CANDIDATES.len());
    for layout in FrameLayout::CANDIDATES {
        match attempt(bytes, layout, FirstFrame::Discriminate) {
            Ok(decoded) => {
                if !rejected.is_empty() {
                    tracing::info!(
                        layout = layout.name(),
                        rejected = rejected.len(),
                        "fell back to alternate frame layout"
                    );
                }
                return Ok(decoded);
            }
            Err(mismatch) => {
                tracing::debug!(error = %mismatch, "frame layout rejected");
                rejected.push(mismatch);
            }
        }
    }
    Err(rejected)
}

/// Decode `bytes` with one fixed layout. Frame headers are not checked, so
/// only input shorter than one frame is rejected.
pub fn decode_with_layout(bytes: &[u8], layout: FrameLayout) -> Result<StreamDecode, Mismatch> {
    attempt(bytes, layout, FirstFrame::Trust)
}

fn attempt(
    bytes: &[u8],
    layout: FrameLayout,
    first_frame: FirstFrame,
) -> Result<StreamDecode, Mismatch> {
    tracing::debug!(
        layout = layout.name(),
        frame_size = layout.frame_size(),
        input_bytes = bytes.len(),
        ?first_frame,
        "decoding frames"
    );
    decode_stream(bytes, layout, first_frame)
}
