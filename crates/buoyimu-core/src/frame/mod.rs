//! IMU frame decoding.
//!
//! Follows a layered structure:
//! - `layout`: frame layouts and field types (source of truth)
//! - `reader`: safe big-endian field access over a byte cursor
//! - `parser`: frame stream decoding into per-channel accumulators
//! - `error`: explicit, actionable errors
//!
//! Nothing here touches the filesystem.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;
