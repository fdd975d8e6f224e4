//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides what variants to create) and the [`backend`](super::backend)
//! (which does the actual pixel work). Tests swap in a recording backend
//! without changing operation logic.

use crate::format::EncodeParams;
use std::path::PathBuf;

/// Parameters for a resize-and-encode operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub encode: EncodeParams,
}
