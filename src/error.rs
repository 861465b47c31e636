//! Error types for geometry conversion.

use thiserror::Error;

/// Errors that can occur while converting mesh data into GPU-ready geometry.
///
/// Every error is fatal to the conversion of the current mesh: a failed
/// primitive aborts the whole mesh rather than producing a partial result.
/// Variants carry the attribute name or accessor index they concern so a
/// failure can be diagnosed without re-running the conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// A component type, element shape, or draw mode outside the supported set.
    #[error("{subject}: unsupported format: {detail}")]
    UnsupportedFormat { subject: String, detail: String },

    /// Stride or offset arithmetic produced an unusable layout, or a
    /// reference points outside its target.
    #[error("{subject}: invalid layout: {detail}")]
    InvalidLayout { subject: String, detail: String },

    /// Two buffer parts meant to combine disagree on vertex count.
    #[error("{subject}: vertex count mismatch: expected {expected}, found {found}")]
    InconsistentVertexCount {
        subject: String,
        expected: u32,
        found: u32,
    },

    /// A position accessor lacks usable declared min/max metadata.
    #[error("{subject}: missing bounds: {detail}")]
    MissingBounds { subject: String, detail: String },
}
