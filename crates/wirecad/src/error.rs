//! Error types for geometry construction and the viewing pipeline.

use thiserror::Error;

/// Errors raised by primitive construction, transforms and pipeline stages.
///
/// All of these are local to a single object: the pipeline logs them and
/// carries on with the rest of the display file.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A parameter is outside the accepted domain (axis label, point count,
    /// clip bounds, face index, degenerate camera or window).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation was requested on a variant that cannot play that role.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Perspective division hit a point at or behind the centre of projection.
    #[error("object `{name}` has points at or behind the centre of projection")]
    BehindCamera { name: String },
}

impl GeometryError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeometryError>;
