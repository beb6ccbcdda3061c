use crate::foundation::core::PixelFormat;

/// Convenience result type used across droste.
pub type DrosteResult<T> = Result<T, DrosteError>;

/// Top-level error taxonomy used by the render APIs.
///
/// Cancellation is not an error: it is reported as [`crate::RenderStatus::Canceled`].
#[derive(thiserror::Error, Debug)]
pub enum DrosteError {
    /// Invalid parameters, rectangles or buffer geometry.
    #[error("validation error: {0}")]
    Validation(String),

    /// Source and destination buffers disagree on bit depth or channel layout.
    #[error("pixel format mismatch: source is {src}, destination is {dst}")]
    FormatMismatch {
        /// Format of the source buffer.
        src: PixelFormat,
        /// Format of the destination buffer.
        dst: PixelFormat,
    },

    /// Errors when serializing or deserializing parameter files.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DrosteError {
    /// Build a [`DrosteError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DrosteError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
