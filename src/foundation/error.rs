/// Convenience result type used across rasterfx.
pub type RasterResult<T> = Result<T, RasterError>;

/// Error type for all fallible operations in rasterfx.
#[derive(thiserror::Error, Debug)]
pub enum RasterError {
    /// Requested or declared pixel dimensions are unusable.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Offending width.
        width: u64,
        /// Offending height.
        height: u64,
    },

    /// Convolution kernel weights do not form a non-empty square grid.
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    /// Input failed validation (non-finite factors, malformed options).
    #[error("validation error: {0}")]
    Validation(String),

    /// Any wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RasterError {
    /// Build a [`RasterError::InvalidDimensions`] value.
    pub fn invalid_dimensions(width: impl Into<u64>, height: impl Into<u64>) -> Self {
        Self::InvalidDimensions {
            width: width.into(),
            height: height.into(),
        }
    }

    /// Build a [`RasterError::InvalidKernel`] value.
    pub fn invalid_kernel(msg: impl Into<String>) -> Self {
        Self::InvalidKernel(msg.into())
    }

    /// Build a [`RasterError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
