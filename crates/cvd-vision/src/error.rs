//! Error types for vision simulation.
//!
//! Every validation failure of the simulation layer is an invalid argument:
//! a translucent color, a condition tag nobody knows, or a transform matrix
//! that cannot be applied. [`SimError::is_invalid_argument`] classifies all
//! of them.

use thiserror::Error;

/// Vision simulation error.
#[derive(Debug, Error)]
pub enum SimError {
    /// An argument failed validation.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the offending parameter.
        name: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// An image pixel is not fully opaque.
    #[error("invalid argument 'image': pixel ({x}, {y}) has alpha {alpha}, alpha colors are not supported")]
    NonOpaquePixel {
        /// X coordinate of the first offending pixel.
        x: u32,
        /// Y coordinate of the first offending pixel.
        y: u32,
        /// Its alpha value.
        alpha: u8,
    },

    /// Error from the pixel surface.
    #[error(transparent)]
    Core(#[from] cvd_core::Error),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    /// Creates an [`SimError::InvalidArgument`] error.
    #[inline]
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Returns `true` for every argument-validation failure.
    #[inline]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. } | Self::NonOpaquePixel { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument() {
        let err = SimError::invalid_argument("input", "alpha colors are not supported");
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("input"));
    }

    #[test]
    fn test_non_opaque_pixel() {
        let err = SimError::NonOpaquePixel { x: 3, y: 7, alpha: 128 };
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("(3, 7)"));
    }

    #[test]
    fn test_core_is_not_invalid_argument() {
        let err: SimError = cvd_core::Error::SurfaceLocked.into();
        assert!(!err.is_invalid_argument());
    }
}
