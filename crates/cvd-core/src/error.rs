//! Error types for cvd-core operations.
//!
//! Covers the failure modes of the pixel collaborator layer: bounds checks,
//! buffer construction and the lock/unlock protocol of a [`Surface`](crate::Surface).
//!
//! # Usage
//!
//! ```rust
//! use cvd_core::{Error, Result};
//!
//! fn check(x: u32, y: u32, width: u32, height: u32) -> Result<()> {
//!     if x >= width || y >= height {
//!         return Err(Error::out_of_bounds(x, y, width, height));
//!     }
//!     Ok(())
//! }
//! assert!(check(3, 0, 2, 2).is_err());
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - derive for `Display` and `std::error::Error`
//!
//! # Used By
//!
//! - [`crate::image::Image`] - buffer construction and pixel access
//! - [`crate::surface::PixelLock`] - lock acquisition
//! - `cvd-vision`, `cvd-io` - wrapped into their own error enums

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by images and surfaces.
#[derive(Debug, Error)]
pub enum Error {
    /// Pixel coordinates are outside image bounds.
    #[error("pixel ({x}, {y}) out of bounds for image {width}x{height}")]
    OutOfBounds {
        /// X coordinate that was out of bounds
        x: u32,
        /// Y coordinate that was out of bounds
        y: u32,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// Invalid image dimensions or buffer length.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// The surface is already locked.
    ///
    /// Only one [`PixelLock`](crate::PixelLock) may be alive per surface. A
    /// lock that was leaked (e.g. with `mem::forget`) keeps the surface
    /// locked for good.
    #[error("surface is already locked")]
    SurfaceLocked,

    /// Pixel bits were requested from a surface that is not locked.
    #[error("surface is not locked")]
    SurfaceNotLocked,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::Other`] error.
    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Returns `true` if this is a bounds error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }

    /// Returns `true` if this error comes from the lock protocol.
    #[inline]
    pub fn is_lock_error(&self) -> bool {
        matches!(self, Self::SurfaceLocked | Self::SurfaceNotLocked)
    }
}
