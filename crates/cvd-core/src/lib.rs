//! # cvd-core
//!
//! Core types for color-vision-deficiency simulation.
//!
//! - [`Rgba8`], [`Argb32`], [`PixelColor`] - color values and toolkit adapters
//! - [`Image`] - in-memory RGBA8 buffer
//! - [`Surface`], [`PixelLock`] - the pixel-grid collaborator and its scoped lock
//! - [`Error`], [`Result`] - error handling
//!
//! ## Crate Structure
//!
//! ```text
//! cvd-core (this crate)      cvd-math
//!    ^                          ^
//!    |                          |
//!    +-- cvd-vision (LMS transform, condition table, simulator)
//!    +-- cvd-io (PNG I/O)
//!    +-- cvd-cli
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod color;
pub mod error;
pub mod image;
pub mod surface;

pub use color::{ALPHA_OPAQUE, Argb32, PixelColor, Rgba8};
pub use error::{Error, Result};
pub use image::Image;
pub use surface::{BYTES_PER_PIXEL, PixelLock, Surface};

/// Prelude module for convenient imports.
///
/// ```
/// use cvd_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::{Argb32, PixelColor, Rgba8};
    pub use crate::error::{Error, Result};
    pub use crate::image::Image;
    pub use crate::surface::{PixelLock, Surface};
}
