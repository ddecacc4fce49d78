//! # cvd-io
//!
//! Image I/O for the simulation workspace.
//!
//! Files are read into and written from [`cvd_core::Image`] (RGBA8). PNG is
//! the only format; the dispatching [`read`] / [`write`] keep callers
//! format-agnostic.
//!
//! # Example
//!
//! ```rust,ignore
//! use cvd_io::{read, write};
//!
//! let image = read("input.png")?;
//! write("output.png", &image)?;
//! ```
//!
//! # Alpha
//!
//! Simulation only accepts opaque pixels. [`flatten_alpha`] composites a
//! translucent image over a solid background so it can be simulated.
//!
//! # Dependencies
//!
//! - [`cvd_core`] - `Image`, `Rgba8`
//! - `png` - PNG codec
//! - `thiserror` - error types
//! - `tracing` - diagnostics
//!
//! # Used By
//!
//! - `cvd-cli` - reading inputs and writing results
//! - `cvd-tests` - integration tests

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod detect;
pub mod error;
#[cfg(feature = "png")]
pub mod png;

pub use detect::Format;
pub use error::{IoError, IoResult};

use cvd_core::{ALPHA_OPAQUE, Image, Rgba8};
use std::path::Path;
use tracing::debug;

/// Reads an image, detecting the format from magic bytes or extension.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened
/// - The format is not supported
/// - The file is corrupted
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    let format = Format::detect(path)?;

    match format {
        #[cfg(feature = "png")]
        Format::Png => crate::png::read(path),

        _ => Err(unsupported(path)),
    }
}

/// Writes an image, choosing the format from the extension.
///
/// # Errors
///
/// Returns an error if the file cannot be created or the extension names no
/// supported format.
pub fn write<P: AsRef<Path>>(path: P, image: &Image) -> IoResult<()> {
    let path = path.as_ref();
    let format = Format::from_extension(path);

    match format {
        #[cfg(feature = "png")]
        Format::Png => crate::png::write(path, image),

        _ => Err(unsupported(path)),
    }
}

fn unsupported(path: &Path) -> IoError {
    IoError::UnsupportedFormat(
        path.extension()
            .and_then(|e| e.to_str())
            .unwrap_or("unknown")
            .to_string(),
    )
}

/// Composites every pixel over an opaque `background` (source-over).
///
/// Returns the number of pixels that were not already opaque. The
/// background's own alpha is ignored.
///
/// ```rust
/// use cvd_core::{Image, Rgba8};
///
/// let mut img = Image::filled(2, 2, Rgba8::new(255, 0, 0, 0));
/// let touched = cvd_io::flatten_alpha(&mut img, Rgba8::WHITE);
/// assert_eq!(touched, 4);
/// assert_eq!(img.pixel(1, 1), Rgba8::WHITE);
/// ```
pub fn flatten_alpha(image: &mut Image, background: Rgba8) -> usize {
    if image.find_translucent().is_none() {
        return 0;
    }

    let mut touched = 0;
    image.map_pixels(|px| {
        if px.is_opaque() {
            return px;
        }
        touched += 1;
        let a = px.a as u32;
        let over = |s: u8, b: u8| ((s as u32 * a + b as u32 * (255 - a) + 127) / 255) as u8;
        Rgba8::new(
            over(px.r, background.r),
            over(px.g, background.g),
            over(px.b, background.b),
            ALPHA_OPAQUE,
        )
    });
    debug!(touched, background = %background, "flattened alpha");
    touched
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_half_alpha() {
        let mut img = Image::from_pixels(
            2,
            1,
            &[Rgba8::new(200, 100, 0, 128), Rgba8::opaque(1, 2, 3)],
        )
        .unwrap();
        assert_eq!(flatten_alpha(&mut img, Rgba8::BLACK), 1);
        // 200 * 128 / 255 = 100.39
        assert_eq!(img.pixel(0, 0), Rgba8::opaque(100, 50, 0));
        assert_eq!(img.pixel(1, 0), Rgba8::opaque(1, 2, 3));
        assert!(img.find_translucent().is_none());
    }

    #[test]
    fn test_flatten_opaque_is_noop() {
        let mut img = Image::filled(3, 3, Rgba8::opaque(9, 9, 9));
        let before = img.clone();
        assert_eq!(flatten_alpha(&mut img, Rgba8::WHITE), 0);
        assert_eq!(img, before);
    }

    #[test]
    fn test_flatten_ignores_background_alpha() {
        let mut img = Image::filled(1, 1, Rgba8::new(0, 0, 0, 0));
        flatten_alpha(&mut img, Rgba8::new(10, 20, 30, 0));
        assert_eq!(img.pixel(0, 0), Rgba8::opaque(10, 20, 30));
    }

    #[test]
    fn test_write_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let err = write(dir.path().join("out.exr"), &Image::new(1, 1)).unwrap_err();
        assert!(matches!(err, IoError::UnsupportedFormat(ref e) if e == "exr"));
    }

    #[cfg(feature = "png")]
    #[test]
    fn test_dispatch_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dispatch.png");
        let img = Image::filled(4, 2, Rgba8::opaque(12, 34, 56));
        write(&path, &img).unwrap();
        assert_eq!(read(&path).unwrap(), img);
    }
}
