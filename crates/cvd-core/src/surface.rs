//! Pixel surface collaborator and scoped pixel locking.
//!
//! A [`Surface`] is anything that exposes a rectangular grid of RGBA8
//! pixels: the in-memory [`Image`](crate::Image), or glue around a
//! platform bitmap. Two access paths are offered:
//!
//! - per-pixel [`get_pixel`](Surface::get_pixel) / [`set_pixel`](Surface::set_pixel)
//! - bulk access to the raw bits between [`lock_bits`](Surface::lock_bits)
//!   and [`unlock_bits`](Surface::unlock_bits)
//!
//! Bulk access always goes through a [`PixelLock`], which releases the lock
//! in `Drop`. Returning early with `?` or unwinding out of a traversal still
//! unlocks the surface.
//!
//! # Bit layout
//!
//! Locked bits are row-major, top-to-bottom, tightly packed RGBA8:
//!
//! ```text
//! [R G B A R G B A ...]  <- row 0, width * 4 bytes
//! [R G B A R G B A ...]  <- row 1
//! ```
//!
//! # Example
//!
//! ```rust
//! use cvd_core::{Image, PixelLock, Rgba8, Surface};
//!
//! let mut img = Image::filled(4, 4, Rgba8::opaque(10, 20, 30));
//! {
//!     let mut lock = PixelLock::acquire(&mut img).unwrap();
//!     lock.try_for_each_pixel(|px| Ok::<_, cvd_core::Error>(Rgba8::gray(px.g)))
//!         .unwrap();
//! }
//! assert!(!img.is_locked());
//! assert_eq!(img.pixel(0, 0), Rgba8::gray(20));
//! ```

use crate::{Error, Result, Rgba8};

/// Bytes per pixel of locked surface bits.
pub const BYTES_PER_PIXEL: usize = 4;

/// A rectangular RGBA8 pixel grid.
pub trait Surface {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Returns `(width, height)`.
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Reads the pixel at (x, y).
    fn get_pixel(&self, x: u32, y: u32) -> Result<Rgba8>;

    /// Writes the pixel at (x, y).
    fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8) -> Result<()>;

    /// Returns `true` while the bits are locked.
    fn is_locked(&self) -> bool;

    /// Locks the bits for bulk access.
    ///
    /// Fails with [`Error::SurfaceLocked`] if already locked. Prefer
    /// [`PixelLock::acquire`], which pairs this with `unlock_bits`.
    fn lock_bits(&mut self) -> Result<()>;

    /// Releases a lock taken with `lock_bits`. Unlocking an unlocked surface
    /// is a no-op.
    fn unlock_bits(&mut self);

    /// Returns the locked bits (see module docs for layout).
    ///
    /// Fails with [`Error::SurfaceNotLocked`] outside a lock.
    fn bits_mut(&mut self) -> Result<&mut [u8]>;
}

/// Scoped lock over a [`Surface`]'s bits.
///
/// Acquired with [`PixelLock::acquire`], released when dropped.
pub struct PixelLock<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: Surface + ?Sized> PixelLock<'a, S> {
    /// Locks `surface` until the returned guard is dropped.
    pub fn acquire(surface: &'a mut S) -> Result<Self> {
        surface.lock_bits()?;
        Ok(Self { surface })
    }

    /// Width of the locked surface.
    #[inline]
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    /// Height of the locked surface.
    #[inline]
    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    /// Bytes per row of the locked bits.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.surface.width() as usize * BYTES_PER_PIXEL
    }

    /// Number of pixels under the lock.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.surface.width() as usize * self.surface.height() as usize
    }

    /// Raw RGBA8 bits.
    pub fn pixels_mut(&mut self) -> Result<&mut [u8]> {
        let expected = self.pixel_count() * BYTES_PER_PIXEL;
        let bits = self.surface.bits_mut()?;
        if bits.len() != expected {
            return Err(Error::other(format!(
                "locked bits hold {} bytes, expected {}",
                bits.len(),
                expected
            )));
        }
        Ok(bits)
    }

    /// Returns `true` if any pixel matches `pred`.
    pub fn any_pixel<F>(&mut self, mut pred: F) -> Result<bool>
    where
        F: FnMut(Rgba8) -> bool,
    {
        let bits = self.pixels_mut()?;
        Ok(bits
            .chunks_exact(BYTES_PER_PIXEL)
            .any(|px| pred(Rgba8::new(px[0], px[1], px[2], px[3]))))
    }

    /// Replaces every pixel with `f(pixel)`, row by row.
    ///
    /// Stops at the first error; pixels already visited keep their new value.
    pub fn try_for_each_pixel<E, F>(&mut self, mut f: F) -> std::result::Result<(), E>
    where
        E: From<Error>,
        F: FnMut(Rgba8) -> std::result::Result<Rgba8, E>,
    {
        let bits = self.pixels_mut()?;
        for px in bits.chunks_exact_mut(BYTES_PER_PIXEL) {
            let out = f(Rgba8::new(px[0], px[1], px[2], px[3]))?;
            px.copy_from_slice(&out.to_array());
        }
        Ok(())
    }
}

impl<S: Surface + ?Sized> Drop for PixelLock<'_, S> {
    fn drop(&mut self) {
        self.surface.unlock_bits();
    }
}

impl<S: Surface + ?Sized> std::fmt::Debug for PixelLock<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelLock")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Image;

    #[test]
    fn test_lock_released_on_drop() {
        let mut img = Image::new(2, 2);
        {
            let _lock = PixelLock::acquire(&mut img).unwrap();
        }
        assert!(!img.is_locked());
        assert!(PixelLock::acquire(&mut img).is_ok());
    }

    #[test]
    fn test_lock_released_on_error() {
        let mut img = Image::filled(2, 2, Rgba8::WHITE);
        let result: Result<()> = (|| {
            let mut lock = PixelLock::acquire(&mut img)?;
            lock.try_for_each_pixel(|_| Err(Error::other("boom")))?;
            Ok(())
        })();
        assert!(result.is_err());
        assert!(!img.is_locked());
    }

    #[test]
    fn test_double_lock_fails() {
        let mut img = Image::new(2, 2);
        img.lock_bits().unwrap();
        assert!(matches!(
            PixelLock::acquire(&mut img),
            Err(Error::SurfaceLocked)
        ));
        img.unlock_bits();
        assert!(!img.is_locked());
    }

    #[test]
    fn test_bits_require_lock() {
        let mut img = Image::new(2, 2);
        assert!(matches!(img.bits_mut(), Err(Error::SurfaceNotLocked)));
    }

    #[test]
    fn test_for_each_pixel() {
        let mut img = Image::filled(3, 2, Rgba8::opaque(1, 2, 3));
        {
            let mut lock = PixelLock::acquire(&mut img).unwrap();
            assert_eq!(lock.row_bytes(), 12);
            lock.try_for_each_pixel(|px| Ok::<_, Error>(Rgba8::opaque(px.b, px.g, px.r)))
                .unwrap();
        }
        for (_, _, px) in img.pixels() {
            assert_eq!(px, Rgba8::opaque(3, 2, 1));
        }
    }

    #[test]
    fn test_any_pixel() {
        let mut img = Image::filled(3, 3, Rgba8::WHITE);
        img.set_pixel(1, 2, Rgba8::new(0, 0, 0, 10)).unwrap();
        let mut lock = PixelLock::acquire(&mut img).unwrap();
        assert!(lock.any_pixel(|px| !px.is_opaque()).unwrap());
        assert!(!lock.any_pixel(|px| px.r == 7).unwrap());
    }
}
