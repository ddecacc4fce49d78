//! In-memory RGBA8 image buffer.
//!
//! [`Image`] is the reference [`Surface`] implementation: a row-major,
//! top-to-bottom buffer of interleaved `[R G B A]` bytes.
//!
//! # Memory Management
//!
//! Pixel data lives in an [`Arc<Vec<u8>>`]. Cloning an image is cheap and
//! shares the buffer; the first mutation of a shared buffer copies it
//! (copy-on-write). Simulating a clone therefore never touches the original.
//!
//! # Usage
//!
//! ```rust
//! use cvd_core::{Image, Rgba8};
//!
//! let mut img = Image::new(16, 9);
//! img.put_pixel(3, 4, Rgba8::opaque(255, 0, 0));
//! assert_eq!(img.pixel(3, 4), Rgba8::opaque(255, 0, 0));
//! assert_eq!(img.pixel(0, 0), Rgba8::BLACK);
//! ```

use crate::surface::BYTES_PER_PIXEL;
use crate::{Error, Result, Rgba8, Surface};
use std::sync::Arc;

/// Owned RGBA8 image buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    /// Pixel data buffer (Arc for cheap cloning)
    data: Arc<Vec<u8>>,
    width: u32,
    height: u32,
    /// Set between `lock_bits` and `unlock_bits`
    locked: bool,
}

impl Image {
    /// Creates an opaque black image.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cvd_core::Image;
    ///
    /// let img = Image::new(1920, 1080);
    /// assert_eq!(img.dimensions(), (1920, 1080));
    /// ```
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba8::BLACK)
    }

    /// Creates an image filled with one color.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> Self {
        let pixel_count = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixel_count * BYTES_PER_PIXEL);
        for _ in 0..pixel_count {
            data.extend_from_slice(&color.to_array());
        }
        Self {
            data: Arc::new(data),
            width,
            height,
            locked: false,
        }
    }

    /// Creates an image from interleaved RGBA8 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len() != width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
            .ok_or_else(|| Error::invalid_dimensions(width, height, "size overflows"))?;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} bytes, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
            locked: false,
        })
    }

    /// Creates an image from a slice of colors in row-major order.
    pub fn from_pixels(width: u32, height: u32, pixels: &[Rgba8]) -> Result<Self> {
        let data = pixels.iter().flat_map(|c| c.to_array()).collect();
        Self::from_rgba8(width, height, data)
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns `true` if the image has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw RGBA8 bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the image and returns its bytes.
    pub fn into_rgba8(self) -> Vec<u8> {
        Arc::try_unwrap(self.data).unwrap_or_else(|shared| (*shared).clone())
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    #[inline]
    fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        assert!(self.contains(x, y), "pixel out of bounds");
        let o = self.offset(x, y);
        Rgba8::new(self.data[o], self.data[o + 1], self.data[o + 2], self.data[o + 3])
    }

    /// Writes the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Rgba8) {
        assert!(self.contains(x, y), "pixel out of bounds");
        let o = self.offset(x, y);
        Arc::make_mut(&mut self.data)[o..o + BYTES_PER_PIXEL].copy_from_slice(&color.to_array());
    }

    /// Fills the whole image with one color.
    pub fn fill(&mut self, color: Rgba8) {
        let data = Arc::make_mut(&mut self.data);
        for chunk in data.chunks_exact_mut(BYTES_PER_PIXEL) {
            chunk.copy_from_slice(&color.to_array());
        }
    }

    /// Iterates over all pixels with their coordinates.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, Rgba8)> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| (x, y, self.pixel(x, y))))
    }

    /// Applies a function to each pixel in place.
    ///
    /// ```rust
    /// use cvd_core::{Image, Rgba8};
    ///
    /// let mut img = Image::filled(4, 4, Rgba8::opaque(10, 20, 30));
    /// img.map_pixels(|px| Rgba8::gray(px.r));
    /// assert_eq!(img.pixel(2, 2), Rgba8::gray(10));
    /// ```
    pub fn map_pixels<F>(&mut self, mut f: F)
    where
        F: FnMut(Rgba8) -> Rgba8,
    {
        let data = Arc::make_mut(&mut self.data);
        for chunk in data.chunks_exact_mut(BYTES_PER_PIXEL) {
            let out = f(Rgba8::new(chunk[0], chunk[1], chunk[2], chunk[3]));
            chunk.copy_from_slice(&out.to_array());
        }
    }

    /// Returns the first non-opaque pixel as `(x, y, color)`, if any.
    pub fn find_translucent(&self) -> Option<(u32, u32, Rgba8)> {
        let width = self.width.max(1) as usize;
        self.data
            .chunks_exact(BYTES_PER_PIXEL)
            .position(|px| px[3] != crate::ALPHA_OPAQUE)
            .map(|i| {
                let (x, y) = ((i % width) as u32, (i / width) as u32);
                (x, y, self.pixel(x, y))
            })
    }
}

impl Surface for Image {
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    fn get_pixel(&self, x: u32, y: u32) -> Result<Rgba8> {
        if !self.contains(x, y) {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        Ok(self.pixel(x, y))
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8) -> Result<()> {
        if !self.contains(x, y) {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        self.put_pixel(x, y, color);
        Ok(())
    }

    #[inline]
    fn is_locked(&self) -> bool {
        self.locked
    }

    fn lock_bits(&mut self) -> Result<()> {
        if self.locked {
            return Err(Error::SurfaceLocked);
        }
        // Detach a shared buffer once, up front, instead of on the first write.
        let _ = Arc::make_mut(&mut self.data);
        self.locked = true;
        Ok(())
    }

    fn unlock_bits(&mut self) {
        self.locked = false;
    }

    fn bits_mut(&mut self) -> Result<&mut [u8]> {
        if !self.locked {
            return Err(Error::SurfaceNotLocked);
        }
        Ok(Arc::make_mut(&mut self.data).as_mut_slice())
    }
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("locked", &self.locked)
            .finish()
    }
}
