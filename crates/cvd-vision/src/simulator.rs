//! Single-color and whole-image simulation.
//!
//! [`VisionSimulator`] ties the pieces together: it resolves a condition to
//! its transform, skips typical vision outright, and otherwise runs colors
//! through the LMS round trip behind a [`ColorCache`].
//!
//! # Cache scope
//!
//! - Single colors: the simulator keeps one cache per condition for its
//!   whole lifetime, so switching conditions between calls never serves a
//!   result computed for another condition.
//! - Images: every [`simulate_image`](VisionSimulator::simulate_image) call
//!   builds fresh caches, scoped to that (image, condition) pair.
//!
//! # Parallelism
//!
//! With the `parallel` feature, images of at least
//! [`DEFAULT_PARALLEL_THRESHOLD`] pixels are split into row bands processed
//! on the rayon pool, one cache per band. Output is identical to the
//! sequential path.
//!
//! # Example
//!
//! ```rust
//! use cvd_core::{Image, Rgba8};
//! use cvd_vision::{VisionCondition, VisionSimulator};
//!
//! let mut sim = VisionSimulator::new();
//! let mut img = Image::filled(8, 8, Rgba8::opaque(255, 0, 0));
//! let stats = sim.simulate_image(&mut img, VisionCondition::Protanopia).unwrap();
//!
//! assert_eq!(stats.pixels, 64);
//! assert_eq!(stats.unique_colors, 1);
//! assert_eq!(img.pixel(0, 0), Rgba8::opaque(42, 45, 0));
//! ```

use crate::lms::transform_with_matrix;
use crate::{matrix_for, ColorCache, ConditionTransform, SimError, SimResult, VisionCondition};
use cvd_core::{PixelColor, PixelLock, Rgba8, Surface, BYTES_PER_PIXEL};
use cvd_math::Mat3;
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Pixel count from which images are processed in parallel bands.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256 * 256;

/// Summary of one [`VisionSimulator::simulate_image`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationStats {
    /// Pixels rewritten. Zero when the condition is a no-op.
    pub pixels: usize,
    /// Colors that went through the LMS round trip. A color appearing in
    /// several parallel bands is counted once per band.
    pub unique_colors: usize,
    /// Pixels answered from a cache.
    pub cache_hits: u64,
}

impl SimulationStats {
    fn merge(self, other: Self) -> Self {
        Self {
            pixels: self.pixels + other.pixels,
            unique_colors: self.unique_colors + other.unique_colors,
            cache_hits: self.cache_hits + other.cache_hits,
        }
    }
}

/// Color-vision-deficiency simulator.
#[derive(Debug, Clone)]
pub struct VisionSimulator {
    /// Single-color caches, indexed by condition tag
    caches: [ColorCache; VisionCondition::ALL.len()],
    parallel: bool,
    parallel_threshold: usize,
}

impl Default for VisionSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl VisionSimulator {
    /// Creates a simulator with empty caches and default settings.
    pub fn new() -> Self {
        Self {
            caches: Default::default(),
            parallel: cfg!(feature = "parallel"),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Enables or disables band-parallel image processing.
    ///
    /// Has no effect without the `parallel` feature.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the pixel count from which images are processed in parallel.
    pub fn with_parallel_threshold(mut self, pixels: usize) -> Self {
        self.parallel_threshold = pixels;
        self
    }

    /// Read access to the condition table.
    pub fn matrix_table(&self) -> [(VisionCondition, ConditionTransform); 5] {
        crate::matrix_table()
    }

    /// The single-color cache for `condition`.
    pub fn cache(&self, condition: VisionCondition) -> &ColorCache {
        &self.caches[condition.tag() as usize]
    }

    /// Empties every single-color cache.
    pub fn clear_caches(&mut self) {
        self.caches.iter_mut().for_each(ColorCache::clear);
    }

    /// Simulates one color under `condition`.
    ///
    /// Typical vision returns `color` unchanged. Otherwise the result is
    /// memoized per condition.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidArgument`] if the color is not fully opaque.
    pub fn simulate_color<C: PixelColor>(
        &mut self,
        color: C,
        condition: VisionCondition,
    ) -> SimResult<C> {
        let ConditionTransform::Matrix(matrix) = matrix_for(condition) else {
            return Ok(color);
        };
        let cache = &mut self.caches[condition.tag() as usize];
        let out = cache.try_get_or_compute(color.to_rgba8(), |c| transform_with_matrix(c, matrix))?;
        Ok(C::from_rgba8(out))
    }

    /// [`simulate_color`](Self::simulate_color) for plain [`Rgba8`].
    #[inline]
    pub fn simulate_rgba8(&mut self, color: Rgba8, condition: VisionCondition) -> SimResult<Rgba8> {
        self.simulate_color(color, condition)
    }

    /// Simulates `condition` over every pixel of `image`, in place.
    ///
    /// Typical vision returns at once without locking the surface. Otherwise
    /// the surface is locked for the duration of the call and unlocked on
    /// every exit path.
    ///
    /// # Errors
    ///
    /// - [`SimError::NonOpaquePixel`] for the first pixel (row-major) whose
    ///   alpha is not 255. The image is left untouched.
    /// - [`SimError::Core`] if the surface cannot be locked.
    pub fn simulate_image<S: Surface + ?Sized>(
        &mut self,
        image: &mut S,
        condition: VisionCondition,
    ) -> SimResult<SimulationStats> {
        let (width, height) = image.dimensions();
        trace!(width, height, %condition, "simulate_image");

        let ConditionTransform::Matrix(matrix) = matrix_for(condition) else {
            debug!(%condition, "no-op condition, image left untouched");
            return Ok(SimulationStats::default());
        };
        if width == 0 || height == 0 {
            return Ok(SimulationStats::default());
        }

        let mut lock = PixelLock::acquire(image)?;
        if let Some(err) = first_translucent(lock.pixels_mut()?, width) {
            return Err(err);
        }

        let pixel_count = lock.pixel_count();
        let stats = if self.use_parallel(pixel_count) {
            let row_bytes = lock.row_bytes();
            run_parallel(lock.pixels_mut()?, row_bytes, height as usize, matrix)?
        } else {
            let mut cache = ColorCache::new();
            lock.try_for_each_pixel(|px| {
                cache.try_get_or_compute(px, |c| transform_with_matrix(c, matrix))
            })?;
            SimulationStats {
                pixels: pixel_count,
                unique_colors: cache.len(),
                cache_hits: cache.hits(),
            }
        };

        debug!(
            %condition,
            pixels = stats.pixels,
            unique_colors = stats.unique_colors,
            cache_hits = stats.cache_hits,
            "simulated image"
        );
        Ok(stats)
    }

    /// Clones `image` and simulates the clone, leaving `image` as it was.
    pub fn simulated_copy<S: Surface + Clone>(
        &mut self,
        image: &S,
        condition: VisionCondition,
    ) -> SimResult<S> {
        let mut copy = image.clone();
        self.simulate_image(&mut copy, condition)?;
        Ok(copy)
    }

    #[inline]
    fn use_parallel(&self, pixel_count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && pixel_count >= self.parallel_threshold
    }
}

/// Simulates one color without any caching.
///
/// ```rust
/// use cvd_core::Rgba8;
/// use cvd_vision::{simulate_color, VisionCondition};
///
/// let out = simulate_color(Rgba8::opaque(0, 0, 255), VisionCondition::Tritanopia).unwrap();
/// assert_eq!(out, Rgba8::opaque(0, 32, 32));
/// ```
pub fn simulate_color<C: PixelColor>(color: C, condition: VisionCondition) -> SimResult<C> {
    match matrix_for(condition) {
        ConditionTransform::NoOp => Ok(color),
        ConditionTransform::Matrix(m) => Ok(C::from_rgba8(transform_with_matrix(color.to_rgba8(), m)?)),
    }
}

/// Error for the first non-opaque pixel in `bits`, if any.
fn first_translucent(bits: &[u8], width: u32) -> Option<SimError> {
    let width = width as usize;
    bits.chunks_exact(BYTES_PER_PIXEL)
        .position(|px| px[3] != cvd_core::ALPHA_OPAQUE)
        .map(|i| SimError::NonOpaquePixel {
            x: (i % width) as u32,
            y: (i / width) as u32,
            alpha: bits[i * BYTES_PER_PIXEL + 3],
        })
}

/// Rewrites one contiguous run of pixels through its own cache.
fn run_band(band: &mut [u8], matrix: &Mat3) -> SimResult<SimulationStats> {
    let mut cache = ColorCache::new();
    for px in band.chunks_exact_mut(BYTES_PER_PIXEL) {
        let input = Rgba8::new(px[0], px[1], px[2], px[3]);
        let out = cache.try_get_or_compute(input, |c| transform_with_matrix(c, matrix))?;
        px.copy_from_slice(&out.to_array());
    }
    Ok(SimulationStats {
        pixels: band.len() / BYTES_PER_PIXEL,
        unique_colors: cache.len(),
        cache_hits: cache.hits(),
    })
}

#[cfg(feature = "parallel")]
fn run_parallel(
    bits: &mut [u8],
    row_bytes: usize,
    height: usize,
    matrix: &Mat3,
) -> SimResult<SimulationStats> {
    // A few bands per thread keeps the pool busy without shrinking the caches.
    let bands = rayon::current_num_threads().max(1) * 4;
    let rows_per_band = height.div_ceil(bands).max(1);
    trace!(rows_per_band, "parallel bands");

    bits.par_chunks_mut(row_bytes * rows_per_band)
        .map(|band| run_band(band, matrix))
        .try_reduce(SimulationStats::default, |a, b| Ok(a.merge(b)))
}

#[cfg(not(feature = "parallel"))]
fn run_parallel(
    bits: &mut [u8],
    _row_bytes: usize,
    _height: usize,
    matrix: &Mat3,
) -> SimResult<SimulationStats> {
    run_band(bits, matrix)
}
