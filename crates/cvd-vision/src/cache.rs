//! Input-to-output color memo.
//!
//! Natural images repeat colors heavily, and the LMS round trip costs two
//! matrix products per pixel. [`ColorCache`] remembers the simulated output
//! for each input color it has seen.
//!
//! A cache is only valid for one condition. Simulating with another
//! condition needs another cache (or a [`clear`](ColorCache::clear)).
//!
//! # Example
//!
//! ```rust
//! use cvd_core::Rgba8;
//! use cvd_vision::ColorCache;
//!
//! let mut cache = ColorCache::new();
//! let inverted = |c: Rgba8| Rgba8::opaque(255 - c.r, 255 - c.g, 255 - c.b);
//!
//! assert_eq!(cache.get_or_compute(Rgba8::BLACK, inverted), Rgba8::WHITE);
//! assert_eq!(cache.get_or_compute(Rgba8::BLACK, inverted), Rgba8::WHITE);
//! assert_eq!((cache.hits(), cache.misses()), (1, 1));
//! ```

use cvd_core::Rgba8;
use std::collections::HashMap;

/// Memo from input color to simulated color.
///
/// Mutation takes `&mut self`; parallel workers each own one.
#[derive(Debug, Default, Clone)]
pub struct ColorCache {
    entries: HashMap<Rgba8, Rgba8>,
    hits: u64,
    misses: u64,
}

impl ColorCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache with room for `capacity` colors.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Returns the cached output for `input`, calling `compute` only on a miss.
    pub fn get_or_compute<F>(&mut self, input: Rgba8, compute: F) -> Rgba8
    where
        F: FnOnce(Rgba8) -> Rgba8,
    {
        if let Some(&out) = self.entries.get(&input) {
            self.hits += 1;
            return out;
        }
        self.misses += 1;
        let out = compute(input);
        self.entries.insert(input, out);
        out
    }

    /// Fallible [`get_or_compute`](Self::get_or_compute).
    ///
    /// A failed `compute` stores nothing.
    pub fn try_get_or_compute<E, F>(&mut self, input: Rgba8, compute: F) -> Result<Rgba8, E>
    where
        F: FnOnce(Rgba8) -> Result<Rgba8, E>,
    {
        if let Some(&out) = self.entries.get(&input) {
            self.hits += 1;
            return Ok(out);
        }
        self.misses += 1;
        let out = compute(input)?;
        self.entries.insert(input, out);
        Ok(out)
    }

    /// Looks up a color without computing.
    #[inline]
    pub fn get(&self, input: &Rgba8) -> Option<Rgba8> {
        self.entries.get(input).copied()
    }

    /// Number of distinct colors stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache.
    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that had to compute.
    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Drops all entries and resets the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn swap_rb(c: Rgba8) -> Rgba8 {
        Rgba8::opaque(c.b, c.g, c.r)
    }

    #[test]
    fn compute_called_once_per_color() {
        let calls = Cell::new(0);
        let mut cache = ColorCache::new();
        let input = Rgba8::opaque(10, 20, 30);
        for _ in 0..5 {
            let out = cache.get_or_compute(input, |c| {
                calls.set(calls.get() + 1);
                swap_rb(c)
            });
            assert_eq!(out, Rgba8::opaque(30, 20, 10));
        }
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 4);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn two_colors_two_entries() {
        let calls = Cell::new(0);
        let mut cache = ColorCache::with_capacity(4);
        let a = Rgba8::opaque(1, 2, 3);
        let b = Rgba8::opaque(4, 5, 6);
        for input in [a, b, a, b] {
            cache.get_or_compute(input, |c| {
                calls.set(calls.get() + 1);
                swap_rb(c)
            });
        }
        assert_eq!(calls.get(), 2);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&a), Some(Rgba8::opaque(3, 2, 1)));
        assert_eq!(cache.get(&b), Some(Rgba8::opaque(6, 5, 4)));
    }

    #[test]
    fn alpha_is_part_of_the_key() {
        let mut cache = ColorCache::new();
        cache.get_or_compute(Rgba8::WHITE, |_| Rgba8::BLACK);
        assert_eq!(cache.get(&Rgba8::WHITE.with_alpha(0)), None);
    }

    #[test]
    fn failed_compute_stores_nothing() {
        let mut cache = ColorCache::new();
        let res: Result<Rgba8, &str> = cache.try_get_or_compute(Rgba8::WHITE, |_| Err("nope"));
        assert!(res.is_err());
        assert!(cache.is_empty());

        let res: Result<Rgba8, &str> = cache.try_get_or_compute(Rgba8::WHITE, |c| Ok(c));
        assert_eq!(res, Ok(Rgba8::WHITE));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_resets() {
        let mut cache = ColorCache::new();
        cache.get_or_compute(Rgba8::WHITE, swap_rb);
        cache.get_or_compute(Rgba8::WHITE, swap_rb);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!((cache.hits(), cache.misses()), (0, 0));
    }
}
