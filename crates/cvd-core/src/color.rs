//! 8-bit RGBA color values and toolkit adapters.
//!
//! - [`Rgba8`] - the color value every simulation operates on
//! - [`Argb32`] - packed `0xAARRGGBB`, the layout GDI-style bitmaps use
//! - [`PixelColor`] - conversion trait so callers can hand in whatever color
//!   type their UI toolkit produces
//!
//! An [`Rgba8`] can hold any alpha value because toolkits do produce
//! translucent colors. Simulation only accepts opaque colors
//! ([`Rgba8::is_opaque`]); the check happens at the transform boundary.
//!
//! # Example
//!
//! ```rust
//! use cvd_core::{Argb32, PixelColor, Rgba8};
//!
//! let c = Rgba8::opaque(200, 150, 100);
//! assert!(c.is_opaque());
//!
//! let packed = Argb32::from_rgba8(c);
//! assert_eq!(packed.0, 0xFFC89664);
//! assert_eq!(packed.to_rgba8(), c);
//!
//! let parsed: Rgba8 = "#c89664".parse().unwrap();
//! assert_eq!(parsed, c);
//! ```

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Fully opaque alpha value.
pub const ALPHA_OPAQUE: u8 = 255;

/// An 8-bit RGBA color.
///
/// Channel order in memory is R, G, B, A, matching the interleaved layout of
/// [`Image`](crate::Image).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct Rgba8 {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (255 = opaque)
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black.
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    /// Opaque white.
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    /// Creates a color from all four channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a fully opaque color.
    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, ALPHA_OPAQUE)
    }

    /// Creates an opaque gray.
    #[inline]
    pub const fn gray(v: u8) -> Self {
        Self::opaque(v, v, v)
    }

    /// Returns a copy with a different alpha.
    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Returns `true` if alpha is 255.
    #[inline]
    pub const fn is_opaque(self) -> bool {
        self.a == ALPHA_OPAQUE
    }

    /// Returns `[r, g, b, a]`.
    #[inline]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Creates from `[r, g, b, a]`.
    #[inline]
    pub const fn from_array(a: [u8; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }

    /// Returns `[r, g, b]` as real-valued scalars in 0..=255.
    #[inline]
    pub fn rgb_f64(self) -> [f64; 3] {
        [self.r as f64, self.g as f64, self.b as f64]
    }

    /// Formats as `#rrggbb`, or `#rrggbbaa` when not opaque.
    pub fn to_hex(self) -> String {
        if self.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgba8 {
    type Err = Error;

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        let bad = || Error::other(format!("invalid hex color: '{}'", s));
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
        match hex.len() {
            3 => {
                let nib = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| bad())
                };
                Ok(Self::opaque(nib(0)?, nib(1)?, nib(2)?))
            }
            6 => Ok(Self::opaque(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(bad()),
        }
    }
}

/// Packed `0xAARRGGBB` color, as stored by 32bpp ARGB bitmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Argb32(pub u32);

impl Argb32 {
    /// Alpha channel.
    #[inline]
    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Red channel.
    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel.
    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel.
    #[inline]
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// Packs four channels.
    #[inline]
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }
}

/// A toolkit color type that can be carried through the simulator.
///
/// Implementations must be lossless for all four channels.
pub trait PixelColor: Copy {
    /// Converts to [`Rgba8`].
    fn to_rgba8(self) -> Rgba8;

    /// Converts from [`Rgba8`].
    fn from_rgba8(color: Rgba8) -> Self;
}

impl PixelColor for Rgba8 {
    #[inline]
    fn to_rgba8(self) -> Rgba8 {
        self
    }

    #[inline]
    fn from_rgba8(color: Rgba8) -> Self {
        color
    }
}

impl PixelColor for [u8; 4] {
    #[inline]
    fn to_rgba8(self) -> Rgba8 {
        Rgba8::from_array(self)
    }

    #[inline]
    fn from_rgba8(color: Rgba8) -> Self {
        color.to_array()
    }
}

impl PixelColor for Argb32 {
    #[inline]
    fn to_rgba8(self) -> Rgba8 {
        Rgba8::new(self.r(), self.g(), self.b(), self.a())
    }

    #[inline]
    fn from_rgba8(c: Rgba8) -> Self {
        Self::from_argb(c.a, c.r, c.g, c.b)
    }
}

impl From<Argb32> for Rgba8 {
    fn from(c: Argb32) -> Self {
        c.to_rgba8()
    }
}

impl From<Rgba8> for Argb32 {
    fn from(c: Rgba8) -> Self {
        Argb32::from_rgba8(c)
    }
}
