//! Benchmarks for the cvd crates.
//!
//! Run with: `cargo bench -p cvd-bench`
//!
//! The library only hosts input generators shared by the benches.

use cvd_core::{Image, Rgba8};

/// Image with few distinct colors, like a UI screenshot or illustration.
pub fn flat_image(width: u32, height: u32, palette_size: u8) -> Image {
    let palette_size = palette_size.max(1) as u32;
    let mut img = Image::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let i = ((x / 64) + (y / 64) * 7) % palette_size;
            let v = (i * 37 % 256) as u8;
            img.put_pixel(x, y, Rgba8::opaque(v, 255 - v, v / 2));
        }
    }
    img
}

/// Image where nearly every pixel is a new color.
pub fn noise_image(width: u32, height: u32) -> Image {
    let mut state = 0x2545_F491_u32;
    let mut img = Image::new(width, height);
    for y in 0..height {
        for x in 0..width {
            // xorshift32
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let [r, g, b, _] = state.to_le_bytes();
            img.put_pixel(x, y, Rgba8::opaque(r, g, b));
        }
    }
    img
}
