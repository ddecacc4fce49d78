//! RGB <-> LMS cone-response transform.
//!
//! An opaque 8-bit color is taken as the real vector `[r, g, b]` in 0..=255
//! (no gamma), projected into LMS with [`FROM_RGB`], optionally re-projected
//! by a condition matrix, and brought back with [`TO_RGB`]. Only the final
//! RGB channels are rounded and clamped; LMS values stay unbounded.
//!
//! ```text
//!   rgb ──FROM_RGB──> lms ──condition──> lms' ──TO_RGB──> round, clamp ──> rgb'
//! ```
//!
//! [`TO_RGB`] inverts [`FROM_RGB`] closely enough that the round trip without
//! a condition reproduces every opaque 8-bit color exactly.
//!
//! # Example
//!
//! ```rust
//! use cvd_core::Rgba8;
//! use cvd_math::Mat3;
//! use cvd_vision::LmsColor;
//!
//! let input = Rgba8::opaque(200, 150, 100);
//! let mut lms = LmsColor::from_rgb(input).unwrap();
//! lms.apply_transform(&Mat3::scale(0.5)).unwrap();
//! lms.apply_transform(&Mat3::scale(2.0)).unwrap();
//! assert_eq!(lms.to_rgb(), input);
//! ```

use crate::{ConditionTransform, SimError, SimResult};
use cvd_core::Rgba8;
use cvd_math::{Mat3, Vec3};

/// RGB to LMS (cone fundamentals).
pub const FROM_RGB: Mat3 = Mat3::from_rows([
    [0.31399022, 0.63951294, 0.04649755],
    [0.15537241, 0.75789446, 0.08670142],
    [0.01775239, 0.10944209, 0.87256922],
]);

/// LMS to RGB, the inverse of [`FROM_RGB`].
pub const TO_RGB: Mat3 = Mat3::from_rows([
    [5.47221206, -4.6419601, 0.16963708],
    [-1.1252419, 2.29317094, -0.1678952],
    [0.02980165, -0.19318073, 1.16364789],
]);

/// A color in LMS cone-response space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LmsColor {
    lms: Vec3,
}

impl LmsColor {
    /// Projects an opaque color into LMS.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidArgument`] if `input.a != 255`. The cone model
    /// assumes direct scene-light reflectance; blended colors have no
    /// meaning in it.
    pub fn from_rgb(input: Rgba8) -> SimResult<Self> {
        ensure_opaque(input)?;
        Ok(Self {
            lms: FROM_RGB * Vec3::from_array(input.rgb_f64()),
        })
    }

    /// The raw LMS vector.
    #[inline]
    pub fn lms(&self) -> Vec3 {
        self.lms
    }

    /// Left-multiplies the LMS vector by `transform`.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidArgument`] if the matrix holds NaN or infinite
    /// entries.
    pub fn apply_transform(&mut self, transform: &Mat3) -> SimResult<()> {
        if !transform.is_finite() {
            return Err(SimError::invalid_argument(
                "transform",
                "matrix contains non-finite entries",
            ));
        }
        self.lms = transform * self.lms;
        Ok(())
    }

    /// Projects back to RGB, rounding and clamping each channel into 0..=255.
    /// The result is opaque.
    pub fn to_rgb(&self) -> Rgba8 {
        let rgb = TO_RGB * self.lms;
        Rgba8::opaque(
            nearest_channel(rgb.x),
            nearest_channel(rgb.y),
            nearest_channel(rgb.z),
        )
    }
}

/// Rounds to nearest (ties to even) and clamps into a valid channel value.
///
/// NaN maps to 0.
#[inline]
pub fn nearest_channel(v: f64) -> u8 {
    // `as` saturates and sends NaN to 0; clamp first to keep the intent visible
    v.round_ties_even().clamp(0.0, 255.0) as u8
}

/// Fails with [`SimError::InvalidArgument`] unless the color is opaque.
#[inline]
pub fn ensure_opaque(color: Rgba8) -> SimResult<()> {
    if color.is_opaque() {
        Ok(())
    } else {
        Err(SimError::invalid_argument(
            "input",
            format!("alpha colors are not supported (alpha = {})", color.a),
        ))
    }
}

/// Runs one color through a condition transform.
///
/// [`ConditionTransform::NoOp`] returns `color` unchanged without
/// validating it.
pub fn transform_color(color: Rgba8, transform: &ConditionTransform) -> SimResult<Rgba8> {
    match transform {
        ConditionTransform::NoOp => Ok(color),
        ConditionTransform::Matrix(m) => transform_with_matrix(color, m),
    }
}

/// Runs one color through an arbitrary LMS-space matrix.
pub fn transform_with_matrix(color: Rgba8, matrix: &Mat3) -> SimResult<Rgba8> {
    let mut lms = LmsColor::from_rgb(color)?;
    lms.apply_transform(matrix)?;
    Ok(lms.to_rgb())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Opaque sample colors spread over the cube, including its corners.
    fn sample_colors() -> Vec<Rgba8> {
        let steps = [0u8, 1, 17, 64, 127, 128, 200, 254, 255];
        let mut out = Vec::new();
        for &r in &steps {
            for &g in &steps {
                for &b in &steps {
                    out.push(Rgba8::opaque(r, g, b));
                }
            }
        }
        out
    }

    #[test]
    fn basis_matrices_are_inverses() {
        assert!((TO_RGB * FROM_RGB).abs_diff_eq(&Mat3::IDENTITY, 1e-7));
        let inv = FROM_RGB.inverse().unwrap();
        assert_abs_diff_eq!(inv.m[0][0], TO_RGB.m[0][0], epsilon = 1e-5);
    }

    #[test]
    fn from_rgb_rejects_alpha() {
        let err = LmsColor::from_rgb(Rgba8::new(0, 255, 255, 128)).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(LmsColor::from_rgb(Rgba8::new(0, 0, 0, 0)).is_err());
        assert!(LmsColor::from_rgb(Rgba8::new(0, 0, 0, 254)).is_err());
    }

    #[test]
    fn from_rgb_accepts_opaque() {
        assert!(LmsColor::from_rgb(Rgba8::opaque(0, 255, 255)).is_ok());
    }

    #[test]
    fn round_trip_without_transform_is_exact() {
        for input in sample_colors() {
            let rgb = LmsColor::from_rgb(input).unwrap().to_rgb();
            assert_eq!(rgb, input, "{}", input);
        }
    }

    #[test]
    fn non_finite_transform_rejected() {
        let mut lms = LmsColor::from_rgb(Rgba8::gray(128)).unwrap();
        let before = lms;
        let mut bad = Mat3::IDENTITY;
        bad.m[0][0] = f64::INFINITY;
        let err = lms.apply_transform(&bad).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(lms, before);
    }

    #[test]
    fn fifty_percent_reduces_channels() {
        let half = Mat3::scale(0.5);
        for input in sample_colors() {
            let out = transform_with_matrix(input, &half).unwrap();
            assert!(out.a <= input.a);
            assert!(out.r <= input.r, "{} -> {}", input, out);
            assert!(out.g <= input.g, "{} -> {}", input, out);
            assert!(out.b <= input.b, "{} -> {}", input, out);
        }
        let out = transform_with_matrix(Rgba8::opaque(200, 150, 100), &half).unwrap();
        assert_eq!(out, Rgba8::opaque(100, 75, 50));
    }

    #[test]
    fn half_then_double_restores_input() {
        for input in sample_colors() {
            let mut lms = LmsColor::from_rgb(input).unwrap();
            lms.apply_transform(&Mat3::scale(0.5)).unwrap();
            lms.apply_transform(&Mat3::scale(2.0)).unwrap();
            assert_eq!(lms.to_rgb(), input);
        }
    }

    #[test]
    fn out_of_range_is_clamped() {
        let blow_up = Mat3::scale(10.0);
        let out = transform_with_matrix(Rgba8::opaque(200, 150, 100), &blow_up).unwrap();
        assert_eq!(out, Rgba8::WHITE);

        let negate = Mat3::scale(-1.0);
        let out = transform_with_matrix(Rgba8::opaque(200, 150, 100), &negate).unwrap();
        assert_eq!(out, Rgba8::BLACK);

        // LMS is not clamped before the inverse: a huge intermediate that
        // cancels out still lands back in range.
        let mut lms = LmsColor::from_rgb(Rgba8::opaque(10, 20, 30)).unwrap();
        lms.apply_transform(&Mat3::scale(1000.0)).unwrap();
        assert!(lms.lms().max_element() > 255.0);
        lms.apply_transform(&Mat3::scale(0.001)).unwrap();
        assert_eq!(lms.to_rgb(), Rgba8::opaque(10, 20, 30));
    }

    #[test]
    fn nearest_channel_rounds_and_clamps() {
        assert_eq!(nearest_channel(-0.4), 0);
        assert_eq!(nearest_channel(-300.0), 0);
        assert_eq!(nearest_channel(254.5), 254);
        assert_eq!(nearest_channel(253.5), 254);
        assert_eq!(nearest_channel(255.49), 255);
        assert_eq!(nearest_channel(1e9), 255);
        assert_eq!(nearest_channel(f64::NAN), 0);
    }

    #[test]
    fn noop_passes_through_untouched() {
        // even colors the transform would reject
        let translucent = Rgba8::new(1, 2, 3, 4);
        assert_eq!(
            transform_color(translucent, &ConditionTransform::NoOp).unwrap(),
            translucent
        );
    }
}
