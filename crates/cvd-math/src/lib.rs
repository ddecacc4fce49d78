//! # cvd-math
//!
//! Linear algebra for cone-response color transforms.
//!
//! - [`Mat3`] - 3x3 matrices for basis changes and condition transforms
//! - [`Vec3`] - 3-component vectors for RGB and LMS triplets
//!
//! # Design
//!
//! Everything is `f64`: the RGB -> LMS -> RGB round trip must reproduce every
//! 8-bit channel exactly, which leaves no room for single-precision drift.
//! Matrices are **row-major** and multiply **column vectors**:
//!
//! ```text
//! result = matrix * vector
//! ```
//!
//! # Usage
//!
//! ```rust
//! use cvd_math::{Mat3, Vec3};
//!
//! let half = Mat3::scale(0.5);
//! let v = Vec3::new(200.0, 150.0, 100.0);
//! assert_eq!(half * v, Vec3::new(100.0, 75.0, 50.0));
//! ```
//!
//! # Dependencies
//!
//! - [`glam`] - `DMat3` / `DVec3` interop
//!
//! # Used By
//!
//! - `cvd-vision` - LMS basis matrices and condition matrices

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod mat3;
mod vec3;

pub use mat3::*;
pub use vec3::*;

/// Re-export glam types for direct use
pub mod glam {
    pub use ::glam::{DMat3, DVec3};
}
