//! # cvd-vision
//!
//! Color-vision-deficiency simulation in LMS cone-response space.
//!
//! Colors are projected from RGB into LMS, re-projected by a per-condition
//! 3x3 matrix that models the missing or absent cone response, and brought
//! back into 8-bit RGB.
//!
//! ## Modules
//!
//! - [`condition`] - [`VisionCondition`] and the constant matrix table
//! - [`lms`] - the RGB <-> LMS round trip ([`LmsColor`])
//! - [`cache`] - [`ColorCache`], input-to-output memo
//! - [`simulator`] - [`VisionSimulator`] for colors and whole surfaces
//!
//! ## Quick Start
//!
//! ```rust
//! use cvd_core::{Image, Rgba8};
//! use cvd_vision::{simulate_color, VisionCondition, VisionSimulator};
//!
//! // one color, no cache
//! let out = simulate_color(Rgba8::opaque(200, 150, 100), VisionCondition::Deuteranopia)?;
//! assert_eq!(out, Rgba8::opaque(130, 203, 0));
//!
//! // a whole image, in place
//! let mut img = Image::filled(32, 32, Rgba8::opaque(0, 255, 0));
//! VisionSimulator::new().simulate_image(&mut img, VisionCondition::Achromatopsia)?;
//! assert_eq!(img.pixel(0, 0), Rgba8::gray(175));
//! # Ok::<(), cvd_vision::SimError>(())
//! ```
//!
//! ## Input Contract
//!
//! Only fully opaque colors are simulated. A translucent color or pixel fails
//! with an invalid-argument error; images are validated before any pixel is
//! written. [`VisionCondition::TypicalVision`] bypasses everything and hands
//! the input back unchanged.
//!
//! ## Feature Flags
//!
//! - `parallel` (default) - band-parallel image processing via rayon
//! - `serde` - `Serialize`/`Deserialize` for [`VisionCondition`]
//!
//! # Dependencies
//!
//! - [`cvd_core`] - colors, surfaces, pixel locks
//! - [`cvd_math`] - `Mat3`, `Vec3`
//! - `rayon` - optional parallelism
//! - `tracing` - diagnostics
//!
//! # Used By
//!
//! - `cvd-cli` - the `cvd` binary
//! - `cvd-bench` - benchmarks

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cache;
pub mod condition;
pub mod error;
pub mod lms;
pub mod simulator;

pub use cache::ColorCache;
pub use condition::{
    ACHROMATOPSIA, ConditionTransform, DEUTERANOPIA, PROTANOPIA, TRITANOPIA, TYPICAL_VISION,
    VisionCondition, matrix_for, matrix_table,
};
pub use error::{SimError, SimResult};
pub use lms::{FROM_RGB, LmsColor, TO_RGB, transform_color, transform_with_matrix};
pub use simulator::{DEFAULT_PARALLEL_THRESHOLD, SimulationStats, VisionSimulator, simulate_color};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{SimError, SimResult, VisionCondition, VisionSimulator, simulate_color};
    pub use cvd_core::{Image, PixelColor, Rgba8, Surface};
}
