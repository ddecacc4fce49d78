//! Vision conditions and their LMS-space transforms.
//!
//! Each [`VisionCondition`] maps to a [`ConditionTransform`]: a constant 3x3
//! matrix applied to the cone-response vector, or [`ConditionTransform::NoOp`]
//! for typical vision. The no-op is a short-circuit, not an identity matrix:
//! callers skip the LMS round trip and hand the input back bit for bit.
//!
//! Matrices follow the Machado/Viénot style dichromat projections published at
//! <https://ixora.io/projects/colorblindness/color-blindness-simulation-research/>.
//!
//! # Example
//!
//! ```rust
//! use cvd_vision::{matrix_for, VisionCondition};
//!
//! assert!(matrix_for(VisionCondition::TypicalVision).is_noop());
//! let m = matrix_for(VisionCondition::Achromatopsia).matrix().unwrap();
//! assert_eq!(m[0], m[1]);
//! ```

use crate::{SimError, SimResult};
use cvd_math::Mat3;
use std::fmt;
use std::str::FromStr;

/// Protanopia: no long-wavelength cones.
pub const PROTANOPIA: Mat3 = Mat3::from_rows([
    [0.0, 1.05118294, -0.05116099],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, -1.0],
]);

/// Deuteranopia: no medium-wavelength cones.
pub const DEUTERANOPIA: Mat3 = Mat3::from_rows([
    [1.0, 0.0, 0.0],
    [0.9513092, 0.0, 0.04866992],
    [0.0, 0.0, -1.0],
]);

/// Tritanopia: no short-wavelength cones.
pub const TRITANOPIA: Mat3 = Mat3::from_rows([
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [-0.86744736, 1.86727089, 0.0],
]);

/// Achromatopsia: every cone reports the same luminance response.
pub const ACHROMATOPSIA: Mat3 = Mat3::from_rows([
    [0.212656, 0.715158, 0.072186],
    [0.212656, 0.715158, 0.072186],
    [0.212656, 0.715158, 0.072186],
]);

/// Explicit identity, for callers that want to run typical vision through
/// the full LMS round trip.
pub const TYPICAL_VISION: Mat3 = Mat3::IDENTITY;

/// A vision condition to simulate.
///
/// The set is closed: an unknown condition cannot be constructed. Untyped
/// tags coming from outside are validated by [`TryFrom<u8>`] and
/// [`FromStr`], both of which fail with an invalid-argument error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VisionCondition {
    /// No deficiency.
    #[default]
    TypicalVision,
    /// Red-blind.
    Protanopia,
    /// Green-blind.
    Deuteranopia,
    /// Blue-blind.
    Tritanopia,
    /// Total color blindness.
    Achromatopsia,
}

impl VisionCondition {
    /// All conditions, in tag order.
    pub const ALL: [Self; 5] = [
        Self::TypicalVision,
        Self::Protanopia,
        Self::Deuteranopia,
        Self::Tritanopia,
        Self::Achromatopsia,
    ];

    /// Conditions that actually change colors.
    pub const DEFICIENT: [Self; 4] = [
        Self::Protanopia,
        Self::Deuteranopia,
        Self::Tritanopia,
        Self::Achromatopsia,
    ];

    /// Canonical lowercase name, used for parsing and file suffixes.
    pub const fn name(self) -> &'static str {
        match self {
            Self::TypicalVision => "typical",
            Self::Protanopia => "protanopia",
            Self::Deuteranopia => "deuteranopia",
            Self::Tritanopia => "tritanopia",
            Self::Achromatopsia => "achromatopsia",
        }
    }

    /// Numeric tag (0..=4).
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// The transform for this condition. Same as [`matrix_for`].
    #[inline]
    pub fn transform(self) -> ConditionTransform {
        matrix_for(self)
    }
}

impl fmt::Display for VisionCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for VisionCondition {
    type Error = SimError;

    fn try_from(tag: u8) -> SimResult<Self> {
        Self::ALL.get(tag as usize).copied().ok_or_else(|| {
            SimError::invalid_argument("condition", format!("unknown vision condition tag {}", tag))
        })
    }
}

impl FromStr for VisionCondition {
    type Err = SimError;

    fn from_str(s: &str) -> SimResult<Self> {
        let key = s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        match key.as_str() {
            "typical" | "typicalvision" | "normal" | "none" => Ok(Self::TypicalVision),
            // common misspelling, accepted for compatibility with older presets
            "protanopia" | "protan" | "protonopia" => Ok(Self::Protanopia),
            "deuteranopia" | "deutan" => Ok(Self::Deuteranopia),
            "tritanopia" | "tritan" => Ok(Self::Tritanopia),
            "achromatopsia" | "achroma" | "mono" | "grayscale" => Ok(Self::Achromatopsia),
            _ => Err(SimError::invalid_argument(
                "condition",
                format!("unknown vision condition '{}'", s),
            )),
        }
    }
}

/// The LMS-space operation for one condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConditionTransform {
    /// Leave colors untouched; skip the LMS round trip entirely.
    NoOp,
    /// Left-multiply the LMS vector by this matrix.
    Matrix(&'static Mat3),
}

impl ConditionTransform {
    /// Returns `true` for the typical-vision sentinel.
    #[inline]
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }

    /// The matrix, or `None` for the no-op.
    #[inline]
    pub fn matrix(&self) -> Option<&'static Mat3> {
        match self {
            Self::NoOp => None,
            Self::Matrix(m) => Some(m),
        }
    }
}

/// Resolves a condition to its transform.
#[inline]
pub fn matrix_for(condition: VisionCondition) -> ConditionTransform {
    match condition {
        VisionCondition::TypicalVision => ConditionTransform::NoOp,
        VisionCondition::Protanopia => ConditionTransform::Matrix(&PROTANOPIA),
        VisionCondition::Deuteranopia => ConditionTransform::Matrix(&DEUTERANOPIA),
        VisionCondition::Tritanopia => ConditionTransform::Matrix(&TRITANOPIA),
        VisionCondition::Achromatopsia => ConditionTransform::Matrix(&ACHROMATOPSIA),
    }
}

/// The whole table as `(condition, transform)` pairs, in tag order.
pub fn matrix_table() -> [(VisionCondition, ConditionTransform); 5] {
    VisionCondition::ALL.map(|c| (c, matrix_for(c)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typical_is_noop() {
        assert!(matrix_for(VisionCondition::TypicalVision).is_noop());
        assert!(matrix_for(VisionCondition::TypicalVision).matrix().is_none());
    }

    #[test]
    fn deficient_conditions_are_distinct_matrices() {
        let mats: Vec<&Mat3> = VisionCondition::DEFICIENT
            .iter()
            .map(|c| matrix_for(*c).matrix().unwrap())
            .collect();
        for i in 0..mats.len() {
            for j in (i + 1)..mats.len() {
                assert_ne!(mats[i], mats[j], "{} vs {}", i, j);
            }
            assert_ne!(*mats[i], Mat3::IDENTITY);
        }
    }

    #[test]
    fn achromatopsia_rows_identical() {
        let m = matrix_for(VisionCondition::Achromatopsia).matrix().unwrap();
        assert_eq!(m.row(0), m.row(1));
        assert_eq!(m.row(1), m.row(2));
    }

    #[test]
    fn table_in_tag_order() {
        let table = matrix_table();
        for (i, (condition, transform)) in table.iter().enumerate() {
            assert_eq!(condition.tag() as usize, i);
            assert_eq!(*transform, condition.transform());
        }
    }

    #[test]
    fn tag_roundtrip_and_rejection() {
        for c in VisionCondition::ALL {
            assert_eq!(VisionCondition::try_from(c.tag()).unwrap(), c);
        }
        let err = VisionCondition::try_from(5).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(VisionCondition::try_from(255).is_err());
    }

    #[test]
    fn parse_names() {
        for c in VisionCondition::ALL {
            assert_eq!(c.name().parse::<VisionCondition>().unwrap(), c);
        }
        assert_eq!("Protonopia".parse::<VisionCondition>().unwrap(), VisionCondition::Protanopia);
        assert_eq!("deutan".parse::<VisionCondition>().unwrap(), VisionCondition::Deuteranopia);
        assert_eq!(
            "Typical-Vision".parse::<VisionCondition>().unwrap(),
            VisionCondition::TypicalVision
        );
        let err = "sepia".parse::<VisionCondition>().unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn default_is_typical() {
        assert_eq!(VisionCondition::default(), VisionCondition::TypicalVision);
    }
}
