//! Unit newtypes for the two length spaces
//!
//! `Pt` is a PDF point (1/72 inch), `Px` is a CSS pixel of the rendered
//! preview. Normalized page fractions stay plain `f64`.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Length in PDF points
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pt(pub f64);

/// Length in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Px(pub f64);

macro_rules! impl_length_ops {
    ($unit:ident) => {
        impl $unit {
            pub const ZERO: $unit = $unit(0.0);

            /// Raw value, unit stripped
            pub fn get(self) -> f64 {
                self.0
            }

            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl Add for $unit {
            type Output = $unit;
            fn add(self, rhs: $unit) -> $unit {
                $unit(self.0 + rhs.0)
            }
        }

        impl Sub for $unit {
            type Output = $unit;
            fn sub(self, rhs: $unit) -> $unit {
                $unit(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $unit {
            type Output = $unit;
            fn mul(self, rhs: f64) -> $unit {
                $unit(self.0 * rhs)
            }
        }

        /// Dividing two lengths of the same unit yields a unitless ratio
        impl Div for $unit {
            type Output = f64;
            fn div(self, rhs: $unit) -> f64 {
                self.0 / rhs.0
            }
        }
    };
}

impl_length_ops!(Pt);
impl_length_ops!(Px);

/// Intrinsic page dimensions in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSizePt {
    pub width_pt: Pt,
    pub height_pt: Pt,
}

impl PageSizePt {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width_pt: Pt(width),
            height_pt: Pt(height),
        }
    }

    /// US Letter, 612 x 792 pt
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    /// Same page with width and height exchanged (90/270 degree rotation)
    pub fn swapped(self) -> Self {
        Self {
            width_pt: self.height_pt,
            height_pt: self.width_pt,
        }
    }
}

/// Field width/height in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizePt {
    pub width_pt: Pt,
    pub height_pt: Pt,
}

impl SizePt {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width_pt: Pt(width),
            height_pt: Pt(height),
        }
    }
}

/// Width/height in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizePx {
    pub width_px: Px,
    pub height_px: Px,
}

impl SizePx {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width_px: Px(width),
            height_px: Px(height),
        }
    }
}

/// A point in PDF user space (bottom-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointPt {
    pub x_pt: Pt,
    pub y_pt: Pt,
}
