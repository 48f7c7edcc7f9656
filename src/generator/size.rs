//! Target size calculation.

use std::fmt;

use serde::Serialize;

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.width, self.height)
    }
}

/// Size of a variant for `target_multiplier`, given a source authored at
/// `source_multiplier`.
///
/// Each axis is scaled independently and rounded up, so a generated asset is
/// never smaller than the ideal real-valued size.
pub fn target_size(source: Dimensions, source_multiplier: f64, target_multiplier: f64) -> Dimensions {
    Dimensions {
        width: scale_axis(source.width, source_multiplier, target_multiplier),
        height: scale_axis(source.height, source_multiplier, target_multiplier),
    }
}

fn scale_axis(pixels: u32, source_multiplier: f64, target_multiplier: f64) -> u32 {
    // Multiply before dividing: exact for every catalog multiplier, so an
    // integral result never picks up a stray ulp and rounds up one pixel.
    let scaled = (pixels as f64 * target_multiplier / source_multiplier).ceil();
    (scaled as u32).max(1)
}
