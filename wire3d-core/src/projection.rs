/// Orthographic projection from model space to drawing space
use nalgebra::Point2;

use crate::geometry::Point3D;

/// Fixed viewpoint looking down the Z axis.
///
/// Depth is discarded; x and y are scaled by `pixels_per_unit` and are
/// relative to whatever origin the surface has been translated to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orthographic {
    pub pixels_per_unit: f64,
}

impl Orthographic {
    pub fn new(pixels_per_unit: f64) -> Self {
        Self { pixels_per_unit }
    }

    /// Project a point to drawing-space coordinates
    pub fn project(&self, point: &Point3D) -> Point2<f64> {
        Point2::new(
            point.x * self.pixels_per_unit,
            point.y * self.pixels_per_unit,
        )
    }
}

impl Default for Orthographic {
    fn default() -> Self {
        Self::new(100.0)
    }
}
