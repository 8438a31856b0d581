/// Rotation about the X and Y axes
use nalgebra::{UnitQuaternion, Vector3};

use crate::config::RenderConfig;
use crate::geometry::{draw_wireframe, Mesh, Point3D, PointId, Wireframe};
use crate::surface::DrawSurface;

/// Incremental rotation, angles in radians.
///
/// Calls compose onto whatever orientation the target already has and do
/// not commute; interactive callers apply Y before X.
pub trait Rotate {
    fn rotate_x(&mut self, theta: f64);
    fn rotate_y(&mut self, theta: f64);
}

/// Rotate in the (z, y) plane: `z' = z cos - y sin`, `y' = y cos + z sin`.
///
/// Both outputs are computed from the input coordinates.
pub fn rotated_x(p: &Point3D, sin: f64, cos: f64) -> Point3D {
    Point3D::new(p.x, p.y * cos + p.z * sin, p.z * cos - p.y * sin)
}

/// Rotate in the (x, z) plane: `x' = x cos - z sin`, `z' = z cos + x sin`.
pub fn rotated_y(p: &Point3D, sin: f64, cos: f64) -> Point3D {
    Point3D::new(p.x * cos - p.z * sin, p.y, p.z * cos + p.x * sin)
}

/// Drift-free alternative to rotating a `Mesh` in place.
///
/// Keeps the mesh's original coordinates untouched and accumulates a single
/// unit quaternion, renormalized after every step. Points are rotated fresh
/// whenever they are read or drawn, so rounding error never compounds into
/// the stored geometry.
#[derive(Debug, Clone)]
pub struct OrientedMesh {
    base: Mesh,
    orientation: UnitQuaternion<f64>,
}

impl OrientedMesh {
    pub fn new(base: Mesh) -> Self {
        Self {
            base,
            orientation: UnitQuaternion::identity(),
        }
    }

    pub fn base(&self) -> &Mesh {
        &self.base
    }

    pub fn orientation(&self) -> &UnitQuaternion<f64> {
        &self.orientation
    }

    /// Forget all accumulated rotation
    pub fn reset(&mut self) {
        self.orientation = UnitQuaternion::identity();
    }

    /// Base points with the current orientation applied
    pub fn current_points(&self) -> Vec<Point3D> {
        self.base
            .points()
            .iter()
            .map(|p| Point3D::from(self.orientation * p.to_point()))
            .collect()
    }

    /// Bake the orientation into a plain mesh
    pub fn to_mesh(&self) -> Mesh {
        let mut mesh = self.base.clone();
        for (id, point) in self.current_points().into_iter().enumerate() {
            if let Some(p) = mesh.point_mut(PointId(id)) {
                *p = point;
            }
        }
        mesh
    }

    fn compose(&mut self, step: UnitQuaternion<f64>) {
        self.orientation = step * self.orientation;
        self.orientation.renormalize();
    }
}

impl Rotate for OrientedMesh {
    // rotated_x/rotated_y turn the opposite way to a right-handed rotation
    // about the same axis, hence the negated angles.
    fn rotate_x(&mut self, theta: f64) {
        self.compose(UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -theta));
    }

    fn rotate_y(&mut self, theta: f64) {
        self.compose(UnitQuaternion::from_axis_angle(&Vector3::y_axis(), -theta));
    }
}

impl Wireframe for OrientedMesh {
    fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S, config: &RenderConfig) {
        draw_wireframe(&self.current_points(), self.base.segments(), surface, config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_rotated_uses_prior_values() {
        let p = Point3D::new(1.0, 2.0, 3.0);
        let (sin, cos) = 0.4f64.sin_cos();

        let q = rotated_x(&p, sin, cos);
        assert_relative_eq!(q.y, 2.0 * cos + 3.0 * sin);
        assert_relative_eq!(q.z, 3.0 * cos - 2.0 * sin);

        let r = rotated_y(&p, sin, cos);
        assert_relative_eq!(r.x, cos - 3.0 * sin);
        assert_relative_eq!(r.z, 3.0 * cos + sin);
    }

    #[test]
    fn test_rotations_do_not_commute() {
        let mut xy = Mesh::cube(2.0);
        xy.rotate_x(0.5);
        xy.rotate_y(0.8);

        let mut yx = Mesh::cube(2.0);
        yx.rotate_y(0.8);
        yx.rotate_x(0.5);

        let moved = xy
            .points()
            .iter()
            .zip(yx.points())
            .any(|(a, b)| a.distance(b) > 1e-6);
        assert!(moved);
    }

    #[test]
    fn test_oriented_matches_in_place() {
        let mut in_place = Mesh::cube(2.0);
        let mut oriented = OrientedMesh::new(Mesh::cube(2.0));

        for (dy, dx) in [(0.3, -0.1), (1.2, 0.4), (-0.7, 2.0), (FRAC_PI_2, FRAC_PI_2)] {
            in_place.rotate_y(dy);
            in_place.rotate_x(dx);
            oriented.rotate_y(dy);
            oriented.rotate_x(dx);
        }

        for (a, b) in in_place.points().iter().zip(oriented.current_points()) {
            assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
            assert_relative_eq!(a.z, b.z, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_oriented_keeps_base_untouched() {
        let mut oriented = OrientedMesh::new(Mesh::cube(2.0));
        oriented.rotate_y(1.0);
        assert_eq!(oriented.base().points(), Mesh::cube(2.0).points());

        oriented.reset();
        assert_eq!(oriented.current_points(), Mesh::cube(2.0).points());
    }

    #[test]
    fn test_oriented_stays_rigid_over_many_steps() {
        let mut oriented = OrientedMesh::new(Mesh::cube(2.0));
        for _ in 0..100_000 {
            oriented.rotate_y(0.0173);
            oriented.rotate_x(-0.0091);
        }

        let mesh = oriented.to_mesh();
        for segment in mesh.segments() {
            let (a, b) = mesh.segment_endpoints(segment).unwrap();
            assert_relative_eq!(a.distance(b), 2.0, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_oriented_draws_rotated_points() {
        let mut oriented = OrientedMesh::new(Mesh::cube(2.0));
        oriented.rotate_y(0.6);

        let mut expected = Mesh::cube(2.0);
        expected.rotate_y(0.6);

        let config = RenderConfig::default();
        let mut a = RecordingSurface::new();
        let mut b = RecordingSurface::new();
        oriented.draw(&mut a, &config);
        expected.draw(&mut b, &config);

        assert_eq!(a.lines().count(), 12);
        assert_eq!(a.circles().count(), 8);
        assert_eq!(a.commands.len(), b.commands.len());
        for (got, want) in a.commands.iter().zip(&b.commands) {
            assert!(got.approx_eq(want, 1e-9), "{got:?} != {want:?}");
        }
    }
}
