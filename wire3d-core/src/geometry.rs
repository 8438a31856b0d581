/// Wireframe geometry: points, segments and the mesh that owns them
use std::collections::{HashMap, HashSet};
use std::fmt;

use log::debug;
use nalgebra::Point3;

use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::projection::Orthographic;
use crate::surface::DrawSurface;
use crate::transform::{self, Rotate};

/// A mutable 3D coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_point(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }

    pub fn distance(&self, other: &Point3D) -> f64 {
        nalgebra::distance(&self.to_point(), &other.to_point())
    }
}

impl From<Point3<f64>> for Point3D {
    fn from(p: Point3<f64>) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

/// Index of a point inside the mesh that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(pub usize);

impl PointId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An edge between two points of the same mesh.
///
/// The segment holds no coordinates of its own; it reads the current
/// position of both endpoints every time it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub a: PointId,
    pub b: PointId,
}

impl Segment {
    pub fn new(a: PointId, b: PointId) -> Self {
        Self { a, b }
    }

    /// Project both endpoints and stroke the line between them
    pub fn draw<S: DrawSurface + ?Sized>(
        &self,
        points: &[Point3D],
        projection: &Orthographic,
        config: &RenderConfig,
        surface: &mut S,
    ) {
        let from = projection.project(&points[self.a.index()]);
        let to = projection.project(&points[self.b.index()]);
        surface.line(from, to, config.edge_style);
    }
}

/// Something that can be rotated and drawn as a wireframe
pub trait Wireframe: Rotate {
    fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S, config: &RenderConfig);
}

/// Draw edges first, then point markers on top of them.
pub(crate) fn draw_wireframe<S: DrawSurface + ?Sized>(
    points: &[Point3D],
    segments: &[Segment],
    surface: &mut S,
    config: &RenderConfig,
) {
    let projection = Orthographic::new(config.pixels_per_unit);

    for segment in segments {
        segment.draw(points, &projection, config, surface);
    }
    for point in points {
        surface.fill_circle(
            projection.project(point),
            config.point_radius,
            config.point_style,
        );
    }
}

/// Points and the segments connecting them
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    points: Vec<Point3D>,
    segments: Vec<Segment>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(points: usize, segments: usize) -> Self {
        Self {
            points: Vec::with_capacity(points),
            segments: Vec::with_capacity(segments),
        }
    }

    pub fn add_point(&mut self, point: Point3D) -> PointId {
        self.points.push(point);
        PointId(self.points.len() - 1)
    }

    /// Connect two existing points. Both must belong to this mesh and differ.
    pub fn add_segment(&mut self, a: PointId, b: PointId) -> Result<usize> {
        for id in [a, b] {
            if id.index() >= self.points.len() {
                return Err(Error::UnknownPoint(id));
            }
        }
        if a == b {
            return Err(Error::DegenerateSegment(a));
        }
        self.segments.push(Segment::new(a, b));
        Ok(self.segments.len() - 1)
    }

    pub fn points(&self) -> &[Point3D] {
        &self.points
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn point(&self, id: PointId) -> Option<&Point3D> {
        self.points.get(id.index())
    }

    pub fn point_mut(&mut self, id: PointId) -> Option<&mut Point3D> {
        self.points.get_mut(id.index())
    }

    /// Current coordinates of both endpoints of a segment
    pub fn segment_endpoints(&self, segment: &Segment) -> Option<(&Point3D, &Point3D)> {
        Some((self.point(segment.a)?, self.point(segment.b)?))
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Mean of all point positions, `None` for an empty mesh
    pub fn centroid(&self) -> Option<Point3D> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f64;
        let (sx, sy, sz) = self
            .points
            .iter()
            .fold((0.0, 0.0, 0.0), |(sx, sy, sz), p| (sx + p.x, sy + p.y, sz + p.z));
        Some(Point3D::new(sx / n, sy / n, sz / n))
    }

    /// Translate every point so the centroid sits on the origin.
    ///
    /// Rotations turn about the origin, so off-centre models need this first.
    pub fn recenter(&mut self) {
        if let Some(c) = self.centroid() {
            for p in &mut self.points {
                p.x -= c.x;
                p.y -= c.y;
                p.z -= c.z;
            }
        }
    }

    /// Largest distance from the origin to any point
    pub fn radius(&self) -> f64 {
        let origin = Point3D::new(0.0, 0.0, 0.0);
        self.points
            .iter()
            .map(|p| p.distance(&origin))
            .fold(0.0, f64::max)
    }

    /// Axis-aligned cube centred on the origin: 8 corners, 12 edges
    pub fn cube(size: f64) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::with_capacity(8, 12);

        // Corner i has x = bit 0, y = bit 1, z = bit 2
        for i in 0..8u8 {
            let coord = |bit: u8| if i & bit == 0 { -half } else { half };
            mesh.add_point(Point3D::new(coord(1), coord(2), coord(4)));
        }
        for i in 0..8usize {
            for bit in [1usize, 2, 4] {
                let j = i | bit;
                if j != i {
                    mesh.segments.push(Segment::new(PointId(i), PointId(j)));
                }
            }
        }

        mesh
    }

    /// Build a wireframe from a triangle soup.
    ///
    /// Vertices with identical coordinates are merged and each undirected
    /// edge is emitted once, in first-seen order. Collapsed edges are skipped.
    pub fn from_triangles(triangles: &[[Point3<f64>; 3]]) -> Self {
        let mut mesh = Self::new();
        let mut index: HashMap<[u64; 3], PointId> = HashMap::new();
        let mut edges: HashSet<(PointId, PointId)> = HashSet::new();

        for triangle in triangles {
            let vertices: [Point3<f64>; 3] = *triangle;
            let ids = vertices.map(|v| {
                *index
                    .entry(position_key(&v))
                    .or_insert_with(|| mesh.add_point(Point3D::from(v)))
            });
            for (a, b) in [(ids[0], ids[1]), (ids[1], ids[2]), (ids[2], ids[0])] {
                if a == b {
                    continue;
                }
                let key = if a < b { (a, b) } else { (b, a) };
                if edges.insert(key) {
                    mesh.segments.push(Segment::new(key.0, key.1));
                }
            }
        }

        debug!(
            "built wireframe from {} triangles: {} points, {} segments",
            triangles.len(),
            mesh.points.len(),
            mesh.segments.len()
        );
        mesh
    }
}

fn position_key(p: &Point3<f64>) -> [u64; 3] {
    // +0.0 and -0.0 must merge
    let bits = |v: f64| if v == 0.0 { 0u64 } else { v.to_bits() };
    [bits(p.x), bits(p.y), bits(p.z)]
}

impl Rotate for Mesh {
    fn rotate_x(&mut self, theta: f64) {
        let (sin, cos) = theta.sin_cos();
        for point in &mut self.points {
            *point = transform::rotated_x(point, sin, cos);
        }
    }

    fn rotate_y(&mut self, theta: f64) {
        let (sin, cos) = theta.sin_cos();
        for point in &mut self.points {
            *point = transform::rotated_y(point, sin, cos);
        }
    }
}

impl Wireframe for Mesh {
    fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S, config: &RenderConfig) {
        draw_wireframe(&self.points, &self.segments, surface, config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};
    use approx::assert_relative_eq;
    use nalgebra::Point2;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn single_point(x: f64, y: f64, z: f64) -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_point(Point3D::new(x, y, z));
        mesh
    }

    fn assert_point_eq(actual: &Point3D, expected: (f64, f64, f64)) {
        assert_relative_eq!(actual.x, expected.0, epsilon = 1e-12);
        assert_relative_eq!(actual.y, expected.1, epsilon = 1e-12);
        assert_relative_eq!(actual.z, expected.2, epsilon = 1e-12);
    }

    #[test]
    fn test_cube_topology() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.points().len(), 8);
        assert_eq!(cube.segments().len(), 12);

        // Every edge has length equal to the side
        for segment in cube.segments() {
            let (a, b) = cube.segment_endpoints(segment).unwrap();
            assert_relative_eq!(a.distance(b), 2.0);
        }
        // Every corner has three edges
        for i in 0..8 {
            let degree = cube
                .segments()
                .iter()
                .filter(|s| s.a == PointId(i) || s.b == PointId(i))
                .count();
            assert_eq!(degree, 3);
        }
    }

    #[test]
    fn test_add_segment_rejects_unknown_point() {
        let mut mesh = single_point(0.0, 0.0, 0.0);
        let err = mesh.add_segment(PointId(0), PointId(3)).unwrap_err();
        assert!(matches!(err, Error::UnknownPoint(PointId(3))));
        assert!(mesh.segments().is_empty());
    }

    #[test]
    fn test_add_segment_rejects_degenerate() {
        let mut mesh = single_point(0.0, 0.0, 0.0);
        let err = mesh.add_segment(PointId(0), PointId(0)).unwrap_err();
        assert!(matches!(err, Error::DegenerateSegment(PointId(0))));
    }

    #[test]
    fn test_rotate_y_quarter_turns() {
        let mut mesh = single_point(1.0, 0.0, 0.0);
        mesh.rotate_y(FRAC_PI_2);
        assert_point_eq(&mesh.points()[0], (0.0, 0.0, 1.0));
        mesh.rotate_y(FRAC_PI_2);
        assert_point_eq(&mesh.points()[0], (-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_rotate_x_quarter_turn() {
        // z' = z cos - y sin, y' = y cos + z sin
        let mut mesh = single_point(0.0, 1.0, 0.0);
        mesh.rotate_x(FRAC_PI_2);
        assert_point_eq(&mesh.points()[0], (0.0, 0.0, -1.0));
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let original = Mesh::cube(2.0);
        let mut mesh = original.clone();
        mesh.rotate_x(0.0);
        mesh.rotate_y(0.0);
        assert_eq!(mesh.points(), original.points());
    }

    #[test]
    fn test_axis_invariance() {
        let original = Mesh::cube(3.0);
        let mut mesh = original.clone();

        mesh.rotate_y(0.7);
        for (before, after) in original.points().iter().zip(mesh.points()) {
            assert_eq!(before.y, after.y);
        }

        let before_x = mesh.clone();
        mesh.rotate_x(-1.3);
        for (before, after) in before_x.points().iter().zip(mesh.points()) {
            assert_eq!(before.x, after.x);
        }
    }

    #[test]
    fn test_full_turn_returns_home() {
        let original = Mesh::cube(2.0);
        let mut mesh = original.clone();
        let steps = 360;
        for _ in 0..steps {
            mesh.rotate_y(2.0 * PI / steps as f64);
        }
        for (before, after) in original.points().iter().zip(mesh.points()) {
            assert_relative_eq!(before.x, after.x, epsilon = 1e-9);
            assert_relative_eq!(before.y, after.y, epsilon = 1e-9);
            assert_relative_eq!(before.z, after.z, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_rotation_is_rigid() {
        let original = Mesh::cube(2.0);
        let mut mesh = original.clone();
        for i in 0..50 {
            mesh.rotate_y(0.05 * i as f64);
            mesh.rotate_x(-0.03 * i as f64);
        }

        let c0 = original.centroid().unwrap();
        let c1 = mesh.centroid().unwrap();
        for (i, (before, after)) in original.points().iter().zip(mesh.points()).enumerate() {
            assert_relative_eq!(before.distance(&c0), after.distance(&c1), max_relative = 1e-9);
            for j in 0..i {
                assert_relative_eq!(
                    before.distance(&original.points()[j]),
                    after.distance(&mesh.points()[j]),
                    max_relative = 1e-9
                );
            }
        }
    }

    #[test]
    fn test_draw_lines_before_points() {
        let mut mesh = Mesh::new();
        let a = mesh.add_point(Point3D::new(0.0, 0.0, 0.0));
        let b = mesh.add_point(Point3D::new(1.0, 1.0, 1.0));
        mesh.add_segment(a, b).unwrap();

        let config = RenderConfig::default();
        let mut surface = RecordingSurface::new();
        mesh.draw(&mut surface, &config);

        assert_eq!(surface.commands.len(), 3);
        assert!(matches!(surface.commands[0], DrawCommand::Line { .. }));
        assert!(matches!(surface.commands[1], DrawCommand::Circle { .. }));
        assert!(matches!(surface.commands[2], DrawCommand::Circle { .. }));
    }

    #[test]
    fn test_draw_uses_current_coordinates() {
        let mut mesh = Mesh::new();
        let a = mesh.add_point(Point3D::new(0.0, 0.0, 0.0));
        let b = mesh.add_point(Point3D::new(1.0, 0.0, 0.0));
        mesh.add_segment(a, b).unwrap();
        mesh.point_mut(b).unwrap().y = 2.0;

        let config = RenderConfig::default().with_pixels_per_unit(10.0);
        let mut surface = RecordingSurface::new();
        mesh.draw(&mut surface, &config);

        assert_eq!(
            surface.commands[0],
            DrawCommand::Line {
                from: Point2::new(0.0, 0.0),
                to: Point2::new(10.0, 20.0),
                style: config.edge_style,
            }
        );
    }

    #[test]
    fn test_points_differing_in_depth_draw_identically() {
        let mut mesh = Mesh::new();
        mesh.add_point(Point3D::new(0.5, -0.25, -3.0));
        mesh.add_point(Point3D::new(0.5, -0.25, 4.0));

        let mut surface = RecordingSurface::new();
        mesh.draw(&mut surface, &RenderConfig::default());

        let centers: Vec<_> = surface
            .circles()
            .map(|c| match c {
                DrawCommand::Circle { center, .. } => *center,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(centers.len(), 2);
        assert_eq!(centers[0], centers[1]);
    }

    #[test]
    fn test_from_triangles_merges_shared_edges() {
        let p = |x: f64, y: f64, z: f64| Point3::new(x, y, z);
        // Unit square split along its diagonal
        let triangles = [
            [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0)],
            [p(0.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(0.0, 1.0, -0.0)],
        ];
        let mesh = Mesh::from_triangles(&triangles);
        assert_eq!(mesh.points().len(), 4);
        assert_eq!(mesh.segments().len(), 5);
    }

    #[test]
    fn test_from_triangles_skips_collapsed_edges() {
        let p = Point3::new(1.0, 2.0, 3.0);
        let q = Point3::new(0.0, 0.0, 0.0);
        let mesh = Mesh::from_triangles(&[[p, p, q]]);
        assert_eq!(mesh.points().len(), 2);
        assert_eq!(mesh.segments().len(), 1);
    }

    #[test]
    fn test_recenter_and_radius() {
        let mut mesh = Mesh::new();
        mesh.add_point(Point3D::new(10.0, 0.0, 0.0));
        mesh.add_point(Point3D::new(12.0, 0.0, 0.0));
        assert_relative_eq!(mesh.radius(), 12.0);

        mesh.recenter();
        assert_point_eq(&mesh.points()[0], (-1.0, 0.0, 0.0));
        assert_point_eq(&mesh.points()[1], (1.0, 0.0, 0.0));
        assert_relative_eq!(mesh.radius(), 1.0);
        assert_relative_eq!(Mesh::cube(2.0).radius(), 3f64.sqrt());
    }

    #[test]
    fn test_centroid() {
        assert!(Mesh::new().centroid().is_none());
        let c = Mesh::cube(4.0).centroid().unwrap();
        assert_point_eq(&c, (0.0, 0.0, 0.0));
    }
}
