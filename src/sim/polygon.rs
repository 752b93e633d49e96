//! Convex boundary polygons
//!
//! A polygon stores its vertices in the owner's local space (origin at the
//! sprite's bottom-left corner). The world-space shape is produced on demand
//! from a [`Transform`], so the local vertices never change once built.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;

/// Placement of a local-space shape in the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Bottom-left corner in world space
    pub position: Vec2,
    /// Pivot for rotation and scale, relative to `position`
    pub origin: Vec2,
    /// Rotation in degrees, counter-clockwise
    pub rotation: f32,
    pub scale: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            origin: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }
}

impl Transform {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Map a local point into world space: scale and rotate about `origin`,
    /// then translate by `position`.
    pub fn apply(&self, local: Vec2) -> Vec2 {
        let rel = (local - self.origin) * self.scale;
        let rotated = if self.rotation == 0.0 {
            rel
        } else {
            Vec2::from_angle(self.rotation.to_radians()).rotate(rel)
        };
        rotated + self.origin + self.position
    }
}

/// An ordered, convex vertex loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec2>", into = "Vec<Vec2>")]
pub struct Polygon {
    vertices: Vec<Vec2>,
}

impl TryFrom<Vec<Vec2>> for Polygon {
    type Error = String;

    fn try_from(vertices: Vec<Vec2>) -> Result<Self, Self::Error> {
        if vertices.len() < 3 {
            return Err(format!(
                "polygon needs at least 3 vertices, got {}",
                vertices.len()
            ));
        }
        Ok(Self { vertices })
    }
}

impl From<Polygon> for Vec<Vec2> {
    fn from(polygon: Polygon) -> Self {
        polygon.vertices
    }
}

impl Polygon {
    /// # Panics
    /// Panics with fewer than 3 vertices.
    pub fn new(vertices: Vec<Vec2>) -> Self {
        assert!(
            vertices.len() >= 3,
            "polygon needs at least 3 vertices, got {}",
            vertices.len()
        );
        Self { vertices }
    }

    /// The four corners of a `width` x `height` box, counter-clockwise from (0, 0)
    pub fn rectangle(width: f32, height: f32) -> Self {
        Self::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(width, 0.0),
            Vec2::new(width, height),
            Vec2::new(0.0, height),
        ])
    }

    /// A regular `num_sides`-gon inscribed in the ellipse that fills the
    /// `width` x `height` box. Vertex 0 sits at `(width, height / 2)`, so a
    /// 4-sided boundary comes out as a diamond.
    ///
    /// # Panics
    /// Panics if `num_sides < 3`.
    pub fn ellipse(width: f32, height: f32, num_sides: usize) -> Self {
        assert!(num_sides >= 3, "ellipse boundary needs at least 3 sides, got {num_sides}");
        let (hw, hh) = (width / 2.0, height / 2.0);
        let vertices = (0..num_sides)
            .map(|i| {
                let angle = i as f32 * TAU / num_sides as f32;
                Vec2::new(hw * angle.cos() + hw, hh * angle.sin() + hh)
            })
            .collect();
        Self::new(vertices)
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// World-space snapshot of this polygon under `transform`
    pub fn transformed(&self, transform: &Transform) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| transform.apply(*v)).collect(),
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(&self.vertices)
    }

    /// Average of the vertices (good enough as an interior point for convex shapes)
    pub fn centroid(&self) -> Vec2 {
        self.vertices.iter().copied().sum::<Vec2>() / self.vertices.len() as f32
    }

    /// Edge vectors, wrapping from the last vertex back to the first
    pub fn edges(&self) -> impl Iterator<Item = Vec2> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| self.vertices[(i + 1) % n] - self.vertices[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_rectangle_corners() {
        let rect = Polygon::rectangle(30.0, 20.0);
        assert_eq!(
            rect.vertices(),
            &[
                Vec2::new(0.0, 0.0),
                Vec2::new(30.0, 0.0),
                Vec2::new(30.0, 20.0),
                Vec2::new(0.0, 20.0),
            ]
        );
    }

    #[test]
    fn test_ellipse_octagon() {
        let oct = Polygon::ellipse(20.0, 10.0, 8);
        assert_eq!(oct.len(), 8);
        assert!(approx(oct.vertices()[0], Vec2::new(20.0, 5.0)));
        assert!(approx(oct.vertices()[2], Vec2::new(10.0, 10.0)));
        assert!(approx(oct.vertices()[4], Vec2::new(0.0, 5.0)));
        assert!(approx(oct.vertices()[6], Vec2::new(10.0, 0.0)));
    }

    #[test]
    fn test_four_sides_is_a_diamond() {
        let diamond = Polygon::ellipse(10.0, 10.0, 4);
        let bb = diamond.bounding_box();
        assert!(approx(bb.min, Vec2::ZERO));
        assert!(approx(bb.max, Vec2::new(10.0, 10.0)));
        assert!(approx(diamond.centroid(), Vec2::new(5.0, 5.0)));
    }

    #[test]
    #[should_panic(expected = "at least 3 sides")]
    fn test_ellipse_rejects_two_sides() {
        let _ = Polygon::ellipse(10.0, 10.0, 2);
    }

    #[test]
    #[should_panic(expected = "at least 3 vertices")]
    fn test_polygon_rejects_segment() {
        let _ = Polygon::new(vec![Vec2::ZERO, Vec2::X]);
    }

    #[test]
    fn test_transform_translation_only() {
        let rect = Polygon::rectangle(10.0, 10.0);
        let world = rect.transformed(&Transform::at(Vec2::new(100.0, 50.0)));
        assert!(approx(world.vertices()[0], Vec2::new(100.0, 50.0)));
        assert!(approx(world.vertices()[2], Vec2::new(110.0, 60.0)));
        // source is untouched
        assert_eq!(rect.vertices()[0], Vec2::ZERO);
    }

    #[test]
    fn test_transform_rotates_about_origin() {
        let rect = Polygon::rectangle(10.0, 10.0);
        let t = Transform {
            position: Vec2::ZERO,
            origin: Vec2::new(5.0, 5.0),
            rotation: 90.0,
            scale: Vec2::ONE,
        };
        let world = rect.transformed(&t);
        // (0,0) -> rel (-5,-5) -> rotated (5,-5) -> (10,0)
        assert!(approx(world.vertices()[0], Vec2::new(10.0, 0.0)));
        assert!(approx(world.centroid(), Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_transform_scales_about_origin() {
        let rect = Polygon::rectangle(10.0, 10.0);
        let t = Transform {
            position: Vec2::ZERO,
            origin: Vec2::new(5.0, 5.0),
            rotation: 0.0,
            scale: Vec2::splat(2.0),
        };
        let bb = rect.transformed(&t).bounding_box();
        assert!(approx(bb.min, Vec2::new(-5.0, -5.0)));
        assert!(approx(bb.max, Vec2::new(15.0, 15.0)));
    }

    #[test]
    fn test_deserialize_checks_vertex_count() {
        let tri: Polygon = serde_json::from_str("[[0.0, 0.0], [4.0, 0.0], [0.0, 3.0]]").expect("triangle");
        assert_eq!(tri.len(), 3);

        let err = serde_json::from_str::<Polygon>("[[0.0, 0.0], [4.0, 0.0]]").unwrap_err();
        assert!(err.to_string().contains("at least 3 vertices"), "{err}");
    }
}
