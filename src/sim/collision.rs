//! Overlap detection and minimum translation vectors for convex polygons
//!
//! Every query runs in two phases: an O(1) bounding-box reject, then a
//! separating-axis test over the edge normals of both polygons. The SAT
//! phase sits behind [`NarrowPhase`] so the pre-filter can be observed in
//! isolation.

use glam::Vec2;

use super::polygon::Polygon;

/// Minimum translation vector: moving the first polygon by `axis * depth`
/// separates it from the second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mtv {
    /// Unit push direction for the first polygon
    pub axis: Vec2,
    /// Penetration along `axis`
    pub depth: f32,
}

impl Mtv {
    #[inline]
    pub fn displacement(&self) -> Vec2 {
        self.axis * self.depth
    }
}

/// Exact test for two world-space convex polygons
pub trait NarrowPhase {
    fn overlaps(&self, a: &Polygon, b: &Polygon) -> bool;
    fn mtv(&self, a: &Polygon, b: &Polygon) -> Option<Mtv>;
}

/// Separating axis theorem over both polygons' edge normals
#[derive(Debug, Clone, Copy, Default)]
pub struct SeparatingAxis;

impl NarrowPhase for SeparatingAxis {
    fn overlaps(&self, a: &Polygon, b: &Polygon) -> bool {
        axes(a).chain(axes(b)).all(|axis| {
            let pa = Projection::of(a, axis);
            let pb = Projection::of(b, axis);
            !pa.separated(&pb)
        })
    }

    fn mtv(&self, a: &Polygon, b: &Polygon) -> Option<Mtv> {
        let mut best: Option<Mtv> = None;

        for axis in axes(a).chain(axes(b)) {
            let pa = Projection::of(a, axis);
            let pb = Projection::of(b, axis);
            if pa.separated(&pb) {
                return None;
            }

            let depth = pa.penetration(&pb);
            if best.is_none_or(|m| depth < m.depth) {
                // Push `a` toward whichever side of `b` it is already nearer
                let axis = if pa.center() < pb.center() { -axis } else { axis };
                best = Some(Mtv { axis, depth });
            }
        }

        best
    }
}

/// Interval covered by a polygon projected onto an axis
#[derive(Debug, Clone, Copy, PartialEq)]
struct Projection {
    min: f32,
    max: f32,
}

impl Projection {
    fn of(poly: &Polygon, axis: Vec2) -> Self {
        let vertices = poly.vertices();
        let mut min = vertices[0].dot(axis);
        let mut max = min;
        for v in &vertices[1..] {
            let p = v.dot(axis);
            min = min.min(p);
            max = max.max(p);
        }
        Self { min, max }
    }

    /// Touching intervals count as separated
    fn separated(&self, other: &Self) -> bool {
        self.max <= other.min || other.max <= self.min
    }

    fn center(&self) -> f32 {
        (self.min + self.max) * 0.5
    }

    /// Distance one interval must travel to clear the other. When one interval
    /// contains the other, the gap to the nearer end is included.
    fn penetration(&self, other: &Self) -> f32 {
        let mut overlap = self.max.min(other.max) - self.min.max(other.min);
        let contains = (self.min > other.min && self.max < other.max)
            || (other.min > self.min && other.max < self.max);
        if contains {
            overlap += (self.min - other.min).abs().min((self.max - other.max).abs());
        }
        overlap
    }
}

/// Unit edge normals; degenerate (zero-length) edges are skipped
fn axes(poly: &Polygon) -> impl Iterator<Item = Vec2> + '_ {
    poly.edges()
        .map(|e| e.perp().normalize_or_zero())
        .filter(|n| *n != Vec2::ZERO)
}

/// True if the polygons' interiors intersect
pub fn overlaps(a: &Polygon, b: &Polygon) -> bool {
    overlaps_with(&SeparatingAxis, a, b)
}

/// Minimum translation vector pushing `a` out of `b`, `None` if they don't overlap.
/// Neither polygon is modified; the caller applies the vector.
pub fn resolve_overlap(a: &Polygon, b: &Polygon) -> Option<Mtv> {
    resolve_overlap_with(&SeparatingAxis, a, b)
}

pub fn overlaps_with<N: NarrowPhase + ?Sized>(narrow: &N, a: &Polygon, b: &Polygon) -> bool {
    if !a.bounding_box().overlaps(&b.bounding_box()) {
        return false;
    }
    narrow.overlaps(a, b)
}

pub fn resolve_overlap_with<N: NarrowPhase + ?Sized>(
    narrow: &N,
    a: &Polygon,
    b: &Polygon,
) -> Option<Mtv> {
    if !a.bounding_box().overlaps(&b.bounding_box()) {
        return None;
    }
    narrow.mtv(a, b)
}
