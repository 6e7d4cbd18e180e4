/// Sutherland–Hodgman clipping of a polygon by a convex polygon
///
pub mod clipping;

use crate::geometry::clipping::sutherland_hodgman_clip;
use geo::{BooleanOps, BoundingRect, Coord, Intersects, LineString, MultiPolygon, Polygon};

/// How the intersection of two boundaries is computed
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IntersectionMethod {
    /// General polygon boolean intersection, valid for any simple polygons.
    #[default]
    Boolean,
    /// Sutherland–Hodgman clipping, exact only when the second polygon is convex.
    ConvexClip,
}

fn ring_coords(ring: &LineString<f64>) -> &[Coord<f64>] {
    let coords = ring.0.as_slice();
    match (coords.first(), coords.last()) {
        (Some(first), Some(last)) if coords.len() > 1 && first == last => {
            &coords[..coords.len() - 1]
        }
        _ => coords,
    }
}

/// Shoelace area of a ring: `0.5 * |Σ xi·(y(i+1) − y(i−1))|`, indices taken modulo length.
///
pub fn ring_area(ring: &LineString<f64>) -> f64 {
    let coords = ring_coords(ring);
    let n = coords.len();
    if n < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..n {
        let prev = coords[(i + n - 1) % n];
        let next = coords[(i + 1) % n];
        acc += coords[i].x * (next.y - prev.y);
    }
    0.5 * acc.abs()
}

/// Area of the exterior ring with the holes cut out
///
pub fn polygon_area(polygon: &Polygon<f64>) -> f64 {
    let holes: f64 = polygon.interiors().iter().map(ring_area).sum();
    (ring_area(polygon.exterior()) - holes).max(0.0)
}

pub fn multi_polygon_area(polygons: &MultiPolygon<f64>) -> f64 {
    polygons.0.iter().map(polygon_area).sum()
}

/// Cheap rejection test: polygons whose bounding rectangles are disjoint cannot intersect
///
pub fn too_far(a: &Polygon<f64>, b: &Polygon<f64>) -> bool {
    match (a.bounding_rect(), b.bounding_rect()) {
        (Some(ra), Some(rb)) => !ra.intersects(&rb),
        _ => true,
    }
}

/// Intersection of two boundaries
///
pub fn intersection(
    a: &Polygon<f64>,
    b: &Polygon<f64>,
    method: IntersectionMethod,
) -> MultiPolygon<f64> {
    match method {
        IntersectionMethod::Boolean => a.intersection(b),
        IntersectionMethod::ConvexClip => {
            let clipped = sutherland_hodgman_clip(a, b);
            if clipped.exterior().0.is_empty() {
                MultiPolygon::new(vec![])
            } else {
                MultiPolygon::new(vec![clipped])
            }
        }
    }
}
