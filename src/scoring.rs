use crate::geometry::{intersection, multi_polygon_area, polygon_area, too_far, IntersectionMethod};
use crate::EPS;
use geo::Polygon;
use log::warn;

/// Converts the raw overlap ratio into a score.
///
/// Ratios above `1.0` are only possible when the area of the intersection is computed larger
/// than the area of one of the polygons (self-overlapping, pixel-traced outlines). Such ratios
/// are inverted, not clamped, so a suspicious overlap never outranks an exact containment.
///
pub fn normalize_ratio(ratio: f64) -> f64 {
    if ratio > 1.0 {
        warn!("Overlap ratio {} exceeds 1.0, inverted to {}", ratio, 1.0 / ratio);
        1.0 / ratio
    } else {
        ratio
    }
}

/// Score from the intersection area and the areas of both polygons
///
pub fn score_from_areas(intersection_area: f64, left_area: f64, right_area: f64) -> f64 {
    let min_area = left_area.min(right_area);
    if min_area <= EPS || intersection_area <= 0.0 {
        return 0.0;
    }
    normalize_ratio(intersection_area / min_area)
}

/// Symmetric similarity of two boundaries: intersection area normalized by the smaller area.
///
/// Degenerate (zero-area) polygons and disjoint polygons score `0.0`. The result always lies
/// within `[0, 1]`.
///
pub fn overlap_score(left: &Polygon<f64>, right: &Polygon<f64>, method: IntersectionMethod) -> f64 {
    let left_area = polygon_area(left);
    let right_area = polygon_area(right);
    if left_area.min(right_area) <= EPS || too_far(left, right) {
        return 0.0;
    }
    let intersection_area = multi_polygon_area(&intersection(left, right, method));
    score_from_areas(intersection_area, left_area, right_area)
}

/// Same as [`overlap_score`] for boundaries that may be missing
///
pub fn optional_overlap_score(
    left: Option<&Polygon<f64>>,
    right: Option<&Polygon<f64>>,
    method: IntersectionMethod,
) -> f64 {
    match (left, right) {
        (Some(l), Some(r)) => overlap_score(l, r, method),
        _ => 0.0,
    }
}
