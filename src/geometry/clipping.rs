use crate::EPS;
use geo::orient::Direction;
use geo::{Coord, LineString, Orient, Polygon};

fn ring(polygon: &Polygon<f64>) -> Vec<Coord<f64>> {
    let mut coords = polygon.exterior().0.clone();
    if coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }
    coords
}

// Left of (or on) the directed edge p1 -> p2 of a counter-clockwise clip ring.
fn is_inside(q: &Coord<f64>, p1: &Coord<f64>, p2: &Coord<f64>) -> bool {
    let r = (p2.x - p1.x) * (q.y - p1.y) - (p2.y - p1.y) * (q.x - p1.x);
    r >= 0.0
}

fn compute_intersection(
    cp1: &Coord<f64>,
    cp2: &Coord<f64>,
    s: &Coord<f64>,
    e: &Coord<f64>,
) -> Coord<f64> {
    let dc = Coord {
        x: cp1.x - cp2.x,
        y: cp1.y - cp2.y,
    };
    let dp = Coord {
        x: s.x - e.x,
        y: s.y - e.y,
    };
    let denominator = dc.x * dp.y - dc.y * dp.x;
    if denominator.abs() < EPS * EPS {
        // parallel edges meet only at the shared end
        return *cp2;
    }
    let n1 = cp1.x * cp2.y - cp1.y * cp2.x;
    let n2 = s.x * e.y - s.y * e.x;
    let n3 = 1.0 / denominator;
    Coord {
        x: (n1 * dp.x - n2 * dc.x) * n3,
        y: (n1 * dp.y - n2 * dc.y) * n3,
    }
}

/// Clips `subject_polygon` by `clipping_polygon`.
///
/// The clipping polygon must be convex, the subject polygon may be arbitrary. Holes are
/// ignored. The result is empty when the polygons do not overlap.
///
pub fn sutherland_hodgman_clip(
    subject_polygon: &Polygon<f64>,
    clipping_polygon: &Polygon<f64>,
) -> Polygon<f64> {
    let mut final_polygon = ring(subject_polygon);
    let clipping_polygon = ring(&clipping_polygon.orient(Direction::Default));

    for i in 0..clipping_polygon.len() {
        if final_polygon.is_empty() {
            break;
        }
        let next_polygon = final_polygon;
        final_polygon = Vec::default();

        let i_i = if i == 0 {
            clipping_polygon.len() - 1
        } else {
            i - 1
        };

        let c_edge_start = clipping_polygon[i_i];
        let c_edge_end = clipping_polygon[i];

        for j in 0..next_polygon.len() {
            let j_i = if j == 0 {
                next_polygon.len() - 1
            } else {
                j - 1
            };

            let s_edge_start = next_polygon[j_i];
            let s_edge_end = next_polygon[j];
            if is_inside(&s_edge_end, &c_edge_start, &c_edge_end) {
                if !is_inside(&s_edge_start, &c_edge_start, &c_edge_end) {
                    final_polygon.push(compute_intersection(
                        &s_edge_start,
                        &s_edge_end,
                        &c_edge_start,
                        &c_edge_end,
                    ));
                }
                final_polygon.push(s_edge_end);
            } else if is_inside(&s_edge_start, &c_edge_start, &c_edge_end) {
                final_polygon.push(compute_intersection(
                    &s_edge_start,
                    &s_edge_end,
                    &c_edge_start,
                    &c_edge_end,
                ));
            }
        }
    }

    if final_polygon.len() < 3 {
        final_polygon.clear();
    }
    Polygon::new(LineString::new(final_polygon), vec![])
}

#[cfg(test)]
mod tests {
    use crate::geometry::clipping::sutherland_hodgman_clip;
    use crate::geometry::polygon_area;
    use crate::EPS;
    use geo::{polygon, Area, BooleanOps, Polygon};

    #[test]
    fn clip() {
        let subject_polygon: Polygon<f64> = polygon![
            (x: 8055.658, y: 7977.5537),
            (x: 8010.734, y: 7999.9697),
            (x: 8032.9717, y: 8044.537),
            (x: 8077.896, y: 8022.121),
        ];

        let clip_polygon: Polygon<f64> = polygon![
            (x: 8055.805, y: 7977.847),
            (x: 8010.871, y: 8000.2676),
            (x: 8033.105, y: 8044.8286),
            (x: 8078.039, y: 8022.408),
        ];

        let clipped = sutherland_hodgman_clip(&subject_polygon, &clip_polygon);
        let boolean = subject_polygon.intersection(&clip_polygon).unsigned_area();
        assert!((polygon_area(&clipped) - boolean).abs() < 1e-3);
    }

    #[test]
    fn clockwise_clip_polygon() {
        let subject: Polygon<f64> = polygon![
            (x: 0.0, y: 0.0),
            (x: 4.0, y: 0.0),
            (x: 4.0, y: 4.0),
            (x: 0.0, y: 4.0),
        ];
        let clockwise: Polygon<f64> = polygon![
            (x: 2.0, y: 2.0),
            (x: 2.0, y: 6.0),
            (x: 6.0, y: 6.0),
            (x: 6.0, y: 2.0),
        ];
        let clipped = sutherland_hodgman_clip(&subject, &clockwise);
        assert!((polygon_area(&clipped) - 4.0).abs() < EPS);
    }

    #[test]
    fn disjoint() {
        let a: Polygon<f64> = polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
        ];
        let b: Polygon<f64> = polygon![
            (x: 5.0, y: 5.0),
            (x: 6.0, y: 5.0),
            (x: 6.0, y: 6.0),
        ];
        let clipped = sutherland_hodgman_clip(&a, &b);
        assert!(clipped.exterior().0.is_empty());
    }
}
