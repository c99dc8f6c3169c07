//! Polygon predicates used by face tracing and the nearest-face query.

use super::Point;

/// Signed area of a polygon via the shoelace formula.
///
/// Positive for counter-clockwise winding. Face tracing relies on this
/// sign to recognize the unbounded outer walk.
pub fn signed_area(polygon: &[Point]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        twice_area += a[0] * b[1] - b[0] * a[1];
    }
    twice_area / 2.0
}

/// Even-odd (ray crossing) containment test.
///
/// Points exactly on the boundary may land on either side; callers that
/// need boundary inclusion should check edge distance first.
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[j];
        if (a[1] > point[1]) != (b[1] > point[1]) {
            let x_cross = (b[0] - a[0]) * (point[1] - a[1]) / (b[1] - a[1]) + a[0];
            if point[0] < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
