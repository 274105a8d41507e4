//! Geometric primitives shared by the convex and concave hull stages.
//!
//! All predicates are plain `f64` arithmetic with a single absolute
//! tolerance, [`EPSILON`]. The tolerance assumes coordinates of roughly
//! unit-to-moderate magnitude; very large or very small coordinate
//! ranges would need a scale-relative tolerance instead.

use crate::types::Point;

/// Absolute tolerance for collinearity and coordinate equality.
pub const EPSILON: f64 = 1e-9;

/// Twice the signed area of the triangle `p`, `q`, `r`.
///
/// Positive when `r` lies to the left of the directed line `p -> q`
/// (counter-clockwise turn), negative for a clockwise turn. Magnitudes
/// below [`EPSILON`] count as collinear, see [`is_collinear`].
#[must_use]
pub fn orientation(p: Point, q: Point, r: Point) -> f64 {
    (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x)
}

/// Whether an [`orientation`] value is within tolerance of zero.
#[must_use]
pub fn is_collinear(orientation: f64) -> bool {
    orientation.abs() < EPSILON
}

/// Squared Euclidean distance.
///
/// Every length comparison in the hull algorithms works on squared
/// lengths, including the concavity admissibility test.
#[must_use]
pub fn squared_distance(p1: Point, p2: Point) -> f64 {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    dx * dx + dy * dy
}

/// Unsigned area of the triangle `p1`, `p2`, `p3`.
#[must_use]
pub fn triangle_area(p1: Point, p2: Point, p3: Point) -> f64 {
    orientation(p1, p2, p3).abs() / 2.0
}

/// Whether segment `p1`-`p2` intersects segment `p3`-`p4`.
///
/// When all four orientations are collinear within tolerance the
/// segments lie on one line and overlap is decided by their
/// axis-aligned bounding boxes, so collinear segments that merely touch
/// count as intersecting. Otherwise a crossing is detected by
/// orientation signs, unless some orientation is exactly zero (an
/// endpoint resting on the other segment, or a shared endpoint), which
/// is not an intersection. An endpoint within tolerance of the other
/// line but not on it still crosses.
#[must_use]
pub fn segments_intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    let o1 = orientation(p1, p2, p3);
    let o2 = orientation(p1, p2, p4);
    let o3 = orientation(p3, p4, p1);
    let o4 = orientation(p3, p4, p2);

    if [o1, o2, o3, o4].into_iter().all(is_collinear) {
        let (min_x1, max_x1) = min_max(p1.x, p2.x);
        let (min_x2, max_x2) = min_max(p3.x, p4.x);
        let (min_y1, max_y1) = min_max(p1.y, p2.y);
        let (min_y2, max_y2) = min_max(p3.y, p4.y);

        return !(max_x1 < min_x2 || max_x2 < min_x1 || max_y1 < min_y2 || max_y2 < min_y1);
    }

    if [o1, o2, o3, o4].contains(&0.0) {
        return false;
    }

    o1 * o2 < 0.0 && o3 * o4 < 0.0
}

/// Order two values.
fn min_max(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}
