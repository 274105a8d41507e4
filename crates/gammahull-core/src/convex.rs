//! Convex hull construction by angular sweep (Graham scan).
//!
//! This is stage 1 of the pipeline. The result is the starting polygon
//! for concave refinement and is computed once per point set.

use std::cmp::Ordering;

use crate::geometry::{is_collinear, orientation};
use crate::types::{Point, Polygon};

/// Compute the convex hull of `points`.
///
/// The hull is returned counter-clockwise starting at the pivot (lowest
/// `y`, ties broken by lowest `x`), with no duplicate or collinear
/// interior vertices. Only the farthest point along each ray from the
/// pivot survives.
///
/// Fewer than 3 input points are returned verbatim. Input that collapses
/// to fewer than 3 distinct directions (all points coincident or
/// collinear) yields a short, non-polygonal result rather than an error.
#[must_use = "returns the convex hull"]
pub fn convex_hull(points: &[Point]) -> Polygon {
    if points.len() < 3 {
        return Polygon::new(points.to_vec());
    }

    let pivot_index = lowest_point(points);
    let pivot = points[pivot_index];

    // Points coincident with the pivot have no direction and would
    // break the angular ordering.
    let mut sorted: Vec<Point> = points
        .iter()
        .enumerate()
        .filter(|&(i, p)| i != pivot_index && !p.approx_eq(pivot))
        .map(|(_, &p)| p)
        .collect();

    sorted.sort_by(|&a, &b| polar_order(pivot, a, b));

    let rays = farthest_per_ray(pivot, &sorted);

    let mut hull = Vec::with_capacity(rays.len() + 1);
    hull.push(pivot);
    let Some((&first, rest)) = rays.split_first() else {
        return Polygon::new(hull);
    };
    hull.push(first);

    for &candidate in rest {
        while hull.len() > 1 && !is_left_turn(hull[hull.len() - 2], hull[hull.len() - 1], candidate)
        {
            hull.pop();
        }
        hull.push(candidate);
    }

    Polygon::new(hull)
}

/// Index of the point with minimum `y`, ties broken by minimum `x`.
///
/// The first such point wins when several are identical.
fn lowest_point(points: &[Point]) -> usize {
    let mut lowest = 0;
    for (i, p) in points.iter().enumerate().skip(1) {
        let current = points[lowest];
        if p.y
            .total_cmp(&current.y)
            .then_with(|| p.x.total_cmp(&current.x))
            .is_lt()
        {
            lowest = i;
        }
    }
    lowest
}

/// Angular comparator around `pivot`.
///
/// Orders by polar angle, then nearer first on an exactly shared angle.
/// Every other point lies above the pivot or to its right on the same
/// row, so angles fall in `[0, π)` and increasing angle is
/// counter-clockwise order. Keys are compared with `total_cmp`, which
/// keeps this a total order even for near-collinear input; tolerance
/// only applies later, in [`farthest_per_ray`].
fn polar_order(pivot: Point, a: Point, b: Point) -> Ordering {
    let (angle_a, dist_a) = polar_key(pivot, a);
    let (angle_b, dist_b) = polar_key(pivot, b);
    angle_a
        .total_cmp(&angle_b)
        .then_with(|| dist_a.total_cmp(&dist_b))
}

/// Polar angle and squared distance of `p` around `pivot`.
fn polar_key(pivot: Point, p: Point) -> (f64, f64) {
    ((p.y - pivot.y).atan2(p.x - pivot.x), pivot.distance_squared(p))
}

/// Collapse each run of points collinear with `pivot` to its farthest member.
///
/// `sorted` must be in [`polar_order`].
fn farthest_per_ray(pivot: Point, sorted: &[Point]) -> Vec<Point> {
    let mut rays: Vec<Point> = Vec::with_capacity(sorted.len());
    for &p in sorted {
        match rays.last_mut() {
            Some(last) if is_collinear(orientation(pivot, *last, p)) => {
                if pivot.distance_squared(p) > pivot.distance_squared(*last) {
                    *last = p;
                }
            }
            _ => rays.push(p),
        }
    }
    rays
}

/// Strict counter-clockwise turn; collinear counts as not left.
fn is_left_turn(a: Point, b: Point, c: Point) -> bool {
    let o = orientation(a, b, c);
    o > 0.0 && !is_collinear(o)
}
