//! Concave refinement: carve indentations into the convex hull.
//!
//! Starting from the convex hull, each pass takes the single longest
//! edge `(pb, pe)` and looks for the remaining interior point `pi` that
//!
//! 1. satisfies the admissibility inequality
//!    `d1 + d2 - d0 < γ * min(d1, d2)` with `d0 = |pb pe|²`,
//!    `d1 = |pb pi|²`, `d2 = |pe pi|²` (squared lengths throughout),
//! 2. does not make either new edge `(pb, pi)` or `(pi, pe)` cross any
//!    other polygon edge, and
//! 3. minimizes the area of the triangle `(pb, pe, pi)`.
//!
//! The winner is spliced in after `pb` and the pass restarts from the
//! (new) longest edge. The loop ends as soon as a pass finds nothing for
//! its longest edge; shorter edges are not tried in that pass. Every
//! successful pass consumes the inserted point along with any remaining
//! copies of it, so the loop terminates and no vertex repeats.
//!
//! This is stage 2 of the pipeline. It is always re-run from the
//! convex hull, never from a previous concave result.

use serde::{Deserialize, Serialize};

use crate::geometry::{segments_intersect, squared_distance, triangle_area};
use crate::search::SearchPath;
use crate::types::{HullConfig, Point, Polygon, ShapeParameter};

/// A polygon edge from the vertex at `index` to its successor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Index of the start vertex in the polygon.
    pub index: usize,
    /// Start vertex (`pb`).
    pub start: Point,
    /// End vertex (`pe`), the successor of `start` (wrapping).
    pub end: Point,
}

impl Edge {
    /// Whether this edge joins `a` and `b` in either direction, within tolerance.
    #[must_use]
    pub fn joins(&self, a: Point, b: Point) -> bool {
        (self.start.approx_eq(a) && self.end.approx_eq(b))
            || (self.start.approx_eq(b) && self.end.approx_eq(a))
    }
}

/// The longest edge of `polygon` by squared length.
///
/// Ties go to the first edge found scanning from vertex 0. Returns
/// `None` for degenerate polygons. When every edge has zero length the
/// first edge is returned.
#[must_use]
pub fn longest_edge(polygon: &Polygon) -> Option<Edge> {
    let mut best: Option<(Edge, f64)> = None;
    for (index, (start, end)) in polygon.edges().enumerate() {
        let length = squared_distance(start, end);
        if best.is_none_or(|(_, longest)| length > longest) {
            best = Some((Edge { index, start, end }, length));
        }
    }
    best.map(|(edge, _)| edge)
}

/// The admissibility inequality for inserting `pi` into edge `(pb, pe)`.
///
/// Compares sums of squared lengths, not lengths. The left-hand side is
/// negative whenever `pi` lies inside the circle with diameter `pb pe`,
/// so such points are admissible for every γ; larger γ admits points
/// farther out.
#[must_use]
pub fn is_admissible(pb: Point, pe: Point, pi: Point, gamma: ShapeParameter) -> bool {
    let d0 = squared_distance(pb, pe);
    let d1 = squared_distance(pb, pi);
    let d2 = squared_distance(pe, pi);
    d1 + d2 - d0 < gamma.get() * d1.min(d2)
}

/// Whether replacing `edge` by `(pb, pi)` and `(pi, pe)` keeps `polygon` simple.
///
/// Both new edges are tested against every polygon edge except the one
/// being replaced.
#[must_use]
pub fn keeps_simple(polygon: &Polygon, edge: &Edge, pi: Point) -> bool {
    polygon
        .edges()
        .filter(|&(a, b)| !edge.joins(a, b))
        .all(|(a, b)| {
            !segments_intersect(edge.start, pi, a, b) && !segments_intersect(pi, edge.end, a, b)
        })
}

/// Read-only view of one pass: the polygon, its longest edge, and γ.
///
/// Shared by reference across search workers.
#[derive(Debug, Clone, Copy)]
pub struct EdgeProbe<'a> {
    polygon: &'a Polygon,
    edge: Edge,
    gamma: ShapeParameter,
}

impl<'a> EdgeProbe<'a> {
    /// Create a probe for `edge` of `polygon`.
    #[must_use]
    pub const fn new(polygon: &'a Polygon, edge: Edge, gamma: ShapeParameter) -> Self {
        Self {
            polygon,
            edge,
            gamma,
        }
    }

    /// The edge under refinement.
    #[must_use]
    pub const fn edge(&self) -> Edge {
        self.edge
    }

    /// Triangle area if `pi` qualifies for insertion, otherwise `None`.
    #[must_use]
    pub fn evaluate(&self, pi: Point) -> Option<f64> {
        let Edge { start, end, .. } = self.edge;
        (is_admissible(start, end, pi, self.gamma) && keeps_simple(self.polygon, &self.edge, pi))
            .then(|| triangle_area(start, end, pi))
    }
}

/// Counters from one refinement run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinementStats {
    /// Points not on the convex hull when refinement started.
    pub remaining_before: usize,
    /// Points still off the boundary when refinement ended.
    pub remaining_after: usize,
    /// Points inserted into the boundary.
    pub inserted: usize,
    /// Passes run, including the final unsuccessful one.
    pub passes: usize,
    /// Passes whose candidate search was partitioned across workers.
    pub parallel_passes: usize,
}

/// Refine `convex` into a possibly concave polygon using `points`.
///
/// Polygons with fewer than 3 vertices are returned unmodified.
#[must_use = "returns the refined polygon"]
pub fn concave_hull(convex: &Polygon, points: &[Point], config: &HullConfig) -> Polygon {
    refine(convex, points, config).0
}

/// Like [`concave_hull`] but also returns [`RefinementStats`].
#[must_use = "returns the refined polygon"]
pub fn refine(convex: &Polygon, points: &[Point], config: &HullConfig) -> (Polygon, RefinementStats) {
    let mut hull = convex.clone();
    let mut stats = RefinementStats::default();

    if hull.is_degenerate() {
        return (hull, stats);
    }

    let mut remaining: Vec<Point> = points
        .iter()
        .copied()
        .filter(|&p| !hull.contains_vertex(p))
        .collect();
    stats.remaining_before = remaining.len();

    while let Some(edge) = longest_edge(&hull) {
        stats.passes += 1;

        let probe = EdgeProbe::new(&hull, edge, config.gamma);
        let (best, path) = config
            .search
            .search(&remaining, &probe, config.parallel_threshold);
        if path == SearchPath::Parallel {
            stats.parallel_passes += 1;
        }

        let Some(candidate) = best else {
            tracing::debug!(
                pass = stats.passes,
                edge = edge.index,
                remaining = remaining.len(),
                "no candidate for longest edge, refinement done"
            );
            break;
        };

        hull.insert_after(edge.index, candidate.point);
        remaining.retain(|p| !p.approx_eq(candidate.point));
        stats.inserted += 1;

        tracing::debug!(
            pass = stats.passes,
            edge = edge.index,
            x = candidate.point.x,
            y = candidate.point.y,
            area = candidate.area,
            parallel = path == SearchPath::Parallel,
            "inserted point"
        );
    }

    stats.remaining_after = remaining.len();
    (hull, stats)
}
