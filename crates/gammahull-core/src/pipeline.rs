//! Incremental pipeline: advance stage-by-stage, inspecting each
//! intermediate result before continuing.
//!
//! Unlike [`crate::process`] which runs everything in one call,
//! [`Pipeline`] lets the caller drive execution one step at a time:
//!
//! ```rust
//! # use gammahull_core::{HullConfig, Pipeline, Point};
//! let points = vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(10.0, 0.0),
//!     Point::new(10.0, 10.0),
//!     Point::new(0.0, 10.0),
//!     Point::new(5.0, 1.0),
//! ];
//! let built = Pipeline::new(points).build_convex();
//! assert_eq!(built.convex().len(), 4);
//!
//! let result = built.refine(&HullConfig::default()).into_result();
//! assert_eq!(result.concave.len(), 5);
//! ```
//!
//! The convex hull is computed once. [`ConvexBuilt::refine`] borrows the
//! stage, so the same convex hull can be refined with several values of
//! γ without recomputing it.

use crate::concave::{self, RefinementStats};
use crate::convex::convex_hull;
use crate::types::{HullConfig, HullResult, Point, Polygon};

// ───────────────────────── Stage 0: Loaded ───────────────────────────

/// Pipeline state holding the input points, nothing computed yet.
#[must_use = "pipeline stages are consumed by advancing; call .build_convex() to continue"]
pub struct Loaded {
    points: Vec<Point>,
}

impl Loaded {
    /// The input points in load order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Compute the convex hull and advance to [`ConvexBuilt`].
    pub fn build_convex(self) -> ConvexBuilt {
        let convex = convex_hull(&self.points);
        tracing::debug!(
            points = self.points.len(),
            vertices = convex.len(),
            "convex hull built"
        );
        ConvexBuilt {
            points: self.points,
            convex,
        }
    }
}

// ───────────────────────── Stage 1: ConvexBuilt ──────────────────────

/// Pipeline state after the convex hull has been computed.
#[must_use = "call .refine() to produce the concave hull"]
pub struct ConvexBuilt {
    points: Vec<Point>,
    convex: Polygon,
}

impl ConvexBuilt {
    /// The input points in load order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The convex hull.
    #[must_use]
    pub const fn convex(&self) -> &Polygon {
        &self.convex
    }

    /// Refine the convex hull with `config` and advance to [`Refined`].
    ///
    /// Always starts from the convex hull; earlier refinements of this
    /// stage have no effect.
    pub fn refine(&self, config: &HullConfig) -> Refined {
        let (concave, stats) = concave::refine(&self.convex, &self.points, config);
        tracing::debug!(
            gamma = config.gamma.get(),
            vertices = concave.len(),
            inserted = stats.inserted,
            passes = stats.passes,
            "concave refinement finished"
        );
        Refined {
            points: self.points.clone(),
            convex: self.convex.clone(),
            concave,
            stats,
        }
    }
}

// ───────────────────────── Stage 2: Refined ──────────────────────────

/// Pipeline state after concave refinement.
#[must_use = "call .into_result() to take the hulls"]
pub struct Refined {
    points: Vec<Point>,
    convex: Polygon,
    concave: Polygon,
    stats: RefinementStats,
}

impl Refined {
    /// The convex hull refinement started from.
    #[must_use]
    pub const fn convex(&self) -> &Polygon {
        &self.convex
    }

    /// The refined hull.
    #[must_use]
    pub const fn concave(&self) -> &Polygon {
        &self.concave
    }

    /// Counters from the refinement run.
    #[must_use]
    pub const fn stats(&self) -> RefinementStats {
        self.stats
    }

    /// Consume the pipeline and return the [`HullResult`].
    #[must_use]
    pub fn into_result(self) -> HullResult {
        HullResult {
            points: self.points,
            convex: self.convex,
            concave: self.concave,
        }
    }
}

// ───────────────────────── Entry point ───────────────────────────────

/// Entry point for the typed pipeline.
///
/// Each stage method consumes or borrows the current state and returns
/// the next, making it a compile-time error to refine before the convex
/// hull exists.
pub struct Pipeline;

impl Pipeline {
    /// Create a new pipeline from a point set.
    ///
    /// No processing is performed. Call
    /// [`.build_convex()`](Loaded::build_convex) to begin.
    #[allow(clippy::new_ret_no_self)]
    pub const fn new(points: Vec<Point>) -> Loaded {
        Loaded { points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ShapeParameter;

    fn notched_square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(5.0, 9.0),
        ]
    }

    fn config(gamma: f64) -> HullConfig {
        HullConfig {
            gamma: ShapeParameter::clamped(gamma),
            ..HullConfig::default()
        }
    }

    #[test]
    fn loaded_exposes_points() {
        let loaded = Pipeline::new(notched_square());
        assert_eq!(loaded.points().len(), 5);
    }

    #[test]
    fn convex_stage_keeps_points_in_load_order() {
        let input = notched_square();
        let built = Pipeline::new(input.clone()).build_convex();
        assert_eq!(built.points(), input.as_slice());
        assert_eq!(built.convex().len(), 4);
    }

    #[test]
    fn refine_can_run_repeatedly_from_same_convex_hull() {
        let built = Pipeline::new(notched_square()).build_convex();

        let tight = built.refine(&config(0.0));
        let loose = built.refine(&config(2.0));
        let tight_again = built.refine(&config(0.0));

        assert_eq!(tight.concave().len(), 4);
        assert_eq!(loose.concave().len(), 5);
        assert_eq!(tight.concave(), tight_again.concave());
        assert_eq!(loose.convex(), built.convex());
    }

    #[test]
    fn stats_track_insertions() {
        let refined = Pipeline::new(notched_square())
            .build_convex()
            .refine(&config(2.0));
        let stats = refined.stats();
        assert_eq!(stats.remaining_before, 1);
        assert_eq!(stats.inserted, 1);
        assert_eq!(stats.remaining_after, 0);
    }

    #[test]
    fn into_result_carries_every_stage() {
        let input = notched_square();
        let result = Pipeline::new(input.clone())
            .build_convex()
            .refine(&config(2.0))
            .into_result();
        assert_eq!(result.points, input);
        assert_eq!(result.convex.len(), 4);
        assert_eq!(result.concave.len(), 5);
    }

    #[test]
    fn empty_input_flows_through() {
        let result = Pipeline::new(Vec::new())
            .build_convex()
            .refine(&HullConfig::default())
            .into_result();
        assert!(result.points.is_empty());
        assert!(result.convex.is_empty());
        assert!(result.concave.is_empty());
    }
}
