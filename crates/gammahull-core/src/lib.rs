//! gammahull-core: convex and concave hulls of planar point sets (sans-IO).
//!
//! Builds a boundary polygon for a set of 2D points in two stages:
//! convex hull (Graham scan) -> concave refinement controlled by the
//! shape parameter γ.
//!
//! Refinement repeatedly takes the longest boundary edge and pulls in
//! the remaining point that carves the smallest triangle out of the
//! polygon, subject to a γ-scaled admissibility test and a simplicity
//! check. The per-pass candidate search can run on the rayon worker pool
//! with results identical to the sequential scan.
//!
//! This crate has **no I/O dependencies**: it operates on in-memory
//! point slices. Parsing and rendering live in `gammahull-export`.

pub mod concave;
pub mod convex;
pub mod diagnostics;
pub mod geometry;
pub mod pipeline;
pub mod search;
pub mod types;

pub use concave::{RefinementStats, concave_hull};
pub use convex::convex_hull;
pub use diagnostics::{Clock, HullDiagnostics, process_with_diagnostics};
pub use pipeline::Pipeline;
pub use search::CandidateSearchKind;
pub use types::{HullConfig, HullError, HullResult, Point, Polygon, ShapeParameter};

/// Run the full pipeline.
///
/// # Pipeline steps
///
/// 1. Convex hull of `points`
/// 2. Concave refinement of the convex hull with `config`
///
/// Never fails: fewer than 3 points, or input collapsing to a line,
/// produces a degenerate result that is returned as-is.
#[must_use = "returns the hulls"]
pub fn process(points: Vec<Point>, config: &HullConfig) -> HullResult {
    Pipeline::new(points)
        .build_convex()
        .refine(config)
        .into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_square_with_interior_point() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(5.0, 1.0),
        ];
        let result = process(points, &HullConfig::default());
        assert_eq!(result.convex.len(), 4);
        assert_eq!(
            result.concave.points(),
            &[
                Point::new(0.0, 0.0),
                Point::new(5.0, 1.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(0.0, 10.0),
            ],
        );
    }

    #[test]
    fn process_single_point() {
        let result = process(vec![Point::new(1.0, 1.0)], &HullConfig::default());
        assert_eq!(result.convex.points(), &[Point::new(1.0, 1.0)]);
        assert_eq!(result.concave.points(), &[Point::new(1.0, 1.0)]);
    }

    #[test]
    fn process_matches_staged_pipeline() {
        let points: Vec<Point> = (0..40)
            .map(|i| {
                let t = f64::from(i);
                Point::new((t * 7.3) % 13.0, (t * 3.1) % 11.0)
            })
            .collect();
        let config = HullConfig {
            gamma: ShapeParameter::clamped(1.0),
            ..HullConfig::default()
        };
        let direct = process(points.clone(), &config);
        let staged = Pipeline::new(points)
            .build_convex()
            .refine(&config)
            .into_result();
        assert_eq!(direct, staged);
    }
}
