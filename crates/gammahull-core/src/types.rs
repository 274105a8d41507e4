//! Shared types for the gammahull pipeline.

use serde::{Deserialize, Serialize};

use crate::geometry::{self, EPSILON};
use crate::search::CandidateSearchKind;

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        geometry::squared_distance(self, other)
    }

    /// Coordinate equality within [`EPSILON`] on each axis.
    ///
    /// This is the equality the hull algorithms use for deduplication
    /// and edge matching; the derived `PartialEq` is exact.
    #[must_use]
    pub fn approx_eq(self, other: Self) -> bool {
        (self.x - other.x).abs() < EPSILON && (self.y - other.y).abs() < EPSILON
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A closed boundary traversed counter-clockwise.
///
/// The last point implicitly connects back to the first. Fewer than 3
/// points is a degenerate polygon: it is carried through the pipeline
/// unchanged but has no area or edges to refine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon(Vec<Point>);

impl Polygon {
    /// Create a polygon from its vertices in traversal order.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns `true` if the polygon has no vertices.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of vertices.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for 0, 1 or 2 vertices.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.0.len() < 3
    }

    /// Returns a slice of all vertices.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Consumes the polygon and returns the underlying vector of vertices.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }

    /// Iterate over edges `(start, end)` including the closing edge.
    ///
    /// Degenerate polygons yield no edges.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = if self.is_degenerate() { 0 } else { self.0.len() };
        (0..n).map(move |i| (self.0[i], self.0[(i + 1) % n]))
    }

    /// Signed area by the shoelace formula.
    ///
    /// Positive for counter-clockwise traversal, zero when degenerate.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        self.edges()
            .map(|(a, b)| a.x.mul_add(b.y, -(b.x * a.y)))
            .sum::<f64>()
            / 2.0
    }

    /// Whether any vertex matches `point` within [`EPSILON`].
    #[must_use]
    pub fn contains_vertex(&self, point: Point) -> bool {
        self.0.iter().any(|v| v.approx_eq(point))
    }

    /// Insert `point` so that it follows the vertex at `index`.
    pub(crate) fn insert_after(&mut self, index: usize, point: Point) {
        self.0.insert(index + 1, point);
    }
}

impl From<Vec<Point>> for Polygon {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

/// The concavity parameter γ, always within [`MIN`](Self::MIN)..=[`MAX`](Self::MAX).
///
/// Candidates are admitted into an edge when
/// `d1 + d2 - d0 < γ * min(d1, d2)` over squared lengths, so larger
/// values admit points farther away from the edge.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ShapeParameter(f64);

impl ShapeParameter {
    /// Smallest allowed γ.
    pub const MIN: f64 = 0.0;
    /// Largest allowed γ.
    pub const MAX: f64 = 2.0;

    /// Clamp `gamma` into the valid range.
    ///
    /// NaN maps to [`MIN`](Self::MIN).
    #[must_use]
    pub fn clamped(gamma: f64) -> Self {
        if gamma.is_nan() {
            return Self(Self::MIN);
        }
        Self(gamma.clamp(Self::MIN, Self::MAX))
    }

    /// Validate `gamma` without clamping.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::InvalidShapeParameter`] if `gamma` is NaN or
    /// outside `[0, 2]`.
    pub fn try_new(gamma: f64) -> Result<Self, HullError> {
        if (Self::MIN..=Self::MAX).contains(&gamma) {
            Ok(Self(gamma))
        } else {
            Err(HullError::InvalidShapeParameter(gamma))
        }
    }

    /// The raw value.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for ShapeParameter {
    type Error = HullError;

    fn try_from(gamma: f64) -> Result<Self, Self::Error> {
        Self::try_new(gamma)
    }
}

impl From<ShapeParameter> for f64 {
    fn from(gamma: ShapeParameter) -> Self {
        gamma.0
    }
}

/// Configuration for the concave refinement stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HullConfig {
    /// Concavity parameter.
    pub gamma: ShapeParameter,

    /// Which candidate search strategy to use.
    pub search: CandidateSearchKind,

    /// Remaining-point count above which [`CandidateSearchKind::Auto`]
    /// partitions the search across the worker pool.
    pub parallel_threshold: usize,
}

impl HullConfig {
    /// Default concavity: the most conservative setting.
    pub const DEFAULT_GAMMA: f64 = 0.0;

    /// Default parallel threshold.
    pub const DEFAULT_PARALLEL_THRESHOLD: usize = 100;

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::InvalidConfig`] if `parallel_threshold` is
    /// zero. The shape parameter is range-checked on construction.
    pub fn validate(&self) -> Result<(), HullError> {
        if self.parallel_threshold == 0 {
            return Err(HullError::InvalidConfig(
                "parallel_threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for HullConfig {
    fn default() -> Self {
        Self {
            gamma: ShapeParameter::clamped(Self::DEFAULT_GAMMA),
            search: CandidateSearchKind::default(),
            parallel_threshold: Self::DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// Result of running the full pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HullResult {
    /// The input point set, in load order.
    pub points: Vec<Point>,
    /// The convex hull of `points`.
    pub convex: Polygon,
    /// The refined, possibly concave, hull.
    pub concave: Polygon,
}

/// Errors from validating constructors.
///
/// The hull algorithms themselves never fail: degenerate input comes
/// back unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HullError {
    /// γ was NaN or outside `[0, 2]`.
    #[error("shape parameter must be within [0, 2], got {0}")]
    InvalidShapeParameter(f64),

    /// Configuration is invalid.
    #[error("invalid hull configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn point_distance_squared() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_squared(b) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn point_approx_eq_within_tolerance() {
        let a = Point::new(1.0, 2.0);
        assert!(a.approx_eq(Point::new(1.0 + 1e-10, 2.0 - 1e-10)));
        assert!(!a.approx_eq(Point::new(1.0 + 1e-8, 2.0)));
        assert!(!a.approx_eq(Point::new(1.0, 2.0 + 1e-8)));
    }

    #[test]
    fn polygon_edges_close_the_loop() {
        let square = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]);
        let edges: Vec<_> = square.edges().collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3], (Point::new(0.0, 1.0), Point::new(0.0, 0.0)));
    }

    #[test]
    fn degenerate_polygon_has_no_edges() {
        let pair = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        assert!(pair.is_degenerate());
        assert_eq!(pair.edges().count(), 0);
        assert!(pair.signed_area().abs() < f64::EPSILON);
    }

    #[test]
    fn signed_area_is_positive_for_ccw() {
        let ccw = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 3.0),
        ]);
        assert!((ccw.signed_area() - 6.0).abs() < 1e-12);

        let mut cw = ccw.into_points();
        cw.reverse();
        assert!((Polygon::new(cw).signed_area() + 6.0).abs() < 1e-12);
    }

    #[test]
    fn contains_vertex_uses_tolerance() {
        let tri = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ]);
        assert!(tri.contains_vertex(Point::new(1.0 + 1e-12, 0.0)));
        assert!(!tri.contains_vertex(Point::new(0.5, 0.5)));
    }

    #[test]
    fn shape_parameter_clamps() {
        assert!((ShapeParameter::clamped(-1.0).get() - 0.0).abs() < f64::EPSILON);
        assert!((ShapeParameter::clamped(5.0).get() - 2.0).abs() < f64::EPSILON);
        assert!((ShapeParameter::clamped(1.25).get() - 1.25).abs() < f64::EPSILON);
        assert!((ShapeParameter::clamped(f64::NAN).get() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn shape_parameter_try_new_rejects_out_of_range() {
        assert!(ShapeParameter::try_new(2.0).is_ok());
        assert_eq!(
            ShapeParameter::try_new(2.5),
            Err(HullError::InvalidShapeParameter(2.5)),
        );
        assert!(ShapeParameter::try_new(f64::NAN).is_err());
    }

    #[test]
    fn config_defaults() {
        let config = HullConfig::default();
        assert!((config.gamma.get() - 0.0).abs() < f64::EPSILON);
        assert_eq!(config.search, CandidateSearchKind::Auto);
        assert_eq!(config.parallel_threshold, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_rejects_zero_threshold() {
        let config = HullConfig {
            parallel_threshold: 0,
            ..HullConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(HullError::InvalidConfig(_))
        ));
    }

    #[test]
    fn error_display() {
        assert_eq!(
            HullError::InvalidShapeParameter(3.0).to_string(),
            "shape parameter must be within [0, 2], got 3",
        );
        assert_eq!(
            HullError::InvalidConfig("bad".to_string()).to_string(),
            "invalid hull configuration: bad",
        );
    }

    #[test]
    fn config_json_uses_plain_gamma() {
        let config = HullConfig {
            gamma: ShapeParameter::clamped(1.5),
            search: CandidateSearchKind::Parallel,
            parallel_threshold: 10,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"gamma\":1.5"), "unexpected json: {json}");
        let back: HullConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn config_json_rejects_out_of_range_gamma() {
        let result: Result<HullConfig, _> = serde_json::from_str(r#"{"gamma": 7.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn config_json_fills_missing_fields() {
        let config: HullConfig = serde_json::from_str(r#"{"gamma": 0.5}"#).unwrap();
        assert_eq!(config.parallel_threshold, 100);
        assert_eq!(config.search, CandidateSearchKind::Auto);
    }
}
