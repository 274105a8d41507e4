//! Pipeline diagnostics: timing and counts for each stage.
//!
//! Timing is injected through the [`Clock`] trait so this crate stays
//! free of platform time sources; the caller decides what "now" means.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::concave::RefinementStats;
use crate::pipeline::Pipeline;
use crate::types::{HullConfig, HullResult, Point};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// A monotonic time source.
pub trait Clock {
    /// Opaque timestamp type.
    type Instant;

    /// The current time.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Diagnostics collected from a single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HullDiagnostics {
    /// Stage 1: convex hull construction.
    pub convex: StageDiagnostics,
    /// Stage 2: concave refinement.
    pub concave: StageDiagnostics,
    /// Total wall-clock duration of the pipeline (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts across stages.
    pub summary: HullSummary,
}

/// Diagnostics for a single stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Convex hull metrics.
    ConvexHull {
        /// Points in the input set.
        input_points: usize,
        /// Vertices on the convex hull.
        hull_vertices: usize,
    },
    /// Concave refinement metrics.
    ConcaveHull {
        /// γ used for this run.
        gamma: f64,
        /// Refinement counters.
        stats: RefinementStats,
    },
}

/// High-level summary for the whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HullSummary {
    /// Points in the input set.
    pub input_points: usize,
    /// Vertices on the convex hull.
    pub convex_vertices: usize,
    /// Vertices on the refined hull.
    pub concave_vertices: usize,
}

impl HullDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Hull Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Points: {}  |  Convex hull: {}  |  Concave hull: {}",
            self.summary.input_points, self.summary.convex_vertices, self.summary.concave_vertices,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<16} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(72));

        let total_ms = duration_ms(self.total_duration);
        for (name, diag) in [("Convex Hull", &self.convex), ("Concave Hull", &self.concave)] {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<16} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::ConvexHull {
            input_points,
            hull_vertices,
        } => format!("{input_points} pts -> {hull_vertices} vertices"),
        StageMetrics::ConcaveHull { gamma, stats } => format!(
            "gamma={gamma:.2} inserted={} remaining={}->{} passes={} (parallel={})",
            stats.inserted,
            stats.remaining_before,
            stats.remaining_after,
            stats.passes,
            stats.parallel_passes,
        ),
    }
}

/// Run the full pipeline, timing each stage with `clock`.
#[must_use = "returns the hulls and their diagnostics"]
pub fn process_with_diagnostics<C: Clock>(
    points: Vec<Point>,
    config: &HullConfig,
    clock: &C,
) -> (HullResult, HullDiagnostics) {
    let input_points = points.len();
    let start = clock.now();

    let convex_start = clock.now();
    let built = Pipeline::new(points).build_convex();
    let convex = StageDiagnostics {
        duration: clock.elapsed(&convex_start),
        metrics: StageMetrics::ConvexHull {
            input_points,
            hull_vertices: built.convex().len(),
        },
    };

    let concave_start = clock.now();
    let refined = built.refine(config);
    let concave = StageDiagnostics {
        duration: clock.elapsed(&concave_start),
        metrics: StageMetrics::ConcaveHull {
            gamma: config.gamma.get(),
            stats: refined.stats(),
        },
    };

    let result = refined.into_result();
    let total_duration = clock.elapsed(&start);
    let summary = HullSummary {
        input_points,
        convex_vertices: result.convex.len(),
        concave_vertices: result.concave.len(),
    };

    (
        result,
        HullDiagnostics {
            convex,
            concave,
            total_duration,
            summary,
        },
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Clock that advances one millisecond per reading.
    struct TickClock(Cell<u64>);

    impl Clock for TickClock {
        type Instant = u64;

        fn now(&self) -> u64 {
            let t = self.0.get();
            self.0.set(t + 1);
            t
        }

        fn elapsed(&self, since: &u64) -> Duration {
            Duration::from_millis(self.now() - since)
        }
    }

    fn sample() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(5.0, 1.0),
        ]
    }

    #[test]
    fn duration_ms_converts_correctly() {
        let ms = duration_ms(Duration::from_millis(1234));
        assert!((ms - 1234.0).abs() < 0.01);
    }

    #[test]
    fn diagnostics_count_stages() {
        let clock = TickClock(Cell::new(0));
        let (result, diag) = process_with_diagnostics(sample(), &HullConfig::default(), &clock);

        assert_eq!(diag.summary.input_points, 5);
        assert_eq!(diag.summary.convex_vertices, 4);
        assert_eq!(diag.summary.concave_vertices, 5);
        assert_eq!(result.concave.len(), 5);
        assert!(diag.total_duration >= diag.convex.duration + diag.concave.duration);

        match diag.concave.metrics {
            StageMetrics::ConcaveHull { stats, .. } => {
                assert_eq!(stats.inserted, 1);
                assert_eq!(stats.remaining_after, 0);
            }
            StageMetrics::ConvexHull { .. } => unreachable!("wrong metrics variant"),
        }
    }

    #[test]
    fn report_mentions_stages() {
        let clock = TickClock(Cell::new(0));
        let (_, diag) = process_with_diagnostics(sample(), &HullConfig::default(), &clock);
        let report = diag.report();
        assert!(report.contains("Hull Diagnostics Report"));
        assert!(report.contains("Convex Hull"));
        assert!(report.contains("Concave Hull"));
        assert!(report.contains("inserted=1"));
    }

    #[test]
    fn diagnostics_serialize_durations_as_seconds() {
        let clock = TickClock(Cell::new(0));
        let (_, diag) = process_with_diagnostics(sample(), &HullConfig::default(), &clock);
        let json = serde_json::to_value(&diag).unwrap();
        assert!(json["total_duration"].is_f64());
        let back: HullDiagnostics = serde_json::from_value(json).unwrap();
        assert_eq!(back.summary.concave_vertices, diag.summary.concave_vertices);
    }
}
