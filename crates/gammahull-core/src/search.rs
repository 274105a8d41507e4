//! Candidate search: find the interior point to pull into an edge.
//!
//! Each refinement pass asks for the remaining point that is admissible
//! for the current longest edge, keeps the polygon simple, and carves the
//! smallest triangle. This module defines the [`CandidateSearchKind`]
//! enum for choosing between a sequential scan and a partitioned scan on
//! the rayon worker pool.
//!
//! # Determinism
//!
//! Both paths select the same candidate for the same input. The
//! sequential scan keeps the first strict minimum in slice order. The
//! parallel scan splits the slice into contiguous chunks, keeps the first
//! strict minimum per chunk, and reduces the per-chunk winners in chunk
//! order with the same strict `<`, so ties always go to the lowest index
//! regardless of worker count or scheduling.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::concave::EdgeProbe;
use crate::types::Point;

/// Selects how the remaining points are scanned for the best candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CandidateSearchKind {
    /// Partition across the worker pool only when the remaining point
    /// count exceeds the configured threshold.
    #[default]
    Auto,

    /// Always scan on the calling thread.
    Sequential,

    /// Always partition across the worker pool.
    Parallel,
}

/// Which scan actually ran for a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPath {
    /// Scanned on the calling thread.
    Sequential,
    /// Partitioned across the worker pool.
    Parallel,
}

/// A remaining point that qualifies for insertion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Index into the remaining-points slice that was searched.
    pub index: usize,
    /// The point itself.
    pub point: Point,
    /// Area of the triangle the insertion carves out of the polygon.
    pub area: f64,
}

impl CandidateSearchKind {
    /// Resolve which scan to run for `remaining` points.
    #[must_use]
    pub const fn path(self, remaining: usize, parallel_threshold: usize) -> SearchPath {
        match self {
            Self::Auto if remaining > parallel_threshold => SearchPath::Parallel,
            Self::Auto | Self::Sequential => SearchPath::Sequential,
            Self::Parallel => SearchPath::Parallel,
        }
    }

    /// Find the minimum-area qualifying candidate among `remaining`.
    ///
    /// Returns the candidate (if any) together with the scan that ran.
    #[must_use]
    pub fn search(
        self,
        remaining: &[Point],
        probe: &EdgeProbe<'_>,
        parallel_threshold: usize,
    ) -> (Option<Candidate>, SearchPath) {
        let path = self.path(remaining.len(), parallel_threshold);
        let best = match path {
            SearchPath::Sequential => search_sequential(remaining, probe),
            SearchPath::Parallel => search_parallel(remaining, probe),
        };
        (best, path)
    }
}

/// Scan every remaining point on the calling thread.
#[must_use]
pub fn search_sequential(remaining: &[Point], probe: &EdgeProbe<'_>) -> Option<Candidate> {
    scan(remaining, 0, probe)
}

/// Scan contiguous chunks of `remaining` on the rayon pool, one chunk per
/// worker thread, then reduce the per-chunk winners in chunk order.
#[must_use]
pub fn search_parallel(remaining: &[Point], probe: &EdgeProbe<'_>) -> Option<Candidate> {
    if remaining.is_empty() {
        return None;
    }

    let workers = rayon::current_num_threads().max(1);
    let chunk_size = remaining.len().div_ceil(workers);

    let partials: Vec<Option<Candidate>> = remaining
        .par_chunks(chunk_size)
        .enumerate()
        .map(|(chunk, points)| {
            let local = scan(points, chunk * chunk_size, probe);
            tracing::trace!(
                chunk,
                len = points.len(),
                found = local.is_some(),
                "partition scanned"
            );
            local
        })
        .collect();

    partials.into_iter().flatten().fold(None, keep_smaller)
}

/// First strict minimum over `points`, reporting indices shifted by `offset`.
fn scan(points: &[Point], offset: usize, probe: &EdgeProbe<'_>) -> Option<Candidate> {
    points
        .iter()
        .enumerate()
        .filter_map(|(i, &point)| {
            probe.evaluate(point).map(|area| Candidate {
                index: offset + i,
                point,
                area,
            })
        })
        .fold(None, keep_smaller)
}

/// Replace `best` only when `next` is strictly smaller.
#[allow(clippy::unnecessary_wraps)]
fn keep_smaller(best: Option<Candidate>, next: Candidate) -> Option<Candidate> {
    match best {
        Some(current) if current.area <= next.area => Some(current),
        _ => Some(next),
    }
}
