//! Canopy selection: greedy, sequential choice of initial cluster centers.

use crate::config::ClusterConfig;
use crate::graph::SimilarityMatrix;
use crate::index::ClusterAssignment;
use crate::types::{CanopyError, CanopyResult, MovieId};

/// Result of a canopy pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanopyOutcome {
    /// Centers in the order they were chosen (ascending).
    pub centers: Vec<MovieId>,
    /// Initial movie -> center map.
    pub assignment: ClusterAssignment,
}

/// Greedy canopy center selection over the movie universe.
///
/// Movies are visited in ascending id order. The smallest movie still in the
/// working set becomes a center; every remaining movie scoring above `t1`
/// against it is (re)assigned to it, and every one scoring above `t2` leaves
/// the working set. A later center may take over a movie an earlier center
/// only loosely claimed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanopySelector {
    t1: f64,
    t2: f64,
}

impl CanopySelector {
    /// Create a selector; `t2` must not be below `t1`.
    pub fn new(t1: f64, t2: f64) -> CanopyResult<Self> {
        if !(t1.is_finite() && t2.is_finite()) || t2 < t1 {
            return Err(CanopyError::InvalidConfig(format!(
                "canopy thresholds require finite t2 >= t1 (t1 = {}, t2 = {})",
                t1, t2
            )));
        }
        Ok(Self { t1, t2 })
    }

    /// Selector using the configured thresholds.
    pub fn from_config(config: &ClusterConfig) -> CanopyResult<Self> {
        Self::new(config.t1, config.t2)
    }

    /// Loose threshold.
    pub fn t1(&self) -> f64 {
        self.t1
    }

    /// Tight threshold.
    pub fn t2(&self) -> f64 {
        self.t2
    }

    /// Run the canopy pass over `1..=movie_count`.
    pub fn select(&self, matrix: &SimilarityMatrix, movie_count: u32) -> CanopyOutcome {
        let mut working: Vec<MovieId> = (1..=movie_count).collect();
        let mut assignment = ClusterAssignment::new(movie_count);
        let mut centers = Vec::new();

        while !working.is_empty() {
            let center = working[0];
            centers.push(center);
            assignment.assign(center, center);

            let center_row = matrix.row(center);
            let mut remaining = Vec::with_capacity(working.len() - 1);
            for &point in &working[1..] {
                let Some(&score) = center_row.get(&point) else {
                    remaining.push(point);
                    continue;
                };
                if score > self.t1 {
                    assignment.assign(point, center);
                }
                if score <= self.t2 {
                    remaining.push(point);
                }
            }
            working = remaining;
        }

        log::info!(
            "Canopy pass chose {} centers for {} movies (t1 = {}, t2 = {})",
            centers.len(),
            movie_count,
            self.t1,
            self.t2
        );
        CanopyOutcome {
            centers,
            assignment,
        }
    }
}
