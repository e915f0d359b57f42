//! Medoid-style refinement of canopy clusters.

use std::collections::BTreeSet;

use crate::config::ClusterConfig;
use crate::graph::{SimilarityMatrix, SimilarityRow};
use crate::index::MemberRecord;
use crate::types::{CanopyResult, MovieId, MISSING_SIMILARITY};

use super::stage::{LocalExecutor, Stage};

/// Records after refinement plus per-round movement counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefineOutcome {
    /// Every movie with its final center.
    pub records: Vec<MemberRecord>,
    /// For each round, how many clusters changed their center.
    pub moved_per_round: Vec<usize>,
}

/// Re-picks each cluster's center as the member whose similarity product
/// with every other member is largest.
///
/// A missing pairwise similarity counts as `missing_similarity` both for the
/// incumbent center and for every candidate. Candidates are scanned in
/// ascending movie order and only a strictly larger score replaces the
/// current best, so ties keep the incumbent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterRefiner {
    iterations: usize,
    missing_similarity: f64,
}

impl ClusterRefiner {
    /// Create a refiner running `iterations` rounds.
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            missing_similarity: MISSING_SIMILARITY,
        }
    }

    /// Refiner using the configured round count.
    pub fn from_config(config: &ClusterConfig) -> Self {
        Self::new(config.iterations)
    }

    /// Override the fallback used for absent similarities.
    pub fn with_missing_similarity(mut self, value: f64) -> Self {
        self.missing_similarity = value;
        self
    }

    /// Number of rounds.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Product of `similarity(member, candidate)` over every other member,
    /// read from each member's own row.
    pub fn score(&self, candidate: MovieId, members: &[(MovieId, &SimilarityRow)]) -> f64 {
        members
            .iter()
            .filter(|(movie, _)| *movie != candidate)
            .map(|(_, row)| row.get(&candidate).copied().unwrap_or(self.missing_similarity))
            .product()
    }

    /// Best center for one cluster. `members` must include every member of
    /// the cluster, sorted ascending by movie.
    pub fn best_center(&self, center: MovieId, members: &[(MovieId, &SimilarityRow)]) -> MovieId {
        let mut best = center;
        let mut best_score = self.score(center, members);
        for &(candidate, _) in members {
            let score = self.score(candidate, members);
            if score > best_score {
                best = candidate;
                best_score = score;
            }
        }
        best
    }

    /// Run one round: group by center, recompute each center, reassign.
    pub fn refine_round(
        &self,
        executor: &LocalExecutor,
        matrix: &SimilarityMatrix,
        records: Vec<MemberRecord>,
    ) -> CanopyResult<Vec<MemberRecord>> {
        executor.run(
            &RefineRound {
                refiner: self,
                matrix,
            },
            records,
        )
    }

    /// Run every configured round, each one to completion before the next.
    pub fn refine(
        &self,
        executor: &LocalExecutor,
        matrix: &SimilarityMatrix,
        mut records: Vec<MemberRecord>,
    ) -> CanopyResult<RefineOutcome> {
        let mut moved_per_round = Vec::with_capacity(self.iterations);
        for round in 1..=self.iterations {
            let before = center_set(&records);
            records = self.refine_round(executor, matrix, records)?;
            let after = center_set(&records);
            let moved = before.difference(&after).count();
            log::debug!(
                "Refinement round {}/{}: {} clusters, {} centers moved",
                round,
                self.iterations,
                after.len(),
                moved
            );
            moved_per_round.push(moved);
        }
        Ok(RefineOutcome {
            records,
            moved_per_round,
        })
    }
}

fn center_set(records: &[MemberRecord]) -> BTreeSet<MovieId> {
    records.iter().map(|r| r.center).collect()
}

/// One refinement round as a grouped stage. Each member carries its stored
/// similarity row into the reduce.
struct RefineRound<'a> {
    refiner: &'a ClusterRefiner,
    matrix: &'a SimilarityMatrix,
}

impl<'a> Stage for RefineRound<'a> {
    type Input = MemberRecord;
    type Key = MovieId;
    type Value = (MovieId, &'a SimilarityRow);
    type Output = MemberRecord;

    fn name(&self) -> &'static str {
        "refine"
    }

    fn map(&self, record: MemberRecord) -> CanopyResult<Vec<(MovieId, (MovieId, &'a SimilarityRow))>> {
        Ok(vec![(record.center, (record.movie, self.matrix.row(record.movie)))])
    }

    fn reduce(
        &self,
        center: MovieId,
        mut members: Vec<(MovieId, &'a SimilarityRow)>,
    ) -> CanopyResult<Vec<MemberRecord>> {
        members.sort_unstable_by_key(|(movie, _)| *movie);
        let new_center = self.refiner.best_center(center, &members);
        if new_center != center {
            log::debug!(
                "Cluster of {} members moved center {} -> {}",
                members.len(),
                center,
                new_center
            );
        }
        Ok(members
            .into_iter()
            .map(|(movie, _)| MemberRecord::new(movie, new_center))
            .collect())
    }
}
