//! End-to-end orchestration: ingest, score, snapshot, canopy, refine, emit.

use std::io::BufRead;

use serde::Serialize;

use crate::config::ClusterConfig;
use crate::format::{ResultSink, SimilarityStore};
use crate::graph::{PairSimilarityBuilder, SimilarityMatrix};
use crate::index::ClusterAssignment;
use crate::types::{CanopyResult, MovieId};

use super::canopy::CanopySelector;
use super::emit::ResultEmitter;
use super::ingest::RatingIngest;
use super::refine::ClusterRefiner;
use super::stage::LocalExecutor;

/// Summary of a clustering run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterReport {
    /// Centers chosen by the canopy pass, in selection order.
    pub canopy_centers: Vec<MovieId>,
    /// Distinct centers after the last refinement round, ascending.
    pub final_centers: Vec<MovieId>,
    /// Clusters whose center moved, per refinement round.
    pub moved_per_round: Vec<usize>,
    /// Number of `(center, member, row)` triples written.
    pub triples_emitted: usize,
}

/// Runs the phases in order. Each phase finishes before the next starts.
pub struct Pipeline {
    config: ClusterConfig,
    executor: LocalExecutor,
}

impl Pipeline {
    /// Validate the configuration and start the worker pool.
    pub fn new(config: ClusterConfig) -> CanopyResult<Self> {
        config.validate()?;
        let executor = LocalExecutor::new(config.workers)?;
        log::debug!(
            "Pipeline ready: {} workers, {:?}",
            executor.workers(),
            config
        );
        Ok(Self { config, executor })
    }

    /// The validated configuration.
    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// The stage executor.
    pub fn executor(&self) -> &LocalExecutor {
        &self.executor
    }

    /// Ingest ratings and score every co-rated movie pair.
    pub fn build_similarity(&self, ratings: impl BufRead) -> CanopyResult<SimilarityMatrix> {
        let vectors = RatingIngest::new().ingest(&self.executor, ratings)?;
        PairSimilarityBuilder::new().build(&self.executor, vectors)
    }

    /// Canopy, refinement and output over a complete matrix.
    pub fn cluster(
        &self,
        matrix: &SimilarityMatrix,
        sink: &mut dyn ResultSink,
    ) -> CanopyResult<ClusterReport> {
        let movie_count = self.config.movie_count;
        if let Some(max_id) = matrix.max_movie_id() {
            if max_id > movie_count {
                log::warn!(
                    "Similarity store mentions movie {} beyond the universe of {}; those movies are not clustered",
                    max_id,
                    movie_count
                );
            }
        }

        let canopy = CanopySelector::from_config(&self.config)?.select(matrix, movie_count);
        let records = canopy.assignment.to_records()?;

        let refined = ClusterRefiner::from_config(&self.config).refine(
            &self.executor,
            matrix,
            records,
        )?;
        let final_assignment = ClusterAssignment::from_records(movie_count, &refined.records);
        log::info!(
            "Refinement finished after {} rounds with {} clusters",
            refined.moved_per_round.len(),
            final_assignment.cluster_count()
        );
        let final_centers: Vec<MovieId> = final_assignment.centers().into_iter().collect();

        let triples_emitted =
            ResultEmitter::new(matrix).emit(&self.executor, refined.records, sink)?;

        Ok(ClusterReport {
            canopy_centers: canopy.centers,
            final_centers,
            moved_per_round: refined.moved_per_round,
            triples_emitted,
        })
    }

    /// Full run through a similarity store snapshot: the matrix is written,
    /// then reloaded from the store before clustering.
    pub fn run(
        &self,
        ratings: impl BufRead,
        store: &SimilarityStore,
        sink: &mut dyn ResultSink,
    ) -> CanopyResult<ClusterReport> {
        let built = self.build_similarity(ratings)?;
        store.write_snapshot(&built)?;
        drop(built);
        let matrix = store.load()?;
        self.cluster(&matrix, sink)
    }

    /// Full run keeping the matrix in memory.
    pub fn run_in_memory(
        &self,
        ratings: impl BufRead,
        sink: &mut dyn ResultSink,
    ) -> CanopyResult<ClusterReport> {
        let matrix = self.build_similarity(ratings)?;
        self.cluster(&matrix, sink)
    }
}
