//! movie-canopy — clusters movies by rating behaviour.
//!
//! Ratings are grouped per user and expanded into co-rated movie pairs, each
//! pair is scored with a co-rating cosine, and the resulting sparse matrix
//! seeds a greedy canopy pass. Canopy clusters are then refined for a fixed
//! number of rounds by re-picking each cluster's medoid.

pub mod cli;
pub mod config;
pub mod engine;
pub mod format;
pub mod graph;
pub mod index;
pub mod types;

// Re-export commonly used types at the crate root
pub use config::{load_config, parse_config, ClusterConfig};
pub use engine::{
    CanopyOutcome, CanopySelector, ClusterRefiner, ClusterReport, ClusterTriple, LocalExecutor,
    Pipeline, RatingIngest, RefineOutcome, ResultEmitter, Stage,
};
pub use format::{
    JsonLinesSink, MemorySink, ResultSink, SimilarityStore, StoreReader, StoreWriter, TextSink,
};
pub use graph::{co_rating_cosine, PairSimilarityBuilder, SimilarityMatrix, SimilarityRow};
pub use index::{ClusterAssignment, MemberRecord};
pub use types::{
    CanopyError, CanopyResult, MovieId, MoviePairKey, MoviePairSample, RatingRecord, UserId,
    UserRatingVector, MISSING_SIMILARITY, ZERO_MAGNITUDE_SIMILARITY,
};
