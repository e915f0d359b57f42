//! Clustering engine: stages, canopy selection, refinement, orchestration.

pub mod canopy;
pub mod emit;
pub mod ingest;
pub mod pipeline;
pub mod refine;
pub mod stage;

pub use canopy::{CanopyOutcome, CanopySelector};
pub use emit::{ClusterTriple, ResultEmitter};
pub use ingest::RatingIngest;
pub use pipeline::{ClusterReport, Pipeline};
pub use refine::{ClusterRefiner, RefineOutcome};
pub use stage::{group_by_key, LocalExecutor, Stage};
