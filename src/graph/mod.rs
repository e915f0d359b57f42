//! Similarity graph — the sparse matrix and the pair builder that fills it.

pub mod builder;
pub mod similarity_matrix;

pub use builder::{co_rating_cosine, PairSimilarityBuilder};
pub use similarity_matrix::{SimilarityMatrix, SimilarityRow};
