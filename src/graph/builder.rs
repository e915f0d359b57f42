//! Pair similarity construction from per-user rating vectors.

use crate::engine::stage::{LocalExecutor, Stage};
use crate::types::{
    CanopyResult, MoviePairKey, MoviePairSample, UserRatingVector, ZERO_MAGNITUDE_SIMILARITY,
};

use super::SimilarityMatrix;

/// Expands every user's ratings into co-rating samples, groups them by
/// canonical pair and scores each pair with [`co_rating_cosine`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PairSimilarityBuilder;

impl PairSimilarityBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self
    }

    /// Score every co-rated pair and collect the results into a matrix.
    pub fn build(
        &self,
        executor: &LocalExecutor,
        vectors: Vec<UserRatingVector>,
    ) -> CanopyResult<SimilarityMatrix> {
        let users = vectors.len();
        let scored = executor.run(self, vectors)?;
        let matrix = SimilarityMatrix::from_pairs(scored);
        log::info!(
            "Scored {} movie pairs across {} movies from {} users",
            matrix.pair_count(),
            matrix.movie_count(),
            users
        );
        Ok(matrix)
    }
}

impl Stage for PairSimilarityBuilder {
    type Input = UserRatingVector;
    type Key = MoviePairKey;
    type Value = MoviePairSample;
    type Output = (MoviePairKey, f64);

    fn name(&self) -> &'static str {
        "pair-similarity"
    }

    fn map(&self, input: UserRatingVector) -> CanopyResult<Vec<(MoviePairKey, MoviePairSample)>> {
        Ok(input.pair_samples().collect())
    }

    fn reduce(
        &self,
        key: MoviePairKey,
        samples: Vec<MoviePairSample>,
    ) -> CanopyResult<Vec<(MoviePairKey, f64)>> {
        match co_rating_cosine(&samples) {
            Some(score) => Ok(vec![(key, score)]),
            None => {
                log::warn!(
                    "Pair {} has zero rating magnitude; scoring it {}",
                    key,
                    ZERO_MAGNITUDE_SIMILARITY
                );
                Ok(vec![(key, ZERO_MAGNITUDE_SIMILARITY)])
            }
        }
    }
}

/// Cosine similarity restricted to the users who rated both movies:
/// `Σ(a·b) / √(Σa² · Σb²)`.
///
/// Returns `None` when either side has zero magnitude (including an empty
/// sample list), leaving the fallback to the caller.
pub fn co_rating_cosine(samples: &[MoviePairSample]) -> Option<f64> {
    // Each product fits in i64; the sums need i128 for extreme ratings.
    let mut dot = 0i128;
    let mut norm_low = 0i128;
    let mut norm_high = 0i128;
    for s in samples {
        let (a, b) = (i128::from(s.low), i128::from(s.high));
        dot += a * b;
        norm_low += a * a;
        norm_high += b * b;
    }
    if norm_low == 0 || norm_high == 0 {
        return None;
    }
    let denom = (norm_low as f64 * norm_high as f64).sqrt();
    Some((dot as f64 / denom).clamp(-1.0, 1.0))
}
