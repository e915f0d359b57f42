//! Rating records and per-user rating vectors.

use std::collections::HashSet;

use serde::Serialize;

use super::{CanopyError, CanopyResult, MovieId, MoviePairKey, MoviePairSample, UserId};

/// A single `(movie, user, rating)` observation from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingRecord {
    /// The rated movie.
    pub movie: MovieId,
    /// The user who rated it.
    pub user: UserId,
    /// Integer rating value.
    pub rating: i32,
}

impl RatingRecord {
    /// Create a new rating record.
    pub fn new(movie: MovieId, user: UserId, rating: i32) -> Self {
        Self {
            movie,
            user,
            rating,
        }
    }
}

/// Every rating one user gave, in arrival order. No movie appears twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRatingVector {
    /// The user these ratings belong to.
    pub user: UserId,
    /// `(movie, rating)` pairs in arrival order.
    ratings: Vec<(MovieId, i32)>,
}

impl UserRatingVector {
    /// Build a rating vector, rejecting a movie rated twice by the same user.
    pub fn from_ratings(
        user: UserId,
        ratings: impl IntoIterator<Item = (MovieId, i32)>,
    ) -> CanopyResult<Self> {
        let ratings: Vec<(MovieId, i32)> = ratings.into_iter().collect();
        let mut seen = HashSet::with_capacity(ratings.len());
        for &(movie, _) in &ratings {
            if !seen.insert(movie) {
                return Err(CanopyError::DuplicateRating { user, movie });
            }
        }
        Ok(Self { user, ratings })
    }

    /// The `(movie, rating)` pairs.
    pub fn ratings(&self) -> &[(MovieId, i32)] {
        &self.ratings
    }

    /// Number of rated movies.
    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    /// Whether the user rated nothing.
    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// All `C(k, 2)` co-rating samples, keyed by canonical pair.
    pub fn pair_samples(&self) -> impl Iterator<Item = (MoviePairKey, MoviePairSample)> + '_ {
        self.ratings.iter().enumerate().flat_map(move |(i, &a)| {
            self.ratings[i + 1..]
                .iter()
                .map(move |&b| MoviePairSample::observe(a, b))
        })
    }
}
