//! Canonical movie pairs and co-rating samples.

use std::fmt;

use serde::Serialize;

use super::MovieId;

/// Unordered movie pair stored as `(min, max)` so `(a, b)` and `(b, a)`
/// share one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MoviePairKey {
    low: MovieId,
    high: MovieId,
}

impl MoviePairKey {
    /// Canonicalize two movie ids into a pair key.
    pub fn new(a: MovieId, b: MovieId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// The smaller movie id.
    pub fn low(&self) -> MovieId {
        self.low
    }

    /// The larger movie id.
    pub fn high(&self) -> MovieId {
        self.high
    }
}

impl fmt::Display for MoviePairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.low, self.high)
    }
}

/// One user's ratings of both movies of a pair, ordered to match the key:
/// `low` is the rating of `key.low()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoviePairSample {
    pub low: i32,
    pub high: i32,
}

impl MoviePairSample {
    /// Build the canonical key and matching sample from two `(movie, rating)`
    /// observations by the same user.
    pub fn observe(a: (MovieId, i32), b: (MovieId, i32)) -> (MoviePairKey, Self) {
        let key = MoviePairKey::new(a.0, b.0);
        let sample = if a.0 <= b.0 {
            Self { low: a.1, high: b.1 }
        } else {
            Self { low: b.1, high: a.1 }
        };
        (key, sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_order_independent() {
        assert_eq!(MoviePairKey::new(7, 3), MoviePairKey::new(3, 7));
        assert_eq!(MoviePairKey::new(7, 3).to_string(), "3,7");
    }

    #[test]
    fn observe_swaps_ratings_with_ids() {
        let (key, sample) = MoviePairSample::observe((9, 1), (2, 5));
        assert_eq!(key.low(), 2);
        assert_eq!(key.high(), 9);
        assert_eq!(sample, MoviePairSample { low: 5, high: 1 });
    }
}
