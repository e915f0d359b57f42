//! Sparse symmetric movie-to-movie similarity matrix.

use std::collections::BTreeMap;

use crate::types::{MovieId, MoviePairKey};

/// One movie's similarities to every movie it shares co-ratings with.
pub type SimilarityRow = BTreeMap<MovieId, f64>;

static EMPTY_ROW: SimilarityRow = BTreeMap::new();

/// Global similarity matrix. Every pair is stored in both directions, so
/// `similarity(a, b) == similarity(b, a)`. Absence means "no co-ratings".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarityMatrix {
    /// movie -> (movie -> score)
    rows: BTreeMap<MovieId, SimilarityRow>,
    /// Number of distinct unordered pairs.
    pair_count: usize,
}

impl SimilarityMatrix {
    /// Create an empty matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a matrix from scored pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (MoviePairKey, f64)>) -> Self {
        let mut matrix = Self::new();
        for (key, score) in pairs {
            matrix.insert(key, score);
        }
        matrix
    }

    /// Insert a pair score in both directions. A later insert for the same
    /// pair overwrites the earlier one.
    pub fn insert(&mut self, key: MoviePairKey, score: f64) {
        let previous = self
            .rows
            .entry(key.low())
            .or_default()
            .insert(key.high(), score);
        self.rows
            .entry(key.high())
            .or_default()
            .insert(key.low(), score);
        if previous.is_none() {
            self.pair_count += 1;
        }
    }

    /// Similarity between two movies, if they were ever co-rated.
    pub fn similarity(&self, a: MovieId, b: MovieId) -> Option<f64> {
        self.rows.get(&a).and_then(|row| row.get(&b)).copied()
    }

    /// The full row for a movie; empty for movies with no recorded pair.
    pub fn row(&self, movie: MovieId) -> &SimilarityRow {
        self.rows.get(&movie).unwrap_or(&EMPTY_ROW)
    }

    /// Number of distinct unordered pairs.
    pub fn pair_count(&self) -> usize {
        self.pair_count
    }

    /// Number of movies with a non-empty row.
    pub fn movie_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the matrix holds no pairs.
    pub fn is_empty(&self) -> bool {
        self.pair_count == 0
    }

    /// Largest movie id that appears in any pair.
    pub fn max_movie_id(&self) -> Option<MovieId> {
        self.rows.keys().next_back().copied()
    }

    /// Length of the longest row.
    pub fn max_row_len(&self) -> usize {
        self.rows.values().map(|row| row.len()).max().unwrap_or(0)
    }

    /// Every unordered pair once, in ascending key order.
    pub fn pairs(&self) -> impl Iterator<Item = (MoviePairKey, f64)> + '_ {
        self.rows.iter().flat_map(|(&low, row)| {
            row.range(low..)
                .map(move |(&high, &score)| (MoviePairKey::new(low, high), score))
        })
    }

    /// Smallest and largest stored score.
    pub fn score_range(&self) -> Option<(f64, f64)> {
        self.pairs().fold(None, |acc, (_, score)| match acc {
            None => Some((score, score)),
            Some((lo, hi)) => Some((lo.min(score), hi.max(score))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_symmetric() {
        let mut m = SimilarityMatrix::new();
        m.insert(MoviePairKey::new(5, 2), 0.7);
        assert_eq!(m.similarity(2, 5), Some(0.7));
        assert_eq!(m.similarity(5, 2), Some(0.7));
        assert_eq!(m.pair_count(), 1);
        assert_eq!(m.movie_count(), 2);
    }

    #[test]
    fn missing_row_is_empty() {
        let m = SimilarityMatrix::new();
        assert!(m.row(42).is_empty());
        assert_eq!(m.similarity(1, 42), None);
        assert_eq!(m.score_range(), None);
    }

    #[test]
    fn pairs_are_listed_once() {
        let m = SimilarityMatrix::from_pairs([
            (MoviePairKey::new(1, 2), 0.5),
            (MoviePairKey::new(2, 3), 0.25),
            (MoviePairKey::new(1, 3), 1.0),
        ]);
        let pairs: Vec<_> = m.pairs().collect();
        assert_eq!(
            pairs,
            vec![
                (MoviePairKey::new(1, 2), 0.5),
                (MoviePairKey::new(1, 3), 1.0),
                (MoviePairKey::new(2, 3), 0.25),
            ]
        );
        assert_eq!(m.score_range(), Some((0.25, 1.0)));
    }

    #[test]
    fn reinsert_does_not_double_count() {
        let mut m = SimilarityMatrix::new();
        m.insert(MoviePairKey::new(1, 2), 0.5);
        m.insert(MoviePairKey::new(2, 1), 0.6);
        assert_eq!(m.pair_count(), 1);
        assert_eq!(m.similarity(1, 2), Some(0.6));
    }
}
