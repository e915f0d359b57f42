//! Reads similarity store snapshots into a matrix.

use std::io::BufRead;
use std::path::Path;

use crate::graph::SimilarityMatrix;
use crate::types::{CanopyError, CanopyResult, MovieId, MoviePairKey};

use super::store::ensure_ready;

/// Reader for `movieA,movieB<TAB>score` similarity files.
pub struct StoreReader;

impl StoreReader {
    /// Load a finished store. Fails with `StoreNotReady` if the snapshot has
    /// not been renamed into place yet.
    pub fn read_from_file(path: &Path) -> CanopyResult<SimilarityMatrix> {
        ensure_ready(path)?;
        let file = std::fs::File::open(path)?;
        let matrix = Self::read_from(std::io::BufReader::new(file))?;
        log::info!(
            "Loaded {} pairs over {} movies from {}",
            matrix.pair_count(),
            matrix.movie_count(),
            path.display()
        );
        Ok(matrix)
    }

    /// Read every pair line from any reader. Blank lines are skipped.
    pub fn read_from(reader: impl BufRead) -> CanopyResult<SimilarityMatrix> {
        let mut matrix = SimilarityMatrix::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let (key, score) = parse_store_line(idx + 1, &line)?;
            matrix.insert(key, score);
        }
        Ok(matrix)
    }
}

/// Parse a single `a,b<TAB>score` line.
pub fn parse_store_line(line_no: usize, line: &str) -> CanopyResult<(MoviePairKey, f64)> {
    let corrupt = |reason: String| CanopyError::CorruptStore {
        line: line_no,
        reason,
    };

    let (pair, score) = line
        .trim()
        .split_once('\t')
        .ok_or_else(|| corrupt("missing tab separator".to_string()))?;
    let (a, b) = pair
        .split_once(',')
        .ok_or_else(|| corrupt(format!("invalid pair {:?}", pair)))?;
    let a: MovieId = a
        .trim()
        .parse()
        .map_err(|_| corrupt(format!("invalid movie id {:?}", a)))?;
    let b: MovieId = b
        .trim()
        .parse()
        .map_err(|_| corrupt(format!("invalid movie id {:?}", b)))?;
    let score: f64 = score
        .trim()
        .parse()
        .map_err(|_| corrupt(format!("invalid score {:?}", score)))?;
    if !score.is_finite() {
        return Err(corrupt(format!("non-finite score {}", score)));
    }

    Ok((MoviePairKey::new(a, b), score))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pair_line() {
        let (key, score) = parse_store_line(1, "3,1\t0.75").unwrap();
        assert_eq!(key, MoviePairKey::new(1, 3));
        assert_eq!(score, 0.75);
    }

    #[test]
    fn rejects_bad_lines() {
        assert!(parse_store_line(1, "1,2 0.5").is_err());
        assert!(parse_store_line(1, "1;2\t0.5").is_err());
        assert!(parse_store_line(1, "1,x\t0.5").is_err());
        assert!(parse_store_line(1, "1,2\tNaN").is_err());
        assert!(parse_store_line(1, "1,2\thigh").is_err());
    }
}
