//! Phase 1 tests: data types, rating parsing, similarity store files.

use std::io::Cursor;

use movie_canopy::format::{parse_rating_line, SimilarityStore, StoreReader, StoreWriter};
use movie_canopy::graph::SimilarityMatrix;
use movie_canopy::types::{
    CanopyError, MoviePairKey, MoviePairSample, RatingRecord, UserRatingVector,
};

use tempfile::tempdir;

// ==================== Data Structure Tests ====================

#[test]
fn test_pair_key_canonical() {
    let a = MoviePairKey::new(10, 3);
    let b = MoviePairKey::new(3, 10);
    assert_eq!(a, b);
    assert_eq!(a.low(), 3);
    assert_eq!(a.high(), 10);
}

#[test]
fn test_user_vector_pair_samples() {
    let v = UserRatingVector::from_ratings(1, vec![(3, 5), (1, 2), (2, 4)]).unwrap();
    let samples: Vec<_> = v.pair_samples().collect();
    assert_eq!(samples.len(), 3);
    assert!(samples.contains(&(MoviePairKey::new(1, 3), MoviePairSample { low: 2, high: 5 })));
    assert!(samples.contains(&(MoviePairKey::new(2, 3), MoviePairSample { low: 4, high: 5 })));
    assert!(samples.contains(&(MoviePairKey::new(1, 2), MoviePairSample { low: 2, high: 4 })));
}

#[test]
fn test_pair_sample_count_is_k_choose_2() {
    let ratings: Vec<_> = (1..=6).map(|m| (m, 3)).collect();
    let v = UserRatingVector::from_ratings(7, ratings).unwrap();
    assert_eq!(v.pair_samples().count(), 15);
}

#[test]
fn test_single_rating_has_no_pairs() {
    let v = UserRatingVector::from_ratings(7, vec![(1, 3)]).unwrap();
    assert_eq!(v.pair_samples().count(), 0);
}

#[test]
fn test_duplicate_movie_rejected() {
    let result = UserRatingVector::from_ratings(4, vec![(1, 3), (2, 5), (1, 4)]);
    match result {
        Err(CanopyError::DuplicateRating { user, movie }) => {
            assert_eq!(user, 4);
            assert_eq!(movie, 1);
        }
        other => panic!("Expected DuplicateRating, got {:?}", other),
    }
}

// ==================== Rating Parsing Tests ====================

#[test]
fn test_parse_rating_ignores_fourth_field() {
    let record = parse_rating_line(1, "1,1488844,3,2005-09-06").unwrap();
    assert_eq!(record, RatingRecord::new(1, 1488844, 3));
}

#[test]
fn test_parse_rating_errors_carry_line() {
    let err = parse_rating_line(42, "1,2,x,y").unwrap_err();
    assert!(matches!(err, CanopyError::MalformedRecord { line: 42, .. }));
    assert!(err.to_string().contains("line 42"));
}

// ==================== Similarity Store Tests ====================

fn sample_matrix() -> SimilarityMatrix {
    SimilarityMatrix::from_pairs([
        (MoviePairKey::new(1, 2), 1.0),
        (MoviePairKey::new(3, 1), 0.375),
        (MoviePairKey::new(2, 3), 0.1),
    ])
}

#[test]
fn test_store_line_format() {
    let mut buf = Vec::new();
    StoreWriter::write_to(&sample_matrix(), &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert_eq!(text, "1,2\t1\n1,3\t0.375\n2,3\t0.1\n");
}

#[test]
fn test_store_read_is_symmetric() {
    let text = "1,2\t0.5\n3,2\t0.75\n";
    let matrix = StoreReader::read_from(Cursor::new(text)).unwrap();
    assert_eq!(matrix.pair_count(), 2);
    assert_eq!(matrix.similarity(2, 3), Some(0.75));
    assert_eq!(matrix.similarity(3, 2), Some(0.75));
    assert_eq!(matrix.similarity(1, 3), None);
}

#[test]
fn test_store_corrupt_line() {
    let text = "1,2\t0.5\nbogus\n";
    let err = StoreReader::read_from(Cursor::new(text)).unwrap_err();
    assert!(matches!(err, CanopyError::CorruptStore { line: 2, .. }));
}

#[test]
fn test_store_snapshot_file() {
    let dir = tempdir().unwrap();
    let store = SimilarityStore::new(dir.path().join("score.dat"));
    assert!(!store.is_ready());

    let matrix = sample_matrix();
    store.write_snapshot(&matrix).unwrap();
    assert!(store.is_ready());
    assert!(!dir.path().join("score.dat.partial").exists());

    let loaded = store.load().unwrap();
    assert_eq!(loaded, matrix);
}

#[test]
fn test_store_missing_fails_fast() {
    let dir = tempdir().unwrap();
    let store = SimilarityStore::new(dir.path().join("missing.dat"));
    match store.load() {
        Err(CanopyError::StoreNotReady { .. }) => {}
        other => panic!("Expected StoreNotReady, got {:?}", other),
    }
}

#[test]
fn test_store_partial_write_fails_fast() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("score.dat");
    std::fs::write(&path, "1,2\t0.5\n").unwrap();
    std::fs::write(dir.path().join("score.dat.partial"), "1,2\t0.5\n3,4").unwrap();

    let store = SimilarityStore::new(&path);
    assert!(!store.is_ready());
    assert!(matches!(
        store.load(),
        Err(CanopyError::StoreNotReady { .. })
    ));
}
