//! Phase 3 tests: full pipeline runs, store handoff, output sinks, CLI commands.

use std::io::Write;

use movie_canopy::cli::commands;
use movie_canopy::config::ClusterConfig;
use movie_canopy::engine::Pipeline;
use movie_canopy::format::{JsonLinesSink, MemorySink, SimilarityStore, TextSink};
use movie_canopy::types::CanopyError;

use tempfile::{tempdir, NamedTempFile};

// ==================== Helper ====================

/// Movies 1 and 2 always get identical ratings; movie 3 moves against them.
const THREE_USERS: &str = "\
1,10,5,2005-01-01
2,10,5,2005-01-01
3,10,1,2005-01-01
1,20,1,2005-01-02
2,20,1,2005-01-02
3,20,5,2005-01-02
1,30,3,2005-01-03
2,30,3,2005-01-03
3,30,1,2005-01-03
";

fn small_config() -> ClusterConfig {
    ClusterConfig {
        t1: 0.5,
        t2: 0.95,
        iterations: 10,
        movie_count: 3,
        workers: 2,
    }
}

// ==================== Pipeline Tests ====================

#[test]
fn test_end_to_end_three_users() {
    let pipeline = Pipeline::new(small_config()).unwrap();
    let mut sink = MemorySink::default();
    let report = pipeline
        .run_in_memory(THREE_USERS.as_bytes(), &mut sink)
        .unwrap();

    assert_eq!(sink.pairs, vec![(1, 1), (1, 2), (3, 3)]);
    assert_eq!(report.canopy_centers, vec![1, 3]);
    assert_eq!(report.final_centers, vec![1, 3]);
    assert_eq!(report.moved_per_round, vec![0; 10]);
    assert_eq!(report.triples_emitted, 3);
}

#[test]
fn test_end_to_end_similarities() {
    let pipeline = Pipeline::new(small_config()).unwrap();
    let matrix = pipeline.build_similarity(THREE_USERS.as_bytes()).unwrap();
    assert_eq!(matrix.similarity(1, 2), Some(1.0));
    let s13 = matrix.similarity(1, 3).unwrap();
    let s23 = matrix.similarity(2, 3).unwrap();
    assert_eq!(s13, s23);
    assert!(s13 < 0.5, "movie 3 should not join movie 1: {}", s13);
}

#[test]
fn test_run_through_store() {
    let dir = tempdir().unwrap();
    let store = SimilarityStore::new(dir.path().join("score.dat"));
    let pipeline = Pipeline::new(small_config()).unwrap();

    let mut in_memory = MemorySink::default();
    pipeline
        .run_in_memory(THREE_USERS.as_bytes(), &mut in_memory)
        .unwrap();

    let mut through_store = MemorySink::default();
    pipeline
        .run(THREE_USERS.as_bytes(), &store, &mut through_store)
        .unwrap();

    assert!(store.is_ready());
    assert_eq!(in_memory.pairs, through_store.pairs);
}

#[test]
fn test_universe_larger_than_data() {
    let config = ClusterConfig {
        movie_count: 5,
        ..small_config()
    };
    let pipeline = Pipeline::new(config).unwrap();
    let mut sink = MemorySink::default();
    let report = pipeline
        .run_in_memory(THREE_USERS.as_bytes(), &mut sink)
        .unwrap();
    assert_eq!(
        sink.pairs,
        vec![(1, 1), (1, 2), (3, 3), (4, 4), (5, 5)]
    );
    assert_eq!(report.final_centers, vec![1, 3, 4, 5]);
}

#[test]
fn test_universe_smaller_than_data() {
    let config = ClusterConfig {
        movie_count: 2,
        ..small_config()
    };
    let pipeline = Pipeline::new(config).unwrap();
    let mut sink = MemorySink::default();
    pipeline
        .run_in_memory(THREE_USERS.as_bytes(), &mut sink)
        .unwrap();
    assert_eq!(sink.pairs, vec![(1, 1), (1, 2)]);
}

#[test]
fn test_extreme_ratings_score_without_overflow() {
    let input: String = (1..=3)
        .map(|user| format!("1,{user},2147483647,x\n2,{user},2147483647,x\n"))
        .collect();
    let pipeline = Pipeline::new(small_config()).unwrap();
    let matrix = pipeline.build_similarity(input.as_bytes()).unwrap();
    let score = matrix.similarity(1, 2).unwrap();
    assert!((score - 1.0).abs() < 1e-12, "unexpected score {}", score);
}

#[test]
fn test_malformed_input_fails_run() {
    let pipeline = Pipeline::new(small_config()).unwrap();
    let mut sink = MemorySink::default();
    let input = format!("{}4,40,not-a-number,2005-01-04\n", THREE_USERS);
    let err = pipeline
        .run_in_memory(input.as_bytes(), &mut sink)
        .unwrap_err();
    assert!(matches!(err, CanopyError::MalformedRecord { line: 10, .. }));
    assert!(sink.pairs.is_empty());
}

#[test]
fn test_invalid_config_rejected() {
    let config = ClusterConfig {
        t1: 0.9,
        t2: 0.5,
        ..small_config()
    };
    assert!(matches!(
        Pipeline::new(config),
        Err(CanopyError::InvalidConfig(_))
    ));
}

// ==================== Output Sink Tests ====================

#[test]
fn test_text_output_format() {
    let pipeline = Pipeline::new(small_config()).unwrap();
    let matrix = pipeline.build_similarity(THREE_USERS.as_bytes()).unwrap();
    let mut sink = TextSink::new(Vec::new());
    pipeline.cluster(&matrix, &mut sink).unwrap();

    let text = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("1 1 {2: 1, 3: "));
    assert!(lines[1].starts_with("1 2 {1: 1, 3: "));
    assert!(lines[2].starts_with("3 3 {1: "));
}

#[test]
fn test_json_output_format() {
    let pipeline = Pipeline::new(small_config()).unwrap();
    let matrix = pipeline.build_similarity(THREE_USERS.as_bytes()).unwrap();
    let mut sink = JsonLinesSink::new(Vec::new());
    pipeline.cluster(&matrix, &mut sink).unwrap();

    let text = String::from_utf8(sink.into_inner()).unwrap();
    let values: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(values.len(), 3);
    assert_eq!(values[1]["center"], 1);
    assert_eq!(values[1]["member"], 2);
    assert_eq!(values[1]["row"]["1"], 1.0);
}

// ==================== CLI Command Tests ====================

#[test]
fn test_cmd_similarity_then_stats_and_cluster() {
    let dir = tempdir().unwrap();
    let mut ratings = NamedTempFile::new().unwrap();
    ratings.write_all(THREE_USERS.as_bytes()).unwrap();
    ratings.flush().unwrap();
    let store_path = dir.path().join("score.dat");

    commands::cmd_similarity(ratings.path(), &store_path, small_config(), false).unwrap();
    assert!(store_path.exists());

    commands::cmd_stats(&store_path, true).unwrap();
    commands::cmd_cluster(&store_path, small_config(), false).unwrap();
}

#[test]
fn test_cmd_cluster_without_store_fails() {
    let dir = tempdir().unwrap();
    let err = commands::cmd_cluster(&dir.path().join("score.dat"), small_config(), false)
        .unwrap_err();
    assert!(matches!(err, CanopyError::StoreNotReady { .. }));
}

#[test]
fn test_cmd_run_with_store() {
    let dir = tempdir().unwrap();
    let ratings_path = dir.path().join("ratings.txt");
    std::fs::write(&ratings_path, THREE_USERS).unwrap();
    let store_path = dir.path().join("score.dat");

    commands::cmd_run(&ratings_path, Some(store_path.as_path()), small_config(), true).unwrap();
    assert!(SimilarityStore::new(&store_path).is_ready());
}
