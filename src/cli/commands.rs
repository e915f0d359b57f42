//! CLI command implementations.

use std::io::{BufRead, BufWriter};
use std::path::Path;

use crate::config::ClusterConfig;
use crate::engine::{ClusterReport, Pipeline};
use crate::format::{JsonLinesSink, ResultSink, SimilarityStore, TextSink};
use crate::types::CanopyResult;

/// Build the similarity store from a ratings file.
pub fn cmd_similarity(
    ratings: &Path,
    store_path: &Path,
    config: ClusterConfig,
    json: bool,
) -> CanopyResult<()> {
    let pipeline = Pipeline::new(config)?;
    let matrix = pipeline.build_similarity(open_ratings(ratings)?)?;
    let store = SimilarityStore::new(store_path);
    store.write_snapshot(&matrix)?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "store": store_path.display().to_string(),
                "pairs": matrix.pair_count(),
                "movies": matrix.movie_count(),
            })
        );
    } else {
        println!(
            "Wrote {} pairs over {} movies to {}",
            matrix.pair_count(),
            matrix.movie_count(),
            store_path.display()
        );
    }
    Ok(())
}

/// Cluster from an existing similarity store, streaming triples to stdout.
pub fn cmd_cluster(store_path: &Path, config: ClusterConfig, json: bool) -> CanopyResult<()> {
    let pipeline = Pipeline::new(config)?;
    let matrix = SimilarityStore::new(store_path).load()?;
    let mut sink = stdout_sink(json);
    let report = pipeline.cluster(&matrix, sink.as_mut())?;
    print_report(&report, json)
}

/// Full pipeline from ratings to triples. With `store_path` the similarity
/// matrix is handed over through a store file kept on disk.
pub fn cmd_run(
    ratings: &Path,
    store_path: Option<&Path>,
    config: ClusterConfig,
    json: bool,
) -> CanopyResult<()> {
    let pipeline = Pipeline::new(config)?;
    let reader = open_ratings(ratings)?;
    let mut sink = stdout_sink(json);
    let report = match store_path {
        Some(path) => pipeline.run(reader, &SimilarityStore::new(path), sink.as_mut())?,
        None => pipeline.run_in_memory(reader, sink.as_mut())?,
    };
    print_report(&report, json)
}

/// Summary statistics of a similarity store.
pub fn cmd_stats(store_path: &Path, json: bool) -> CanopyResult<()> {
    let matrix = SimilarityStore::new(store_path).load()?;
    let file_size = std::fs::metadata(store_path)?.len();
    let (min_score, max_score) = matrix.score_range().unwrap_or((0.0, 0.0));
    let max_row = matrix.max_row_len();
    let avg_row = if matrix.movie_count() > 0 {
        2.0 * matrix.pair_count() as f64 / matrix.movie_count() as f64
    } else {
        0.0
    };

    if json {
        let info = serde_json::json!({
            "store": store_path.display().to_string(),
            "file_size": file_size,
            "pairs": matrix.pair_count(),
            "movies": matrix.movie_count(),
            "max_movie_id": matrix.max_movie_id(),
            "avg_row_len": avg_row,
            "max_row_len": max_row,
            "min_score": min_score,
            "max_score": max_score,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Similarity Store: {}", store_path.display());
        println!("  File size: {}", format_size(file_size));
        println!("  Pairs: {}", matrix.pair_count());
        println!("  Movies with pairs: {}", matrix.movie_count());
        if let Some(max_id) = matrix.max_movie_id() {
            println!("  Largest movie id: {}", max_id);
        }
        println!("  Avg row length: {:.2}", avg_row);
        println!("  Max row length: {}", max_row);
        println!("  Score range: {:.4} .. {:.4}", min_score, max_score);
    }
    Ok(())
}

/// Open a ratings file, or stdin for `-`.
fn open_ratings(path: &Path) -> CanopyResult<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(std::io::stdin().lock()));
    }
    let file = std::fs::File::open(path)?;
    Ok(Box::new(std::io::BufReader::new(file)))
}

fn stdout_sink(json: bool) -> Box<dyn ResultSink> {
    let out = BufWriter::new(std::io::stdout().lock());
    if json {
        Box::new(JsonLinesSink::new(out))
    } else {
        Box::new(TextSink::new(out))
    }
}

/// The report goes to stderr; stdout carries only triples.
fn print_report(report: &ClusterReport, json: bool) -> CanopyResult<()> {
    if json {
        eprintln!("{}", serde_json::to_string(report)?);
    } else {
        eprintln!("Canopy centers: {}", report.canopy_centers.len());
        eprintln!("Final clusters: {}", report.final_centers.len());
        eprintln!("Centers moved per round: {:?}", report.moved_per_round);
        eprintln!("Triples written: {}", report.triples_emitted);
    }
    Ok(())
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
