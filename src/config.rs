//! Run configuration: thresholds, round count and movie universe.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{
    CanopyError, CanopyResult, DEFAULT_ITERATIONS, DEFAULT_MOVIE_COUNT, DEFAULT_T1, DEFAULT_T2,
};

/// Clustering configuration. Every field is optional in a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Loose threshold: a movie scoring above it joins the current canopy.
    #[serde(alias = "T1")]
    pub t1: f64,
    /// Tight threshold: a movie scoring above it leaves the working set.
    #[serde(alias = "T2")]
    pub t2: f64,
    /// Number of refinement rounds.
    pub iterations: usize,
    /// Size of the movie-id universe `1..=movie_count`.
    #[serde(alias = "movieCount")]
    pub movie_count: u32,
    /// Worker threads for per-key stages; 0 means one per CPU.
    pub workers: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            t1: DEFAULT_T1,
            t2: DEFAULT_T2,
            iterations: DEFAULT_ITERATIONS,
            movie_count: DEFAULT_MOVIE_COUNT,
            workers: 0,
        }
    }
}

impl ClusterConfig {
    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> CanopyResult<()> {
        if !self.t1.is_finite() || !self.t2.is_finite() {
            return Err(CanopyError::InvalidConfig(format!(
                "thresholds must be finite (t1 = {}, t2 = {})",
                self.t1, self.t2
            )));
        }
        if self.t2 < self.t1 {
            return Err(CanopyError::InvalidConfig(format!(
                "t2 ({}) must be >= t1 ({})",
                self.t2, self.t1
            )));
        }
        if self.iterations == 0 {
            return Err(CanopyError::InvalidConfig(
                "iterations must be positive".to_string(),
            ));
        }
        if self.movie_count == 0 {
            return Err(CanopyError::InvalidConfig(
                "movie_count must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> CanopyResult<ClusterConfig> {
    Ok(toml::from_str(content)?)
}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> CanopyResult<ClusterConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CanopyError::Io(std::io::Error::other(format!(
            "Failed to read config file {}: {e}",
            path.display()
        )))
    })?;
    parse_config(&content)
}
