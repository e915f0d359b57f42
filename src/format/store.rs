//! Similarity store: the single-writer handoff of the similarity matrix
//! from the pair-scoring phase to the canopy phase.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::graph::SimilarityMatrix;
use crate::types::{CanopyError, CanopyResult};

use super::{StoreReader, StoreWriter};

/// A similarity store file. Written once as a complete snapshot, then read
/// wholesale.
#[derive(Debug, Clone)]
pub struct SimilarityStore {
    path: PathBuf,
}

impl SimilarityStore {
    /// Point at a store location.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the finished snapshot.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist a fully built matrix.
    pub fn write_snapshot(&self, matrix: &SimilarityMatrix) -> CanopyResult<()> {
        StoreWriter::write_to_file(matrix, &self.path)
    }

    /// Load the finished snapshot.
    pub fn load(&self) -> CanopyResult<SimilarityMatrix> {
        StoreReader::read_from_file(&self.path)
    }

    /// Whether a finished snapshot is in place.
    pub fn is_ready(&self) -> bool {
        ensure_ready(&self.path).is_ok()
    }
}

/// Temporary location used while a snapshot is being written.
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

/// Fail unless a finished snapshot exists at `path` and no write is in flight.
pub fn ensure_ready(path: &Path) -> CanopyResult<()> {
    if partial_path(path).exists() {
        return Err(CanopyError::StoreNotReady {
            path: path.to_path_buf(),
            reason: "a snapshot write is still in progress".to_string(),
        });
    }
    if !path.is_file() {
        return Err(CanopyError::StoreNotReady {
            path: path.to_path_buf(),
            reason: "no snapshot has been written".to_string(),
        });
    }
    Ok(())
}
