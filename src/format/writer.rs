//! Writes similarity store snapshots.

use std::io::Write;
use std::path::Path;

use crate::graph::SimilarityMatrix;
use crate::types::CanopyResult;

use super::store::partial_path;

/// Writer for `movieA,movieB<TAB>score` similarity files.
pub struct StoreWriter;

impl StoreWriter {
    /// Write a complete snapshot to `path`.
    ///
    /// Lines go to `<path>.partial` first; the file is renamed into place
    /// only after everything is flushed and synced, so a reader never sees a
    /// half-written store under the final name.
    pub fn write_to_file(matrix: &SimilarityMatrix, path: &Path) -> CanopyResult<()> {
        let tmp = partial_path(path);
        {
            let file = std::fs::File::create(&tmp)?;
            let mut writer = std::io::BufWriter::new(file);
            Self::write_to(matrix, &mut writer)?;
            writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
        }
        std::fs::rename(&tmp, path)?;
        log::info!(
            "Wrote {} pairs to similarity store {}",
            matrix.pair_count(),
            path.display()
        );
        Ok(())
    }

    /// Write every pair once, ascending by pair key, to any writer.
    pub fn write_to(matrix: &SimilarityMatrix, writer: &mut impl Write) -> CanopyResult<()> {
        for (key, score) in matrix.pairs() {
            writeln!(writer, "{}\t{}", key, score)?;
        }
        writer.flush()?;
        Ok(())
    }
}
