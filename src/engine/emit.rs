//! Final grouped pass producing `(center, member, row)` triples.

use serde::Serialize;

use crate::format::ResultSink;
use crate::graph::{SimilarityMatrix, SimilarityRow};
use crate::index::MemberRecord;
use crate::types::{CanopyResult, MovieId};

use super::stage::{LocalExecutor, Stage};

/// One line of final output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterTriple<'a> {
    pub center: MovieId,
    pub member: MovieId,
    pub row: &'a SimilarityRow,
}

/// Groups members by their final center without changing any assignment.
pub struct ResultEmitter<'a> {
    matrix: &'a SimilarityMatrix,
}

impl<'a> ResultEmitter<'a> {
    /// Create an emitter reading rows from `matrix`.
    pub fn new(matrix: &'a SimilarityMatrix) -> Self {
        Self { matrix }
    }

    /// Group records into triples, ascending by center then member.
    pub fn collect(
        &self,
        executor: &LocalExecutor,
        records: Vec<MemberRecord>,
    ) -> CanopyResult<Vec<ClusterTriple<'a>>> {
        executor.run(self, records)
    }

    /// Group records and stream every triple to `sink`. Returns the number
    /// of triples written.
    pub fn emit(
        &self,
        executor: &LocalExecutor,
        records: Vec<MemberRecord>,
        sink: &mut dyn ResultSink,
    ) -> CanopyResult<usize> {
        let triples = self.collect(executor, records)?;
        for triple in &triples {
            sink.emit(triple)?;
        }
        sink.finish()?;
        Ok(triples.len())
    }
}

impl<'a> Stage for ResultEmitter<'a> {
    type Input = MemberRecord;
    type Key = MovieId;
    type Value = MovieId;
    type Output = ClusterTriple<'a>;

    fn name(&self) -> &'static str {
        "emit"
    }

    fn map(&self, record: MemberRecord) -> CanopyResult<Vec<(MovieId, MovieId)>> {
        Ok(vec![(record.center, record.movie)])
    }

    fn reduce(&self, center: MovieId, mut members: Vec<MovieId>) -> CanopyResult<Vec<ClusterTriple<'a>>> {
        members.sort_unstable();
        Ok(members
            .into_iter()
            .map(|member| ClusterTriple {
                center,
                member,
                row: self.matrix.row(member),
            })
            .collect())
    }
}
