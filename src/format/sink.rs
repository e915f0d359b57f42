//! Output sinks for final `(center, member, row)` triples.

use std::io::Write;

use crate::engine::emit::ClusterTriple;
use crate::types::{CanopyResult, MovieId};

/// Consumer of final clustering results.
pub trait ResultSink {
    /// Accept one triple.
    fn emit(&mut self, triple: &ClusterTriple<'_>) -> CanopyResult<()>;

    /// Flush buffered output. Called once after the last triple.
    fn finish(&mut self) -> CanopyResult<()> {
        Ok(())
    }
}

/// Writes `center member {m: score, ...}` lines.
pub struct TextSink<W: Write> {
    writer: W,
}

impl<W: Write> TextSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultSink for TextSink<W> {
    fn emit(&mut self, triple: &ClusterTriple<'_>) -> CanopyResult<()> {
        write!(self.writer, "{} {} {{", triple.center, triple.member)?;
        for (i, (movie, score)) in triple.row.iter().enumerate() {
            if i > 0 {
                write!(self.writer, ", ")?;
            }
            write!(self.writer, "{}: {}", movie, score)?;
        }
        writeln!(self.writer, "}}")?;
        Ok(())
    }

    fn finish(&mut self) -> CanopyResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes one JSON object per triple.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultSink for JsonLinesSink<W> {
    fn emit(&mut self, triple: &ClusterTriple<'_>) -> CanopyResult<()> {
        serde_json::to_writer(&mut self.writer, triple)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> CanopyResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Collects triples as owned `(center, member)` pairs; rows are dropped.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub pairs: Vec<(MovieId, MovieId)>,
}

impl ResultSink for MemorySink {
    fn emit(&mut self, triple: &ClusterTriple<'_>) -> CanopyResult<()> {
        self.pairs.push((triple.center, triple.member));
        Ok(())
    }
}
