//! Text I/O: rating input, similarity store files, result output.

pub mod ratings;
pub mod reader;
pub mod sink;
pub mod store;
pub mod writer;

pub use ratings::{parse_rating_line, read_numbered_lines};
pub use reader::StoreReader;
pub use sink::{JsonLinesSink, MemorySink, ResultSink, TextSink};
pub use store::SimilarityStore;
pub use writer::StoreWriter;
