//! Coordinate-free document content and the sinks that consume it.

pub mod block;
pub mod plain;
pub mod sink;

pub use block::{column_alignment, Alignment, Block, BlockKind};
pub use plain::PlainTextSink;
pub use sink::{emit, DocumentSink};
