pub mod indexer;
pub mod text;
pub mod util;

pub use text::chunking::{ChunkingError, RecursiveChunker, Result, recursive_chunk};
