//! Recursive text chunking for knowledge-base embedding
//!
//! Text is split at the coarsest natural boundary that works (paragraphs, then
//! sentences, clauses, bullet items and whitespace) and cut into fixed-width
//! windows only when every boundary tier has been exhausted.

pub mod chunker;
pub mod config;
pub mod error;
pub mod separator;
pub mod types;

// Re-export main public interfaces
pub use chunker::{RecursiveChunker, recursive_chunk};
pub use config::{ChunkingStatistics, RecursiveChunkingConfig};
pub use error::{ChunkingError, IntoChunkingError, Result};
pub use separator::{Separator, SeparatorHierarchy, SplitMode};
pub use types::{ChunkType, TextChunk};
