//! Core data structures for recursive text chunking

use std::collections::HashMap;

/// A chunk of a document's text, ready for embedding
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    /// Trimmed, non-empty chunk content
    pub content: String,
    /// Index of this chunk in the document's chunk sequence
    pub position: usize,
    /// Separator tier (or fallback) that produced the chunk
    pub chunk_type: ChunkType,
    /// Extended metadata for customization
    pub metadata: HashMap<String, String>,
}

impl TextChunk {
    /// Create a new text chunk
    pub fn new(content: String, position: usize, chunk_type: ChunkType) -> Self {
        Self {
            content,
            position,
            chunk_type,
            metadata: HashMap::new(),
        }
    }

    /// Length of the chunk in characters (not bytes)
    pub fn char_length(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Add metadata to this chunk
    pub fn add_metadata(&mut self, key: String, value: String) {
        self.metadata.insert(key, value);
    }

    /// Get metadata value by key
    pub fn get_metadata(&self, key: &str) -> Option<&String> {
        self.metadata.get(key)
    }
}

/// Which boundary produced a chunk
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChunkType {
    /// The whole text fit without splitting
    CompleteText,
    /// Split at paragraph breaks
    Paragraph,
    /// Split after sentence-ending punctuation
    Sentence,
    /// Split after clause punctuation
    Clause,
    /// Split at bullet/list markers
    BulletItem,
    /// Split at whitespace runs
    Word,
    /// Fixed-width character windows
    ForcedSplit,
    /// Custom separator tier
    Custom(String),
}

impl ChunkType {
    /// Check if this chunk type ends on a natural language boundary
    pub fn preserves_boundaries(&self) -> bool {
        !self.is_forced_split()
    }

    pub fn is_forced_split(&self) -> bool {
        matches!(self, ChunkType::ForcedSplit)
    }

    /// Get a human-readable description of the chunk type
    pub fn description(&self) -> &'static str {
        match self {
            ChunkType::CompleteText => "Complete text",
            ChunkType::Paragraph => "Paragraph split",
            ChunkType::Sentence => "Sentence split",
            ChunkType::Clause => "Clause split",
            ChunkType::BulletItem => "Bullet item split",
            ChunkType::Word => "Whitespace split",
            ChunkType::ForcedSplit => "Forced character split",
            ChunkType::Custom(_) => "Custom separator split",
        }
    }
}

impl std::fmt::Display for ChunkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChunkType::Custom(name) => write!(f, "Custom({name})"),
            _ => write!(f, "{}", self.description()),
        }
    }
}
