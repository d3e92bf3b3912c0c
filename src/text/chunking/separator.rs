//! Separator tiers used by the recursive chunker

use super::{error::Result, types::ChunkType};
use regex::Regex;

/// What happens to the text matched by a separator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// The match is dropped (paragraph breaks, bullet markers, whitespace)
    Discard,
    /// The match stays at the end of the preceding piece (terminal punctuation)
    AttachToPreceding,
}

/// A single boundary pattern in the hierarchy
#[derive(Debug, Clone)]
pub struct Separator {
    pattern: Regex,
    mode: SplitMode,
    chunk_type: ChunkType,
}

impl Separator {
    pub fn new(pattern: &str, mode: SplitMode, chunk_type: ChunkType) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            mode,
            chunk_type,
        })
    }

    /// Two or more consecutive line breaks
    pub fn paragraph() -> Result<Self> {
        Self::new(r"(?:\r?\n){2,}", SplitMode::Discard, ChunkType::Paragraph)
    }

    /// Latin and Arabic sentence terminators, kept with their sentence.
    /// Runs like `?!` or `...` are one delimiter.
    pub fn sentence() -> Result<Self> {
        Self::new(
            r"[.!?؟۔]+",
            SplitMode::AttachToPreceding,
            ChunkType::Sentence,
        )
    }

    /// Latin and Arabic clause punctuation, kept with the preceding clause
    pub fn clause() -> Result<Self> {
        Self::new(r"[,،;؛:]+", SplitMode::AttachToPreceding, ChunkType::Clause)
    }

    /// List markers at the start of a line
    pub fn bullet() -> Result<Self> {
        Self::new(r"\n\s*[-•*]", SplitMode::Discard, ChunkType::BulletItem)
    }

    pub fn whitespace() -> Result<Self> {
        Self::new(r"\s+", SplitMode::Discard, ChunkType::Word)
    }

    pub fn mode(&self) -> SplitMode {
        self.mode
    }

    /// Chunk type assigned to pieces produced by this separator
    pub fn chunk_type(&self) -> &ChunkType {
        &self.chunk_type
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Split `text` at every match, returning trimmed non-empty pieces in order
    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut pieces = Vec::new();
        let mut prev = 0;
        for m in self.pattern.find_iter(text) {
            let end = match self.mode {
                SplitMode::Discard => m.start(),
                SplitMode::AttachToPreceding => m.end(),
            };
            pieces.push(&text[prev..end]);
            prev = m.end();
        }
        pieces.push(&text[prev..]);

        pieces
            .into_iter()
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .collect()
    }
}

/// Ordered separator tiers, coarsest first
#[derive(Debug, Clone)]
pub struct SeparatorHierarchy {
    tiers: Vec<Separator>,
}

impl SeparatorHierarchy {
    pub fn new(tiers: Vec<Separator>) -> Self {
        Self { tiers }
    }

    /// Paragraph, sentence, clause, bullet, whitespace
    pub fn standard() -> Result<Self> {
        Ok(Self::new(vec![
            Separator::paragraph()?,
            Separator::sentence()?,
            Separator::clause()?,
            Separator::bullet()?,
            Separator::whitespace()?,
        ]))
    }

    /// Separator for a recursion level, `None` once the tiers are exhausted
    pub fn get(&self, level: usize) -> Option<&Separator> {
        self.tiers.get(level)
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Separator> {
        self.tiers.iter()
    }
}
