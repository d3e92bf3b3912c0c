//! Recursive chunker: coarse-to-fine boundary splitting with a hard-split fallback

use super::{
    config::{ChunkingStatistics, RecursiveChunkingConfig},
    error::Result,
    separator::SeparatorHierarchy,
    types::{ChunkType, TextChunk},
};
use itertools::Itertools;
use std::time::Instant;
use tracing::debug;

/// Recursive text chunker for knowledge-base embedding.
///
/// Stateless after construction; `&self` methods can be called from any
/// number of threads.
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    config: RecursiveChunkingConfig,
    separators: SeparatorHierarchy,
}

impl RecursiveChunker {
    /// Create a chunker with the standard separator tiers
    pub fn new(config: RecursiveChunkingConfig) -> Result<Self> {
        Self::with_separators(config, SeparatorHierarchy::standard()?)
    }

    /// Create a chunker with a custom separator hierarchy
    pub fn with_separators(
        config: RecursiveChunkingConfig,
        separators: SeparatorHierarchy,
    ) -> Result<Self> {
        config.validate()?;
        if config.overlap_chars > 0 {
            debug!(
                "overlap of {} chars is accepted but not applied",
                config.overlap_chars
            );
        }
        Ok(Self { config, separators })
    }

    /// Split text into trimmed, non-empty chunks of at most `max_chunk_chars` characters
    pub fn chunk(&self, text: &str) -> Vec<String> {
        self.chunk_typed(text)
            .into_iter()
            .map(|(content, _)| content)
            .collect()
    }

    /// Same as [`chunk`](Self::chunk) with positions and chunk types attached
    pub fn chunk_detailed(&self, text: &str) -> Vec<TextChunk> {
        self.chunk_typed(text)
            .into_iter()
            .enumerate()
            .map(|(position, (content, chunk_type))| TextChunk::new(content, position, chunk_type))
            .collect()
    }

    pub fn chunk_with_statistics(&self, text: &str) -> (Vec<TextChunk>, ChunkingStatistics) {
        let start = Instant::now();
        let mut statistics = ChunkingStatistics::new();
        statistics.record_input_stats(text);

        let chunks = self.chunk_detailed(text);
        for chunk in &chunks {
            statistics.record_chunk(chunk);
        }
        statistics.calculate_derived_metrics(start.elapsed());
        debug!("{}", statistics.summary());

        (chunks, statistics)
    }

    /// Chunk several documents; each inner vector keeps its document's order
    pub fn batch_chunk(&self, texts: &[&str]) -> Vec<Vec<String>> {
        let chunks: Vec<Vec<String>> = texts.iter().map(|text| self.chunk(text)).collect();
        debug!(
            "Batch chunked {} documents into {} chunks",
            texts.len(),
            chunks.iter().map(Vec::len).sum::<usize>()
        );
        chunks
    }

    pub fn config(&self) -> &RecursiveChunkingConfig {
        &self.config
    }

    pub fn separators(&self) -> &SeparatorHierarchy {
        &self.separators
    }

    fn chunk_typed(&self, text: &str) -> Vec<(String, ChunkType)> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        if self.fits(text) {
            return vec![(text.to_string(), ChunkType::CompleteText)];
        }

        debug!(
            "Chunking text of {} bytes into pieces of <= {} chars",
            text.len(),
            self.config.max_chunk_chars
        );
        let mut out = Vec::new();
        self.split_recursive(text, 0, &mut out);
        out
    }

    /// `text` is trimmed, non-empty and longer than the limit
    fn split_recursive(&self, text: &str, level: usize, out: &mut Vec<(String, ChunkType)>) {
        let Some(separator) = self.separators.get(level) else {
            self.hard_split(text, out);
            return;
        };

        let pieces = separator.split(text);

        // separator absent: move to the next tier on the same text
        if let [only] = pieces.as_slice() {
            if !self.fits(only) {
                return self.split_recursive(text, level + 1, out);
            }
        }

        for piece in pieces {
            if self.fits(piece) {
                out.push((piece.to_string(), separator.chunk_type().clone()));
            } else {
                self.split_recursive(piece, level + 1, out);
            }
        }
    }

    /// Fixed-width character windows, ignoring word boundaries
    fn hard_split(&self, text: &str, out: &mut Vec<(String, ChunkType)>) {
        let before = out.len();
        for window in &text.chars().chunks(self.config.max_chunk_chars) {
            let window: String = window.collect();
            let trimmed = window.trim();
            if !trimmed.is_empty() {
                out.push((trimmed.to_string(), ChunkType::ForcedSplit));
            }
        }
        debug!(
            "No separator left for {} chars, forced {} windows",
            text.chars().count(),
            out.len() - before
        );
    }

    fn fits(&self, text: &str) -> bool {
        // byte length bounds char count from above
        text.len() <= self.config.max_chunk_chars
            || text.chars().count() <= self.config.max_chunk_chars
    }
}

/// Chunk `text` into pieces of at most `max_size` characters.
///
/// `overlap` is accepted but not applied. Fails only when `max_size` is 0.
pub fn recursive_chunk(text: &str, max_size: usize, overlap: usize) -> Result<Vec<String>> {
    let chunker = RecursiveChunker::new(RecursiveChunkingConfig::new(max_size, overlap))?;
    Ok(chunker.chunk(text))
}
