//! Configuration and statistics for recursive text chunking

use super::error::{ChunkingError, Result};
use super::types::{ChunkType, TextChunk};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Size configuration for the recursive chunker.
///
/// There are no built-in defaults: the caller (usually the indexer) decides
/// the sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RecursiveChunkingConfig {
    /// Maximum characters per chunk
    pub max_chunk_chars: usize,
    /// Characters of trailing context meant to be repeated in the next chunk.
    /// Accepted for interface compatibility, not applied.
    #[serde(default)]
    pub overlap_chars: usize,
}

impl RecursiveChunkingConfig {
    pub fn new(max_chunk_chars: usize, overlap_chars: usize) -> Self {
        Self {
            max_chunk_chars,
            overlap_chars,
        }
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        if self.max_chunk_chars == 0 {
            return Err(ChunkingError::configuration(
                "max_chunk_chars must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Statistical information for one chunking run
#[derive(Debug, Clone, Default)]
pub struct ChunkingStatistics {
    pub total_processing_time: Duration,

    pub input_char_count: usize,
    pub input_line_count: usize,

    pub total_chunks_created: usize,
    /// Chunk counts keyed by the type that produced them
    pub chunks_by_type: HashMap<ChunkType, usize>,
    /// Characters across all chunks, excluding trimmed whitespace and discarded separators
    pub total_chunk_chars: usize,

    pub max_chars_in_chunk: usize,
    pub min_chars_in_chunk: usize,
    pub avg_chars_per_chunk: f32,

    /// Share of chunks that end on a natural boundary
    pub boundary_preservation_rate: f32,
    pub chars_per_second: f32,
}

impl ChunkingStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record input text statistics
    pub fn record_input_stats(&mut self, text: &str) {
        self.input_char_count = text.chars().count();
        self.input_line_count = text.lines().count();
    }

    /// Record a produced chunk
    pub fn record_chunk(&mut self, chunk: &TextChunk) {
        let length = chunk.char_length();
        self.total_chunks_created += 1;
        self.total_chunk_chars += length;
        *self
            .chunks_by_type
            .entry(chunk.chunk_type.clone())
            .or_default() += 1;

        if self.max_chars_in_chunk == 0 || length > self.max_chars_in_chunk {
            self.max_chars_in_chunk = length;
        }
        if self.min_chars_in_chunk == 0 || length < self.min_chars_in_chunk {
            self.min_chars_in_chunk = length;
        }
    }

    pub fn count_of(&self, chunk_type: &ChunkType) -> usize {
        self.chunks_by_type.get(chunk_type).copied().unwrap_or(0)
    }

    /// Calculate derived metrics (call this after all chunks are recorded)
    pub fn calculate_derived_metrics(&mut self, elapsed: Duration) {
        self.total_processing_time = elapsed;

        if self.total_chunks_created > 0 {
            self.avg_chars_per_chunk =
                self.total_chunk_chars as f32 / self.total_chunks_created as f32;

            let forced = self.count_of(&ChunkType::ForcedSplit);
            self.boundary_preservation_rate = (self.total_chunks_created - forced) as f32
                / self.total_chunks_created as f32;
        }

        let total_seconds = elapsed.as_secs_f32();
        if total_seconds > 0.0 {
            self.chars_per_second = self.input_char_count as f32 / total_seconds;
        }
    }

    /// Get summary as string for logging
    pub fn summary(&self) -> String {
        format!(
            "Chunking Stats: {} chars -> {} chunks ({:.1} avg chars/chunk, max {}, min {}) in {:.2}ms | \
            Boundary preservation: {:.1}%, forced splits: {} | Speed: {:.0} chars/s",
            self.input_char_count,
            self.total_chunks_created,
            self.avg_chars_per_chunk,
            self.max_chars_in_chunk,
            self.min_chars_in_chunk,
            self.total_processing_time.as_secs_f64() * 1000.0,
            self.boundary_preservation_rate * 100.0,
            self.count_of(&ChunkType::ForcedSplit),
            self.chars_per_second,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let config = RecursiveChunkingConfig::new(512, 128);
        assert!(config.validate().is_ok());

        let config = RecursiveChunkingConfig::new(0, 0);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ChunkingError::Configuration(_)));

        // overlap is not constrained
        assert!(RecursiveChunkingConfig::new(10, 500).validate().is_ok());
    }

    #[test]
    fn test_config_deserialize() {
        let config: RecursiveChunkingConfig =
            serde_json::from_str(r#"{"max_chunk_chars": 256}"#).unwrap();
        assert_eq!(config, RecursiveChunkingConfig::new(256, 0));
    }

    #[test]
    fn test_chunking_statistics() {
        let mut stats = ChunkingStatistics::new();

        let text = "Sample text\nfor testing";
        stats.record_input_stats(text);
        assert_eq!(stats.input_char_count, 23);
        assert_eq!(stats.input_line_count, 2);

        stats.record_chunk(&TextChunk::new("Sample text".into(), 0, ChunkType::Paragraph));
        stats.record_chunk(&TextChunk::new("for".into(), 1, ChunkType::ForcedSplit));
        stats.record_chunk(&TextChunk::new("testing".into(), 2, ChunkType::ForcedSplit));
        stats.calculate_derived_metrics(Duration::from_millis(2));

        assert_eq!(stats.total_chunks_created, 3);
        assert_eq!(stats.count_of(&ChunkType::Paragraph), 1);
        assert_eq!(stats.count_of(&ChunkType::ForcedSplit), 2);
        assert_eq!(stats.count_of(&ChunkType::Sentence), 0);
        assert_eq!(stats.max_chars_in_chunk, 11);
        assert_eq!(stats.min_chars_in_chunk, 3);
        assert_eq!(stats.total_chunk_chars, 21);
        assert_eq!(stats.avg_chars_per_chunk, 7.0);
        assert!((stats.boundary_preservation_rate - 1.0 / 3.0).abs() < f32::EPSILON);
        assert!(stats.chars_per_second > 0.0);

        let summary = stats.summary();
        assert!(summary.contains("3 chunks"));
        assert!(summary.contains("forced splits: 2"));
    }

    #[test]
    fn test_empty_statistics() {
        let mut stats = ChunkingStatistics::new();
        stats.calculate_derived_metrics(Duration::ZERO);
        assert_eq!(stats.total_chunks_created, 0);
        assert_eq!(stats.avg_chars_per_chunk, 0.0);
        assert_eq!(stats.chars_per_second, 0.0);
    }
}
