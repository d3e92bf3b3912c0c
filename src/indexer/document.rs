//! Page records coming from the document sources and the documents handed to the vector store

use crate::text::chunking::{RecursiveChunker, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Anything carrying extracted text to be chunked
pub trait PageContent {
    fn content(&self) -> &str;
}

/// A crawled web page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedPage {
    pub url: String,
    #[serde(default)]
    pub title: String,
    pub content: String,
}

impl PageContent for ScrapedPage {
    fn content(&self) -> &str {
        &self.content
    }
}

/// One page (or the whole text) of an uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedPage {
    pub filename: String,
    pub file_type: String,
    /// Absent for formats without pages (docx, txt, images)
    #[serde(default)]
    pub page_number: Option<u32>,
    pub content: String,
}

impl PageContent for UploadedPage {
    fn content(&self) -> &str {
        &self.content
    }
}

/// Per-chunk payload stored next to the embedding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DocumentMetadata {
    Web {
        url: String,
        title: String,
        chunk_index: usize,
        total_chunks: usize,
    },
    Upload {
        filename: String,
        file_type: String,
        page_number: Option<u32>,
        chunk_index: usize,
        total_chunks: usize,
    },
}

impl DocumentMetadata {
    pub fn source(&self) -> &'static str {
        match self {
            Self::Web { .. } => "web",
            Self::Upload { .. } => "upload",
        }
    }

    pub fn chunk_index(&self) -> usize {
        match self {
            Self::Web { chunk_index, .. } | Self::Upload { chunk_index, .. } => *chunk_index,
        }
    }

    pub fn total_chunks(&self) -> usize {
        match self {
            Self::Web { total_chunks, .. } | Self::Upload { total_chunks, .. } => *total_chunks,
        }
    }
}

/// A chunk ready to be embedded and stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDocument {
    pub id: String,
    pub content: String,
    pub metadata: DocumentMetadata,
}

/// A page record with its chunks attached, for offline inspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkedPage<P> {
    #[serde(flatten)]
    pub page: P,
    pub chunks: Vec<String>,
    pub chunk_length: usize,
}

pub fn annotate_pages<P>(pages: &[P], chunker: &RecursiveChunker) -> Vec<ChunkedPage<P>>
where
    P: PageContent + Clone,
{
    pages
        .iter()
        .map(|page| {
            let chunks = chunker.chunk(page.content());
            ChunkedPage {
                page: page.clone(),
                chunk_length: chunks.len(),
                chunks,
            }
        })
        .collect()
}

/// Pretty-printed JSON array; non-ASCII text is written as-is
pub fn write_chunked_pages<W, P>(writer: W, pages: &[ChunkedPage<P>]) -> Result<()>
where
    W: Write,
    P: Serialize,
{
    serde_json::to_writer_pretty(writer, pages)?;
    Ok(())
}
