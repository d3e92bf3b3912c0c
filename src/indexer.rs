//! Turns crawled and uploaded pages into chunked documents for the vector store

pub mod document;
pub mod store;

pub use document::{
    ChunkedPage, DocumentMetadata, IndexDocument, PageContent, ScrapedPage, UploadedPage,
    annotate_pages, write_chunked_pages,
};
pub use store::VectorStore;

use crate::text::chunking::{
    ChunkingError, IntoChunkingError, RecursiveChunker, RecursiveChunkingConfig, Result,
};
use crate::util::encoding::encode_to_utf8;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Indexer settings, read from `INDEXER_*` environment variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IndexerConfig {
    #[serde(default = "IndexerConfig::default_max_chunk_chars")]
    pub max_chunk_chars: usize,
    #[serde(default = "IndexerConfig::default_overlap_chars")]
    pub overlap_chars: usize,
    /// Documents per `add_documents` call
    #[serde(default = "IndexerConfig::default_batch_size")]
    pub batch_size: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: Self::default_max_chunk_chars(),
            overlap_chars: Self::default_overlap_chars(),
            batch_size: Self::default_batch_size(),
        }
    }
}

impl IndexerConfig {
    fn default_max_chunk_chars() -> usize {
        512
    }

    fn default_overlap_chars() -> usize {
        128
    }

    fn default_batch_size() -> usize {
        256
    }

    pub fn from_env() -> Result<Self> {
        envy::prefixed("INDEXER_")
            .from_env::<IndexerConfig>()
            .map_err(|e| ChunkingError::configuration(format!("cannot read indexer config: {e}")))
    }

    pub fn chunking_config(&self) -> RecursiveChunkingConfig {
        RecursiveChunkingConfig::new(self.max_chunk_chars, self.overlap_chars)
    }

    pub fn validate(&self) -> Result<()> {
        self.chunking_config().validate()?;
        if self.batch_size == 0 {
            return Err(ChunkingError::configuration(
                "batch_size must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Chunks pages and forwards the resulting documents to a [`VectorStore`]
pub struct DocumentIndexer<S: VectorStore> {
    store: S,
    chunker: RecursiveChunker,
    config: IndexerConfig,
}

impl<S: VectorStore> DocumentIndexer<S> {
    pub fn new(store: S, config: IndexerConfig) -> Result<Self> {
        config.validate()?;
        let chunker = RecursiveChunker::new(config.chunking_config())?;
        Ok(Self {
            store,
            chunker,
            config,
        })
    }

    /// Index crawled pages; ids are `web_0`, `web_1`, ... for this call
    pub fn index_scraped_pages(&mut self, pages: &[ScrapedPage]) -> Result<Vec<IndexDocument>> {
        let mut documents = Vec::new();
        for page in pages {
            let chunks = self.chunker.chunk(&page.content);
            debug!("{} -> {} chunks", page.url, chunks.len());
            let total_chunks = chunks.len();
            for (chunk_index, content) in chunks.into_iter().enumerate() {
                documents.push(IndexDocument {
                    id: format!("web_{}", documents.len()),
                    content,
                    metadata: DocumentMetadata::Web {
                        url: page.url.clone(),
                        title: page.title.clone(),
                        chunk_index,
                        total_chunks,
                    },
                });
            }
        }

        self.forward(&documents)?;
        info!(
            "Indexed {} web documents from {} pages",
            documents.len(),
            pages.len()
        );
        Ok(documents)
    }

    /// Index uploaded pages; ids continue from the store's current count
    pub fn index_uploaded_pages(&mut self, pages: &[UploadedPage]) -> Result<Vec<IndexDocument>> {
        let first_id = self.store.count().into_chunking_error()?;
        let mut documents = Vec::new();
        for page in pages {
            let chunks = self.chunker.chunk(&page.content);
            debug!(
                "{} (page {:?}) -> {} chunks",
                page.filename,
                page.page_number,
                chunks.len()
            );
            let total_chunks = chunks.len();
            for (chunk_index, content) in chunks.into_iter().enumerate() {
                documents.push(IndexDocument {
                    id: format!("upload_{}", first_id + documents.len()),
                    content,
                    metadata: DocumentMetadata::Upload {
                        filename: page.filename.clone(),
                        file_type: page.file_type.clone(),
                        page_number: page.page_number,
                        chunk_index,
                        total_chunks,
                    },
                });
            }
        }

        self.forward(&documents)?;
        info!(
            "Indexed {} uploaded documents from {} pages",
            documents.len(),
            pages.len()
        );
        Ok(documents)
    }

    /// Index a JSON array of crawled pages
    pub fn index_scraped_file(&mut self, path: impl AsRef<Path>) -> Result<Vec<IndexDocument>> {
        let pages: Vec<ScrapedPage> = load_pages(path.as_ref())?;
        self.index_scraped_pages(&pages)
    }

    /// Index a JSON array of uploaded file pages
    pub fn index_uploaded_file(&mut self, path: impl AsRef<Path>) -> Result<Vec<IndexDocument>> {
        let pages: Vec<UploadedPage> = load_pages(path.as_ref())?;
        self.index_uploaded_pages(&pages)
    }

    pub fn chunker(&self) -> &RecursiveChunker {
        &self.chunker
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn forward(&mut self, documents: &[IndexDocument]) -> Result<()> {
        for batch in documents.chunks(self.config.batch_size) {
            self.store.add_documents(batch).into_chunking_error()?;
            debug!("Stored batch of {} documents", batch.len());
        }
        Ok(())
    }
}

/// Read a JSON array of page records, detecting the file's text encoding
pub fn load_pages<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    info!("Loading pages from {}", path.display());
    let mut file = File::open(path)?;
    let text = encode_to_utf8(&mut file).map_err(|e| ChunkingError::encoding(e.to_string()))?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[derive(Debug, thiserror::Error)]
    #[error("store offline")]
    struct StoreOffline;

    // Mock vector store recording every batch
    #[derive(Default)]
    struct MockVectorStore {
        batches: Vec<Vec<IndexDocument>>,
        preexisting: usize,
        offline: bool,
    }

    impl MockVectorStore {
        fn stored(&self) -> Vec<&IndexDocument> {
            self.batches.iter().flatten().collect()
        }
    }

    impl VectorStore for MockVectorStore {
        type Error = StoreOffline;

        fn add_documents(&mut self, documents: &[IndexDocument]) -> std::result::Result<(), Self::Error> {
            if self.offline {
                return Err(StoreOffline);
            }
            self.batches.push(documents.to_vec());
            Ok(())
        }

        fn count(&self) -> std::result::Result<usize, Self::Error> {
            if self.offline {
                return Err(StoreOffline);
            }
            Ok(self.preexisting + self.batches.iter().map(Vec::len).sum::<usize>())
        }
    }

    fn indexer(max_chunk_chars: usize, batch_size: usize) -> DocumentIndexer<MockVectorStore> {
        let config = IndexerConfig {
            max_chunk_chars,
            overlap_chars: 0,
            batch_size,
        };
        DocumentIndexer::new(MockVectorStore::default(), config).unwrap()
    }

    fn web_page(url: &str, content: &str) -> ScrapedPage {
        ScrapedPage {
            url: url.to_string(),
            title: format!("Title of {url}"),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_default_config() {
        let config = IndexerConfig::default();
        assert_eq!(config.max_chunk_chars, 512);
        assert_eq!(config.overlap_chars, 128);
        assert_eq!(config.batch_size, 256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let config = IndexerConfig {
            max_chunk_chars: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ChunkingError::Configuration(_))
        ));

        let config = IndexerConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(DocumentIndexer::new(MockVectorStore::default(), config).is_err());
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config: IndexerConfig = serde_json::from_str(r#"{"max_chunk_chars": 300}"#).unwrap();
        assert_eq!(config.max_chunk_chars, 300);
        assert_eq!(config.overlap_chars, 128);
        assert_eq!(config.batch_size, 256);
    }

    #[test]
    fn test_index_scraped_pages() {
        let mut indexer = indexer(30, 256);
        let pages = vec![
            web_page(
                "https://example.com/internet",
                "Fiber plans start at 100 Mbps.\n\nInstallation takes three days.",
            ),
            web_page("https://example.com/empty", "  \n "),
            web_page("https://example.com/mobile", "Prepaid lines."),
        ];

        let documents = indexer.index_scraped_pages(&pages).unwrap();
        let ids: Vec<_> = documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["web_0", "web_1", "web_2"]);

        assert_eq!(documents[0].content, "Fiber plans start at 100 Mbps.");
        assert_eq!(documents[1].content, "Installation takes three days.");
        assert_eq!(
            documents[1].metadata,
            DocumentMetadata::Web {
                url: "https://example.com/internet".to_string(),
                title: "Title of https://example.com/internet".to_string(),
                chunk_index: 1,
                total_chunks: 2,
            }
        );
        assert_eq!(documents[2].metadata.chunk_index(), 0);
        assert_eq!(documents[2].metadata.total_chunks(), 1);

        // forwarded exactly once
        assert_eq!(indexer.store().stored().len(), 3);
    }

    #[test]
    fn test_index_uploaded_pages_continues_ids() {
        let store = MockVectorStore {
            preexisting: 10,
            ..Default::default()
        };
        let config = IndexerConfig {
            max_chunk_chars: 20,
            ..Default::default()
        };
        let mut indexer = DocumentIndexer::new(store, config).unwrap();

        let pages = vec![UploadedPage {
            filename: "tariffs.pdf".to_string(),
            file_type: ".pdf".to_string(),
            page_number: Some(3),
            content: "باقات الإنترنت. Internet bundles.".to_string(),
        }];

        let documents = indexer.index_uploaded_pages(&pages).unwrap();
        let ids: Vec<_> = documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["upload_10", "upload_11"]);
        assert_eq!(documents[0].content, "باقات الإنترنت.");
        assert_eq!(documents[0].metadata.source(), "upload");
        assert!(matches!(
            &documents[1].metadata,
            DocumentMetadata::Upload { page_number: Some(3), chunk_index: 1, total_chunks: 2, .. }
        ));

        // a second upload continues after the stored ones
        let documents = indexer.index_uploaded_pages(&pages).unwrap();
        assert_eq!(documents[0].id, "upload_12");
    }

    #[test]
    fn test_documents_are_forwarded_in_batches() {
        let mut indexer = indexer(10, 2);
        let pages = vec![web_page(
            "https://example.com/words",
            "one two three four five",
        )];

        let documents = indexer.index_scraped_pages(&pages).unwrap();
        assert_eq!(documents.len(), 5);

        let store = indexer.into_store();
        let sizes: Vec<_> = store.batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
    }

    #[test]
    fn test_store_failure_propagates() {
        let store = MockVectorStore {
            offline: true,
            ..Default::default()
        };
        let mut indexer = DocumentIndexer::new(store, IndexerConfig::default()).unwrap();

        let err = indexer
            .index_scraped_pages(&[web_page("https://example.com", "content")])
            .unwrap_err();
        assert!(matches!(err, ChunkingError::VectorStore(_)));
        assert!(err.is_recoverable());

        let err = indexer.index_uploaded_pages(&[]).unwrap_err();
        assert_eq!(err.category(), "vector_store");
    }

    #[test]
    fn test_index_scraped_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"url": "https://example.com", "title": "Home", "content": "مرحبا بكم في موقعنا."}}]"#
        )
        .unwrap();

        let mut indexer = indexer(512, 256);
        let documents = indexer.index_scraped_file(file.path()).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].content, "مرحبا بكم في موقعنا.");
    }

    #[test]
    fn test_index_uploaded_file_errors() {
        let mut indexer = indexer(512, 256);
        let err = indexer
            .index_uploaded_file("/nonexistent/kb-chunking/uploads.json")
            .unwrap_err();
        assert!(matches!(err, ChunkingError::Io(_)));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = indexer.index_uploaded_file(file.path()).unwrap_err();
        assert!(matches!(err, ChunkingError::Json(_)));
    }
}
