use super::document::IndexDocument;

/// Destination for chunked documents.
///
/// Embedding and persistence happen behind this trait (a Qdrant client, for
/// instance); the indexer only hands over ids, text and metadata.
pub trait VectorStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Embed and store one batch of documents
    fn add_documents(&mut self, documents: &[IndexDocument]) -> Result<(), Self::Error>;

    /// Number of documents already stored
    fn count(&self) -> Result<usize, Self::Error>;
}
