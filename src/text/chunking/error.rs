//! Error types for recursive text chunking and indexing

/// Error types for chunking and indexing operations
#[derive(thiserror::Error, Debug)]
pub enum ChunkingError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Regex compilation error: {0}")]
    Regex(#[from] regex::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Character encoding error: {0}")]
    Encoding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),
}

/// Result type for kb-chunking operations
pub type Result<T> = std::result::Result<T, ChunkingError>;

/// Trait for converting vector store backend errors into chunking errors
pub trait IntoChunkingError<T> {
    fn into_chunking_error(self) -> Result<T>;
}

impl<T, E> IntoChunkingError<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn into_chunking_error(self) -> Result<T> {
        self.map_err(|e| ChunkingError::VectorStore(e.to_string()))
    }
}

impl ChunkingError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an encoding error
    pub fn encoding<S: Into<String>>(msg: S) -> Self {
        Self::Encoding(msg.into())
    }

    /// Create a vector store error
    pub fn vector_store<S: Into<String>>(msg: S) -> Self {
        Self::VectorStore(msg.into())
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Must not be retried without fixing the configuration
            Self::Configuration(_) | Self::Regex(_) => false,
            // Store and I/O failures might be temporary
            Self::VectorStore(_) | Self::Io(_) => true,
            // Malformed input files need a different input
            Self::Json(_) | Self::Encoding(_) => false,
        }
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Regex(_) => "regex",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Encoding(_) => "encoding",
            Self::VectorStore(_) => "vector_store",
        }
    }
}
