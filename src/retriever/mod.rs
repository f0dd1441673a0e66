/// Retriever boundary: semantic nearest-neighbor search over the corpus.
///
/// The pipeline only depends on the trait; [`store::VectorStore`] is the
/// concrete SQLite-backed implementation used by the demo binary.
pub mod store;

use thiserror::Error;

use crate::corpus::Passage;

/// Errors crossing the retrieval boundary.
#[derive(Error, Debug)]
pub enum RetrieverError {
    #[error("embedding query failed: {0}")]
    Embedding(#[from] crate::embedder::EmbedderError),

    #[error("vector store query failed: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("stored metadata is not valid JSON: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// Query-to-passages boundary. Returns at most `k` passages ranked by a
/// similarity metric opaque to the caller. `Send` but not `Sync`: the
/// SQLite-backed implementation owns a single connection.
pub trait Retriever: Send {
    fn query(&self, text: &str, k: usize) -> Result<Vec<Passage>, RetrieverError>;
}
