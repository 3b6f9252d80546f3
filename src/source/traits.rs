//! Collaborator contract for fetching papers and statements

use crate::graph::{Paper, Statement};
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a statement source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Paper not found: {0}")]
    PaperNotFound(String),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Read-only access to the knowledge graph.
///
/// Implementations own pagination, retries and caching. From the caller's
/// view one `statements` call yields the complete out-edge list of a node.
/// Implementations must be `Send + Sync` so contributions can be crawled
/// concurrently.
#[async_trait]
pub trait StatementSource: Send + Sync {
    /// All statements whose subject is `node_id`, pages concatenated.
    ///
    /// `page_size` is forwarded to paging; an unknown node yields an empty list.
    async fn statements(&self, node_id: &str, page_size: usize) -> SourceResult<Vec<Statement>>;

    /// Paper metadata and its contribution list
    async fn paper(&self, paper_id: &str) -> SourceResult<Paper>;
}
