//! orkg-facts: fact extraction from research-knowledge graphs
//!
//! Crawls a bounded neighborhood around each contribution of a paper,
//! classifies every statement into a semantic bucket, flattens bucketed
//! resources into literal leaves, and compacts the result into
//! deduplicated, leakage-guarded fact lists.
//!
//! # Core Concepts
//!
//! - **Statements**: subject–predicate–object edges read through a `StatementSource`
//! - **Buckets**: problem, method, data, evaluation, artifact or other
//! - **Compact facts**: per-bucket string lists used as retrieval documents
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use orkg_facts::{Extractor, MemorySource};
//!
//! let extractor = Extractor::new(Arc::new(MemorySource::new())).with_depth(2);
//! assert_eq!(extractor.params().max_depth, 2);
//! ```

pub mod config;
pub mod docs;
pub mod extract;
pub mod graph;
pub mod source;

pub use config::Settings;
pub use docs::{bundle_to_docs, summary_paragraph, DocLevel, DocMetadata, Document};
pub use extract::{
    assemble_contribution, classify, crawl, extract_leaves, is_noise_value, looks_like_url,
    merge_paper_core, BucketTag, CompactFacts, ContributionBundle, CrawlParams, CrawlQuery,
    CrawlResult, CueCategory, ExtractError, ExtractResult, Extractor, LeafQuery, PaperBundle,
    RuleSet, RuleSpec, RulesError, SkippedContribution,
};
pub use graph::{
    BucketedStatement, ContributionRef, NodeClass, NodeRef, Paper, PaperMeta, Predicate,
    ResearchField, Statement,
};
pub use source::{MemorySource, OrkgClient, Snapshot, SourceError, SourceResult, StatementSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
