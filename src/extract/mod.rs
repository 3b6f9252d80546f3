//! Crawl → classify → flatten → compact pipeline
//!
//! Turns the neighborhood of each contribution node into deduplicated,
//! leakage-guarded fact lists.

mod bundle;
mod classify;
mod crawl;
mod extractor;
mod leaves;
pub mod normalize;
mod rules;

pub use bundle::{
    assemble_contribution, merge_paper_core, CompactFacts, ContributionBundle, CrawlParams,
    PaperBundle, SkippedContribution,
};
pub use classify::{classify, BucketTag};
pub use crawl::{crawl, CrawlQuery, CrawlResult};
pub use extractor::{ExtractError, ExtractResult, Extractor};
pub use leaves::{extract_leaves, LeafQuery};
pub use normalize::{is_noise_value, looks_like_url};
pub use rules::{CueCategory, RuleSet, RuleSpec, RulesError};
