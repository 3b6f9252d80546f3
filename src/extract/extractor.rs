//! Paper-level extraction entry point
//!
//! Fetches a paper, assembles one bundle per contribution, then merges the
//! contribution compacts into the paper core. Contributions are independent,
//! so with `concurrency > 1` they run as tokio tasks bounded by a semaphore;
//! the merge waits for all of them.

use super::bundle::{assemble_contribution, ContributionBundle, CrawlParams, PaperBundle, SkippedContribution};
use super::rules::RuleSet;
use crate::source::{SourceError, StatementSource};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Errors that abort an extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Contribution worker failed: {0}")]
    Worker(String),
}

/// Result type for extraction operations
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Extraction pipeline bound to a statement source
#[derive(Clone)]
pub struct Extractor {
    source: Arc<dyn StatementSource>,
    rules: Arc<RuleSet>,
    params: CrawlParams,
}

impl Extractor {
    /// Create an extractor with the built-in rule set and default limits
    pub fn new(source: Arc<dyn StatementSource>) -> Self {
        Self {
            source,
            rules: Arc::new(RuleSet::default()),
            params: CrawlParams::default(),
        }
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = Arc::new(rules);
        self
    }

    pub fn with_params(mut self, params: CrawlParams) -> Self {
        self.params = params;
        self
    }

    /// Override the crawl depth only
    pub fn with_depth(mut self, max_depth: usize) -> Self {
        self.params.max_depth = max_depth;
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn params(&self) -> &CrawlParams {
        &self.params
    }

    /// Assemble a single contribution
    pub async fn extract_contribution(
        &self,
        contribution_id: &str,
        contribution_label: &str,
    ) -> ExtractResult<ContributionBundle> {
        let bundle = assemble_contribution(
            self.source.as_ref(),
            contribution_id,
            contribution_label,
            &self.rules,
            &self.params,
        )
        .await?;
        Ok(bundle)
    }

    /// Extract facts for every contribution of a paper.
    ///
    /// Any source failure fails the whole call; no partial bundle is returned.
    /// Contributions without an id are skipped and recorded in the bundle.
    pub async fn extract_paper_bundle(&self, paper_id: &str) -> ExtractResult<PaperBundle> {
        let paper = self.source.paper(paper_id).await?;

        let mut work: Vec<(String, String)> = Vec::new();
        let mut skipped: Vec<SkippedContribution> = Vec::new();
        for contribution in &paper.contributions {
            match contribution.id() {
                Some(id) => work.push((id.to_string(), contribution.label.clone())),
                None => {
                    warn!(paper = paper_id, label = %contribution.label, "skipping contribution without id");
                    skipped.push(SkippedContribution {
                        label: contribution.label.clone(),
                        reason: "missing id".to_string(),
                    });
                }
            }
        }

        let contributions = if self.params.concurrency <= 1 || work.len() <= 1 {
            let mut out = Vec::with_capacity(work.len());
            for (id, label) in &work {
                out.push(self.extract_contribution(id, label).await?);
            }
            out
        } else {
            self.extract_concurrently(work).await?
        };

        let bundle = PaperBundle::new(paper.meta, contributions).with_skipped(skipped);
        let core = bundle.paper_core();
        info!(
            paper = paper_id,
            contributions = bundle.contributions().len(),
            skipped = bundle.skipped().len(),
            problems = core.problems.len(),
            methods = core.methods.len(),
            data = core.data.len(),
            evaluation = core.evaluation.len(),
            artifacts = core.artifacts.len(),
            "paper extracted"
        );
        Ok(bundle)
    }

    async fn extract_concurrently(
        &self,
        work: Vec<(String, String)>,
    ) -> ExtractResult<Vec<ContributionBundle>> {
        let permits = self.params.concurrency.clamp(1, Semaphore::MAX_PERMITS);
        let semaphore = Arc::new(Semaphore::new(permits));
        let mut tasks = JoinSet::new();
        let total = work.len();

        for (index, (id, label)) in work.into_iter().enumerate() {
            let source = Arc::clone(&self.source);
            let rules = Arc::clone(&self.rules);
            let semaphore = Arc::clone(&semaphore);
            let params = self.params;

            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| ExtractError::Worker(e.to_string()))?;
                let bundle = assemble_contribution(source.as_ref(), &id, &label, &rules, &params).await?;
                Ok::<_, ExtractError>((index, bundle))
            });
        }

        let mut slots: Vec<Option<ContributionBundle>> = vec![None; total];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok((index, bundle))) => slots[index] = Some(bundle),
                Ok(Err(e)) => {
                    tasks.abort_all();
                    return Err(e);
                }
                Err(e) => {
                    tasks.abort_all();
                    return Err(ExtractError::Worker(e.to_string()));
                }
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }
}
