//! Bounded breadth-first neighborhood crawl

use crate::graph::Statement;
use crate::source::{SourceResult, StatementSource};
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Query for crawling the statement graph around a root node
#[derive(Debug, Clone)]
pub struct CrawlQuery {
    /// Starting node ID
    pub root: String,
    /// Maximum hop count (0 = root statements only)
    pub max_depth: usize,
    /// Page size hint forwarded to the source
    pub page_size: usize,
}

/// Result of a crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlResult {
    /// Every statement encountered, in BFS level order; not deduplicated
    pub statements: Vec<Statement>,
    /// Node ids whose statements were fetched, in visit order
    pub visited: Vec<String>,
}

impl CrawlQuery {
    /// Create a crawl query rooted at `root`
    pub fn from(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            max_depth: 4,
            page_size: 200,
        }
    }

    /// Set the maximum traversal depth
    pub fn depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the page size hint
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Execute the crawl against a source.
    ///
    /// Each node id is fetched at most once per invocation; only
    /// resource-class objects are followed.
    pub async fn execute(&self, source: &dyn StatementSource) -> SourceResult<CrawlResult> {
        let mut result = CrawlResult::default();
        let mut seen: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<(String, usize)> = VecDeque::new();
        queue.push_back((self.root.clone(), 0));

        while let Some((node_id, depth)) = queue.pop_front() {
            if depth > self.max_depth || seen.contains(&node_id) {
                continue;
            }
            seen.insert(node_id.clone());

            let statements = source.statements(&node_id, self.page_size).await?;
            for st in statements {
                if depth < self.max_depth && st.object.is_resource() {
                    if let Some(next) = st.object.id() {
                        if !seen.contains(next) {
                            queue.push_back((next.to_string(), depth + 1));
                        }
                    }
                }
                result.statements.push(st);
            }
            result.visited.push(node_id);
        }

        debug!(
            root = %self.root,
            nodes = result.visited.len(),
            statements = result.statements.len(),
            "crawl complete"
        );
        Ok(result)
    }
}

/// Crawl the neighborhood of `root_id` and return every statement found
pub async fn crawl(
    source: &dyn StatementSource,
    root_id: &str,
    max_depth: usize,
    page_size: usize,
) -> SourceResult<Vec<Statement>> {
    let result = CrawlQuery::from(root_id)
        .depth(max_depth)
        .page_size(page_size)
        .execute(source)
        .await?;
    Ok(result.statements)
}
