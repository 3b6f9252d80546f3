//! Leaf-value flattening below a resource node
//!
//! Walks resource edges breadth-first from a start node and collects the
//! literal values found along the way: names, URLs and free text.

use super::normalize::{dedup_preserving_order, is_noise_value, looks_like_url};
use crate::graph::Statement;
use crate::source::{SourceResult, StatementSource};
use std::collections::{HashSet, VecDeque};

/// Predicate token whose literals are kept even when short
const NAME_TOKEN: &str = "name";

/// Shortest accepted literal reached through a non-name predicate
const MIN_FREE_TEXT_CHARS: usize = 4;

/// Query collecting literal leaves below a node
#[derive(Debug, Clone)]
pub struct LeafQuery {
    pub start: String,
    pub max_depth: usize,
    /// Cap on distinct nodes fetched
    pub max_nodes: usize,
    pub page_size: usize,
}

impl LeafQuery {
    pub fn from(start: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            max_depth: 6,
            max_nodes: 400,
            page_size: 200,
        }
    }

    pub fn depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Collect leaves, deduplicated in first-occurrence order
    pub async fn execute(&self, source: &dyn StatementSource) -> SourceResult<Vec<String>> {
        let mut values: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<(String, usize)> = VecDeque::new();
        queue.push_back((self.start.clone(), 0));

        while seen.len() < self.max_nodes {
            let Some((node_id, depth)) = queue.pop_front() else {
                break;
            };
            if depth > self.max_depth || seen.contains(&node_id) {
                continue;
            }
            seen.insert(node_id.clone());

            for st in source.statements(&node_id, self.page_size).await? {
                if st.object.is_literal() {
                    if let Some(value) = accept_literal(&st) {
                        values.push(value);
                    }
                } else if st.object.is_resource() {
                    if let Some(next) = st.object.id() {
                        queue.push_back((next.to_string(), depth + 1));
                    }
                }
            }
        }

        Ok(dedup_preserving_order(values))
    }
}

/// Decide whether a literal object is worth keeping
fn accept_literal(st: &Statement) -> Option<String> {
    let value = st.object.label.trim();

    if looks_like_url(value) {
        return Some(value.to_string());
    }

    let predicate = st.predicate.display_label().to_lowercase();
    let keep = if predicate.contains(NAME_TOKEN) {
        !is_noise_value(value)
    } else {
        !is_noise_value(value) && value.chars().count() >= MIN_FREE_TEXT_CHARS
    };

    keep.then(|| value.to_string())
}

/// Collect the literal leaves reachable from `start_id`
pub async fn extract_leaves(
    source: &dyn StatementSource,
    start_id: &str,
    max_depth: usize,
    max_nodes: usize,
) -> SourceResult<Vec<String>> {
    LeafQuery::from(start_id)
        .depth(max_depth)
        .max_nodes(max_nodes)
        .execute(source)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NodeRef, Predicate};
    use crate::source::MemorySource;

    fn lit(from: &str, predicate: &str, value: &str) -> Statement {
        Statement::new(from, Predicate::new("P", predicate), NodeRef::literal(value))
    }

    fn link(from: &str, to: &str) -> Statement {
        Statement::new(from, Predicate::new("P", "has part"), NodeRef::resource(to, to))
    }

    #[tokio::test]
    async fn name_predicates_keep_short_values() {
        let source = MemorySource::new().with_statements(vec![
            lit("R1", "Name", "CNN"),
            lit("R1", "label", "CNN2"),
            lit("R1", "acronym", "GAN"),
        ]);
        let leaves = extract_leaves(&source, "R1", 3, 10).await.unwrap();
        assert_eq!(leaves, vec!["CNN", "CNN2"]);
    }

    #[tokio::test]
    async fn urls_are_kept_raw() {
        let source = MemorySource::new().with_statements(vec![
            lit("R1", "x", " https://github.com/a/b "),
            lit("R1", "has value", "true"),
            lit("R1", "has value", "N/A"),
            lit("R1", "has name", "list"),
        ]);
        let leaves = extract_leaves(&source, "R1", 3, 10).await.unwrap();
        assert_eq!(leaves, vec!["https://github.com/a/b"]);
    }

    #[tokio::test]
    async fn nested_resources_are_flattened_in_bfs_order() {
        let source = MemorySource::new().with_statements(vec![
            link("R1", "R2"),
            lit("R1", "description", "Top level text"),
            link("R2", "R3"),
            lit("R2", "name", "Middle"),
            lit("R3", "name", "Deep"),
            lit("R3", "name", "Middle"),
        ]);
        let leaves = extract_leaves(&source, "R1", 5, 10).await.unwrap();
        assert_eq!(leaves, vec!["Top level text", "Middle", "Deep"]);
    }

    #[tokio::test]
    async fn depth_bound_stops_descent() {
        let source = MemorySource::new().with_statements(vec![
            link("R1", "R2"),
            link("R2", "R3"),
            lit("R3", "name", "Too deep"),
            lit("R2", "name", "Reached"),
        ]);
        let leaves = extract_leaves(&source, "R1", 1, 10).await.unwrap();
        assert_eq!(leaves, vec!["Reached"]);
        assert_eq!(source.fetch_count("R3"), 0);
    }

    #[tokio::test]
    async fn node_cap_limits_fetches() {
        let source = MemorySource::new().with_statements(vec![
            link("R1", "R2"),
            link("R1", "R3"),
            link("R1", "R4"),
            lit("R2", "name", "two"),
            lit("R3", "name", "three"),
            lit("R4", "name", "four"),
        ]);
        let leaves = extract_leaves(&source, "R1", 5, 2).await.unwrap();
        assert_eq!(leaves, vec!["two"]);
        assert_eq!(source.distinct_fetches(), 2);
    }

    #[tokio::test]
    async fn cycles_do_not_refetch() {
        let source = MemorySource::new().with_statements(vec![
            link("R1", "R2"),
            link("R2", "R1"),
            lit("R2", "name", "Loop"),
        ]);
        let leaves = extract_leaves(&source, "R1", 50, 400).await.unwrap();
        assert_eq!(leaves, vec!["Loop"]);
        assert_eq!(source.fetch_count("R1"), 1);
        assert_eq!(source.fetch_count("R2"), 1);
    }

    #[tokio::test]
    async fn other_classes_are_ignored() {
        let source = MemorySource::new().with_statements(vec![
            Statement::new("R1", Predicate::new("P", "name"), NodeRef::classed("C1", "Some class", "class")),
            lit("C1", "name", "Unreachable"),
        ]);
        let leaves = extract_leaves(&source, "R1", 5, 10).await.unwrap();
        assert!(leaves.is_empty());
    }
}
