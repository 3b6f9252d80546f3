//! In-memory statement source
//!
//! Serves a static graph snapshot. Used for offline runs (`--snapshot`)
//! and as the test double for the crawler, leaf extractor and assembler.

use super::traits::{SourceError, SourceResult, StatementSource};
use crate::graph::{Paper, Statement};
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// On-disk snapshot format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub papers: Vec<Paper>,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

/// A statement source backed by an in-memory snapshot
#[derive(Debug, Default)]
pub struct MemorySource {
    statements: HashMap<String, Vec<Statement>>,
    papers: HashMap<String, Paper>,
    failing: HashSet<String>,
    fetches: DashMap<String, usize>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a parsed snapshot
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut source = Self::new();
        for paper in snapshot.papers {
            source.add_paper(paper);
        }
        for st in snapshot.statements {
            source.add_statement(st);
        }
        source
    }

    /// Parse a JSON snapshot
    pub fn from_json(json: &str) -> SourceResult<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Load a JSON snapshot from disk
    pub fn load(path: impl AsRef<Path>) -> SourceResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn add_statement(&mut self, statement: Statement) {
        self.statements
            .entry(statement.subject_id.clone())
            .or_default()
            .push(statement);
    }

    pub fn add_paper(&mut self, paper: Paper) {
        self.papers.insert(paper.id().to_string(), paper);
    }

    pub fn with_statement(mut self, statement: Statement) -> Self {
        self.add_statement(statement);
        self
    }

    pub fn with_statements(mut self, statements: impl IntoIterator<Item = Statement>) -> Self {
        for st in statements {
            self.add_statement(st);
        }
        self
    }

    pub fn with_paper(mut self, paper: Paper) -> Self {
        self.add_paper(paper);
        self
    }

    /// Make every statement fetch for `node_id` fail
    pub fn failing_on(mut self, node_id: impl Into<String>) -> Self {
        self.failing.insert(node_id.into());
        self
    }

    /// How many times statements were fetched for `node_id`
    pub fn fetch_count(&self, node_id: &str) -> usize {
        self.fetches.get(node_id).map(|c| *c).unwrap_or(0)
    }

    /// Total statement fetches across all nodes
    pub fn total_fetches(&self) -> usize {
        self.fetches.iter().map(|entry| *entry.value()).sum()
    }

    /// Number of distinct nodes that were fetched at least once
    pub fn distinct_fetches(&self) -> usize {
        self.fetches.len()
    }

    pub fn reset_counts(&self) {
        self.fetches.clear();
    }
}

#[async_trait]
impl StatementSource for MemorySource {
    async fn statements(&self, node_id: &str, _page_size: usize) -> SourceResult<Vec<Statement>> {
        *self.fetches.entry(node_id.to_string()).or_insert(0) += 1;

        if self.failing.contains(node_id) {
            return Err(SourceError::Unavailable(format!(
                "statements for {} could not be fetched",
                node_id
            )));
        }

        Ok(self.statements.get(node_id).cloned().unwrap_or_default())
    }

    async fn paper(&self, paper_id: &str) -> SourceResult<Paper> {
        self.papers
            .get(paper_id)
            .cloned()
            .ok_or_else(|| SourceError::PaperNotFound(paper_id.to_string()))
    }
}
