//! Common test utilities for extraction integration tests
//!
//! Graph fixtures built on `MemorySource`, plus a random cyclic graph
//! generator and a reference reachability computation.

#![allow(dead_code)]

use orkg_facts::{ContributionRef, MemorySource, NodeRef, Paper, Predicate, Statement};
use rand::Rng;
use std::collections::{HashMap, HashSet, VecDeque};

/// Fluent builder for small statement graphs
#[derive(Default)]
pub struct GraphBuilder {
    statements: Vec<Statement>,
    papers: Vec<Paper>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `subject --predicate--> "value"`
    pub fn lit(mut self, subject: &str, predicate: &str, value: &str) -> Self {
        self.statements.push(Statement::new(
            subject,
            Predicate::new(pred_id(predicate), predicate),
            NodeRef::literal(value),
        ));
        self
    }

    /// `subject --predicate--> (object)` where object is a resource
    pub fn link(mut self, subject: &str, predicate: &str, object: &str, label: &str) -> Self {
        self.statements.push(Statement::new(
            subject,
            Predicate::new(pred_id(predicate), predicate),
            NodeRef::resource(object, label),
        ));
        self
    }

    /// `subject --predicate--> (object: ResearchProblem)`
    pub fn problem(mut self, subject: &str, predicate: &str, object: &str, label: &str) -> Self {
        self.statements.push(Statement::new(
            subject,
            Predicate::new(pred_id(predicate), predicate),
            NodeRef::classed(object, label, "ResearchProblem"),
        ));
        self
    }

    /// Register a paper with `(id, label)` contributions
    pub fn paper(mut self, id: &str, title: &str, contributions: &[(&str, &str)]) -> Self {
        let paper = contributions
            .iter()
            .fold(Paper::new(id, title), |p, (cid, label)| {
                p.with_contribution(ContributionRef::new(*cid, *label))
            });
        self.papers.push(paper);
        self
    }

    pub fn build(self) -> MemorySource {
        self.papers
            .into_iter()
            .fold(MemorySource::new().with_statements(self.statements), |s, p| {
                s.with_paper(p)
            })
    }
}

fn pred_id(label: &str) -> String {
    format!("P_{}", label.replace(' ', "_"))
}

/// A random directed graph over `R0..R{n-1}`, cycles allowed
pub struct RandomGraph {
    pub source: MemorySource,
    pub adjacency: HashMap<String, Vec<String>>,
    pub statement_count: HashMap<String, usize>,
}

pub fn node_name(i: usize) -> String {
    format!("R{}", i)
}

pub fn random_graph(rng: &mut impl Rng, nodes: usize, edges: usize) -> RandomGraph {
    let mut statements = Vec::new();
    let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
    let mut statement_count: HashMap<String, usize> = HashMap::new();

    for i in 0..nodes {
        let name = node_name(i);
        statements.push(Statement::new(
            name.clone(),
            Predicate::new("P_name", "name"),
            NodeRef::literal(format!("Node {}", i)),
        ));
        *statement_count.entry(name).or_insert(0) += 1;
    }

    for _ in 0..edges {
        let from = node_name(rng.gen_range(0..nodes));
        let to = node_name(rng.gen_range(0..nodes));
        statements.push(Statement::new(
            from.clone(),
            Predicate::new("P_part", "has part"),
            NodeRef::resource(to.clone(), to.clone()),
        ));
        adjacency.entry(from.clone()).or_default().push(to);
        *statement_count.entry(from).or_insert(0) += 1;
    }

    RandomGraph {
        source: MemorySource::new().with_statements(statements),
        adjacency,
        statement_count,
    }
}

/// Nodes reachable from `root` within `max_depth` hops, root included
pub fn reachable_within(
    adjacency: &HashMap<String, Vec<String>>,
    root: &str,
    max_depth: usize,
) -> HashSet<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<(String, usize)> = VecDeque::new();
    seen.insert(root.to_string());
    queue.push_back((root.to_string(), 0));

    while let Some((node, depth)) = queue.pop_front() {
        if depth == max_depth {
            continue;
        }
        for next in adjacency.get(&node).into_iter().flatten() {
            if seen.insert(next.clone()) {
                queue.push_back((next.clone(), depth + 1));
            }
        }
    }
    seen
}
