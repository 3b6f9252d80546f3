//! Bundle assembly: bucket compaction, leakage guard and paper-level merge

use super::classify::{classify, BucketTag};
use super::crawl::CrawlQuery;
use super::leaves::LeafQuery;
use super::normalize::{dedup_preserving_order, is_noise_value};
use super::rules::RuleSet;
use crate::graph::{BucketedStatement, PaperMeta};
use crate::source::{SourceResult, StatementSource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tokio::sync::Semaphore;
use tracing::debug;

/// Structural bounds for crawling and leaf extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlParams {
    /// Hops from the contribution node
    pub max_depth: usize,
    /// Page size hint for statement fetches
    pub page_size: usize,
    /// Hops below a bucketed resource during leaf extraction
    pub leaves_max_depth: usize,
    /// Distinct nodes fetched per leaf extraction
    pub leaves_max_nodes: usize,
    /// Contributions processed at once
    pub concurrency: usize,
}

impl Default for CrawlParams {
    fn default() -> Self {
        Self {
            max_depth: 4,
            page_size: 200,
            leaves_max_depth: 6,
            leaves_max_nodes: 400,
            concurrency: 1,
        }
    }
}

impl CrawlParams {
    pub fn with_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_leaf_limits(mut self, max_depth: usize, max_nodes: usize) -> Self {
        self.leaves_max_depth = max_depth;
        self.leaves_max_nodes = max_nodes;
        self
    }

    /// Clamped to `1..=Semaphore::MAX_PERMITS`
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, Semaphore::MAX_PERMITS);
        self
    }
}

/// Deduplicated fact lists per semantic bucket
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompactFacts {
    #[serde(default)]
    pub problems: Vec<String>,
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub data: Vec<String>,
    #[serde(default)]
    pub evaluation: Vec<String>,
    #[serde(default)]
    pub artifacts: Vec<String>,
}

impl CompactFacts {
    /// The list backing a compacted bucket; `None` for `Other`
    pub fn field(&self, tag: BucketTag) -> Option<&[String]> {
        match tag {
            BucketTag::Problem => Some(&self.problems),
            BucketTag::Method => Some(&self.methods),
            BucketTag::Data => Some(&self.data),
            BucketTag::Evaluation => Some(&self.evaluation),
            BucketTag::Artifact => Some(&self.artifacts),
            BucketTag::Other => None,
        }
    }

    fn field_mut(&mut self, tag: BucketTag) -> Option<&mut Vec<String>> {
        match tag {
            BucketTag::Problem => Some(&mut self.problems),
            BucketTag::Method => Some(&mut self.methods),
            BucketTag::Data => Some(&mut self.data),
            BucketTag::Evaluation => Some(&mut self.evaluation),
            BucketTag::Artifact => Some(&mut self.artifacts),
            BucketTag::Other => None,
        }
    }

    /// Drop from `methods` every value also reported as `evaluation`.
    ///
    /// Idempotent.
    pub fn apply_leakage_guard(&mut self) {
        let evaluation: HashSet<&String> = self.evaluation.iter().collect();
        self.methods.retain(|m| !evaluation.contains(m));
    }

    /// Order-preserving, deduplicated union of several compacts per field,
    /// with the leakage guard reapplied
    pub fn merge<'a>(compacts: impl IntoIterator<Item = &'a CompactFacts>) -> CompactFacts {
        let compacts: Vec<&CompactFacts> = compacts.into_iter().collect();
        let mut merged = CompactFacts::default();

        for tag in BucketTag::COMPACTED {
            let union = dedup_preserving_order(
                compacts
                    .iter()
                    .filter_map(|c| c.field(tag))
                    .flatten()
                    .cloned(),
            );
            if let Some(slot) = merged.field_mut(tag) {
                *slot = union;
            }
        }

        merged.apply_leakage_guard();
        merged
    }

    pub fn is_empty(&self) -> bool {
        BucketTag::COMPACTED
            .iter()
            .all(|tag| self.field(*tag).map(<[String]>::is_empty).unwrap_or(true))
    }

    /// Item count per field, keyed by the serialized field name
    pub fn sizes(&self) -> BTreeMap<String, usize> {
        [
            ("problems", self.problems.len()),
            ("methods", self.methods.len()),
            ("data", self.data.len()),
            ("evaluation", self.evaluation.len()),
            ("artifacts", self.artifacts.len()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }
}

/// Facts extracted from one contribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionBundle {
    id: String,
    label: String,
    compact: CompactFacts,
    buckets: BTreeMap<BucketTag, Vec<BucketedStatement>>,
}

impl ContributionBundle {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn compact(&self) -> &CompactFacts {
        &self.compact
    }

    /// Raw classified statements, including the `Other` bucket
    pub fn buckets(&self) -> &BTreeMap<BucketTag, Vec<BucketedStatement>> {
        &self.buckets
    }

    pub fn bucket(&self, tag: BucketTag) -> &[BucketedStatement] {
        self.buckets.get(&tag).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A contribution left out of extraction, kept as a diagnostic note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedContribution {
    pub label: String,
    pub reason: String,
}

/// Facts extracted from a whole paper
///
/// `paper_core` is derived from `contributions` at construction and again
/// on deserialization; a serialized core is never trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PaperBundleRecord")]
pub struct PaperBundle {
    paper: PaperMeta,
    paper_core: CompactFacts,
    contributions: Vec<ContributionBundle>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    skipped: Vec<SkippedContribution>,
    extracted_at: DateTime<Utc>,
}

/// Deserialization shape of `PaperBundle`, without the derived core
#[derive(Deserialize)]
struct PaperBundleRecord {
    paper: PaperMeta,
    contributions: Vec<ContributionBundle>,
    #[serde(default)]
    skipped: Vec<SkippedContribution>,
    extracted_at: DateTime<Utc>,
}

impl From<PaperBundleRecord> for PaperBundle {
    fn from(record: PaperBundleRecord) -> Self {
        let mut bundle = PaperBundle::new(record.paper, record.contributions).with_skipped(record.skipped);
        bundle.extracted_at = record.extracted_at;
        bundle
    }
}

impl PaperBundle {
    pub fn new(paper: PaperMeta, contributions: Vec<ContributionBundle>) -> Self {
        let paper_core = merge_paper_core(&contributions);
        Self {
            paper,
            paper_core,
            contributions,
            skipped: Vec::new(),
            extracted_at: Utc::now(),
        }
    }

    pub fn with_skipped(mut self, skipped: Vec<SkippedContribution>) -> Self {
        self.skipped = skipped;
        self
    }

    pub fn paper(&self) -> &PaperMeta {
        &self.paper
    }

    pub fn paper_core(&self) -> &CompactFacts {
        &self.paper_core
    }

    pub fn contributions(&self) -> &[ContributionBundle] {
        &self.contributions
    }

    pub fn skipped(&self) -> &[SkippedContribution] {
        &self.skipped
    }

    pub fn extracted_at(&self) -> DateTime<Utc> {
        self.extracted_at
    }
}

/// Flatten one bucket's statements into deduplicated strings.
///
/// Literals contribute their label and resources their leaves. A node of a
/// research-problem class additionally contributes its own label ahead of
/// its leaves, so problem names survive even when the node has no literals.
async fn compact_bucket(
    source: &dyn StatementSource,
    items: &[BucketedStatement],
    rules: &RuleSet,
    params: &CrawlParams,
) -> SourceResult<Vec<String>> {
    let mut values: Vec<String> = Vec::new();

    for item in items {
        let object = &item.object;
        let label = object.label.trim();

        if object.is_literal() {
            if !is_noise_value(label) {
                values.push(label.to_string());
            }
            continue;
        }

        let Some(id) = object.id() else {
            continue;
        };

        // research-problem nodes are facts by their own label
        let is_problem_node = object
            .class_str()
            .map(|c| rules.is_research_problem_class(c))
            .unwrap_or(false);
        if is_problem_node && !is_noise_value(label) {
            values.push(label.to_string());
        }

        if object.is_resource() || is_problem_node {
            let leaves = LeafQuery::from(id)
                .depth(params.leaves_max_depth)
                .max_nodes(params.leaves_max_nodes)
                .page_size(params.page_size)
                .execute(source)
                .await?;
            values.extend(leaves);
        }
    }

    Ok(dedup_preserving_order(values))
}

/// Crawl, classify and compact a single contribution
pub async fn assemble_contribution(
    source: &dyn StatementSource,
    contribution_id: &str,
    contribution_label: &str,
    rules: &RuleSet,
    params: &CrawlParams,
) -> SourceResult<ContributionBundle> {
    let crawled = CrawlQuery::from(contribution_id)
        .depth(params.max_depth)
        .page_size(params.page_size)
        .execute(source)
        .await?;

    let mut buckets: BTreeMap<BucketTag, Vec<BucketedStatement>> = BTreeMap::new();
    for st in &crawled.statements {
        let tag = classify(st, rules, contribution_label);
        buckets.entry(tag).or_default().push(BucketedStatement::from(st));
    }

    let mut compact = CompactFacts::default();
    for tag in BucketTag::COMPACTED {
        let items = buckets.get(&tag).map(Vec::as_slice).unwrap_or(&[]);
        let values = compact_bucket(source, items, rules, params).await?;
        if let Some(slot) = compact.field_mut(tag) {
            *slot = values;
        }
    }
    compact.apply_leakage_guard();

    debug!(
        contribution = contribution_id,
        nodes = crawled.visited.len(),
        statements = crawled.statements.len(),
        problems = compact.problems.len(),
        methods = compact.methods.len(),
        data = compact.data.len(),
        evaluation = compact.evaluation.len(),
        artifacts = compact.artifacts.len(),
        "contribution assembled"
    );

    Ok(ContributionBundle {
        id: contribution_id.to_string(),
        label: contribution_label.to_string(),
        compact,
        buckets,
    })
}

/// Merge per-contribution compacts into the paper-level compact
pub fn merge_paper_core(contributions: &[ContributionBundle]) -> CompactFacts {
    CompactFacts::merge(contributions.iter().map(ContributionBundle::compact))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NodeRef, Predicate, Statement};
    use crate::source::MemorySource;

    fn facts(problems: &[&str], methods: &[&str], evaluation: &[&str]) -> CompactFacts {
        let owned = |xs: &[&str]| -> Vec<String> { xs.iter().map(|s| s.to_string()).collect() };
        CompactFacts {
            problems: owned(problems),
            methods: owned(methods),
            evaluation: owned(evaluation),
            ..Default::default()
        }
    }

    fn bundle(id: &str, compact: CompactFacts) -> ContributionBundle {
        ContributionBundle {
            id: id.to_string(),
            label: id.to_string(),
            compact,
            buckets: BTreeMap::new(),
        }
    }

    #[test]
    fn leakage_guard_removes_evaluation_values_from_methods() {
        let mut c = facts(&[], &["CNN", "User study", "GAN"], &["User study"]);
        c.apply_leakage_guard();
        assert_eq!(c.methods, vec!["CNN", "GAN"]);

        let once = c.clone();
        c.apply_leakage_guard();
        assert_eq!(c, once);
    }

    #[test]
    fn merge_is_order_preserving_union() {
        let a = bundle("A", facts(&["X", "Y"], &[], &[]));
        let b = bundle("B", facts(&["Y", "Z"], &[], &[]));
        let core = merge_paper_core(&[a, b]);
        assert_eq!(core.problems, vec!["X", "Y", "Z"]);
    }

    #[test]
    fn merge_reapplies_leakage_guard_across_contributions() {
        let a = bundle("A", facts(&[], &["Ablation", "CNN"], &[]));
        let b = bundle("B", facts(&[], &[], &["Ablation"]));
        let core = merge_paper_core(&[a, b]);
        assert_eq!(core.methods, vec!["CNN"]);
        assert_eq!(core.evaluation, vec!["Ablation"]);
    }

    #[test]
    fn merge_of_nothing_is_empty() {
        let core = merge_paper_core(&[]);
        assert!(core.is_empty());
    }

    #[test]
    fn sizes_use_serialized_names() {
        let c = facts(&["X"], &["M1", "M2"], &[]);
        let sizes = c.sizes();
        assert_eq!(sizes["problems"], 1);
        assert_eq!(sizes["methods"], 2);
        assert_eq!(sizes["artifacts"], 0);
    }

    #[test]
    fn paper_core_is_derived_on_construction() {
        let a = bundle("A", facts(&["X"], &[], &[]));
        let paper = PaperBundle::new(PaperMeta::default(), vec![a]);
        assert_eq!(paper.paper_core().problems, vec!["X"]);
    }

    #[tokio::test]
    async fn contribution_without_edges_has_empty_compact() {
        let source = MemorySource::new();
        let c = assemble_contribution(&source, "R1", "Contribution", &RuleSet::default(), &CrawlParams::default())
            .await
            .unwrap();
        assert!(c.compact().is_empty());
        assert!(c.buckets().is_empty());
    }

    #[tokio::test]
    async fn literal_noise_is_not_compacted() {
        let source = MemorySource::new().with_statements(vec![
            Statement::new("R1", Predicate::new("P1", "dataset"), NodeRef::literal("N/A")),
            Statement::new("R1", Predicate::new("P1", "dataset"), NodeRef::literal("ImageNet")),
            Statement::new("R1", Predicate::new("P1", "dataset"), NodeRef::literal("ImageNet")),
        ]);
        let c = assemble_contribution(&source, "R1", "Contribution", &RuleSet::default(), &CrawlParams::default())
            .await
            .unwrap();
        assert_eq!(c.compact().data, vec!["ImageNet"]);
        assert_eq!(c.bucket(BucketTag::Data).len(), 3);
    }

    #[tokio::test]
    async fn other_bucket_is_kept_but_not_compacted() {
        let source = MemorySource::new().with_statement(Statement::new(
            "R1",
            Predicate::new("P1", "has author"),
            NodeRef::literal("Jane Doe"),
        ));
        let c = assemble_contribution(&source, "R1", "Contribution", &RuleSet::default(), &CrawlParams::default())
            .await
            .unwrap();
        assert_eq!(c.bucket(BucketTag::Other).len(), 1);
        assert!(c.compact().is_empty());
    }

    #[tokio::test]
    async fn research_problem_node_contributes_its_label() {
        let source = MemorySource::new()
            .with_statement(Statement::new(
                "R1",
                Predicate::new("P32", "uses method"),
                NodeRef::classed("RP1", "Denoising", "ResearchProblem"),
            ))
            .with_statement(Statement::new(
                "RP1",
                Predicate::new("P2", "description"),
                NodeRef::literal("Removing noise from images"),
            ));
        let c = assemble_contribution(&source, "R1", "Contribution", &RuleSet::default(), &CrawlParams::default())
            .await
            .unwrap();
        assert_eq!(c.compact().problems, vec!["Denoising", "Removing noise from images"]);
        assert!(c.compact().methods.is_empty());
    }

    #[test]
    fn bundle_serializes_with_snake_case_fields() {
        let a = bundle("A", facts(&["X"], &[], &[]));
        let paper = PaperBundle::new(PaperMeta { id: "R1".into(), ..Default::default() }, vec![a]);
        let json = serde_json::to_value(&paper).unwrap();
        assert_eq!(json["paper"]["id"], "R1");
        assert_eq!(json["paper_core"]["problems"][0], "X");
        assert_eq!(json["contributions"][0]["compact"]["problems"][0], "X");
        assert!(json.get("skipped").is_none());
    }

    #[test]
    fn deserialized_bundle_recomputes_paper_core() {
        let a = bundle("A", facts(&["X"], &["CNN"], &[]));
        let paper = PaperBundle::new(PaperMeta { id: "R1".into(), ..Default::default() }, vec![a]);

        let mut json = serde_json::to_value(&paper).unwrap();
        json["paper_core"]["methods"] = serde_json::json!(["Hand edited"]);
        let restored: PaperBundle = serde_json::from_value(json).unwrap();

        assert_eq!(restored.paper_core().methods, vec!["CNN"]);
        assert_eq!(restored, paper);
    }

    #[test]
    fn concurrency_is_clamped() {
        assert_eq!(CrawlParams::default().with_concurrency(0).concurrency, 1);
        assert_eq!(
            CrawlParams::default().with_concurrency(usize::MAX).concurrency,
            Semaphore::MAX_PERMITS
        );
    }
}
