//! Retrieval documents and summary text built from paper bundles

use crate::extract::{CompactFacts, ContributionBundle, PaperBundle};
use crate::graph::PaperMeta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Items per section in the summary paragraph
const SUMMARY_ITEMS: usize = 5;

/// Granularity of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocLevel {
    Paper,
    Contribution,
}

/// Metadata attached to a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocMetadata {
    pub paper_id: String,
    pub paper_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contribution_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contribution_label: Option<String>,
    pub year: Option<i32>,
    pub doi: Option<String>,
    pub source: String,
    pub level: DocLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_sizes: Option<BTreeMap<String, usize>>,
}

/// A text document ready for indexing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub doc_id: String,
    pub text: String,
    pub metadata: DocMetadata,
}

fn section(title: &str, items: &[String]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    let body: Vec<String> = items.iter().map(|x| format!("- {}", x)).collect();
    Some(format!("{}:\n{}\n", title, body.join("\n")))
}

fn fact_sections(compact: &CompactFacts) -> impl Iterator<Item = String> + '_ {
    [
        ("Problems", &compact.problems),
        ("Methods", &compact.methods),
        ("Data", &compact.data),
        ("Evaluation", &compact.evaluation),
        ("Artifacts", &compact.artifacts),
    ]
    .into_iter()
    .filter_map(|(title, items)| section(title, items))
}

fn title_line(paper: &PaperMeta) -> String {
    format!("Paper title: {}", paper.title.as_deref().unwrap_or(""))
}

fn metadata(paper: &PaperMeta, level: DocLevel) -> DocMetadata {
    DocMetadata {
        paper_id: paper.id.clone(),
        paper_title: paper.title.clone(),
        contribution_id: None,
        contribution_label: None,
        year: paper.year,
        doi: paper.doi.clone(),
        source: "orkg".to_string(),
        level,
        bucket_sizes: None,
    }
}

/// Paper-level document from the merged paper core
pub fn paper_core_to_doc(bundle: &PaperBundle) -> Document {
    let paper = bundle.paper();
    let parts: Vec<String> = std::iter::once(title_line(paper))
        .chain(fact_sections(bundle.paper_core()))
        .collect();

    Document {
        doc_id: format!("orkg:{}:paper", paper.id),
        text: parts.join("\n"),
        metadata: metadata(paper, DocLevel::Paper),
    }
}

/// Document for a single contribution
pub fn contribution_to_doc(paper: &PaperMeta, contribution: &ContributionBundle) -> Document {
    let parts: Vec<String> = [title_line(paper), format!("Contribution: {}", contribution.label())]
        .into_iter()
        .chain(fact_sections(contribution.compact()))
        .collect();

    let mut meta = metadata(paper, DocLevel::Contribution);
    meta.contribution_id = Some(contribution.id().to_string());
    meta.contribution_label = Some(contribution.label().to_string());
    meta.bucket_sizes = Some(contribution.compact().sizes());

    Document {
        doc_id: format!("orkg:{}:contrib:{}", paper.id, contribution.id()),
        text: parts.join("\n"),
        metadata: meta,
    }
}

/// Paper document first, then one document per contribution
pub fn bundle_to_docs(bundle: &PaperBundle) -> Vec<Document> {
    std::iter::once(paper_core_to_doc(bundle))
        .chain(
            bundle
                .contributions()
                .iter()
                .map(|c| contribution_to_doc(bundle.paper(), c)),
        )
        .collect()
}

/// Short human-readable paragraph over the paper core
pub fn summary_paragraph(bundle: &PaperBundle) -> String {
    let core = bundle.paper_core();
    let head = |items: &[String]| {
        items
            .iter()
            .take(SUMMARY_ITEMS)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut parts: Vec<String> = Vec::new();
    if let Some(title) = bundle.paper().title.as_deref().filter(|t| !t.is_empty()) {
        parts.push(format!("Paper titled '{}'", title));
    }
    for (lead, items) in [
        ("addresses", &core.problems),
        ("proposes methods", &core.methods),
        ("uses/introduces data", &core.data),
        ("evaluated by", &core.evaluation),
        ("artifacts", &core.artifacts),
    ] {
        if !items.is_empty() {
            parts.push(format!("{}: {}", lead, head(items.as_slice())));
        }
    }

    if parts.is_empty() {
        return "No compact facts extracted from paper.".to_string();
    }
    format!("{}.", parts.join(". "))
}
