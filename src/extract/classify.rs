//! Statement classification into semantic buckets

use super::normalize::looks_like_url;
use super::rules::{CueCategory, RuleSet};
use crate::graph::Statement;
use serde::{Deserialize, Serialize};

/// Semantic bucket assigned to a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketTag {
    Problem,
    Method,
    Data,
    Evaluation,
    Artifact,
    Other,
}

impl BucketTag {
    /// Buckets that are flattened into compact facts (`Other` is not)
    pub const COMPACTED: [BucketTag; 5] = [
        BucketTag::Problem,
        BucketTag::Method,
        BucketTag::Data,
        BucketTag::Evaluation,
        BucketTag::Artifact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BucketTag::Problem => "problem",
            BucketTag::Method => "method",
            BucketTag::Data => "data",
            BucketTag::Evaluation => "evaluation",
            BucketTag::Artifact => "artifact",
            BucketTag::Other => "other",
        }
    }
}

impl std::fmt::Display for BucketTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assign exactly one bucket to a statement.
///
/// First match wins:
/// 1. object class is a research-problem class → `Problem`
/// 2. literal object that looks like a URL → `Artifact`
/// 3. evidence-tab contribution: tool → `Artifact`, data → `Data`,
///    artifact predicate or URL → `Artifact`, otherwise `Evaluation`
/// 4. problem, tool, data, evaluation, artifact/URL, method cues in that
///    order, otherwise `Other`
///
/// Artifact cues are tested against the predicate label only; every other
/// category is tested against both the predicate and the object label.
pub fn classify(statement: &Statement, rules: &RuleSet, contribution_label: &str) -> BucketTag {
    let predicate = statement.predicate.display_label().to_lowercase();
    let object = statement.object.label.to_lowercase();
    let both = [predicate.as_str(), object.as_str()];

    if let Some(class) = statement.object.class_str() {
        if rules.is_research_problem_class(class) {
            return BucketTag::Problem;
        }
    }

    if statement.object.is_literal() && looks_like_url(&object) {
        return BucketTag::Artifact;
    }

    if rules.is_evidence_label(contribution_label) {
        if rules.matches_any(CueCategory::Tool, &both) {
            return BucketTag::Artifact;
        }
        if rules.matches_any(CueCategory::Data, &both) {
            return BucketTag::Data;
        }
        if rules.matches(CueCategory::Artifact, &predicate) || looks_like_url(&object) {
            return BucketTag::Artifact;
        }
        return BucketTag::Evaluation;
    }

    if rules.matches_any(CueCategory::Problem, &both) {
        return BucketTag::Problem;
    }
    if rules.matches_any(CueCategory::Tool, &both) {
        return BucketTag::Artifact;
    }
    if rules.matches_any(CueCategory::Data, &both) {
        return BucketTag::Data;
    }
    if rules.matches_any(CueCategory::Evaluation, &both) {
        return BucketTag::Evaluation;
    }
    if rules.matches(CueCategory::Artifact, &predicate) || looks_like_url(&object) {
        return BucketTag::Artifact;
    }
    if rules.matches_any(CueCategory::Method, &both) {
        return BucketTag::Method;
    }

    BucketTag::Other
}
