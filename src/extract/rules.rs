//! Rule set: regex cue vocabularies and class hints driving classification
//!
//! Cues are data. A `RuleSpec` maps each `CueCategory` to a list of regex
//! alternation terms and can be loaded from YAML or JSON; `RuleSet`
//! compiles it into case-insensitive whole-word patterns of the form
//! `\b(term|term|...)\b`. Terms are regex fragments, not escaped literals.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use thiserror::Error;

/// Semantic cue categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueCategory {
    Problem,
    Data,
    Evaluation,
    Method,
    Artifact,
    Tool,
}

impl CueCategory {
    pub const ALL: [CueCategory; 6] = [
        CueCategory::Problem,
        CueCategory::Data,
        CueCategory::Evaluation,
        CueCategory::Method,
        CueCategory::Artifact,
        CueCategory::Tool,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CueCategory::Problem => "problem",
            CueCategory::Data => "data",
            CueCategory::Evaluation => "evaluation",
            CueCategory::Method => "method",
            CueCategory::Artifact => "artifact",
            CueCategory::Tool => "tool",
        }
    }
}

impl std::fmt::Display for CueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while building a rule set
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("Invalid pattern for {name}: {source}")]
    Pattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn terms(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Serializable description of a rule set
///
/// Top-level fields missing from a rules file keep their built-in values.
/// A category missing from `cues` never matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSpec {
    /// Node classes whose objects are research problems
    pub research_problem_classes: Vec<String>,
    /// Terms marking a contribution label as an evidence tab
    pub evidence_label: Vec<String>,
    /// Cue terms per category
    pub cues: BTreeMap<CueCategory, Vec<String>>,
}

impl Default for RuleSpec {
    fn default() -> Self {
        let mut cues = BTreeMap::new();
        cues.insert(
            CueCategory::Problem,
            terms(&[
                "problem",
                "goal",
                "aim",
                "challenge",
                "addresses",
                "research question",
                "abstract",
                "description",
                "summary",
            ]),
        );
        cues.insert(
            CueCategory::Data,
            terms(&["dataset", "data", "corpus", "benchmark"]),
        );
        cues.insert(
            CueCategory::Evaluation,
            terms(&[
                "evaluat",
                "validat",
                "metric",
                "measure",
                "case study",
                "experiment",
                "user study",
                "property",
                "sub-property",
                "guideline",
                "threat to validity",
            ]),
        );
        cues.insert(
            CueCategory::Method,
            terms(&[
                "method",
                "approach",
                "model",
                "algorithm",
                "architecture",
                "pipeline",
                "framework",
                "embedding",
                "reference architecture",
                "research object",
            ]),
        );
        cues.insert(
            CueCategory::Artifact,
            terms(&[
                "url",
                "code",
                "repo",
                "implementation",
                "demo",
                "video",
                "artifact",
                "package",
                "replication",
            ]),
        );
        cues.insert(
            CueCategory::Tool,
            terms(&[
                "tool support",
                "tool",
                "replication package",
                "replication",
                "available",
                "used",
            ]),
        );

        Self {
            research_problem_classes: terms(&["ResearchProblem"]),
            evidence_label: terms(&["evidence", "evaluation", "validation"]),
            cues,
        }
    }
}

fn compile_terms(name: &str, terms: &[String]) -> Result<Option<Regex>, RulesError> {
    if terms.is_empty() {
        return Ok(None);
    }
    let pattern = format!(r"(?i)\b({})\b", terms.join("|"));
    Regex::new(&pattern)
        .map(Some)
        .map_err(|source| RulesError::Pattern {
            name: name.to_string(),
            source,
        })
}

/// Compiled, immutable rule set
#[derive(Debug, Clone)]
pub struct RuleSet {
    spec: RuleSpec,
    research_problem_classes: HashSet<String>,
    evidence_label: Option<Regex>,
    cues: HashMap<CueCategory, Regex>,
}

impl RuleSet {
    /// Compile a `RuleSpec`
    pub fn from_spec(spec: RuleSpec) -> Result<Self, RulesError> {
        let evidence_label = compile_terms("evidence_label", &spec.evidence_label)?;

        let mut cues = HashMap::new();
        for (category, category_terms) in &spec.cues {
            if let Some(regex) = compile_terms(category.as_str(), category_terms)? {
                cues.insert(*category, regex);
            }
        }

        Ok(Self {
            research_problem_classes: spec.research_problem_classes.iter().cloned().collect(),
            evidence_label,
            cues,
            spec,
        })
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, RulesError> {
        Self::from_spec(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, RulesError> {
        Self::from_spec(serde_json::from_str(json)?)
    }

    /// Load a rules file; `.json` files are parsed as JSON, anything else as YAML
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RulesError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_yaml_str(&text),
        }
    }

    /// The `RuleSpec` this set was compiled from
    pub fn spec(&self) -> &RuleSpec {
        &self.spec
    }

    pub fn to_yaml(&self) -> Result<String, RulesError> {
        Ok(serde_yaml::to_string(&self.spec)?)
    }

    pub fn is_research_problem_class(&self, class: &str) -> bool {
        self.research_problem_classes.contains(class)
    }

    /// Whether a contribution label marks an evidence/evaluation tab
    pub fn is_evidence_label(&self, label: &str) -> bool {
        self.evidence_label
            .as_ref()
            .map(|re| re.is_match(label))
            .unwrap_or(false)
    }

    /// Whether `text` contains a whole-word cue of `category`
    pub fn matches(&self, category: CueCategory, text: &str) -> bool {
        self.cues
            .get(&category)
            .map(|re| re.is_match(text))
            .unwrap_or(false)
    }

    /// Whether any of `texts` contains a cue of `category`
    pub fn matches_any(&self, category: CueCategory, texts: &[&str]) -> bool {
        texts.iter().any(|t| self.matches(category, t))
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::from_spec(RuleSpec::default()).expect("built-in cue patterns compile")
    }
}
