//! Paper metadata and the contributions it lists

use serde::{Deserialize, Serialize};

/// A research field the paper is filed under
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResearchField {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
}

/// Bibliographic metadata of a paper
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaperMeta {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub research_fields: Vec<ResearchField>,
}

/// Entry in a paper's contribution list
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContributionRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub label: String,
}

impl ContributionRef {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            label: label.into(),
        }
    }

    /// Non-empty id, if any
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

/// A paper as returned by the paper-fetch collaborator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Paper {
    #[serde(flatten)]
    pub meta: PaperMeta,
    #[serde(default)]
    pub contributions: Vec<ContributionRef>,
}

impl Paper {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            meta: PaperMeta {
                id: id.into(),
                title: Some(title.into()),
                ..Default::default()
            },
            contributions: Vec::new(),
        }
    }

    pub fn with_contribution(mut self, contribution: ContributionRef) -> Self {
        self.contributions.push(contribution);
        self
    }

    pub fn id(&self) -> &str {
        &self.meta.id
    }
}
