//! Statements: directed subject → object edges labelled by a predicate

use super::node::NodeRef;
use serde::{Deserialize, Serialize};

/// Predicate of a statement
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Predicate {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl Predicate {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: Some(label.into()),
        }
    }

    /// Label used for cue matching, falling back to the id
    pub fn display_label(&self) -> &str {
        match self.label.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => &self.id,
        }
    }
}

/// A subject–predicate–object triple
///
/// Statements are not required to form an acyclic graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub subject_id: String,
    pub predicate: Predicate,
    pub object: NodeRef,
}

impl Statement {
    pub fn new(subject_id: impl Into<String>, predicate: Predicate, object: NodeRef) -> Self {
        Self {
            subject_id: subject_id.into(),
            predicate,
            object,
        }
    }
}

/// Flattened form of a statement kept in a contribution's bucket map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketedStatement {
    pub subject_id: String,
    pub predicate_id: String,
    pub predicate_label: String,
    pub object: NodeRef,
}

impl From<&Statement> for BucketedStatement {
    fn from(st: &Statement) -> Self {
        Self {
            subject_id: st.subject_id.clone(),
            predicate_id: st.predicate.id.clone(),
            predicate_label: st.predicate.display_label().to_string(),
            object: st.object.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicate_label_falls_back_to_id() {
        let p = Predicate {
            id: "P32".into(),
            label: None,
        };
        assert_eq!(p.display_label(), "P32");

        let p = Predicate {
            id: "P32".into(),
            label: Some(String::new()),
        };
        assert_eq!(p.display_label(), "P32");

        let p = Predicate::new("P32", "research problem");
        assert_eq!(p.display_label(), "research problem");
    }

    #[test]
    fn bucketed_statement_carries_resolved_label() {
        let st = Statement::new(
            "R1",
            Predicate {
                id: "P5".into(),
                label: None,
            },
            NodeRef::literal("x"),
        );
        let flat = BucketedStatement::from(&st);
        assert_eq!(flat.predicate_label, "P5");
        assert_eq!(flat.subject_id, "R1");
    }
}
