//! Node references as they appear in the object position of a statement

use serde::{Deserialize, Serialize};

/// Class tag carried by a graph node
///
/// Serializes as a plain string: `"resource"`, `"literal"`, or any
/// domain-specific tag such as `"ResearchProblem"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeClass {
    /// A node with an id and potentially further outgoing edges
    Resource,
    /// A terminal scalar value
    Literal,
    /// Domain-specific class tag
    Other(String),
}

impl NodeClass {
    pub fn as_str(&self) -> &str {
        match self {
            NodeClass::Resource => "resource",
            NodeClass::Literal => "literal",
            NodeClass::Other(tag) => tag,
        }
    }
}

impl From<String> for NodeClass {
    fn from(s: String) -> Self {
        match s.as_str() {
            "resource" => NodeClass::Resource,
            "literal" => NodeClass::Literal,
            _ => NodeClass::Other(s),
        }
    }
}

impl From<&str> for NodeClass {
    fn from(s: &str) -> Self {
        NodeClass::from(s.to_string())
    }
}

impl From<NodeClass> for String {
    fn from(class: NodeClass) -> Self {
        match class {
            NodeClass::Other(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for NodeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a node reached through a statement
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeRef {
    /// Node id; absent or empty for pure literals
    #[serde(default)]
    pub id: Option<String>,
    /// Display label (the literal value for literal nodes)
    #[serde(default)]
    pub label: String,
    /// Class tag, if the graph reported one
    #[serde(default)]
    pub class: Option<NodeClass>,
}

impl NodeRef {
    /// A resource node with the given id and label
    pub fn resource(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            label: label.into(),
            class: Some(NodeClass::Resource),
        }
    }

    /// A literal value
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            id: None,
            label: value.into(),
            class: Some(NodeClass::Literal),
        }
    }

    /// A node carrying a domain-specific class tag
    pub fn classed(
        id: impl Into<String>,
        label: impl Into<String>,
        class: impl Into<NodeClass>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            label: label.into(),
            class: Some(class.into()),
        }
    }

    /// Non-empty id, if any
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn class_str(&self) -> Option<&str> {
        self.class.as_ref().map(NodeClass::as_str)
    }

    pub fn is_resource(&self) -> bool {
        matches!(self.class, Some(NodeClass::Resource))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.class, Some(NodeClass::Literal))
    }
}
