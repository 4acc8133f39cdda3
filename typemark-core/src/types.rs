use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

pub type SectionId = Uuid;

/// The schema version stamped on every annotated output.
/// Bump this when the output shape changes.
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Token emitted for content nodes whose kind cannot be classified.
/// Keeps the classifier total: malformed input degrades, it never fails.
pub const UNKNOWN_TOKEN: &str = "unknown";

// ===== TOKEN ALPHABET =====

/// A content-node type name: the alphabet symbol that patterns match against.
///
/// Deliberately an open string value, not a closed enum: upstream parsers
/// introduce new node kinds over time, and none of them may require
/// recompiling the matcher.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Token {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

// ===== CONTENT MODEL =====

/// The smallest classified unit inside a section (heading, paragraph,
/// image, list, …). Only `kind` matters to this subsystem; the payload
/// travels through annotation untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentNode {
    pub kind: String,
    /// Everything else the upstream parser attached to the node.
    #[serde(flatten, default)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl ContentNode {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            payload: serde_json::Map::new(),
        }
    }
}

/// A contiguous structural unit of a document: an ordered run of content
/// nodes plus the derived `types` labels this subsystem appends.
///
/// The node list is never mutated here; annotation only appends to `types`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    #[serde(default = "Uuid::new_v4")]
    pub id: SectionId,
    #[serde(default)]
    pub nodes: Vec<ContentNode>,
    /// Ordered, duplicate-free labels. Insertion order is the output order.
    #[serde(default)]
    pub types: Vec<String>,
}

impl Section {
    pub fn new(nodes: Vec<ContentNode>) -> Self {
        Self {
            id: Uuid::new_v4(),
            nodes,
            types: Vec::new(),
        }
    }

    /// Build a section from bare node kinds. Convenient for callers that
    /// only care about shape, and for tests.
    pub fn from_kinds(kinds: &[&str]) -> Self {
        Self::new(kinds.iter().map(|kind| ContentNode::new(kind)).collect())
    }

    /// Append a label unless the section already carries it. Keeps `types`
    /// set-unique while preserving insertion order.
    pub fn push_type(&mut self, label: &str) {
        if !self.types.iter().any(|existing| existing == label) {
            self.types.push(label.to_string());
        }
    }

    /// Space-joined label list, ready for a CSS class attribute.
    pub fn type_attr(&self) -> String {
        self.types.join(" ")
    }
}

// ===== ANNOTATED OUTPUT =====

/// The serialization-ready output format. Carries a schema version
/// so consumers can detect and handle shape changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatedDocument {
    pub schema_version: String,
    pub sections: Vec<Section>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<AnnotationProfile>,
}

/// Quantitative summary of an annotation run — deterministic, mechanically
/// computed from the annotated sections. Travels with the output so
/// consumers can sanity-check label coverage without re-deriving it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationProfile {
    pub created_at: DateTime<Utc>,
    pub total_sections: usize,
    pub total_nodes: usize,
    pub label_counts: HashMap<String, usize>,
    pub token_counts: HashMap<String, usize>,
}
