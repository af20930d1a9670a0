//! The 0.24 catalog layout: a tree of buckets with resource leaves.

use super::catalog::{opaque_token, scalar_string};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level bucket of a 0.24 catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyCatalog {
    #[serde(default, deserialize_with = "opaque_token")]
    pub version: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub children: Vec<LegacyNode>,
}

impl LegacyCatalog {
    #[must_use]
    pub fn new(children: Vec<LegacyNode>) -> Self {
        Self {
            version: None,
            name: None,
            children,
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// A node in the legacy tree.
///
/// Nodes carrying `children` are containers (classes, nodes, defines) and are
/// not resources themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyNode {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(deserialize_with = "scalar_string")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
    #[serde(default, alias = "params", skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<LegacyNode>>,
}

impl LegacyNode {
    /// A resource leaf
    #[must_use]
    pub fn leaf(node_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            name: name.into(),
            file: None,
            line: None,
            parameters: Map::new(),
            children: None,
        }
    }

    /// A container bucket
    #[must_use]
    pub fn bucket(
        node_type: impl Into<String>,
        name: impl Into<String>,
        children: Vec<LegacyNode>,
    ) -> Self {
        Self {
            children: Some(children),
            ..Self::leaf(node_type, name)
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    #[must_use]
    pub const fn is_container(&self) -> bool {
        self.children.is_some()
    }
}
