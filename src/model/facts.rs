//! Node fact sets used when requesting a compile.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Facts reported by a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactSet {
    pub name: String,
    #[serde(default)]
    pub values: Map<String, Value>,
}

impl FactSet {
    #[must_use]
    pub fn new(name: impl Into<String>, values: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Copy of this fact set without the `trusted` fact.
    ///
    /// The compiler derives trusted data from the certificate itself and
    /// rejects requests that try to supply it.
    #[must_use]
    pub fn without_trusted(&self) -> Self {
        let mut values = self.values.clone();
        values.remove("trusted");
        Self {
            name: self.name.clone(),
            values,
        }
    }
}
