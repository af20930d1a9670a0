//! Trait definitions for diff computation strategies.
//!
//! Each comparison stage is a [`ChangeComputer`] producing its own immutable
//! change set, which the engine folds into the final report.

use crate::model::NormalizedCatalog;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::BTreeMap;

/// Trait for computing one category of change between two catalogs.
pub trait ChangeComputer: Send + Sync {
    /// The type of changes this computer produces.
    type ChangeSet;

    /// Compute changes between the old and new catalog.
    fn compute(&self, old: &NormalizedCatalog, new: &NormalizedCatalog) -> Self::ChangeSet;

    /// Get the name of this change computer for logging/debugging.
    fn name(&self) -> &str;
}

/// Identity diff: resources present on one side only.
///
/// Both lists hold rendered `Type[title]` references in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleChanges {
    pub only_in_old: Vec<String>,
    pub only_in_new: Vec<String>,
}

impl TitleChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.only_in_old.is_empty() && self.only_in_new.is_empty()
    }

    /// Number of resources only in the new catalog
    #[must_use]
    pub fn additions(&self) -> usize {
        self.only_in_new.len()
    }

    /// Number of resources only in the old catalog
    #[must_use]
    pub fn subtractions(&self) -> usize {
        self.only_in_old.len()
    }
}

/// Changed parameters of one resource, by parameter name
pub type ParameterValues = BTreeMap<String, Value>;

/// Content diff: resources present on both sides whose parameters differ.
///
/// Every map is keyed by the rendered resource reference and ordered by it.
/// `params_in_new` has one entry per changed resource and is the change
/// count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterChanges {
    /// Old values of the differing parameters
    pub differences_in_old: IndexMap<String, ParameterValues>,
    /// New values of the differing parameters
    pub differences_in_new: IndexMap<String, ParameterValues>,
    /// Unified diff of the whole resource
    pub differences_as_diff: IndexMap<String, String>,
    /// Names of the differing parameters present in the old resource
    pub params_in_old: IndexMap<String, Vec<String>>,
    /// Names of the differing parameters present in the new resource
    pub params_in_new: IndexMap<String, Vec<String>>,
    /// Unified diff per differing string parameter
    pub content_differences: IndexMap<String, BTreeMap<String, String>>,
}

impl ParameterChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params_in_new.is_empty()
    }

    /// Number of changed resources
    #[must_use]
    pub fn changes(&self) -> usize {
        self.params_in_new.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_changes_empty() {
        let set = TitleChanges::default();
        assert!(set.is_empty());
        assert_eq!(set.additions(), 0);
        assert_eq!(set.subtractions(), 0);
    }

    #[test]
    fn test_parameter_changes_count() {
        let mut set = ParameterChanges::default();
        assert!(set.is_empty());
        set.params_in_new.insert("File[a]".into(), vec![]);
        assert_eq!(set.changes(), 1);
    }
}
