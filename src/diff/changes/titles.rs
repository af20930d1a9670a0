//! Identity diff.

use crate::diff::traits::{ChangeComputer, TitleChanges};
use crate::model::{NormalizedCatalog, ResourceId};

/// Computes which resources exist on one side only.
#[derive(Debug, Default, Clone, Copy)]
pub struct TitleChangeComputer;

impl TitleChangeComputer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ChangeComputer for TitleChangeComputer {
    type ChangeSet = TitleChanges;

    fn compute(&self, old: &NormalizedCatalog, new: &NormalizedCatalog) -> TitleChanges {
        TitleChanges {
            only_in_old: missing_from(old, new),
            only_in_new: missing_from(new, old),
        }
    }

    fn name(&self) -> &str {
        "TitleChangeComputer"
    }
}

/// References in `from` with no counterpart in `other`, sorted.
fn missing_from(from: &NormalizedCatalog, other: &NormalizedCatalog) -> Vec<String> {
    let mut titles: Vec<String> = from
        .ids()
        .into_iter()
        .filter(|id| !other.contains(id))
        .map(ResourceId::to_string)
        .collect();
    titles.sort();
    titles
}
