//! Property-based tests for the diff engine.
//!
//! Checks the identity-diff and statistics invariants against randomly
//! generated catalogs.

use catalog_diff::diff::changes::TitleChangeComputer;
use catalog_diff::diff::traits::ChangeComputer;
use catalog_diff::{
    compare, CatalogSide, DiffOptions, DiffStatistics, LoadedCatalogs, NormalizedCatalog,
    Resource, ResourceId,
};
use proptest::prelude::*;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};

/// Build a catalog from (type, title) -> ensure pairs.
fn catalog(side: CatalogSide, entries: &BTreeMap<(String, String), String>) -> NormalizedCatalog {
    let resources = entries
        .iter()
        .map(|((resource_type, title), ensure)| {
            let mut parameters = BTreeMap::new();
            parameters.insert("ensure".to_string(), json!(ensure));
            Resource::new(ResourceId::new(resource_type.clone(), title.clone()), side)
                .with_parameters(parameters)
        })
        .collect();
    NormalizedCatalog::from_resources(side, None, resources).unwrap()
}

fn entries() -> impl Strategy<Value = BTreeMap<(String, String), String>> {
    prop::collection::btree_map(
        (
            prop::sample::select(vec!["File", "Package", "Service", "Class"]),
            "[a-z/]{1,8}",
        )
            .prop_map(|(t, title)| (t.to_string(), title)),
        prop::sample::select(vec!["present", "absent", "latest"]).prop_map(String::from),
        0..40,
    )
}

fn rendered(entries: &BTreeMap<(String, String), String>) -> BTreeSet<String> {
    entries
        .keys()
        .map(|(t, title)| format!("{t}[{title}]"))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn identity_diff_is_set_difference(old in entries(), new in entries()) {
        let old_catalog = catalog(CatalogSide::Old, &old);
        let new_catalog = catalog(CatalogSide::New, &new);
        let titles = TitleChangeComputer::new().compute(&old_catalog, &new_catalog);

        let old_refs = rendered(&old);
        let new_refs = rendered(&new);
        let expected_old: Vec<String> = old_refs.difference(&new_refs).cloned().collect();
        let expected_new: Vec<String> = new_refs.difference(&old_refs).cloned().collect();

        prop_assert_eq!(&titles.only_in_old, &expected_old);
        prop_assert_eq!(&titles.only_in_new, &expected_new);
        prop_assert!(titles
            .only_in_old
            .iter()
            .all(|r| !titles.only_in_new.contains(r)));
    }

    #[test]
    fn self_diff_is_empty(entries in entries()) {
        let loaded = LoadedCatalogs {
            old: catalog(CatalogSide::Old, &entries),
            new: catalog(CatalogSide::New, &entries),
        };
        let report = compare(loaded, &DiffOptions::default());

        prop_assert!(report.only_in_old.is_empty());
        prop_assert!(report.only_in_new.is_empty());
        prop_assert!(report.params_in_new.is_empty());
        prop_assert_eq!(report.node_differences, 0);
        prop_assert_eq!(report.node_percentage, 0.0);
    }

    #[test]
    fn changes_are_shared_resources(old in entries(), new in entries()) {
        let loaded = LoadedCatalogs {
            old: catalog(CatalogSide::Old, &old),
            new: catalog(CatalogSide::New, &new),
        };
        let report = compare(loaded, &DiffOptions::default());

        let shared: BTreeSet<String> = rendered(&old)
            .intersection(&rendered(&new))
            .cloned()
            .collect();
        for reference in report.params_in_new.keys() {
            prop_assert!(shared.contains(reference));
        }
        prop_assert_eq!(
            report.node_differences,
            report.only_in_old.len() + report.only_in_new.len() + report.params_in_new.len()
        );
    }

    #[test]
    fn percentages_stay_in_range(
        total_in_old in 0usize..500,
        total_in_new in 0usize..500,
        seed in any::<(u16, u16, u16)>(),
    ) {
        let subtractions = usize::from(seed.0) % (total_in_old + 1);
        let changes = usize::from(seed.1) % (total_in_old - subtractions + 1);
        let additions = usize::from(seed.2) % (total_in_new + 1);
        let stats = DiffStatistics::compute(
            total_in_old,
            total_in_new,
            additions,
            subtractions,
            changes,
        );

        for value in [
            stats.additions_percentage,
            stats.subtractions_percentage,
            stats.changes_percentage,
            stats.node_percentage,
        ] {
            prop_assert!((0.0..=100.0).contains(&value), "out of range: {}", value);
        }
        prop_assert_eq!(stats.node_differences, additions + subtractions + changes);
    }

    #[test]
    fn all_new_resources_score_full(total_in_old in 0usize..200, total_in_new in 1usize..200) {
        let stats = DiffStatistics::compute(total_in_old, total_in_new, total_in_new, 0, 0);
        prop_assert_eq!(stats.node_percentage, 100.0);
    }
}
