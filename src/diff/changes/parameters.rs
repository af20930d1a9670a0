//! Content diff.

use crate::diff::text::unified_diff;
use crate::diff::traits::{ChangeComputer, ParameterChanges, ParameterValues};
use crate::model::{NormalizedCatalog, Resource};
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Compares parameters of resources present in both catalogs.
///
/// Per-parameter string diffs are produced unless turned off with
/// [`ParameterChangeComputer::content_diff`].
#[derive(Debug, Clone, Copy)]
pub struct ParameterChangeComputer {
    exclude_classes: bool,
    show_resource_diff: bool,
    content_diff: bool,
}

impl ParameterChangeComputer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            exclude_classes: false,
            show_resource_diff: false,
            content_diff: true,
        }
    }

    /// Skip `Class` resources even if the inputs still contain them
    #[must_use]
    pub const fn exclude_classes(mut self, exclude: bool) -> Self {
        self.exclude_classes = exclude;
        self
    }

    #[must_use]
    pub const fn show_resource_diff(mut self, show: bool) -> Self {
        self.show_resource_diff = show;
        self
    }

    #[must_use]
    pub const fn content_diff(mut self, enabled: bool) -> Self {
        self.content_diff = enabled;
        self
    }
}

impl Default for ParameterChangeComputer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeComputer for ParameterChangeComputer {
    type ChangeSet = ParameterChanges;

    fn compute(&self, old: &NormalizedCatalog, new: &NormalizedCatalog) -> ParameterChanges {
        let mut shared: Vec<(String, &Resource, &Resource)> = old
            .resources()
            .iter()
            .filter(|r| !(self.exclude_classes && r.id.is_class()))
            .filter_map(|r| new.get(&r.id).map(|n| (r.id.to_string(), r, n)))
            .collect();
        shared.sort_by(|a, b| a.0.cmp(&b.0));

        let mut changes = ParameterChanges::default();
        for (title, old_resource, new_resource) in shared {
            let changed = changed_parameters(old_resource, new_resource);
            if changed.is_empty() {
                continue;
            }

            let (old_values, old_names) = subset(old_resource, &changed);
            let (new_values, new_names) = subset(new_resource, &changed);

            if self.show_resource_diff {
                changes.differences_as_diff.insert(
                    title.clone(),
                    unified_diff(&render(old_resource), &render(new_resource)),
                );
            }

            if self.content_diff {
                let per_parameter = string_diffs(&old_values, &new_values);
                if !per_parameter.is_empty() {
                    changes
                        .content_differences
                        .insert(title.clone(), per_parameter);
                }
            }

            changes.differences_in_old.insert(title.clone(), old_values);
            changes.differences_in_new.insert(title.clone(), new_values);
            changes.params_in_old.insert(title.clone(), old_names);
            changes.params_in_new.insert(title, new_names);
        }
        changes
    }

    fn name(&self) -> &str {
        "ParameterChangeComputer"
    }
}

/// Names whose value differs, including names present on one side only.
fn changed_parameters(old: &Resource, new: &Resource) -> BTreeSet<String> {
    old.parameters
        .keys()
        .chain(new.parameters.keys())
        .filter(|name| old.parameters.get(*name) != new.parameters.get(*name))
        .cloned()
        .collect()
}

/// The changed parameters one resource actually has, with their names.
fn subset(resource: &Resource, changed: &BTreeSet<String>) -> (ParameterValues, Vec<String>) {
    let values: ParameterValues = changed
        .iter()
        .filter_map(|name| {
            resource
                .parameters
                .get(name)
                .map(|v| (name.clone(), v.clone()))
        })
        .collect();
    let names = values.keys().cloned().collect();
    (values, names)
}

/// Pretty-printed resource used as line-diff input.
fn render(resource: &Resource) -> String {
    let doc = json!({
        "type": resource.resource_type(),
        "title": resource.title(),
        "parameters": resource.parameters,
    });
    let mut text = serde_json::to_string_pretty(&doc).unwrap_or_default();
    text.push('\n');
    text
}

fn string_diffs(old: &ParameterValues, new: &ParameterValues) -> BTreeMap<String, String> {
    old.iter()
        .filter_map(|(name, old_value)| match (old_value, new.get(name)) {
            (Value::String(a), Some(Value::String(b))) => {
                Some((name.clone(), unified_diff(&with_newline(a), &with_newline(b))))
            }
            _ => None,
        })
        .collect()
}

fn with_newline(text: &str) -> String {
    if text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{text}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CatalogSide, ResourceId};

    fn resource(side: CatalogSide, t: &str, title: &str, params: Value) -> Resource {
        let parameters = params
            .as_object()
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        Resource::new(ResourceId::new(t, title), side).with_parameters(parameters)
    }

    fn catalog(side: CatalogSide, resources: Vec<Resource>) -> NormalizedCatalog {
        NormalizedCatalog::from_resources(side, None, resources).unwrap()
    }

    #[test]
    fn test_changed_subsets() {
        let old = catalog(
            CatalogSide::Old,
            vec![resource(
                CatalogSide::Old,
                "File",
                "/etc/motd",
                json!({"ensure": "file", "mode": "0644", "owner": "root"}),
            )],
        );
        let new = catalog(
            CatalogSide::New,
            vec![resource(
                CatalogSide::New,
                "File",
                "/etc/motd",
                json!({"ensure": "file", "mode": "0600", "group": "wheel"}),
            )],
        );

        let changes = ParameterChangeComputer::new().compute(&old, &new);
        assert_eq!(changes.changes(), 1);
        assert_eq!(
            changes.params_in_old["File[/etc/motd]"],
            vec!["mode", "owner"]
        );
        assert_eq!(
            changes.params_in_new["File[/etc/motd]"],
            vec!["group", "mode"]
        );
        assert_eq!(changes.differences_in_old["File[/etc/motd]"]["mode"], "0644");
        assert_eq!(changes.differences_in_new["File[/etc/motd]"]["group"], "wheel");
        assert!(!changes.differences_in_new["File[/etc/motd]"].contains_key("ensure"));
        assert!(changes.differences_as_diff.is_empty());

        let per_param = &changes.content_differences["File[/etc/motd]"];
        assert_eq!(per_param.len(), 1, "only mode is a string on both sides");
        assert!(per_param["mode"].contains("-0644\n"), "{}", per_param["mode"]);
        assert!(per_param["mode"].contains("+0600\n"), "{}", per_param["mode"]);
    }

    #[test]
    fn test_string_diffs_can_be_disabled() {
        let old = catalog(
            CatalogSide::Old,
            vec![resource(CatalogSide::Old, "File", "f", json!({"content": "a\n"}))],
        );
        let new = catalog(
            CatalogSide::New,
            vec![resource(CatalogSide::New, "File", "f", json!({"content": "b\n"}))],
        );

        let changes = ParameterChangeComputer::new()
            .content_diff(false)
            .compute(&old, &new);
        assert_eq!(changes.changes(), 1);
        assert!(changes.content_differences.is_empty());
    }

    #[test]
    fn test_explicit_null_differs_from_absent() {
        let old = catalog(
            CatalogSide::Old,
            vec![resource(CatalogSide::Old, "Exec", "x", json!({"unless": null}))],
        );
        let new = catalog(
            CatalogSide::New,
            vec![resource(CatalogSide::New, "Exec", "x", json!({}))],
        );

        let changes = ParameterChangeComputer::new().compute(&old, &new);
        assert_eq!(changes.params_in_old["Exec[x]"], vec!["unless"]);
        assert!(changes.params_in_new["Exec[x]"].is_empty());
        assert_eq!(changes.changes(), 1);
    }

    #[test]
    fn test_nested_values_compared_deeply() {
        let old = catalog(
            CatalogSide::Old,
            vec![resource(CatalogSide::Old, "Cron", "c", json!({"env": {"A": 1, "B": [1, 2]}}))],
        );
        let same = catalog(
            CatalogSide::New,
            vec![resource(CatalogSide::New, "Cron", "c", json!({"env": {"B": [1, 2], "A": 1}}))],
        );
        let reordered = catalog(
            CatalogSide::New,
            vec![resource(CatalogSide::New, "Cron", "c", json!({"env": {"A": 1, "B": [2, 1]}}))],
        );

        assert!(ParameterChangeComputer::new().compute(&old, &same).is_empty());
        assert_eq!(ParameterChangeComputer::new().compute(&old, &reordered).changes(), 1);
    }

    #[test]
    fn test_line_diffs_when_enabled() {
        let old = catalog(
            CatalogSide::Old,
            vec![resource(
                CatalogSide::Old,
                "File",
                "/etc/motd",
                json!({"content": "hello\nworld\n", "mode": "0644"}),
            )],
        );
        let new = catalog(
            CatalogSide::New,
            vec![resource(
                CatalogSide::New,
                "File",
                "/etc/motd",
                json!({"content": "hello\nthere\n", "mode": 420}),
            )],
        );

        let changes = ParameterChangeComputer::new()
            .show_resource_diff(true)
            .content_diff(true)
            .compute(&old, &new);

        let whole = &changes.differences_as_diff["File[/etc/motd]"];
        assert!(whole.starts_with("--- old\n+++ new\n"), "{whole}");

        let per_param = &changes.content_differences["File[/etc/motd]"];
        assert_eq!(per_param.len(), 1, "mode is not a string on both sides");
        assert!(per_param["content"].contains("-world\n"));
        assert!(per_param["content"].contains("+there\n"));
    }

    #[test]
    fn test_exclude_classes_reapplied() {
        let old = catalog(
            CatalogSide::Old,
            vec![resource(CatalogSide::Old, "Class", "foo", json!({"x": 1}))],
        );
        let new = catalog(
            CatalogSide::New,
            vec![resource(CatalogSide::New, "Class", "foo", json!({"x": 2}))],
        );

        assert_eq!(ParameterChangeComputer::new().compute(&old, &new).changes(), 1);
        assert!(ParameterChangeComputer::new()
            .exclude_classes(true)
            .compute(&old, &new)
            .is_empty());
    }

    #[test]
    fn test_report_keys_sorted() {
        let make = |side, value: i64| {
            catalog(
                side,
                vec![
                    resource(side, "Service", "sshd", json!({"v": value})),
                    resource(side, "File", "b", json!({"v": value})),
                    resource(side, "File", "a", json!({"v": value})),
                ],
            )
        };
        let changes =
            ParameterChangeComputer::new().compute(&make(CatalogSide::Old, 1), &make(CatalogSide::New, 2));
        let keys: Vec<&String> = changes.params_in_new.keys().collect();
        assert_eq!(keys, vec!["File[a]", "File[b]", "Service[sshd]"]);
    }
}
