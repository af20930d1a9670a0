//! Comparison options.

use crate::error::{CatalogDiffError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Options controlling one catalog comparison.
///
/// Construct through [`DiffOptions::builder`], which validates; the
/// `Default` value is also valid. Per-parameter string diffs are on by
/// default; whole-resource diffs are opt-in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DiffOptions {
    /// Drop `Class` resources from both sides before comparing
    pub exclude_classes: bool,
    /// Include a unified diff of each changed resource
    pub show_resource_diff: bool,
    /// Include a unified diff of each changed string parameter
    pub content_diff: bool,
    /// Parameters removed from every resource before comparing
    pub ignore_parameters: Vec<String>,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            exclude_classes: false,
            show_resource_diff: false,
            content_diff: true,
            ignore_parameters: Vec::new(),
        }
    }
}

impl DiffOptions {
    #[must_use]
    pub fn builder() -> DiffOptionsBuilder {
        DiffOptionsBuilder::default()
    }

    /// Check the option values.
    pub fn validate(&self) -> Result<()> {
        if let Some(pos) = self.ignore_parameters.iter().position(|p| p.trim().is_empty()) {
            return Err(CatalogDiffError::config(format!(
                "ignore_parameters[{pos}] is empty"
            )));
        }
        Ok(())
    }
}

/// Builder for [`DiffOptions`]
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct DiffOptionsBuilder {
    options: DiffOptions,
}

impl DiffOptionsBuilder {
    pub const fn exclude_classes(mut self, exclude: bool) -> Self {
        self.options.exclude_classes = exclude;
        self
    }

    pub const fn show_resource_diff(mut self, show: bool) -> Self {
        self.options.show_resource_diff = show;
        self
    }

    pub const fn content_diff(mut self, enabled: bool) -> Self {
        self.options.content_diff = enabled;
        self
    }

    pub fn ignore_parameter(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.options.ignore_parameters.contains(&name) {
            self.options.ignore_parameters.push(name);
        }
        self
    }

    pub fn ignore_parameters<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .fold(self, |builder, name| builder.ignore_parameter(name))
    }

    /// Validate and produce the options
    pub fn build(self) -> Result<DiffOptions> {
        self.options.validate()?;
        Ok(self.options)
    }
}
