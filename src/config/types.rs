//! Configuration types for catalog-diff operations.

use crate::diff::fleet::{DEFAULT_CHANGED_DEPTH, DEFAULT_THREADS};
use crate::diff::DiffOptions;
use crate::model::SchemaGeneration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// CLI arguments are layered over file settings with [`AppConfig::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Comparison options
    pub diff: DiffOptions,
    /// How input catalogs are read
    pub loader: LoaderConfig,
    /// Multi-node runs
    pub fleet: FleetConfig,
    /// Output configuration (file, formatting)
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the comparison options.
    pub fn diff_options(mut self, options: DiffOptions) -> Self {
        self.config.diff = options;
        self
    }

    /// Set the schema generation of input catalogs.
    pub const fn schema(mut self, schema: SchemaGeneration) -> Self {
        self.config.loader.schema = schema;
        self
    }

    /// Set the fleet worker thread count.
    pub const fn threads(mut self, threads: usize) -> Self {
        self.config.fleet.threads = threads;
        self
    }

    /// Set how many nodes fleet summaries list.
    pub const fn changed_depth(mut self, depth: usize) -> Self {
        self.config.fleet.changed_depth = depth;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Pretty-print JSON output.
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.config.output.pretty = pretty;
        self
    }

    /// Enable fail-on-change mode.
    pub const fn fail_on_change(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_change = fail;
        self
    }

    /// Enable quiet mode.
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Sub-configuration Types
// ============================================================================

/// Catalog loading configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LoaderConfig {
    /// Layout of the input catalogs: `current` or `0.24`
    pub schema: SchemaGeneration,
}

/// Fleet diff configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FleetConfig {
    /// Worker threads used to diff nodes in parallel
    #[schemars(range(min = 1))]
    pub threads: usize,
    /// Number of nodes and failure groups listed in the summary
    #[schemars(range(min = 1))]
    pub changed_depth: usize,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            threads: DEFAULT_THREADS,
            changed_depth: DEFAULT_CHANGED_DEPTH,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Pretty-print JSON
    pub pretty: bool,
}

/// Behavior flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Exit with code 1 if any changes detected
    pub fail_on_change: bool,
    /// Suppress non-essential output
    pub quiet: bool,
}
