//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use crate::model::SchemaGeneration;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".catalog-diff.yaml",
    ".catalog-diff.yml",
    "catalog-diff.yaml",
    "catalog-diff.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/catalog-diff/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path.filter(|path| path.exists()) {
        return Some(path.to_path_buf());
    }

    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd);
    }
    if let Some(git_root) = find_git_root() {
        candidates.push(git_root);
    }
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("catalog-diff"));
    }
    if let Some(home) = dirs::home_dir() {
        candidates.push(home);
    }

    candidates.iter().find_map(|dir| find_config_in_dir(dir))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                (config, Some(path))
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

/// Values given on the command line, layered over the file config.
///
/// `None` means "not given", so a flag set to the default value still
/// overrides a file that says otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub schema: Option<SchemaGeneration>,
    pub exclude_classes: Option<bool>,
    pub show_resource_diff: Option<bool>,
    pub content_diff: Option<bool>,
    /// Added to the file's list
    pub ignore_parameters: Vec<String>,
    pub threads: Option<usize>,
    pub changed_depth: Option<usize>,
    pub output_file: Option<PathBuf>,
    pub pretty: Option<bool>,
    pub fail_on_change: Option<bool>,
    pub quiet: Option<bool>,
}

impl AppConfig {
    /// Apply command-line overrides; every value that was given wins.
    pub fn merge(&mut self, overrides: &ConfigOverrides) {
        // Diff options
        if let Some(exclude) = overrides.exclude_classes {
            self.diff.exclude_classes = exclude;
        }
        if let Some(show) = overrides.show_resource_diff {
            self.diff.show_resource_diff = show;
        }
        if let Some(content) = overrides.content_diff {
            self.diff.content_diff = content;
        }
        for name in &overrides.ignore_parameters {
            if !self.diff.ignore_parameters.contains(name) {
                self.diff.ignore_parameters.push(name.clone());
            }
        }

        // Loader config
        if let Some(schema) = overrides.schema {
            self.loader.schema = schema;
        }

        // Fleet config
        if let Some(threads) = overrides.threads {
            self.fleet.threads = threads;
        }
        if let Some(depth) = overrides.changed_depth {
            self.fleet.changed_depth = depth;
        }

        // Output config
        if overrides.output_file.is_some() {
            self.output.file.clone_from(&overrides.output_file);
        }
        if let Some(pretty) = overrides.pretty {
            self.output.pretty = pretty;
        }

        // Behavior config
        if let Some(fail) = overrides.fail_on_change {
            self.behavior.fail_on_change = fail;
        }
        if let Some(quiet) = overrides.quiet {
            self.behavior.quiet = quiet;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &ConfigOverrides,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# Catalog Diff Configuration
# Place this file at .catalog-diff.yaml in your project root or ~/.config/catalog-diff/

{}
",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# Catalog Diff Configuration File
# ===============================
#
# Place it at:
#   - .catalog-diff.yaml in your project root
#   - ~/.config/catalog-diff/catalog-diff.yaml for global config
#
# CLI arguments always override file settings.

# Comparison options
diff:
  # Drop Class resources from both catalogs before comparing
  exclude_classes: false
  # Include a unified diff of every changed resource
  show_resource_diff: false
  # Include a unified diff of every changed string parameter
  content_diff: true
  # Parameters removed from every resource before comparing
  ignore_parameters: []

# Catalog loading
loader:
  # Layout of input catalogs: current or 0.24
  schema: current

# Multi-node runs
fleet:
  # Nodes diffed in parallel
  threads: 10
  # Nodes and failure groups listed in the summary
  changed_depth: 10

# Output configuration
output:
  # Output file path (omit for stdout)
  # file: report.json
  pretty: false

# Behavior flags
behavior:
  # Exit with code 1 if any changes detected
  fail_on_change: false
  # Suppress non-essential output
  quiet: false
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================
