//! Configuration module for catalog-diff.
//!
//! This module provides:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Configuration File
//!
//! Place a `.catalog-diff.yaml` file in your project root or `~/.config/catalog-diff/`:
//!
//! ```yaml
//! diff:
//!   exclude_classes: true
//!   ignore_parameters: [checksum]
//! fleet:
//!   threads: 20
//! behavior:
//!   fail_on_change: true
//! ```

pub mod file;
mod types;
mod validation;

pub use types::{
    AppConfig, AppConfigBuilder, BehaviorConfig, FleetConfig, LoaderConfig, OutputConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_or_default, ConfigFileError, ConfigOverrides,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// Editors can use it to validate and complete `.catalog-diff.yaml` files.
pub fn generate_json_schema() -> serde_json::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}
