//! Configuration validation for catalog-diff.

use super::types::{AppConfig, BehaviorConfig, FleetConfig, LoaderConfig, OutputConfig};
use crate::diff::DiffOptions;
use thiserror::Error;

// ============================================================================
// Configuration Error
// ============================================================================

/// A single invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(Validatable::validate(&self.diff));
        errors.extend(self.loader.validate());
        errors.extend(self.fleet.validate());
        errors.extend(self.output.validate());
        errors.extend(self.behavior.validate());
        errors
    }
}

impl Validatable for DiffOptions {
    fn validate(&self) -> Vec<ConfigError> {
        self.ignore_parameters
            .iter()
            .enumerate()
            .filter(|(_, name)| name.trim().is_empty())
            .map(|(pos, _)| {
                ConfigError::new(
                    format!("diff.ignore_parameters[{pos}]"),
                    "Parameter name must not be empty",
                )
            })
            .collect()
    }
}

impl Validatable for LoaderConfig {
    fn validate(&self) -> Vec<ConfigError> {
        // The schema enum admits no invalid values once deserialized
        Vec::new()
    }
}

impl Validatable for FleetConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.threads == 0 {
            errors.push(ConfigError::new(
                "fleet.threads",
                "Thread count must be at least 1",
            ));
        }
        if self.changed_depth == 0 {
            errors.push(ConfigError::new(
                "fleet.changed_depth",
                "Changed depth must be at least 1",
            ));
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(parent) = self.file.as_deref().and_then(std::path::Path::parent) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                errors.push(ConfigError::new(
                    "output.file",
                    format!("Parent directory does not exist: {}", parent.display()),
                ));
            }
        }

        errors
    }
}

impl Validatable for BehaviorConfig {
    fn validate(&self) -> Vec<ConfigError> {
        Vec::new()
    }
}
