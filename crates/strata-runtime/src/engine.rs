//! Discriminator-driven validation of layered configuration
//!
//! The engine merges the layered sources, reads the discriminator from the
//! merged document, picks the schema variant from the registry and validates
//! the merged document against it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strata_core::scenario::DRIVER_NAME_PATH;
use strata_core::{lookup, ConfigMapping, SchemaRegistry, SchemaSpec};
use tracing::debug;

use crate::errors::ValidationReport;
use crate::merge::ConfigMerger;
use crate::normalize::apply_defaults;
use crate::validate::SchemaValidator;

/// Engine settings, loadable from a host's own configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Keys leading to the discriminator in the merged document.
    pub discriminator_path: Vec<String>,
    /// Fill declared defaults into a document that validated cleanly.
    pub apply_defaults: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            discriminator_path: DRIVER_NAME_PATH.iter().map(|s| s.to_string()).collect(),
            apply_defaults: true,
        }
    }
}

/// Merges layered sources and validates the result against the schema
/// variant selected by the discriminator.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    registry: SchemaRegistry,
    options: EngineOptions,
}

impl ValidationEngine {
    pub fn new(registry: SchemaRegistry) -> Self {
        Self::with_options(registry, EngineOptions::default())
    }

    pub fn with_options(registry: SchemaRegistry, options: EngineOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Validate layered `sources` using the configured discriminator path.
    pub fn validate(&self, sources: &[ConfigMapping]) -> Result<ConfigMapping, ValidationReport> {
        self.validate_effective(sources, self.options.discriminator_path.as_slice())
    }

    /// Merge `sources`, select the schema by the value at
    /// `discriminator_path` and validate.
    ///
    /// Returns the merged document when it is valid, otherwise the full
    /// report. A missing or non-string discriminator selects the registry's
    /// default schema.
    pub fn validate_effective<S: AsRef<str>>(
        &self,
        sources: &[ConfigMapping],
        discriminator_path: &[S],
    ) -> Result<ConfigMapping, ValidationReport> {
        let merged = ConfigMerger::merge(sources);
        debug!(
            "Merged {} sources into {} top-level keys",
            sources.len(),
            merged.len()
        );
        self.check(merged, discriminator_path)
    }

    /// Validate one already-merged document.
    pub fn validate_mapping(&self, config: &ConfigMapping) -> Result<ConfigMapping, ValidationReport> {
        self.check(config.clone(), self.options.discriminator_path.as_slice())
    }

    /// Schema variant that applies to `config`.
    pub fn select_schema<S: AsRef<str>>(
        &self,
        config: &ConfigMapping,
        discriminator_path: &[S],
    ) -> Arc<SchemaSpec> {
        self.registry
            .resolve_optional(discriminator(config, discriminator_path))
    }

    fn check<S: AsRef<str>>(
        &self,
        mut merged: ConfigMapping,
        discriminator_path: &[S],
    ) -> Result<ConfigMapping, ValidationReport> {
        let selector = discriminator(&merged, discriminator_path);
        let spec = self.registry.resolve_optional(selector);
        debug!(
            "Discriminator {:?} selected schema '{}'",
            selector,
            spec.name()
        );

        let report = SchemaValidator::validate(&merged, &spec);
        if !report.is_empty() {
            debug!(
                "Schema '{}' reported {} validation errors",
                spec.name(),
                report.len()
            );
            return Err(report);
        }

        if self.options.apply_defaults {
            apply_defaults(&mut merged, &spec);
        }
        Ok(merged)
    }
}

/// String value at `path`, if there is one.
fn discriminator<'a, S: AsRef<str>>(config: &'a ConfigMapping, path: &[S]) -> Option<&'a str> {
    lookup(config, path).and_then(Value::as_str)
}
