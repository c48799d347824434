//! Schema validation of configuration mappings.
//!
//! The validator walks the resolved fields of a [`SchemaSpec`] in declared
//! order and checks the matching key of the document. It never stops at the
//! first problem: every violation in the tree ends up in the returned
//! [`ValidationReport`]. Keys the schema does not declare are ignored.

use serde_json::Value;
use strata_core::{type_name, ConfigMapping, FieldSpec, FieldType, SchemaSpec};
use tracing::trace;

use crate::errors::{FieldPath, ValidationError, ValidationReport};

/// Tracks the current position and collected errors during a walk.
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    path: FieldPath,
    report: ValidationReport,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a walk below `path` instead of the document root.
    pub fn at(path: FieldPath) -> Self {
        Self {
            path,
            report: ValidationReport::new(),
        }
    }

    pub fn current_path(&self) -> &FieldPath {
        &self.path
    }

    pub fn push_key(&mut self, key: impl Into<String>) {
        self.path.push_key(key);
    }

    pub fn push_index(&mut self, index: usize) {
        self.path.push_index(index);
    }

    pub fn pop(&mut self) {
        self.path.pop();
    }

    /// Record an error at the current path.
    pub fn type_mismatch(&mut self, expected: &str, actual: &Value) {
        self.report.push(ValidationError::type_mismatch(
            self.path.clone(),
            expected,
            type_name(actual),
        ));
    }

    pub fn missing_required(&mut self) {
        self.report
            .push(ValidationError::missing_required(self.path.clone()));
    }

    pub fn invalid_choice(&mut self, allowed: &[String], actual: &str) {
        self.report.push(ValidationError::invalid_choice(
            self.path.clone(),
            allowed,
            actual,
        ));
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn into_report(self) -> ValidationReport {
        self.report
    }
}

/// Validates configuration mappings against schema specs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    /// Validate `config` against `spec`, returning every violation found.
    pub fn validate(config: &ConfigMapping, spec: &SchemaSpec) -> ValidationReport {
        let mut ctx = ValidationContext::new();
        Self::validate_mapping(config, spec, &mut ctx);
        ctx.into_report()
    }

    /// Validate a single value against a field type at the context's path.
    pub fn validate_value(value: &Value, kind: &FieldType, ctx: &mut ValidationContext) {
        match kind {
            FieldType::Nested(spec) => match value {
                Value::Object(map) => Self::validate_mapping(map, spec, ctx),
                other => ctx.type_mismatch(kind.name(), other),
            },
            FieldType::Sequence(element) => match value {
                Value::Array(items) => {
                    if let Some(element) = element {
                        for (index, item) in items.iter().enumerate() {
                            ctx.push_index(index);
                            Self::validate_value(item, element, ctx);
                            ctx.pop();
                        }
                    }
                }
                other => ctx.type_mismatch(kind.name(), other),
            },
            FieldType::Choice(allowed) => match value {
                Value::String(s) if !allowed.iter().any(|a| a == s) => {
                    ctx.invalid_choice(allowed, s)
                }
                Value::String(_) => {}
                other => ctx.type_mismatch(kind.name(), other),
            },
            _ => {
                if !kind.matches(value) {
                    ctx.type_mismatch(kind.name(), value);
                }
            }
        }
    }

    fn validate_mapping(config: &ConfigMapping, spec: &SchemaSpec, ctx: &mut ValidationContext) {
        trace!("Validating '{}' at '{}'", spec.name(), ctx.current_path());
        for field in spec.fields() {
            ctx.push_key(field.name());
            Self::validate_field(config.get(field.name()), field, ctx);
            ctx.pop();
        }
    }

    fn validate_field(value: Option<&Value>, field: &FieldSpec, ctx: &mut ValidationContext) {
        match value {
            None if field.is_required() => ctx.missing_required(),
            None => {}
            Some(Value::Null) if field.allows_none() => {}
            Some(value) => Self::validate_value(value, field.kind(), ctx),
        }
    }
}
