//! Declarative schema model for configuration documents
//!
//! A [`SchemaSpec`] is an ordered set of [`FieldSpec`]s plus the parent specs
//! it extends. The flattened field set is computed once when the schema is
//! built; parents contribute their fields first and a later declaration of
//! the same name replaces the earlier one in place.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use crate::error::CoreError;

/// Semantic type tag of a declared field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    String,
    Bool,
    /// Integral numbers only; floats are rejected.
    Int,
    /// Free-form mapping with no declared keys.
    Mapping,
    /// A sequence, optionally with every element checked against a type.
    Sequence(Option<Box<FieldType>>),
    /// A mapping described by another schema.
    Nested(Arc<SchemaSpec>),
    /// A string restricted to an allowed set.
    Choice(Vec<String>),
}

impl FieldType {
    /// Sequence whose elements must all be of `element`.
    pub fn sequence_of(element: FieldType) -> Self {
        FieldType::Sequence(Some(Box::new(element)))
    }

    /// Sequence of mappings validated against `spec`.
    pub fn nested_sequence(spec: &Arc<SchemaSpec>) -> Self {
        Self::sequence_of(FieldType::Nested(Arc::clone(spec)))
    }

    pub fn choice<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldType::Choice(allowed.into_iter().map(Into::into).collect())
    }

    /// Type name used in validation messages.
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String | FieldType::Choice(_) => "string",
            FieldType::Bool => "boolean",
            FieldType::Int => "integer",
            FieldType::Mapping | FieldType::Nested(_) => "mapping",
            FieldType::Sequence(_) => "sequence",
        }
    }

    /// Shallow check of a value's shape against this type.
    ///
    /// Does not descend into nested schemas or sequence elements. A
    /// `Choice` additionally requires the string to be one of the allowed
    /// values.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldType::String, Value::String(_)) => true,
            (FieldType::Bool, Value::Bool(_)) => true,
            (FieldType::Int, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (FieldType::Mapping | FieldType::Nested(_), Value::Object(_)) => true,
            (FieldType::Sequence(_), Value::Array(_)) => true,
            (FieldType::Choice(allowed), Value::String(s)) => allowed.iter().any(|a| a == s),
            _ => false,
        }
    }

    /// Deep check used for declared defaults.
    fn accepts(&self, value: &Value) -> bool {
        if !self.matches(value) {
            return false;
        }
        match (self, value) {
            (FieldType::Sequence(Some(element)), Value::Array(items)) => {
                items.iter().all(|item| element.accepts(item))
            }
            (FieldType::Nested(spec), Value::Object(map)) => spec.fields().iter().all(|field| {
                match map.get(field.name()) {
                    None => !field.is_required(),
                    Some(Value::Null) if field.allows_none() => true,
                    Some(value) => field.kind().accepts(value),
                }
            }),
            _ => true,
        }
    }
}

/// A single named field declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    name: String,
    kind: FieldType,
    allow_none: bool,
    required: bool,
    default: Option<Value>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldType) -> Self {
        Self {
            name: name.into(),
            kind,
            allow_none: false,
            required: false,
            default: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Bool)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Int)
    }

    pub fn mapping(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Mapping)
    }

    /// Sequence of strings, the most common list shape in scenario files.
    pub fn string_list(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::sequence_of(FieldType::String))
    }

    pub fn nested(name: impl Into<String>, spec: &Arc<SchemaSpec>) -> Self {
        Self::new(name, FieldType::Nested(Arc::clone(spec)))
    }

    /// Accept an explicit `null` in place of a value.
    pub fn allow_none(mut self) -> Self {
        self.allow_none = true;
        self
    }

    /// Report the field when it is absent.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Value filled in when the field is absent from a valid document.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldType {
        &self.kind
    }

    pub fn allows_none(&self) -> bool {
        self.allow_none
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// A named, immutable set of field declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaSpec {
    name: String,
    parents: Vec<Arc<SchemaSpec>>,
    own_fields: Vec<FieldSpec>,
    resolved: Vec<FieldSpec>,
}

impl SchemaSpec {
    pub fn builder(name: impl Into<String>) -> SchemaSpecBuilder {
        SchemaSpecBuilder {
            name: name.into(),
            parents: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parents(&self) -> &[Arc<SchemaSpec>] {
        &self.parents
    }

    /// Fields declared directly on this spec.
    pub fn own_fields(&self) -> &[FieldSpec] {
        &self.own_fields
    }

    /// Flattened field set, parents first, overrides applied in place.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.resolved
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.resolved.iter().find(|field| field.name == name)
    }

    /// Whether this spec is `other` or extends it, directly or transitively.
    pub fn extends(&self, other: &SchemaSpec) -> bool {
        std::ptr::eq(self, other) || self.parents.iter().any(|parent| parent.extends(other))
    }
}

/// Builder for [`SchemaSpec`]; validates declarations on [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct SchemaSpecBuilder {
    name: String,
    parents: Vec<Arc<SchemaSpec>>,
    fields: Vec<FieldSpec>,
}

impl SchemaSpecBuilder {
    pub fn extends(mut self, parent: &Arc<SchemaSpec>) -> Self {
        self.parents.push(Arc::clone(parent));
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldSpec>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn build(self) -> Result<SchemaSpec, CoreError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(CoreError::DuplicateField {
                    schema: self.name.clone(),
                    field: field.name.clone(),
                });
            }
            if let Some(default) = &field.default {
                let null_allowed = default.is_null() && field.allow_none;
                if !null_allowed && !field.kind.accepts(default) {
                    return Err(CoreError::InvalidDefault {
                        schema: self.name.clone(),
                        field: field.name.clone(),
                        expected: field.kind.name().to_string(),
                    });
                }
            }
        }

        let mut resolved: Vec<FieldSpec> = Vec::new();
        let inherited = self.parents.iter().flat_map(|parent| parent.fields().iter());
        for field in inherited.chain(self.fields.iter()) {
            match resolved.iter_mut().find(|existing| existing.name == field.name) {
                Some(existing) => *existing = field.clone(),
                None => resolved.push(field.clone()),
            }
        }

        Ok(SchemaSpec {
            name: self.name,
            parents: self.parents,
            own_fields: self.fields,
            resolved,
        })
    }

    /// Build and wrap in an `Arc` for sharing as a parent or nested type.
    pub fn build_shared(self) -> Result<Arc<SchemaSpec>, CoreError> {
        self.build().map(Arc::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn field_names(spec: &SchemaSpec) -> Vec<&str> {
        spec.fields().iter().map(FieldSpec::name).collect()
    }

    #[test]
    fn test_child_extends_parent_fields() {
        let base = SchemaSpec::builder("platforms_base")
            .field(FieldSpec::string("name"))
            .field(FieldSpec::string_list("groups"))
            .build_shared()
            .unwrap();
        let child = SchemaSpec::builder("platforms_vagrant")
            .extends(&base)
            .field(FieldSpec::string("box"))
            .field(FieldSpec::int("memory"))
            .build()
            .unwrap();

        assert_eq!(field_names(&child), vec!["name", "groups", "box", "memory"]);
        assert_eq!(child.own_fields().len(), 2);
        assert!(child.extends(&base));
        assert!(!base.extends(&child));
    }

    #[test]
    fn test_child_overrides_parent_in_place() {
        let base = SchemaSpec::builder("playbooks")
            .field(FieldSpec::string("setup"))
            .field(FieldSpec::string("destruct"))
            .field(FieldSpec::string("converge"))
            .build_shared()
            .unwrap();
        let child = SchemaSpec::builder("strict_playbooks")
            .extends(&base)
            .field(FieldSpec::string("destruct").allow_none())
            .build()
            .unwrap();

        assert_eq!(field_names(&child), vec!["setup", "destruct", "converge"]);
        assert!(child.field("destruct").unwrap().allows_none());
        assert!(!base.field("destruct").unwrap().allows_none());
    }

    #[test]
    fn test_later_parent_overrides_earlier_parent() {
        let first = SchemaSpec::builder("first")
            .field(FieldSpec::string("name"))
            .build_shared()
            .unwrap();
        let second = SchemaSpec::builder("second")
            .field(FieldSpec::int("name"))
            .field(FieldSpec::bool("enabled"))
            .build_shared()
            .unwrap();
        let both = SchemaSpec::builder("both")
            .extends(&first)
            .extends(&second)
            .build()
            .unwrap();

        assert_eq!(field_names(&both), vec!["name", "enabled"]);
        assert_eq!(both.field("name").unwrap().kind(), &FieldType::Int);
    }

    #[test]
    fn test_duplicate_own_field_rejected() {
        let err = SchemaSpec::builder("lint")
            .field(FieldSpec::string("name"))
            .field(FieldSpec::bool("name"))
            .build()
            .unwrap_err();

        assert_eq!(
            err,
            CoreError::DuplicateField {
                schema: "lint".into(),
                field: "name".into(),
            }
        );
    }

    #[test]
    fn test_default_must_match_type() {
        let err = SchemaSpec::builder("verifier")
            .field(FieldSpec::bool("enabled").with_default("yes"))
            .build()
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidDefault { ref field, .. } if field == "enabled"));

        let ok = SchemaSpec::builder("verifier")
            .field(FieldSpec::bool("enabled").with_default(true))
            .field(FieldSpec::string_list("sequence").with_default(json!(["lint", "test"])))
            .build()
            .unwrap();
        assert_eq!(ok.field("enabled").unwrap().default_value(), Some(&json!(true)));
    }

    #[test]
    fn test_null_default_for_nullable_field() {
        let spec = SchemaSpec::builder("provisioner_playbooks")
            .field(FieldSpec::string("destruct").allow_none().with_default(Value::Null))
            .build()
            .unwrap();
        assert_eq!(spec.field("destruct").unwrap().default_value(), Some(&Value::Null));

        let err = SchemaSpec::builder("provisioner_playbooks")
            .field(FieldSpec::string("destruct").with_default(Value::Null))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidDefault {
                schema: "provisioner_playbooks".into(),
                field: "destruct".into(),
                expected: "string".into(),
            }
        );
    }

    #[test]
    fn test_sequence_default_checks_elements() {
        let err = SchemaSpec::builder("scenario")
            .field(FieldSpec::string_list("test_sequence").with_default(json!(["lint", 3])))
            .build()
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidDefault { .. }));
    }

    #[test]
    fn test_field_type_matches() {
        assert!(FieldType::Int.matches(&json!(512)));
        assert!(!FieldType::Int.matches(&json!(1.5)));
        assert!(!FieldType::Int.matches(&json!("512")));
        assert!(!FieldType::Bool.matches(&json!("true")));
        assert!(FieldType::Mapping.matches(&json!({})));
        assert!(FieldType::sequence_of(FieldType::String).matches(&json!([1, 2])));

        let choice = FieldType::choice(["docker", "vagrant"]);
        assert!(choice.matches(&json!("docker")));
        assert!(!choice.matches(&json!("podman")));
        assert_eq!(choice.name(), "string");
    }
}
