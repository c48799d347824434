//! Fill declared defaults into a validated configuration.

use serde_json::Value;
use strata_core::{ConfigMapping, FieldType, SchemaSpec};

/// Insert the declared default of every absent field.
///
/// Descends into nested mappings and into the elements of sequences of
/// nested specs that are present in `config`. A parent mapping that is
/// absent is not created, so defaults of an unused section stay out of the
/// result. Values of the wrong shape are left untouched; run validation
/// first.
pub fn apply_defaults(config: &mut ConfigMapping, spec: &SchemaSpec) {
    for field in spec.fields() {
        if let Some(value) = config.get_mut(field.name()) {
            fill_value(value, field.kind());
        } else if let Some(default) = field.default_value() {
            config.insert(field.name().to_string(), default.clone());
        }
    }
}

fn fill_value(value: &mut Value, kind: &FieldType) {
    match (kind, value) {
        (FieldType::Nested(spec), Value::Object(map)) => apply_defaults(map, spec),
        (FieldType::Sequence(Some(element)), Value::Array(items)) => {
            for item in items {
                fill_value(item, element);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use strata_core::FieldSpec;

    fn mapping(value: Value) -> ConfigMapping {
        match value {
            Value::Object(map) => map,
            other => panic!("expected a mapping, got {}", other),
        }
    }

    #[test]
    fn test_defaults_fill_absent_fields_only() {
        let lint = SchemaSpec::builder("lint")
            .field(FieldSpec::string("name").with_default("yamllint"))
            .field(FieldSpec::bool("enabled").with_default(true))
            .build_shared()
            .unwrap();
        let root = SchemaSpec::builder("root")
            .field(FieldSpec::nested("lint", &lint))
            .field(FieldSpec::nested("verifier_lint", &lint))
            .build()
            .unwrap();

        let mut config = mapping(json!({"lint": {"enabled": false}}));
        apply_defaults(&mut config, &root);

        assert_eq!(
            Value::Object(config),
            json!({"lint": {"name": "yamllint", "enabled": false}})
        );
    }

    #[test]
    fn test_defaults_in_sequence_elements() {
        let interface = SchemaSpec::builder("interface")
            .field(FieldSpec::string("network_name"))
            .field(FieldSpec::bool("auto_config").with_default(true))
            .build_shared()
            .unwrap();
        let platform = SchemaSpec::builder("platform")
            .field(FieldSpec::new(
                "interfaces",
                FieldType::nested_sequence(&interface),
            ))
            .build()
            .unwrap();

        let mut config = mapping(json!({
            "interfaces": [{"network_name": "private_network"}, {"auto_config": false}]
        }));
        apply_defaults(&mut config, &platform);

        assert_eq!(
            config["interfaces"],
            json!([
                {"network_name": "private_network", "auto_config": true},
                {"auto_config": false}
            ])
        );
    }

    #[test]
    fn test_explicit_null_is_kept() {
        let spec = SchemaSpec::builder("playbooks")
            .field(FieldSpec::string("destruct").allow_none().with_default("destruct.yml"))
            .build()
            .unwrap();

        let mut config = mapping(json!({"destruct": null}));
        apply_defaults(&mut config, &spec);
        assert_eq!(config["destruct"], Value::Null);
    }
}
