//! End-to-end validation of layered scenario files against the built-in
//! scenario schemas

use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use strata_core::{scenario, ConfigMapping};
use strata_runtime::{ErrorKind, ValidationEngine};
use strata_test_fixtures::{layers, Fixture};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn engine() -> ValidationEngine {
    init_tracing();
    ValidationEngine::new(scenario::registry().expect("built-in schemas are valid"))
}

fn mapping(value: Value) -> ConfigMapping {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a mapping, got {}", other),
    }
}

#[test]
fn test_docker_layers_merge_and_validate() -> anyhow::Result<()> {
    let engine = engine();
    let sources = vec![
        mapping(json!({"driver": {"name": "docker"}})),
        mapping(json!({"driver": {"options": {"image": "centos"}}})),
    ];

    let effective = engine.validate(&sources)?;

    assert_eq!(
        Value::Object(effective),
        json!({"driver": {"name": "docker", "options": {"image": "centos"}}})
    );
    Ok(())
}

#[test]
fn test_defaults_plus_docker_scenario() -> anyhow::Result<()> {
    let engine = engine();
    let sources = layers(&[Fixture::BaseDefaults, Fixture::DockerScenario])?;

    let effective = engine.validate(&sources)?;

    assert_eq!(effective["scenario"]["name"], "docker");
    assert_eq!(effective["driver"]["options"]["managed"], true);
    assert_eq!(effective["driver"]["safe_files"], json!(["Dockerfile"]));
    assert_eq!(
        effective["provisioner"]["playbooks"]["docker"],
        json!({"converge": "docker/playbook.yml"})
    );
    assert_eq!(effective["provisioner"]["playbooks"]["destruct"], Value::Null);
    Ok(())
}

#[test]
fn test_vagrant_platform_override_replaces_platforms() -> anyhow::Result<()> {
    let engine = engine();
    let sources = layers(&[
        Fixture::BaseDefaults,
        Fixture::VagrantScenario,
        Fixture::VagrantPlatformOverride,
    ])?;

    let effective = engine.validate(&sources)?;

    assert_eq!(
        engine
            .select_schema(&effective, &scenario::DRIVER_NAME_PATH)
            .name(),
        "scenario_vagrant"
    );
    assert_eq!(
        effective["platforms"],
        json!([{
            "name": "web01",
            "box": "ubuntu/bionic64",
            "memory": 4096,
            "interfaces": [{"network_name": "private_network", "ip": "192.168.33.20"}]
        }])
    );
    Ok(())
}

#[test]
fn test_interface_ip_type_mismatch_path() {
    let engine = engine();
    let sources = vec![mapping(json!({
        "driver": {"name": "vagrant"},
        "platforms": [{"interfaces": [{"ip": 123}]}]
    }))];

    let report = engine.validate(&sources).unwrap_err();

    assert_eq!(report.len(), 1);
    let error = &report.errors[0];
    assert_eq!(error.kind, ErrorKind::TypeMismatch);
    assert_eq!(error.path.to_string(), "platforms[0].interfaces[0].ip");
    assert_eq!(error.expected.as_deref(), Some("string"));
    assert_eq!(error.actual.as_deref(), Some("integer"));
}

#[test]
fn test_vagrant_only_fields_ignored_for_other_drivers() {
    let engine = engine();
    let platform = json!([{"name": "web01", "memory": "lots", "interfaces": "none"}]);

    let docker = vec![mapping(json!({"driver": {"name": "docker"}, "platforms": platform}))];
    assert!(engine.validate(&docker).is_ok());

    let unnamed = vec![mapping(json!({"platforms": platform}))];
    assert!(engine.validate(&unnamed).is_ok());

    let vagrant = vec![mapping(json!({"driver": {"name": "vagrant"}, "platforms": platform}))];
    let report = engine.validate(&vagrant).unwrap_err();
    assert_eq!(report.len(), 2);
}

#[test]
fn test_unknown_keys_are_not_reported() {
    let engine = engine();
    let sources = vec![mapping(json!({
        "driver": {"name": "x", "totally_unknown_key": 1},
        "not_a_section": [1, 2, 3]
    }))];

    assert!(engine.validate(&sources).is_ok());
}

#[test]
fn test_empty_document_is_valid() {
    let engine = engine();
    assert!(engine.validate(&[]).is_ok());
    assert!(engine.validate_mapping(&ConfigMapping::new()).is_ok());
}

#[test]
fn test_broken_scenario_reports_every_error() -> anyhow::Result<()> {
    let engine = engine();
    let sources = layers(&[Fixture::BrokenVagrantScenario])?;

    let report = engine.validate(&sources).unwrap_err();

    assert_snapshot!(report.to_string(), @r"
    driver.safe_files: expected sequence, got string
    lint.enabled: expected boolean, got string
    provisioner.playbooks.vagrant.converge: expected string, got integer
    verifier.lint: expected mapping, got string
    platforms[0].memory: expected integer, got string
    platforms[0].interfaces[0].ip: expected string, got integer
    platforms[1].groups: expected sequence, got string
    platforms[1].cpus: expected integer, got float
    ");
    Ok(())
}

#[test]
fn test_later_layer_changes_selected_variant() -> anyhow::Result<()> {
    let engine = engine();
    let mut sources = layers(&[Fixture::BrokenVagrantScenario])?;
    sources.push(mapping(json!({"driver": {"name": "docker"}})));

    let report = engine.validate(&sources).unwrap_err();

    let paths: Vec<String> = report.iter().map(|e| e.path.to_string()).collect();
    assert_eq!(
        paths,
        vec![
            "driver.safe_files",
            "lint.enabled",
            "provisioner.playbooks.vagrant.converge",
            "verifier.lint",
            "platforms[1].groups",
        ]
    );
    Ok(())
}

#[test]
fn test_sources_are_not_modified() -> anyhow::Result<()> {
    let engine = engine();
    let sources = layers(&[Fixture::BaseDefaults, Fixture::VagrantScenario])?;
    let before = sources.clone();

    let mut effective = engine.validate(&sources)?;
    effective.insert("scenario".into(), json!({"name": "changed"}));

    assert_eq!(sources, before);
    Ok(())
}

#[test]
fn test_report_converts_into_anyhow() {
    fn run(engine: &ValidationEngine, sources: &[ConfigMapping]) -> anyhow::Result<ConfigMapping> {
        Ok(engine.validate(sources)?)
    }

    let engine = engine();
    let sources = vec![mapping(json!({"verifier": {"enabled": "sometimes"}}))];

    let err = run(&engine, &sources).unwrap_err();
    assert_eq!(err.to_string(), "verifier.enabled: expected boolean, got string");
}
