//! Test fixtures for strata
//!
//! Scenario configuration documents as they appear on disk, split into the
//! layers a scenario is usually assembled from.

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};

/// Scenario document fixtures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixture {
    /// Shared defaults every scenario starts from
    BaseDefaults,
    /// Docker scenario layered over the defaults
    DockerScenario,
    /// Vagrant scenario with boxes and network interfaces
    VagrantScenario,
    /// Per-platform override for the vagrant scenario
    VagrantPlatformOverride,
    /// Vagrant scenario with mistakes in several sections
    BrokenVagrantScenario,
}

impl Fixture {
    pub fn name(self) -> &'static str {
        match self {
            Fixture::BaseDefaults => "base_defaults",
            Fixture::DockerScenario => "docker_scenario",
            Fixture::VagrantScenario => "vagrant_scenario",
            Fixture::VagrantPlatformOverride => "vagrant_platform_override",
            Fixture::BrokenVagrantScenario => "broken_vagrant_scenario",
        }
    }

    pub fn yaml(self) -> &'static str {
        match self {
            Fixture::BaseDefaults => BASE_DEFAULTS,
            Fixture::DockerScenario => DOCKER_SCENARIO,
            Fixture::VagrantScenario => VAGRANT_SCENARIO,
            Fixture::VagrantPlatformOverride => VAGRANT_PLATFORM_OVERRIDE,
            Fixture::BrokenVagrantScenario => BROKEN_VAGRANT_SCENARIO,
        }
    }

    /// Parse the fixture into a configuration mapping.
    pub fn load(self) -> Result<Map<String, Value>> {
        parse_mapping(self.yaml()).with_context(|| format!("fixture '{}'", self.name()))
    }
}

/// Parse a YAML document whose root is a mapping.
pub fn parse_mapping(yaml: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_yaml::from_str(yaml).context("invalid YAML")?;
    match value {
        Value::Object(map) => Ok(map),
        other => bail!("document root must be a mapping, found {}", other),
    }
}

/// Load several fixtures in order, for use as layered sources.
pub fn layers(fixtures: &[Fixture]) -> Result<Vec<Map<String, Value>>> {
    fixtures.iter().map(|fixture| fixture.load()).collect()
}

const BASE_DEFAULTS: &str = r#"
dependency:
  name: galaxy
  enabled: true
  options: {}
driver:
  name: docker
  options:
    managed: true
lint:
  name: yamllint
  enabled: true
provisioner:
  name: ansible
  config_options: {}
  options: {}
  env: {}
  inventory:
    host_vars: {}
    group_vars: {}
  playbooks:
    setup: setup.yml
    converge: playbook.yml
    teardown: teardown.yml
    destruct: null
  lint:
    name: ansible-lint
    enabled: true
scenario:
  name: default
  check_sequence: [destroy, create, converge, check, destroy]
  converge_sequence: [create, converge]
  test_sequence: [lint, destroy, dependency, syntax, create, converge, verify, destroy]
verifier:
  name: testinfra
  enabled: true
  directory: tests
  options: {}
  lint:
    name: flake8
"#;

const DOCKER_SCENARIO: &str = r#"
driver:
  name: docker
  safe_files:
    - Dockerfile
platforms:
  - name: instance
    image: centos:7
    groups: [web]
provisioner:
  playbooks:
    docker:
      converge: docker/playbook.yml
scenario:
  name: docker
"#;

const VAGRANT_SCENARIO: &str = r#"
driver:
  name: vagrant
  ssh_connection_options:
    - "-o ControlPersist=60s"
platforms:
  - name: web01
    box: centos/7
    box_version: "1905.1"
    memory: 1024
    cpus: 2
    groups: [web]
    raw_config_args:
      - "vm.synced_folder '.', '/vagrant', disabled: true"
    interfaces:
      - network_name: private_network
        type: static
        auto_config: true
        ip: 192.168.33.10
  - name: db01
    box: centos/7
    memory: 2048
scenario:
  name: vagrant
"#;

const VAGRANT_PLATFORM_OVERRIDE: &str = r#"
platforms:
  - name: web01
    box: ubuntu/bionic64
    memory: 4096
    interfaces:
      - network_name: private_network
        ip: 192.168.33.20
"#;

const BROKEN_VAGRANT_SCENARIO: &str = r#"
driver:
  name: vagrant
  safe_files: Vagrantfile
lint:
  enabled: "yes"
platforms:
  - name: web01
    memory: lots
    interfaces:
      - network_name: private_network
        ip: 123
  - name: db01
    cpus: 2.5
    groups: web
provisioner:
  playbooks:
    destruct: null
    vagrant:
      converge: 42
verifier:
  lint: flake8
"#;
