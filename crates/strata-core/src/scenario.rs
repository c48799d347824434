//! Built-in schemas for scenario configuration files
//!
//! A scenario file has `dependency`, `driver`, `lint`, `provisioner`,
//! `scenario`, `verifier` and `platforms` sections. The shape of each
//! platform entry depends on the driver: the vagrant driver accepts box,
//! sizing and network interface settings that other drivers do not.

use std::sync::Arc;

use crate::error::CoreError;
use crate::registry::SchemaRegistry;
use crate::schema::{FieldSpec, FieldType, SchemaSpec};

/// Where the driver name lives in a scenario file.
pub const DRIVER_NAME_PATH: [&str; 2] = ["driver", "name"];

/// Discriminator value selecting [`ScenarioSchemas::vagrant`].
pub const VAGRANT_DRIVER: &str = "vagrant";

/// Driver names with a dedicated playbook section under
/// `provisioner.playbooks`.
pub const PLAYBOOK_DRIVERS: [&str; 7] = [
    "docker",
    "ec2",
    "gce",
    "lxc",
    "lxd",
    "openstack",
    "vagrant",
];

/// Every section schema of a scenario file, plus the two top-level variants.
#[derive(Debug, Clone)]
pub struct ScenarioSchemas {
    pub dependency: Arc<SchemaSpec>,
    pub driver: Arc<SchemaSpec>,
    pub lint: Arc<SchemaSpec>,
    pub interface: Arc<SchemaSpec>,
    pub platforms_base: Arc<SchemaSpec>,
    pub platforms: Arc<SchemaSpec>,
    pub platforms_vagrant: Arc<SchemaSpec>,
    pub inventory_links: Arc<SchemaSpec>,
    pub inventory: Arc<SchemaSpec>,
    pub playbooks: Arc<SchemaSpec>,
    pub provisioner_playbooks: Arc<SchemaSpec>,
    pub provisioner: Arc<SchemaSpec>,
    pub scenario: Arc<SchemaSpec>,
    pub verifier: Arc<SchemaSpec>,
    pub base: Arc<SchemaSpec>,
    /// Top-level schema for every driver without a dedicated variant.
    pub default: Arc<SchemaSpec>,
    /// Top-level schema for the vagrant driver.
    pub vagrant: Arc<SchemaSpec>,
}

impl ScenarioSchemas {
    pub fn new() -> Result<Self, CoreError> {
        let dependency = SchemaSpec::builder("dependency")
            .field(FieldSpec::string("name"))
            .field(FieldSpec::bool("enabled"))
            .field(FieldSpec::mapping("options"))
            .field(FieldSpec::mapping("env"))
            .build_shared()?;

        let driver = SchemaSpec::builder("driver")
            .field(FieldSpec::string("name"))
            .field(FieldSpec::mapping("options"))
            .field(FieldSpec::string_list("ssh_connection_options"))
            .field(FieldSpec::string_list("safe_files"))
            .build_shared()?;

        let lint = SchemaSpec::builder("lint")
            .field(FieldSpec::string("name"))
            .field(FieldSpec::bool("enabled"))
            .field(FieldSpec::mapping("options"))
            .field(FieldSpec::mapping("env"))
            .build_shared()?;

        let interface = SchemaSpec::builder("interface")
            .field(FieldSpec::string("network_name"))
            .field(FieldSpec::string("type"))
            .field(FieldSpec::bool("auto_config"))
            .field(FieldSpec::string("ip"))
            .build_shared()?;

        let platforms_base = SchemaSpec::builder("platforms_base")
            .field(FieldSpec::string("name"))
            .field(FieldSpec::string_list("groups"))
            .field(FieldSpec::string_list("children"))
            .build_shared()?;

        let platforms = SchemaSpec::builder("platforms")
            .extends(&platforms_base)
            .build_shared()?;

        let platforms_vagrant = SchemaSpec::builder("platforms_vagrant")
            .extends(&platforms_base)
            .field(FieldSpec::string("box"))
            .field(FieldSpec::string("box_version"))
            .field(FieldSpec::string("box_url"))
            .field(FieldSpec::int("memory"))
            .field(FieldSpec::int("cpus"))
            .field(FieldSpec::string_list("raw_config_args"))
            .field(FieldSpec::new(
                "interfaces",
                FieldType::nested_sequence(&interface),
            ))
            .build_shared()?;

        let inventory_links = SchemaSpec::builder("provisioner_inventory_links")
            .field(FieldSpec::string("host_vars"))
            .field(FieldSpec::string("group_vars"))
            .build_shared()?;

        let inventory = SchemaSpec::builder("provisioner_inventory")
            .field(FieldSpec::mapping("host_vars"))
            .field(FieldSpec::mapping("group_vars"))
            .field(FieldSpec::nested("links", &inventory_links))
            .build_shared()?;

        let playbooks = SchemaSpec::builder("playbooks")
            .field(FieldSpec::string("setup"))
            .field(FieldSpec::string("converge"))
            .field(FieldSpec::string("teardown"))
            .field(FieldSpec::string("destruct").allow_none())
            .build_shared()?;

        let provisioner_playbooks = SchemaSpec::builder("provisioner_playbooks")
            .extends(&playbooks)
            .fields(
                PLAYBOOK_DRIVERS
                    .iter()
                    .map(|driver| FieldSpec::nested(*driver, &playbooks)),
            )
            .build_shared()?;

        let provisioner = SchemaSpec::builder("provisioner")
            .field(FieldSpec::string("name"))
            .field(FieldSpec::mapping("config_options"))
            .field(FieldSpec::mapping("connection_options"))
            .field(FieldSpec::mapping("options"))
            .field(FieldSpec::mapping("env"))
            .field(FieldSpec::nested("inventory", &inventory))
            .field(FieldSpec::mapping("children"))
            .field(FieldSpec::nested("playbooks", &provisioner_playbooks))
            .field(FieldSpec::nested("lint", &lint))
            .build_shared()?;

        let scenario = SchemaSpec::builder("scenario")
            .field(FieldSpec::string("name"))
            .field(FieldSpec::string_list("check_sequence"))
            .field(FieldSpec::string_list("converge_sequence"))
            .field(FieldSpec::string_list("test_sequence"))
            .build_shared()?;

        let verifier = SchemaSpec::builder("verifier")
            .field(FieldSpec::string("name"))
            .field(FieldSpec::bool("enabled"))
            .field(FieldSpec::string("directory"))
            .field(FieldSpec::mapping("options"))
            .field(FieldSpec::mapping("env"))
            .field(FieldSpec::nested("lint", &lint))
            .build_shared()?;

        let base = SchemaSpec::builder("scenario_base")
            .field(FieldSpec::nested("dependency", &dependency))
            .field(FieldSpec::nested("driver", &driver))
            .field(FieldSpec::nested("lint", &lint))
            .field(FieldSpec::nested("provisioner", &provisioner))
            .field(FieldSpec::nested("scenario", &scenario))
            .field(FieldSpec::nested("verifier", &verifier))
            .build_shared()?;

        let default = SchemaSpec::builder("scenario_default")
            .extends(&base)
            .field(FieldSpec::new(
                "platforms",
                FieldType::nested_sequence(&platforms),
            ))
            .build_shared()?;

        let vagrant = SchemaSpec::builder("scenario_vagrant")
            .extends(&base)
            .field(FieldSpec::new(
                "platforms",
                FieldType::nested_sequence(&platforms_vagrant),
            ))
            .build_shared()?;

        Ok(Self {
            dependency,
            driver,
            lint,
            interface,
            platforms_base,
            platforms,
            platforms_vagrant,
            inventory_links,
            inventory,
            playbooks,
            provisioner_playbooks,
            provisioner,
            scenario,
            verifier,
            base,
            default,
            vagrant,
        })
    }

    /// Registry selecting the vagrant variant by driver name.
    pub fn into_registry(self) -> SchemaRegistry {
        let mut registry = SchemaRegistry::new(self.default);
        registry.register(VAGRANT_DRIVER, self.vagrant);
        registry
    }
}

/// Registry of the built-in scenario schemas.
pub fn registry() -> Result<SchemaRegistry, CoreError> {
    ScenarioSchemas::new().map(ScenarioSchemas::into_registry)
}
