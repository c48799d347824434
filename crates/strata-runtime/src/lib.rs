//! Strata Runtime Library
//!
//! This crate turns layered configuration sources into one validated,
//! effective configuration:
//!
//! - **Merge**: Deep merging of configuration mappings, later sources win
//! - **Validate**: Walks a mapping against a [`SchemaSpec`](strata_core::SchemaSpec),
//!   collecting every violation instead of stopping at the first
//! - **Engine**: Picks the schema variant by discriminator and ties the steps together
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use strata_core::scenario;
//! use strata_runtime::ValidationEngine;
//!
//! let engine = ValidationEngine::new(scenario::registry().unwrap());
//!
//! let defaults = json!({"driver": {"name": "docker"}});
//! let overrides = json!({"driver": {"options": {"image": "centos"}}});
//! let sources = [
//!     defaults.as_object().unwrap().clone(),
//!     overrides.as_object().unwrap().clone(),
//! ];
//!
//! let effective = engine.validate(&sources).unwrap();
//! assert_eq!(effective["driver"]["options"]["image"], "centos");
//! ```

mod engine;
mod errors;
mod merge;
mod normalize;
mod validate;

// Re-export public types
pub use engine::{EngineOptions, ValidationEngine};
pub use errors::{ErrorKind, FieldPath, PathSegment, ValidationError, ValidationReport};
pub use merge::{ConfigMerger, Merge};
pub use normalize::apply_defaults;
pub use validate::{SchemaValidator, ValidationContext};
