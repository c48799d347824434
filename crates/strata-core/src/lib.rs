//! Core schema model for strata
//!
//! Declares the typed field model used to describe configuration documents,
//! the registry that picks a schema variant by discriminator value, and the
//! built-in scenario catalog.

pub mod error;
pub mod registry;
pub mod scenario;
pub mod schema;
pub mod value;

pub use error::CoreError;
pub use registry::SchemaRegistry;
pub use schema::{FieldSpec, FieldType, SchemaSpec, SchemaSpecBuilder};
pub use value::{lookup, type_name, ConfigMapping};
