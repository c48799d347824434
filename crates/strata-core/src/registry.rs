//! Schema registry keyed by discriminator value
//!
//! Maps a discriminator (for scenario files, the driver name) to the schema
//! variant that applies. Unknown values fall back to a designated default
//! variant; that fallback is not an error.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::schema::SchemaSpec;

#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    variants: HashMap<String, Arc<SchemaSpec>>,
    default: Arc<SchemaSpec>,
}

impl SchemaRegistry {
    pub fn new(default: Arc<SchemaSpec>) -> Self {
        Self {
            variants: HashMap::new(),
            default,
        }
    }

    /// Register `spec` for `discriminator`, returning the variant it replaced.
    pub fn register(
        &mut self,
        discriminator: impl Into<String>,
        spec: Arc<SchemaSpec>,
    ) -> Option<Arc<SchemaSpec>> {
        let discriminator = discriminator.into();
        let previous = self.variants.insert(discriminator.clone(), spec);
        if let Some(previous) = &previous {
            debug!(
                "Replaced schema '{}' registered for discriminator '{}'",
                previous.name(),
                discriminator
            );
        }
        previous
    }

    /// Exact match, or the default variant.
    pub fn resolve(&self, discriminator: &str) -> Arc<SchemaSpec> {
        match self.variants.get(discriminator) {
            Some(spec) => Arc::clone(spec),
            None => {
                debug!(
                    "No schema registered for discriminator '{}', using default '{}'",
                    discriminator,
                    self.default.name()
                );
                Arc::clone(&self.default)
            }
        }
    }

    /// Like [`resolve`](Self::resolve), treating `None` as unrecognized.
    pub fn resolve_optional(&self, discriminator: Option<&str>) -> Arc<SchemaSpec> {
        match discriminator {
            Some(value) => self.resolve(value),
            None => {
                debug!("No discriminator present, using default '{}'", self.default.name());
                Arc::clone(&self.default)
            }
        }
    }

    pub fn default_spec(&self) -> &Arc<SchemaSpec> {
        &self.default
    }

    pub fn contains(&self, discriminator: &str) -> bool {
        self.variants.contains_key(discriminator)
    }

    /// Registered discriminator values, sorted.
    pub fn discriminators(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.variants.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}
