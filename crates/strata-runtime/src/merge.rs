//! Deep merge of layered configuration sources.
//!
//! # Merge Semantics
//!
//! - **Mappings on both sides**: Recursively merge, result holds the union of keys
//! - **Sequences**: Replace entirely (no element-wise merge)
//! - **Scalars or differing types**: The later value wins, including an explicit `null`
//! - **Keys absent from the later source**: Kept from the earlier one
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use strata_runtime::Merge;
//!
//! let base = json!({"driver": {"name": "docker", "safe_files": ["a"]}});
//! let overlay = json!({"driver": {"safe_files": ["b", "c"]}});
//! let merged = base.merge(overlay);
//!
//! assert_eq!(merged, json!({"driver": {"name": "docker", "safe_files": ["b", "c"]}}));
//! ```

use serde_json::Value;
use strata_core::ConfigMapping;
use tracing::trace;

/// Trait for deep merging configuration values.
pub trait Merge: Sized {
    /// Merge `other` into `self`, with `other` taking precedence.
    ///
    /// This consumes both values and returns the merged result.
    fn merge(self, other: Self) -> Self;

    /// Merge multiple overlays in sequence.
    ///
    /// Later overlays take precedence over earlier ones.
    fn merge_all<I>(self, overlays: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        overlays.into_iter().fold(self, |acc, overlay| acc.merge(overlay))
    }
}

impl Merge for Value {
    fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Value::Object(base), Value::Object(overlay)) => Value::Object(base.merge(overlay)),
            // Sequences, scalars and type changes: overlay wins
            (_, overlay) => overlay,
        }
    }
}

impl Merge for ConfigMapping {
    fn merge(mut self, other: Self) -> Self {
        for (key, overlay_value) in other {
            let merged = match self.remove(&key) {
                Some(base_value) => base_value.merge(overlay_value),
                None => overlay_value,
            };
            self.insert(key, merged);
        }
        self
    }
}

/// Combines ordered configuration sources into one effective mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge `sources` left to right; later sources take precedence.
    ///
    /// Inputs are never modified. An empty slice gives an empty mapping and a
    /// single source gives a deep copy of it.
    pub fn merge(sources: &[ConfigMapping]) -> ConfigMapping {
        trace!("Merging {} configuration sources", sources.len());
        ConfigMapping::new().merge_all(sources.iter().cloned())
    }
}
