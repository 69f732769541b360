// modbridge_mappings/table - Table construction, validation, and lookup
use crate::types::{ApiMapping, ConversionType, UNSUPPORTED};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("Invalid mapping table JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate mapping for signature '{signature}' at version {version}")]
    DuplicateMapping { signature: String, version: u32 },

    #[error("Mapping '{id}' is marked impossible but targets '{target}' instead of UNSUPPORTED")]
    ImpossibleWithTarget { id: String, target: String },

    #[error("Mapping '{id}' is marked direct but targets UNSUPPORTED")]
    DirectWithoutTarget { id: String },
}

/// Read-only lookup table over validated mappings, keyed by source
/// signature with per-signature version lists sorted ascending.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    by_signature: HashMap<String, Vec<ApiMapping>>,
    len: usize,
}

impl MappingTable {
    /// Builds a table, enforcing the load-time invariants: one mapping per
    /// `(signature, version)`, `impossible` entries target `UNSUPPORTED`,
    /// and `direct` entries do not.
    pub fn from_mappings(mappings: Vec<ApiMapping>) -> Result<Self, MappingError> {
        let mut by_signature: HashMap<String, Vec<ApiMapping>> = HashMap::new();
        let mut len = 0usize;

        for mapping in mappings {
            match mapping.conversion_type {
                ConversionType::Impossible if mapping.target_equivalent != UNSUPPORTED => {
                    return Err(MappingError::ImpossibleWithTarget {
                        id: mapping.id,
                        target: mapping.target_equivalent,
                    });
                }
                ConversionType::Direct if mapping.target_equivalent == UNSUPPORTED => {
                    return Err(MappingError::DirectWithoutTarget { id: mapping.id });
                }
                _ => {}
            }

            let versions = by_signature
                .entry(mapping.source_signature.clone())
                .or_default();
            if versions
                .iter()
                .any(|existing| existing.version == mapping.version)
            {
                return Err(MappingError::DuplicateMapping {
                    signature: mapping.source_signature,
                    version: mapping.version,
                });
            }
            versions.push(mapping);
            len += 1;
        }

        for versions in by_signature.values_mut() {
            versions.sort_by_key(|mapping| mapping.version);
        }

        Ok(Self { by_signature, len })
    }

    /// Loads a table from its JSON representation: an array of mapping
    /// objects.
    pub fn from_json(json: &str) -> Result<Self, MappingError> {
        let mappings: Vec<ApiMapping> = serde_json::from_str(json)?;
        Self::from_mappings(mappings)
    }

    /// Resolves `signature` at `version`: the mapping with the greatest
    /// version not exceeding the requested one. `None` means no entry
    /// qualifies; the transpiler decides what that costs.
    pub fn resolve(&self, signature: &str, version: u32) -> Option<&ApiMapping> {
        self.by_signature
            .get(signature)?
            .iter()
            .rev()
            .find(|mapping| mapping.version <= version)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Distinct source signatures in the table, sorted for stable output.
    pub fn signatures(&self) -> Vec<&str> {
        let mut signatures: Vec<&str> = self.by_signature.keys().map(String::as_str).collect();
        signatures.sort_unstable();
        signatures
    }
}
