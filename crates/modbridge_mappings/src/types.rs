// modbridge_mappings/types - Mapping entry model
use serde::{Deserialize, Serialize};

/// Marker used as `target_equivalent` for APIs that cannot be expressed in
/// the target scripting API.
pub const UNSUPPORTED: &str = "UNSUPPORTED";

/// How faithfully a source API translates to the target API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionType {
    /// One equivalent call expression.
    Direct,
    /// An adapter invocation bridges a signature mismatch.
    Wrapper,
    /// A heuristic multi-statement expansion; always flagged for review.
    Complex,
    /// No acceptable target emission exists.
    Impossible,
}

/// One versioned mapping from a source API signature to its target
/// equivalent. At most one mapping exists per `(source_signature, version)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMapping {
    pub id: String,
    pub source_signature: String,
    pub target_equivalent: String,
    pub conversion_type: ConversionType,
    pub version: u32,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub example_usage: Option<String>,
}

impl ApiMapping {
    pub fn is_unsupported(&self) -> bool {
        self.conversion_type == ConversionType::Impossible
    }
}
