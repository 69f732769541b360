// modbridge_transpiler/options - Run-level lowering policy
use serde::{Deserialize, Serialize};

/// Fidelity-versus-completeness policy applied when no clean mapping
/// exists. Supplied per run by the calling collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompromiseStrategies {
    /// Emit no-op stubs for unmappable APIs instead of dropping them.
    pub allow_stubs: bool,
    /// Treat `error`-severity notes as acceptable; when false, any error
    /// escalates the file's result to failed.
    pub allow_warnings: bool,
    /// Let complex mappings use a simpler but lossy form instead of the
    /// full multi-statement expansion.
    pub allow_simplifications: bool,
}

impl Default for CompromiseStrategies {
    fn default() -> Self {
        Self {
            allow_stubs: true,
            allow_warnings: true,
            allow_simplifications: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranspileOptions {
    /// Mapping-table version the mod targets.
    pub api_version: u32,
    pub strategies: CompromiseStrategies,
}

impl Default for TranspileOptions {
    fn default() -> Self {
        Self {
            api_version: 1,
            strategies: CompromiseStrategies::default(),
        }
    }
}
