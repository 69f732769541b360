// modbridge_script/config - Code generation options
use serde::{Deserialize, Serialize};

/// Configuration options that drive script rendering. All options affect
/// formatting only; the generator makes no semantic decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptCodeGenConfig {
    /// Indentation string used when pretty-printing generated script.
    pub indent: String,
    /// Whether multi-line object literals end each property with a comma.
    pub trailing_commas: bool,
}

impl Default for ScriptCodeGenConfig {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            trailing_commas: true,
        }
    }
}
