// modbridge_script/error - Rendering failures
use thiserror::Error;

/// Error variants produced while rendering the script tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodeGenError {
    #[error("Invalid identifier '{name}' in {context}")]
    InvalidIdentifier { name: String, context: String },

    #[error("Unsupported script construct: {construct}")]
    UnsupportedConstruct { construct: String },
}
