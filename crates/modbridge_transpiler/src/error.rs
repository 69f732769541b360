// modbridge_transpiler/error - Node-scoped lowering faults
use thiserror::Error;

/// Faults raised while lowering a single IR node. Always caught at the node
/// boundary: the node is skipped with a `critical` note and the rest of the
/// mod converts normally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranspileError {
    #[error("Registration '{identifier}' has an empty resource name")]
    EmptyResourceName { identifier: String },

    #[error("Event handler '{handler}' has neither a body nor a resolved reference")]
    HollowHandler { handler: String },

    #[error("Internal lowering fault: {message}")]
    Internal { message: String },
}
