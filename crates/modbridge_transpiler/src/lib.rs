// modbridge_transpiler - Lowers the mod IR to target script trees
//! Walks the IR node by node, resolving each platform API use against the
//! mapping table and emitting the target tree. When no clean mapping
//! exists, the run's compromise strategies decide between stubs, omission,
//! and simplified forms; a fault in one node never aborts the rest of the
//! mod.

mod error;
mod lower;
mod options;
mod output;
mod rename;
mod transpiler;

pub use error::TranspileError;
pub use options::{CompromiseStrategies, TranspileOptions};
pub use output::{
    NodeState, RenameEntry, ResolvedKind, ScriptModule, TranspileOutput, UnmappableFeature,
};
pub use rename::RenameTable;
pub use transpiler::transpile;
