// modbridge_transpiler/output - Transpilation results
use modbridge_script::ScriptProgram;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-node progress through the lowering state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    Pending,
    Resolved(ResolvedKind),
    Emitted,
    Unmapped,
    StubEmitted,
    Omitted,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedKind {
    Direct,
    Wrapper,
    Complex,
}

/// A source construct for which no acceptable target emission was produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnmappableFeature {
    pub node_id: String,
    pub signature: String,
    pub recommended_action: String,
}

/// One identifier rename, recorded so diagnostics can show both names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenameEntry {
    pub source: String,
    pub target: String,
}

/// One generated script module, path relative to the output root.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptModule {
    pub path: String,
    pub program: ScriptProgram,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TranspileOutput {
    pub modules: Vec<ScriptModule>,
    pub unmappable: Vec<UnmappableFeature>,
    /// Final state per node ID, in ID order.
    pub states: BTreeMap<String, NodeState>,
    pub renames: Vec<RenameEntry>,
}
