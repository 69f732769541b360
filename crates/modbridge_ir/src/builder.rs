// modbridge_ir/builder - Two-pass build orchestration
use crate::collect::{self, FileCollection};
use crate::link;
use crate::types::{IrContext, ModMetadata};
use modbridge_ast::CompilationUnit;
use modbridge_diagnostics::DiagnosticsSink;
use modbridge_support::CancelToken;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// One parsed source file handed over by the parser stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile {
    pub path: String,
    pub unit: CompilationUnit,
}

/// Builds the per-mod IR. Pass 1 (collection) runs per file and is
/// parallel; files are independent units of work. Pass 2 (linking) sees the
/// whole mod and runs single-threaded. Notes are appended to the sink in
/// file order regardless of worker scheduling, so repeated runs produce
/// identical diagnostics lists.
pub fn build(
    files: &[ParsedFile],
    metadata: &ModMetadata,
    sink: &DiagnosticsSink,
    cancel: &CancelToken,
) -> IrContext {
    let collections: Vec<FileCollection> = files
        .par_iter()
        .map(|file| {
            if cancel.is_cancelled() {
                return FileCollection::default();
            }
            collect::collect_file(&file.path, &file.unit, metadata)
        })
        .collect();

    let mut nodes = Vec::new();
    let mut constants = BTreeMap::new();
    for collection in collections {
        sink.extend(collection.notes);
        for (key, literal) in collection.constants {
            constants.entry(key).or_insert(literal);
        }
        nodes.extend(collection.nodes);
    }

    if !cancel.is_cancelled() {
        let mut link_notes = Vec::new();
        link::link(&mut nodes, &mut link_notes);
        sink.extend(link_notes);
    }

    tracing::debug!(
        files = files.len(),
        nodes = nodes.len(),
        constants = constants.len(),
        "built mod IR"
    );

    IrContext {
        metadata: metadata.clone(),
        nodes,
        constants,
    }
}
