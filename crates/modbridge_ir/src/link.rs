// modbridge_ir/link - Pass 2: whole-mod reference resolution
use crate::types::{IrNode, IrNodeKind, NodeId};
use modbridge_diagnostics::{ConversionNote, Severity, Stage, UNRESOLVED_REFERENCE};
use std::collections::HashMap;

/// Resolves identifier references between nodes across the whole mod.
/// Registration symbols and helper names are indexed both bare and
/// class-qualified, because source ecosystems routinely split registration
/// and behavior across files.
pub(crate) fn link(nodes: &mut [IrNode], notes: &mut Vec<ConversionNote>) {
    let mut registration_index: HashMap<String, NodeId> = HashMap::new();
    let mut logic_index: HashMap<String, NodeId> = HashMap::new();

    for node in nodes.iter() {
        match &node.kind {
            IrNodeKind::Registration(registration) => {
                if let Some(symbol) = &registration.symbol {
                    registration_index
                        .entry(symbol.clone())
                        .or_insert_with(|| node.id.clone());
                    registration_index
                        .entry(format!("{}.{}", registration.owner_class, symbol))
                        .or_insert_with(|| node.id.clone());
                }
            }
            IrNodeKind::LogicBlock(block) => {
                logic_index
                    .entry(block.name.clone())
                    .or_insert_with(|| node.id.clone());
                logic_index
                    .entry(format!("{}.{}", block.owner_class, block.name))
                    .or_insert_with(|| node.id.clone());
            }
            _ => {}
        }
    }

    for node in nodes.iter_mut() {
        let node_id = node.id.clone();
        let file = node.file.clone();
        let span = node.span.clone();
        if let IrNodeKind::EventHandler(handler) = &mut node.kind {
            let mut references = Vec::new();
            let mut resolved_any = false;
            for symbol in &handler.referenced_symbols {
                let target = registration_index
                    .get(symbol)
                    .or_else(|| logic_index.get(symbol));
                if let Some(target) = target {
                    resolved_any = true;
                    if !references.contains(target) {
                        references.push(target.clone());
                    }
                }
            }

            // A handler registered by method reference has no body of its
            // own; failing to find the referenced method leaves nothing to
            // emit, which a reviewer must know about.
            if handler.body.is_none() && !resolved_any {
                notes.push(
                    ConversionNote::new(
                        UNRESOLVED_REFERENCE,
                        Severity::Warning,
                        Stage::IrBuilder,
                        format!(
                            "handler for '{}' references '{}' which was not found in this mod",
                            handler.event,
                            handler.referenced_symbols.join("', '"),
                        ),
                    )
                    .with_file(file.clone())
                    .with_span(span.clone())
                    .with_node(node_id.to_string()),
                );
            }

            handler.references = references;
        }
    }
}
