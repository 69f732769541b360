// modbridge_engine/report - Machine-readable run summary
use crate::engine::ConversionOutcome;
use modbridge_diagnostics::{ConversionNote, Severity};
use modbridge_ir::ModMetadata;
use modbridge_transpiler::{RenameEntry, UnmappableFeature};
use serde::Serialize;

/// Serializable summary written next to the generated sources so review
/// tooling can consume a run without re-running it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionReport {
    pub metadata: ModMetadata,
    pub success: bool,
    pub generated_files: Vec<String>,
    pub note_counts: NoteCounts,
    pub notes: Vec<ConversionNote>,
    pub unmappable: Vec<UnmappableFeature>,
    pub renames: Vec<RenameEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NoteCounts {
    pub info: usize,
    pub warning: usize,
    pub error: usize,
    pub critical: usize,
}

impl ConversionReport {
    pub fn from_outcome(outcome: &ConversionOutcome) -> Self {
        let mut counts = NoteCounts::default();
        for note in &outcome.notes {
            match note.severity {
                Severity::Info => counts.info += 1,
                Severity::Warning => counts.warning += 1,
                Severity::Error => counts.error += 1,
                Severity::Critical => counts.critical += 1,
            }
        }
        Self {
            metadata: outcome.metadata.clone(),
            success: outcome.success,
            generated_files: outcome.files.iter().map(|file| file.path.clone()).collect(),
            note_counts: counts,
            notes: outcome.notes.clone(),
            unmappable: outcome.unmappable.clone(),
            renames: outcome.renames.clone(),
        }
    }
}
