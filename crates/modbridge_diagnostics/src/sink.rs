// modbridge_diagnostics/sink - Concurrent append-only note collector
use crate::note::{ConversionNote, Severity};
use std::sync::{Mutex, MutexGuard};

/// Append-only collector shared by all pipeline stages. Parallel per-file
/// work emits concurrently; the lock is held only for the push. A poisoned
/// lock is recovered rather than propagated: notes are never mutated after
/// append, so the data is valid regardless of where a panic happened.
#[derive(Debug, Default)]
pub struct DiagnosticsSink {
    notes: Mutex<Vec<ConversionNote>>,
}

impl DiagnosticsSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<ConversionNote>> {
        match self.notes.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn push(&self, note: ConversionNote) {
        self.guard().push(note);
    }

    pub fn extend(&self, notes: impl IntoIterator<Item = ConversionNote>) {
        self.guard().extend(notes);
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the notes recorded so far, in emission order.
    pub fn snapshot(&self) -> Vec<ConversionNote> {
        self.guard().clone()
    }

    pub fn into_notes(self) -> Vec<ConversionNote> {
        match self.notes.into_inner() {
            Ok(notes) => notes,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn has_severity(&self, severity: Severity) -> bool {
        self.guard().iter().any(|note| note.severity >= severity)
    }

    pub fn max_severity(&self) -> Option<Severity> {
        self.guard().iter().map(|note| note.severity).max()
    }
}
