// modbridge_engine/engine - Run orchestration and success computation
use modbridge_diagnostics::{
    ConversionNote, DiagnosticsSink, INTERNAL_FAULT, PARSE_ERROR, RUN_CANCELLED, Severity, Stage,
};
use modbridge_ir::{IrContext, ModMetadata, ParsedFile};
use modbridge_mappings::MappingTable;
use modbridge_script::ScriptCodeGenerator;
use modbridge_support::CancelToken;
use modbridge_transpiler::{RenameEntry, TranspileOptions, UnmappableFeature};
use rayon::prelude::*;
use thiserror::Error;

/// One source file handed in by the ingestion collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub path: String,
    pub text: String,
}

/// Everything a conversion run needs, fully loaded up front. The engine
/// performs no I/O of its own.
#[derive(Debug)]
pub struct ConversionRequest {
    pub metadata: ModMetadata,
    pub files: Vec<SourceFile>,
    pub mappings: MappingTable,
    pub options: TranspileOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFile {
    pub path: String,
    pub text: String,
}

/// Result of one run: generated sources, the aggregated notes, the
/// unmappable-feature list, and the rename table.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOutcome {
    pub metadata: ModMetadata,
    pub files: Vec<GeneratedFile>,
    pub notes: Vec<ConversionNote>,
    pub unmappable: Vec<UnmappableFeature>,
    pub renames: Vec<RenameEntry>,
    pub success: bool,
}

/// Request-level misuse; conversion problems never surface here, they
/// degrade into notes instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid conversion request: {reason}")]
    InvalidRequest { reason: String },
}

/// Runs one mod through the full pipeline. Cancellation is cooperative:
/// the flag is polled between files and between nodes, so a cancelled run
/// produces no partially-emitted file.
pub fn convert(
    request: &ConversionRequest,
    cancel: &CancelToken,
) -> Result<ConversionOutcome, EngineError> {
    validate(request)?;

    let sink = DiagnosticsSink::new();

    // Parse: files are independent units of work.
    let parses: Vec<Option<(ParsedFile, Vec<modbridge_parser::ParseError>)>> = request
        .files
        .par_iter()
        .map(|file| {
            if cancel.is_cancelled() {
                return None;
            }
            let outcome = modbridge_parser::parse(&file.text, &file.path);
            Some((
                ParsedFile {
                    path: file.path.clone(),
                    unit: outcome.unit,
                },
                outcome.errors,
            ))
        })
        .collect();

    let mut parsed_files = Vec::new();
    for parse in parses.into_iter().flatten() {
        let (file, errors) = parse;
        for error in errors {
            sink.push(
                ConversionNote::new(PARSE_ERROR, Severity::Error, Stage::Parser, error.to_string())
                    .with_file(file.path.clone())
                    .with_span(error.span().clone()),
            );
        }
        parsed_files.push(file);
    }

    // Build IR across the whole mod, then lower it.
    let ir: IrContext = modbridge_ir::build(&parsed_files, &request.metadata, &sink, cancel);
    let transpiled =
        modbridge_transpiler::transpile(&ir, &request.mappings, &request.options, &sink, cancel);

    // Render each module; rendering is deterministic, so identical runs
    // yield byte-identical files.
    let generator = ScriptCodeGenerator::new();
    let mut files = Vec::new();
    if !cancel.is_cancelled() {
        for module in &transpiled.modules {
            match generator.generate(&module.program) {
                Ok(text) => files.push(GeneratedFile {
                    path: module.path.clone(),
                    text,
                }),
                Err(error) => {
                    sink.push(
                        ConversionNote::new(
                            INTERNAL_FAULT,
                            Severity::Critical,
                            Stage::CodeGenerator,
                            format!("rendering '{}' failed: {error}", module.path),
                        )
                        .with_file(module.path.clone()),
                    );
                }
            }
        }
    }

    if cancel.is_cancelled() {
        files.clear();
        sink.push(ConversionNote::new(
            RUN_CANCELLED,
            Severity::Error,
            Stage::Engine,
            "conversion run was cancelled before completion",
        ));
    }

    let notes = sink.into_notes();
    let success = compute_success(&notes, request.options.strategies.allow_warnings);

    tracing::info!(
        mod_id = %request.metadata.mod_id,
        files = files.len(),
        notes = notes.len(),
        unmappable = transpiled.unmappable.len(),
        success,
        "conversion run finished"
    );

    Ok(ConversionOutcome {
        metadata: request.metadata.clone(),
        files,
        notes,
        unmappable: transpiled.unmappable,
        renames: transpiled.renames,
        success,
    })
}

fn validate(request: &ConversionRequest) -> Result<(), EngineError> {
    if request.metadata.mod_id.trim().is_empty() {
        return Err(EngineError::InvalidRequest {
            reason: "mod id must not be empty".to_string(),
        });
    }
    let mut seen = std::collections::BTreeSet::new();
    for file in &request.files {
        if !seen.insert(file.path.as_str()) {
            return Err(EngineError::InvalidRequest {
                reason: format!("duplicate source file path '{}'", file.path),
            });
        }
    }
    Ok(())
}

/// A run succeeds when nothing critical happened, and, under strict
/// warning policy, nothing error-severity either.
fn compute_success(notes: &[ConversionNote], allow_warnings: bool) -> bool {
    let worst = notes.iter().map(|note| note.severity).max();
    match worst {
        Some(Severity::Critical) => false,
        Some(Severity::Error) => allow_warnings,
        _ => true,
    }
}
