// modbridge_cli - CLI functionality (library interface for testing)
use anyhow::{Context, Result, bail};
use clap::Parser;
use modbridge_diagnostics::Severity;
use modbridge_engine::{ConversionOutcome, ConversionRequest, ConversionReport, SourceFile};
use modbridge_ir::{LoaderVariant, ModMetadata, ParsedFile};
use modbridge_mappings::MappingTable;
use modbridge_support::CancelToken;
use modbridge_transpiler::{CompromiseStrategies, TranspileOptions};
use std::fs;
use std::path::Path;

/// Mapping table shipped with the tool, used when no `--mappings` file is
/// given.
pub const DEFAULT_MAPPINGS: &str = include_str!("../data/default_mappings.json");

#[derive(Parser)]
#[command(name = "modbridge")]
#[command(about = "Converts Java-platform mod sources to Bedrock-style add-on scripts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Convert a mod source tree to target scripts
    Convert {
        /// Directory containing the mod's source files
        input: String,
        /// Output directory for generated scripts and the report
        #[arg(short, long, default_value = "./out")]
        output: String,
        /// Mapping table JSON file; the built-in table is used when absent
        #[arg(long)]
        mappings: Option<String>,
        /// Mod identifier; derived from the input directory name when absent
        #[arg(long)]
        mod_id: Option<String>,
        /// Source loader flavor: forge or fabric
        #[arg(long, default_value = "forge")]
        loader: String,
        /// Mapping-table version to resolve against
        #[arg(long, default_value_t = 1)]
        api_version: u32,
        /// Do not emit no-op stubs for unmappable APIs
        #[arg(long)]
        no_stubs: bool,
        /// Treat error-severity notes as run failures
        #[arg(long)]
        strict: bool,
        /// Allow simplified, lossy forms for complex mappings
        #[arg(long)]
        allow_simplifications: bool,
    },
    /// Parse and build IR only, reporting what was recognized
    Check {
        /// Directory containing the mod's source files
        input: String,
        /// Mod identifier; derived from the input directory name when absent
        #[arg(long)]
        mod_id: Option<String>,
        /// Source loader flavor: forge or fabric
        #[arg(long, default_value = "forge")]
        loader: String,
    },
    /// Inspect a mapping table
    Mappings {
        /// Mapping table JSON file; the built-in table is used when absent
        #[arg(long)]
        mappings: Option<String>,
        /// Signature to resolve
        #[arg(long)]
        signature: Option<String>,
        /// Version to resolve at
        #[arg(long, default_value_t = 1)]
        api_version: u32,
    },
    /// Show version information
    Version,
}

pub fn get_version() -> String {
    format!("modbridge {}", env!("CARGO_PKG_VERSION"))
}

/// Collects `.java` sources under `dir`, sorted by relative path so runs
/// are deterministic regardless of directory iteration order.
pub fn gather_sources(dir: &Path) -> Result<Vec<SourceFile>> {
    let mut sources = Vec::new();
    for entry in walkdir::WalkDir::new(dir) {
        let entry = entry.with_context(|| format!("walking {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|ext| ext.to_str()) != Some("java") {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(dir)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .replace('\\', "/");
        let text = fs::read_to_string(entry.path())
            .with_context(|| format!("reading {}", entry.path().display()))?;
        sources.push(SourceFile {
            path: relative,
            text,
        });
    }
    if sources.is_empty() {
        bail!("no .java sources found under {}", dir.display());
    }
    sources.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(sources)
}

pub fn load_mapping_table(path: Option<&Path>) -> Result<MappingTable> {
    let json = match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
        }
        None => DEFAULT_MAPPINGS.to_string(),
    };
    MappingTable::from_json(&json).context("loading mapping table")
}

/// Mod id derived from a directory name: lowercased, non-alphanumerics
/// collapsed to underscores.
pub fn derive_mod_id(dir: &Path) -> String {
    let name = dir
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "mod".to_string());
    let derived: String = name
        .to_lowercase()
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect();
    let trimmed = derived.trim_matches('_');
    if trimmed.is_empty() {
        "mod".to_string()
    } else {
        trimmed.to_string()
    }
}

pub struct ConvertArgs<'a> {
    pub input: &'a Path,
    pub mappings: Option<&'a Path>,
    pub mod_id: Option<&'a str>,
    pub loader: LoaderVariant,
    pub api_version: u32,
    pub strategies: CompromiseStrategies,
}

/// Gathers sources, loads the table, and runs the engine. Shared by the
/// binary and the tests.
pub fn run_convert(args: &ConvertArgs<'_>) -> Result<ConversionOutcome> {
    let files = gather_sources(args.input)?;
    let mappings = load_mapping_table(args.mappings)?;
    let metadata = ModMetadata {
        mod_id: args
            .mod_id
            .map(str::to_string)
            .unwrap_or_else(|| derive_mod_id(args.input)),
        loader: args.loader,
    };
    let request = ConversionRequest {
        metadata,
        files,
        mappings,
        options: TranspileOptions {
            api_version: args.api_version,
            strategies: args.strategies,
        },
    };
    let outcome = modbridge_engine::convert(&request, &CancelToken::new())?;
    Ok(outcome)
}

/// Writes generated scripts plus the JSON report under `out_dir`.
pub fn write_outcome(out_dir: &Path, outcome: &ConversionOutcome) -> Result<()> {
    for file in &outcome.files {
        let path = out_dir.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&path, &file.text).with_context(|| format!("writing {}", path.display()))?;
    }

    let report = ConversionReport::from_outcome(outcome);
    let json = serde_json::to_string_pretty(&report).context("serializing report")?;
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    fs::write(out_dir.join("report.json"), json).context("writing report.json")?;
    Ok(())
}

/// Human-readable run summary, one line per concern.
pub fn render_summary(outcome: &ConversionOutcome) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "mod '{}': {} file(s) generated, {} note(s), {} unmappable feature(s)",
        outcome.metadata.mod_id,
        outcome.files.len(),
        outcome.notes.len(),
        outcome.unmappable.len(),
    ));
    for note in &outcome.notes {
        if note.severity >= Severity::Warning {
            lines.push(format!("  {note}"));
        }
    }
    for feature in &outcome.unmappable {
        lines.push(format!(
            "  unmappable {} ({}): {}",
            feature.signature, feature.node_id, feature.recommended_action
        ));
    }
    lines.push(if outcome.success {
        "result: success".to_string()
    } else {
        "result: failed".to_string()
    });
    lines.join("\n")
}

/// `check`: parse and build IR only, without emission.
pub fn run_check(input: &Path, mod_id: Option<&str>, loader: LoaderVariant) -> Result<String> {
    let files = gather_sources(input)?;
    let metadata = ModMetadata {
        mod_id: mod_id
            .map(str::to_string)
            .unwrap_or_else(|| derive_mod_id(input)),
        loader,
    };

    let sink = modbridge_diagnostics::DiagnosticsSink::new();
    let mut parsed = Vec::new();
    let mut parse_errors = 0usize;
    for file in &files {
        let outcome = modbridge_parser::parse(&file.text, &file.path);
        parse_errors += outcome.errors.len();
        parsed.push(ParsedFile {
            path: file.path.clone(),
            unit: outcome.unit,
        });
    }
    let ir = modbridge_ir::build(&parsed, &metadata, &sink, &CancelToken::new());

    let registrations = ir.registrations().count();
    let handlers = ir.event_handlers().count();
    let unrecognized = ir.nodes.len() - registrations - handlers;
    Ok(format!(
        "{} file(s): {} registration(s), {} event handler(s), {} other node(s), {} parse error(s)",
        files.len(),
        registrations,
        handlers,
        unrecognized,
        parse_errors,
    ))
}

#[cfg(test)]
mod tests;
