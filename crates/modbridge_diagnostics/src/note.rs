// modbridge_diagnostics/note - Note structure and taxonomy
use modbridge_ast::Span;
use serde::Serialize;

/// Note severity, ordered from least to most severe. A run's overall
/// success is computed from the highest severity recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

/// Pipeline stage that produced a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Parser,
    IrBuilder,
    MappingResolver,
    Transpiler,
    CodeGenerator,
    Engine,
}

/// One structured diagnostic, carrying enough context to locate the source
/// construct without re-running the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionNote {
    pub code: &'static str,
    pub severity: Severity,
    pub stage: Stage,
    pub file: Option<String>,
    pub span: Option<Span>,
    pub source_node_id: Option<String>,
    pub message: String,
    pub recommended_fix: Option<String>,
}

impl ConversionNote {
    pub fn new(
        code: &'static str,
        severity: Severity,
        stage: Stage,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            severity,
            stage,
            file: None,
            span: None,
            source_node_id: None,
            message: message.into(),
            recommended_fix: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_node(mut self, node_id: impl Into<String>) -> Self {
        self.source_node_id = Some(node_id.into());
        self
    }

    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.recommended_fix = Some(fix.into());
        self
    }
}

impl std::fmt::Display for ConversionNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {:?}: {}", self.code, self.severity, self.message)?;
        if let (Some(file), Some(span)) = (&self.file, &self.span) {
            write!(f, " ({file}:{span})")?;
        } else if let Some(file) = &self.file {
            write!(f, " ({file})")?;
        }
        Ok(())
    }
}
