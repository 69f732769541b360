// modbridge_parser - Tolerant parser producing per-file partial ASTs
//! Parses the Java-flavored mod source subset into a [`CompilationUnit`].
//!
//! The parser never fails outright: malformed input degrades to a partial
//! tree plus [`ParseError`]s, so one bad file cannot abort a conversion run.
//! Statements outside the supported subset are preserved as
//! [`Statement::Opaque`] nodes carrying the original text.
//!
//! Nested type declarations are hoisted into the compilation unit in
//! declaration order; member ownership is unaffected, so structural
//! containment queries keep working per class.

use modbridge_ast::{CompilationUnit, Span};
use thiserror::Error;

mod parser;

#[cfg(test)]
mod tests;

/// Parse problems, all recoverable at file granularity.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Syntax error: {message}")]
    Syntax { message: String, span: Span },

    #[error("Unexpected end of file: expected {expected}")]
    UnexpectedEof { expected: String, span: Span },
}

impl ParseError {
    pub fn span(&self) -> &Span {
        match self {
            ParseError::Syntax { span, .. } | ParseError::UnexpectedEof { span, .. } => span,
        }
    }
}

/// Result of parsing one file: always a (possibly partial) tree, plus every
/// problem encountered along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub unit: CompilationUnit,
    pub errors: Vec<ParseError>,
}

impl ParseOutcome {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parses `source` into a compilation unit. `file_path` is used only for
/// trace output; span information ties errors back to the text.
pub fn parse(source: &str, file_path: &str) -> ParseOutcome {
    let (tokens, lex_errors) = modbridge_lexer::tokenize(source);
    let mut errors: Vec<ParseError> = lex_errors
        .iter()
        .map(|error| {
            let (line, column) = error.position();
            ParseError::Syntax {
                message: error.to_string(),
                span: Span::point(line, column),
            }
        })
        .collect();

    let mut parser = parser::Parser::new(source, tokens);
    let unit = parser.parse_compilation_unit();
    errors.extend(parser.into_errors());

    tracing::debug!(
        file = file_path,
        types = unit.types.len(),
        errors = errors.len(),
        "parsed source file"
    );

    ParseOutcome { unit, errors }
}
