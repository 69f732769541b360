// modbridge_ast/annotation - Annotation usages attached to declarations
use crate::span::Span;
use crate::types::Literal;
use serde::{Deserialize, Serialize};

/// Annotation usage such as `@Mod("examplemod")` or
/// `@Mod.EventBusSubscriber(modid = "examplemod")`.
///
/// The name keeps its dotted form as written; `@ObjectHolder` and
/// `@Mod.EventBusSubscriber` are therefore distinguishable without any
/// import resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    pub arguments: Vec<AnnotationArgument>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnnotationArgument {
    Positional(Literal),
    Named { name: String, value: Literal },
}

impl Annotation {
    pub fn new(name: impl Into<String>, arguments: Vec<AnnotationArgument>, span: Span) -> Self {
        Self {
            name: name.into(),
            arguments,
            span,
        }
    }

    /// Last segment of the annotation name: `Mod.EventBusSubscriber` yields
    /// `EventBusSubscriber`.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Sole positional string argument, the common shape for marker
    /// annotations like `@ObjectHolder("ns:name")`.
    pub fn single_string_argument(&self) -> Option<&str> {
        match self.arguments.as_slice() {
            [AnnotationArgument::Positional(Literal::String(value))] => Some(value),
            _ => None,
        }
    }

    /// Named string argument lookup, e.g. `modid` in
    /// `@Mod.EventBusSubscriber(modid = "examplemod")`.
    pub fn named_string_argument(&self, name: &str) -> Option<&str> {
        self.arguments.iter().find_map(|argument| match argument {
            AnnotationArgument::Named {
                name: key,
                value: Literal::String(value),
            } if key == name => Some(value.as_str()),
            _ => None,
        })
    }
}
