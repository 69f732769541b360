// modbridge_ast/statement - Statement types
use crate::expression::Expression;
use crate::span::Span;
use crate::types::TypeRef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: Span,
}

impl Block {
    pub fn empty(span: Span) -> Self {
        Self {
            statements: Vec::new(),
            span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    LocalVariable {
        name: String,
        var_type: Option<TypeRef>,
        initializer: Option<Expression>,
        is_final: bool,
        span: Span,
    },
    Expression {
        expr: Expression,
        span: Span,
    },
    Return {
        value: Option<Expression>,
        span: Span,
    },
    If {
        condition: Expression,
        then_branch: Block,
        else_branch: Option<Block>,
        span: Span,
    },
    /// Source text the parser could not fit into the supported subset.
    /// Carried verbatim so downstream stages can surface it instead of
    /// silently dropping code.
    Opaque {
        text: String,
        span: Span,
    },
}

impl Statement {
    pub fn span(&self) -> &Span {
        match self {
            Statement::LocalVariable { span, .. }
            | Statement::Expression { span, .. }
            | Statement::Return { span, .. }
            | Statement::If { span, .. }
            | Statement::Opaque { span, .. } => span,
        }
    }
}
