// modbridge_ast/expression - Expression types
use crate::declaration::Parameter;
use crate::span::Span;
use crate::statement::Block;
use crate::types::{BinaryOp, Literal, TypeRef, UnaryOp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Literal(Literal, Span),
    Identifier {
        name: String,
        span: Span,
    },
    FieldAccess {
        receiver: Box<Expression>,
        name: String,
        span: Span,
    },
    MethodCall {
        /// `None` for unqualified calls within the enclosing class.
        receiver: Option<Box<Expression>>,
        name: String,
        arguments: Vec<Expression>,
        span: Span,
    },
    ObjectCreation {
        class_type: TypeRef,
        arguments: Vec<Expression>,
        span: Span,
    },
    Lambda {
        parameters: Vec<Parameter>,
        body: LambdaBody,
        span: Span,
    },
    /// `Receiver::method` references used as callback arguments.
    MethodReference {
        receiver: String,
        name: String,
        span: Span,
    },
    Assignment {
        target: Box<Expression>,
        value: Box<Expression>,
        span: Span,
    },
    Binary {
        left: Box<Expression>,
        op: BinaryOp,
        right: Box<Expression>,
        span: Span,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LambdaBody {
    Expression(Box<Expression>),
    Block(Block),
}

impl Expression {
    pub fn span(&self) -> &Span {
        match self {
            Expression::Literal(_, span)
            | Expression::Identifier { span, .. }
            | Expression::FieldAccess { span, .. }
            | Expression::MethodCall { span, .. }
            | Expression::ObjectCreation { span, .. }
            | Expression::Lambda { span, .. }
            | Expression::MethodReference { span, .. }
            | Expression::Assignment { span, .. }
            | Expression::Binary { span, .. }
            | Expression::Unary { span, .. } => span,
        }
    }
}
