// modbridge_script/ast - Target script tree
use serde::{Deserialize, Serialize};

/// One generated script module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ScriptProgram {
    pub imports: Vec<ScriptImport>,
    pub statements: Vec<ScriptStatement>,
}

/// `import { a, b } from "module";`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptImport {
    pub names: Vec<String>,
    pub module: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScriptStatement {
    Const {
        name: String,
        value: ScriptExpression,
    },
    Function {
        name: String,
        params: Vec<String>,
        body: Vec<ScriptStatement>,
    },
    Expression(ScriptExpression),
    Return(Option<ScriptExpression>),
    If {
        condition: ScriptExpression,
        then_branch: Vec<ScriptStatement>,
        else_branch: Option<Vec<ScriptStatement>>,
    },
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScriptExpression {
    Literal(ScriptLiteral),
    Identifier(String),
    Member {
        object: Box<ScriptExpression>,
        property: String,
    },
    Call {
        callee: Box<ScriptExpression>,
        arguments: Vec<ScriptExpression>,
    },
    /// Arrow functions always carry a block body; expression bodies are
    /// normalized away so rendering has one shape.
    Arrow {
        params: Vec<String>,
        body: Vec<ScriptStatement>,
    },
    Object(Vec<ObjectMember>),
    Binary {
        left: Box<ScriptExpression>,
        op: ScriptBinaryOp,
        right: Box<ScriptExpression>,
    },
    Unary {
        op: ScriptUnaryOp,
        operand: Box<ScriptExpression>,
    },
    Assign {
        target: Box<ScriptExpression>,
        value: Box<ScriptExpression>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectMember {
    Property { key: String, value: ScriptExpression },
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScriptLiteral {
    String(String),
    /// Canonical decimal text; the transpiler strips source-side suffixes.
    Number(String),
    Boolean(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptBinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
}

impl ScriptBinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptBinaryOp::Add => "+",
            ScriptBinaryOp::Subtract => "-",
            ScriptBinaryOp::Multiply => "*",
            ScriptBinaryOp::Divide => "/",
            ScriptBinaryOp::Modulo => "%",
            ScriptBinaryOp::Equal => "===",
            ScriptBinaryOp::NotEqual => "!==",
            ScriptBinaryOp::Less => "<",
            ScriptBinaryOp::LessEqual => "<=",
            ScriptBinaryOp::Greater => ">",
            ScriptBinaryOp::GreaterEqual => ">=",
            ScriptBinaryOp::And => "&&",
            ScriptBinaryOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptUnaryOp {
    Not,
    Minus,
}

impl ScriptUnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptUnaryOp::Not => "!",
            ScriptUnaryOp::Minus => "-",
        }
    }
}

impl ScriptExpression {
    pub fn ident(name: impl Into<String>) -> Self {
        ScriptExpression::Identifier(name.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        ScriptExpression::Literal(ScriptLiteral::String(value.into()))
    }

    pub fn number(value: impl Into<String>) -> Self {
        ScriptExpression::Literal(ScriptLiteral::Number(value.into()))
    }

    pub fn member(object: ScriptExpression, property: impl Into<String>) -> Self {
        ScriptExpression::Member {
            object: Box::new(object),
            property: property.into(),
        }
    }

    /// Builds a member chain from a dotted path: `"world.afterEvents.tick"`.
    pub fn path(dotted: &str) -> Self {
        let mut segments = dotted.split('.');
        let mut expr = ScriptExpression::ident(segments.next().unwrap_or_default());
        for segment in segments {
            expr = ScriptExpression::member(expr, segment);
        }
        expr
    }

    pub fn call(callee: ScriptExpression, arguments: Vec<ScriptExpression>) -> Self {
        ScriptExpression::Call {
            callee: Box::new(callee),
            arguments,
        }
    }

    /// Call on a dotted path: `call_path("registry.register", args)`.
    pub fn call_path(dotted: &str, arguments: Vec<ScriptExpression>) -> Self {
        Self::call(Self::path(dotted), arguments)
    }
}
