// modbridge_ast/types - Literals, operators, and type references
use serde::{Deserialize, Serialize};

/// Literal values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    String(String),
    /// Kept as written (including any numeric suffix) to preserve precision.
    Number(String),
    Boolean(bool),
    Character(char),
    Null,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    // Comparison
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    // Logical
    And,
    Or,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Minus,
}

/// Source-side type references as written in declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeRef {
    Named(String),
    Generic {
        name: String,
        type_args: Vec<TypeRef>,
    },
    Array(Box<TypeRef>),
}

impl TypeRef {
    /// Outermost type name, ignoring generic arguments, array dimensions,
    /// and any package qualifier: `net.minecraft.world.level.block.Block`
    /// yields `Block`.
    pub fn simple_name(&self) -> &str {
        let name = match self {
            TypeRef::Named(name) => name,
            TypeRef::Generic { name, .. } => name,
            TypeRef::Array(element) => return element.simple_name(),
        };
        name.rsplit('.').next().unwrap_or(name)
    }

    /// Full dotted name as written, without generic arguments.
    pub fn qualified_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::Generic { name, .. } => name,
            TypeRef::Array(element) => element.qualified_name(),
        }
    }

    /// First generic argument, when present. `RegistryObject<Block>` yields `Block`.
    pub fn first_type_arg(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Generic { type_args, .. } => type_args.first(),
            _ => None,
        }
    }
}
