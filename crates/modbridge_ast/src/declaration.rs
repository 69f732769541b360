// modbridge_ast/declaration - Compilation units and type member declarations
use crate::annotation::Annotation;
use crate::expression::Expression;
use crate::span::Span;
use crate::statement::Block;
use crate::types::TypeRef;
use serde::{Deserialize, Serialize};

/// One parsed source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilationUnit {
    pub package: Option<String>,
    pub imports: Vec<ImportDecl>,
    pub types: Vec<ClassDecl>,
    pub span: Span,
}

impl CompilationUnit {
    pub fn empty(span: Span) -> Self {
        Self {
            package: None,
            imports: Vec::new(),
            types: Vec::new(),
            span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportDecl {
    pub path: String,
    pub is_static: bool,
    pub span: Span,
}

/// Class or interface declaration. Interfaces occur in mod sources as
/// callback containers; the distinction only matters for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    pub is_interface: bool,
    pub annotations: Vec<Annotation>,
    pub modifiers: Modifiers,
    pub superclass: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub field_type: Option<TypeRef>,
    pub annotations: Vec<Annotation>,
    pub modifiers: Modifiers,
    pub initializer: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    pub annotations: Vec<Annotation>,
    pub modifiers: Modifiers,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeRef>,
    /// Absent for abstract/interface methods.
    pub body: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub param_type: Option<TypeRef>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Modifiers {
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_final: bool,
    pub is_abstract: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Visibility {
    Public,
    Protected,
    #[default]
    PackagePrivate,
    Private,
}
