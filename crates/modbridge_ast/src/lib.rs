// modbridge_ast - Abstract Syntax Tree definitions for Java-platform mod sources
//! This crate provides the AST produced by the source parser: one
//! [`CompilationUnit`] per file, covering the subset of the source language
//! that mod registration, event binding, and handler logic are written in.
//!
//! Trees are immutable once produced and owned by the per-file parse result
//! that created them; later pipeline stages only borrow them.

pub mod annotation;
pub mod declaration;
pub mod expression;
pub mod span;
pub mod statement;
pub mod types;
pub mod utils;

pub use annotation::*;
pub use declaration::*;
pub use expression::*;
pub use span::*;
pub use statement::*;
pub use types::*;
pub use utils::*;

#[cfg(test)]
mod tests;
