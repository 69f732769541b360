// modbridge_ir/context - Per-class symbol information for the collection pass
use modbridge_ast::{ClassDecl, Expression, Literal, TypeRef};
use std::collections::HashMap;

/// Field-level facts about one class, scanned before its members are
/// recognized: declared field types (for receiver-type lookups such as
/// `DeferredRegister<Block> BLOCKS`), field initializers (for resolving a
/// registration value passed by name), and literal constants.
#[derive(Debug, Clone, Default)]
pub struct ClassIndex {
    field_types: HashMap<String, TypeRef>,
    field_initializers: HashMap<String, Expression>,
    constants: HashMap<String, Literal>,
}

impl ClassIndex {
    pub fn scan(class: &ClassDecl) -> Self {
        let mut index = Self::default();
        for field in &class.fields {
            if let Some(field_type) = &field.field_type {
                index
                    .field_types
                    .insert(field.name.clone(), field_type.clone());
            }
            if let Some(initializer) = &field.initializer {
                index
                    .field_initializers
                    .insert(field.name.clone(), initializer.clone());
                if field.modifiers.is_static && field.modifiers.is_final {
                    if let Expression::Literal(literal, _) = initializer {
                        index.constants.insert(field.name.clone(), literal.clone());
                    }
                }
            }
        }
        index
    }

    pub fn field_type(&self, name: &str) -> Option<&TypeRef> {
        self.field_types.get(name)
    }

    pub fn field_initializer(&self, name: &str) -> Option<&Expression> {
        self.field_initializers.get(name)
    }

    pub fn constant(&self, name: &str) -> Option<&Literal> {
        self.constants.get(name)
    }

    /// String value of a constant, when the constant is a string.
    pub fn string_constant(&self, name: &str) -> Option<&str> {
        match self.constants.get(name) {
            Some(Literal::String(value)) => Some(value),
            _ => None,
        }
    }

    pub fn constants(&self) -> impl Iterator<Item = (&String, &Literal)> {
        self.constants.iter()
    }
}
