// modbridge_ast/utils - Shared helpers over expression trees
use crate::expression::Expression;

/// Flattens an identifier / field-access chain into its dotted form.
///
/// `Registry.BLOCK` yields `Some("Registry.BLOCK")`; anything containing a
/// call, literal, or other non-name node yields `None`.
pub fn dotted_name(expr: &Expression) -> Option<String> {
    match expr {
        Expression::Identifier { name, .. } => Some(name.clone()),
        Expression::FieldAccess { receiver, name, .. } => {
            let mut base = dotted_name(receiver)?;
            base.push('.');
            base.push_str(name);
            Some(base)
        }
        _ => None,
    }
}

/// Receiver chain of a method call in dotted form, when it is a plain name
/// chain. `PlayerBlockBreakEvents.BEFORE.register(...)` yields
/// `Some("PlayerBlockBreakEvents.BEFORE")`.
pub fn call_receiver_path(expr: &Expression) -> Option<String> {
    match expr {
        Expression::MethodCall {
            receiver: Some(receiver),
            ..
        } => dotted_name(receiver),
        _ => None,
    }
}

/// Splits a `namespace:name` resource string. A missing namespace yields
/// `None`; callers supply the mod id as default.
pub fn split_resource_id(raw: &str) -> (Option<&str>, &str) {
    match raw.split_once(':') {
        Some((namespace, name)) => (Some(namespace), name),
        None => (None, raw),
    }
}
