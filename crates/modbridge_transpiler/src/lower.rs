// modbridge_transpiler/lower - Statement and expression lowering
use crate::options::CompromiseStrategies;
use crate::output::UnmappableFeature;
use crate::rename::RenameTable;
use modbridge_ast::{
    BinaryOp, Block, Expression, LambdaBody, Literal, Span, Statement, UnaryOp, dotted_name,
};
use modbridge_diagnostics::{
    COMPLEX_CONVERSION, ConversionNote, Severity, Stage, UNMAPPED_API, UNSUPPORTED_API,
    WRAPPER_BRIDGE,
};
use modbridge_ir::{IrContext, IrNodeKind};
use modbridge_mappings::{ApiMapping, ConversionType, MappingTable};
use modbridge_script::{
    ScriptBinaryOp, ScriptExpression, ScriptLiteral, ScriptStatement, ScriptUnaryOp,
};
use std::collections::HashMap;

/// Marker for an unmapped call when stubs are disallowed; the enclosing
/// statement is omitted.
pub(crate) struct UnmappedCall;

/// A stub the module must emit: a no-op function standing in for an API
/// with no target equivalent.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StubRequest {
    pub signature: String,
    pub file: String,
    pub line: usize,
}

/// Deterministic stub function name for a signature.
pub(crate) fn stub_name(signature: &str) -> String {
    let sanitized: String = signature
        .chars()
        .map(|ch| if ch.is_alphanumeric() { ch } else { '_' })
        .collect();
    format!("stub_{sanitized}")
}

/// Output module stem for a source file path:
/// `src/ModBlocks.java` -> `mod_blocks`.
pub(crate) fn module_stem(file: &str) -> String {
    let stem = file
        .rsplit('/')
        .next()
        .unwrap_or(file)
        .trim_end_matches(".java");
    let mut result = String::new();
    for (index, ch) in stem.chars().enumerate() {
        if ch.is_uppercase() {
            if index > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else if ch.is_alphanumeric() {
            result.push(ch);
        } else {
            result.push('_');
        }
    }
    if result.is_empty() {
        result.push_str("module");
    }
    result
}

/// Lowers one body (handler or logic block) with its own scope. Collects
/// notes, unmappable features, stub requests, and import needs for the
/// transpiler to drain afterwards.
pub(crate) struct BodyLowerer<'a> {
    pub ir: &'a IrContext,
    pub table: &'a MappingTable,
    pub api_version: u32,
    pub strategies: CompromiseStrategies,
    pub renames: &'a mut RenameTable,
    pub node_id: String,
    pub file: String,
    /// Variable name to simple type name, from parameters and locals.
    pub scope: HashMap<String, String>,
    pub notes: Vec<ConversionNote>,
    pub unmappable: Vec<UnmappableFeature>,
    pub stub_requests: Vec<StubRequest>,
    /// Absolute target paths whose root may need an import.
    pub import_paths: Vec<String>,
    /// Cross-module helper calls: (defining source file, function name).
    pub helper_imports: Vec<(String, String)>,
}

impl<'a> BodyLowerer<'a> {
    pub(crate) fn new(
        ir: &'a IrContext,
        table: &'a MappingTable,
        api_version: u32,
        strategies: CompromiseStrategies,
        renames: &'a mut RenameTable,
        node_id: String,
        file: String,
        parameters: impl IntoIterator<Item = (String, Option<String>)>,
    ) -> Self {
        let scope = parameters
            .into_iter()
            .filter_map(|(name, type_name)| type_name.map(|t| (name, t)))
            .collect();
        Self {
            ir,
            table,
            api_version,
            strategies,
            renames,
            node_id,
            file,
            scope,
            notes: Vec::new(),
            unmappable: Vec::new(),
            stub_requests: Vec::new(),
            import_paths: Vec::new(),
            helper_imports: Vec::new(),
        }
    }

    pub(crate) fn lower_block(&mut self, block: &Block) -> Vec<ScriptStatement> {
        let mut statements = Vec::new();
        for statement in &block.statements {
            if let Some(lowered) = self.lower_statement(statement) {
                statements.push(lowered);
            }
        }
        statements
    }

    fn lower_statement(&mut self, statement: &Statement) -> Option<ScriptStatement> {
        match statement {
            Statement::LocalVariable {
                name,
                var_type,
                initializer,
                ..
            } => {
                if let Some(type_name) = var_type {
                    self.scope
                        .insert(name.clone(), type_name.simple_name().to_string());
                }
                let value = match initializer {
                    Some(expr) => self.lower_expression(expr).ok()?,
                    None => ScriptExpression::Literal(ScriptLiteral::Null),
                };
                Some(ScriptStatement::Const {
                    name: safe_local(name),
                    value,
                })
            }
            Statement::Expression { expr, .. } => {
                let lowered = self.lower_expression(expr).ok()?;
                Some(ScriptStatement::Expression(lowered))
            }
            Statement::Return { value, .. } => match value {
                Some(expr) => {
                    let lowered = self.lower_expression(expr).ok()?;
                    Some(ScriptStatement::Return(Some(lowered)))
                }
                None => Some(ScriptStatement::Return(None)),
            },
            Statement::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                let condition = self.lower_expression(condition).ok()?;
                let then_branch = self.lower_block(then_branch);
                let else_branch = else_branch.as_ref().map(|block| self.lower_block(block));
                Some(ScriptStatement::If {
                    condition,
                    then_branch,
                    else_branch,
                })
            }
            Statement::Opaque { text, span } => Some(ScriptStatement::Comment(format!(
                "unconverted source ({}:{}): {}",
                self.file,
                span.start_line,
                text.replace('\n', " | ")
            ))),
        }
    }

    fn lower_expression(&mut self, expr: &Expression) -> Result<ScriptExpression, UnmappedCall> {
        match expr {
            Expression::Literal(literal, _) => Ok(lower_literal(literal)),
            Expression::Identifier { name, .. } => Ok(self.resolve_name(name)),
            Expression::FieldAccess { receiver, name, .. } => {
                if let Some(path) = dotted_name(expr) {
                    if let Some(resolved) = self.resolve_path(&path) {
                        return Ok(resolved);
                    }
                }
                let object = self.lower_expression(receiver)?;
                Ok(ScriptExpression::Member {
                    object: Box::new(object),
                    property: name.clone(),
                })
            }
            Expression::MethodCall { .. } => self.lower_call(expr),
            Expression::ObjectCreation {
                class_type,
                arguments,
                span,
            } => {
                // Construction has no structural equivalent; route it
                // through the mapping table like a call.
                let signature = format!("{}#new", class_type.simple_name());
                let lowered_args = self.lower_arguments(arguments)?;
                self.emit_mapped_call(&signature, None, lowered_args, span)
            }
            Expression::Lambda {
                parameters, body, ..
            } => {
                for parameter in parameters {
                    if let Some(ty) = &parameter.param_type {
                        self.scope
                            .insert(parameter.name.clone(), ty.simple_name().to_string());
                    }
                }
                let body = match body {
                    LambdaBody::Block(block) => self.lower_block(block),
                    LambdaBody::Expression(expr) => match self.lower_expression(expr) {
                        Ok(lowered) => vec![ScriptStatement::Return(Some(lowered))],
                        Err(unmapped) => return Err(unmapped),
                    },
                };
                Ok(ScriptExpression::Arrow {
                    params: parameters
                        .iter()
                        .map(|parameter| safe_local(&parameter.name))
                        .collect(),
                    body,
                })
            }
            Expression::MethodReference { receiver, name, .. } => {
                Ok(ScriptExpression::member(
                    ScriptExpression::ident(safe_local(receiver)),
                    name,
                ))
            }
            Expression::Assignment { target, value, .. } => {
                let target = self.lower_expression(target)?;
                let value = self.lower_expression(value)?;
                Ok(ScriptExpression::Assign {
                    target: Box::new(target),
                    value: Box::new(value),
                })
            }
            Expression::Binary {
                left, op, right, ..
            } => {
                let left = self.lower_expression(left)?;
                let right = self.lower_expression(right)?;
                Ok(ScriptExpression::Binary {
                    left: Box::new(left),
                    op: lower_binary_op(*op),
                    right: Box::new(right),
                })
            }
            Expression::Unary { op, operand, .. } => {
                let operand = self.lower_expression(operand)?;
                Ok(ScriptExpression::Unary {
                    op: match op {
                        UnaryOp::Not => ScriptUnaryOp::Not,
                        UnaryOp::Minus => ScriptUnaryOp::Minus,
                    },
                    operand: Box::new(operand),
                })
            }
        }
    }

    fn lower_arguments(
        &mut self,
        arguments: &[Expression],
    ) -> Result<Vec<ScriptExpression>, UnmappedCall> {
        arguments
            .iter()
            .map(|argument| self.lower_expression(argument))
            .collect()
    }

    fn lower_call(&mut self, expr: &Expression) -> Result<ScriptExpression, UnmappedCall> {
        let Expression::MethodCall {
            receiver,
            name,
            arguments,
            span,
        } = expr
        else {
            return Err(UnmappedCall);
        };

        match receiver {
            None => {
                // Unqualified calls are helper invocations when the mod
                // declares a matching logic block.
                if let Some(call) = self.helper_call(None, name, arguments)? {
                    return Ok(call);
                }
                let lowered_args = self.lower_arguments(arguments)?;
                self.emit_mapped_call(&format!("unknown#{name}"), None, lowered_args, span)
            }
            Some(receiver_expr) => {
                if let Some(path) = dotted_name(receiver_expr) {
                    // Class-qualified helper call across files.
                    if let Some(call) = self.helper_call(Some(&path), name, arguments)? {
                        return Ok(call);
                    }
                }
                let signature = match self.receiver_type(receiver_expr) {
                    Some(type_name) => format!("{type_name}#{name}"),
                    None => format!("unknown#{name}"),
                };
                let lowered_receiver = self.lower_expression(receiver_expr)?;
                let lowered_args = self.lower_arguments(arguments)?;
                self.emit_mapped_call(&signature, Some(lowered_receiver), lowered_args, span)
            }
        }
    }

    /// Simple type name of a call receiver, when the scope knows it.
    fn receiver_type(&self, receiver: &Expression) -> Option<String> {
        match receiver {
            Expression::Identifier { name, .. } => self.scope.get(name).cloned(),
            _ => None,
        }
    }

    /// Lowers a call to a mod-declared helper function, importing it from
    /// its defining module when necessary.
    fn helper_call(
        &mut self,
        class_path: Option<&str>,
        name: &str,
        arguments: &[Expression],
    ) -> Result<Option<ScriptExpression>, UnmappedCall> {
        let target = self.ir.nodes.iter().find(|node| {
            node.logic_block()
                .map(|block| match class_path {
                    Some(class) => block.owner_class == class && block.name == name,
                    None => block.name == name,
                })
                .unwrap_or(false)
                && !matches!(
                    &node.kind,
                    IrNodeKind::LogicBlock(block) if block.body.statements.is_empty()
                )
        });
        let Some(target) = target else {
            return Ok(None);
        };
        let function_name = self.renames.target_name(
            target
                .logic_block()
                .map(|block| block.name.as_str())
                .unwrap_or(name),
        );
        if target.file != self.file {
            self.helper_imports
                .push((target.file.clone(), function_name.clone()));
        }
        let lowered_args = self.lower_arguments(arguments)?;
        Ok(Some(ScriptExpression::call(
            ScriptExpression::ident(function_name),
            lowered_args,
        )))
    }

    /// The per-call-site mapping decision. Direct targets are relative to
    /// the receiver; wrapper and complex targets are absolute adapter paths
    /// that take the receiver as their first argument.
    fn emit_mapped_call(
        &mut self,
        signature: &str,
        receiver: Option<ScriptExpression>,
        arguments: Vec<ScriptExpression>,
        span: &Span,
    ) -> Result<ScriptExpression, UnmappedCall> {
        match self.table.resolve(signature, self.api_version) {
            Some(mapping) if mapping.conversion_type == ConversionType::Direct => {
                let target = mapping.target_equivalent.clone();
                Ok(match receiver {
                    Some(receiver) => {
                        let chained = append_path(receiver, &target);
                        if arguments.is_empty() && !target.ends_with("()") {
                            chained
                        } else {
                            ScriptExpression::Call {
                                callee: Box::new(chained),
                                arguments,
                            }
                        }
                    }
                    None => {
                        self.import_paths.push(target.clone());
                        ScriptExpression::call_path(&target, arguments)
                    }
                })
            }
            Some(mapping) if mapping.conversion_type == ConversionType::Wrapper => {
                self.push_note(
                    WRAPPER_BRIDGE,
                    Severity::Info,
                    format!(
                        "'{signature}' bridged through adapter '{}'",
                        mapping.target_equivalent
                    ),
                    span,
                    mapping,
                );
                Ok(self.adapter_call(mapping, receiver, arguments))
            }
            Some(mapping) if mapping.conversion_type == ConversionType::Complex => {
                self.push_note(
                    COMPLEX_CONVERSION,
                    Severity::Warning,
                    format!(
                        "'{signature}' expanded through '{}'; review the result",
                        mapping.target_equivalent
                    ),
                    span,
                    mapping,
                );
                Ok(self.adapter_call(mapping, receiver, arguments))
            }
            Some(mapping) => {
                // Impossible: the table says there is no equivalent.
                self.unmapped(signature, span, UNSUPPORTED_API, Some(mapping))
            }
            None => self.unmapped(signature, span, UNMAPPED_API, None),
        }
    }

    fn adapter_call(
        &mut self,
        mapping: &ApiMapping,
        receiver: Option<ScriptExpression>,
        arguments: Vec<ScriptExpression>,
    ) -> ScriptExpression {
        let target = mapping.target_equivalent.trim_end_matches("()");
        self.import_paths.push(target.to_string());
        let mut all_arguments = Vec::new();
        if let Some(receiver) = receiver {
            all_arguments.push(receiver);
        }
        all_arguments.extend(arguments);
        ScriptExpression::call_path(target, all_arguments)
    }

    fn unmapped(
        &mut self,
        signature: &str,
        span: &Span,
        code: &'static str,
        mapping: Option<&ApiMapping>,
    ) -> Result<ScriptExpression, UnmappedCall> {
        let action = mapping
            .and_then(|mapping| mapping.notes.clone())
            .unwrap_or_else(|| format!("add a mapping for '{signature}' or port the call by hand"));
        self.unmappable.push(UnmappableFeature {
            node_id: self.node_id.clone(),
            signature: signature.to_string(),
            recommended_action: action.clone(),
        });

        let severity = if self.strategies.allow_stubs {
            Severity::Warning
        } else {
            Severity::Error
        };
        let message = match code {
            UNSUPPORTED_API => format!("'{signature}' has no equivalent in the target API"),
            _ => format!("no mapping found for '{signature}'"),
        };
        self.notes.push(
            ConversionNote::new(code, severity, Stage::Transpiler, message)
                .with_file(self.file.clone())
                .with_span(span.clone())
                .with_node(self.node_id.clone())
                .with_fix(action),
        );

        if self.strategies.allow_stubs {
            self.stub_requests.push(StubRequest {
                signature: signature.to_string(),
                file: self.file.clone(),
                line: span.start_line,
            });
            Ok(ScriptExpression::call(
                ScriptExpression::ident(stub_name(signature)),
                Vec::new(),
            ))
        } else {
            Err(UnmappedCall)
        }
    }

    fn push_note(
        &mut self,
        code: &'static str,
        severity: Severity,
        message: String,
        span: &Span,
        mapping: &ApiMapping,
    ) {
        let mut note = ConversionNote::new(code, severity, Stage::Transpiler, message)
            .with_file(self.file.clone())
            .with_span(span.clone())
            .with_node(self.node_id.clone());
        if let Some(notes) = &mapping.notes {
            note = note.with_fix(notes.clone());
        }
        self.notes.push(note);
    }

    /// Resolves a bare name: scope-local first, then registration symbols,
    /// then the mod-wide constant pool.
    fn resolve_name(&mut self, name: &str) -> ScriptExpression {
        if self.scope.contains_key(name) {
            return ScriptExpression::ident(safe_local(name));
        }
        if let Some(node) = self.ir.registration_by_symbol(name) {
            if let Some(registration) = node.registration() {
                let symbol = registration
                    .symbol
                    .clone()
                    .unwrap_or_else(|| registration.identifier.name.clone());
                return ScriptExpression::ident(self.renames.target_name(&symbol));
            }
        }
        if let Some(literal) = self.ir.constants.get(name) {
            return lower_literal(literal);
        }
        ScriptExpression::ident(safe_local(name))
    }

    /// Resolves a dotted path against registration symbols and constants;
    /// `None` means the path should lower structurally.
    fn resolve_path(&mut self, path: &str) -> Option<ScriptExpression> {
        if let Some((_, field)) = path.rsplit_once('.') {
            if let Some(node) = self
                .ir
                .nodes
                .iter()
                .find(|node| {
                    node.registration()
                        .map(|registration| {
                            registration.symbol.as_deref() == Some(field)
                                && path
                                    == format!(
                                        "{}.{}",
                                        registration.owner_class,
                                        field
                                    )
                        })
                        .unwrap_or(false)
                })
            {
                let registration = node.registration()?;
                let symbol = registration.symbol.clone()?;
                return Some(ScriptExpression::ident(self.renames.target_name(&symbol)));
            }
        }
        self.ir.constants.get(path).map(lower_literal)
    }
}

/// Reserved-word guard for local names; locals never enter the global
/// rename table.
pub(crate) fn safe_local(name: &str) -> String {
    if crate::rename::is_reserved(name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

pub(crate) fn lower_literal(literal: &Literal) -> ScriptExpression {
    match literal {
        Literal::String(value) => ScriptExpression::string(value.clone()),
        Literal::Number(value) => ScriptExpression::number(canonical_number(value)),
        Literal::Boolean(value) => ScriptExpression::Literal(ScriptLiteral::Boolean(*value)),
        Literal::Character(value) => ScriptExpression::string(value.to_string()),
        Literal::Null => ScriptExpression::Literal(ScriptLiteral::Null),
    }
}

/// Strips source-side numeric suffixes and separators: `3.0f` -> `3.0`,
/// `1_000L` -> `1000`.
pub(crate) fn canonical_number(value: &str) -> String {
    let trimmed = value.trim_end_matches(['f', 'F', 'd', 'D', 'l', 'L']);
    trimmed.replace('_', "")
}

fn lower_binary_op(op: BinaryOp) -> ScriptBinaryOp {
    match op {
        BinaryOp::Add => ScriptBinaryOp::Add,
        BinaryOp::Subtract => ScriptBinaryOp::Subtract,
        BinaryOp::Multiply => ScriptBinaryOp::Multiply,
        BinaryOp::Divide => ScriptBinaryOp::Divide,
        BinaryOp::Modulo => ScriptBinaryOp::Modulo,
        BinaryOp::Equal => ScriptBinaryOp::Equal,
        BinaryOp::NotEqual => ScriptBinaryOp::NotEqual,
        BinaryOp::Less => ScriptBinaryOp::Less,
        BinaryOp::LessEqual => ScriptBinaryOp::LessEqual,
        BinaryOp::Greater => ScriptBinaryOp::Greater,
        BinaryOp::GreaterEqual => ScriptBinaryOp::GreaterEqual,
        BinaryOp::And => ScriptBinaryOp::And,
        BinaryOp::Or => ScriptBinaryOp::Or,
    }
}

/// Appends a dotted relative path onto a lowered receiver expression.
fn append_path(receiver: ScriptExpression, relative: &str) -> ScriptExpression {
    let mut expr = receiver;
    for segment in relative.trim_end_matches("()").split('.') {
        if segment.is_empty() {
            continue;
        }
        expr = ScriptExpression::member(expr, segment);
    }
    expr
}
