// modbridge_ir/collect - Pass 1: per-file recognition and normalization
use crate::context::ClassIndex;
use crate::idiom;
use crate::types::{
    EventHandler, EventIdiom, IrNode, IrNodeKind, LogicBlock, LogicParameter, ModMetadata, NodeId,
    PropertyValue, Registration, RegistrationIdiom, RegistrationKind, RegistrationProperty,
    ResourceId, SourceFragment, UnrecognizedConstruct,
};
use modbridge_ast::{
    Block, ClassDecl, CompilationUnit, Expression, FieldDecl, LambdaBody, Literal, MethodDecl,
    Span, Statement, dotted_name,
};
use modbridge_diagnostics::{
    ConversionNote, Severity, Stage, UNRECOGNIZED_CONSTRUCT,
};

/// Everything one file contributes, kept together so the builder can append
/// notes and nodes in deterministic file order.
#[derive(Debug, Default)]
pub(crate) struct FileCollection {
    pub nodes: Vec<IrNode>,
    pub constants: Vec<(String, Literal)>,
    pub notes: Vec<ConversionNote>,
}

pub(crate) fn collect_file(
    path: &str,
    unit: &CompilationUnit,
    metadata: &ModMetadata,
) -> FileCollection {
    let mut collection = FileCollection::default();
    for (declaration, class) in unit.types.iter().enumerate() {
        collect_class(path, declaration, class, metadata, &mut collection);
    }
    collection
}

/// What one member turned out to be, before node IDs are assigned.
enum MemberOutcome {
    Registration(Registration, Span),
    Handler(EventHandler, Span),
    Logic {
        block: LogicBlock,
        span: Span,
        extracted: Vec<Extracted>,
    },
    UnknownField(FieldDecl),
    UnknownMethod(MethodDecl),
    Constant,
}

/// Registration or event binding pulled out of a method body.
enum Extracted {
    Registration(Registration, Span),
    Handler(EventHandler, Span),
}

fn collect_class(
    path: &str,
    declaration: usize,
    class: &ClassDecl,
    metadata: &ModMetadata,
    collection: &mut FileCollection,
) {
    let index = ClassIndex::scan(class);

    for (name, literal) in index.constants() {
        collection.constants.push((name.clone(), literal.clone()));
        collection
            .constants
            .push((format!("{}.{}", class.name, name), literal.clone()));
    }

    let mut outcomes = Vec::new();
    let mut recognized_any = false;

    for field in &class.fields {
        let outcome = recognize_field(field, class, &index, metadata);
        if matches!(outcome, MemberOutcome::Registration(..)) {
            recognized_any = true;
        }
        outcomes.push(outcome);
    }

    for method in &class.methods {
        let outcome = recognize_method(method, class, &index, metadata);
        match &outcome {
            MemberOutcome::Handler(..) => recognized_any = true,
            MemberOutcome::Logic { extracted, .. } if !extracted.is_empty() => {
                recognized_any = true;
            }
            _ => {}
        }
        outcomes.push(outcome);
    }

    let marker_relevant = class
        .annotations
        .iter()
        .any(|annotation| idiom::is_mod_annotation(&annotation.name))
        || class
            .interfaces
            .iter()
            .any(|interface| idiom::is_lifecycle_interface(interface.simple_name()));

    if !recognized_any && !marker_relevant {
        // Nothing conversion-relevant: one fallback node for the whole
        // class so the code is carried forward, never dropped.
        let id = NodeId::new(path, declaration, 0);
        collection.notes.push(
            ConversionNote::new(
                UNRECOGNIZED_CONSTRUCT,
                Severity::Info,
                Stage::IrBuilder,
                format!(
                    "class '{}' matches no registration or event idiom",
                    class.name
                ),
            )
            .with_file(path)
            .with_span(class.span.clone())
            .with_node(id.to_string()),
        );
        collection.nodes.push(IrNode {
            id,
            file: path.to_string(),
            span: class.span.clone(),
            parent: None,
            kind: IrNodeKind::Unrecognized(UnrecognizedConstruct {
                description: format!("class {}", class.name),
                fragment: Some(SourceFragment::Class(Box::new(class.clone()))),
            }),
        });
        return;
    }

    let mut ordinal = 0usize;
    let mut next_id = |ordinal: &mut usize| {
        let id = NodeId::new(path, declaration, *ordinal);
        *ordinal += 1;
        id
    };

    for outcome in outcomes {
        match outcome {
            MemberOutcome::Registration(registration, span) => {
                let id = next_id(&mut ordinal);
                collection.nodes.push(IrNode {
                    id,
                    file: path.to_string(),
                    span,
                    parent: None,
                    kind: IrNodeKind::Registration(registration),
                });
            }
            MemberOutcome::Handler(handler, span) => {
                let id = next_id(&mut ordinal);
                collection.nodes.push(IrNode {
                    id,
                    file: path.to_string(),
                    span,
                    parent: None,
                    kind: IrNodeKind::EventHandler(handler),
                });
            }
            MemberOutcome::Logic {
                block,
                span,
                extracted,
            } => {
                let parent_id = next_id(&mut ordinal);
                collection.nodes.push(IrNode {
                    id: parent_id.clone(),
                    file: path.to_string(),
                    span,
                    parent: None,
                    kind: IrNodeKind::LogicBlock(block),
                });
                for item in extracted {
                    let id = next_id(&mut ordinal);
                    let (kind, span) = match item {
                        Extracted::Registration(registration, span) => {
                            (IrNodeKind::Registration(registration), span)
                        }
                        Extracted::Handler(handler, span) => {
                            (IrNodeKind::EventHandler(handler), span)
                        }
                    };
                    collection.nodes.push(IrNode {
                        id,
                        file: path.to_string(),
                        span,
                        parent: Some(parent_id.clone()),
                        kind,
                    });
                }
            }
            MemberOutcome::UnknownField(field) => {
                let id = next_id(&mut ordinal);
                collection.notes.push(
                    ConversionNote::new(
                        UNRECOGNIZED_CONSTRUCT,
                        Severity::Info,
                        Stage::IrBuilder,
                        format!(
                            "field '{}.{}' matches no registration idiom",
                            class.name, field.name
                        ),
                    )
                    .with_file(path)
                    .with_span(field.span.clone())
                    .with_node(id.to_string()),
                );
                collection.nodes.push(IrNode {
                    id,
                    file: path.to_string(),
                    span: field.span.clone(),
                    parent: None,
                    kind: IrNodeKind::Unrecognized(UnrecognizedConstruct {
                        description: format!("field {}.{}", class.name, field.name),
                        fragment: Some(SourceFragment::Field(Box::new(field))),
                    }),
                });
            }
            MemberOutcome::UnknownMethod(method) => {
                let id = next_id(&mut ordinal);
                collection.notes.push(
                    ConversionNote::new(
                        UNRECOGNIZED_CONSTRUCT,
                        Severity::Info,
                        Stage::IrBuilder,
                        format!(
                            "method '{}.{}' has no body to convert",
                            class.name, method.name
                        ),
                    )
                    .with_file(path)
                    .with_span(method.span.clone())
                    .with_node(id.to_string()),
                );
                collection.nodes.push(IrNode {
                    id,
                    file: path.to_string(),
                    span: method.span.clone(),
                    parent: None,
                    kind: IrNodeKind::Unrecognized(UnrecognizedConstruct {
                        description: format!("method {}.{}", class.name, method.name),
                        fragment: Some(SourceFragment::Method(Box::new(method))),
                    }),
                });
            }
            MemberOutcome::Constant => {}
        }
    }
}

fn recognize_field(
    field: &FieldDecl,
    class: &ClassDecl,
    index: &ClassIndex,
    metadata: &ModMetadata,
) -> MemberOutcome {
    // Annotation-declarative registration: @ObjectHolder("ns:name").
    if let Some(annotation) = field
        .annotations
        .iter()
        .find(|annotation| annotation.simple_name() == "ObjectHolder")
    {
        if let Some(raw) = annotation.single_string_argument() {
            if let Some(kind) = field
                .field_type
                .as_ref()
                .and_then(|ty| idiom::kind_for_type(ty.simple_name()))
            {
                return MemberOutcome::Registration(
                    Registration {
                        kind,
                        identifier: ResourceId::parse(raw, &metadata.mod_id),
                        symbol: Some(field.name.clone()),
                        owner_class: class.name.clone(),
                        idiom: RegistrationIdiom::AnnotationHolder,
                        properties: Vec::new(),
                    },
                    field.span.clone(),
                );
            }
        }
    }

    // Deferred factory-lambda registration:
    // RegistryObject<Block> X = BLOCKS.register("name", () -> new Block(...)).
    if let Some(Expression::MethodCall {
        receiver: Some(receiver),
        name,
        arguments,
        ..
    }) = &field.initializer
    {
        if name == "register" && arguments.len() == 2 {
            if let Some(receiver_path) = dotted_name(receiver) {
                let receiver_simple = receiver_path.rsplit('.').next().unwrap_or(&receiver_path);
                let kind = field
                    .field_type
                    .as_ref()
                    .and_then(idiom::kind_for_container_type)
                    .or_else(|| {
                        index
                            .field_type(receiver_simple)
                            .and_then(idiom::kind_for_container_type)
                    })
                    .or_else(|| idiom::kind_for_receiver_name(receiver_simple));
                if let Some(kind) = kind {
                    let registered_name =
                        string_argument(&arguments[0], index).unwrap_or_else(|| field.name.to_lowercase());
                    let properties = factory_properties(&arguments[1], kind);
                    return MemberOutcome::Registration(
                        Registration {
                            kind,
                            identifier: ResourceId::parse(&registered_name, &metadata.mod_id),
                            symbol: Some(field.name.clone()),
                            owner_class: class.name.clone(),
                            idiom: RegistrationIdiom::DeferredFactory,
                            properties,
                        },
                        field.span.clone(),
                    );
                }
            }
        }
    }

    if index.constant(&field.name).is_some() {
        return MemberOutcome::Constant;
    }
    MemberOutcome::UnknownField(field.clone())
}

fn recognize_method(
    method: &MethodDecl,
    class: &ClassDecl,
    index: &ClassIndex,
    metadata: &ModMetadata,
) -> MemberOutcome {
    let Some(body) = &method.body else {
        return MemberOutcome::UnknownMethod(method.clone());
    };

    // Annotation-declarative event binding: @SubscribeEvent methods.
    if method
        .annotations
        .iter()
        .any(|annotation| annotation.simple_name() == "SubscribeEvent")
    {
        let event = method
            .parameters
            .first()
            .and_then(|parameter| parameter.param_type.as_ref())
            .map(|ty| {
                idiom::event_for_type(ty.qualified_name())
                    .map(str::to_string)
                    .unwrap_or_else(|| ty.simple_name().to_string())
            })
            .unwrap_or_else(|| "unknown".to_string());
        let handler = EventHandler {
            event,
            idiom: EventIdiom::SubscribeAnnotation,
            handler_name: method.name.clone(),
            owner_class: class.name.clone(),
            parameters: logic_parameters(method),
            referenced_symbols: collect_symbols(body),
            body: Some(body.clone()),
            references: Vec::new(),
        };
        return MemberOutcome::Handler(handler, method.span.clone());
    }

    // Any other body is scanned for registration and event-binding calls;
    // whatever remains is the method's logic.
    let mut extracted = Vec::new();
    let mut remaining = Vec::new();
    for statement in &body.statements {
        match recognize_statement(statement, class, index, metadata) {
            Some(item) => extracted.push(item),
            None => remaining.push(statement.clone()),
        }
    }

    let block = LogicBlock {
        owner_class: class.name.clone(),
        name: method.name.clone(),
        parameters: logic_parameters(method),
        body: Block {
            statements: remaining,
            span: body.span.clone(),
        },
    };
    MemberOutcome::Logic {
        block,
        span: method.span.clone(),
        extracted,
    }
}

fn recognize_statement(
    statement: &Statement,
    class: &ClassDecl,
    index: &ClassIndex,
    metadata: &ModMetadata,
) -> Option<Extracted> {
    let Statement::Expression {
        expr:
            Expression::MethodCall {
                receiver: Some(receiver),
                name,
                arguments,
                span,
            },
        ..
    } = statement
    else {
        return None;
    };
    if name != "register" {
        return None;
    }
    let receiver_path = dotted_name(receiver)?;

    // Direct registry call: Registry.register(Registry.BLOCK, id, value).
    if idiom::is_direct_registry_receiver(&receiver_path) && arguments.len() == 3 {
        let kind = dotted_name(&arguments[0]).and_then(|path| idiom::registry_kind_for_path(&path))?;
        let identifier = resource_argument(&arguments[1], index, metadata)?;
        let (symbol, properties) = match &arguments[2] {
            Expression::Identifier { name: symbol, .. } => {
                let properties = index
                    .field_initializer(symbol)
                    .map(|initializer| creation_properties(initializer, kind))
                    .unwrap_or_default();
                (Some(symbol.clone()), properties)
            }
            creation @ Expression::ObjectCreation { .. } => {
                (None, creation_properties(creation, kind))
            }
            _ => (None, Vec::new()),
        };
        return Some(Extracted::Registration(
            Registration {
                kind,
                identifier,
                symbol,
                owner_class: class.name.clone(),
                idiom: RegistrationIdiom::DirectRegistry,
                properties,
            },
            span.clone(),
        ));
    }

    // Callback registration: PlayerBlockBreakEvents.BEFORE.register(handler).
    if arguments.len() == 1 {
        if let Some(rule) = idiom::event_rule_for_path(&receiver_path) {
            let event = rule.event;
            let handler = match &arguments[0] {
                Expression::Lambda {
                    parameters, body, ..
                } => {
                    let block = match body {
                        LambdaBody::Block(block) => block.clone(),
                        LambdaBody::Expression(expr) => Block {
                            statements: vec![Statement::Expression {
                                expr: (**expr).clone(),
                                span: expr.span().clone(),
                            }],
                            span: expr.span().clone(),
                        },
                    };
                    EventHandler {
                        event: event.to_string(),
                        idiom: EventIdiom::CallbackRegister,
                        handler_name: format!("on{}", camel_event(event)),
                        owner_class: class.name.clone(),
                        parameters: parameters
                            .iter()
                            .enumerate()
                            .map(|(position, parameter)| LogicParameter {
                                name: parameter.name.clone(),
                                type_name: parameter
                                    .param_type
                                    .as_ref()
                                    .map(|ty| ty.simple_name().to_string())
                                    .or_else(|| {
                                        rule.param_types
                                            .get(position)
                                            .map(|type_name| type_name.to_string())
                                    }),
                            })
                            .collect(),
                        referenced_symbols: collect_symbols(&block),
                        body: Some(block),
                        references: Vec::new(),
                    }
                }
                Expression::MethodReference {
                    receiver: ref_receiver,
                    name: ref_name,
                    ..
                } => EventHandler {
                    event: event.to_string(),
                    idiom: EventIdiom::CallbackRegister,
                    handler_name: ref_name.clone(),
                    owner_class: class.name.clone(),
                    parameters: Vec::new(),
                    referenced_symbols: vec![
                        format!("{ref_receiver}.{ref_name}"),
                        ref_name.clone(),
                    ],
                    body: None,
                    references: Vec::new(),
                },
                _ => return None,
            };
            return Some(Extracted::Handler(handler, span.clone()));
        }
    }

    None
}

fn logic_parameters(method: &MethodDecl) -> Vec<LogicParameter> {
    method
        .parameters
        .iter()
        .map(|parameter| LogicParameter {
            name: parameter.name.clone(),
            type_name: parameter
                .param_type
                .as_ref()
                .map(|ty| ty.simple_name().to_string()),
        })
        .collect()
}

/// `player.breakBlock` -> `PlayerBreakBlock`, used to synthesize a handler
/// name for anonymous lambdas.
fn camel_event(event: &str) -> String {
    event
        .split(['.', ':'])
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// String value of a call argument: a literal, or a same-class constant.
fn string_argument(expr: &Expression, index: &ClassIndex) -> Option<String> {
    match expr {
        Expression::Literal(Literal::String(value), _) => Some(value.clone()),
        Expression::Identifier { name, .. } => {
            index.string_constant(name).map(str::to_string)
        }
        Expression::FieldAccess { name, .. } => {
            index.string_constant(name).map(str::to_string)
        }
        _ => None,
    }
}

/// Resource identity from a registration's identifier argument: either a
/// `new Identifier(ns, name)` / `new ResourceLocation(ns, name)` creation or
/// a plain `"ns:name"` string.
fn resource_argument(
    expr: &Expression,
    index: &ClassIndex,
    metadata: &ModMetadata,
) -> Option<ResourceId> {
    match expr {
        Expression::ObjectCreation {
            class_type,
            arguments,
            ..
        } if matches!(class_type.simple_name(), "Identifier" | "ResourceLocation") => {
            match arguments.len() {
                1 => string_argument(&arguments[0], index)
                    .map(|raw| ResourceId::parse(&raw, &metadata.mod_id)),
                2 => {
                    let namespace = string_argument(&arguments[0], index)
                        .unwrap_or_else(|| metadata.mod_id.clone());
                    let name = string_argument(&arguments[1], index)?;
                    Some(ResourceId::new(namespace, name))
                }
                _ => None,
            }
        }
        _ => string_argument(expr, index).map(|raw| ResourceId::parse(&raw, &metadata.mod_id)),
    }
}

/// Properties from a factory argument: a lambda producing an object
/// creation, or a method reference (no properties recoverable).
fn factory_properties(expr: &Expression, kind: RegistrationKind) -> Vec<RegistrationProperty> {
    match expr {
        Expression::Lambda { body, .. } => match body {
            LambdaBody::Expression(inner) => creation_properties(inner, kind),
            LambdaBody::Block(block) => block
                .statements
                .iter()
                .find_map(|statement| match statement {
                    Statement::Return {
                        value: Some(value), ..
                    } => Some(creation_properties(value, kind)),
                    _ => None,
                })
                .unwrap_or_default(),
        },
        _ => Vec::new(),
    }
}

/// Property-setter calls chained onto a construction argument, e.g.
/// `new Block(Properties.of().strength(3.0f).sound(SoundType.STONE))`.
/// Structural rule: a chain link is a property when its receiver is itself
/// a call or construction; a link whose receiver is a plain name path is
/// the factory base and carries no property.
fn creation_properties(expr: &Expression, kind: RegistrationKind) -> Vec<RegistrationProperty> {
    let Expression::ObjectCreation { arguments, .. } = expr else {
        return Vec::new();
    };
    let mut properties = Vec::new();
    for argument in arguments {
        collect_property_chain(argument, kind, &mut properties);
    }
    properties
}

fn collect_property_chain(
    expr: &Expression,
    kind: RegistrationKind,
    out: &mut Vec<RegistrationProperty>,
) {
    let Expression::MethodCall {
        receiver: Some(receiver),
        name,
        arguments,
        span,
    } = expr
    else {
        return;
    };

    collect_property_chain(receiver, kind, out);

    let receiver_is_chain = matches!(
        receiver.as_ref(),
        Expression::MethodCall { .. } | Expression::ObjectCreation { .. }
    );
    if receiver_is_chain {
        out.push(RegistrationProperty {
            name: name.clone(),
            signature: format!("{}#{}", kind.property_prefix(), name),
            arguments: arguments.iter().map(property_value).collect(),
            span: span.clone(),
        });
    }
}

fn property_value(expr: &Expression) -> PropertyValue {
    match expr {
        Expression::Literal(Literal::Number(value), _) => PropertyValue::Number(value.clone()),
        Expression::Literal(Literal::String(value), _) => PropertyValue::String(value.clone()),
        Expression::Literal(Literal::Boolean(value), _) => PropertyValue::Boolean(*value),
        Expression::Literal(Literal::Character(value), _) => {
            PropertyValue::String(value.to_string())
        }
        Expression::Literal(Literal::Null, _) => PropertyValue::Reference("null".to_string()),
        other => PropertyValue::Reference(
            dotted_name(other).unwrap_or_else(|| "<expression>".to_string()),
        ),
    }
}

/// Identifiers a handler body mentions, in first-appearance order: plain
/// names and two-segment `Class.FIELD` accesses. The link pass matches
/// these against mod-wide registration symbols.
fn collect_symbols(block: &Block) -> Vec<String> {
    let mut symbols = Vec::new();
    for statement in &block.statements {
        collect_statement_symbols(statement, &mut symbols);
    }
    symbols
}

fn collect_statement_symbols(statement: &Statement, out: &mut Vec<String>) {
    match statement {
        Statement::LocalVariable { initializer, .. } => {
            if let Some(initializer) = initializer {
                collect_expression_symbols(initializer, out);
            }
        }
        Statement::Expression { expr, .. } => collect_expression_symbols(expr, out),
        Statement::Return { value, .. } => {
            if let Some(value) = value {
                collect_expression_symbols(value, out);
            }
        }
        Statement::If {
            condition,
            then_branch,
            else_branch,
            ..
        } => {
            collect_expression_symbols(condition, out);
            for inner in &then_branch.statements {
                collect_statement_symbols(inner, out);
            }
            if let Some(else_branch) = else_branch {
                for inner in &else_branch.statements {
                    collect_statement_symbols(inner, out);
                }
            }
        }
        Statement::Opaque { .. } => {}
    }
}

fn push_symbol(out: &mut Vec<String>, symbol: String) {
    if !out.contains(&symbol) {
        out.push(symbol);
    }
}

fn collect_expression_symbols(expr: &Expression, out: &mut Vec<String>) {
    match expr {
        Expression::Identifier { name, .. } => push_symbol(out, name.clone()),
        Expression::FieldAccess { .. } => {
            if let Some(path) = dotted_name(expr) {
                push_symbol(out, path);
            }
        }
        Expression::MethodCall {
            receiver,
            arguments,
            ..
        } => {
            if let Some(receiver) = receiver {
                collect_expression_symbols(receiver, out);
            }
            for argument in arguments {
                collect_expression_symbols(argument, out);
            }
        }
        Expression::ObjectCreation { arguments, .. } => {
            for argument in arguments {
                collect_expression_symbols(argument, out);
            }
        }
        Expression::Lambda { body, .. } => match body {
            LambdaBody::Expression(inner) => collect_expression_symbols(inner, out),
            LambdaBody::Block(block) => {
                for statement in &block.statements {
                    collect_statement_symbols(statement, out);
                }
            }
        },
        Expression::MethodReference { receiver, name, .. } => {
            push_symbol(out, format!("{receiver}.{name}"));
        }
        Expression::Assignment { target, value, .. } => {
            collect_expression_symbols(target, out);
            collect_expression_symbols(value, out);
        }
        Expression::Binary { left, right, .. } => {
            collect_expression_symbols(left, out);
            collect_expression_symbols(right, out);
        }
        Expression::Unary { operand, .. } => collect_expression_symbols(operand, out),
        Expression::Literal(..) => {}
    }
}
