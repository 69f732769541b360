// modbridge_transpiler/transpiler - Node state machine and emission
use crate::error::TranspileError;
use crate::lower::{
    BodyLowerer, StubRequest, canonical_number, module_stem, safe_local, stub_name,
};
use crate::options::TranspileOptions;
use crate::output::{
    NodeState, ResolvedKind, ScriptModule, TranspileOutput, UnmappableFeature,
};
use crate::rename::RenameTable;
use modbridge_diagnostics::{
    COMPLEX_CONVERSION, ConversionNote, DiagnosticsSink, INTERNAL_FAULT, SIMPLIFIED_CONVERSION,
    Severity, Stage, UNMAPPED_API, UNSUPPORTED_API, WRAPPER_BRIDGE,
};
use modbridge_ir::{
    EventHandler, IrContext, IrNode, IrNodeKind, LogicBlock, PropertyValue, Registration,
    RegistrationProperty,
};
use modbridge_mappings::{ApiMapping, ConversionType, MappingTable};
use modbridge_script::{
    ObjectMember, ScriptExpression, ScriptImport, ScriptLiteral, ScriptProgram, ScriptStatement,
};
use modbridge_support::CancelToken;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Lowers the whole mod IR against the mapping table. Single-threaded per
/// mod: nodes are processed in ID order and a fault in one node is caught
/// at its boundary.
pub fn transpile(
    ir: &IrContext,
    table: &MappingTable,
    options: &TranspileOptions,
    sink: &DiagnosticsSink,
    cancel: &CancelToken,
) -> TranspileOutput {
    let mut transpiler = Transpiler {
        ir,
        table,
        options,
        sink,
        renames: RenameTable::new(),
        modules: Vec::new(),
        module_by_file: HashMap::new(),
        used_stems: BTreeSet::new(),
        states: BTreeMap::new(),
        unmappable: Vec::new(),
    };

    for node in &ir.nodes {
        transpiler.ensure_module(&node.file);
        transpiler
            .states
            .insert(node.id.to_string(), NodeState::Pending);
    }

    for node in &ir.nodes {
        if cancel.is_cancelled() {
            break;
        }
        let state = match transpiler.process_node(node) {
            Ok(state) => state,
            Err(error) => {
                sink.push(
                    ConversionNote::new(
                        INTERNAL_FAULT,
                        Severity::Critical,
                        Stage::Transpiler,
                        format!("lowering failed: {error}"),
                    )
                    .with_file(node.file.clone())
                    .with_span(node.span.clone())
                    .with_node(node.id.to_string()),
                );
                NodeState::Aborted
            }
        };
        transpiler.states.insert(node.id.to_string(), state);
    }

    tracing::debug!(
        nodes = ir.nodes.len(),
        modules = transpiler.modules.len(),
        unmappable = transpiler.unmappable.len(),
        "transpiled mod"
    );

    let renames = transpiler.renames.entries();
    TranspileOutput {
        modules: transpiler
            .modules
            .into_iter()
            .filter(|module| !module.is_empty())
            .map(ModuleState::finish)
            .collect(),
        unmappable: transpiler.unmappable,
        states: transpiler.states,
        renames,
    }
}

/// Import module for an absolute target path's root segment. Roots outside
/// the table are assumed ambient and need no import.
fn module_for_root(root: &str) -> Option<&'static str> {
    match root {
        "world" | "system" => Some("@minecraft/server"),
        "BlockRegistry" | "ItemRegistry" | "EntityRegistry" | "RecipeRegistry" => {
            Some("@minecraft/server-registry")
        }
        "adapters" => Some("./adapters.js"),
        _ => None,
    }
}

struct ModuleState {
    stem: String,
    imports: BTreeMap<String, BTreeSet<String>>,
    statements: Vec<ScriptStatement>,
    stubs: Vec<StubRequest>,
    stub_signatures: BTreeSet<String>,
}

impl ModuleState {
    fn new(stem: String) -> Self {
        Self {
            stem,
            imports: BTreeMap::new(),
            statements: Vec::new(),
            stubs: Vec::new(),
            stub_signatures: BTreeSet::new(),
        }
    }

    fn note_import(&mut self, target_path: &str) {
        let root = target_path.split('.').next().unwrap_or(target_path);
        if let Some(module) = module_for_root(root) {
            self.imports
                .entry(module.to_string())
                .or_default()
                .insert(root.to_string());
        }
    }

    fn note_named_import(&mut self, module: String, name: String) {
        self.imports.entry(module).or_default().insert(name);
    }

    fn request_stub(&mut self, request: StubRequest) {
        if self.stub_signatures.insert(request.signature.clone()) {
            self.stubs.push(request);
        }
    }

    fn is_empty(&self) -> bool {
        self.statements.is_empty() && self.stubs.is_empty()
    }

    fn finish(self) -> ScriptModule {
        let mut statements = self.statements;
        for stub in &self.stubs {
            statements.push(ScriptStatement::Function {
                name: stub_name(&stub.signature),
                params: Vec::new(),
                body: vec![ScriptStatement::Comment(format!(
                    "no equivalent for {} ({}:{})",
                    stub.signature, stub.file, stub.line
                ))],
            });
        }
        ScriptModule {
            path: format!("scripts/{}.js", self.stem),
            program: ScriptProgram {
                imports: self
                    .imports
                    .into_iter()
                    .map(|(module, names)| ScriptImport {
                        names: names.into_iter().collect(),
                        module,
                    })
                    .collect(),
                statements,
            },
        }
    }
}

struct Transpiler<'a> {
    ir: &'a IrContext,
    table: &'a MappingTable,
    options: &'a TranspileOptions,
    sink: &'a DiagnosticsSink,
    renames: RenameTable,
    modules: Vec<ModuleState>,
    module_by_file: HashMap<String, usize>,
    used_stems: BTreeSet<String>,
    states: BTreeMap<String, NodeState>,
    unmappable: Vec<UnmappableFeature>,
}

impl<'a> Transpiler<'a> {
    fn ensure_module(&mut self, file: &str) -> usize {
        if let Some(&index) = self.module_by_file.get(file) {
            return index;
        }
        let mut stem = module_stem(file);
        let mut suffix = 2usize;
        while !self.used_stems.insert(stem.clone()) {
            stem = format!("{}_{}", module_stem(file), suffix);
            suffix += 1;
        }
        let index = self.modules.len();
        self.modules.push(ModuleState::new(stem));
        self.module_by_file.insert(file.to_string(), index);
        index
    }

    fn stem_for_file(&self, file: &str) -> Option<String> {
        self.module_by_file
            .get(file)
            .map(|&index| self.modules[index].stem.clone())
    }

    fn resolve_node_mapping(&self, signature: &str) -> Option<ApiMapping> {
        self.table
            .resolve(signature, self.options.api_version)
            .cloned()
    }

    fn process_node(&mut self, node: &IrNode) -> Result<NodeState, TranspileError> {
        let module = self.ensure_module(&node.file);
        match &node.kind {
            IrNodeKind::Registration(registration) => {
                self.emit_registration(node, registration, module)
            }
            IrNodeKind::EventHandler(handler) => self.emit_handler(node, handler, module),
            IrNodeKind::LogicBlock(block) => self.emit_logic(node, block, module),
            IrNodeKind::Unrecognized(_) => Ok(NodeState::Omitted),
        }
    }

    // ---- registrations ----

    fn emit_registration(
        &mut self,
        node: &IrNode,
        registration: &Registration,
        module: usize,
    ) -> Result<NodeState, TranspileError> {
        if registration.identifier.name.is_empty() {
            return Err(TranspileError::EmptyResourceName {
                identifier: registration.identifier.to_string(),
            });
        }

        let signature = registration.kind.registry_signature();
        let mapping = match self.resolve_node_mapping(signature) {
            Some(mapping) if mapping.conversion_type != ConversionType::Impossible => mapping,
            other => return Ok(self.unmapped_node(node, signature, other)),
        };
        self.mark_resolved(node, &mapping);

        let const_source = registration
            .symbol
            .clone()
            .unwrap_or_else(|| registration.identifier.name.clone());
        let const_name = self.renames.target_name(&const_source);

        let mut members = Vec::new();
        let mut deferred = Vec::new();
        for property in &registration.properties {
            self.emit_property(node, property, &const_name, &mut members, &mut deferred, module);
        }

        self.modules[module].note_import(&mapping.target_equivalent);
        self.modules[module].statements.push(ScriptStatement::Const {
            name: const_name,
            value: ScriptExpression::call_path(
                &mapping.target_equivalent,
                vec![
                    ScriptExpression::string(registration.identifier.to_string()),
                    ScriptExpression::Object(members),
                ],
            ),
        });
        self.modules[module].statements.extend(deferred);

        self.note_for_mapping(node, signature, &mapping);
        Ok(NodeState::Emitted)
    }

    fn emit_property(
        &mut self,
        node: &IrNode,
        property: &RegistrationProperty,
        const_name: &str,
        members: &mut Vec<ObjectMember>,
        deferred: &mut Vec<ScriptStatement>,
        module: usize,
    ) {
        let resolved = self
            .table
            .resolve(&property.signature, self.options.api_version)
            .cloned();
        match resolved {
            Some(mapping) if mapping.conversion_type == ConversionType::Direct => {
                members.push(ObjectMember::Property {
                    key: mapping.target_equivalent.clone(),
                    value: property_argument_value(property),
                });
            }
            Some(mapping) if mapping.conversion_type == ConversionType::Wrapper => {
                let (key, adapter) = mapping
                    .target_equivalent
                    .split_once(':')
                    .map(|(key, adapter)| (key.to_string(), adapter.to_string()))
                    .unwrap_or_else(|| {
                        (property.name.clone(), mapping.target_equivalent.clone())
                    });
                self.modules[module].note_import(&adapter);
                members.push(ObjectMember::Property {
                    key,
                    value: ScriptExpression::call_path(
                        &adapter,
                        property.arguments.iter().map(property_argument).collect(),
                    ),
                });
                self.sink.push(
                    ConversionNote::new(
                        WRAPPER_BRIDGE,
                        Severity::Info,
                        Stage::Transpiler,
                        format!(
                            "'{}' bridged through adapter '{adapter}'",
                            property.signature
                        ),
                    )
                    .with_file(node.file.clone())
                    .with_span(property.span.clone())
                    .with_node(node.id.to_string()),
                );
            }
            Some(mapping) if mapping.conversion_type == ConversionType::Complex => {
                if self.options.strategies.allow_simplifications {
                    members.push(ObjectMember::Property {
                        key: property.name.clone(),
                        value: property_argument_value(property),
                    });
                    self.sink.push(
                        ConversionNote::new(
                            SIMPLIFIED_CONVERSION,
                            Severity::Warning,
                            Stage::Transpiler,
                            format!(
                                "'{}' lowered to a simplified form instead of '{}'",
                                property.signature, mapping.target_equivalent
                            ),
                        )
                        .with_file(node.file.clone())
                        .with_span(property.span.clone())
                        .with_node(node.id.to_string()),
                    );
                } else {
                    if let Some(notes) = &mapping.notes {
                        deferred.push(ScriptStatement::Comment(format!("review: {notes}")));
                    }
                    let mut arguments = vec![ScriptExpression::ident(const_name)];
                    arguments.extend(property.arguments.iter().map(property_argument));
                    self.modules[module].note_import(&mapping.target_equivalent);
                    deferred.push(ScriptStatement::Expression(ScriptExpression::call_path(
                        &mapping.target_equivalent,
                        arguments,
                    )));
                    let mut note = ConversionNote::new(
                        COMPLEX_CONVERSION,
                        Severity::Warning,
                        Stage::Transpiler,
                        format!(
                            "'{}' expanded through '{}'; review the result",
                            property.signature, mapping.target_equivalent
                        ),
                    )
                    .with_file(node.file.clone())
                    .with_span(property.span.clone())
                    .with_node(node.id.to_string());
                    if let Some(notes) = &mapping.notes {
                        note = note.with_fix(notes.clone());
                    }
                    self.sink.push(note);
                }
            }
            other => {
                // Impossible or missing: degrade at property granularity.
                let code = if other.is_some() {
                    UNSUPPORTED_API
                } else {
                    UNMAPPED_API
                };
                let action = other.and_then(|mapping| mapping.notes).unwrap_or_else(|| {
                    format!(
                        "add a mapping for '{}' or set the property by hand",
                        property.signature
                    )
                });
                self.unmappable.push(UnmappableFeature {
                    node_id: node.id.to_string(),
                    signature: property.signature.clone(),
                    recommended_action: action.clone(),
                });
                let severity = if self.options.strategies.allow_stubs {
                    Severity::Warning
                } else {
                    Severity::Error
                };
                self.sink.push(
                    ConversionNote::new(
                        code,
                        severity,
                        Stage::Transpiler,
                        format!("no usable mapping for '{}'", property.signature),
                    )
                    .with_file(node.file.clone())
                    .with_span(property.span.clone())
                    .with_node(node.id.to_string())
                    .with_fix(action),
                );
                if self.options.strategies.allow_stubs {
                    members.push(ObjectMember::Comment(format!(
                        "unmapped: {} ({}:{})",
                        property.signature, node.file, property.span.start_line
                    )));
                }
            }
        }
    }

    // ---- event handlers ----

    fn emit_handler(
        &mut self,
        node: &IrNode,
        handler: &EventHandler,
        module: usize,
    ) -> Result<NodeState, TranspileError> {
        let signature = format!("event#{}", handler.event);
        let mapping = match self.resolve_node_mapping(&signature) {
            Some(mapping) if mapping.conversion_type != ConversionType::Impossible => mapping,
            other => return Ok(self.unmapped_node(node, &signature, other)),
        };
        self.mark_resolved(node, &mapping);

        let (params, body) = match &handler.body {
            Some(body) => {
                let mut lowerer = BodyLowerer::new(
                    self.ir,
                    self.table,
                    self.options.api_version,
                    self.options.strategies,
                    &mut self.renames,
                    node.id.to_string(),
                    node.file.clone(),
                    handler
                        .parameters
                        .iter()
                        .map(|parameter| (parameter.name.clone(), parameter.type_name.clone())),
                );
                let statements = lowerer.lower_block(body);
                let BodyLowerer {
                    notes,
                    unmappable,
                    stub_requests,
                    import_paths,
                    helper_imports,
                    ..
                } = lowerer;
                self.absorb(
                    notes,
                    unmappable,
                    stub_requests,
                    import_paths,
                    helper_imports,
                    module,
                );

                let params: Vec<String> = if handler.parameters.is_empty() {
                    vec!["event".to_string()]
                } else {
                    handler
                        .parameters
                        .iter()
                        .map(|parameter| safe_local(&parameter.name))
                        .collect()
                };
                (params, statements)
            }
            None => {
                // Method-reference handler: forward to the referenced
                // helper, when the link pass found it.
                let helper = handler
                    .references
                    .iter()
                    .find_map(|id| self.ir.node(id))
                    .filter(|target| target.logic_block().is_some());
                let Some(helper) = helper else {
                    return Ok(NodeState::Omitted);
                };
                let helper_block =
                    helper
                        .logic_block()
                        .ok_or_else(|| TranspileError::Internal {
                            message: "reference filter admitted a non-logic node".to_string(),
                        })?;
                let function_name = self.renames.target_name(&helper_block.name);
                if helper.file != node.file {
                    if let Some(stem) = self.stem_for_file(&helper.file) {
                        self.modules[module]
                            .note_named_import(format!("./{stem}.js"), function_name.clone());
                    }
                }
                let body = vec![ScriptStatement::Expression(ScriptExpression::call(
                    ScriptExpression::ident(function_name),
                    vec![ScriptExpression::ident("event")],
                ))];
                (vec!["event".to_string()], body)
            }
        };

        self.modules[module].note_import(&mapping.target_equivalent);
        self.modules[module]
            .statements
            .push(ScriptStatement::Expression(ScriptExpression::call_path(
                mapping.target_equivalent.trim_end_matches("()"),
                vec![ScriptExpression::Arrow { params, body }],
            )));

        self.note_for_mapping(node, &signature, &mapping);
        Ok(NodeState::Emitted)
    }

    // ---- logic blocks ----

    fn emit_logic(
        &mut self,
        node: &IrNode,
        block: &LogicBlock,
        module: usize,
    ) -> Result<NodeState, TranspileError> {
        if block.body.statements.is_empty() {
            return Ok(NodeState::Omitted);
        }
        let name = self.renames.target_name(&block.name);
        let mut lowerer = BodyLowerer::new(
            self.ir,
            self.table,
            self.options.api_version,
            self.options.strategies,
            &mut self.renames,
            node.id.to_string(),
            node.file.clone(),
            block
                .parameters
                .iter()
                .map(|parameter| (parameter.name.clone(), parameter.type_name.clone())),
        );
        let body = lowerer.lower_block(&block.body);
        let BodyLowerer {
            notes,
            unmappable,
            stub_requests,
            import_paths,
            helper_imports,
            ..
        } = lowerer;
        self.absorb(
            notes,
            unmappable,
            stub_requests,
            import_paths,
            helper_imports,
            module,
        );

        self.modules[module]
            .statements
            .push(ScriptStatement::Function {
                name,
                params: block
                    .parameters
                    .iter()
                    .map(|parameter| safe_local(&parameter.name))
                    .collect(),
                body,
            });
        Ok(NodeState::Emitted)
    }

    // ---- shared ----

    /// Pending -> Resolved transition, observable while the node is being
    /// emitted.
    fn mark_resolved(&mut self, node: &IrNode, mapping: &ApiMapping) {
        let kind = match mapping.conversion_type {
            ConversionType::Wrapper => ResolvedKind::Wrapper,
            ConversionType::Complex => ResolvedKind::Complex,
            _ => ResolvedKind::Direct,
        };
        self.states
            .insert(node.id.to_string(), NodeState::Resolved(kind));
    }

    /// Unmapped or unsupported at node level: stub or omit per strategy.
    fn unmapped_node(
        &mut self,
        node: &IrNode,
        signature: &str,
        mapping: Option<ApiMapping>,
    ) -> NodeState {
        self.states
            .insert(node.id.to_string(), NodeState::Unmapped);
        let code = if mapping.is_some() {
            UNSUPPORTED_API
        } else {
            UNMAPPED_API
        };
        let action = mapping
            .and_then(|mapping| mapping.notes)
            .unwrap_or_else(|| {
                format!("add a mapping for '{signature}' or port this construct by hand")
            });
        self.unmappable.push(UnmappableFeature {
            node_id: node.id.to_string(),
            signature: signature.to_string(),
            recommended_action: action.clone(),
        });

        let severity = if self.options.strategies.allow_stubs {
            Severity::Warning
        } else {
            Severity::Error
        };
        self.sink.push(
            ConversionNote::new(
                code,
                severity,
                Stage::Transpiler,
                format!("no usable mapping for '{signature}'"),
            )
            .with_file(node.file.clone())
            .with_span(node.span.clone())
            .with_node(node.id.to_string())
            .with_fix(action),
        );

        if self.options.strategies.allow_stubs {
            let module = self.ensure_module(&node.file);
            self.modules[module].request_stub(StubRequest {
                signature: signature.to_string(),
                file: node.file.clone(),
                line: node.span.start_line,
            });
            NodeState::StubEmitted
        } else {
            NodeState::Omitted
        }
    }

    /// Info/warning note for a resolved node-level mapping; direct mappings
    /// stay silent.
    fn note_for_mapping(&mut self, node: &IrNode, signature: &str, mapping: &ApiMapping) {
        let (code, severity, message) = match mapping.conversion_type {
            ConversionType::Direct | ConversionType::Impossible => return,
            ConversionType::Wrapper => (
                WRAPPER_BRIDGE,
                Severity::Info,
                format!(
                    "'{signature}' bridged through adapter '{}'",
                    mapping.target_equivalent
                ),
            ),
            ConversionType::Complex => (
                COMPLEX_CONVERSION,
                Severity::Warning,
                format!(
                    "'{signature}' expanded through '{}'; review the result",
                    mapping.target_equivalent
                ),
            ),
        };
        let mut note = ConversionNote::new(code, severity, Stage::Transpiler, message)
            .with_file(node.file.clone())
            .with_span(node.span.clone())
            .with_node(node.id.to_string());
        if let Some(notes) = &mapping.notes {
            note = note.with_fix(notes.clone());
        }
        self.sink.push(note);
    }

    fn absorb(
        &mut self,
        notes: Vec<ConversionNote>,
        unmappable: Vec<UnmappableFeature>,
        stub_requests: Vec<StubRequest>,
        import_paths: Vec<String>,
        helper_imports: Vec<(String, String)>,
        module: usize,
    ) {
        self.sink.extend(notes);
        self.unmappable.extend(unmappable);
        for request in stub_requests {
            self.modules[module].request_stub(request);
        }
        for path in import_paths {
            self.modules[module].note_import(&path);
        }
        for (file, name) in helper_imports {
            if let Some(stem) = self.stem_for_file(&file) {
                self.modules[module].note_named_import(format!("./{stem}.js"), name);
            }
        }
    }
}

fn property_argument(value: &PropertyValue) -> ScriptExpression {
    match value {
        PropertyValue::Number(value) => ScriptExpression::number(canonical_number(value)),
        PropertyValue::String(value) => ScriptExpression::string(value.clone()),
        PropertyValue::Boolean(value) => ScriptExpression::Literal(ScriptLiteral::Boolean(*value)),
        PropertyValue::Reference(path) => ScriptExpression::string(path.clone()),
    }
}

/// Object-literal value for a property: its first argument, or `true` for
/// marker properties with no arguments.
fn property_argument_value(property: &RegistrationProperty) -> ScriptExpression {
    property
        .arguments
        .first()
        .map(property_argument)
        .unwrap_or(ScriptExpression::Literal(ScriptLiteral::Boolean(true)))
}
