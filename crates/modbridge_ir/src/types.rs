// modbridge_ir/types - IR node model
use modbridge_ast::{Block, ClassDecl, FieldDecl, MethodDecl, Span};
use serde::Serialize;
use std::collections::BTreeMap;

/// Source-side loader flavor the mod was written against. Idiom recognition
/// covers both; the variant is carried for diagnostics and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaderVariant {
    Forge,
    Fabric,
}

impl std::str::FromStr for LoaderVariant {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "forge" => Ok(LoaderVariant::Forge),
            "fabric" => Ok(LoaderVariant::Fabric),
            other => Err(format!("unknown loader variant '{other}'")),
        }
    }
}

/// Per-mod conversion metadata supplied by the ingestion collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModMetadata {
    pub mod_id: String,
    pub loader: LoaderVariant,
}

/// Stable node identity: a pure function of file path and declaration
/// order, so repeated builds of identical input agree ID-for-ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId {
    pub file: String,
    pub declaration: usize,
    pub ordinal: usize,
}

impl NodeId {
    pub fn new(file: impl Into<String>, declaration: usize, ordinal: usize) -> Self {
        Self {
            file: file.into(),
            declaration,
            ordinal,
        }
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}.{}", self.file, self.declaration, self.ordinal)
    }
}

/// `namespace:name` resource identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceId {
    pub namespace: String,
    pub name: String,
}

impl ResourceId {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Parses `ns:name`, defaulting the namespace to the mod id.
    pub fn parse(raw: &str, default_namespace: &str) -> Self {
        match modbridge_ast::split_resource_id(raw) {
            (Some(namespace), name) => Self::new(namespace, name),
            (None, name) => Self::new(default_namespace, name),
        }
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationKind {
    Block,
    Item,
    Entity,
    Recipe,
}

impl RegistrationKind {
    /// Mapping-table signature for the registration operation itself.
    pub fn registry_signature(&self) -> &'static str {
        match self {
            RegistrationKind::Block => "registry#block",
            RegistrationKind::Item => "registry#item",
            RegistrationKind::Entity => "registry#entity",
            RegistrationKind::Recipe => "registry#recipe",
        }
    }

    /// Signature prefix for this kind's property setters.
    pub fn property_prefix(&self) -> &'static str {
        match self {
            RegistrationKind::Block => "Block.Properties",
            RegistrationKind::Item => "Item.Properties",
            RegistrationKind::Entity => "Entity.Properties",
            RegistrationKind::Recipe => "Recipe.Properties",
        }
    }
}

/// Which source idiom produced a registration. Normalization means the
/// transpiler never branches on this; it exists for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationIdiom {
    DirectRegistry,
    DeferredFactory,
    AnnotationHolder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PropertyValue {
    Number(String),
    String(String),
    Boolean(bool),
    /// Constant or other named reference, kept in dotted form.
    Reference(String),
}

/// One property-setter call captured from a registration's construction
/// chain, e.g. `strength(3.0f)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationProperty {
    pub name: String,
    /// Mapping-table signature, e.g. `Block.Properties#strength`.
    pub signature: String,
    pub arguments: Vec<PropertyValue>,
    pub span: Span,
}

/// A block/item/entity/recipe registration, normalized regardless of the
/// idiom that declared it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registration {
    pub kind: RegistrationKind,
    pub identifier: ResourceId,
    /// Declaring field symbol when one exists (`RUBY_BLOCK`).
    pub symbol: Option<String>,
    pub owner_class: String,
    pub idiom: RegistrationIdiom,
    pub properties: Vec<RegistrationProperty>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventIdiom {
    SubscribeAnnotation,
    CallbackRegister,
}

/// Parameter visible inside a handler or logic body, with its declared
/// type's simple name when the source provided one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicParameter {
    pub name: String,
    pub type_name: Option<String>,
}

/// A callback bound to a named lifecycle event, normalized across the
/// annotation and callback-registration idioms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventHandler {
    /// Canonical event name (`player.breakBlock`); unrecognized event types
    /// keep their raw source name so mapping resolution can still run.
    pub event: String,
    pub idiom: EventIdiom,
    pub handler_name: String,
    pub owner_class: String,
    pub parameters: Vec<LogicParameter>,
    /// Absent for method-reference handlers; the link pass resolves those
    /// through `referenced_symbols`.
    pub body: Option<Block>,
    /// Raw identifiers mentioned by the handler, captured in pass 1.
    pub referenced_symbols: Vec<String>,
    /// Registrations (and referenced helper blocks) resolved in pass 2.
    pub references: Vec<NodeId>,
}

/// Executable statement sequence: helper methods and lifecycle-method
/// remainders after registrations and event bindings were extracted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicBlock {
    pub owner_class: String,
    pub name: String,
    pub parameters: Vec<LogicParameter>,
    pub body: Block,
}

/// Raw AST fragment carried by an unrecognized construct.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SourceFragment {
    Class(Box<ClassDecl>),
    Field(Box<FieldDecl>),
    Method(Box<MethodDecl>),
}

/// Fallback for source the builder cannot classify. Never dropped: carried
/// forward so diagnostics can point at it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnrecognizedConstruct {
    pub description: String,
    pub fragment: Option<SourceFragment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum IrNodeKind {
    Registration(Registration),
    EventHandler(EventHandler),
    LogicBlock(LogicBlock),
    Unrecognized(UnrecognizedConstruct),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrNode {
    pub id: NodeId,
    pub file: String,
    pub span: Span,
    /// Containment link: a registration or event binding extracted from a
    /// method body points at that method's logic node.
    pub parent: Option<NodeId>,
    pub kind: IrNodeKind,
}

impl IrNode {
    pub fn registration(&self) -> Option<&Registration> {
        match &self.kind {
            IrNodeKind::Registration(registration) => Some(registration),
            _ => None,
        }
    }

    pub fn event_handler(&self) -> Option<&EventHandler> {
        match &self.kind {
            IrNodeKind::EventHandler(handler) => Some(handler),
            _ => None,
        }
    }

    pub fn logic_block(&self) -> Option<&LogicBlock> {
        match &self.kind {
            IrNodeKind::LogicBlock(block) => Some(block),
            _ => None,
        }
    }
}

/// The complete per-mod IR: every node plus the mod-wide constant pool
/// gathered from plain `static final` literal fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrContext {
    pub metadata: ModMetadata,
    pub nodes: Vec<IrNode>,
    /// Literal constants keyed both as `FIELD` and `Class.FIELD`.
    pub constants: BTreeMap<String, modbridge_ast::Literal>,
}

impl IrContext {
    pub fn node(&self, id: &NodeId) -> Option<&IrNode> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    pub fn registrations(&self) -> impl Iterator<Item = &IrNode> {
        self.nodes
            .iter()
            .filter(|node| matches!(node.kind, IrNodeKind::Registration(_)))
    }

    pub fn event_handlers(&self) -> impl Iterator<Item = &IrNode> {
        self.nodes
            .iter()
            .filter(|node| matches!(node.kind, IrNodeKind::EventHandler(_)))
    }

    pub fn registration_by_symbol(&self, symbol: &str) -> Option<&IrNode> {
        self.nodes.iter().find(|node| {
            node.registration()
                .map(|registration| registration.symbol.as_deref() == Some(symbol))
                .unwrap_or(false)
        })
    }
}
