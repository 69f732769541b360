// modbridge_ir/idiom - Declarative idiom-recognition tables
//! Recognition rules are data, not code: adding support for a new
//! registration or event idiom means adding a row here, not writing a new
//! matcher. All matching happens over the typed AST.
use crate::types::RegistrationKind;
use modbridge_ast::TypeRef;

/// Registry constants used by direct `Registry.register(...)` calls.
#[derive(Debug, Clone, Copy)]
pub struct RegistryPathRule {
    pub path: &'static str,
    pub kind: RegistrationKind,
}

pub const REGISTRY_PATHS: &[RegistryPathRule] = &[
    RegistryPathRule { path: "Registry.BLOCK", kind: RegistrationKind::Block },
    RegistryPathRule { path: "Registry.ITEM", kind: RegistrationKind::Item },
    RegistryPathRule { path: "Registry.ENTITY_TYPE", kind: RegistrationKind::Entity },
    RegistryPathRule { path: "Registry.RECIPE_SERIALIZER", kind: RegistrationKind::Recipe },
    RegistryPathRule { path: "Registries.BLOCK", kind: RegistrationKind::Block },
    RegistryPathRule { path: "Registries.ITEM", kind: RegistrationKind::Item },
    RegistryPathRule { path: "Registries.ENTITY_TYPE", kind: RegistrationKind::Entity },
    RegistryPathRule { path: "Registries.RECIPE_SERIALIZER", kind: RegistrationKind::Recipe },
    RegistryPathRule { path: "BuiltInRegistries.BLOCK", kind: RegistrationKind::Block },
    RegistryPathRule { path: "BuiltInRegistries.ITEM", kind: RegistrationKind::Item },
    RegistryPathRule { path: "BuiltInRegistries.ENTITY_TYPE", kind: RegistrationKind::Entity },
    RegistryPathRule { path: "BuiltInRegistries.RECIPE_SERIALIZER", kind: RegistrationKind::Recipe },
];

/// Receivers whose `register` method is the direct-registry idiom.
pub const DIRECT_REGISTRY_RECEIVERS: &[&str] = &["Registry", "BuiltInRegistries"];

/// Content types as they appear in generic arguments and holder fields.
#[derive(Debug, Clone, Copy)]
pub struct KindByTypeRule {
    pub type_name: &'static str,
    pub kind: RegistrationKind,
}

pub const KIND_BY_TYPE: &[KindByTypeRule] = &[
    KindByTypeRule { type_name: "Block", kind: RegistrationKind::Block },
    KindByTypeRule { type_name: "Item", kind: RegistrationKind::Item },
    KindByTypeRule { type_name: "BlockItem", kind: RegistrationKind::Item },
    KindByTypeRule { type_name: "EntityType", kind: RegistrationKind::Entity },
    KindByTypeRule { type_name: "RecipeSerializer", kind: RegistrationKind::Recipe },
];

/// Conventional deferred-register field names, the fallback when no type
/// information pins the kind down.
#[derive(Debug, Clone, Copy)]
pub struct DeferredReceiverRule {
    pub field_name: &'static str,
    pub kind: RegistrationKind,
}

pub const DEFERRED_RECEIVERS: &[DeferredReceiverRule] = &[
    DeferredReceiverRule { field_name: "BLOCKS", kind: RegistrationKind::Block },
    DeferredReceiverRule { field_name: "ITEMS", kind: RegistrationKind::Item },
    DeferredReceiverRule { field_name: "ENTITY_TYPES", kind: RegistrationKind::Entity },
    DeferredReceiverRule { field_name: "ENTITIES", kind: RegistrationKind::Entity },
    DeferredReceiverRule { field_name: "RECIPE_SERIALIZERS", kind: RegistrationKind::Recipe },
    DeferredReceiverRule { field_name: "RECIPES", kind: RegistrationKind::Recipe },
];

/// Generic containers that hold a deferred registration's content type.
pub const DEFERRED_CONTAINER_TYPES: &[&str] =
    &["RegistryObject", "DeferredHolder", "DeferredRegister", "Supplier"];

/// Annotation-driven event binding: handler parameter type to canonical
/// event name.
#[derive(Debug, Clone, Copy)]
pub struct EventTypeRule {
    pub type_name: &'static str,
    pub event: &'static str,
}

pub const EVENT_TYPES: &[EventTypeRule] = &[
    EventTypeRule { type_name: "BlockEvent.BreakEvent", event: "player.breakBlock" },
    EventTypeRule { type_name: "PlayerInteractEvent.RightClickBlock", event: "player.interactBlock" },
    EventTypeRule { type_name: "PlayerEvent.PlayerLoggedInEvent", event: "player.join" },
    EventTypeRule { type_name: "TickEvent.ServerTickEvent", event: "world.tick" },
    EventTypeRule { type_name: "EntityJoinLevelEvent", event: "entity.spawn" },
    EventTypeRule { type_name: "LivingDeathEvent", event: "entity.die" },
];

/// Callback-registration event binding: callback field path to canonical
/// event name, plus the callback's parameter types. Source-side lambdas
/// leave parameters untyped; the rule supplies what the interface declares
/// so body lowering can resolve call signatures.
#[derive(Debug, Clone, Copy)]
pub struct EventPathRule {
    pub path: &'static str,
    pub event: &'static str,
    pub param_types: &'static [&'static str],
}

pub const EVENT_PATHS: &[EventPathRule] = &[
    EventPathRule {
        path: "PlayerBlockBreakEvents.BEFORE",
        event: "player.breakBlock",
        param_types: &["World", "Player", "BlockPos"],
    },
    EventPathRule {
        path: "PlayerBlockBreakEvents.AFTER",
        event: "player.breakBlock",
        param_types: &["World", "Player", "BlockPos"],
    },
    EventPathRule {
        path: "UseBlockCallback.EVENT",
        event: "player.interactBlock",
        param_types: &["Player", "World", "Hand", "BlockHitResult"],
    },
    EventPathRule {
        path: "ServerPlayConnectionEvents.JOIN",
        event: "player.join",
        param_types: &["ServerGamePacketListenerImpl", "PacketSender", "MinecraftServer"],
    },
    EventPathRule {
        path: "ServerTickEvents.END_SERVER_TICK",
        event: "world.tick",
        param_types: &["MinecraftServer"],
    },
    EventPathRule {
        path: "ServerEntityEvents.ENTITY_LOAD",
        event: "entity.spawn",
        param_types: &["Entity", "ServerWorld"],
    },
    EventPathRule {
        path: "ServerLivingEntityEvents.AFTER_DEATH",
        event: "entity.die",
        param_types: &["LivingEntity", "DamageSource"],
    },
];

/// Class-level markers that make a class conversion-relevant even before a
/// member idiom matches.
pub const MOD_ANNOTATIONS: &[&str] = &["Mod", "Mod.EventBusSubscriber", "EventBusSubscriber"];
pub const LIFECYCLE_INTERFACES: &[&str] = &["ModInitializer", "ClientModInitializer", "DedicatedServerModInitializer"];

pub fn registry_kind_for_path(path: &str) -> Option<RegistrationKind> {
    REGISTRY_PATHS
        .iter()
        .find(|rule| rule.path == path)
        .map(|rule| rule.kind)
}

pub fn is_direct_registry_receiver(path: &str) -> bool {
    DIRECT_REGISTRY_RECEIVERS.contains(&path)
}

pub fn kind_for_type(simple_name: &str) -> Option<RegistrationKind> {
    KIND_BY_TYPE
        .iter()
        .find(|rule| rule.type_name == simple_name)
        .map(|rule| rule.kind)
}

pub fn kind_for_receiver_name(field_name: &str) -> Option<RegistrationKind> {
    DEFERRED_RECEIVERS
        .iter()
        .find(|rule| rule.field_name == field_name)
        .map(|rule| rule.kind)
}

/// Kind carried by a deferred container type such as `RegistryObject<Block>`
/// or `DeferredRegister<Item>`.
pub fn kind_for_container_type(ty: &TypeRef) -> Option<RegistrationKind> {
    if !DEFERRED_CONTAINER_TYPES.contains(&ty.simple_name()) {
        return None;
    }
    ty.first_type_arg()
        .and_then(|arg| kind_for_type(arg.simple_name()))
}

pub fn event_for_type(type_name: &str) -> Option<&'static str> {
    let simple = type_name.rsplit('.').next().unwrap_or(type_name);
    EVENT_TYPES
        .iter()
        .find(|rule| {
            rule.type_name == type_name
                || rule.type_name.rsplit('.').next() == Some(simple)
        })
        .map(|rule| rule.event)
}

pub fn event_rule_for_path(path: &str) -> Option<&'static EventPathRule> {
    EVENT_PATHS.iter().find(|rule| rule.path == path)
}

pub fn event_for_path(path: &str) -> Option<&'static str> {
    event_rule_for_path(path).map(|rule| rule.event)
}

pub fn is_mod_annotation(name: &str) -> bool {
    MOD_ANNOTATIONS.contains(&name)
}

pub fn is_lifecycle_interface(simple_name: &str) -> bool {
    LIFECYCLE_INTERFACES.contains(&simple_name)
}
