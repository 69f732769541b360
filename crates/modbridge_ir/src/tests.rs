use crate::*;
use modbridge_diagnostics::{DiagnosticsSink, Severity};
use modbridge_support::CancelToken;

fn metadata() -> ModMetadata {
    ModMetadata {
        mod_id: "rubymod".to_string(),
        loader: LoaderVariant::Forge,
    }
}

fn parsed(path: &str, source: &str) -> ParsedFile {
    let outcome = modbridge_parser::parse(source, path);
    assert!(
        outcome.is_clean(),
        "fixture failed to parse: {:?}",
        outcome.errors
    );
    ParsedFile {
        path: path.to_string(),
        unit: outcome.unit,
    }
}

fn build_one(path: &str, source: &str) -> (IrContext, Vec<modbridge_diagnostics::ConversionNote>) {
    let sink = DiagnosticsSink::new();
    let context = build(
        &[parsed(path, source)],
        &metadata(),
        &sink,
        &CancelToken::new(),
    );
    (context, sink.into_notes())
}

const DEFERRED_FIELD: &str = r#"
public class ModBlocks {
    public static final String MOD_ID = "rubymod";

    public static final RegistryObject<Block> RUBY_BLOCK =
        BLOCKS.register("ruby_block", () -> new Block(Properties.of().strength(3.0f).sound(SoundType.STONE)));
}
"#;

#[test]
fn deferred_factory_field_normalizes_to_registration() {
    let (context, _) = build_one("src/ModBlocks.java", DEFERRED_FIELD);

    let registration = context
        .registrations()
        .next()
        .and_then(IrNode::registration)
        .expect("one registration");
    assert_eq!(registration.kind, RegistrationKind::Block);
    assert_eq!(registration.identifier.to_string(), "rubymod:ruby_block");
    assert_eq!(registration.symbol.as_deref(), Some("RUBY_BLOCK"));
    assert_eq!(registration.idiom, RegistrationIdiom::DeferredFactory);

    let signatures: Vec<&str> = registration
        .properties
        .iter()
        .map(|property| property.signature.as_str())
        .collect();
    assert_eq!(
        signatures,
        vec!["Block.Properties#strength", "Block.Properties#sound"]
    );
    assert_eq!(
        registration.properties[0].arguments,
        vec![PropertyValue::Number("3.0f".to_string())]
    );
    assert_eq!(
        registration.properties[1].arguments,
        vec![PropertyValue::Reference("SoundType.STONE".to_string())]
    );

    // The literal constant went to the mod-wide pool, not to a node.
    assert_eq!(
        context.constants.get("ModBlocks.MOD_ID"),
        Some(&modbridge_ast::Literal::String("rubymod".to_string()))
    );
}

const DIRECT_REGISTRY: &str = r#"
public class RubyMod implements ModInitializer {
    public void onInitialize() {
        Registry.register(Registry.BLOCK, new Identifier("rubymod", "ruby_block"), new Block(Properties.of().strength(3.0f)));
        setupExtras();
    }

    public void setupExtras() {
        prepare();
    }
}
"#;

#[test]
fn direct_registry_call_is_extracted_with_logic_parent() {
    let (context, _) = build_one("src/RubyMod.java", DIRECT_REGISTRY);

    let registration_node = context.registrations().next().expect("registration node");
    let registration = registration_node.registration().unwrap();
    assert_eq!(registration.kind, RegistrationKind::Block);
    assert_eq!(registration.identifier.to_string(), "rubymod:ruby_block");
    assert_eq!(registration.idiom, RegistrationIdiom::DirectRegistry);
    assert_eq!(
        registration.properties[0].signature,
        "Block.Properties#strength"
    );

    // The registration points at the lifecycle method's logic node, and the
    // extracted call no longer appears in that node's remaining statements.
    let parent_id = registration_node.parent.clone().expect("parent link");
    let parent = context.node(&parent_id).expect("parent node");
    let logic = parent.logic_block().unwrap();
    assert_eq!(logic.name, "onInitialize");
    assert_eq!(logic.body.statements.len(), 1);
}

const OBJECT_HOLDER: &str = r#"
public class Holders {
    @ObjectHolder("rubymod:ruby_block")
    public static final Block RUBY_BLOCK = null;
}
"#;

#[test]
fn object_holder_annotation_normalizes_to_registration() {
    let (context, _) = build_one("src/Holders.java", OBJECT_HOLDER);
    let registration = context
        .registrations()
        .next()
        .and_then(IrNode::registration)
        .expect("one registration");
    assert_eq!(registration.kind, RegistrationKind::Block);
    assert_eq!(registration.identifier.to_string(), "rubymod:ruby_block");
    assert_eq!(registration.idiom, RegistrationIdiom::AnnotationHolder);
}

const FORGE_HANDLER: &str = r#"
@Mod.EventBusSubscriber(modid = "rubymod")
public class BreakHandler {
    @SubscribeEvent
    public static void onBreak(BlockEvent.BreakEvent event) {
        event.getPlayer().sendMessage("ruby!");
    }
}
"#;

const FABRIC_HANDLER: &str = r#"
public class RubyMod implements ModInitializer {
    public void onInitialize() {
        PlayerBlockBreakEvents.BEFORE.register((world, player, pos) -> {
            player.sendMessage("ruby!");
        });
    }
}
"#;

#[test]
fn both_event_idioms_normalize_to_the_same_canonical_event() {
    let (forge, _) = build_one("src/BreakHandler.java", FORGE_HANDLER);
    let (fabric, _) = build_one("src/RubyMod.java", FABRIC_HANDLER);

    let forge_handler = forge
        .event_handlers()
        .next()
        .and_then(IrNode::event_handler)
        .expect("forge handler");
    let fabric_handler = fabric
        .event_handlers()
        .next()
        .and_then(IrNode::event_handler)
        .expect("fabric handler");

    assert_eq!(forge_handler.event, "player.breakBlock");
    assert_eq!(fabric_handler.event, "player.breakBlock");
    assert_eq!(forge_handler.idiom, EventIdiom::SubscribeAnnotation);
    assert_eq!(fabric_handler.idiom, EventIdiom::CallbackRegister);
    assert!(forge_handler.body.is_some());
    assert!(fabric_handler.body.is_some());
    assert_eq!(fabric_handler.parameters.len(), 3);
}

const UTILITY: &str = r#"
public class MathUtil {
    public static int clamp(int value, int low, int high) {
        return value;
    }
}
"#;

#[test]
fn unrecognized_class_produces_fallback_node_and_info_note() {
    let (context, notes) = build_one("src/MathUtil.java", UTILITY);

    assert_eq!(context.registrations().count(), 0);
    assert_eq!(context.event_handlers().count(), 0);
    let unrecognized: Vec<_> = context
        .nodes
        .iter()
        .filter(|node| matches!(node.kind, IrNodeKind::Unrecognized(_)))
        .collect();
    assert_eq!(unrecognized.len(), 1);
    assert!(matches!(
        &unrecognized[0].kind,
        IrNodeKind::Unrecognized(UnrecognizedConstruct {
            fragment: Some(SourceFragment::Class(_)),
            ..
        })
    ));

    let note = notes
        .iter()
        .find(|note| note.code == "MB2001")
        .expect("info note");
    assert_eq!(note.severity, Severity::Info);
    assert_eq!(
        note.source_node_id.as_deref(),
        Some("src/MathUtil.java#0.0")
    );
}

const BLOCKS_FILE: &str = r#"
public class ModBlocks {
    public static final RegistryObject<Block> RUBY_BLOCK =
        BLOCKS.register("ruby_block", () -> new Block(Properties.of().strength(3.0f)));
}
"#;

const HANDLER_FILE: &str = r#"
@Mod.EventBusSubscriber(modid = "rubymod")
public class BreakHandler {
    @SubscribeEvent
    public static void onBreak(BlockEvent.BreakEvent event) {
        use(ModBlocks.RUBY_BLOCK);
    }
}
"#;

#[test]
fn linking_resolves_references_across_files() {
    let sink = DiagnosticsSink::new();
    let files = vec![
        parsed("src/ModBlocks.java", BLOCKS_FILE),
        parsed("src/BreakHandler.java", HANDLER_FILE),
    ];
    let context = build(&files, &metadata(), &sink, &CancelToken::new());

    let handler = context
        .event_handlers()
        .next()
        .and_then(IrNode::event_handler)
        .expect("handler");
    let registration_id = context.registrations().next().unwrap().id.clone();
    assert_eq!(handler.references, vec![registration_id]);
}

#[test]
fn unresolved_method_reference_handler_warns() {
    let source = r#"
public class RubyMod implements ModInitializer {
    public void onInitialize() {
        ServerTickEvents.END_SERVER_TICK.register(Missing::onTick);
    }
}
"#;
    let (_, notes) = build_one("src/RubyMod.java", source);
    let warning = notes
        .iter()
        .find(|note| note.code == "MB2002")
        .expect("unresolved reference warning");
    assert_eq!(warning.severity, Severity::Warning);
}

#[test]
fn build_is_deterministic_across_runs() {
    let files = vec![
        parsed("src/ModBlocks.java", BLOCKS_FILE),
        parsed("src/BreakHandler.java", HANDLER_FILE),
        parsed("src/MathUtil.java", UTILITY),
    ];

    let sink_a = DiagnosticsSink::new();
    let sink_b = DiagnosticsSink::new();
    let first = build(&files, &metadata(), &sink_a, &CancelToken::new());
    let second = build(&files, &metadata(), &sink_b, &CancelToken::new());

    assert_eq!(first, second);
    assert_eq!(sink_a.into_notes(), sink_b.into_notes());
}

#[test]
fn cancelled_build_collects_nothing() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let sink = DiagnosticsSink::new();
    let context = build(
        &[parsed("src/ModBlocks.java", BLOCKS_FILE)],
        &metadata(),
        &sink,
        &cancel,
    );
    assert!(context.nodes.is_empty());
}
