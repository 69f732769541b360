use crate::*;
use modbridge_diagnostics::Severity;
use modbridge_ir::{LoaderVariant, ModMetadata};
use modbridge_mappings::{ApiMapping, ConversionType, MappingTable};
use modbridge_support::CancelToken;
use modbridge_transpiler::{CompromiseStrategies, TranspileOptions};

fn mapping(
    signature: &str,
    target: &str,
    conversion_type: ConversionType,
    version: u32,
) -> ApiMapping {
    ApiMapping {
        id: format!("map-{signature}-v{version}"),
        source_signature: signature.to_string(),
        target_equivalent: target.to_string(),
        conversion_type,
        version,
        notes: None,
        example_usage: None,
    }
}

fn table() -> MappingTable {
    MappingTable::from_mappings(vec![
        mapping(
            "registry#block",
            "BlockRegistry.register",
            ConversionType::Direct,
            1,
        ),
        mapping(
            "Block.Properties#strength",
            "hardness",
            ConversionType::Direct,
            1,
        ),
        mapping(
            "event#player.breakBlock",
            "world.afterEvents.playerBreakBlock.subscribe",
            ConversionType::Direct,
            1,
        ),
        mapping("Player#sendMessage", "sendMessage", ConversionType::Direct, 1),
        mapping("BreakEvent#getPlayer", "player", ConversionType::Direct, 1),
    ])
    .unwrap()
}

fn request(files: Vec<SourceFile>, strategies: CompromiseStrategies) -> ConversionRequest {
    ConversionRequest {
        metadata: ModMetadata {
            mod_id: "rubymod".to_string(),
            loader: LoaderVariant::Forge,
        },
        files,
        mappings: table(),
        options: TranspileOptions {
            api_version: 1,
            strategies,
        },
    }
}

fn source(path: &str, text: &str) -> SourceFile {
    SourceFile {
        path: path.to_string(),
        text: text.to_string(),
    }
}

/// One block registration with a direct-mapped material property, plus one
/// call to an API the table does not know.
const MIXED_SOURCE: &str = r#"
public class ModBlocks {
    public static final RegistryObject<Block> RUBY_BLOCK =
        BLOCKS.register("ruby_block", () -> new Block(Properties.of().strength(3.0f)));

    public static void init(Bootstrap bootstrap) {
        bootstrap.reloadTextures();
    }
}
"#;

#[test]
fn direct_call_plus_stub_converts_successfully() {
    let outcome = convert(
        &request(
            vec![source("src/ModBlocks.java", MIXED_SOURCE)],
            CompromiseStrategies::default(),
        ),
        &CancelToken::new(),
    )
    .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.files.len(), 1);
    let text = &outcome.files[0].text;
    assert_eq!(text.matches("BlockRegistry.register(").count(), 1);
    assert!(text.contains("hardness: 3.0"));
    assert_eq!(text.matches("function stub_Bootstrap_reloadTextures()").count(), 1);

    let warnings: Vec<_> = outcome
        .notes
        .iter()
        .filter(|note| note.severity == Severity::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, "MB3001");

    assert_eq!(outcome.unmappable.len(), 1);
    assert_eq!(outcome.unmappable[0].signature, "Bootstrap#reloadTextures");
}

#[test]
fn identical_runs_are_byte_identical() {
    let files = vec![
        source("src/ModBlocks.java", MIXED_SOURCE),
        source(
            "src/BreakHandler.java",
            r#"
@Mod.EventBusSubscriber(modid = "rubymod")
public class BreakHandler {
    @SubscribeEvent
    public static void onBreak(BlockEvent.BreakEvent event) {
        Player player = event.getPlayer();
        player.sendMessage("ruby!");
    }
}
"#,
        ),
    ];

    let first = convert(
        &request(files.clone(), CompromiseStrategies::default()),
        &CancelToken::new(),
    )
    .unwrap();
    let second = convert(
        &request(files, CompromiseStrategies::default()),
        &CancelToken::new(),
    )
    .unwrap();

    assert_eq!(first.files, second.files);
    assert_eq!(first.notes, second.notes);
    assert_eq!(first.unmappable, second.unmappable);
    assert_eq!(first.renames, second.renames);
}

#[test]
fn parse_error_degrades_without_aborting_the_run() {
    let outcome = convert(
        &request(
            vec![
                source("src/Broken.java", "public class Broken { this is not java }"),
                source("src/ModBlocks.java", MIXED_SOURCE),
            ],
            CompromiseStrategies::default(),
        ),
        &CancelToken::new(),
    )
    .unwrap();

    // The bad file produced error notes; the good file still converted.
    assert!(outcome.notes.iter().any(|note| note.code == "MB1001"));
    assert!(outcome
        .files
        .iter()
        .any(|file| file.text.contains("BlockRegistry.register(")));
    // Errors are tolerated under the default warning policy.
    assert!(outcome.success);
}

#[test]
fn strict_warning_policy_escalates_errors() {
    let strategies = CompromiseStrategies {
        allow_stubs: false,
        allow_warnings: false,
        allow_simplifications: false,
    };
    let outcome = convert(
        &request(vec![source("src/ModBlocks.java", MIXED_SOURCE)], strategies),
        &CancelToken::new(),
    )
    .unwrap();

    // The unmapped call is an error without stubs, and strict policy makes
    // the run fail.
    assert!(!outcome.success);
    assert!(outcome
        .notes
        .iter()
        .any(|note| note.severity == Severity::Error && note.code == "MB3001"));
    assert!(outcome
        .files
        .iter()
        .all(|file| !file.text.contains("stub_")));
}

#[test]
fn cancellation_reports_and_produces_no_files() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let outcome = convert(
        &request(
            vec![source("src/ModBlocks.java", MIXED_SOURCE)],
            CompromiseStrategies::default(),
        ),
        &cancel,
    )
    .unwrap();

    assert!(!outcome.success);
    assert!(outcome.files.is_empty());
    assert!(outcome.notes.iter().any(|note| note.code == "MB4001"));
}

#[test]
fn invalid_requests_are_rejected() {
    let mut bad = request(vec![], CompromiseStrategies::default());
    bad.metadata.mod_id = "  ".to_string();
    assert!(matches!(
        convert(&bad, &CancelToken::new()),
        Err(EngineError::InvalidRequest { .. })
    ));

    let duplicated = request(
        vec![
            source("src/A.java", "public class A {}"),
            source("src/A.java", "public class A {}"),
        ],
        CompromiseStrategies::default(),
    );
    assert!(matches!(
        convert(&duplicated, &CancelToken::new()),
        Err(EngineError::InvalidRequest { .. })
    ));
}

#[test]
fn report_summarizes_the_outcome() {
    let outcome = convert(
        &request(
            vec![source("src/ModBlocks.java", MIXED_SOURCE)],
            CompromiseStrategies::default(),
        ),
        &CancelToken::new(),
    )
    .unwrap();

    let report = ConversionReport::from_outcome(&outcome);
    assert!(report.success);
    assert_eq!(report.generated_files, vec!["scripts/mod_blocks.js"]);
    assert_eq!(report.note_counts.warning, 1);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["metadata"]["modId"], "rubymod");
    assert_eq!(json["success"], true);
}
