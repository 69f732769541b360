use crate::*;
use modbridge_ir::LoaderVariant;
use modbridge_transpiler::CompromiseStrategies;
use std::fs;

const MOD_BLOCKS: &str = r#"
public class ModBlocks {
    public static final RegistryObject<Block> RUBY_BLOCK =
        BLOCKS.register("ruby_block", () -> new Block(Properties.of().strength(3.0f)));
}
"#;

const BREAK_HANDLER: &str = r#"
@Mod.EventBusSubscriber(modid = "rubymod")
public class BreakHandler {
    @SubscribeEvent
    public static void onBreak(BlockEvent.BreakEvent event) {
        Player player = event.getPlayer();
        player.sendMessage("ruby!");
    }
}
"#;

fn fixture_mod() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("ModBlocks.java"), MOD_BLOCKS).unwrap();
    fs::write(src.join("BreakHandler.java"), BREAK_HANDLER).unwrap();
    dir
}

fn convert_args<'a>(input: &'a std::path::Path) -> ConvertArgs<'a> {
    ConvertArgs {
        input,
        mappings: None,
        mod_id: Some("rubymod"),
        loader: LoaderVariant::Forge,
        api_version: 1,
        strategies: CompromiseStrategies::default(),
    }
}

#[test]
fn convert_produces_scripts_and_report() {
    let fixture = fixture_mod();
    let outcome = run_convert(&convert_args(fixture.path())).unwrap();
    assert!(outcome.success);

    let paths: Vec<&str> = outcome.files.iter().map(|file| file.path.as_str()).collect();
    assert_eq!(paths, vec!["scripts/break_handler.js", "scripts/mod_blocks.js"]);
    assert!(outcome.files[1].text.contains("BlockRegistry.register("));
    assert!(outcome.files[0]
        .text
        .contains("world.afterEvents.playerBreakBlock.subscribe"));

    let out = tempfile::tempdir().unwrap();
    write_outcome(out.path(), &outcome).unwrap();
    assert!(out.path().join("scripts/mod_blocks.js").exists());
    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.path().join("report.json")).unwrap())
            .unwrap();
    assert_eq!(report["success"], true);
    assert_eq!(report["metadata"]["modId"], "rubymod");
}

#[test]
fn default_mapping_table_is_valid_and_versioned() {
    let table = load_mapping_table(None).unwrap();
    assert!(table.len() > 20);

    // Version fallback against the shipped table: strength has v1 and v3.
    assert_eq!(
        table
            .resolve("Block.Properties#strength", 2)
            .map(|m| m.target_equivalent.as_str()),
        Some("hardness")
    );
    assert_eq!(
        table
            .resolve("Block.Properties#strength", 3)
            .map(|m| m.target_equivalent.as_str()),
        Some("destroyTime")
    );
}

#[test]
fn mod_id_is_derived_from_directory_name() {
    assert_eq!(
        derive_mod_id(std::path::Path::new("/mods/Ruby-Mod")),
        "ruby_mod"
    );
    assert_eq!(derive_mod_id(std::path::Path::new("___")), "mod");
}

#[test]
fn check_reports_recognition_counts() {
    let fixture = fixture_mod();
    let summary = run_check(fixture.path(), Some("rubymod"), LoaderVariant::Forge).unwrap();
    assert!(summary.contains("1 registration(s)"));
    assert!(summary.contains("1 event handler(s)"));
    assert!(summary.contains("0 parse error(s)"));
}

#[test]
fn gather_sources_requires_java_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), "nothing").unwrap();
    assert!(gather_sources(dir.path()).is_err());
}

#[test]
fn conversion_is_deterministic_end_to_end() {
    let fixture = fixture_mod();
    let first = run_convert(&convert_args(fixture.path())).unwrap();
    let second = run_convert(&convert_args(fixture.path())).unwrap();
    assert_eq!(first.files, second.files);
    assert_eq!(first.notes, second.notes);
}
