use crate::*;
use modbridge_ast::Span;

#[test]
fn severity_ordering_drives_success_checks() {
    assert!(Severity::Info < Severity::Warning);
    assert!(Severity::Warning < Severity::Error);
    assert!(Severity::Error < Severity::Critical);
}

#[test]
fn descriptor_lookup() {
    let descriptor = lookup(UNMAPPED_API).unwrap();
    assert_eq!(descriptor.code, "MB3001");
    assert!(!descriptor.help.is_empty());
    assert!(lookup("MB9999").is_none());
}

#[test]
fn every_code_has_a_descriptor() {
    for code in [
        PARSE_ERROR,
        UNRECOGNIZED_CONSTRUCT,
        UNRESOLVED_REFERENCE,
        UNMAPPED_API,
        UNSUPPORTED_API,
        COMPLEX_CONVERSION,
        WRAPPER_BRIDGE,
        INTERNAL_FAULT,
        SIMPLIFIED_CONVERSION,
        RUN_CANCELLED,
    ] {
        assert!(lookup(code).is_some(), "missing descriptor for {code}");
    }
}

#[test]
fn note_builder_and_display() {
    let note = ConversionNote::new(
        UNMAPPED_API,
        Severity::Warning,
        Stage::Transpiler,
        "no mapping for Level#getLightEngine",
    )
    .with_file("src/RubyMod.java")
    .with_span(Span::new(14, 9, 14, 40))
    .with_node("src/RubyMod.java#0.2")
    .with_fix("port the lighting query by hand");

    let rendered = note.to_string();
    assert!(rendered.contains("MB3001"));
    assert!(rendered.contains("src/RubyMod.java:14:9"));
    assert_eq!(note.source_node_id.as_deref(), Some("src/RubyMod.java#0.2"));
}

#[test]
fn notes_serialize_for_reports() {
    let note = ConversionNote::new(PARSE_ERROR, Severity::Error, Stage::Parser, "bad file");
    let json = serde_json::to_value(&note).unwrap();
    assert_eq!(json["code"], "MB1001");
    assert_eq!(json["severity"], "error");
    assert_eq!(json["stage"], "parser");
}

#[test]
fn sink_appends_and_reports_max_severity() {
    let sink = DiagnosticsSink::new();
    assert!(sink.is_empty());
    assert_eq!(sink.max_severity(), None);

    sink.push(ConversionNote::new(
        UNRECOGNIZED_CONSTRUCT,
        Severity::Info,
        Stage::IrBuilder,
        "utility class",
    ));
    sink.push(ConversionNote::new(
        UNMAPPED_API,
        Severity::Warning,
        Stage::Transpiler,
        "no mapping",
    ));

    assert_eq!(sink.len(), 2);
    assert_eq!(sink.max_severity(), Some(Severity::Warning));
    assert!(sink.has_severity(Severity::Warning));
    assert!(!sink.has_severity(Severity::Error));
    assert_eq!(sink.snapshot().len(), 2);
}

#[test]
fn sink_supports_concurrent_emission() {
    use std::sync::Arc;

    let sink = Arc::new(DiagnosticsSink::new());
    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let sink = Arc::clone(&sink);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    sink.push(ConversionNote::new(
                        UNRECOGNIZED_CONSTRUCT,
                        Severity::Info,
                        Stage::IrBuilder,
                        format!("worker {worker}"),
                    ));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(sink.len(), 800);
}
