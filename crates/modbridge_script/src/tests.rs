use crate::*;

fn generator() -> ScriptCodeGenerator {
    ScriptCodeGenerator::new()
}

#[test]
fn builder_tracks_indentation() {
    let mut builder = ScriptSourceBuilder::new("  ".to_string());
    builder.push_line("function f() {");
    builder.indent();
    builder.push_line("run();");
    builder.dedent();
    builder.push_line("}");
    assert_eq!(builder.build(), "function f() {\n  run();\n}\n");
}

#[test]
fn blank_lines_carry_no_indentation() {
    let mut builder = ScriptSourceBuilder::new("  ".to_string());
    builder.indent();
    builder.push_line("a();");
    builder.push_line("");
    builder.push_line("b();");
    assert_eq!(builder.build(), "  a();\n\n  b();\n");
}

#[test]
fn renders_imports_and_const() {
    let program = ScriptProgram {
        imports: vec![ScriptImport {
            names: vec!["world".to_string(), "system".to_string()],
            module: "@minecraft/server".to_string(),
        }],
        statements: vec![ScriptStatement::Const {
            name: "rubyBlock".to_string(),
            value: ScriptExpression::call_path(
                "BlockRegistry.register",
                vec![ScriptExpression::string("rubymod:ruby_block")],
            ),
        }],
    };

    let source = generator().generate(&program).unwrap();
    assert_eq!(
        source,
        "import { world, system } from \"@minecraft/server\";\n\
         \n\
         const rubyBlock = BlockRegistry.register(\"rubymod:ruby_block\");\n"
    );
}

#[test]
fn renders_object_literals_multiline() {
    let program = ScriptProgram {
        imports: vec![],
        statements: vec![ScriptStatement::Const {
            name: "components".to_string(),
            value: ScriptExpression::Object(vec![
                ObjectMember::Property {
                    key: "hardness".to_string(),
                    value: ScriptExpression::number("3.0"),
                },
                ObjectMember::Comment("unmapped: Block.Properties#magnetism".to_string()),
            ]),
        }],
    };

    let source = generator().generate(&program).unwrap();
    assert_eq!(
        source,
        "const components = {\n  hardness: 3.0,\n  // unmapped: Block.Properties#magnetism\n};\n"
    );
}

#[test]
fn renders_subscription_with_arrow_body() {
    let program = ScriptProgram {
        imports: vec![],
        statements: vec![ScriptStatement::Expression(ScriptExpression::call_path(
            "world.afterEvents.playerBreakBlock.subscribe",
            vec![ScriptExpression::Arrow {
                params: vec!["event".to_string()],
                body: vec![ScriptStatement::Expression(ScriptExpression::call_path(
                    "event.player.sendMessage",
                    vec![ScriptExpression::string("broke it")],
                ))],
            }],
        ))],
    };

    let source = generator().generate(&program).unwrap();
    assert_eq!(
        source,
        "world.afterEvents.playerBreakBlock.subscribe((event) => {\n\
         \x20\x20event.player.sendMessage(\"broke it\");\n\
         });\n"
    );
}

#[test]
fn nested_binaries_are_parenthesized() {
    let expr = ScriptExpression::Binary {
        left: Box::new(ScriptExpression::Binary {
            left: Box::new(ScriptExpression::ident("a")),
            op: ScriptBinaryOp::Add,
            right: Box::new(ScriptExpression::ident("b")),
        }),
        op: ScriptBinaryOp::Multiply,
        right: Box::new(ScriptExpression::Binary {
            left: Box::new(ScriptExpression::ident("c")),
            op: ScriptBinaryOp::Subtract,
            right: Box::new(ScriptExpression::ident("d")),
        }),
    };
    let program = ScriptProgram {
        imports: vec![],
        statements: vec![ScriptStatement::Expression(expr)],
    };
    let source = generator().generate(&program).unwrap();
    assert_eq!(source, "(a + b) * (c - d);\n");
}

#[test]
fn equality_renders_strict() {
    let program = ScriptProgram {
        imports: vec![],
        statements: vec![ScriptStatement::If {
            condition: ScriptExpression::Binary {
                left: Box::new(ScriptExpression::ident("count")),
                op: ScriptBinaryOp::Equal,
                right: Box::new(ScriptExpression::number("0")),
            },
            then_branch: vec![ScriptStatement::Return(None)],
            else_branch: None,
        }],
    };
    let source = generator().generate(&program).unwrap();
    assert_eq!(source, "if (count === 0) {\n  return;\n}\n");
}

#[test]
fn string_escaping_is_applied() {
    let program = ScriptProgram {
        imports: vec![],
        statements: vec![ScriptStatement::Const {
            name: "message".to_string(),
            value: ScriptExpression::string("line\nbreak \"quoted\""),
        }],
    };
    let source = generator().generate(&program).unwrap();
    assert_eq!(
        source,
        "const message = \"line\\nbreak \\\"quoted\\\"\";\n"
    );
}

#[test]
fn generation_is_deterministic() {
    let program = ScriptProgram {
        imports: vec![ScriptImport {
            names: vec!["world".to_string()],
            module: "@minecraft/server".to_string(),
        }],
        statements: vec![ScriptStatement::Function {
            name: "applyStrength".to_string(),
            params: vec!["block".to_string()],
            body: vec![ScriptStatement::Return(Some(ScriptExpression::call_path(
                "block.setHardness",
                vec![ScriptExpression::number("3.0")],
            )))],
        }],
    };

    let first = generator().generate(&program).unwrap();
    let second = generator().generate(&program).unwrap();
    assert_eq!(first, second);
}

#[test]
fn invalid_identifier_is_rejected() {
    let program = ScriptProgram {
        imports: vec![],
        statements: vec![ScriptStatement::Const {
            name: "not a name".to_string(),
            value: ScriptExpression::number("1"),
        }],
    };
    let error = generator().generate(&program).unwrap_err();
    assert!(matches!(error, CodeGenError::InvalidIdentifier { .. }));

    let program = ScriptProgram {
        imports: vec![],
        statements: vec![ScriptStatement::Expression(ScriptExpression::ident(""))],
    };
    assert!(generator().generate(&program).is_err());
}

#[test]
fn comments_are_forced_single_line() {
    let program = ScriptProgram {
        imports: vec![],
        statements: vec![ScriptStatement::Comment("first\nsecond".to_string())],
    };
    let source = generator().generate(&program).unwrap();
    assert_eq!(source, "// first second\n");
}
