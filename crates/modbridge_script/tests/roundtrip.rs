// Generate -> reparse -> regenerate must be the identity on both the tree
// and the rendered text.
use modbridge_script::reparse::reparse;
use modbridge_script::{
    ObjectMember, ScriptBinaryOp, ScriptCodeGenConfig, ScriptCodeGenerator, ScriptExpression,
    ScriptImport, ScriptLiteral, ScriptProgram, ScriptStatement, ScriptUnaryOp,
};

fn representative_program() -> ScriptProgram {
    ScriptProgram {
        imports: vec![
            ScriptImport {
                names: vec!["world".to_string(), "system".to_string()],
                module: "@minecraft/server".to_string(),
            },
            ScriptImport {
                names: vec!["BlockRegistry".to_string()],
                module: "@minecraft/server-admin".to_string(),
            },
        ],
        statements: vec![
            ScriptStatement::Const {
                name: "rubyBlock".to_string(),
                value: ScriptExpression::call_path(
                    "BlockRegistry.register",
                    vec![
                        ScriptExpression::string("rubymod:ruby_block"),
                        ScriptExpression::Object(vec![
                            ObjectMember::Property {
                                key: "hardness".to_string(),
                                value: ScriptExpression::number("3.0"),
                            },
                            ObjectMember::Comment(
                                "unmapped: Block.Properties#magnetism".to_string(),
                            ),
                            ObjectMember::Property {
                                key: "resistance".to_string(),
                                value: ScriptExpression::number("6.0"),
                            },
                        ]),
                    ],
                ),
            },
            ScriptStatement::Expression(ScriptExpression::call_path(
                "world.afterEvents.playerBreakBlock.subscribe",
                vec![ScriptExpression::Arrow {
                    params: vec!["event".to_string()],
                    body: vec![
                        ScriptStatement::If {
                            condition: ScriptExpression::Binary {
                                left: Box::new(ScriptExpression::path("event.player")),
                                op: ScriptBinaryOp::NotEqual,
                                right: Box::new(ScriptExpression::Literal(ScriptLiteral::Null)),
                            },
                            then_branch: vec![ScriptStatement::Expression(
                                ScriptExpression::call_path(
                                    "event.player.sendMessage",
                                    vec![ScriptExpression::string("broke it")],
                                ),
                            )],
                            else_branch: Some(vec![ScriptStatement::Return(None)]),
                        },
                        ScriptStatement::Return(Some(ScriptExpression::Literal(
                            ScriptLiteral::Boolean(true),
                        ))),
                    ],
                }],
            )),
            ScriptStatement::Function {
                name: "portedHelper".to_string(),
                params: vec!["count".to_string()],
                body: vec![
                    ScriptStatement::Comment("bridged from a wrapper mapping".to_string()),
                    ScriptStatement::Return(Some(ScriptExpression::Binary {
                        left: Box::new(ScriptExpression::Binary {
                            left: Box::new(ScriptExpression::ident("count")),
                            op: ScriptBinaryOp::Add,
                            right: Box::new(ScriptExpression::number("1")),
                        }),
                        op: ScriptBinaryOp::Multiply,
                        right: Box::new(ScriptExpression::Unary {
                            op: ScriptUnaryOp::Minus,
                            operand: Box::new(ScriptExpression::number("2")),
                        }),
                    })),
                ],
            },
            ScriptStatement::Expression(ScriptExpression::Assign {
                target: Box::new(ScriptExpression::path("state.ready")),
                value: Box::new(ScriptExpression::Literal(ScriptLiteral::Boolean(true))),
            }),
        ],
    }
}

#[test]
fn reparse_accepts_everything_the_generator_emits() {
    let generator = ScriptCodeGenerator::new();
    let source = generator.generate(&representative_program()).unwrap();
    let reparsed = reparse(&source).unwrap();
    assert_eq!(reparsed, representative_program());
}

#[test]
fn regeneration_is_byte_identical() {
    let generator = ScriptCodeGenerator::new();
    let first = generator.generate(&representative_program()).unwrap();
    let reparsed = reparse(&first).unwrap();
    let second = generator.generate(&reparsed).unwrap();
    assert_eq!(first, second);
}

#[test]
fn roundtrip_holds_without_trailing_commas() {
    let config = ScriptCodeGenConfig {
        trailing_commas: false,
        ..Default::default()
    };
    let generator = ScriptCodeGenerator::with_config(config);
    let first = generator.generate(&representative_program()).unwrap();
    let reparsed = reparse(&first).unwrap();
    let second = generator.generate(&reparsed).unwrap();
    assert_eq!(first, second);
    assert_eq!(reparsed, representative_program());
}

#[test]
fn empty_program_renders_empty() {
    let generator = ScriptCodeGenerator::new();
    let source = generator.generate(&ScriptProgram::default()).unwrap();
    assert!(source.is_empty());
    assert_eq!(reparse(&source).unwrap(), ScriptProgram::default());
}
