use crate::{ParseError, parse};
use modbridge_ast::{
    BinaryOp, Expression, LambdaBody, Literal, Statement, TypeRef, Visibility, dotted_name,
};

const MOD_BLOCKS: &str = r#"
package com.example.rubymod;

import net.minecraft.world.level.block.Block;
import net.minecraftforge.registries.RegistryObject;

public class ModBlocks {
    public static final RegistryObject<Block> RUBY_BLOCK =
        BLOCKS.register("ruby_block", () -> new Block(Properties.of().strength(3.0f)));

    public static void register(IEventBus bus) {
        BLOCKS.register(bus);
    }
}
"#;

#[test]
fn parses_mod_blocks_cleanly() {
    let outcome = parse(MOD_BLOCKS, "ModBlocks.java");
    assert!(outcome.is_clean(), "errors: {:?}", outcome.errors);

    let unit = &outcome.unit;
    assert_eq!(unit.package.as_deref(), Some("com.example.rubymod"));
    assert_eq!(unit.imports.len(), 2);
    assert_eq!(
        unit.imports[0].path,
        "net.minecraft.world.level.block.Block"
    );

    let class = &unit.types[0];
    assert_eq!(class.name, "ModBlocks");
    assert_eq!(class.modifiers.visibility, Visibility::Public);
    assert_eq!(class.fields.len(), 1);
    assert_eq!(class.methods.len(), 1);

    let field = &class.fields[0];
    assert_eq!(field.name, "RUBY_BLOCK");
    assert!(field.modifiers.is_static && field.modifiers.is_final);
    let field_type = field.field_type.as_ref().unwrap();
    assert_eq!(field_type.simple_name(), "RegistryObject");
    assert_eq!(
        field_type.first_type_arg().map(TypeRef::simple_name),
        Some("Block")
    );

    // The initializer is a factory-lambda registration call.
    match field.initializer.as_ref().unwrap() {
        Expression::MethodCall {
            receiver: Some(receiver),
            name,
            arguments,
            ..
        } => {
            assert_eq!(dotted_name(receiver).as_deref(), Some("BLOCKS"));
            assert_eq!(name, "register");
            assert_eq!(arguments.len(), 2);
            assert!(matches!(&arguments[1], Expression::Lambda { .. }));
        }
        other => panic!("expected registration call, got {other:?}"),
    }
}

#[test]
fn parses_annotations_on_classes_and_methods() {
    let source = r#"
@Mod.EventBusSubscriber(modid = "rubymod")
public class BreakHandler {
    @SubscribeEvent
    public static void onBreak(BlockEvent.BreakEvent event) {
        event.getPlayer().sendMessage("broke it");
    }
}
"#;
    let outcome = parse(source, "BreakHandler.java");
    assert!(outcome.is_clean(), "errors: {:?}", outcome.errors);

    let class = &outcome.unit.types[0];
    assert_eq!(class.annotations[0].name, "Mod.EventBusSubscriber");
    assert_eq!(
        class.annotations[0].named_string_argument("modid"),
        Some("rubymod")
    );

    let method = &class.methods[0];
    assert_eq!(method.annotations[0].name, "SubscribeEvent");
    assert_eq!(
        method.parameters[0]
            .param_type
            .as_ref()
            .map(TypeRef::qualified_name),
        Some("BlockEvent.BreakEvent")
    );

    let body = method.body.as_ref().unwrap();
    match &body.statements[0] {
        Statement::Expression { expr, .. } => match expr {
            Expression::MethodCall { name, receiver, .. } => {
                assert_eq!(name, "sendMessage");
                assert!(matches!(
                    receiver.as_deref(),
                    Some(Expression::MethodCall { .. })
                ));
            }
            other => panic!("expected call chain, got {other:?}"),
        },
        other => panic!("expected expression statement, got {other:?}"),
    }
}

#[test]
fn parses_fabric_style_callback_registration() {
    let source = r#"
public class RubyMod {
    public void onInitialize() {
        PlayerBlockBreakEvents.BEFORE.register((world, player, pos) -> {
            return true;
        });
    }
}
"#;
    let outcome = parse(source, "RubyMod.java");
    assert!(outcome.is_clean(), "errors: {:?}", outcome.errors);

    let method = &outcome.unit.types[0].methods[0];
    let body = method.body.as_ref().unwrap();
    match &body.statements[0] {
        Statement::Expression {
            expr: Expression::MethodCall {
                receiver: Some(receiver),
                name,
                arguments,
                ..
            },
            ..
        } => {
            assert_eq!(
                dotted_name(receiver).as_deref(),
                Some("PlayerBlockBreakEvents.BEFORE")
            );
            assert_eq!(name, "register");
            match &arguments[0] {
                Expression::Lambda { parameters, body, .. } => {
                    assert_eq!(parameters.len(), 3);
                    assert!(matches!(body, LambdaBody::Block(_)));
                }
                other => panic!("expected lambda, got {other:?}"),
            }
        }
        other => panic!("expected callback registration, got {other:?}"),
    }
}

#[test]
fn parses_method_references_and_local_variables() {
    let source = r#"
public class Init {
    public void setup() {
        MinecraftForge.EVENT_BUS.register(Init::onTick);
        final Player player = event.getPlayer();
        int count = 3 + 4 * 2;
    }
}
"#;
    let outcome = parse(source, "Init.java");
    assert!(outcome.is_clean(), "errors: {:?}", outcome.errors);

    let body = outcome.unit.types[0].methods[0].body.as_ref().unwrap();
    match &body.statements[0] {
        Statement::Expression {
            expr: Expression::MethodCall { arguments, .. },
            ..
        } => {
            assert!(matches!(
                &arguments[0],
                Expression::MethodReference { receiver, name, .. }
                    if receiver == "Init" && name == "onTick"
            ));
        }
        other => panic!("expected method reference argument, got {other:?}"),
    }

    match &body.statements[1] {
        Statement::LocalVariable {
            name,
            var_type,
            is_final,
            ..
        } => {
            assert_eq!(name, "player");
            assert!(*is_final);
            assert_eq!(
                var_type.as_ref().map(TypeRef::simple_name),
                Some("Player")
            );
        }
        other => panic!("expected local variable, got {other:?}"),
    }

    match &body.statements[2] {
        Statement::LocalVariable {
            initializer: Some(Expression::Binary { op, right, .. }),
            ..
        } => {
            assert_eq!(*op, BinaryOp::Add);
            assert!(matches!(right.as_ref(), Expression::Binary { .. }));
        }
        other => panic!("expected arithmetic initializer, got {other:?}"),
    }
}

#[test]
fn nested_classes_are_hoisted() {
    let source = r#"
public class Outer {
    public static class Events {
        public void handle() {
            run();
        }
    }

    public void top() {
        run();
    }
}
"#;
    let outcome = parse(source, "Outer.java");
    assert!(outcome.is_clean(), "errors: {:?}", outcome.errors);
    let names: Vec<_> = outcome
        .unit
        .types
        .iter()
        .map(|class| class.name.as_str())
        .collect();
    assert_eq!(names, vec!["Events", "Outer"]);
    assert_eq!(outcome.unit.types[1].methods.len(), 1);
}

#[test]
fn syntax_error_degrades_to_partial_ast() {
    let source = r#"
public class Broken {
    public static final int GOOD = 1;

    public void bad() {
        for (int i = 0; i < 10; i++) { spin(); }
        ping();
    }

    public void alsoGood() {
        pong();
    }
}
"#;
    let outcome = parse(source, "Broken.java");
    assert!(!outcome.is_clean());

    let class = &outcome.unit.types[0];
    assert_eq!(class.fields[0].name, "GOOD");
    // Both methods survive; the unsupported loop becomes an opaque statement.
    assert_eq!(class.methods.len(), 2);
    let bad = &class.methods[0];
    let body = bad.body.as_ref().unwrap();
    assert!(body
        .statements
        .iter()
        .any(|statement| matches!(statement, Statement::Opaque { .. })));
    assert!(body.statements.iter().any(|statement| matches!(
        statement,
        Statement::Expression {
            expr: Expression::MethodCall { name, .. },
            ..
        } if name == "ping"
    )));
    assert_eq!(class.methods[1].name, "alsoGood");
}

#[test]
fn parse_never_panics_on_garbage() {
    let outcome = parse("%%% ??? not java at all {{{", "garbage.java");
    assert!(!outcome.errors.is_empty());
    assert!(outcome.unit.types.is_empty());

    let outcome = parse("", "empty.java");
    assert!(outcome.is_clean());
    assert!(outcome.unit.types.is_empty());
}

#[test]
fn errors_carry_spans() {
    let source = "public class X {\n    public void m() {\n        broken(;\n    }\n}\n";
    let outcome = parse(source, "X.java");
    assert!(!outcome.errors.is_empty());
    let span = match &outcome.errors[0] {
        ParseError::Syntax { span, .. } => span,
        ParseError::UnexpectedEof { span, .. } => span,
    };
    assert_eq!(span.start_line, 3);
}