use crate::*;

fn span() -> Span {
    Span::new(1, 1, 1, 10)
}

#[test]
fn span_merge_takes_outer_bounds() {
    let first = Span::new(1, 5, 2, 3);
    let second = Span::new(2, 1, 4, 9);
    assert_eq!(first.merge(&second), Span::new(1, 5, 4, 9));
    assert_eq!(second.merge(&first), Span::new(1, 5, 4, 9));
}

#[test]
fn span_containment() {
    let outer = Span::new(10, 1, 40, 2);
    let inner = Span::new(12, 5, 13, 8);
    assert!(outer.contains(&inner));
    assert!(!inner.contains(&outer));
}

#[test]
fn type_ref_simple_name_unwraps_generics_and_arrays() {
    let ty = TypeRef::Generic {
        name: "RegistryObject".to_string(),
        type_args: vec![TypeRef::Named("Block".to_string())],
    };
    assert_eq!(ty.simple_name(), "RegistryObject");
    assert_eq!(ty.first_type_arg().map(TypeRef::simple_name), Some("Block"));

    let array = TypeRef::Array(Box::new(TypeRef::Named("String".to_string())));
    assert_eq!(array.simple_name(), "String");
}

#[test]
fn annotation_argument_lookup() {
    let annotation = Annotation::new(
        "Mod.EventBusSubscriber",
        vec![AnnotationArgument::Named {
            name: "modid".to_string(),
            value: Literal::String("examplemod".to_string()),
        }],
        span(),
    );
    assert_eq!(annotation.simple_name(), "EventBusSubscriber");
    assert_eq!(annotation.named_string_argument("modid"), Some("examplemod"));
    assert_eq!(annotation.single_string_argument(), None);

    let holder = Annotation::new(
        "ObjectHolder",
        vec![AnnotationArgument::Positional(Literal::String(
            "examplemod:ruby_block".to_string(),
        ))],
        span(),
    );
    assert_eq!(
        holder.single_string_argument(),
        Some("examplemod:ruby_block")
    );
}

#[test]
fn dotted_name_flattens_field_access_chains() {
    let expr = Expression::FieldAccess {
        receiver: Box::new(Expression::FieldAccess {
            receiver: Box::new(Expression::Identifier {
                name: "PlayerBlockBreakEvents".to_string(),
                span: span(),
            }),
            name: "BEFORE".to_string(),
            span: span(),
        }),
        name: "inner".to_string(),
        span: span(),
    };
    assert_eq!(
        dotted_name(&expr),
        Some("PlayerBlockBreakEvents.BEFORE.inner".to_string())
    );

    let call = Expression::MethodCall {
        receiver: Some(Box::new(Expression::Identifier {
            name: "Registry".to_string(),
            span: span(),
        })),
        name: "register".to_string(),
        arguments: vec![],
        span: span(),
    };
    assert_eq!(dotted_name(&call), None);
    assert_eq!(call_receiver_path(&call), Some("Registry".to_string()));
}

#[test]
fn resource_id_split() {
    assert_eq!(
        split_resource_id("examplemod:ruby_block"),
        (Some("examplemod"), "ruby_block")
    );
    assert_eq!(split_resource_id("ruby_block"), (None, "ruby_block"));
}

#[test]
fn ast_round_trips_through_serde() {
    let unit = CompilationUnit {
        package: Some("com.example.mod".to_string()),
        imports: vec![ImportDecl {
            path: "net.minecraft.block.Block".to_string(),
            is_static: false,
            span: span(),
        }],
        types: vec![ClassDecl {
            name: "ModBlocks".to_string(),
            is_interface: false,
            annotations: vec![],
            modifiers: Modifiers {
                visibility: Visibility::Public,
                ..Default::default()
            },
            superclass: None,
            interfaces: vec![],
            fields: vec![],
            methods: vec![],
            span: span(),
        }],
        span: span(),
    };

    let json = serde_json::to_string(&unit).unwrap();
    let back: CompilationUnit = serde_json::from_str(&json).unwrap();
    assert_eq!(back, unit);
}
