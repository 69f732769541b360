use super::*;

fn types(source: &str) -> Vec<TokenType> {
    let (tokens, errors) = tokenize(source);
    assert!(errors.is_empty(), "unexpected lex errors: {errors:?}");
    tokens.into_iter().map(|token| token.token_type).collect()
}

#[test]
fn scans_field_declaration() {
    let found = types("public static final RegistryObject<Block> RUBY_BLOCK;");
    assert_eq!(
        found,
        vec![
            TokenType::Public,
            TokenType::Static,
            TokenType::Final,
            TokenType::Identifier("RegistryObject".to_string()),
            TokenType::Less,
            TokenType::Identifier("Block".to_string()),
            TokenType::Greater,
            TokenType::Identifier("RUBY_BLOCK".to_string()),
            TokenType::Semicolon,
            TokenType::Eof,
        ]
    );
}

#[test]
fn scans_annotations_and_strings() {
    let found = types("@Mod(\"examplemod\")");
    assert_eq!(
        found,
        vec![
            TokenType::At,
            TokenType::Identifier("Mod".to_string()),
            TokenType::LeftParen,
            TokenType::String("examplemod".to_string()),
            TokenType::RightParen,
            TokenType::Eof,
        ]
    );
}

#[test]
fn keeps_numeric_suffixes() {
    let found = types("strength(3.0f, 6L)");
    assert!(found.contains(&TokenType::Number("3.0f".to_string())));
    assert!(found.contains(&TokenType::Number("6L".to_string())));
}

#[test]
fn number_does_not_swallow_member_access() {
    let found = types("3.toString");
    assert_eq!(
        found,
        vec![
            TokenType::Number("3".to_string()),
            TokenType::Dot,
            TokenType::Identifier("toString".to_string()),
            TokenType::Eof,
        ]
    );
}

#[test]
fn scans_arrow_and_method_reference() {
    let found = types("() -> ModBlocks::register");
    assert_eq!(
        found,
        vec![
            TokenType::LeftParen,
            TokenType::RightParen,
            TokenType::Arrow,
            TokenType::Identifier("ModBlocks".to_string()),
            TokenType::DoubleColon,
            TokenType::Identifier("register".to_string()),
            TokenType::Eof,
        ]
    );
}

#[test]
fn skips_line_and_block_comments() {
    let found = types("a // trailing\n/* block\ncomment */ b");
    assert_eq!(
        found,
        vec![
            TokenType::Identifier("a".to_string()),
            TokenType::Identifier("b".to_string()),
            TokenType::Eof,
        ]
    );
}

#[test]
fn string_escapes() {
    let found = types(r#""line\nbreak \"quoted\"""#);
    assert_eq!(
        found[0],
        TokenType::String("line\nbreak \"quoted\"".to_string())
    );
}

#[test]
fn unterminated_string_is_reported_not_fatal() {
    let (tokens, errors) = tokenize("\"oops\nnext");
    assert_eq!(
        errors,
        vec![LexError::UnterminatedString { line: 1, column: 1 }]
    );
    // Scanning resumes on the following line.
    assert!(tokens
        .iter()
        .any(|token| token.token_type == TokenType::Identifier("next".to_string())));
}

#[test]
fn unexpected_character_is_reported_and_carried() {
    let (tokens, errors) = tokenize("a # b");
    assert_eq!(
        errors,
        vec![LexError::UnexpectedCharacter {
            character: '#',
            line: 1,
            column: 3,
        }]
    );
    assert!(tokens
        .iter()
        .any(|token| token.token_type == TokenType::Unrecognized('#')));
}

#[test]
fn tracks_positions_across_lines() {
    let (tokens, _) = tokenize("a\n  b");
    assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
    assert_eq!((tokens[1].line, tokens[1].column), (2, 3));
}
