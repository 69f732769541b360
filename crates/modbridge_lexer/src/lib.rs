// modbridge_lexer - Tolerant tokenizer for the Java-flavored mod source subset
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Token types for the supported source subset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    // Literals
    String(String),
    /// Stored as written, numeric suffixes (`3.0f`, `20L`) included.
    Number(String),
    Character(char),
    Identifier(String),

    // Keywords
    Package,
    Import,
    Class,
    Interface,
    Extends,
    Implements,
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
    New,
    Return,
    If,
    Else,
    Void,
    True,
    False,
    Null,

    // Operators
    Assign,       // =
    Plus,         // +
    Minus,        // -
    Multiply,     // *
    Divide,       // /
    Modulo,       // %
    Equal,        // ==
    NotEqual,     // !=
    Less,         // <
    LessEqual,    // <=
    Greater,      // >
    GreaterEqual, // >=
    And,          // &&
    Or,           // ||
    Not,          // !

    // Arrow and member operators
    Arrow,       // ->
    DoubleColon, // ::

    // Punctuation
    LeftParen,    // (
    RightParen,   // )
    LeftBrace,    // {
    RightBrace,   // }
    LeftBracket,  // [
    RightBracket, // ]
    Comma,        // ,
    Dot,          // .
    Semicolon,    // ;
    Colon,        // :
    At,           // @
    Question,     // ?

    /// Characters outside the subset; the parser reports and skips these.
    Unrecognized(char),

    Eof,
}

/// A token with its 1-based source position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub token_type: TokenType,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(token_type: TokenType, line: usize, column: usize) -> Self {
        Self {
            token_type,
            line,
            column,
        }
    }
}

/// Recoverable scan problems. The lexer never aborts: it records the error,
/// resynchronizes, and keeps scanning so the parser can produce a partial
/// tree for the rest of the file.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("Unexpected character '{character}' at {line}:{column}")]
    UnexpectedCharacter {
        character: char,
        line: usize,
        column: usize,
    },
    #[error("Unterminated string literal starting at {line}:{column}")]
    UnterminatedString { line: usize, column: usize },
    #[error("Unterminated block comment starting at {line}:{column}")]
    UnterminatedBlockComment { line: usize, column: usize },
    #[error("Unterminated character literal at {line}:{column}")]
    UnterminatedCharacter { line: usize, column: usize },
}

impl LexError {
    /// 1-based line/column where the problem starts.
    pub fn position(&self) -> (usize, usize) {
        match self {
            LexError::UnexpectedCharacter { line, column, .. }
            | LexError::UnterminatedString { line, column }
            | LexError::UnterminatedBlockComment { line, column }
            | LexError::UnterminatedCharacter { line, column } => (*line, *column),
        }
    }
}

static KEYWORDS: Lazy<HashMap<&'static str, TokenType>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert("package", TokenType::Package);
    map.insert("import", TokenType::Import);
    map.insert("class", TokenType::Class);
    map.insert("interface", TokenType::Interface);
    map.insert("extends", TokenType::Extends);
    map.insert("implements", TokenType::Implements);
    map.insert("public", TokenType::Public);
    map.insert("protected", TokenType::Protected);
    map.insert("private", TokenType::Private);
    map.insert("static", TokenType::Static);
    map.insert("final", TokenType::Final);
    map.insert("abstract", TokenType::Abstract);
    map.insert("new", TokenType::New);
    map.insert("return", TokenType::Return);
    map.insert("if", TokenType::If);
    map.insert("else", TokenType::Else);
    map.insert("void", TokenType::Void);
    map.insert("true", TokenType::True);
    map.insert("false", TokenType::False);
    map.insert("null", TokenType::Null);
    map
});

/// Scans `source` into tokens plus any recoverable errors. Always terminates
/// with an `Eof` token.
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<LexError>) {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn run(mut self) -> (Vec<Token>, Vec<LexError>) {
        while let Some(&ch) = self.chars.peek() {
            match ch {
                ' ' | '\t' | '\r' | '\n' => {
                    self.advance();
                }
                '/' => self.scan_slash(),
                '"' => self.scan_string(),
                '\'' => self.scan_character(),
                _ if ch.is_ascii_digit() => self.scan_number(),
                _ if ch.is_alphabetic() || ch == '_' || ch == '$' => self.scan_word(),
                _ => self.scan_symbol(),
            }
        }
        self.tokens
            .push(Token::new(TokenType::Eof, self.line, self.column));
        (self.tokens, self.errors)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn push(&mut self, token_type: TokenType, line: usize, column: usize) {
        self.tokens.push(Token::new(token_type, line, column));
    }

    fn scan_slash(&mut self) {
        let (line, column) = (self.line, self.column);
        self.advance();
        match self.chars.peek() {
            Some('/') => {
                while let Some(&ch) = self.chars.peek() {
                    if ch == '\n' {
                        break;
                    }
                    self.advance();
                }
            }
            Some('*') => {
                self.advance();
                let mut closed = false;
                while let Some(ch) = self.advance() {
                    if ch == '*' && self.chars.peek() == Some(&'/') {
                        self.advance();
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    self.errors
                        .push(LexError::UnterminatedBlockComment { line, column });
                }
            }
            _ => self.push(TokenType::Divide, line, column),
        }
    }

    fn scan_string(&mut self) {
        let (line, column) = (self.line, self.column);
        self.advance();
        let mut value = String::new();
        loop {
            match self.advance() {
                Some('"') => {
                    self.push(TokenType::String(value), line, column);
                    return;
                }
                Some('\\') => match self.advance() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('\\') => value.push('\\'),
                    Some('"') => value.push('"'),
                    Some('\'') => value.push('\''),
                    Some(other) => value.push(other),
                    None => {
                        self.errors
                            .push(LexError::UnterminatedString { line, column });
                        return;
                    }
                },
                Some('\n') | None => {
                    self.errors
                        .push(LexError::UnterminatedString { line, column });
                    self.push(TokenType::String(value), line, column);
                    return;
                }
                Some(ch) => value.push(ch),
            }
        }
    }

    fn scan_character(&mut self) {
        let (line, column) = (self.line, self.column);
        self.advance();
        let value = match self.advance() {
            Some('\\') => match self.advance() {
                Some('n') => '\n',
                Some('t') => '\t',
                Some('\\') => '\\',
                Some('\'') => '\'',
                Some(other) => other,
                None => {
                    self.errors
                        .push(LexError::UnterminatedCharacter { line, column });
                    return;
                }
            },
            Some(ch) if ch != '\'' => ch,
            _ => {
                self.errors
                    .push(LexError::UnterminatedCharacter { line, column });
                return;
            }
        };
        if self.chars.peek() == Some(&'\'') {
            self.advance();
            self.push(TokenType::Character(value), line, column);
        } else {
            self.errors
                .push(LexError::UnterminatedCharacter { line, column });
        }
    }

    fn scan_number(&mut self) {
        let (line, column) = (self.line, self.column);
        let mut value = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_digit() || ch == '.' || ch == '_' {
                // A dot only belongs to the number when a digit follows;
                // `3.strength()` must not swallow the member access.
                if ch == '.' {
                    let mut lookahead = self.chars.clone();
                    lookahead.next();
                    match lookahead.peek() {
                        Some(next) if next.is_ascii_digit() => {}
                        _ => break,
                    }
                }
                value.push(ch);
                self.advance();
            } else if matches!(ch, 'f' | 'F' | 'd' | 'D' | 'l' | 'L') {
                value.push(ch);
                self.advance();
                break;
            } else {
                break;
            }
        }
        self.push(TokenType::Number(value), line, column);
    }

    fn scan_word(&mut self) {
        let (line, column) = (self.line, self.column);
        let mut word = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_alphanumeric() || ch == '_' || ch == '$' {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        let token_type = KEYWORDS
            .get(word.as_str())
            .cloned()
            .unwrap_or(TokenType::Identifier(word));
        self.push(token_type, line, column);
    }

    fn scan_symbol(&mut self) {
        let (line, column) = (self.line, self.column);
        let ch = match self.advance() {
            Some(ch) => ch,
            None => return,
        };
        let token_type = match ch {
            '=' => self.pair('=', TokenType::Equal, TokenType::Assign),
            '+' => TokenType::Plus,
            '-' => self.pair('>', TokenType::Arrow, TokenType::Minus),
            '*' => TokenType::Multiply,
            '%' => TokenType::Modulo,
            '!' => self.pair('=', TokenType::NotEqual, TokenType::Not),
            '<' => self.pair('=', TokenType::LessEqual, TokenType::Less),
            '>' => self.pair('=', TokenType::GreaterEqual, TokenType::Greater),
            '&' => {
                if self.chars.peek() == Some(&'&') {
                    self.advance();
                    TokenType::And
                } else {
                    self.unexpected('&', line, column);
                    TokenType::Unrecognized('&')
                }
            }
            '|' => {
                if self.chars.peek() == Some(&'|') {
                    self.advance();
                    TokenType::Or
                } else {
                    self.unexpected('|', line, column);
                    TokenType::Unrecognized('|')
                }
            }
            ':' => self.pair(':', TokenType::DoubleColon, TokenType::Colon),
            '(' => TokenType::LeftParen,
            ')' => TokenType::RightParen,
            '{' => TokenType::LeftBrace,
            '}' => TokenType::RightBrace,
            '[' => TokenType::LeftBracket,
            ']' => TokenType::RightBracket,
            ',' => TokenType::Comma,
            '.' => TokenType::Dot,
            ';' => TokenType::Semicolon,
            '@' => TokenType::At,
            '?' => TokenType::Question,
            other => {
                self.unexpected(other, line, column);
                TokenType::Unrecognized(other)
            }
        };
        self.push(token_type, line, column);
    }

    fn pair(&mut self, next: char, matched: TokenType, single: TokenType) -> TokenType {
        if self.chars.peek() == Some(&next) {
            self.advance();
            matched
        } else {
            single
        }
    }

    fn unexpected(&mut self, character: char, line: usize, column: usize) {
        self.errors.push(LexError::UnexpectedCharacter {
            character,
            line,
            column,
        });
    }
}

#[cfg(test)]
mod tests;
