// modbridge_script/reparse - Reads generated output back into a tree
//! Parser for the exact surface the generator emits. Used by round-trip
//! tests to prove generate → reparse → regenerate is the identity on text,
//! and by golden tooling that wants structural diffs instead of text diffs.
use crate::ast::{
    ObjectMember, ScriptBinaryOp, ScriptExpression, ScriptImport, ScriptLiteral, ScriptProgram,
    ScriptStatement, ScriptUnaryOp,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReparseError {
    #[error("Unexpected token {found} at line {line}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        line: usize,
    },

    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },
}

/// Parses generated script source back into a [`ScriptProgram`].
pub fn reparse(source: &str) -> Result<ScriptProgram, ReparseError> {
    let tokens = scan(source)?;
    let mut parser = Reparser { tokens, pos: 0 };
    parser.parse_program()
}

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Ident(String),
    Number(String),
    Str(String),
    Comment(String),
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Semicolon,
    Colon,
    Dot,
    Arrow,        // =>
    Assign,       // =
    Eq,           // ===
    NotEq,        // !==
    Le,           // <=
    Ge,           // >=
    Lt,           // <
    Gt,           // >
    AndAnd,       // &&
    OrOr,         // ||
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Eof,
}

impl std::fmt::Display for Tok {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tok::Ident(name) => write!(f, "identifier '{name}'"),
            Tok::Number(value) => write!(f, "number '{value}'"),
            Tok::Str(_) => write!(f, "string literal"),
            Tok::Comment(_) => write!(f, "comment"),
            other => write!(f, "'{other:?}'"),
        }
    }
}

struct Spanned {
    tok: Tok,
    line: usize,
}

fn scan(source: &str) -> Result<Vec<Spanned>, ReparseError> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();
    let mut line = 1usize;

    while let Some(&ch) = chars.peek() {
        match ch {
            '\n' => {
                line += 1;
                chars.next();
            }
            ' ' | '\t' | '\r' => {
                chars.next();
            }
            '/' => {
                chars.next();
                if chars.peek() == Some(&'/') {
                    chars.next();
                    if chars.peek() == Some(&' ') {
                        chars.next();
                    }
                    let mut text = String::new();
                    while let Some(&next) = chars.peek() {
                        if next == '\n' {
                            break;
                        }
                        text.push(next);
                        chars.next();
                    }
                    tokens.push(Spanned {
                        tok: Tok::Comment(text),
                        line,
                    });
                } else {
                    tokens.push(Spanned {
                        tok: Tok::Slash,
                        line,
                    });
                }
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('n') => value.push('\n'),
                            Some('t') => value.push('\t'),
                            Some('r') => value.push('\r'),
                            Some('\\') => value.push('\\'),
                            Some('"') => value.push('"'),
                            Some(other) => value.push(other),
                            None => {
                                return Err(ReparseError::UnexpectedEof {
                                    expected: "closing '\"'".to_string(),
                                });
                            }
                        },
                        Some(other) => value.push(other),
                        None => {
                            return Err(ReparseError::UnexpectedEof {
                                expected: "closing '\"'".to_string(),
                            });
                        }
                    }
                }
                tokens.push(Spanned {
                    tok: Tok::Str(value),
                    line,
                });
            }
            _ if ch.is_ascii_digit() => {
                let mut value = String::new();
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_digit() || next == '.' {
                        value.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Spanned {
                    tok: Tok::Number(value),
                    line,
                });
            }
            _ if ch.is_alphabetic() || ch == '_' || ch == '$' => {
                let mut word = String::new();
                while let Some(&next) = chars.peek() {
                    if next.is_alphanumeric() || next == '_' || next == '$' {
                        word.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Spanned {
                    tok: Tok::Ident(word),
                    line,
                });
            }
            _ => {
                chars.next();
                let tok = match ch {
                    '(' => Tok::LeftParen,
                    ')' => Tok::RightParen,
                    '{' => Tok::LeftBrace,
                    '}' => Tok::RightBrace,
                    ',' => Tok::Comma,
                    ';' => Tok::Semicolon,
                    ':' => Tok::Colon,
                    '.' => Tok::Dot,
                    '+' => Tok::Plus,
                    '-' => Tok::Minus,
                    '*' => Tok::Star,
                    '%' => Tok::Percent,
                    '=' => {
                        if chars.peek() == Some(&'>') {
                            chars.next();
                            Tok::Arrow
                        } else if chars.peek() == Some(&'=') {
                            chars.next();
                            if chars.peek() == Some(&'=') {
                                chars.next();
                                Tok::Eq
                            } else {
                                return Err(ReparseError::UnexpectedToken {
                                    found: "'=='".to_string(),
                                    expected: "'==='".to_string(),
                                    line,
                                });
                            }
                        } else {
                            Tok::Assign
                        }
                    }
                    '!' => {
                        if chars.peek() == Some(&'=') {
                            chars.next();
                            if chars.peek() == Some(&'=') {
                                chars.next();
                                Tok::NotEq
                            } else {
                                return Err(ReparseError::UnexpectedToken {
                                    found: "'!='".to_string(),
                                    expected: "'!=='".to_string(),
                                    line,
                                });
                            }
                        } else {
                            Tok::Bang
                        }
                    }
                    '<' => {
                        if chars.peek() == Some(&'=') {
                            chars.next();
                            Tok::Le
                        } else {
                            Tok::Lt
                        }
                    }
                    '>' => {
                        if chars.peek() == Some(&'=') {
                            chars.next();
                            Tok::Ge
                        } else {
                            Tok::Gt
                        }
                    }
                    '&' => {
                        if chars.peek() == Some(&'&') {
                            chars.next();
                            Tok::AndAnd
                        } else {
                            return Err(ReparseError::UnexpectedToken {
                                found: "'&'".to_string(),
                                expected: "'&&'".to_string(),
                                line,
                            });
                        }
                    }
                    '|' => {
                        if chars.peek() == Some(&'|') {
                            chars.next();
                            Tok::OrOr
                        } else {
                            return Err(ReparseError::UnexpectedToken {
                                found: "'|'".to_string(),
                                expected: "'||'".to_string(),
                                line,
                            });
                        }
                    }
                    other => {
                        return Err(ReparseError::UnexpectedToken {
                            found: format!("'{other}'"),
                            expected: "a script token".to_string(),
                            line,
                        });
                    }
                };
                tokens.push(Spanned { tok, line });
            }
        }
    }
    tokens.push(Spanned {
        tok: Tok::Eof,
        line,
    });
    Ok(tokens)
}

struct Reparser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Reparser {
    fn peek(&self) -> &Tok {
        &self.tokens[self.pos.min(self.tokens.len() - 1)].tok
    }

    fn peek_ahead(&self, offset: usize) -> &Tok {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[index].tok
    }

    fn line(&self) -> usize {
        self.tokens[self.pos.min(self.tokens.len() - 1)].line
    }

    fn advance(&mut self) -> Tok {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: &Tok, what: &str) -> Result<(), ReparseError> {
        if self.peek() == expected {
            self.advance();
            Ok(())
        } else if matches!(self.peek(), Tok::Eof) {
            Err(ReparseError::UnexpectedEof {
                expected: what.to_string(),
            })
        } else {
            Err(ReparseError::UnexpectedToken {
                found: self.peek().to_string(),
                expected: what.to_string(),
                line: self.line(),
            })
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<String, ReparseError> {
        match self.peek().clone() {
            Tok::Ident(name) => {
                self.advance();
                Ok(name)
            }
            found => Err(ReparseError::UnexpectedToken {
                found: found.to_string(),
                expected: what.to_string(),
                line: self.line(),
            }),
        }
    }

    fn is_keyword(&self, word: &str) -> bool {
        matches!(self.peek(), Tok::Ident(name) if name == word)
    }

    fn eat_keyword(&mut self, word: &str) -> bool {
        if self.is_keyword(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn parse_program(&mut self) -> Result<ScriptProgram, ReparseError> {
        let mut imports = Vec::new();
        while self.is_keyword("import") {
            self.advance();
            self.expect(&Tok::LeftBrace, "'{'")?;
            let mut names = Vec::new();
            while !matches!(self.peek(), Tok::RightBrace) {
                names.push(self.expect_ident("import binding")?);
                if !matches!(self.peek(), Tok::Comma) {
                    break;
                }
                self.advance();
            }
            self.expect(&Tok::RightBrace, "'}'")?;
            if !self.eat_keyword("from") {
                return Err(ReparseError::UnexpectedToken {
                    found: self.peek().to_string(),
                    expected: "'from'".to_string(),
                    line: self.line(),
                });
            }
            let module = match self.advance() {
                Tok::Str(module) => module,
                found => {
                    return Err(ReparseError::UnexpectedToken {
                        found: found.to_string(),
                        expected: "module string".to_string(),
                        line: self.line(),
                    });
                }
            };
            self.expect(&Tok::Semicolon, "';'")?;
            imports.push(ScriptImport { names, module });
        }

        let mut statements = Vec::new();
        while !matches!(self.peek(), Tok::Eof) {
            statements.push(self.parse_statement()?);
        }
        Ok(ScriptProgram {
            imports,
            statements,
        })
    }

    fn parse_statement(&mut self) -> Result<ScriptStatement, ReparseError> {
        if let Tok::Comment(text) = self.peek().clone() {
            self.advance();
            return Ok(ScriptStatement::Comment(text));
        }
        if self.eat_keyword("const") {
            let name = self.expect_ident("const name")?;
            self.expect(&Tok::Assign, "'='")?;
            let value = self.parse_expression()?;
            self.expect(&Tok::Semicolon, "';'")?;
            return Ok(ScriptStatement::Const { name, value });
        }
        if self.eat_keyword("function") {
            let name = self.expect_ident("function name")?;
            self.expect(&Tok::LeftParen, "'('")?;
            let mut params = Vec::new();
            while !matches!(self.peek(), Tok::RightParen) {
                params.push(self.expect_ident("parameter")?);
                if !matches!(self.peek(), Tok::Comma) {
                    break;
                }
                self.advance();
            }
            self.expect(&Tok::RightParen, "')'")?;
            let body = self.parse_braced_statements()?;
            return Ok(ScriptStatement::Function { name, params, body });
        }
        if self.eat_keyword("return") {
            if matches!(self.peek(), Tok::Semicolon) {
                self.advance();
                return Ok(ScriptStatement::Return(None));
            }
            let value = self.parse_expression()?;
            self.expect(&Tok::Semicolon, "';'")?;
            return Ok(ScriptStatement::Return(Some(value)));
        }
        if self.eat_keyword("if") {
            self.expect(&Tok::LeftParen, "'('")?;
            let condition = self.parse_expression()?;
            self.expect(&Tok::RightParen, "')'")?;
            let then_branch = self.parse_braced_statements()?;
            let else_branch = if self.eat_keyword("else") {
                Some(self.parse_braced_statements()?)
            } else {
                None
            };
            return Ok(ScriptStatement::If {
                condition,
                then_branch,
                else_branch,
            });
        }
        let expr = self.parse_expression()?;
        self.expect(&Tok::Semicolon, "';'")?;
        Ok(ScriptStatement::Expression(expr))
    }

    fn parse_braced_statements(&mut self) -> Result<Vec<ScriptStatement>, ReparseError> {
        self.expect(&Tok::LeftBrace, "'{'")?;
        let mut statements = Vec::new();
        while !matches!(self.peek(), Tok::RightBrace | Tok::Eof) {
            statements.push(self.parse_statement()?);
        }
        self.expect(&Tok::RightBrace, "'}'")?;
        Ok(statements)
    }

    fn parse_expression(&mut self) -> Result<ScriptExpression, ReparseError> {
        let target = self.parse_or()?;
        if matches!(self.peek(), Tok::Assign) {
            self.advance();
            let value = self.parse_expression()?;
            return Ok(ScriptExpression::Assign {
                target: Box::new(target),
                value: Box::new(value),
            });
        }
        Ok(target)
    }

    fn parse_or(&mut self) -> Result<ScriptExpression, ReparseError> {
        let mut left = self.parse_and()?;
        while matches!(self.peek(), Tok::OrOr) {
            self.advance();
            let right = self.parse_and()?;
            left = binary(left, ScriptBinaryOp::Or, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<ScriptExpression, ReparseError> {
        let mut left = self.parse_equality()?;
        while matches!(self.peek(), Tok::AndAnd) {
            self.advance();
            let right = self.parse_equality()?;
            left = binary(left, ScriptBinaryOp::And, right);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<ScriptExpression, ReparseError> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.peek() {
                Tok::Eq => ScriptBinaryOp::Equal,
                Tok::NotEq => ScriptBinaryOp::NotEqual,
                _ => break,
            };
            self.advance();
            let right = self.parse_relational()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<ScriptExpression, ReparseError> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                Tok::Lt => ScriptBinaryOp::Less,
                Tok::Le => ScriptBinaryOp::LessEqual,
                Tok::Gt => ScriptBinaryOp::Greater,
                Tok::Ge => ScriptBinaryOp::GreaterEqual,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<ScriptExpression, ReparseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Tok::Plus => ScriptBinaryOp::Add,
                Tok::Minus => ScriptBinaryOp::Subtract,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<ScriptExpression, ReparseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Tok::Star => ScriptBinaryOp::Multiply,
                Tok::Slash => ScriptBinaryOp::Divide,
                Tok::Percent => ScriptBinaryOp::Modulo,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<ScriptExpression, ReparseError> {
        let op = match self.peek() {
            Tok::Bang => Some(ScriptUnaryOp::Not),
            Tok::Minus => Some(ScriptUnaryOp::Minus),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(ScriptExpression::Unary {
                op,
                operand: Box::new(operand),
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<ScriptExpression, ReparseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek() {
                Tok::Dot => {
                    self.advance();
                    let property = self.expect_ident("member name")?;
                    expr = ScriptExpression::Member {
                        object: Box::new(expr),
                        property,
                    };
                }
                Tok::LeftParen => {
                    self.advance();
                    let mut arguments = Vec::new();
                    while !matches!(self.peek(), Tok::RightParen) {
                        arguments.push(self.parse_expression()?);
                        if !matches!(self.peek(), Tok::Comma) {
                            break;
                        }
                        self.advance();
                    }
                    self.expect(&Tok::RightParen, "')'")?;
                    expr = ScriptExpression::Call {
                        callee: Box::new(expr),
                        arguments,
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<ScriptExpression, ReparseError> {
        match self.peek().clone() {
            Tok::Number(value) => {
                self.advance();
                Ok(ScriptExpression::Literal(ScriptLiteral::Number(value)))
            }
            Tok::Str(value) => {
                self.advance();
                Ok(ScriptExpression::Literal(ScriptLiteral::String(value)))
            }
            Tok::Ident(name) => {
                self.advance();
                match name.as_str() {
                    "true" => Ok(ScriptExpression::Literal(ScriptLiteral::Boolean(true))),
                    "false" => Ok(ScriptExpression::Literal(ScriptLiteral::Boolean(false))),
                    "null" => Ok(ScriptExpression::Literal(ScriptLiteral::Null)),
                    _ => Ok(ScriptExpression::Identifier(name)),
                }
            }
            Tok::LeftParen => {
                if self.looks_like_arrow() {
                    self.parse_arrow()
                } else {
                    self.advance();
                    let expr = self.parse_expression()?;
                    self.expect(&Tok::RightParen, "')'")?;
                    Ok(expr)
                }
            }
            Tok::LeftBrace => self.parse_object(),
            found => Err(ReparseError::UnexpectedToken {
                found: found.to_string(),
                expected: "an expression".to_string(),
                line: self.line(),
            }),
        }
    }

    fn looks_like_arrow(&self) -> bool {
        let mut index = 1usize;
        let mut depth = 1usize;
        while depth > 0 {
            match self.peek_ahead(index) {
                Tok::LeftParen => depth += 1,
                Tok::RightParen => depth -= 1,
                Tok::Eof => return false,
                _ => {}
            }
            index += 1;
        }
        matches!(self.peek_ahead(index), Tok::Arrow)
    }

    fn parse_arrow(&mut self) -> Result<ScriptExpression, ReparseError> {
        self.expect(&Tok::LeftParen, "'('")?;
        let mut params = Vec::new();
        while !matches!(self.peek(), Tok::RightParen) {
            params.push(self.expect_ident("arrow parameter")?);
            if !matches!(self.peek(), Tok::Comma) {
                break;
            }
            self.advance();
        }
        self.expect(&Tok::RightParen, "')'")?;
        self.expect(&Tok::Arrow, "'=>'")?;
        let body = self.parse_braced_statements()?;
        Ok(ScriptExpression::Arrow { params, body })
    }

    fn parse_object(&mut self) -> Result<ScriptExpression, ReparseError> {
        self.expect(&Tok::LeftBrace, "'{'")?;
        let mut members = Vec::new();
        loop {
            match self.peek().clone() {
                Tok::RightBrace => {
                    self.advance();
                    break;
                }
                Tok::Comment(text) => {
                    self.advance();
                    members.push(ObjectMember::Comment(text));
                }
                Tok::Ident(key) => {
                    self.advance();
                    self.expect(&Tok::Colon, "':'")?;
                    let value = self.parse_expression()?;
                    if matches!(self.peek(), Tok::Comma) {
                        self.advance();
                    }
                    members.push(ObjectMember::Property { key, value });
                }
                Tok::Str(key) => {
                    self.advance();
                    self.expect(&Tok::Colon, "':'")?;
                    let value = self.parse_expression()?;
                    if matches!(self.peek(), Tok::Comma) {
                        self.advance();
                    }
                    members.push(ObjectMember::Property { key, value });
                }
                found => {
                    return Err(ReparseError::UnexpectedToken {
                        found: found.to_string(),
                        expected: "object member".to_string(),
                        line: self.line(),
                    });
                }
            }
        }
        Ok(ScriptExpression::Object(members))
    }
}

fn binary(
    left: ScriptExpression,
    op: ScriptBinaryOp,
    right: ScriptExpression,
) -> ScriptExpression {
    ScriptExpression::Binary {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}
