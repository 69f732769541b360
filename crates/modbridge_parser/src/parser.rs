// modbridge_parser/parser - Recursive-descent implementation
use crate::ParseError;
use modbridge_ast::{
    Annotation, AnnotationArgument, BinaryOp, Block, ClassDecl, CompilationUnit, Expression,
    FieldDecl, ImportDecl, LambdaBody, Literal, MethodDecl, Modifiers, Parameter, Span, Statement,
    TypeRef, UnaryOp, Visibility, dotted_name,
};
use modbridge_lexer::{Token, TokenType};

pub(crate) struct Parser<'a> {
    lines: Vec<&'a str>,
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<ParseError>,
}

enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
}

impl<'a> Parser<'a> {
    pub(crate) fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        Self {
            lines: source.lines().collect(),
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    pub(crate) fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    // ---- token plumbing ----

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &TokenType {
        &self.current().token_type
    }

    fn peek_ahead(&self, offset: usize) -> &TokenType {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[index].token_type
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, token_type: &TokenType) -> bool {
        self.peek() == token_type
    }

    fn matches(&mut self, token_type: &TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token_type: TokenType, expected: &str) -> Result<Token, ParseError> {
        if self.check(&token_type) {
            Ok(self.advance())
        } else if self.at_eof() {
            Err(ParseError::UnexpectedEof {
                expected: expected.to_string(),
                span: self.here(),
            })
        } else {
            Err(ParseError::Syntax {
                message: format!("expected {expected}, found {:?}", self.peek()),
                span: self.here(),
            })
        }
    }

    fn expect_identifier(&mut self, expected: &str) -> Result<(String, Token), ParseError> {
        match self.peek() {
            TokenType::Identifier(_) => {
                let token = self.advance();
                let name = match &token.token_type {
                    TokenType::Identifier(name) => name.clone(),
                    _ => unreachable!(),
                };
                Ok((name, token))
            }
            _ => Err(ParseError::Syntax {
                message: format!("expected {expected}, found {:?}", self.peek()),
                span: self.here(),
            }),
        }
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek(), TokenType::Eof)
    }

    fn here(&self) -> Span {
        let token = self.current();
        Span::point(token.line, token.column)
    }

    fn span_from(&self, start: &Token) -> Span {
        let end = &self.tokens[self.pos.saturating_sub(1).min(self.tokens.len() - 1)];
        Span::new(start.line, start.column, end.line, end.column)
    }

    fn error(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    /// Raw source text between two lines, used for opaque statements.
    fn line_text(&self, start_line: usize, end_line: usize) -> String {
        let start = start_line.saturating_sub(1).min(self.lines.len());
        let end = end_line.min(self.lines.len());
        self.lines[start..end]
            .iter()
            .map(|line| line.trim())
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ---- compilation unit ----

    pub(crate) fn parse_compilation_unit(&mut self) -> CompilationUnit {
        let start = self.current().clone();

        let package = if self.matches(&TokenType::Package) {
            let path = self.parse_dotted_path();
            if !self.matches(&TokenType::Semicolon) {
                let span = self.here();
                self.error(ParseError::Syntax {
                    message: "expected ';' after package declaration".to_string(),
                    span,
                });
            }
            path
        } else {
            None
        };

        let mut imports = Vec::new();
        while self.check(&TokenType::Import) {
            let import_start = self.advance();
            let is_static = self.matches(&TokenType::Static);
            let mut path = match self.parse_dotted_path() {
                Some(path) => path,
                None => {
                    let span = self.here();
                    self.error(ParseError::Syntax {
                        message: "expected import path".to_string(),
                        span,
                    });
                    self.skip_until_semicolon();
                    continue;
                }
            };
            if self.matches(&TokenType::Multiply) {
                path.push_str(".*");
            }
            if !self.matches(&TokenType::Semicolon) {
                let span = self.here();
                self.error(ParseError::Syntax {
                    message: "expected ';' after import".to_string(),
                    span,
                });
                self.skip_until_semicolon();
            }
            imports.push(ImportDecl {
                path,
                is_static,
                span: self.span_from(&import_start),
            });
        }

        let mut types = Vec::new();
        while !self.at_eof() {
            if self.matches(&TokenType::Semicolon) {
                continue;
            }
            if let Err(error) = self.parse_type_decl(&mut types) {
                self.error(error);
                self.recover_top_level();
            }
        }

        CompilationUnit {
            package,
            imports,
            types,
            span: self.span_from(&start),
        }
    }

    /// `a.b.c` path; also consumes the trailing dot of `a.b.` so `.*`
    /// imports can check for the `*` directly.
    fn parse_dotted_path(&mut self) -> Option<String> {
        let (first, _) = self.expect_identifier("identifier").ok()?;
        let mut path = first;
        while self.check(&TokenType::Dot) {
            if let TokenType::Identifier(segment) = self.peek_ahead(1) {
                let segment = segment.clone();
                self.advance();
                self.advance();
                path.push('.');
                path.push_str(&segment);
            } else {
                // `import a.b.*;` leaves the `*` for the caller.
                self.advance();
                break;
            }
        }
        Some(path)
    }

    fn recover_top_level(&mut self) {
        loop {
            match self.peek() {
                TokenType::Eof
                | TokenType::At
                | TokenType::Class
                | TokenType::Interface
                | TokenType::Public
                | TokenType::Protected
                | TokenType::Private
                | TokenType::Static
                | TokenType::Final
                | TokenType::Abstract => break,
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn skip_until_semicolon(&mut self) {
        while !self.at_eof() && !self.matches(&TokenType::Semicolon) {
            self.advance();
        }
    }

    // ---- type declarations ----

    fn parse_type_decl(&mut self, out: &mut Vec<ClassDecl>) -> Result<(), ParseError> {
        let annotations = self.parse_annotations()?;
        let modifiers = self.parse_modifiers();
        self.parse_type_decl_with(annotations, modifiers, out)
    }

    fn parse_type_decl_with(
        &mut self,
        annotations: Vec<Annotation>,
        modifiers: Modifiers,
        out: &mut Vec<ClassDecl>,
    ) -> Result<(), ParseError> {
        let start = self.current().clone();
        let is_interface = match self.peek() {
            TokenType::Class => {
                self.advance();
                false
            }
            TokenType::Interface => {
                self.advance();
                true
            }
            _ => {
                return Err(ParseError::Syntax {
                    message: format!("expected type declaration, found {:?}", self.peek()),
                    span: self.here(),
                });
            }
        };

        let (name, _) = self.expect_identifier("type name")?;

        let mut superclass = None;
        let mut interfaces = Vec::new();
        if self.matches(&TokenType::Extends) {
            if is_interface {
                interfaces = self.parse_type_list()?;
            } else {
                superclass = Some(self.parse_type()?);
            }
        }
        if self.matches(&TokenType::Implements) {
            interfaces.extend(self.parse_type_list()?);
        }

        self.expect(TokenType::LeftBrace, "'{'")?;

        let mut fields = Vec::new();
        let mut methods = Vec::new();
        loop {
            match self.peek() {
                TokenType::RightBrace => {
                    self.advance();
                    break;
                }
                TokenType::Eof => {
                    let span = self.here();
                    self.error(ParseError::UnexpectedEof {
                        expected: format!("'}}' closing {name}"),
                        span,
                    });
                    break;
                }
                TokenType::Semicolon => {
                    self.advance();
                }
                _ => {
                    let member_annotations = match self.parse_annotations() {
                        Ok(annotations) => annotations,
                        Err(error) => {
                            self.error(error);
                            self.recover_member();
                            continue;
                        }
                    };
                    let member_modifiers = self.parse_modifiers();
                    if matches!(self.peek(), TokenType::Class | TokenType::Interface) {
                        // Nested types are hoisted; see the crate docs.
                        if let Err(error) =
                            self.parse_type_decl_with(member_annotations, member_modifiers, out)
                        {
                            self.error(error);
                            self.recover_member();
                        }
                        continue;
                    }
                    match self.parse_member(member_annotations, member_modifiers) {
                        Ok(Member::Field(field)) => fields.push(field),
                        Ok(Member::Method(method)) => methods.push(method),
                        Err(error) => {
                            self.error(error);
                            self.recover_member();
                        }
                    }
                }
            }
        }

        out.push(ClassDecl {
            name,
            is_interface,
            annotations,
            modifiers,
            superclass,
            interfaces,
            fields,
            methods,
            span: self.span_from(&start),
        });
        Ok(())
    }

    /// Skips a broken member: to the next ';' at brace depth zero, or past a
    /// balanced '{'..'}' body, leaving the closing class brace alone.
    fn recover_member(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                TokenType::Eof => break,
                TokenType::Semicolon if depth == 0 => {
                    self.advance();
                    break;
                }
                TokenType::LeftBrace => {
                    depth += 1;
                    self.advance();
                }
                TokenType::RightBrace => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                    self.advance();
                    if depth == 0 {
                        break;
                    }
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn parse_annotations(&mut self) -> Result<Vec<Annotation>, ParseError> {
        let mut annotations = Vec::new();
        while self.check(&TokenType::At) {
            let start = self.advance();
            let name = match self.parse_dotted_path() {
                Some(name) => name,
                None => {
                    return Err(ParseError::Syntax {
                        message: "expected annotation name after '@'".to_string(),
                        span: self.here(),
                    });
                }
            };
            let mut arguments = Vec::new();
            if self.matches(&TokenType::LeftParen) {
                while !self.check(&TokenType::RightParen) && !self.at_eof() {
                    arguments.push(self.parse_annotation_argument()?);
                    if !self.matches(&TokenType::Comma) {
                        break;
                    }
                }
                self.expect(TokenType::RightParen, "')' closing annotation arguments")?;
            }
            annotations.push(Annotation::new(name, arguments, self.span_from(&start)));
        }
        Ok(annotations)
    }

    fn parse_annotation_argument(&mut self) -> Result<AnnotationArgument, ParseError> {
        if matches!(self.peek(), TokenType::Identifier(_))
            && matches!(self.peek_ahead(1), TokenType::Assign)
        {
            let (name, _) = self.expect_identifier("argument name")?;
            self.advance(); // '='
            let value = self.parse_annotation_value()?;
            Ok(AnnotationArgument::Named { name, value })
        } else {
            Ok(AnnotationArgument::Positional(
                self.parse_annotation_value()?,
            ))
        }
    }

    fn parse_annotation_value(&mut self) -> Result<Literal, ParseError> {
        match self.peek().clone() {
            TokenType::String(value) => {
                self.advance();
                Ok(Literal::String(value))
            }
            TokenType::Number(value) => {
                self.advance();
                Ok(Literal::Number(value))
            }
            TokenType::Character(value) => {
                self.advance();
                Ok(Literal::Character(value))
            }
            TokenType::True => {
                self.advance();
                Ok(Literal::Boolean(true))
            }
            TokenType::False => {
                self.advance();
                Ok(Literal::Boolean(false))
            }
            TokenType::Null => {
                self.advance();
                Ok(Literal::Null)
            }
            TokenType::Identifier(_) => {
                // Constant references such as `Bus.FORGE` are kept as their
                // dotted spelling.
                let path = self.parse_dotted_path().unwrap_or_default();
                Ok(Literal::String(path))
            }
            other => Err(ParseError::Syntax {
                message: format!("unsupported annotation value: {other:?}"),
                span: self.here(),
            }),
        }
    }

    fn parse_modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::default();
        loop {
            match self.peek() {
                TokenType::Public => {
                    modifiers.visibility = Visibility::Public;
                    self.advance();
                }
                TokenType::Protected => {
                    modifiers.visibility = Visibility::Protected;
                    self.advance();
                }
                TokenType::Private => {
                    modifiers.visibility = Visibility::Private;
                    self.advance();
                }
                TokenType::Static => {
                    modifiers.is_static = true;
                    self.advance();
                }
                TokenType::Final => {
                    modifiers.is_final = true;
                    self.advance();
                }
                TokenType::Abstract => {
                    modifiers.is_abstract = true;
                    self.advance();
                }
                _ => break,
            }
        }
        modifiers
    }

    // ---- members ----

    fn parse_member(
        &mut self,
        annotations: Vec<Annotation>,
        modifiers: Modifiers,
    ) -> Result<Member, ParseError> {
        let start = self.current().clone();

        // Constructors: an identifier directly followed by '('.
        if matches!(self.peek(), TokenType::Identifier(_))
            && matches!(self.peek_ahead(1), TokenType::LeftParen)
        {
            let (name, _) = self.expect_identifier("constructor name")?;
            return self.parse_method_rest(name, None, annotations, modifiers, start);
        }

        let return_type = if self.matches(&TokenType::Void) {
            None
        } else {
            Some(self.parse_type()?)
        };

        let (name, _) = self.expect_identifier("member name")?;

        if self.check(&TokenType::LeftParen) {
            self.parse_method_rest(name, return_type, annotations, modifiers, start)
        } else {
            let initializer = if self.matches(&TokenType::Assign) {
                Some(self.parse_expression()?)
            } else {
                None
            };
            self.expect(TokenType::Semicolon, "';' after field declaration")?;
            Ok(Member::Field(FieldDecl {
                name,
                field_type: return_type,
                annotations,
                modifiers,
                initializer,
                span: self.span_from(&start),
            }))
        }
    }

    fn parse_method_rest(
        &mut self,
        name: String,
        return_type: Option<TypeRef>,
        annotations: Vec<Annotation>,
        modifiers: Modifiers,
        start: Token,
    ) -> Result<Member, ParseError> {
        let parameters = self.parse_parameters()?;

        // `throws` is outside the token subset; it scans as an identifier.
        if matches!(self.peek(), TokenType::Identifier(word) if word == "throws") {
            self.advance();
            self.parse_type_list()?;
        }

        let body = if self.check(&TokenType::LeftBrace) {
            Some(self.parse_block()?)
        } else {
            self.expect(TokenType::Semicolon, "';' or method body")?;
            None
        };

        Ok(Member::Method(MethodDecl {
            name,
            annotations,
            modifiers,
            parameters,
            return_type,
            body,
            span: self.span_from(&start),
        }))
    }

    fn parse_parameters(&mut self) -> Result<Vec<Parameter>, ParseError> {
        self.expect(TokenType::LeftParen, "'('")?;
        let mut parameters = Vec::new();
        while !self.check(&TokenType::RightParen) && !self.at_eof() {
            parameters.push(self.parse_parameter()?);
            if !self.matches(&TokenType::Comma) {
                break;
            }
        }
        self.expect(TokenType::RightParen, "')' closing parameter list")?;
        Ok(parameters)
    }

    fn parse_parameter(&mut self) -> Result<Parameter, ParseError> {
        let start = self.current().clone();
        self.matches(&TokenType::Final);
        let first = self.parse_type()?;
        if matches!(self.peek(), TokenType::Identifier(_)) {
            let (name, _) = self.expect_identifier("parameter name")?;
            Ok(Parameter {
                name,
                param_type: Some(first),
                span: self.span_from(&start),
            })
        } else {
            // A bare name: what parsed as a type was the parameter itself.
            Ok(Parameter {
                name: first.qualified_name().to_string(),
                param_type: None,
                span: self.span_from(&start),
            })
        }
    }

    // ---- types ----

    fn parse_type(&mut self) -> Result<TypeRef, ParseError> {
        let name = match self.parse_dotted_path() {
            Some(name) => name,
            None => {
                return Err(ParseError::Syntax {
                    message: format!("expected type, found {:?}", self.peek()),
                    span: self.here(),
                });
            }
        };

        let mut ty = if self.matches(&TokenType::Less) {
            let mut type_args = Vec::new();
            while !self.check(&TokenType::Greater) && !self.at_eof() {
                type_args.push(self.parse_type_argument()?);
                if !self.matches(&TokenType::Comma) {
                    break;
                }
            }
            self.expect(TokenType::Greater, "'>' closing type arguments")?;
            TypeRef::Generic { name, type_args }
        } else {
            TypeRef::Named(name)
        };

        while self.check(&TokenType::LeftBracket)
            && matches!(self.peek_ahead(1), TokenType::RightBracket)
        {
            self.advance();
            self.advance();
            ty = TypeRef::Array(Box::new(ty));
        }
        Ok(ty)
    }

    fn parse_type_argument(&mut self) -> Result<TypeRef, ParseError> {
        if self.matches(&TokenType::Question) {
            if self.matches(&TokenType::Extends) {
                self.parse_type()
            } else {
                Ok(TypeRef::Named("?".to_string()))
            }
        } else {
            self.parse_type()
        }
    }

    fn parse_type_list(&mut self) -> Result<Vec<TypeRef>, ParseError> {
        let mut types = vec![self.parse_type()?];
        while self.matches(&TokenType::Comma) {
            types.push(self.parse_type()?);
        }
        Ok(types)
    }

    // ---- statements ----

    fn parse_block(&mut self) -> Result<Block, ParseError> {
        let start = self.expect(TokenType::LeftBrace, "'{'")?;
        let mut statements = Vec::new();
        loop {
            match self.peek() {
                TokenType::RightBrace => {
                    self.advance();
                    break;
                }
                TokenType::Eof => {
                    let span = self.here();
                    self.error(ParseError::UnexpectedEof {
                        expected: "'}' closing block".to_string(),
                        span,
                    });
                    break;
                }
                _ => {
                    let statement_start = self.current().clone();
                    match self.parse_statement() {
                        Ok(statement) => statements.push(statement),
                        Err(error) => {
                            self.error(error);
                            self.skip_statement();
                            let span = self.span_from(&statement_start);
                            statements.push(Statement::Opaque {
                                text: self.line_text(span.start_line, span.end_line),
                                span,
                            });
                        }
                    }
                }
            }
        }
        Ok(Block {
            statements,
            span: self.span_from(&start),
        })
    }

    fn skip_statement(&mut self) {
        let mut brace_depth = 0usize;
        let mut paren_depth = 0usize;
        loop {
            match self.peek() {
                TokenType::Eof => break,
                TokenType::Semicolon if brace_depth == 0 && paren_depth == 0 => {
                    self.advance();
                    break;
                }
                TokenType::LeftParen => {
                    paren_depth += 1;
                    self.advance();
                }
                TokenType::RightParen => {
                    paren_depth = paren_depth.saturating_sub(1);
                    self.advance();
                }
                TokenType::LeftBrace => {
                    brace_depth += 1;
                    self.advance();
                }
                TokenType::RightBrace => {
                    if brace_depth == 0 {
                        break;
                    }
                    brace_depth -= 1;
                    self.advance();
                    if brace_depth == 0 && paren_depth == 0 {
                        break;
                    }
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.current().clone();
        match self.peek() {
            TokenType::Return => {
                self.advance();
                let value = if self.check(&TokenType::Semicolon) {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.expect(TokenType::Semicolon, "';' after return")?;
                Ok(Statement::Return {
                    value,
                    span: self.span_from(&start),
                })
            }
            TokenType::If => {
                self.advance();
                self.expect(TokenType::LeftParen, "'(' after if")?;
                let condition = self.parse_expression()?;
                self.expect(TokenType::RightParen, "')' closing if condition")?;
                let then_branch = self.parse_branch()?;
                let else_branch = if self.matches(&TokenType::Else) {
                    Some(self.parse_branch()?)
                } else {
                    None
                };
                Ok(Statement::If {
                    condition,
                    then_branch,
                    else_branch,
                    span: self.span_from(&start),
                })
            }
            _ => {
                if let Some(statement) = self.try_parse_local_variable()? {
                    return Ok(statement);
                }
                let expr = self.parse_expression()?;
                self.expect(TokenType::Semicolon, "';' after expression")?;
                Ok(Statement::Expression {
                    expr,
                    span: self.span_from(&start),
                })
            }
        }
    }

    fn parse_branch(&mut self) -> Result<Block, ParseError> {
        if self.check(&TokenType::LeftBrace) {
            self.parse_block()
        } else {
            let start = self.current().clone();
            let statement = self.parse_statement()?;
            Ok(Block {
                statements: vec![statement],
                span: self.span_from(&start),
            })
        }
    }

    /// Attempts `[final] Type name [= init];` with full backtracking; a
    /// non-match rewinds and yields `None` so the caller can try an
    /// expression statement instead.
    fn try_parse_local_variable(&mut self) -> Result<Option<Statement>, ParseError> {
        let saved_pos = self.pos;
        let saved_errors = self.errors.len();
        let start = self.current().clone();

        let is_final = self.matches(&TokenType::Final);
        let var_type = match self.parse_type() {
            Ok(ty) => ty,
            Err(_) => {
                self.pos = saved_pos;
                self.errors.truncate(saved_errors);
                return Ok(None);
            }
        };
        if !matches!(self.peek(), TokenType::Identifier(_))
            || !matches!(self.peek_ahead(1), TokenType::Assign | TokenType::Semicolon)
        {
            self.pos = saved_pos;
            self.errors.truncate(saved_errors);
            return Ok(None);
        }

        let (name, _) = self.expect_identifier("variable name")?;
        let initializer = if self.matches(&TokenType::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(TokenType::Semicolon, "';' after variable declaration")?;
        Ok(Some(Statement::LocalVariable {
            name,
            var_type: Some(var_type),
            initializer,
            is_final,
            span: self.span_from(&start),
        }))
    }

    // ---- expressions ----

    pub(crate) fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expression, ParseError> {
        let start = self.current().clone();
        let target = self.parse_or()?;
        if self.matches(&TokenType::Assign) {
            let value = self.parse_assignment()?;
            Ok(Expression::Assignment {
                target: Box::new(target),
                value: Box::new(value),
                span: self.span_from(&start),
            })
        } else {
            Ok(target)
        }
    }

    fn parse_or(&mut self) -> Result<Expression, ParseError> {
        let start = self.current().clone();
        let mut left = self.parse_and()?;
        while self.matches(&TokenType::Or) {
            let right = self.parse_and()?;
            left = Expression::Binary {
                left: Box::new(left),
                op: BinaryOp::Or,
                right: Box::new(right),
                span: self.span_from(&start),
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expression, ParseError> {
        let start = self.current().clone();
        let mut left = self.parse_equality()?;
        while self.matches(&TokenType::And) {
            let right = self.parse_equality()?;
            left = Expression::Binary {
                left: Box::new(left),
                op: BinaryOp::And,
                right: Box::new(right),
                span: self.span_from(&start),
            };
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expression, ParseError> {
        let start = self.current().clone();
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.peek() {
                TokenType::Equal => BinaryOp::Equal,
                TokenType::NotEqual => BinaryOp::NotEqual,
                _ => break,
            };
            self.advance();
            let right = self.parse_relational()?;
            left = Expression::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span: self.span_from(&start),
            };
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<Expression, ParseError> {
        let start = self.current().clone();
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                TokenType::Less => BinaryOp::Less,
                TokenType::LessEqual => BinaryOp::LessEqual,
                TokenType::Greater => BinaryOp::Greater,
                TokenType::GreaterEqual => BinaryOp::GreaterEqual,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = Expression::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span: self.span_from(&start),
            };
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expression, ParseError> {
        let start = self.current().clone();
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                TokenType::Plus => BinaryOp::Add,
                TokenType::Minus => BinaryOp::Subtract,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expression::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span: self.span_from(&start),
            };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expression, ParseError> {
        let start = self.current().clone();
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                TokenType::Multiply => BinaryOp::Multiply,
                TokenType::Divide => BinaryOp::Divide,
                TokenType::Modulo => BinaryOp::Modulo,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expression::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span: self.span_from(&start),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        let start = self.current().clone();
        let op = match self.peek() {
            TokenType::Not => Some(UnaryOp::Not),
            TokenType::Minus => Some(UnaryOp::Minus),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expression::Unary {
                op,
                operand: Box::new(operand),
                span: self.span_from(&start),
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expression, ParseError> {
        let start = self.current().clone();
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek() {
                TokenType::Dot => {
                    self.advance();
                    let (name, _) = self.expect_identifier("member name")?;
                    if self.check(&TokenType::LeftParen) {
                        let arguments = self.parse_arguments()?;
                        expr = Expression::MethodCall {
                            receiver: Some(Box::new(expr)),
                            name,
                            arguments,
                            span: self.span_from(&start),
                        };
                    } else {
                        expr = Expression::FieldAccess {
                            receiver: Box::new(expr),
                            name,
                            span: self.span_from(&start),
                        };
                    }
                }
                TokenType::DoubleColon => {
                    let receiver = dotted_name(&expr).ok_or_else(|| ParseError::Syntax {
                        message: "method reference requires a named receiver".to_string(),
                        span: self.here(),
                    })?;
                    self.advance();
                    let (name, _) = self.expect_identifier("referenced method name")?;
                    expr = Expression::MethodReference {
                        receiver,
                        name,
                        span: self.span_from(&start),
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        let start = self.current().clone();
        match self.peek().clone() {
            TokenType::String(value) => {
                self.advance();
                Ok(Expression::Literal(
                    Literal::String(value),
                    self.span_from(&start),
                ))
            }
            TokenType::Number(value) => {
                self.advance();
                Ok(Expression::Literal(
                    Literal::Number(value),
                    self.span_from(&start),
                ))
            }
            TokenType::Character(value) => {
                self.advance();
                Ok(Expression::Literal(
                    Literal::Character(value),
                    self.span_from(&start),
                ))
            }
            TokenType::True => {
                self.advance();
                Ok(Expression::Literal(
                    Literal::Boolean(true),
                    self.span_from(&start),
                ))
            }
            TokenType::False => {
                self.advance();
                Ok(Expression::Literal(
                    Literal::Boolean(false),
                    self.span_from(&start),
                ))
            }
            TokenType::Null => {
                self.advance();
                Ok(Expression::Literal(Literal::Null, self.span_from(&start)))
            }
            TokenType::New => {
                self.advance();
                let class_type = self.parse_type()?;
                if !self.check(&TokenType::LeftParen) {
                    return Err(ParseError::Syntax {
                        message: "unsupported object creation form".to_string(),
                        span: self.here(),
                    });
                }
                let arguments = self.parse_arguments()?;
                if self.check(&TokenType::LeftBrace) {
                    return Err(ParseError::Syntax {
                        message: "anonymous class bodies are not supported".to_string(),
                        span: self.here(),
                    });
                }
                Ok(Expression::ObjectCreation {
                    class_type,
                    arguments,
                    span: self.span_from(&start),
                })
            }
            TokenType::LeftParen => {
                if self.looks_like_lambda() {
                    self.parse_lambda()
                } else {
                    self.advance();
                    let expr = self.parse_expression()?;
                    self.expect(TokenType::RightParen, "')' closing expression")?;
                    Ok(expr)
                }
            }
            TokenType::Identifier(name) => {
                if matches!(self.peek_ahead(1), TokenType::Arrow) {
                    return self.parse_single_parameter_lambda();
                }
                self.advance();
                if self.check(&TokenType::LeftParen) {
                    let arguments = self.parse_arguments()?;
                    Ok(Expression::MethodCall {
                        receiver: None,
                        name,
                        arguments,
                        span: self.span_from(&start),
                    })
                } else {
                    Ok(Expression::Identifier {
                        name,
                        span: self.span_from(&start),
                    })
                }
            }
            other => Err(ParseError::Syntax {
                message: format!("expected expression, found {other:?}"),
                span: self.here(),
            }),
        }
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expression>, ParseError> {
        self.expect(TokenType::LeftParen, "'('")?;
        let mut arguments = Vec::new();
        while !self.check(&TokenType::RightParen) && !self.at_eof() {
            arguments.push(self.parse_expression()?);
            if !self.matches(&TokenType::Comma) {
                break;
            }
        }
        self.expect(TokenType::RightParen, "')' closing arguments")?;
        Ok(arguments)
    }

    /// At a '(' token: true when the balanced group is followed by '->'.
    fn looks_like_lambda(&self) -> bool {
        let mut index = self.pos + 1;
        let mut depth = 1usize;
        while depth > 0 {
            match self.tokens.get(index).map(|token| &token.token_type) {
                Some(TokenType::LeftParen) => depth += 1,
                Some(TokenType::RightParen) => depth -= 1,
                Some(TokenType::Eof) | None => return false,
                _ => {}
            }
            index += 1;
        }
        matches!(
            self.tokens.get(index).map(|token| &token.token_type),
            Some(TokenType::Arrow)
        )
    }

    fn parse_lambda(&mut self) -> Result<Expression, ParseError> {
        let start = self.current().clone();
        self.expect(TokenType::LeftParen, "'('")?;
        let mut parameters = Vec::new();
        while !self.check(&TokenType::RightParen) && !self.at_eof() {
            parameters.push(self.parse_parameter()?);
            if !self.matches(&TokenType::Comma) {
                break;
            }
        }
        self.expect(TokenType::RightParen, "')' closing lambda parameters")?;
        self.expect(TokenType::Arrow, "'->'")?;
        let body = self.parse_lambda_body()?;
        Ok(Expression::Lambda {
            parameters,
            body,
            span: self.span_from(&start),
        })
    }

    fn parse_single_parameter_lambda(&mut self) -> Result<Expression, ParseError> {
        let start = self.current().clone();
        let (name, token) = self.expect_identifier("lambda parameter")?;
        let parameter = Parameter {
            name,
            param_type: None,
            span: Span::point(token.line, token.column),
        };
        self.expect(TokenType::Arrow, "'->'")?;
        let body = self.parse_lambda_body()?;
        Ok(Expression::Lambda {
            parameters: vec![parameter],
            body,
            span: self.span_from(&start),
        })
    }

    fn parse_lambda_body(&mut self) -> Result<LambdaBody, ParseError> {
        if self.check(&TokenType::LeftBrace) {
            Ok(LambdaBody::Block(self.parse_block()?))
        } else {
            Ok(LambdaBody::Expression(Box::new(self.parse_expression()?)))
        }
    }
}
