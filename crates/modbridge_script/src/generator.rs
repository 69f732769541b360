// modbridge_script/generator - Deterministic tree-to-text rendering
use crate::ast::{
    ObjectMember, ScriptExpression, ScriptLiteral, ScriptProgram, ScriptStatement,
};
use crate::builder::ScriptSourceBuilder;
use crate::config::ScriptCodeGenConfig;
use crate::error::CodeGenError;

/// Renders a [`ScriptProgram`] to source text. Purely structural: identical
/// trees yield byte-identical output.
pub struct ScriptCodeGenerator {
    config: ScriptCodeGenConfig,
}

impl ScriptCodeGenerator {
    pub fn new() -> Self {
        Self::with_config(ScriptCodeGenConfig::default())
    }

    pub fn with_config(config: ScriptCodeGenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScriptCodeGenConfig {
        &self.config
    }

    pub fn generate(&self, program: &ScriptProgram) -> Result<String, CodeGenError> {
        let mut builder = ScriptSourceBuilder::new(self.config.indent.clone());

        for import in &program.imports {
            for name in &import.names {
                self.check_identifier(name, "import binding")?;
            }
            builder.push_line(&format!(
                "import {{ {} }} from \"{}\";",
                import.names.join(", "),
                escape_string(&import.module)
            ));
        }

        if !program.imports.is_empty() && !program.statements.is_empty() {
            builder.push_line("");
        }

        for (index, statement) in program.statements.iter().enumerate() {
            if index > 0 {
                builder.push_line("");
            }
            builder.push(&self.render_statement(statement, 0)?);
        }

        Ok(builder.build())
    }

    /// Renders one statement as fully-indented lines, each ending in '\n'.
    fn render_statement(
        &self,
        statement: &ScriptStatement,
        level: usize,
    ) -> Result<String, CodeGenError> {
        let mut builder = ScriptSourceBuilder::with_level(self.config.indent.clone(), level);
        match statement {
            ScriptStatement::Const { name, value } => {
                self.check_identifier(name, "const declaration")?;
                builder.push_line(&format!(
                    "const {} = {};",
                    name,
                    self.render_expression(value, level)?
                ));
            }
            ScriptStatement::Function { name, params, body } => {
                self.check_identifier(name, "function declaration")?;
                for param in params {
                    self.check_identifier(param, "function parameter")?;
                }
                builder.push_line(&format!("function {}({}) {{", name, params.join(", ")));
                for inner in body {
                    builder.push(&self.render_statement(inner, level + 1)?);
                }
                builder.push_line("}");
            }
            ScriptStatement::Expression(expr) => {
                builder.push_line(&format!("{};", self.render_expression(expr, level)?));
            }
            ScriptStatement::Return(value) => match value {
                Some(expr) => builder.push_line(&format!(
                    "return {};",
                    self.render_expression(expr, level)?
                )),
                None => builder.push_line("return;"),
            },
            ScriptStatement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                builder.push_line(&format!(
                    "if ({}) {{",
                    self.render_expression(condition, level)?
                ));
                for inner in then_branch {
                    builder.push(&self.render_statement(inner, level + 1)?);
                }
                match else_branch {
                    Some(else_branch) => {
                        builder.push_line("} else {");
                        for inner in else_branch {
                            builder.push(&self.render_statement(inner, level + 1)?);
                        }
                        builder.push_line("}");
                    }
                    None => builder.push_line("}"),
                }
            }
            ScriptStatement::Comment(text) => {
                builder.push_line(&format!("// {}", sanitize_comment(text)));
            }
        }
        Ok(builder.build())
    }

    fn render_expression(
        &self,
        expr: &ScriptExpression,
        level: usize,
    ) -> Result<String, CodeGenError> {
        match expr {
            ScriptExpression::Literal(literal) => Ok(render_literal(literal)),
            ScriptExpression::Identifier(name) => {
                self.check_identifier(name, "identifier expression")?;
                Ok(name.clone())
            }
            ScriptExpression::Member { object, property } => {
                self.check_identifier(property, "member access")?;
                Ok(format!(
                    "{}.{}",
                    self.render_expression(object, level)?,
                    property
                ))
            }
            ScriptExpression::Call { callee, arguments } => {
                let rendered: Vec<String> = arguments
                    .iter()
                    .map(|argument| self.render_expression(argument, level))
                    .collect::<Result<_, _>>()?;
                Ok(format!(
                    "{}({})",
                    self.render_expression(callee, level)?,
                    rendered.join(", ")
                ))
            }
            ScriptExpression::Arrow { params, body } => {
                for param in params {
                    self.check_identifier(param, "arrow parameter")?;
                }
                let mut rendered = format!("({}) => {{\n", params.join(", "));
                for inner in body {
                    rendered.push_str(&self.render_statement(inner, level + 1)?);
                }
                rendered.push_str(&self.indentation(level));
                rendered.push('}');
                Ok(rendered)
            }
            ScriptExpression::Object(members) => self.render_object(members, level),
            ScriptExpression::Binary { left, op, right } => Ok(format!(
                "{} {} {}",
                self.render_operand(left, level)?,
                op.as_str(),
                self.render_operand(right, level)?
            )),
            ScriptExpression::Unary { op, operand } => {
                Ok(format!("{}{}", op.as_str(), self.render_operand(operand, level)?))
            }
            ScriptExpression::Assign { target, value } => Ok(format!(
                "{} = {}",
                self.render_expression(target, level)?,
                self.render_expression(value, level)?
            )),
        }
    }

    /// Binary operands are parenthesized when they are themselves binary,
    /// which keeps rendering independent of operator precedence.
    fn render_operand(
        &self,
        expr: &ScriptExpression,
        level: usize,
    ) -> Result<String, CodeGenError> {
        let rendered = self.render_expression(expr, level)?;
        if matches!(expr, ScriptExpression::Binary { .. }) {
            Ok(format!("({rendered})"))
        } else {
            Ok(rendered)
        }
    }

    fn render_object(
        &self,
        members: &[ObjectMember],
        level: usize,
    ) -> Result<String, CodeGenError> {
        if members.is_empty() {
            return Ok("{}".to_string());
        }
        let inner_indent = self.indentation(level + 1);
        let mut rendered = String::from("{\n");
        for (index, member) in members.iter().enumerate() {
            match member {
                ObjectMember::Property { key, value } => {
                    rendered.push_str(&inner_indent);
                    rendered.push_str(&render_object_key(key));
                    rendered.push_str(": ");
                    rendered.push_str(&self.render_expression(value, level + 1)?);
                    if self.config.trailing_commas || index + 1 < members.len() {
                        rendered.push(',');
                    }
                    rendered.push('\n');
                }
                ObjectMember::Comment(text) => {
                    rendered.push_str(&inner_indent);
                    rendered.push_str("// ");
                    rendered.push_str(&sanitize_comment(text));
                    rendered.push('\n');
                }
            }
        }
        rendered.push_str(&self.indentation(level));
        rendered.push('}');
        Ok(rendered)
    }

    fn indentation(&self, level: usize) -> String {
        self.config.indent.repeat(level)
    }

    fn check_identifier(&self, name: &str, context: &str) -> Result<(), CodeGenError> {
        let mut chars = name.chars();
        let valid_start = chars
            .next()
            .map(|ch| ch.is_alphabetic() || ch == '_' || ch == '$')
            .unwrap_or(false);
        if valid_start && chars.all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '$') {
            Ok(())
        } else {
            Err(CodeGenError::InvalidIdentifier {
                name: name.to_string(),
                context: context.to_string(),
            })
        }
    }
}

impl Default for ScriptCodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn render_literal(literal: &ScriptLiteral) -> String {
    match literal {
        ScriptLiteral::String(value) => format!("\"{}\"", escape_string(value)),
        ScriptLiteral::Number(value) => value.clone(),
        ScriptLiteral::Boolean(value) => value.to_string(),
        ScriptLiteral::Null => "null".to_string(),
    }
}

fn render_object_key(key: &str) -> String {
    let mut chars = key.chars();
    let identifier_like = chars
        .next()
        .map(|ch| ch.is_alphabetic() || ch == '_' || ch == '$')
        .unwrap_or(false)
        && key
            .chars()
            .skip(1)
            .all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '$');
    if identifier_like {
        key.to_string()
    } else {
        format!("\"{}\"", escape_string(key))
    }
}

fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Comments must stay single-line; embedded newlines collapse to spaces.
fn sanitize_comment(text: &str) -> String {
    text.replace(['\n', '\r'], " ").trim().to_string()
}
