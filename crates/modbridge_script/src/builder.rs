// modbridge_script/builder - Incremental source construction with indentation
/// Utility that incrementally constructs script source with indentation
/// handling.
#[derive(Debug, Default, Clone)]
pub struct ScriptSourceBuilder {
    content: String,
    indent_level: usize,
    indent: String,
}

impl ScriptSourceBuilder {
    pub fn new(indent: String) -> Self {
        Self {
            content: String::new(),
            indent_level: 0,
            indent,
        }
    }

    pub fn with_level(indent: String, indent_level: usize) -> Self {
        Self {
            content: String::new(),
            indent_level,
            indent,
        }
    }

    pub fn push_line(&mut self, line: &str) {
        if !line.is_empty() {
            self.push_indent();
        }
        self.content.push_str(line);
        self.content.push('\n');
    }

    pub fn push(&mut self, text: &str) {
        self.content.push_str(text);
    }

    pub fn push_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.content.push_str(&self.indent);
        }
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    pub fn level(&self) -> usize {
        self.indent_level
    }

    pub fn build(self) -> String {
        self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}
