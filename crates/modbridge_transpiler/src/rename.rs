// modbridge_transpiler/rename - Deterministic source-to-target renaming
use crate::output::RenameEntry;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Words the target scripting environment reserves; renamed identifiers
/// must avoid them.
pub(crate) fn is_reserved(word: &str) -> bool {
    RESERVED.contains(&word)
}

const RESERVED: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "export", "extends", "false", "finally", "for", "function", "if", "import", "in",
    "instanceof", "let", "new", "null", "return", "static", "super", "switch", "this", "throw",
    "true", "try", "typeof", "undefined", "var", "void", "while", "with", "yield",
];

/// Per-mod rename table. Renaming is deterministic: lower-camel
/// normalization applied in node-processing order, with a sequential suffix
/// on collision. The table records every rename so diagnostics can show
/// both names.
#[derive(Debug, Default)]
pub struct RenameTable {
    map: BTreeMap<String, String>,
    used: BTreeSet<String>,
}

impl RenameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target-safe name for `source`, allocating one on first use.
    pub fn target_name(&mut self, source: &str) -> String {
        if let Some(existing) = self.map.get(source) {
            return existing.clone();
        }
        let base = to_lower_camel(source);
        let mut candidate = if is_reserved(&base) {
            format!("{base}_")
        } else {
            base.clone()
        };
        let mut suffix = 2usize;
        while self.used.contains(&candidate) {
            candidate = format!("{base}_{suffix}");
            suffix += 1;
        }
        self.used.insert(candidate.clone());
        self.map.insert(source.to_string(), candidate.clone());
        candidate
    }

    /// True when `source` already has an allocated target name.
    pub fn contains(&self, source: &str) -> bool {
        self.map.contains_key(source)
    }

    /// All renames that actually changed the spelling, sorted by source
    /// name for stable reports.
    pub fn entries(&self) -> Vec<RenameEntry> {
        self.map
            .iter()
            .filter(|(source, target)| source != target)
            .map(|(source, target)| RenameEntry {
                source: source.clone(),
                target: target.clone(),
            })
            .collect()
    }
}

/// `RUBY_BLOCK` -> `rubyBlock`, `ruby_block` -> `rubyBlock`, `onBreak`
/// stays `onBreak`.
fn to_lower_camel(source: &str) -> String {
    let cleaned: String = source
        .chars()
        .map(|ch| if ch.is_alphanumeric() { ch } else { '_' })
        .collect();
    let segments: Vec<&str> = cleaned.split('_').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return "renamed".to_string();
    }

    let screaming = source
        .chars()
        .all(|ch| !ch.is_alphabetic() || ch.is_uppercase());
    let mut result = String::new();
    for (index, segment) in segments.iter().enumerate() {
        let normalized = if screaming {
            segment.to_lowercase()
        } else {
            segment.to_string()
        };
        if index == 0 {
            let mut chars = normalized.chars();
            match chars.next() {
                Some(first) => {
                    result.extend(first.to_lowercase());
                    result.push_str(chars.as_str());
                }
                None => {}
            }
        } else {
            let mut chars = normalized.chars();
            match chars.next() {
                Some(first) => {
                    result.extend(first.to_uppercase());
                    result.push_str(chars.as_str());
                }
                None => {}
            }
        }
    }
    if result
        .chars()
        .next()
        .map(|ch| ch.is_ascii_digit())
        .unwrap_or(false)
    {
        result.insert(0, '_');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screaming_snake_becomes_lower_camel() {
        let mut table = RenameTable::new();
        assert_eq!(table.target_name("RUBY_BLOCK"), "rubyBlock");
        assert_eq!(table.target_name("ruby_block"), "rubyBlock_2");
        assert_eq!(table.target_name("onBreak"), "onBreak");
    }

    #[test]
    fn renaming_is_stable_per_source() {
        let mut table = RenameTable::new();
        let first = table.target_name("RUBY_BLOCK");
        let second = table.target_name("RUBY_BLOCK");
        assert_eq!(first, second);
        assert!(table.contains("RUBY_BLOCK"));
    }

    #[test]
    fn reserved_words_get_a_suffix() {
        let mut table = RenameTable::new();
        assert_eq!(table.target_name("class"), "class_");
        assert_eq!(table.target_name("NEW"), "new_");
    }

    #[test]
    fn entries_report_only_actual_renames() {
        let mut table = RenameTable::new();
        table.target_name("onBreak");
        table.target_name("RUBY_BLOCK");
        let entries = table.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].source, "RUBY_BLOCK");
        assert_eq!(entries[0].target, "rubyBlock");
    }

    #[test]
    fn leading_digits_are_guarded() {
        let mut table = RenameTable::new();
        assert_eq!(table.target_name("3d_model"), "_3dModel");
    }
}
