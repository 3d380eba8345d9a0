//! Minimal INI dialect used by `info.ini`
//!
//! Lines are trimmed before interpretation. `#` starts a comment that runs
//! to the end of the line (inline comments included). `[section]` opens a
//! named section; `key=value` assigns a trimmed key to a trimmed value in
//! the current section. Keys seen before the first section header belong to
//! the default (unnamed) section, which is the only one the metadata record
//! reads from.

use std::collections::HashMap;

/// Parsed INI document, keyed by section name ("" is the default section)
#[derive(Debug, Default)]
pub struct IniDocument {
    sections: HashMap<String, HashMap<String, String>>,
}

impl IniDocument {
    pub fn parse(content: &str) -> Self {
        let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
        sections.insert(String::new(), HashMap::new());
        let mut current = String::new();

        for line in content.lines() {
            let trimmed = line.trim();
            let active = match trimmed.find('#') {
                Some(idx) => trimmed[..idx].trim(),
                None => trimmed,
            };

            if active.is_empty() {
                continue;
            }

            if let Some(section) = section_header(active) {
                current = section.to_string();
                sections.entry(current.clone()).or_default();
                continue;
            }

            if let Some((key, value)) = active.split_once('=') {
                if key.is_empty() {
                    continue;
                }
                if let Some(section) = sections.get_mut(&current) {
                    section.insert(key.trim().to_string(), value.trim().to_string());
                }
            }
        }

        IniDocument { sections }
    }

    /// Key/value pairs that appeared before the first section header
    pub fn default_section(&self) -> &HashMap<String, String> {
        // The "" entry is inserted unconditionally in parse()
        static EMPTY: once_cell::sync::Lazy<HashMap<String, String>> =
            once_cell::sync::Lazy::new(HashMap::new);
        self.sections.get("").unwrap_or(&EMPTY)
    }

    pub fn section(&self, name: &str) -> Option<&HashMap<String, String>> {
        self.sections.get(name)
    }
}

/// Match `[name]` where the name is non-empty and contains no `]`
fn section_header(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;
    if inner.is_empty() || inner.contains(']') {
        return None;
    }
    Some(inner)
}
