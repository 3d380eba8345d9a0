//! Localized Workshop content
//!
//! Mods carry per-language Markdown files under `description/`. The file
//! stem names the language (`zh.md`, `en.md`, `pt-br.md`, ...); files with
//! unrecognized stems are skipped without comment, so authors can keep
//! drafts next to the real content.

use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::bbcode::{extract_title, markdown_to_bbcode};
use crate::language::steam_language;

/// BBCode description for one Steam language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedDescription {
    pub language: String,
    pub content: String,
}

/// Display title for one Steam language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedTitle {
    pub language: String,
    pub title: String,
}

/// Load and convert every recognized `description/*.md` file
pub fn load_descriptions(mod_dir: &Path) -> Vec<LocalizedDescription> {
    collect_language_files(mod_dir)
        .into_iter()
        .map(|(language, markdown)| LocalizedDescription {
            language,
            content: markdown_to_bbcode(&markdown),
        })
        .collect()
}

/// Load the title of every recognized `description/*.md` file
///
/// The title is the file's first H1 heading; `default_title` fills in for
/// files without one.
pub fn load_titles(mod_dir: &Path, default_title: &str) -> Vec<LocalizedTitle> {
    collect_language_files(mod_dir)
        .into_iter()
        .map(|(language, markdown)| LocalizedTitle {
            language,
            title: extract_title(&markdown, default_title),
        })
        .collect()
}

/// Read `(language, markdown)` pairs from the description directory,
/// sorted by file name for deterministic encounter order
fn collect_language_files(mod_dir: &Path) -> Vec<(String, String)> {
    let desc_dir = mod_dir.join("description");
    if !desc_dir.is_dir() {
        return Vec::new();
    }

    let entries = match fs::read_dir(&desc_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %desc_dir.display(), "failed to read description directory: {}", e);
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".md"))
        .collect();
    names.sort();

    let mut results = Vec::new();
    for name in names {
        let stem = &name[..name.len() - 3];
        let Some(language) = steam_language(stem) else {
            debug!(file = %name, "skipping unrecognized language file");
            continue;
        };

        match fs::read_to_string(desc_dir.join(&name)) {
            Ok(markdown) => results.push((language.to_string(), markdown)),
            Err(e) => warn!(file = %name, "failed to read description file: {}", e),
        }
    }

    results
}
