//! Shared binary-artifact checks
//!
//! Both package formats require the mod directory to ship at least one DLL
//! whose base name matches the declared mod name. The check lives here so
//! the NuGet and Steam validators report identical findings.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One validation finding with its remediation suggestions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub message: String,
    pub suggestions: Vec<String>,
}

impl ValidationIssue {
    pub fn new(message: impl Into<String>, suggestions: &[&str]) -> Self {
        ValidationIssue {
            message: message.into(),
            suggestions: suggestions.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Recursively collect `*.dll` files under `dir`
pub fn collect_dll_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("dll"))
        })
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

/// Check that the directory ships a binary artifact named after the mod
///
/// Returns `None` when the check passes. A directory with no DLLs at all
/// and a directory whose DLLs all have the wrong name produce distinct
/// findings.
pub fn check_binary_artifacts(mod_dir: &Path, expected_name: &str) -> Option<ValidationIssue> {
    let dll_files = collect_dll_files(mod_dir);

    if dll_files.is_empty() {
        return Some(ValidationIssue::new(
            "No DLL files found in mod directory",
            &[
                "Add at least one DLL file to the mod",
                "DLL files are required for game mods",
            ],
        ));
    }

    let has_match = dll_files.iter().any(|path| {
        path.file_stem()
            .is_some_and(|stem| stem.to_string_lossy() == expected_name)
    });

    if has_match {
        return None;
    }

    let dll_names: Vec<String> = dll_files
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    let count = dll_files.len();
    let noun = if count == 1 { "DLL" } else { "DLLs" };

    Some(ValidationIssue {
        message: format!(
            "No DLL file matches mod name \"{}\" (found {} {})",
            expected_name, count, noun
        ),
        suggestions: vec![
            format!("Ensure at least one DLL is named \"{}.dll\"", expected_name),
            format!("Current DLLs: {}", dll_names.join(", ")),
        ],
    })
}
