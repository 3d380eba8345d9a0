//! Resolution of long-form description and release-notes content
//!
//! Authors can point at a file, write the text inline in `info.ini`, or
//! rely on convention-based sidecar files. File existence always wins over
//! the literal reading of the same field. An empty result is a valid
//! terminal state, not an error.

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::errors::MetadataError;
use crate::metadata::ModMetadata;

/// Resolve the package description for a mod directory
///
/// Precedence: `readme` field as a file path, `readme` field as inline
/// text, `description/zh.md`, `description/en.md`, the `description`
/// metadata field, then the empty string.
pub fn load_description(
    mod_dir: &Path,
    metadata: &ModMetadata,
) -> Result<String, MetadataError> {
    if let Some(readme) = metadata.readme.as_deref() {
        if !readme.is_empty() {
            let candidate = mod_dir.join(readme);
            if candidate.is_file() {
                debug!(path = %candidate.display(), "description from readme file");
                return read_text(&candidate);
            }
        }
        if !readme.trim().is_empty() {
            debug!("description from inline readme value");
            return Ok(readme.to_string());
        }
    }

    for sidecar in ["description/zh.md", "description/en.md"] {
        let candidate = mod_dir.join(sidecar);
        if candidate.is_file() {
            debug!(path = %candidate.display(), "description from sidecar file");
            return read_text(&candidate);
        }
    }

    if let Some(description) = metadata.description.as_deref() {
        if !description.is_empty() {
            return Ok(description.to_string());
        }
    }

    Ok(String::new())
}

/// Resolve release notes for a mod directory
///
/// Precedence: `releaseNotes` field as a file path, `releaseNotes` field
/// as inline text, `releaseNotes.md`, then the empty string.
pub fn load_release_notes(
    mod_dir: &Path,
    metadata: &ModMetadata,
) -> Result<String, MetadataError> {
    if let Some(notes) = metadata.release_notes.as_deref() {
        if !notes.is_empty() {
            let candidate = mod_dir.join(notes);
            if candidate.is_file() {
                debug!(path = %candidate.display(), "release notes from file");
                return read_text(&candidate);
            }
        }
        if !notes.trim().is_empty() {
            return Ok(notes.to_string());
        }
    }

    let sidecar = mod_dir.join("releaseNotes.md");
    if sidecar.is_file() {
        return read_text(&sidecar);
    }

    Ok(String::new())
}

fn read_text(path: &Path) -> Result<String, MetadataError> {
    fs::read_to_string(path).map_err(|_| {
        MetadataError::filesystem(
            format!("Failed to read file: {}", path.display()),
            &["Ensure the file exists and you have permission to read it"],
        )
    })
}
