//! Package file collection
//!
//! Builds the list of files that go into a package: DLLs first, then the
//! preview image renamed to `icon.png`, then everything else except the
//! metadata file and packaging leftovers.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::artifact::collect_dll_files;
use crate::errors::MetadataError;

/// One file to package: absolute source and package-relative target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedFile {
    pub source: PathBuf,
    pub target: String,
}

/// Collect the files of a mod directory for packaging
pub fn collect_package_files(mod_dir: &Path) -> Result<Vec<CollectedFile>, MetadataError> {
    if !mod_dir.is_dir() {
        return Err(MetadataError::validation(
            format!("Mod directory does not exist: {}", mod_dir.display()),
            &["Check that the path is correct", "Ensure the directory exists"],
        ));
    }

    let mut files = Vec::new();

    for dll in collect_dll_files(mod_dir) {
        if let Some(target) = relative_target(mod_dir, &dll) {
            files.push(CollectedFile {
                source: dll,
                target,
            });
        }
    }

    // preview.png ships under the conventional icon name
    let preview = mod_dir.join("preview.png");
    if preview.is_file() {
        files.push(CollectedFile {
            source: preview,
            target: "icon.png".to_string(),
        });
    }

    for entry in WalkDir::new(mod_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let Some(target) = relative_target(mod_dir, entry.path()) else {
            continue;
        };

        if target.to_ascii_lowercase().ends_with(".dll") {
            continue;
        }
        if is_excluded(entry.path()) {
            continue;
        }
        if files.iter().any(|f| f.target == target) {
            continue;
        }

        files.push(CollectedFile {
            source: entry.into_path(),
            target,
        });
    }

    Ok(files)
}

/// Files never packaged: the metadata file, packaging outputs, and the
/// preview/icon images handled separately
fn is_excluded(path: &Path) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_lowercase()) else {
        return true;
    };
    name == "info.ini"
        || name == "preview.png"
        || name == "icon.png"
        || name.ends_with(".nupkg")
        || name.ends_with(".nuspec")
}

fn relative_target(base: &Path, path: &Path) -> Option<String> {
    path.strip_prefix(base)
        .ok()
        .map(|rel| rel.to_string_lossy().into_owned())
}

/// Human-readable file size for progress output
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;

    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", size, UNITS[unit])
}
