//! Workshop publishing validation
//!
//! File-level checks before an upload is attempted. Shares the binary
//! artifact check with the NuGet validator so both formats report the same
//! finding for the same problem.

use std::path::Path;

use ducky_metadata::{check_binary_artifacts, parse_mod_dir, ValidationIssue, ValidationResult};

/// Validate a mod directory for Steam Workshop publishing
pub fn validate_workshop_dir(mod_dir: &Path, app_id: u32) -> ValidationResult {
    let mut errors = Vec::new();
    let warnings = Vec::new();

    if app_id == 0 {
        errors.push(ValidationIssue::new(
            format!("Invalid Steam App ID: {}", app_id),
            &[
                "Set the STEAM_APP_ID environment variable to a valid App ID",
                "Unset STEAM_APP_ID to use the default App ID",
            ],
        ));
    }

    // Everything else reads the directory, so a missing directory gates
    // the remaining checks.
    if !mod_dir.is_dir() {
        errors.push(ValidationIssue::new(
            format!("Directory does not exist: {}", mod_dir.display()),
            &[
                "Ensure the mod directory path is correct",
                "Create the directory if it does not exist",
            ],
        ));
        return ValidationResult::from_findings(errors, warnings);
    }

    if mod_dir.join("info.ini").is_file() {
        match parse_mod_dir(mod_dir) {
            Ok(metadata) => {
                if let Some(issue) = check_binary_artifacts(mod_dir, &metadata.name) {
                    errors.push(issue);
                }
            }
            Err(e) => {
                errors.push(ValidationIssue {
                    message: e.to_string(),
                    suggestions: e.suggestions().to_vec(),
                });
            }
        }
    } else {
        errors.push(ValidationIssue::new(
            "info.ini not found in mod directory",
            &[
                "Create an info.ini file in the mod directory",
                "Include required fields: name, version",
            ],
        ));
    }

    if !mod_dir.join("preview.png").is_file() {
        errors.push(ValidationIssue::new(
            "preview.png not found in mod directory",
            &[
                "Add a preview.png image to the mod directory",
                "Recommended size: 512x512 pixels or larger",
            ],
        ));
    }

    let is_empty = std::fs::read_dir(mod_dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(true);
    if is_empty {
        errors.push(ValidationIssue::new(
            "Mod directory is empty",
            &[
                "Add mod files to the directory",
                "Include at least info.ini and some content",
            ],
        ));
    }

    ValidationResult::from_findings(errors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_valid_mod(dir: &TempDir) {
        fs::write(
            dir.path().join("info.ini"),
            "name=TestMod\nversion=1.0.0\ndescription=A mod\n",
        )
        .expect("write");
        fs::write(dir.path().join("TestMod.dll"), b"binary").expect("write");
        fs::write(dir.path().join("preview.png"), b"png").expect("write");
    }

    #[test]
    fn test_valid_workshop_dir_passes() {
        let dir = TempDir::new().expect("temp dir");
        write_valid_mod(&dir);

        let result = validate_workshop_dir(dir.path(), 3_167_020);
        assert!(result.valid, "errors: {:?}", result.errors);
    }

    #[test]
    fn test_missing_directory_gates_checks() {
        let result = validate_workshop_dir(Path::new("/nonexistent/workshop/mod"), 3_167_020);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.contains("does not exist"));
    }

    #[test]
    fn test_missing_info_ini_and_preview_reported_together() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join("TestMod.dll"), b"binary").expect("write");

        let result = validate_workshop_dir(dir.path(), 3_167_020);
        assert!(!result.valid);
        assert!(result
            .errors
            .iter()
            .any(|e| e.message.contains("info.ini not found")));
        assert!(result
            .errors
            .iter()
            .any(|e| e.message.contains("preview.png not found")));
    }

    #[test]
    fn test_zero_app_id_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        write_valid_mod(&dir);

        let result = validate_workshop_dir(dir.path(), 0);
        assert!(!result.valid);
        assert!(result
            .errors
            .iter()
            .any(|e| e.message.contains("Invalid Steam App ID")));
    }

    #[test]
    fn test_dll_name_mismatch_shared_with_nuget_check() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(
            dir.path().join("info.ini"),
            "name=TestMod\nversion=1.0.0\n",
        )
        .expect("write");
        fs::write(dir.path().join("Other.dll"), b"binary").expect("write");
        fs::write(dir.path().join("preview.png"), b"png").expect("write");

        let result = validate_workshop_dir(dir.path(), 3_167_020);
        assert!(!result.valid);
        assert!(result
            .errors
            .iter()
            .any(|e| e.message.contains("No DLL file matches mod name")));
    }
}
