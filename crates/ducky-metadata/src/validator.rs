//! NuGet packaging validation
//!
//! Cross-checks the parsed metadata against the directory contents. All
//! checks run even when earlier ones fail; only a missing directory gates
//! the rest. Results are recomputed on every call and never persisted.

use std::path::Path;

use crate::artifact::{check_binary_artifacts, ValidationIssue};
use crate::metadata::{is_valid_package_id, is_valid_semver, ModMetadata, MAX_NAME_LENGTH};

/// Categorized outcome of a validation run
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn from_findings(errors: Vec<ValidationIssue>, warnings: Vec<String>) -> Self {
        ValidationResult {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// Validate a mod directory for NuGet packaging
pub fn validate_mod(mod_dir: &Path, metadata: &ModMetadata) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if !mod_dir.is_dir() {
        errors.push(ValidationIssue::new(
            format!("Mod directory does not exist: {}", mod_dir.display()),
            &[
                "Check that the path is correct",
                "Ensure the directory exists",
            ],
        ));
        return ValidationResult::from_findings(errors, warnings);
    }

    if let Some(issue) = check_binary_artifacts(mod_dir, &metadata.name) {
        errors.push(issue);
    }

    // The parser already enforces both grammars; commands can hand-build
    // metadata, so the formats are re-checked here.
    check_version_format(&metadata.version, &mut errors);
    check_package_id(&metadata.name, &mut errors);
    check_required_fields(metadata, &mut errors, &mut warnings);

    ValidationResult::from_findings(errors, warnings)
}

fn check_version_format(version: &str, errors: &mut Vec<ValidationIssue>) {
    if !is_valid_semver(version) {
        errors.push(ValidationIssue::new(
            format!("Invalid version format: {}", version),
            &[
                "Version must follow SemVer 2.0 format",
                "Examples: 1.0.0, 2.1.0-beta, 3.0.0-rc.1+build.123",
            ],
        ));
    }
}

fn check_package_id(id: &str, errors: &mut Vec<ValidationIssue>) {
    if id.is_empty() || id.len() > MAX_NAME_LENGTH {
        errors.push(ValidationIssue::new(
            format!(
                "Invalid mod name length: {} characters (max {})",
                id.len(),
                MAX_NAME_LENGTH
            ),
            &["Use a shorter name for your mod"],
        ));
        return;
    }

    if !is_valid_package_id(id) {
        errors.push(ValidationIssue::new(
            format!("Invalid mod name format: {}", id),
            &[
                "Names must start with a letter or underscore",
                "Allowed characters: letters, digits, dots, hyphens, underscores",
                "Example: MyMod.Example",
            ],
        ));
    }
}

fn check_required_fields(
    metadata: &ModMetadata,
    errors: &mut Vec<ValidationIssue>,
    warnings: &mut Vec<String>,
) {
    if metadata.name.is_empty() {
        errors.push(ValidationIssue::new(
            "Missing required field: name",
            &["Add \"name\" field to info.ini"],
        ));
    }

    if metadata.version.is_empty() {
        errors.push(ValidationIssue::new(
            "Missing required field: version",
            &["Add \"version\" field to info.ini"],
        ));
    }

    // Recommended, not required: reported as a warning and does not block
    // packaging.
    if metadata
        .description
        .as_deref()
        .map_or(true, |d| d.trim().is_empty())
    {
        warnings.push(
            "Missing recommended field: description (add \"description\" to info.ini)"
                .to_string(),
        );
    }
}
