//! The `info.ini` metadata record
//!
//! Every command starts by parsing the mod directory's `info.ini` into a
//! [`ModMetadata`]. The record is immutable for the duration of a command,
//! with one exception: after a first-time Workshop upload the assigned
//! `publishedFileId` is written back into the source file through
//! [`save_published_file_id`].

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::errors::MetadataError;
use crate::ini::IniDocument;
use crate::list::parse_list;

/// Maximum accepted identifier length (NuGet package id limit)
pub const MAX_NAME_LENGTH: usize = 100;

static NUGET_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9._-]*$").expect("identifier pattern"));

// SemVer 2.0, https://semver.org/spec/v2.0.0.html
static SEMVER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-((?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$",
    )
    .expect("semver pattern")
});

/// Metadata parsed from the default section of `info.ini`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModMetadata {
    pub name: String,
    pub version: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    /// Path to a readme file relative to the mod directory, or inline
    /// description text (resolved by the content loader)
    pub readme: Option<String>,
    /// Path to a release-notes file, or inline release-notes text
    pub release_notes: Option<String>,
    pub author: Option<String>,
    pub icon: Option<String>,
    pub tags: Option<Vec<String>>,
    /// Entries of the form `id` or `id:version`
    pub dependencies: Option<Vec<String>>,
    pub project_url: Option<String>,
    pub license: Option<String>,
    pub copyright: Option<String>,
    /// Workshop identity assigned on first publish; absent until then
    pub published_file_id: Option<u64>,
}

/// True when `id` satisfies the package identifier grammar
pub fn is_valid_package_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_NAME_LENGTH && NUGET_ID_RE.is_match(id)
}

/// True when `version` is a SemVer 2.0 version string
pub fn is_valid_semver(version: &str) -> bool {
    SEMVER_RE.is_match(version)
}

/// Parse `<mod_dir>/info.ini` into a validated metadata record
pub fn parse_mod_dir(mod_dir: &Path) -> Result<ModMetadata, MetadataError> {
    let info_path = mod_dir.join("info.ini");
    debug!(path = %info_path.display(), "reading mod metadata");

    let content = fs::read_to_string(&info_path).map_err(|_| {
        MetadataError::filesystem(
            format!("info.ini not found in {}", mod_dir.display()),
            &[
                "Ensure info.ini exists in the mod directory",
                "The info.ini file should contain mod metadata",
            ],
        )
    })?;

    parse_metadata(&content)
}

/// Parse raw `info.ini` content into a validated metadata record
pub fn parse_metadata(content: &str) -> Result<ModMetadata, MetadataError> {
    let ini = IniDocument::parse(content);
    let fields = ini.default_section();

    let missing: Vec<&str> = ["name", "version"]
        .into_iter()
        .filter(|key| fields.get(*key).map_or(true, |v| v.trim().is_empty()))
        .collect();

    if !missing.is_empty() {
        return Err(MetadataError::validation(
            format!("Missing required fields in info.ini: {}", missing.join(", ")),
            &[
                "Add the missing fields to info.ini",
                "Required fields: name, version",
            ],
        ));
    }

    let name = fields["name"].trim().to_string();
    if !is_valid_package_id(&name) {
        return Err(MetadataError::validation(
            format!("Invalid mod name: {}", name),
            &[
                "Names must start with a letter or underscore",
                "Allowed characters: letters, digits, dots, hyphens, underscores",
                "Maximum length is 100 characters",
                "Example: MyMod.Example",
            ],
        ));
    }

    let version = fields["version"].trim().to_string();
    if !is_valid_semver(&version) {
        return Err(MetadataError::validation(
            format!("Invalid version format: {}", version),
            &[
                "Version must follow SemVer 2.0 format",
                "Example: 1.0.0, 2.1.0-beta, 3.0.0-rc.1",
            ],
        ));
    }

    let scalar = |key: &str| fields.get(key).map(|v| v.trim().to_string());
    let list = |key: &str| fields.get(key).and_then(|v| parse_list(v));

    Ok(ModMetadata {
        name,
        version,
        display_name: scalar("displayName"),
        description: scalar("description"),
        readme: scalar("readme"),
        release_notes: scalar("releaseNotes"),
        author: scalar("author"),
        icon: scalar("icon"),
        tags: list("tags"),
        dependencies: list("dependencies"),
        // Legacy metadata files used a `homepage` key
        project_url: scalar("projectUrl").or_else(|| scalar("homepage")),
        license: scalar("license"),
        copyright: scalar("copyright"),
        published_file_id: fields
            .get("publishedFileId")
            .and_then(|v| v.trim().parse::<u64>().ok()),
    })
}

/// Write the Workshop identity back into `<mod_dir>/info.ini`
///
/// An existing default-section `publishedFileId` line is rewritten in
/// place. Otherwise the key is inserted right after the `version` line, or
/// before the first section header, or appended at the end, so the key
/// stays in the default section either way.
pub fn save_published_file_id(mod_dir: &Path, id: u64) -> Result<(), MetadataError> {
    let info_path = mod_dir.join("info.ini");

    let content = fs::read_to_string(&info_path).map_err(|e| {
        MetadataError::filesystem(
            format!("Failed to update info.ini: {}", e),
            &["Ensure info.ini exists and is writable"],
        )
    })?;

    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
    let mut found = false;

    for line in &mut lines {
        if line.trim().starts_with("publishedFileId") {
            *line = format!("publishedFileId = {}", id);
            found = true;
        }
    }

    if !found {
        let entry = format!("publishedFileId = {}", id);
        let after_version = lines
            .iter()
            .position(|l| l.trim().starts_with("version"))
            .map(|i| i + 1);

        if let Some(index) = after_version {
            lines.insert(index, entry);
        } else if let Some(index) = lines.iter().position(|l| l.trim().starts_with('[')) {
            lines.insert(index, entry);
        } else {
            lines.push(entry);
        }
    }

    let mut updated = lines.join("\n");
    if content.ends_with('\n') {
        updated.push('\n');
    }

    fs::write(&info_path, updated).map_err(|e| {
        MetadataError::filesystem(
            format!("Failed to update info.ini: {}", e),
            &["Ensure info.ini exists and is writable"],
        )
    })?;

    debug!(id, path = %info_path.display(), "persisted publishedFileId");
    Ok(())
}
