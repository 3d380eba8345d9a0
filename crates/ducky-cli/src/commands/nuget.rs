//! NuGet packaging commands

use std::fs;
use std::path::{Path, PathBuf};

use ducky_logger as logger;
use ducky_metadata::{
    collect_package_files, format_file_size, generate_nuspec, load_description,
    load_release_notes, parse_mod_dir, validate_mod, MetadataError, ModMetadata,
};

use crate::commands::report_validation;
use crate::errors::CliError;
use crate::nuget_cli::NuGetCli;
use crate::nuget_config::NuGetConfig;

/// `ducky nuget validate <path>`
pub fn handle_validate(mod_dir: &Path) -> Result<(), CliError> {
    logger::header("NuGet Validate");

    let metadata = parse_mod_dir(mod_dir)?;
    logger::step(&format!("Validating {} v{}", metadata.name, metadata.version));

    report_validation("NuGet", &validate_mod(mod_dir, &metadata))
}

/// `ducky nuget pack <path> [-o out]`
pub fn handle_pack(mod_dir: &Path, output: Option<&Path>) -> Result<(), CliError> {
    logger::header("NuGet Pack");

    let nupkg = prepare_package(mod_dir, output)?;
    logger::success(&format!("Created package: {}", nupkg.display()));
    Ok(())
}

/// `ducky nuget push <path> [--pack] [-s server] [-k api-key] [-o out]`
///
/// Without `--pack` the path names an already-built .nupkg; with it, the
/// path is a mod directory that gets packed first.
pub fn handle_push(
    path: &Path,
    pack: bool,
    server: Option<&str>,
    api_key: Option<&str>,
    output: Option<&Path>,
) -> Result<(), CliError> {
    logger::header("NuGet Push");

    let config = NuGetConfig::resolve(server, api_key)?;
    let key = config.require_api_key()?.to_string();

    let nupkg = if pack {
        prepare_package(path, output)?
    } else if path.is_file() {
        path.to_path_buf()
    } else {
        return Err(MetadataError::filesystem(
            format!(".nupkg file not found: {}", path.display()),
            &[
                "Check that the path is correct",
                "Use --pack to package a mod directory before pushing",
            ],
        )
        .into());
    };

    logger::step(&format!(
        "Pushing {} to {}",
        nupkg.display(),
        config.server
    ));
    NuGetCli::locate()?.push(&nupkg, &config.server, &key, config.verbose)?;

    logger::success("Package published");
    Ok(())
}

/// Validate, stage and pack a mod directory, returning the .nupkg path
fn prepare_package(mod_dir: &Path, output: Option<&Path>) -> Result<PathBuf, CliError> {
    let metadata = parse_mod_dir(mod_dir)?;
    logger::step(&format!("Validating {} v{}", metadata.name, metadata.version));
    report_validation("NuGet", &validate_mod(mod_dir, &metadata))?;

    let description = load_description(mod_dir, &metadata)?;
    let release_notes = load_release_notes(mod_dir, &metadata)?;

    let files = collect_package_files(mod_dir)?;
    let total: u64 = files
        .iter()
        .filter_map(|f| fs::metadata(&f.source).ok())
        .map(|m| m.len())
        .sum();
    logger::step(&format!(
        "Collected {} file{} ({})",
        files.len(),
        if files.len() == 1 { "" } else { "s" },
        format_file_size(total)
    ));

    // The resolved description also ships inside the package as README.md
    let readme_rel = (!description.is_empty()).then_some("README.md");

    let nuspec = generate_nuspec(&metadata, &description, &release_notes, readme_rel);

    let out_dir = output.unwrap_or(mod_dir);
    fs::create_dir_all(out_dir).map_err(|e| {
        CliError::config(
            format!("Failed to create output directory {}: {}", out_dir.display(), e),
            &["Check permissions on the output path"],
        )
    })?;

    let staging = stage_files(&metadata, mod_dir, &nuspec, &description)?;
    let nuspec_path = staging.join(format!("{}.nuspec", metadata.name));

    logger::spinner_start("Packing...");
    let packed = NuGetCli::locate()
        .and_then(|cli| cli.pack(&nuspec_path, out_dir))
        .map_err(|e| {
            logger::spinner_stop();
            let _ = fs::remove_dir_all(&staging);
            e
        })?;
    logger::spinner_stop();

    let _ = fs::remove_dir_all(&staging);
    Ok(packed)
}

/// Copy the collected files into a staging directory with the manifest
///
/// Staging gives the pack step a clean content root: targets may be renamed
/// (preview.png ships as icon.png) and excluded files never reach the
/// package.
fn stage_files(
    metadata: &ModMetadata,
    mod_dir: &Path,
    nuspec: &str,
    description: &str,
) -> Result<PathBuf, CliError> {
    let staging = std::env::temp_dir().join(format!(
        "ducky-pack-{}-{}",
        metadata.name,
        std::process::id()
    ));
    if staging.exists() {
        let _ = fs::remove_dir_all(&staging);
    }

    let copy_err = |e: std::io::Error, what: &str| {
        CliError::config(
            format!("Failed to stage {}: {}", what, e),
            &["Check free disk space and permissions on the temp directory"],
        )
    };

    fs::create_dir_all(&staging).map_err(|e| copy_err(e, "directory"))?;

    for file in collect_package_files(mod_dir)? {
        let dest = staging.join(&file.target);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| copy_err(e, &file.target))?;
        }
        fs::copy(&file.source, &dest).map_err(|e| copy_err(e, &file.target))?;
    }

    // The package README carries the resolved description, whatever its
    // source was
    if !description.is_empty() {
        fs::write(staging.join("README.md"), description)
            .map_err(|e| copy_err(e, "README.md"))?;
    }

    let nuspec_path = staging.join(format!("{}.nuspec", metadata.name));
    fs::write(&nuspec_path, nuspec).map_err(|e| copy_err(e, "manifest"))?;
    logger::debug(&format!("Staged package at {}", staging.display()));

    Ok(staging)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_mod(dir: &TempDir) {
        fs::write(
            dir.path().join("info.ini"),
            "name=TestMod\nversion=1.0.0\ndescription=A mod\n",
        )
        .expect("write");
        fs::write(dir.path().join("TestMod.dll"), b"binary").expect("write");
        fs::write(dir.path().join("preview.png"), b"png").expect("write");
    }

    #[test]
    fn test_stage_files_renames_preview_and_writes_manifest() {
        let dir = TempDir::new().expect("temp dir");
        write_mod(&dir);
        let metadata = parse_mod_dir(dir.path()).expect("parse");
        let nuspec = generate_nuspec(&metadata, "A long description", "", Some("README.md"));

        let staging =
            stage_files(&metadata, dir.path(), &nuspec, "A long description").expect("stage");
        assert!(staging.join("TestMod.dll").is_file());
        assert!(staging.join("icon.png").is_file());
        assert!(!staging.join("preview.png").exists());
        assert!(!staging.join("info.ini").exists());
        assert!(staging.join("TestMod.nuspec").is_file());
        assert_eq!(
            fs::read_to_string(staging.join("README.md")).expect("readme"),
            "A long description"
        );

        fs::remove_dir_all(staging).expect("cleanup");
    }

    #[test]
    fn test_stage_files_without_description_has_no_readme() {
        let dir = TempDir::new().expect("temp dir");
        // Distinct mod name so the staging path cannot collide with the
        // other staging test in the same process
        fs::write(dir.path().join("info.ini"), "name=BareMod\nversion=1.0.0\n").expect("write");
        fs::write(dir.path().join("BareMod.dll"), b"binary").expect("write");
        let metadata = parse_mod_dir(dir.path()).expect("parse");
        let nuspec = generate_nuspec(&metadata, "", "", None);

        let staging = stage_files(&metadata, dir.path(), &nuspec, "").expect("stage");
        assert!(!staging.join("README.md").exists());

        fs::remove_dir_all(staging).expect("cleanup");
    }

    #[test]
    fn test_validate_fails_on_dll_mismatch() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(
            dir.path().join("info.ini"),
            "name=Baz\nversion=1.0.0\ndescription=A mod\n",
        )
        .expect("write");
        fs::write(dir.path().join("Foo.dll"), b"binary").expect("write");

        let err = handle_validate(dir.path()).expect_err("must fail");
        assert!(err.to_string().contains("validation failed"));
    }
}
