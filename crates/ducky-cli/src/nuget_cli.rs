//! NuGet CLI management
//!
//! Locates the `nuget` executable, installing it on demand, and wraps the
//! two invocations ducky needs: `pack` and `push`. Lookup order: whatever
//! `nuget` is on PATH, then the copy cached under `~/.ducky/nuget/`, then a
//! fresh download via `curl`. Child output is captured into the file log.

use std::path::{Path, PathBuf};
use std::process::Command;

use ducky_logger as logger;
use which::which;

use crate::errors::CliError;

const NUGET_DOWNLOAD_URL: &str = "https://dist.nuget.org/win-x86-commandline/latest/nuget.exe";

/// A located NuGet executable
#[derive(Debug, Clone)]
pub struct NuGetCli {
    exe: PathBuf,
    /// Downloaded nuget.exe needs mono outside Windows; a PATH `nuget` is
    /// assumed to be directly runnable
    needs_mono: bool,
}

impl NuGetCli {
    /// Find or install the NuGet executable
    pub fn locate() -> Result<Self, CliError> {
        if let Ok(path) = which("nuget") {
            logger::debug(&format!("Using nuget from PATH: {}", path.display()));
            return Ok(NuGetCli {
                exe: path,
                needs_mono: false,
            });
        }

        let cached = cache_path()?;
        if cached.is_file() {
            logger::debug(&format!("Using cached nuget: {}", cached.display()));
            return Ok(NuGetCli {
                exe: cached,
                needs_mono: cfg!(not(target_os = "windows")),
            });
        }

        download(&cached)?;
        Ok(NuGetCli {
            exe: cached,
            needs_mono: cfg!(not(target_os = "windows")),
        })
    }

    fn command(&self) -> Command {
        if self.needs_mono {
            let mut cmd = Command::new("mono");
            cmd.arg(&self.exe);
            cmd
        } else {
            Command::new(&self.exe)
        }
    }

    /// Run `nuget pack`, returning the path of the produced .nupkg
    pub fn pack(&self, nuspec: &Path, out_dir: &Path) -> Result<PathBuf, CliError> {
        let output = self
            .command()
            .arg("pack")
            .arg(nuspec)
            .arg("-OutputDirectory")
            .arg(out_dir)
            .arg("-NoDefaultExcludes")
            .output()
            .map_err(|e| {
                CliError::nuget(
                    format!("Failed to run nuget pack: {}", e),
                    &["Ensure the NuGet CLI is installed and runnable"],
                )
            })?;
        logger::capture_output("nuget pack", &output);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CliError::nuget(
                format!("nuget pack failed: {}", stderr.trim()),
                &[
                    "Check the generated .nuspec for invalid values",
                    "Run with -v to see the full NuGet output",
                ],
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        extract_package_path(&stdout).ok_or_else(|| {
            CliError::nuget(
                "nuget pack succeeded but reported no package path",
                &["Run with -v to see the full NuGet output"],
            )
        })
    }

    /// Run `nuget push` against the given server
    pub fn push(
        &self,
        nupkg: &Path,
        server: &str,
        api_key: &str,
        verbose: bool,
    ) -> Result<(), CliError> {
        let mut cmd = self.command();
        cmd.arg("push")
            .arg(nupkg)
            .arg("-Source")
            .arg(server)
            .arg("-ApiKey")
            .arg(api_key);
        if verbose {
            cmd.args(["-Verbosity", "detailed"]);
        }

        let output = cmd.output().map_err(|e| {
            CliError::nuget(
                format!("Failed to run nuget push: {}", e),
                &["Ensure the NuGet CLI is installed and runnable"],
            )
        })?;
        logger::capture_output("nuget push", &output);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CliError::nuget(
                format!("nuget push failed: {}", stderr.trim()),
                &[
                    "Check that the API key is valid for this server",
                    "Check that this package version was not already published",
                    "Verify the server URL is reachable",
                ],
            ));
        }

        Ok(())
    }
}

/// `nuget pack` reports `Successfully created package '<path>'.`
fn extract_package_path(stdout: &str) -> Option<PathBuf> {
    let marker = "Successfully created package '";
    let start = stdout.find(marker)? + marker.len();
    let rest = &stdout[start..];
    let end = rest.find('\'')?;
    Some(PathBuf::from(&rest[..end]))
}

fn cache_path() -> Result<PathBuf, CliError> {
    let home = dirs::home_dir().ok_or_else(|| {
        CliError::config(
            "Could not determine home directory",
            &["Set the HOME environment variable"],
        )
    })?;
    Ok(home.join(".ducky").join("nuget").join("nuget.exe"))
}

fn download(dest: &Path) -> Result<(), CliError> {
    logger::step("NuGet CLI not found, downloading...");

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            CliError::config(
                format!("Failed to create {}: {}", parent.display(), e),
                &["Check permissions on your home directory"],
            )
        })?;
    }

    let output = Command::new("curl")
        .args(["-fsSL", "-o"])
        .arg(dest)
        .arg(NUGET_DOWNLOAD_URL)
        .output()
        .map_err(|e| {
            CliError::nuget(
                format!("Failed to run curl: {}", e),
                &[
                    "Install curl, or install the NuGet CLI manually",
                    "https://learn.microsoft.com/nuget/install-nuget-client-tools",
                ],
            )
        })?;
    logger::capture_output("curl nuget.exe", &output);

    if !output.status.success() {
        return Err(CliError::nuget(
            "Failed to download the NuGet CLI",
            &[
                "Check your internet connection",
                "Install the NuGet CLI manually and put it on PATH",
            ],
        ));
    }

    logger::success(&format!("NuGet CLI installed to {}", dest.display()));
    Ok(())
}
