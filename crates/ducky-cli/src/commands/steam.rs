//! Steam Workshop commands
//!
//! `steam push` does not talk to Steamworks itself: it spawns this same
//! executable with the hidden `upload-worker` subcommand and renders the
//! worker's event stream. The native API then lives and dies inside one
//! short-lived child process, and killing the child on drop is the
//! teardown-on-exit guarantee.

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Child, Command, Stdio};

use colored::Colorize;
use ducky_logger as logger;
use ducky_metadata::parse_mod_dir;
use ducky_steam::{steam_app_id, validate_workshop_dir, SteamError, UploadEvent};
use indicatif::ProgressBar;

use crate::commands::report_validation;
use crate::errors::CliError;
use crate::worker::WorkerOpts;

/// `ducky steam validate <path>`
pub fn handle_validate(mod_dir: &Path) -> Result<(), CliError> {
    logger::header("Steam Validate");

    let app_id = steam_app_id()?;
    logger::step(&format!("Validating Workshop directory (app {})", app_id));

    report_validation("Workshop", &validate_workshop_dir(mod_dir, app_id))
}

/// `ducky steam push <path> [--update-description] [--changelog] [--skip-tail]`
pub fn handle_push(mod_dir: &Path, opts: &WorkerOpts) -> Result<(), CliError> {
    logger::header("Steam Push");

    let app_id = steam_app_id()?;
    let metadata = parse_mod_dir(mod_dir)?;
    logger::step(&format!(
        "Publishing {} v{} (app {})",
        metadata.name, metadata.version, app_id
    ));
    report_validation("Workshop", &validate_workshop_dir(mod_dir, app_id))?;

    let mut worker = spawn_worker(mod_dir, opts)?;
    let outcome = render_events(&mut worker);
    let status = worker.wait();

    let failure = outcome?;
    if let Some((message, suggestions)) = failure {
        return Err(CliError::Steam(SteamError::Upload {
            message,
            suggestions,
        }));
    }

    match status {
        Ok(status) if status.success() => {
            // The id is in info.ini by now even for first-time uploads
            if let Ok(metadata) = parse_mod_dir(mod_dir) {
                if let Some(id) = metadata.published_file_id {
                    println!();
                    println!(
                        "View your item: {}",
                        format!(
                            "https://steamcommunity.com/sharedfiles/filedetails/?id={}",
                            id
                        )
                        .bold()
                    );
                }
            }
            Ok(())
        }
        Ok(status) => Err(CliError::config(
            format!("Upload worker exited with status {}", status),
            &["Run with -v and check the log file for worker output"],
        )),
        Err(e) => Err(CliError::config(
            format!("Failed to wait for upload worker: {}", e),
            &[],
        )),
    }
}

fn spawn_worker(mod_dir: &Path, opts: &WorkerOpts) -> Result<WorkerGuard, CliError> {
    let exe = std::env::current_exe().map_err(|e| {
        CliError::config(format!("Could not locate own executable: {}", e), &[])
    })?;

    let mut cmd = Command::new(exe);
    cmd.arg("steam").arg("upload-worker").arg(mod_dir);
    if opts.update_description {
        cmd.arg("--update-description");
    }
    if let Some(note) = opts.changelog.as_deref() {
        cmd.args(["--changelog", note]);
    }
    if opts.skip_tail {
        cmd.arg("--skip-tail");
    }
    cmd.stdout(Stdio::piped());

    let child = cmd.spawn().map_err(|e| {
        CliError::config(
            format!("Failed to spawn upload worker: {}", e),
            &["Reinstall ducky if the executable is damaged"],
        )
    })?;

    Ok(WorkerGuard { child: Some(child) })
}

/// Drain the worker's event stream, rendering progress as it happens
///
/// Returns the failure payload when the worker reported one; transport
/// errors on the pipe are their own error.
fn render_events(worker: &mut WorkerGuard) -> Result<Option<(String, Vec<String>)>, CliError> {
    let stdout = worker
        .child
        .as_mut()
        .and_then(|c| c.stdout.take())
        .ok_or_else(|| CliError::config("Upload worker has no stdout", &[]))?;

    let mut bar: Option<ProgressBar> = None;
    let mut failure = None;

    for line in BufReader::new(stdout).lines() {
        let line = line.map_err(|e| {
            CliError::config(format!("Lost connection to upload worker: {}", e), &[])
        })?;

        let Ok(event) = serde_json::from_str::<UploadEvent>(&line) else {
            // Anything that is not an event still lands in the log
            logger::debug(&line);
            continue;
        };

        match event {
            UploadEvent::Status { message, .. } => {
                finish_bar(&mut bar);
                logger::step(&message);
            }
            UploadEvent::Progress {
                bytes_processed,
                bytes_total,
            } => {
                let bar = bar.get_or_insert_with(|| logger::upload_bar(bytes_total));
                bar.set_length(bytes_total);
                bar.set_position(bytes_processed);
            }
            UploadEvent::Created { published_file_id } => {
                finish_bar(&mut bar);
                logger::success(&format!(
                    "Workshop item created: {} (saved to info.ini)",
                    published_file_id
                ));
            }
            UploadEvent::Completed { message } => {
                finish_bar(&mut bar);
                logger::success(&message);
            }
            UploadEvent::Failed {
                message,
                suggestions,
            } => {
                finish_bar(&mut bar);
                failure = Some((message, suggestions));
            }
        }
    }

    Ok(failure)
}

fn finish_bar(bar: &mut Option<ProgressBar>) {
    if let Some(bar) = bar.take() {
        bar.finish_and_clear();
    }
}

/// Owns the worker process; the child never outlives the parent
struct WorkerGuard {
    child: Option<Child>,
}

impl WorkerGuard {
    fn wait(&mut self) -> std::io::Result<std::process::ExitStatus> {
        let mut child = self.child.take().expect("worker already waited on");
        child.wait()
    }
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_reports_missing_pieces() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join("stray.txt"), "not a mod").expect("write");

        let err = handle_validate(dir.path()).expect_err("must fail");
        assert!(err.to_string().contains("validation failed"));
    }

    #[test]
    fn test_worker_guard_tolerates_missing_child() {
        // Dropping after wait() must not panic or double-kill
        let guard = WorkerGuard { child: None };
        drop(guard);
    }
}
