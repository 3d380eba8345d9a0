//! The Workshop upload worker
//!
//! Runs in its own process (spawned by `steam push`) and reports every step
//! as line-delimited JSON on stdout. Console logging stays on stderr so the
//! event wire is never polluted.
//!
//! First-time uploads create the remote item and persist its id to
//! `info.ini` before any content is transferred. A later failure keeps the
//! persisted id; the upload is retried against the existing item next time
//! instead of creating a duplicate.

use std::io::Write;
use std::path::Path;

use ducky_metadata::{parse_mod_dir, save_published_file_id, ModMetadata};
use ducky_steam::{
    connect, load_descriptions, load_titles, primary_language_content, steam_app_id,
    LocalizedDescription, LocalizedTitle, UpdateDetails, UploadEvent, UploadStatus, Visibility,
    WorkshopClient,
};

use crate::errors::CliError;

/// Flags shared by `steam push` and the worker it spawns
#[derive(Debug, Clone, Default)]
pub struct WorkerOpts {
    /// Push localized titles/descriptions after the content update
    pub update_description: bool,
    pub changelog: Option<String>,
    /// Leave the change note without the ducky footer
    pub skip_tail: bool,
}

const SUBMISSION_TAIL: &str = "[hr]Submitted via ducky cli";

/// Entry point of `ducky steam upload-worker`; returns the exit code
pub fn run_upload_worker(mod_dir: &Path, opts: &WorkerOpts) -> i32 {
    let mut emit = |event: &UploadEvent| {
        if let Ok(line) = serde_json::to_string(event) {
            println!("{line}");
            let _ = std::io::stdout().flush();
        }
    };

    match run(mod_dir, opts, &mut emit) {
        Ok(()) => 0,
        Err(e) => {
            emit(&UploadEvent::Failed {
                message: e.to_string(),
                suggestions: e.suggestions().to_vec(),
            });
            1
        }
    }
}

fn run(
    mod_dir: &Path,
    opts: &WorkerOpts,
    emit: &mut dyn FnMut(&UploadEvent),
) -> Result<(), CliError> {
    // Metadata problems surface before Steam is ever touched
    status(emit, UploadStatus::Preparing, "Reading mod metadata...");
    let metadata = parse_mod_dir(mod_dir)?;
    let app_id = steam_app_id()?;

    status(emit, UploadStatus::StartingSteamUpload, "Connecting to Steam...");
    let mut client = connect(app_id)?;

    publish(client.as_mut(), mod_dir, &metadata, opts, emit)
}

/// The upload pipeline, against any [`WorkshopClient`]
pub fn publish(
    client: &mut dyn WorkshopClient,
    mod_dir: &Path,
    metadata: &ModMetadata,
    opts: &WorkerOpts,
    emit: &mut dyn FnMut(&UploadEvent),
) -> Result<(), CliError> {
    let first_time = metadata.published_file_id.is_none();
    let item_id = match metadata.published_file_id {
        Some(id) => id,
        None => {
            status(emit, UploadStatus::RequestingId, "Creating Workshop item...");
            let id = client.create_item()?;

            // Persist before uploading anything: a crash from here on must
            // not orphan the remote item.
            status(emit, UploadStatus::WritingIni, "Saving publishedFileId...");
            save_published_file_id(mod_dir, id)?;
            emit(&UploadEvent::Created {
                published_file_id: id,
            });
            id
        }
    };

    let default_title = metadata
        .display_name
        .clone()
        .unwrap_or_else(|| metadata.name.clone());
    let descriptions = load_descriptions(mod_dir);
    let titles = load_titles(mod_dir, &default_title);
    let (primary_description, primary_title) = primary_language_content(&descriptions, &titles);

    let change_note = append_tail(opts.changelog.as_deref().unwrap_or(""), opts.skip_tail);
    let preview = mod_dir.join("preview.png");
    let mut details = UpdateDetails {
        change_note: (!change_note.is_empty()).then_some(change_note),
        preview_path: preview.is_file().then_some(preview),
        content_path: Some(mod_dir.to_path_buf()),
        visibility: Some(Visibility::Public),
        ..UpdateDetails::default()
    };

    // New items always get their primary text; re-uploads leave the live
    // description alone unless --update-description asked for it
    if first_time || opts.update_description {
        details.title = primary_title.map(|t| t.title.clone());
        details.description =
            primary_description.map(|d| append_tail(&d.content, opts.skip_tail));
    }

    status(
        emit,
        UploadStatus::UploadingContent,
        "Uploading content to Steam...",
    );
    let mut on_progress = |processed: u64, total: u64| {
        emit(&UploadEvent::Progress {
            bytes_processed: processed,
            bytes_total: total,
        });
    };
    client.update_item(item_id, &details, &mut on_progress)?;

    if opts.update_description {
        let primary = primary_description
            .map(|d| d.language.as_str())
            .or(primary_title.map(|t| t.language.as_str()));

        for language in non_primary_languages(&descriptions, &titles, primary) {
            status(
                emit,
                UploadStatus::UploadingTranslations,
                &format!("Updating {} description...", language),
            );
            let localized = UpdateDetails {
                title: titles
                    .iter()
                    .find(|t| t.language == language)
                    .map(|t| t.title.clone()),
                description: descriptions
                    .iter()
                    .find(|d| d.language == language)
                    .map(|d| append_tail(&d.content, opts.skip_tail)),
                language: Some(language.clone()),
                ..UpdateDetails::default()
            };
            client.update_item(item_id, &localized, &mut |_, _| {})?;
        }
    }

    status(emit, UploadStatus::Completed, "Upload complete");
    emit(&UploadEvent::Completed {
        message: format!(
            "{} Workshop item {}",
            if first_time { "Published" } else { "Updated" },
            item_id
        ),
    });
    Ok(())
}

fn status(emit: &mut dyn FnMut(&UploadEvent), status: UploadStatus, message: &str) {
    emit(&UploadEvent::Status {
        status,
        message: message.to_string(),
    });
}

/// Append the submission footer, unless skipped or already present
fn append_tail(content: &str, skip_tail: bool) -> String {
    if skip_tail {
        return content.to_string();
    }
    if content.is_empty() {
        return SUBMISSION_TAIL.to_string();
    }
    if content.trim_end().ends_with(SUBMISSION_TAIL) {
        return content.to_string();
    }
    format!("{content}\n\n{SUBMISSION_TAIL}")
}

/// Every language with localized content, minus the primary, in encounter
/// order without duplicates
fn non_primary_languages(
    descriptions: &[LocalizedDescription],
    titles: &[LocalizedTitle],
    primary: Option<&str>,
) -> Vec<String> {
    let mut languages: Vec<String> = Vec::new();
    let all = descriptions
        .iter()
        .map(|d| d.language.as_str())
        .chain(titles.iter().map(|t| t.language.as_str()));

    for language in all {
        if Some(language) != primary && !languages.iter().any(|l| l == language) {
            languages.push(language.to_string());
        }
    }
    languages
}

#[cfg(test)]
mod tests {
    use super::*;
    use ducky_steam::SteamError;
    use std::fs;
    use tempfile::TempDir;

    /// Records every call instead of talking to Steam
    struct FakeClient {
        next_id: u64,
        created: u32,
        updates: Vec<UpdateDetails>,
        fail_update: bool,
    }

    impl FakeClient {
        fn new(next_id: u64) -> Self {
            FakeClient {
                next_id,
                created: 0,
                updates: Vec::new(),
                fail_update: false,
            }
        }
    }

    impl WorkshopClient for FakeClient {
        fn create_item(&mut self) -> Result<u64, SteamError> {
            self.created += 1;
            Ok(self.next_id)
        }

        fn update_item(
            &mut self,
            _item_id: u64,
            details: &UpdateDetails,
            on_progress: &mut dyn FnMut(u64, u64),
        ) -> Result<(), SteamError> {
            if self.fail_update {
                return Err(SteamError::upload("Workshop upload failed: timeout", &[]));
            }
            on_progress(512, 1024);
            on_progress(1024, 1024);
            self.updates.push(details.clone());
            Ok(())
        }
    }

    fn write_mod(dir: &TempDir) {
        fs::write(
            dir.path().join("info.ini"),
            "name=TestMod\nversion=1.0.0\ndisplayName=Test Mod\n",
        )
        .expect("write");
        fs::write(dir.path().join("TestMod.dll"), b"binary").expect("write");
        fs::write(dir.path().join("preview.png"), b"png").expect("write");
    }

    #[test]
    fn test_first_time_publish_creates_and_persists_id() {
        let dir = TempDir::new().expect("temp dir");
        write_mod(&dir);

        let mut client = FakeClient::new(424242);
        let metadata = parse_mod_dir(dir.path()).expect("parse");
        let mut events = Vec::new();
        publish(
            &mut client,
            dir.path(),
            &metadata,
            &WorkerOpts::default(),
            &mut |e| events.push(e.clone()),
        )
        .expect("publish");

        assert_eq!(client.created, 1);
        assert!(events
            .iter()
            .any(|e| matches!(e, UploadEvent::Created { published_file_id: 424242 })));

        // The id is on disk before the content update ran
        let metadata = parse_mod_dir(dir.path()).expect("reparse");
        assert_eq!(metadata.published_file_id, Some(424242));

        let main_update = &client.updates[0];
        // No description/*.md in the fixture: nothing to set the text from
        assert_eq!(main_update.title, None);
        assert_eq!(main_update.description, None);
        assert_eq!(main_update.visibility, Some(Visibility::Public));
        assert!(main_update.content_path.is_some());
        assert!(main_update.preview_path.is_some());
        assert_eq!(
            main_update.change_note.as_deref(),
            Some("[hr]Submitted via ducky cli")
        );
    }

    #[test]
    fn test_existing_id_skips_creation() {
        let dir = TempDir::new().expect("temp dir");
        write_mod(&dir);
        save_published_file_id(dir.path(), 777).expect("seed id");

        let mut client = FakeClient::new(1);
        let metadata = parse_mod_dir(dir.path()).expect("parse");
        let mut events = Vec::new();
        publish(
            &mut client,
            dir.path(),
            &metadata,
            &WorkerOpts::default(),
            &mut |e| events.push(e.clone()),
        )
        .expect("publish");

        assert_eq!(client.created, 0);
        assert!(!events
            .iter()
            .any(|e| matches!(e, UploadEvent::Created { .. })));

        // A plain re-upload leaves the live description and title alone
        let main_update = &client.updates[0];
        assert_eq!(main_update.title, None);
        assert_eq!(main_update.description, None);
    }

    #[test]
    fn test_failed_upload_keeps_persisted_id() {
        let dir = TempDir::new().expect("temp dir");
        write_mod(&dir);

        let mut client = FakeClient::new(9001);
        client.fail_update = true;
        let metadata = parse_mod_dir(dir.path()).expect("parse");
        let mut events = Vec::new();
        let err = publish(
            &mut client,
            dir.path(),
            &metadata,
            &WorkerOpts::default(),
            &mut |e| events.push(e.clone()),
        )
        .expect_err("update fails");
        assert!(err.to_string().contains("Workshop upload failed"));

        // No rollback of the remote identity
        let metadata = parse_mod_dir(dir.path()).expect("reparse");
        assert_eq!(metadata.published_file_id, Some(9001));
    }

    #[test]
    fn test_localized_updates_follow_content_update() {
        let dir = TempDir::new().expect("temp dir");
        write_mod(&dir);
        let desc_dir = dir.path().join("description");
        fs::create_dir(&desc_dir).expect("mkdir");
        fs::write(desc_dir.join("en.md"), "# English Title\n\nenglish body").expect("write");
        fs::write(desc_dir.join("zh.md"), "# 中文标题\n\n中文正文").expect("write");
        fs::write(desc_dir.join("de.md"), "deutscher text ohne titel").expect("write");

        let mut client = FakeClient::new(10);
        let metadata = parse_mod_dir(dir.path()).expect("parse");
        let opts = WorkerOpts {
            update_description: true,
            ..WorkerOpts::default()
        };
        publish(&mut client, dir.path(), &metadata, &opts, &mut |_| {}).expect("publish");

        // Main update carries english (the primary), then one localized
        // update per remaining language
        assert_eq!(client.updates.len(), 3);
        assert_eq!(client.updates[0].title.as_deref(), Some("English Title"));
        assert!(client.updates[0].language.is_none());

        let languages: Vec<Option<&str>> = client.updates[1..]
            .iter()
            .map(|u| u.language.as_deref())
            .collect();
        assert!(languages.contains(&Some("schinese")));
        assert!(languages.contains(&Some("german")));

        let localized = client.updates[1..]
            .iter()
            .find(|u| u.language.as_deref() == Some("schinese"))
            .expect("schinese update");
        assert_eq!(localized.title.as_deref(), Some("中文标题"));
        assert!(localized.content_path.is_none());
        assert!(localized.change_note.is_none());
    }

    #[test]
    fn test_append_tail() {
        assert_eq!(append_tail("Fixed ducks", true), "Fixed ducks");
        assert_eq!(
            append_tail("Fixed ducks", false),
            "Fixed ducks\n\n[hr]Submitted via ducky cli"
        );
        assert_eq!(append_tail("", true), "");
        assert_eq!(append_tail("", false), "[hr]Submitted via ducky cli");
        // Already-tailed content is not tailed twice
        let tailed = append_tail("Fixed ducks", false);
        assert_eq!(append_tail(&tailed, false), tailed);
    }

    #[test]
    fn test_non_primary_languages_dedup_and_order() {
        let descriptions = vec![
            LocalizedDescription {
                language: "german".to_string(),
                content: String::new(),
            },
            LocalizedDescription {
                language: "english".to_string(),
                content: String::new(),
            },
        ];
        let titles = vec![LocalizedTitle {
            language: "german".to_string(),
            title: String::new(),
        }];

        let languages = non_primary_languages(&descriptions, &titles, Some("english"));
        assert_eq!(languages, vec!["german".to_string()]);
    }
}
