//! Workshop upload contract
//!
//! The Steamworks runtime is an external collaborator. Upload code talks
//! to it through the [`WorkshopClient`] trait and an explicit session
//! handle with an init/shutdown lifecycle, so tests can substitute fakes
//! and the worker controls exactly when the native API is torn down.

use std::path::PathBuf;

use crate::errors::SteamError;

/// Item visibility on the Workshop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    FriendsOnly,
    Private,
}

/// Fields of one Workshop item update
///
/// Every field is optional; only the present ones are sent. `language`
/// scopes title/description to one Steam language for localized updates.
#[derive(Debug, Clone, Default)]
pub struct UpdateDetails {
    pub title: Option<String>,
    pub description: Option<String>,
    pub change_note: Option<String>,
    pub preview_path: Option<PathBuf>,
    pub content_path: Option<PathBuf>,
    pub visibility: Option<Visibility>,
    pub language: Option<String>,
}

/// Progress callback: `(bytes_processed, bytes_total)`
pub type ProgressSink<'a> = &'a mut dyn FnMut(u64, u64);

/// The call contract of the Workshop upload service
pub trait WorkshopClient {
    /// Create a new Workshop item, returning its published file id.
    /// Creation assigns a remote identity, so callers must persist the id
    /// before any further operation.
    fn create_item(&mut self) -> Result<u64, SteamError>;

    /// Submit one update to an existing item, reporting transfer progress
    fn update_item(
        &mut self,
        item_id: u64,
        details: &UpdateDetails,
        on_progress: ProgressSink<'_>,
    ) -> Result<(), SteamError>;
}

/// Open a Workshop session for the given app id
#[cfg(feature = "steamworks-backend")]
pub fn connect(app_id: u32) -> Result<Box<dyn WorkshopClient>, SteamError> {
    Ok(Box::new(session::SteamworksSession::init(app_id)?))
}

/// Open a Workshop session for the given app id
///
/// This build carries no Steamworks backend; publishing needs a binary
/// built with the `steamworks-backend` feature.
#[cfg(not(feature = "steamworks-backend"))]
pub fn connect(_app_id: u32) -> Result<Box<dyn WorkshopClient>, SteamError> {
    Err(SteamError::config(
        "This ducky build has no Steamworks backend",
        &[
            "Reinstall with the backend enabled: cargo install ducky --features steamworks-backend",
            "Ensure Steam is installed and running before publishing",
        ],
    ))
}

#[cfg(feature = "steamworks-backend")]
mod session {
    use std::sync::mpsc;
    use std::time::Duration;

    use steamworks::{AppId, FileType, PublishedFileId, PublishedFileVisibility};

    use super::{ProgressSink, UpdateDetails, Visibility, WorkshopClient};
    use crate::errors::SteamError;

    /// Explicit Steamworks session; dropping it releases the native API
    pub struct SteamworksSession {
        client: steamworks::Client,
        single: steamworks::SingleClient,
        app_id: u32,
    }

    impl SteamworksSession {
        pub fn init(app_id: u32) -> Result<Self, SteamError> {
            let (client, single) = steamworks::Client::init_app(AppId(app_id)).map_err(|e| {
                SteamError::config(
                    format!("Failed to initialize Steamworks: {}", e),
                    &[
                        "Ensure Steam is running",
                        "Ensure you are logged into Steam",
                        "Check that the Steam App ID is correct",
                        "Try restarting Steam",
                    ],
                )
            })?;

            Ok(SteamworksSession {
                client,
                single,
                app_id,
            })
        }

        /// Pump Steam callbacks until the channel yields the result
        fn wait_for<T>(&self, rx: &mpsc::Receiver<T>, what: &str) -> Result<T, SteamError> {
            loop {
                self.single.run_callbacks();
                match rx.try_recv() {
                    Ok(result) => return Ok(result),
                    Err(mpsc::TryRecvError::Empty) => {
                        std::thread::sleep(Duration::from_millis(50));
                    }
                    Err(mpsc::TryRecvError::Disconnected) => {
                        return Err(SteamError::upload(
                            format!("{} was abandoned by Steam", what),
                            &["Ensure Steam is still running", "Try again later"],
                        ));
                    }
                }
            }
        }
    }

    impl WorkshopClient for SteamworksSession {
        fn create_item(&mut self) -> Result<u64, SteamError> {
            let (tx, rx) = mpsc::channel();
            self.client.ugc().create_item(
                AppId(self.app_id),
                FileType::Community,
                move |result| {
                    let _ = tx.send(result);
                },
            );

            match self.wait_for(&rx, "Workshop item creation")? {
                Ok((file_id, _needs_agreement)) => Ok(file_id.0),
                Err(e) => Err(SteamError::upload(
                    format!("Failed to create Workshop item: {}", e),
                    &[
                        "Ensure you have permission to create Workshop items",
                        "Check that your Steam account is in good standing",
                        "Try again later",
                    ],
                )),
            }
        }

        fn update_item(
            &mut self,
            item_id: u64,
            details: &UpdateDetails,
            on_progress: ProgressSink<'_>,
        ) -> Result<(), SteamError> {
            let ugc = self.client.ugc();
            let mut handle =
                ugc.start_item_update(AppId(self.app_id), PublishedFileId(item_id));

            if let Some(title) = details.title.as_deref() {
                handle = handle.title(title);
            }
            if let Some(description) = details.description.as_deref() {
                handle = handle.description(description);
            }
            if let Some(preview) = details.preview_path.as_deref() {
                handle = handle.preview_path(preview);
            }
            if let Some(content) = details.content_path.as_deref() {
                handle = handle.content_path(content);
            }
            if let Some(visibility) = details.visibility {
                handle = handle.visibility(match visibility {
                    Visibility::Public => PublishedFileVisibility::Public,
                    Visibility::FriendsOnly => PublishedFileVisibility::FriendsOnly,
                    Visibility::Private => PublishedFileVisibility::Private,
                });
            }
            // The native update language is not exposed by this backend;
            // localized updates still carry their text fields.

            let (tx, rx) = mpsc::channel();
            let watch = handle.submit(details.change_note.as_deref(), move |result| {
                let _ = tx.send(result);
            });

            let result = loop {
                self.single.run_callbacks();
                let (_status, processed, total) = watch.progress();
                if total > 0 {
                    on_progress(processed, total);
                }
                match rx.try_recv() {
                    Ok(result) => break result,
                    Err(mpsc::TryRecvError::Empty) => {
                        std::thread::sleep(Duration::from_millis(100));
                    }
                    Err(mpsc::TryRecvError::Disconnected) => {
                        return Err(SteamError::upload(
                            "Workshop update was abandoned by Steam",
                            &["Ensure Steam is still running", "Try again later"],
                        ));
                    }
                }
            };

            match result {
                Ok((_file_id, _needs_agreement)) => Ok(()),
                Err(e) => Err(SteamError::upload(
                    format!("Workshop upload failed: {}", e),
                    &[
                        "Check your internet connection",
                        "Ensure Steam is running and logged in",
                        "Try again later",
                    ],
                )),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_details_default_is_empty() {
        let details = UpdateDetails::default();
        assert!(details.title.is_none());
        assert!(details.description.is_none());
        assert!(details.change_note.is_none());
        assert_eq!(details.visibility, None);
    }

    #[cfg(not(feature = "steamworks-backend"))]
    #[test]
    fn test_connect_without_backend_reports_config_error() {
        let err = connect(480).err().expect("must fail");
        assert!(matches!(err, SteamError::Config { .. }));
        assert!(!err.suggestions().is_empty());
    }
}
