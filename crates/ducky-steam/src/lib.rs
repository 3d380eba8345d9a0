//! Steam Workshop publishing support for the ducky CLI
//!
//! Converts Markdown mod descriptions to Steam BBCode, resolves localized
//! content per Steam language, validates Workshop directories, and defines
//! the upload contract the supervised worker runs against.

pub mod bbcode;
pub mod config;
pub mod errors;
pub mod language;
pub mod localized;
pub mod progress;
pub mod validator;
pub mod workshop;

pub use bbcode::{extract_title, markdown_to_bbcode};
pub use config::{steam_app_id, DEFAULT_STEAM_APP_ID};
pub use errors::SteamError;
pub use language::{primary_language_content, steam_language};
pub use localized::{load_descriptions, load_titles, LocalizedDescription, LocalizedTitle};
pub use progress::{percent, UploadEvent, UploadStatus};
pub use validator::validate_workshop_dir;
pub use workshop::{connect, UpdateDetails, Visibility, WorkshopClient};
