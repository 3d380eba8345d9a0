//! Mod metadata model for the ducky CLI
//!
//! Parses and validates the `info.ini` metadata dialect, resolves long-form
//! description content, and renders the .nuspec manifest handed to the
//! packaging CLI.

pub mod artifact;
pub mod collector;
pub mod content;
pub mod errors;
pub mod ini;
pub mod list;
pub mod metadata;
pub mod nuspec;
pub mod validator;

pub use artifact::{check_binary_artifacts, collect_dll_files, ValidationIssue};
pub use collector::{collect_package_files, format_file_size, CollectedFile};
pub use content::{load_description, load_release_notes};
pub use errors::MetadataError;
pub use list::parse_list;
pub use metadata::{
    is_valid_package_id, is_valid_semver, parse_metadata, parse_mod_dir, save_published_file_id,
    ModMetadata,
};
pub use nuspec::generate_nuspec;
pub use validator::{validate_mod, ValidationResult};
