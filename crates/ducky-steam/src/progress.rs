//! Upload progress model
//!
//! The upload worker reports its phases and byte progress to the parent
//! process as line-delimited JSON on stdout; these are the event types on
//! that wire.

use serde::{Deserialize, Serialize};

/// Phase of a Workshop upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Pending,
    Preparing,
    RequestingId,
    WritingIni,
    StartingSteamUpload,
    UploadingContent,
    UploadingTranslations,
    Completed,
    Failed,
}

impl UploadStatus {
    pub fn name(self) -> &'static str {
        match self {
            UploadStatus::Pending => "Pending",
            UploadStatus::Preparing => "Preparing",
            UploadStatus::RequestingId => "RequestingId",
            UploadStatus::WritingIni => "WritingIni",
            UploadStatus::StartingSteamUpload => "StartingSteamUpload",
            UploadStatus::UploadingContent => "UploadingContent",
            UploadStatus::UploadingTranslations => "UploadingTranslations",
            UploadStatus::Completed => "Completed",
            UploadStatus::Failed => "Failed",
        }
    }
}

/// One event on the worker's stdout stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UploadEvent {
    Status {
        status: UploadStatus,
        message: String,
    },
    Progress {
        bytes_processed: u64,
        bytes_total: u64,
    },
    /// A new Workshop item was created; its identity is already persisted
    Created {
        published_file_id: u64,
    },
    Completed {
        message: String,
    },
    Failed {
        message: String,
        suggestions: Vec<String>,
    },
}

/// Percentage helper for progress display
pub fn percent(bytes_processed: u64, bytes_total: u64) -> f64 {
    if bytes_total == 0 {
        0.0
    } else {
        (bytes_processed as f64 / bytes_total as f64) * 100.0
    }
}
