//! Centralized error type for the ducky CLI
//!
//! Every command-level failure flows through [`CliError`] so that main can
//! render the message and its remediation suggestions uniformly. Library
//! errors keep their own suggestion lists when wrapped.

use ducky_metadata::MetadataError;
use ducky_steam::SteamError;
use thiserror::Error;

/// Errors surfaced by command handlers
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Steam(#[from] SteamError),

    /// Missing credentials, bad server URLs and the like
    #[error("{message}")]
    Config {
        message: String,
        suggestions: Vec<String>,
    },

    /// A failed NuGet CLI invocation, wrapping the child's stderr
    #[error("{message}")]
    NuGet {
        message: String,
        suggestions: Vec<String>,
    },

    /// Validation found problems; findings were already rendered
    #[error("{message}")]
    ValidationFailed { message: String },
}

impl CliError {
    pub fn config(message: impl Into<String>, suggestions: &[&str]) -> Self {
        CliError::Config {
            message: message.into(),
            suggestions: to_owned(suggestions),
        }
    }

    pub fn nuget(message: impl Into<String>, suggestions: &[&str]) -> Self {
        CliError::NuGet {
            message: message.into(),
            suggestions: to_owned(suggestions),
        }
    }

    /// Remediation suggestions attached to this error, if any
    pub fn suggestions(&self) -> &[String] {
        match self {
            CliError::Metadata(e) => e.suggestions(),
            CliError::Steam(e) => e.suggestions(),
            CliError::Config { suggestions, .. } | CliError::NuGet { suggestions, .. } => {
                suggestions
            }
            CliError::ValidationFailed { .. } => &[],
        }
    }
}

fn to_owned(suggestions: &[&str]) -> Vec<String> {
    suggestions.iter().map(|s| (*s).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_metadata_error_keeps_suggestions() {
        let inner = MetadataError::validation("Invalid version format: 1.0", &["Use SemVer 2.0"]);
        let err = CliError::from(inner);
        assert_eq!(err.to_string(), "Invalid version format: 1.0");
        assert_eq!(err.suggestions(), &["Use SemVer 2.0".to_string()]);
    }

    #[test]
    fn test_config_error_display() {
        let err = CliError::config("No NuGet API key configured", &["Set NUGET_API_KEY"]);
        assert_eq!(err.to_string(), "No NuGet API key configured");
        assert_eq!(err.suggestions().len(), 1);
    }
}
