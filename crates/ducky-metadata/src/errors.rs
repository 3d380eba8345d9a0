use thiserror::Error;

/// Errors that can occur while reading or validating mod metadata
///
/// Both variants carry ordered remediation suggestions that the CLI
/// renders under the error message. Suggestions are advice for the mod
/// author, not diagnostics.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("{message}")]
    Validation {
        message: String,
        suggestions: Vec<String>,
    },

    #[error("{message}")]
    FileSystem {
        message: String,
        suggestions: Vec<String>,
    },
}

impl MetadataError {
    pub fn validation(message: impl Into<String>, suggestions: &[&str]) -> Self {
        MetadataError::Validation {
            message: message.into(),
            suggestions: suggestions.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    pub fn filesystem(message: impl Into<String>, suggestions: &[&str]) -> Self {
        MetadataError::FileSystem {
            message: message.into(),
            suggestions: suggestions.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Remediation suggestions attached to this error
    pub fn suggestions(&self) -> &[String] {
        match self {
            MetadataError::Validation { suggestions, .. }
            | MetadataError::FileSystem { suggestions, .. } => suggestions,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, MetadataError::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = MetadataError::validation("Invalid version format: 1.0", &["Use SemVer 2.0"]);
        assert_eq!(err.to_string(), "Invalid version format: 1.0");
        assert_eq!(err.suggestions(), &["Use SemVer 2.0".to_string()]);
        assert!(err.is_validation());
    }

    #[test]
    fn test_filesystem_error_display() {
        let err = MetadataError::filesystem("info.ini not found in /tmp/mod", &[]);
        assert_eq!(err.to_string(), "info.ini not found in /tmp/mod");
        assert!(err.suggestions().is_empty());
        assert!(!err.is_validation());
    }
}
