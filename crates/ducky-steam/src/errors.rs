use thiserror::Error;

/// Errors raised by Workshop publishing operations
#[derive(Error, Debug)]
pub enum SteamError {
    /// Steam session or app configuration problems
    #[error("{message}")]
    Config {
        message: String,
        suggestions: Vec<String>,
    },

    /// Authentication / login problems reported by Steam
    #[error("{message}")]
    Auth {
        message: String,
        suggestions: Vec<String>,
    },

    /// A failed item creation or content upload
    #[error("{message}")]
    Upload {
        message: String,
        suggestions: Vec<String>,
    },
}

impl SteamError {
    pub fn config(message: impl Into<String>, suggestions: &[&str]) -> Self {
        SteamError::Config {
            message: message.into(),
            suggestions: to_owned(suggestions),
        }
    }

    pub fn auth(message: impl Into<String>, suggestions: &[&str]) -> Self {
        SteamError::Auth {
            message: message.into(),
            suggestions: to_owned(suggestions),
        }
    }

    pub fn upload(message: impl Into<String>, suggestions: &[&str]) -> Self {
        SteamError::Upload {
            message: message.into(),
            suggestions: to_owned(suggestions),
        }
    }

    pub fn suggestions(&self) -> &[String] {
        match self {
            SteamError::Config { suggestions, .. }
            | SteamError::Auth { suggestions, .. }
            | SteamError::Upload { suggestions, .. } => suggestions,
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
    fn test_upload_error_keeps_suggestions_in_order() {
        let err = SteamError::upload("Workshop upload failed: timeout", &["first", "second"]);
        assert_eq!(err.to_string(), "Workshop upload failed: timeout");
        assert_eq!(err.suggestions(), &["first".to_string(), "second".to_string()]);
    }
}
