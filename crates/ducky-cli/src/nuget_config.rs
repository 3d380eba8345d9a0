//! NuGet server and credential resolution
//!
//! Precedence for every setting: CLI flag, then environment variable, then
//! the built-in default. Each variable is looked up under the `DUCKY_`
//! prefix first so ducky-specific values can coexist with a machine-wide
//! NuGet setup.

use std::env;

use crate::errors::CliError;

/// Fallback package server when neither flag nor environment names one
pub const DEFAULT_NUGET_SERVER: &str = "https://api.nuget.org/v3/index.json";

pub const NUGET_SERVER_VAR: &str = "NUGET_SERVER";
pub const NUGET_API_KEY_VAR: &str = "NUGET_API_KEY";
pub const NUGET_VERBOSE_VAR: &str = "NUGET_VERBOSE";

/// Resolved NuGet settings for one push operation
#[derive(Debug, Clone)]
pub struct NuGetConfig {
    pub server: String,
    pub api_key: Option<String>,
    /// Pass full verbosity to the NuGet CLI
    pub verbose: bool,
}

impl NuGetConfig {
    /// Resolve the configuration from flags and the environment
    pub fn resolve(
        server_flag: Option<&str>,
        api_key_flag: Option<&str>,
    ) -> Result<Self, CliError> {
        let server = server_flag
            .map(str::to_string)
            .or_else(|| env_lookup(NUGET_SERVER_VAR))
            .unwrap_or_else(|| DEFAULT_NUGET_SERVER.to_string());

        if !server.starts_with("http://") && !server.starts_with("https://") {
            return Err(CliError::config(
                format!("Invalid NuGet server URL: {}", server),
                &[
                    "Server URLs must start with http:// or https://",
                    "Example: https://api.nuget.org/v3/index.json",
                ],
            ));
        }

        let api_key = api_key_flag
            .map(str::to_string)
            .or_else(|| env_lookup(NUGET_API_KEY_VAR));

        let verbose = env_lookup(NUGET_VERBOSE_VAR)
            .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
            .unwrap_or(false);

        Ok(NuGetConfig {
            server,
            api_key,
            verbose,
        })
    }

    /// The API key, or a config error telling the user how to supply one
    pub fn require_api_key(&self) -> Result<&str, CliError> {
        self.api_key.as_deref().ok_or_else(|| {
            CliError::config(
                "No NuGet API key configured",
                &[
                    "Pass the key with --api-key <KEY>",
                    "Or set the NUGET_API_KEY environment variable",
                    "Keys for nuget.org are created at https://www.nuget.org/account/apikeys",
                ],
            )
        })
    }
}

/// Look up `DUCKY_<name>`, then `<name>`; empty values count as unset
fn env_lookup(name: &str) -> Option<String> {
    for candidate in [format!("DUCKY_{name}"), name.to_string()] {
        if let Ok(value) = env::var(&candidate) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}
