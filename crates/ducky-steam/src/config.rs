//! Steam application configuration
//!
//! The app id is fixed for this tool and can only be overridden through an
//! environment variable; it is deliberately not an `info.ini` field.

use std::env;

use crate::errors::SteamError;

/// Workshop uploads target this app unless STEAM_APP_ID overrides it
pub const DEFAULT_STEAM_APP_ID: u32 = 3_167_020;

/// Environment variable that overrides the app id
pub const STEAM_APP_ID_VAR: &str = "STEAM_APP_ID";

/// Resolve the Steam app id from the environment or the default
pub fn steam_app_id() -> Result<u32, SteamError> {
    match env::var(STEAM_APP_ID_VAR) {
        Ok(value) => value.trim().parse::<u32>().map_err(|_| {
            SteamError::config(
                format!("Invalid {} environment variable: {}", STEAM_APP_ID_VAR, value),
                &[
                    "Set STEAM_APP_ID to a numeric Steam application id",
                    "Unset STEAM_APP_ID to use the default app id",
                ],
            )
        }),
        Err(_) => Ok(DEFAULT_STEAM_APP_ID),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment mutation: these tests set and restore the variable and
    // must not run concurrently with each other, so they share one test.
    #[test]
    fn test_app_id_resolution() {
        let original = env::var(STEAM_APP_ID_VAR).ok();

        env::remove_var(STEAM_APP_ID_VAR);
        assert_eq!(steam_app_id().expect("default"), DEFAULT_STEAM_APP_ID);

        env::set_var(STEAM_APP_ID_VAR, "480");
        assert_eq!(steam_app_id().expect("override"), 480);

        env::set_var(STEAM_APP_ID_VAR, "not-a-number");
        assert!(steam_app_id().is_err());

        match original {
            Some(value) => env::set_var(STEAM_APP_ID_VAR, value),
            None => env::remove_var(STEAM_APP_ID_VAR),
        }
    }
}
