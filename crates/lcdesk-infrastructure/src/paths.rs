//! Well-known file locations under the LCDesk home directory.

use lcdesk_core::error::{Error, Result};
use std::path::PathBuf;

/// Resolves the LCDesk home directory.
///
/// `LCDESK_HOME` wins when set; otherwise `~/.lcdesk`.
pub fn desk_home() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("LCDESK_HOME") {
        return Ok(PathBuf::from(home));
    }
    dirs::home_dir()
        .map(|home| home.join(".lcdesk"))
        .ok_or_else(|| Error::config("could not determine the home directory"))
}

/// Path of the configuration file.
pub fn config_file() -> Result<PathBuf> {
    Ok(desk_home()?.join("config.toml"))
}

/// Path of the session snapshot state file.
pub fn state_file() -> Result<PathBuf> {
    Ok(desk_home()?.join("state.toml"))
}
