pub mod error;
pub mod paths;

pub use error::ConfigError;
pub use paths::{default_extension_root, default_log_file};

use crate::tui::ViewportOptions;
use std::path::PathBuf;

pub const HEIGHT_VAR: &str = "SUNBEAM_HEIGHT";
pub const WIDTH_VAR: &str = "SUNBEAM_WIDTH";
pub const PADDING_VAR: &str = "SUNBEAM_PADDING";
pub const EXTENSION_ROOT_VAR: &str = "SUNBEAM_EXTENSION_ROOT";
pub const LOG_FILE_VAR: &str = "SUNBEAM_LOG_FILE";

/// Launcher settings read once from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    pub max_width: u16,
    pub max_height: u16,
    pub padding: u16,
    pub extension_root: PathBuf,
    pub log_file: PathBuf,
}

impl LauncherConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable lookup. Empty values
    /// count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let extension_root = match lookup(EXTENSION_ROOT_VAR).filter(|value| !value.is_empty()) {
            Some(root) => PathBuf::from(root),
            None => default_extension_root(&lookup)?,
        };
        let log_file = match lookup(LOG_FILE_VAR).filter(|value| !value.is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_log_file(&lookup)?,
        };
        Ok(Self {
            max_width: lookup_number(&lookup, WIDTH_VAR)?,
            max_height: lookup_number(&lookup, HEIGHT_VAR)?,
            padding: lookup_number(&lookup, PADDING_VAR)?,
            extension_root,
            log_file,
        })
    }

    pub fn viewport(&self) -> ViewportOptions {
        ViewportOptions {
            max_width: self.max_width,
            max_height: self.max_height,
            padding: self.padding,
        }
    }
}

fn lookup_number(
    lookup: &impl Fn(&str) -> Option<String>,
    variable: &str,
) -> Result<u16, ConfigError> {
    let Some(raw) = lookup(variable) else {
        return Ok(0);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<u16>()
        .map_err(|_| ConfigError::InvalidNumber {
            variable: variable.to_string(),
            value: raw.clone(),
        })
}
