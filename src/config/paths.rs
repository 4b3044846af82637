use crate::config::ConfigError;
use std::path::PathBuf;

pub const APP_DIR_NAME: &str = "sunbeam";
pub const EXTENSIONS_DIR_NAME: &str = "extensions";
pub const LOG_FILE_NAME: &str = "sunbeam.log";

fn xdg_dir(
    lookup: &impl Fn(&str) -> Option<String>,
    variable: &str,
    home_fallback: &[&str],
    purpose: &'static str,
) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = lookup(variable).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = lookup("HOME")
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::HomeDirectoryUnavailable { purpose })?;
    Ok(home_fallback
        .iter()
        .fold(PathBuf::from(home), |path, part| path.join(part)))
}

/// `$XDG_DATA_HOME/sunbeam/extensions`, or the same under
/// `~/.local/share`.
pub fn default_extension_root(
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<PathBuf, ConfigError> {
    Ok(
        xdg_dir(lookup, "XDG_DATA_HOME", &[".local", "share"], "extension root")?
            .join(APP_DIR_NAME)
            .join(EXTENSIONS_DIR_NAME),
    )
}

/// `$XDG_STATE_HOME/sunbeam/sunbeam.log`, or the same under
/// `~/.local/state`.
pub fn default_log_file(lookup: &impl Fn(&str) -> Option<String>) -> Result<PathBuf, ConfigError> {
    Ok(
        xdg_dir(lookup, "XDG_STATE_HOME", &[".local", "state"], "log file")?
            .join(APP_DIR_NAME)
            .join(LOG_FILE_NAME),
    )
}
