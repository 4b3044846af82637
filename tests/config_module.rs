use std::collections::BTreeMap;
use std::path::PathBuf;
use sunbeam::config::{ConfigError, LauncherConfig};
use sunbeam::tui::ViewportOptions;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect::<BTreeMap<_, _>>();
    move |name| vars.get(name).cloned()
}

#[test]
fn config_module_defaults_follow_xdg_home_fallbacks() {
    let config = LauncherConfig::from_lookup(lookup(&[("HOME", "/home/ada")])).expect("config");
    assert_eq!(
        config.extension_root,
        PathBuf::from("/home/ada/.local/share/sunbeam/extensions")
    );
    assert_eq!(
        config.log_file,
        PathBuf::from("/home/ada/.local/state/sunbeam/sunbeam.log")
    );
    assert_eq!(config.viewport(), ViewportOptions::default());
}

#[test]
fn config_module_explicit_variables_win() {
    let config = LauncherConfig::from_lookup(lookup(&[
        ("XDG_DATA_HOME", "/data"),
        ("XDG_STATE_HOME", "/state"),
        ("SUNBEAM_HEIGHT", "20"),
        ("SUNBEAM_PADDING", " 2 "),
        ("SUNBEAM_WIDTH", ""),
        ("SUNBEAM_LOG_FILE", "/tmp/sunbeam.log"),
    ]))
    .expect("config");
    assert_eq!(config.extension_root, PathBuf::from("/data/sunbeam/extensions"));
    assert_eq!(config.log_file, PathBuf::from("/tmp/sunbeam.log"));
    assert_eq!(
        config.viewport(),
        ViewportOptions {
            max_width: 0,
            max_height: 20,
            padding: 2,
        }
    );

    let config = LauncherConfig::from_lookup(lookup(&[("SUNBEAM_EXTENSION_ROOT", "/opt/ext"), ("SUNBEAM_LOG_FILE", "/l")]))
        .expect("config without home");
    assert_eq!(config.extension_root, PathBuf::from("/opt/ext"));
}

#[test]
fn config_module_rejects_negative_numbers() {
    let err = LauncherConfig::from_lookup(lookup(&[("HOME", "/h"), ("SUNBEAM_HEIGHT", "-1")]))
        .expect_err("invalid");
    assert_eq!(
        err,
        ConfigError::InvalidNumber {
            variable: "SUNBEAM_HEIGHT".to_string(),
            value: "-1".to_string(),
        }
    );
}

#[test]
fn config_module_missing_home_is_an_error() {
    let err = LauncherConfig::from_lookup(lookup(&[])).expect_err("no home");
    assert!(matches!(err, ConfigError::HomeDirectoryUnavailable { .. }));
}
