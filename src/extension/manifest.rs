use super::{ExtensionError, Mode, RootItem, Script, QUERY_PARAM};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExtensionManifest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "rootItems", alias = "root_items")]
    pub root_items: Vec<RootItem>,
    #[serde(default)]
    pub scripts: BTreeMap<String, Script>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestWarning {
    pub extension: String,
    pub script: String,
    pub message: String,
}

impl std::fmt::Display for ManifestWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}: {}", self.extension, self.script, self.message)
    }
}

impl ExtensionManifest {
    pub fn from_path(path: &Path) -> Result<Self, ExtensionError> {
        let raw = fs::read_to_string(path).map_err(|source| ExtensionError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&raw, &path.display().to_string())
    }

    pub fn parse(raw: &str, origin: &str) -> Result<Self, ExtensionError> {
        serde_yaml::from_str(raw).map_err(|source| ExtensionError::Parse {
            path: origin.to_string(),
            source,
        })
    }

    /// Rejects manifests the launcher cannot run; returns the non-fatal
    /// findings for the caller to log.
    pub fn validate(&self, extension: &str) -> Result<Vec<ManifestWarning>, ExtensionError> {
        let invalid = |reason: String| ExtensionError::Invalid {
            extension: extension.to_string(),
            reason,
        };
        let mut warnings = Vec::new();

        for (name, script) in &self.scripts {
            if script.command.trim().is_empty() {
                return Err(invalid(format!("script `{name}` has an empty command")));
            }
            match shlex::split(&script.command) {
                Some(tokens) if !tokens.is_empty() => {}
                _ => {
                    return Err(invalid(format!(
                        "script `{name}` command `{}` cannot be tokenized",
                        script.command
                    )))
                }
            }

            let mut seen = HashSet::new();
            for item in &script.params {
                if item.name.trim().is_empty() {
                    return Err(invalid(format!("script `{name}` declares an unnamed param")));
                }
                if !seen.insert(item.name.as_str()) {
                    return Err(invalid(format!(
                        "script `{name}` declares param `{}` more than once",
                        item.name
                    )));
                }
            }

            if script.mode == Mode::Generator && script.form_item(QUERY_PARAM).is_some() {
                warnings.push(ManifestWarning {
                    extension: extension.to_string(),
                    script: name.clone(),
                    message: format!(
                        "param `{QUERY_PARAM}` is reserved for generator scripts and will be overridden by the live query"
                    ),
                });
            }
        }

        for item in &self.root_items {
            if !self.scripts.contains_key(&item.script) {
                return Err(invalid(format!(
                    "root item `{}` references unknown script `{}`",
                    item.title, item.script
                )));
            }
        }

        Ok(warnings)
    }
}
