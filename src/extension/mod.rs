use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub mod manifest;
pub mod params;
pub mod registry;

pub use manifest::{ExtensionManifest, ManifestWarning};
pub use params::{parse_cli_params, ParamError, ParamValue, ParameterBinding};
pub use registry::ExtensionRegistry;

pub const MANIFEST_FILE_NAME: &str = "sunbeam.yml";

/// Parameter injected into every `generator` invocation with the live query.
pub const QUERY_PARAM: &str = "query";

#[derive(Debug, thiserror::Error)]
pub enum ExtensionError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid yaml in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("extension `{extension}` is invalid: {reason}")]
    Invalid { extension: String, reason: String },
    #[error("extension {0} not found")]
    UnknownExtension(String),
    #[error("page not found: {script} (extension {extension})")]
    UnknownScript { extension: String, script: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Filter,
    Generator,
    Detail,
    Raw,
    Silent,
    Unknown(String),
}

impl Mode {
    pub fn as_str(&self) -> &str {
        match self {
            Mode::Filter => "filter",
            Mode::Generator => "generator",
            Mode::Detail => "detail",
            Mode::Raw => "raw",
            Mode::Silent => "silent",
            Mode::Unknown(other) => other,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Mode::Filter | Mode::Generator)
    }
}

impl From<String> for Mode {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "filter" => Mode::Filter,
            "generator" => Mode::Generator,
            "detail" => Mode::Detail,
            "raw" => Mode::Raw,
            "silent" => Mode::Silent,
            _ => Mode::Unknown(value),
        }
    }
}

impl From<&str> for Mode {
    fn from(value: &str) -> Self {
        Mode::from(value.to_string())
    }
}

impl From<Mode> for String {
    fn from(value: Mode) -> Self {
        value.as_str().to_string()
    }
}

impl Serialize for Mode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Mode::from(String::deserialize(deserializer)?))
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormItemKind {
    Textfield,
    Checkbox,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormItem {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FormItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ParamValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub secure: bool,
}

impl FormItem {
    pub fn textfield(name: impl Into<String>) -> Self {
        Self::new(name, FormItemKind::Textfield)
    }

    pub fn checkbox(name: impl Into<String>) -> Self {
        Self::new(name, FormItemKind::Checkbox)
    }

    fn new(name: impl Into<String>, kind: FormItemKind) -> Self {
        Self {
            name: name.into(),
            kind,
            title: None,
            placeholder: None,
            default: None,
            label: None,
            secure: false,
        }
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    /// Draft value a form starts from: the declared default when it has the
    /// right shape, otherwise empty text or `false`.
    pub fn initial_value(&self) -> ParamValue {
        match (self.kind, &self.default) {
            (FormItemKind::Textfield, Some(ParamValue::Text(value))) => {
                ParamValue::Text(value.clone())
            }
            (FormItemKind::Checkbox, Some(ParamValue::Bool(value))) => ParamValue::Bool(*value),
            (FormItemKind::Checkbox, Some(ParamValue::Text(value))) => {
                ParamValue::Bool(value == "true")
            }
            (FormItemKind::Textfield, _) => ParamValue::Text(String::new()),
            (FormItemKind::Checkbox, _) => ParamValue::Bool(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub title: String,
    pub mode: Mode,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<FormItem>,
}

impl Script {
    pub fn new(title: impl Into<String>, mode: Mode, command: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            mode,
            command: command.into(),
            input: None,
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, item: FormItem) -> Self {
        self.params.push(item);
        self
    }

    pub fn form_item(&self, name: &str) -> Option<&FormItem> {
        self.params.iter().find(|item| item.name == name)
    }

    /// Declared form items that have no binding yet, in declaration order.
    pub fn missing_params(&self, binding: &ParameterBinding) -> Vec<FormItem> {
        self.params
            .iter()
            .filter(|item| !binding.contains(&item.name))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootItem {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub script: String,
    #[serde(default)]
    pub params: ParameterBinding,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub name: String,
    pub dir: PathBuf,
    pub title: String,
    pub description: String,
    pub scripts: BTreeMap<String, Script>,
    pub root_items: Vec<RootItem>,
}

impl Extension {
    pub fn load(name: &str, dir: &Path) -> Result<(Self, Vec<ManifestWarning>), ExtensionError> {
        let manifest = ExtensionManifest::from_path(&dir.join(MANIFEST_FILE_NAME))?;
        Self::from_manifest(name, dir, manifest)
    }

    pub fn from_manifest(
        name: &str,
        dir: &Path,
        manifest: ExtensionManifest,
    ) -> Result<(Self, Vec<ManifestWarning>), ExtensionError> {
        let warnings = manifest.validate(name)?;
        let extension = Self {
            name: name.to_string(),
            dir: dir.to_path_buf(),
            title: manifest.title.unwrap_or_else(|| name.to_string()),
            description: manifest.description.unwrap_or_default(),
            scripts: manifest.scripts,
            root_items: manifest.root_items,
        };
        Ok((extension, warnings))
    }

    pub fn script(&self, name: &str) -> Result<&Script, ExtensionError> {
        self.scripts
            .get(name)
            .ok_or_else(|| ExtensionError::UnknownScript {
                extension: self.name.clone(),
                script: name.to_string(),
            })
    }
}
