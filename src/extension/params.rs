use super::{FormItemKind, Script};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Bool(bool),
}

impl ParamValue {
    pub fn text(value: impl Into<String>) -> Self {
        ParamValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(value) => Some(value),
            ParamValue::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(value) => Some(*value),
            ParamValue::Text(_) => None,
        }
    }

    /// Rendering used when the value is substituted into a command template.
    pub fn to_template_text(&self) -> String {
        match self {
            ParamValue::Text(value) => value.clone(),
            ParamValue::Bool(value) => value.to_string(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamValue::Text(value) => serializer.serialize_str(value),
            ParamValue::Bool(value) => serializer.serialize_bool(*value),
        }
    }
}

struct ParamValueVisitor;

impl<'de> Visitor<'de> for ParamValueVisitor {
    type Value = ParamValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, boolean or number")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<ParamValue, E> {
        Ok(ParamValue::Bool(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<ParamValue, E> {
        Ok(ParamValue::Text(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<ParamValue, E> {
        Ok(ParamValue::Text(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<ParamValue, E> {
        Ok(ParamValue::Text(value.to_string()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<ParamValue, E> {
        Ok(ParamValue::Text(value.to_string()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<ParamValue, E> {
        Ok(ParamValue::Text(value.to_string()))
    }
}

impl<'de> Deserialize<'de> for ParamValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ParamValueVisitor)
    }
}

/// Accumulated name -> value map for one script run. Values can be
/// overwritten but a bound name is never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterBinding(BTreeMap<String, ParamValue>);

impl ParameterBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn merge(&mut self, other: &ParameterBinding) {
        for (name, value) in &other.0 {
            self.0.insert(name.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ParamValue)> for ParameterBinding {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("invalid parameter `{0}`; expected name=value")]
    Malformed(String),
    #[error("parameter `{name}` does not exist in script `{script}`")]
    Unknown { name: String, script: String },
}

/// Parses `name=value` flags against the script's declared form items.
/// Checkbox items bind `true` only for the literal `"true"`.
pub fn parse_cli_params(
    script_name: &str,
    script: &Script,
    raw: &[String],
) -> Result<ParameterBinding, ParamError> {
    let mut binding = ParameterBinding::new();
    for param in raw {
        let Some((name, value)) = param.split_once('=') else {
            return Err(ParamError::Malformed(param.clone()));
        };
        let item = script
            .form_item(name)
            .ok_or_else(|| ParamError::Unknown {
                name: name.to_string(),
                script: script_name.to_string(),
            })?;
        let value = match item.kind {
            FormItemKind::Textfield => ParamValue::Text(value.to_string()),
            FormItemKind::Checkbox => ParamValue::Bool(value == "true"),
        };
        binding.insert(name, value);
    }
    Ok(binding)
}
