use super::{Extension, ExtensionError, ManifestWarning, Script, MANIFEST_FILE_NAME};
use crate::protocol::{normalize_actions, Action, ListItem};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Every installed extension, loaded once at startup and read-only after.
#[derive(Debug, Clone, Default)]
pub struct ExtensionRegistry {
    extensions: BTreeMap<String, Extension>,
    warnings: Vec<ManifestWarning>,
}

impl ExtensionRegistry {
    /// Loads one extension per sub-directory of `root` that holds a
    /// manifest. A missing root is an empty registry.
    pub fn load(root: &Path) -> Result<Self, ExtensionError> {
        if !root.exists() {
            return Ok(Self::default());
        }
        let entries = fs::read_dir(root).map_err(|source| ExtensionError::Read {
            path: root.display().to_string(),
            source,
        })?;

        let mut registry = Self::default();
        for entry in entries {
            let entry = entry.map_err(|source| ExtensionError::Read {
                path: root.display().to_string(),
                source,
            })?;
            let dir = entry.path();
            if !dir.join(MANIFEST_FILE_NAME).is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let (extension, warnings) = Extension::load(&name, &dir)?;
            registry.warnings.extend(warnings);
            registry.extensions.insert(name, extension);
        }
        Ok(registry)
    }

    pub fn from_extensions(extensions: impl IntoIterator<Item = Extension>) -> Self {
        Self {
            extensions: extensions
                .into_iter()
                .map(|extension| (extension.name.clone(), extension))
                .collect(),
            warnings: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Extension> {
        self.extensions.get(name)
    }

    pub fn extension(&self, name: &str) -> Result<&Extension, ExtensionError> {
        self.get(name)
            .ok_or_else(|| ExtensionError::UnknownExtension(name.to_string()))
    }

    pub fn resolve(&self, extension: &str, script: &str) -> Result<(&Extension, &Script), ExtensionError> {
        let extension = self.extension(extension)?;
        let script = extension.script(script)?;
        Ok((extension, script))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Extension> {
        self.extensions.values()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn warnings(&self) -> &[ManifestWarning] {
        &self.warnings
    }

    /// Root items of every extension, in extension name order.
    pub fn root_list_items(&self) -> Vec<ListItem> {
        self.iter().flat_map(root_items_for).collect()
    }

    /// Entries shown when an extension is opened without a script: its root
    /// items, or one entry per script when it declares none.
    pub fn extension_list_items(&self, name: &str) -> Result<Vec<ListItem>, ExtensionError> {
        let extension = self.extension(name)?;
        if !extension.root_items.is_empty() {
            return Ok(root_items_for(extension));
        }
        let mut items = extension
            .scripts
            .iter()
            .map(|(script_name, script)| {
                ListItem::new(script.title.clone())
                    .with_subtitle(extension.name.clone())
                    .with_action(Action::push(
                        "Run",
                        extension.name.clone(),
                        script_name.clone(),
                        Default::default(),
                    ))
            })
            .collect::<Vec<_>>();
        normalize_actions(&mut items, &extension.name);
        Ok(items)
    }
}

fn root_items_for(extension: &Extension) -> Vec<ListItem> {
    let mut items = extension
        .root_items
        .iter()
        .map(|root| {
            let subtitle = if root.subtitle.is_empty() {
                extension.name.clone()
            } else {
                root.subtitle.clone()
            };
            ListItem::new(root.title.clone())
                .with_subtitle(subtitle)
                .with_action(Action::push(
                    "Run",
                    extension.name.clone(),
                    root.script.clone(),
                    root.params.clone(),
                ))
        })
        .collect::<Vec<_>>();
    normalize_actions(&mut items, &extension.name);
    items
}
