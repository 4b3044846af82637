use crate::extension::ParameterBinding;
use serde::{Deserialize, Serialize};

/// Shortcut bound to the first action of every list item.
pub const PRIMARY_SHORTCUT: &str = "enter";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accessories: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
}

impl ListItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: String::new(),
            accessories: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn primary_action(&self) -> Option<&Action> {
        self.actions.first()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub title: String,
    #[serde(default, alias = "key", skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub extension: String,
    #[serde(flatten)]
    pub command: ActionCommand,
}

impl Action {
    pub fn new(title: impl Into<String>, command: ActionCommand) -> Self {
        Self {
            title: title.into(),
            shortcut: None,
            extension: String::new(),
            command,
        }
    }

    pub fn copy(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(
            title,
            ActionCommand::Copy {
                content: content.into(),
            },
        )
    }

    pub fn push(
        title: impl Into<String>,
        extension: impl Into<String>,
        script: impl Into<String>,
        params: ParameterBinding,
    ) -> Self {
        let mut action = Self::new(
            title,
            ActionCommand::Push {
                script: script.into(),
                params,
            },
        );
        action.extension = extension.into();
        action
    }

    pub fn with_shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ActionCommand {
    Copy {
        #[serde(alias = "text")]
        content: String,
    },
    Open {
        #[serde(alias = "target")]
        url: String,
        #[serde(default, alias = "app", skip_serializing_if = "Option::is_none")]
        application: Option<String>,
    },
    Push {
        script: String,
        #[serde(default, skip_serializing_if = "ParameterBinding::is_empty")]
        params: ParameterBinding,
    },
    Reload {
        #[serde(default, skip_serializing_if = "ParameterBinding::is_empty")]
        params: ParameterBinding,
    },
    Exec {
        command: String,
        #[serde(default)]
        silent: bool,
    },
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PageBody {
    List { items: Vec<ListItem> },
    Detail { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub title: String,
    #[serde(flatten)]
    pub body: PageBody,
}

impl Page {
    pub fn list(title: impl Into<String>, items: Vec<ListItem>) -> Self {
        Self {
            title: title.into(),
            body: PageBody::List { items },
        }
    }

    pub fn detail(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: PageBody::Detail { text: text.into() },
        }
    }

    pub fn items(&self) -> Option<&[ListItem]> {
        match &self.body {
            PageBody::List { items } => Some(items),
            PageBody::Detail { .. } => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.body {
            PageBody::Detail { text } => Some(text),
            PageBody::List { .. } => None,
        }
    }
}
