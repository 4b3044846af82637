use crate::extension::{Mode, ParameterBinding, Script, QUERY_PARAM};
use crate::shared::PageError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Fully bound process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub input: Option<String>,
}

impl Invocation {
    /// `sh -c <command>`, used for exec actions.
    pub fn shell(command: &str, cwd: Option<PathBuf>) -> Self {
        Self {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), command.to_string()],
            cwd,
            input: None,
        }
    }

    pub fn command_form(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(quote_for_display)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn quote_for_display(token: &str) -> String {
    shlex::try_quote(token)
        .map(|quoted| quoted.into_owned())
        .unwrap_or_else(|_| token.to_string())
}

pub fn build_invocation(
    script_name: &str,
    script: &Script,
    binding: &ParameterBinding,
    cwd: &Path,
) -> Result<Invocation, PageError> {
    let mut values = BTreeMap::new();
    for item in &script.params {
        let value = binding
            .get(&item.name)
            .ok_or_else(|| PageError::MissingParameter {
                script: script_name.to_string(),
                name: item.name.clone(),
            })?;
        values.insert(item.name.as_str(), value.to_template_text());
    }
    if script.mode == Mode::Generator {
        let query = binding
            .get(QUERY_PARAM)
            .map(|value| value.to_template_text())
            .unwrap_or_default();
        values.insert(QUERY_PARAM, query);
    }

    let tokens =
        shlex::split(&compact_placeholders(&script.command)).ok_or_else(|| PageError::Spawn {
            program: script.command.clone(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "command template cannot be tokenized",
            ),
        })?;
    let mut tokens = tokens
        .iter()
        .map(|token| render_template(token, &values))
        .collect::<Vec<_>>()
        .into_iter();
    let program = tokens.next().ok_or_else(|| PageError::Spawn {
        program: script.command.clone(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
    })?;

    Ok(Invocation {
        program: resolve_program(&program, cwd),
        args: tokens.collect(),
        cwd: Some(cwd.to_path_buf()),
        input: script
            .input
            .as_ref()
            .map(|template| render_template(template, &values)),
    })
}

/// Replaces every `{{ name }}` whose name has a value; other placeholders
/// are left untouched.
pub fn render_template(template: &str, values: &BTreeMap<&str, String>) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            break;
        };
        rendered.push_str(&rest[..start]);
        let name = after_open[..end].trim();
        match values.get(name) {
            Some(value) => rendered.push_str(value),
            None => rendered.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after_open[end + 2..];
    }
    rendered.push_str(rest);
    rendered
}

/// Strips the whitespace inside `{{ ... }}` so a placeholder stays in one
/// shell token.
pub fn compact_placeholders(template: &str) -> String {
    let mut compacted = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            break;
        };
        compacted.push_str(&rest[..start]);
        compacted.push_str("{{");
        compacted.push_str(after_open[..end].trim());
        compacted.push_str("}}");
        rest = &after_open[end + 2..];
    }
    compacted.push_str(rest);
    compacted
}

fn resolve_program(program: &str, cwd: &Path) -> String {
    let path = Path::new(program);
    if path.is_relative() && program.contains('/') {
        cwd.join(path).display().to_string()
    } else {
        program.to_string()
    }
}
