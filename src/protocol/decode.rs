use super::{ListItem, Page, PRIMARY_SHORTCUT};
use crate::extension::Mode;
use crate::shared::PageError;

/// Turns the captured stdout of a script into a page. Pure: the same mode
/// and bytes always decode to the same page.
pub fn decode_output(
    mode: &Mode,
    extension: &str,
    title: &str,
    output: &[u8],
) -> Result<Page, PageError> {
    match mode {
        Mode::Filter | Mode::Generator => {
            let raw = std::str::from_utf8(output)
                .map_err(|err| PageError::protocol(format!("output is not utf-8: {err}")))?;
            let items = parse_list_items(raw, extension)?;
            Ok(Page::list(title, items))
        }
        Mode::Detail | Mode::Raw => Ok(Page::detail(
            title,
            String::from_utf8_lossy(output).into_owned(),
        )),
        Mode::Silent | Mode::Unknown(_) => Err(PageError::UnknownMode(mode.as_str().to_string())),
    }
}

pub fn parse_list_items(raw: &str, extension: &str) -> Result<Vec<ListItem>, PageError> {
    let mut items: Vec<ListItem> = serde_json::from_str(raw)
        .map_err(|err| PageError::protocol(format!("expected a json array of items: {err}")))?;
    normalize_actions(&mut items, extension);
    Ok(items)
}

/// Defaults empty action extensions to the owning extension and binds the
/// first action of each item to the primary shortcut.
pub fn normalize_actions(items: &mut [ListItem], extension: &str) {
    for item in items {
        for (index, action) in item.actions.iter_mut().enumerate() {
            if index == 0 {
                action.shortcut = Some(PRIMARY_SHORTCUT.to_string());
            }
            if action.extension.is_empty() {
                action.extension = extension.to_string();
            }
        }
    }
}
