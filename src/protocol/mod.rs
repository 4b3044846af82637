pub mod decode;
pub mod types;

pub use decode::{decode_output, normalize_actions, parse_list_items};
pub use types::{Action, ActionCommand, ListItem, Page, PageBody, PRIMARY_SHORTCUT};
