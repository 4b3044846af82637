use super::intent::ViewIntent;
use super::keys::{typed_char, Shortcut};
use super::viewport::PageSize;
use crate::protocol::ListItem;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem as ListRow, ListState, Paragraph};
use ratatui::Frame;

const LOADING_MARKER: &str = "...";

/// List page. Static lists filter locally; dynamic lists report every
/// query change to their owner instead and show items as delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    title: String,
    items: Vec<ListItem>,
    visible: Vec<usize>,
    query: String,
    cursor: usize,
    dynamic: bool,
    loading: bool,
    size: PageSize,
}

impl ListView {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
            visible: Vec::new(),
            query: String::new(),
            cursor: 0,
            dynamic: false,
            loading: false,
            size: PageSize::default(),
        }
    }

    pub fn dynamic(title: impl Into<String>) -> Self {
        Self {
            dynamic: true,
            ..Self::new(title)
        }
    }

    pub fn with_items(mut self, items: Vec<ListItem>) -> Self {
        self.set_items(items);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn size(&self) -> PageSize {
        self.size
    }

    pub fn set_size(&mut self, size: PageSize) {
        self.size = size;
    }

    /// Replaces the item set, keeping the query and clamping the cursor so
    /// a reload does not throw away the user's position.
    pub fn set_items(&mut self, items: Vec<ListItem>) {
        self.items = items;
        self.refilter();
        self.cursor = self.cursor.min(self.visible.len().saturating_sub(1));
    }

    pub fn visible_items(&self) -> impl Iterator<Item = &ListItem> {
        self.visible.iter().filter_map(|index| self.items.get(*index))
    }

    pub fn selected_item(&self) -> Option<&ListItem> {
        self.visible
            .get(self.cursor)
            .and_then(|index| self.items.get(*index))
    }

    fn refilter(&mut self) {
        if self.dynamic || self.query.is_empty() {
            self.visible = (0..self.items.len()).collect();
            return;
        }
        let needle = self.query.to_lowercase();
        self.visible = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                item.title.to_lowercase().contains(&needle)
                    || item.subtitle.to_lowercase().contains(&needle)
            })
            .map(|(index, _)| index)
            .collect();
    }

    fn move_cursor(&mut self, down: bool) {
        let len = self.visible.len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = if down {
            (self.cursor + 1) % len
        } else {
            (self.cursor + len - 1) % len
        };
    }

    fn query_changed(&mut self) -> Option<ViewIntent> {
        self.cursor = 0;
        if self.dynamic {
            return Some(ViewIntent::QueryChanged(self.query.clone()));
        }
        self.refilter();
        None
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> Option<ViewIntent> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Some(ViewIntent::Pop),
            KeyCode::Up => {
                self.move_cursor(false);
                return None;
            }
            KeyCode::Down => {
                self.move_cursor(true);
                return None;
            }
            KeyCode::Char('p') | KeyCode::Char('k') if ctrl => {
                self.move_cursor(false);
                return None;
            }
            KeyCode::Char('n') | KeyCode::Char('j') if ctrl => {
                self.move_cursor(true);
                return None;
            }
            KeyCode::Backspace => {
                self.query.pop()?;
                return self.query_changed();
            }
            _ => {}
        }

        if let Some(c) = typed_char(key) {
            self.query.push(c);
            return self.query_changed();
        }

        let item = self.selected_item()?;
        let matched = item.actions.iter().find(|action| {
            action
                .shortcut
                .as_deref()
                .and_then(Shortcut::parse)
                .is_some_and(|shortcut| shortcut.matches(key))
        });
        let action = match matched {
            Some(action) => action,
            None if key.code == KeyCode::Enter && key.modifiers.is_empty() => {
                item.primary_action()?
            }
            None => return None,
        };
        Some(ViewIntent::Activate(action.clone()))
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        let marker = if self.loading { LOADING_MARKER } else { "" };
        let header = Line::from(vec![
            Span::styled(
                format!("{} ", self.title),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("> {}", self.query)),
            Span::styled(format!(" {marker}"), Style::default().fg(Color::Magenta)),
        ]);
        frame.render_widget(Paragraph::new(header), sections[0]);
        frame.render_widget(
            Paragraph::new("─".repeat(usize::from(area.width))),
            sections[1],
        );

        let rows = self
            .visible_items()
            .map(|item| row_line(item, area.width))
            .map(ListRow::new)
            .collect::<Vec<_>>();
        let list = List::new(rows).highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
        let mut state = ListState::default();
        if !self.visible.is_empty() {
            state.select(Some(self.cursor));
        }
        frame.render_stateful_widget(list, sections[2], &mut state);

        frame.render_widget(
            Paragraph::new(self.footer()).style(Style::default().fg(Color::DarkGray)),
            sections[3],
        );
    }

    fn footer(&self) -> String {
        let Some(item) = self.selected_item() else {
            return format!("{} items", self.visible.len());
        };
        item.actions
            .iter()
            .map(|action| match &action.shortcut {
                Some(shortcut) => format!("{} ({shortcut})", action.title),
                None => action.title.clone(),
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

fn row_line(item: &ListItem, width: u16) -> Line<'static> {
    let mut spans = vec![Span::raw(item.title.clone())];
    let mut used = item.title.chars().count();
    if !item.subtitle.is_empty() {
        spans.push(Span::styled(
            format!(" {}", item.subtitle),
            Style::default().fg(Color::DarkGray),
        ));
        used += item.subtitle.chars().count() + 1;
    }
    if !item.accessories.is_empty() {
        let accessories = item.accessories.join("  ");
        let gap = usize::from(width)
            .saturating_sub(used + accessories.chars().count())
            .max(1);
        spans.push(Span::raw(" ".repeat(gap)));
        spans.push(Span::styled(accessories, Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
}
