use super::intent::ViewIntent;
use super::keys::typed_char;
use super::viewport::PageSize;
use crate::extension::{FormItem, FormItemKind, ParamValue, ParameterBinding};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

const FORM_HINT_TEXT: &str = "Tab/Up/Down move | Space toggle | Enter next/submit | Ctrl+S submit | Esc back";

/// Prompts for a fixed set of parameters and hands back the completed
/// binding on submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    title: String,
    items: Vec<FormItem>,
    values: Vec<ParamValue>,
    active: usize,
    status: Option<String>,
    size: PageSize,
}

impl FormView {
    pub fn new(title: impl Into<String>, items: Vec<FormItem>) -> Self {
        let values = items.iter().map(FormItem::initial_value).collect();
        Self {
            title: title.into(),
            items,
            values,
            active: 0,
            status: None,
            size: PageSize::default(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[FormItem] {
        &self.items
    }

    pub fn values(&self) -> &[ParamValue] {
        &self.values
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn size(&self) -> PageSize {
        self.size
    }

    pub fn set_size(&mut self, size: PageSize) {
        self.size = size;
    }

    fn focus(&mut self, forward: bool) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        self.active = if forward {
            (self.active + 1) % len
        } else {
            (self.active + len - 1) % len
        };
    }

    /// Completed binding, or `None` with a status message when a text
    /// field is still empty.
    pub fn try_submit(&mut self) -> Option<ViewIntent> {
        let empty = self.items.iter().zip(&self.values).position(|(item, value)| {
            item.kind == FormItemKind::Textfield && value.as_text().is_some_and(str::is_empty)
        });
        if let Some(index) = empty {
            self.active = index;
            self.status = Some(format!("{} is required", self.items[index].display_title()));
            return None;
        }
        self.status = None;
        let binding = self
            .items
            .iter()
            .zip(&self.values)
            .map(|(item, value)| (item.name.clone(), value.clone()))
            .collect::<ParameterBinding>();
        Some(ViewIntent::Submit(binding))
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> Option<ViewIntent> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            return self.try_submit();
        }
        match key.code {
            KeyCode::Esc => return Some(ViewIntent::Pop),
            KeyCode::Tab | KeyCode::Down => {
                self.focus(true);
                return None;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus(false);
                return None;
            }
            KeyCode::Enter => {
                if self.active + 1 >= self.items.len() {
                    return self.try_submit();
                }
                self.focus(true);
                return None;
            }
            _ => {}
        }

        let kind = self.items.get(self.active)?.kind;
        let value = self.values.get_mut(self.active)?;
        match (kind, value, key.code) {
            (FormItemKind::Checkbox, ParamValue::Bool(checked), KeyCode::Char(' ')) => {
                *checked = !*checked;
            }
            (FormItemKind::Textfield, ParamValue::Text(text), KeyCode::Backspace) => {
                text.pop();
            }
            (FormItemKind::Textfield, ParamValue::Text(text), _) => {
                if let Some(c) = typed_char(key) {
                    text.push(c);
                    self.status = None;
                }
            }
            _ => {}
        }
        None
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let mut constraints = vec![Constraint::Length(2)];
        constraints.extend(self.items.iter().map(|_| Constraint::Length(1)));
        constraints.push(Constraint::Min(0));
        constraints.push(Constraint::Length(1));
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        frame.render_widget(
            Paragraph::new(self.title.as_str()).style(Style::default().add_modifier(Modifier::BOLD)),
            rows[0],
        );
        for (index, (item, value)) in self.items.iter().zip(&self.values).enumerate() {
            let active = index == self.active;
            let label_style = if active {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let line = Line::from(vec![
                Span::styled(format!("{:>16} ", item.display_title()), label_style),
                Span::raw(field_text(item, value)),
            ]);
            frame.render_widget(Paragraph::new(line), rows[index + 1]);
        }

        let (status, style) = match &self.status {
            Some(status) => (status.as_str(), Style::default().fg(Color::Red)),
            None => (FORM_HINT_TEXT, Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(Paragraph::new(status).style(style), rows[rows.len() - 1]);
    }
}

fn field_text(item: &FormItem, value: &ParamValue) -> String {
    match value {
        ParamValue::Bool(checked) => {
            let mark = if *checked { "[x]" } else { "[ ]" };
            match &item.label {
                Some(label) => format!("{mark} {label}"),
                None => mark.to_string(),
            }
        }
        ParamValue::Text(text) if text.is_empty() => item.placeholder.clone().unwrap_or_default(),
        ParamValue::Text(text) if item.secure => "*".repeat(text.chars().count()),
        ParamValue::Text(text) => text.clone(),
    }
}
