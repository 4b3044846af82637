use super::intent::ViewIntent;
use super::viewport::PageSize;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    title: String,
    text: String,
    scroll: u16,
    is_error: bool,
    size: PageSize,
}

impl DetailView {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            scroll: 0,
            is_error: false,
            size: PageSize::default(),
        }
    }

    /// Terminal page showing a failure. Only pop is available from it.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::new("Error", message)
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn size(&self) -> PageSize {
        self.size
    }

    pub fn set_size(&mut self, size: PageSize) {
        self.size = size;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replaces the body wholesale. The scroll offset survives unless the
    /// new text is shorter.
    pub fn set_content(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.scroll = self.scroll.min(self.max_scroll());
    }

    fn max_scroll(&self) -> u16 {
        u16::try_from(self.text.lines().count().saturating_sub(1)).unwrap_or(u16::MAX)
    }

    fn page_step(&self) -> u16 {
        self.size.height.saturating_sub(2).max(1)
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> Option<ViewIntent> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Some(ViewIntent::Pop),
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = self.scroll.saturating_add(1).min(self.max_scroll())
            }
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(self.page_step()),
            KeyCode::PageDown => {
                self.scroll = self
                    .scroll
                    .saturating_add(self.page_step())
                    .min(self.max_scroll())
            }
            KeyCode::Home => self.scroll = 0,
            _ => {}
        }
        None
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(area);
        let title_style = if self.is_error {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        frame.render_widget(
            Paragraph::new(self.title.as_str()).style(title_style),
            sections[0],
        );
        frame.render_widget(
            Paragraph::new(self.text.as_str())
                .wrap(Wrap { trim: false })
                .scroll((self.scroll, 0)),
            sections[1],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn scrolling_stops_at_last_line() {
        let mut detail = DetailView::new("t", "a\nb\nc");
        for _ in 0..5 {
            detail.handle_key(&KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        }
        assert_eq!(detail.scroll(), 2);
        detail.set_content("one line");
        assert_eq!(detail.scroll(), 0);
    }
}
