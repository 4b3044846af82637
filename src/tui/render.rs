use super::viewport::{PageSize, BORDER_SIZE};
use ratatui::layout::Rect;
use ratatui::widgets::{Block, BorderType, Borders};
use ratatui::Frame;

/// Area of `page` plus its border, centred in `area` and clipped to it.
pub fn centered_rect(area: Rect, page: PageSize) -> Rect {
    let width = page.width.saturating_add(BORDER_SIZE).min(area.width);
    let height = page.height.saturating_add(BORDER_SIZE).min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Draws the rounded page border and returns the area inside it.
pub fn page_frame(frame: &mut Frame, page: PageSize) -> Rect {
    let outer = centered_rect(frame.area(), page);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    let inner = block.inner(outer);
    frame.render_widget(block, outer);
    inner
}
