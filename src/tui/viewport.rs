/// Cells taken by the rounded border around the page, per axis.
pub const BORDER_SIZE: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageSize {
    pub width: u16,
    pub height: u16,
}

impl PageSize {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Configured bounds. Zero means "no bound" on that axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportOptions {
    pub max_width: u16,
    pub max_height: u16,
    pub padding: u16,
}

/// Effective page size for a terminal of `term_width` x `term_height`: the
/// space left after padding and border, clamped to the configured maximum
/// on each axis.
pub fn page_size(term_width: u16, term_height: u16, options: &ViewportOptions) -> PageSize {
    PageSize {
        width: clamp_axis(term_width, options.max_width, options.padding),
        height: clamp_axis(term_height, options.max_height, options.padding),
    }
}

fn clamp_axis(terminal: u16, max: u16, padding: u16) -> u16 {
    let available = terminal
        .saturating_sub(padding.saturating_mul(2))
        .saturating_sub(BORDER_SIZE);
    if max == 0 {
        available
    } else {
        available.min(max)
    }
}
