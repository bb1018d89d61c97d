use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    pub inner_area: Rect,  // Area inside the outer border
    pub header_area: Rect,
    pub list_area: Rect,
    pub bottom_area: Rect, // Input box, delete prompt or key help
    pub error_area: Rect,  // Zero height when there is no error to show
}

impl Layout {
    pub fn calculate(size: Rect, show_error: bool) -> Self {
        // Outer border takes one cell on each side
        let inner_area = Rect::new(
            size.x.saturating_add(1),
            size.y.saturating_add(1),
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        let error_height = if show_error { 1 } else { 0 };

        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),            // Header with the filter badge
                Constraint::Min(1),               // Task list
                Constraint::Length(1),            // Bottom line
                Constraint::Length(error_height), // Error line
            ])
            .split(inner_area);

        Self {
            inner_area,
            header_area: vertical[0],
            list_area: vertical[1],
            bottom_area: vertical[2],
            error_area: vertical[3],
        }
    }
}
