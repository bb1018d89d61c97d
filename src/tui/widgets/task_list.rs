use ratatui::widgets::{List, ListItem, ListState, Paragraph, StatefulWidget, Scrollbar, ScrollbarState, ScrollbarOrientation};
use ratatui::style::{Modifier, Style};
use ratatui::Frame;
use ratatui::layout::{Rect, Layout, Direction, Constraint};
use ratatui::text::{Line, Span};
use crate::config::Theme;
use crate::models::Task;
use crate::tui::widgets::color::{parse_color, status_color};
use crate::utils::truncate_with_ellipsis;

pub const CLOSED_SEPARATOR: &str = "── closed items ──";
pub const EMPTY_LIST_MESSAGE: &str = "No todos yet. Press 'n' to create one.";
const HIGHLIGHT_SYMBOL: &str = "> ";

/// A row of the rendered list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Task(usize), // Index into the task slice
    Separator,
}

/// Active tasks in list order, then the separator (only when there are
/// active tasks ahead of it), then closed tasks.
pub fn build_rows(tasks: &[Task]) -> Vec<Row> {
    let active = tasks.iter().enumerate().filter(|(_, t)| !t.status.is_closed());
    let closed = tasks.iter().enumerate().filter(|(_, t)| t.status.is_closed());

    let mut rows: Vec<Row> = active.map(|(i, _)| Row::Task(i)).collect();
    let has_active = !rows.is_empty();
    let mut closed_rows = closed.map(|(i, _)| Row::Task(i)).peekable();
    if has_active && closed_rows.peek().is_some() {
        rows.push(Row::Separator);
    }
    rows.extend(closed_rows);
    rows
}

/// Position of task `index` among `rows`
pub fn display_position(rows: &[Row], index: usize) -> Option<usize> {
    rows.iter().position(|row| *row == Row::Task(index))
}

pub fn render_task_list(
    f: &mut Frame,
    area: Rect,
    tasks: &[Task],
    selected_index: usize,
    list_state: &mut ListState,
    theme: &Theme,
) {
    let fg_color = parse_color(&theme.fg);
    let subtle = parse_color(&theme.subtle);

    if tasks.is_empty() {
        let paragraph = Paragraph::new(EMPTY_LIST_MESSAGE)
            .style(Style::default().fg(subtle));
        f.render_widget(paragraph, area);
        return;
    }

    // Space for the highlight symbol, the icon and the scrollbar
    let max_width = area.width.saturating_sub(5) as usize;

    let rows = build_rows(tasks);
    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| match row {
            Row::Separator => ListItem::new(Line::from(Span::styled(
                CLOSED_SEPARATOR,
                Style::default().fg(subtle),
            ))),
            Row::Task(i) => {
                let task = &tasks[*i];
                let title_style = if task.status.is_closed() {
                    Style::default().fg(subtle).add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default().fg(fg_color)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{} ", task.status.icon()),
                        Style::default().fg(status_color(theme, task.status)),
                    ),
                    Span::styled(truncate_with_ellipsis(&task.title, max_width), title_style),
                ]))
            }
        })
        .collect();

    // The session tracks task indices; the list widget needs row positions
    list_state.select(display_position(&rows, selected_index));

    // Split area to reserve space for scrollbar
    let list_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1), // Scrollbar
        ])
        .split(area);

    let list_area = list_areas[0];
    let scrollbar_area = list_areas[1];

    let total_items = items.len();
    let list = List::new(items)
        .style(Style::default().fg(fg_color))
        .highlight_symbol(HIGHLIGHT_SYMBOL)
        .highlight_style(
            Style::default()
                .bg(parse_color(&theme.highlight))
                .add_modifier(Modifier::BOLD),
        );

    StatefulWidget::render(list, list_area, f.buffer_mut(), list_state);

    let visible_items = list_area.height as usize;
    if total_items > visible_items && scrollbar_area.width > 0 && scrollbar_area.height > 0 {
        let mut scrollbar_state = ScrollbarState::new(total_items)
            .viewport_content_length(visible_items)
            .position(list_state.offset());

        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"))
            .track_symbol(Some("│"))
            .thumb_symbol("█");

        f.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }
}
