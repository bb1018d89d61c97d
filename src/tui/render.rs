use ratatui::Frame;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::style::{Modifier, Style};
use ratatui::layout::{Alignment, Constraint, Layout as RatLayout, Rect};
use ratatui::text::{Line, Span};
use crate::config::Theme;
use crate::tui::app::{App, Mode};
use crate::tui::layout::Layout;
use crate::tui::widgets::{
    color::parse_color,
    confirm_delete::render_confirm_delete,
    editor::LineInput,
    status_bar::render_status_bar,
    task_list::render_task_list,
};
use crate::utils::truncate_with_ellipsis;

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    let fg_color = parse_color(&app.theme.fg);
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("Todo")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg_color));
    f.render_widget(outer_block, f.area());

    render_header(f, layout.header_area, app);

    render_task_list(
        f,
        layout.list_area,
        &app.tasks,
        app.selected_index,
        &mut app.list_state,
        &app.theme,
    );

    match app.mode {
        Mode::List => render_status_bar(f, layout.bottom_area, &app.theme),
        Mode::NewEntry => render_input(f, layout.bottom_area, "New todo:", &mut app.input, &app.theme),
        Mode::EditEntry => render_input(f, layout.bottom_area, "Edit:", &mut app.input, &app.theme),
        Mode::ConfirmDelete => {
            if let Some(task) = app.tasks.get(app.selected_index) {
                render_confirm_delete(f, layout.bottom_area, &task.title, &app.theme);
            }
        }
    }

    if let Some(ref error) = app.last_error {
        let message = truncate_with_ellipsis(
            &format!("Error: {}", error),
            layout.error_area.width as usize,
        );
        let paragraph = Paragraph::new(message).style(Style::default().fg(parse_color(&app.theme.error)));
        f.render_widget(paragraph, layout.error_area);
    }
}

/// Title plus a badge naming the active filter
fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let badge_style = Style::default()
        .fg(parse_color(&app.theme.badge_fg))
        .bg(parse_color(&app.theme.badge_bg))
        .add_modifier(Modifier::BOLD);

    let line = Line::from(vec![
        Span::styled("Todos ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!(" {} ", app.time_filter.label()), badge_style),
        Span::styled(
            format!("  {} items", app.tasks.len()),
            Style::default().fg(parse_color(&app.theme.subtle)),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_input(f: &mut Frame, area: Rect, label: &str, input: &mut LineInput, theme: &Theme) {
    let label_width = label.chars().count() as u16 + 1;
    let [label_area, text_area] =
        RatLayout::horizontal([Constraint::Length(label_width), Constraint::Min(1)]).areas(area);

    input.update_horizontal_scroll(text_area.width as usize);

    let label_style = Style::default()
        .fg(parse_color(&theme.highlight))
        .add_modifier(Modifier::BOLD);
    f.render_widget(Paragraph::new(label).style(label_style), label_area);
    f.render_widget(
        Paragraph::new(input.visible_text(text_area.width as usize))
            .style(Style::default().fg(parse_color(&theme.fg))),
        text_area,
    );

    if let Some((x, y)) = input.get_cursor_screen_pos(text_area) {
        f.set_cursor_position((x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{Database, DatabaseError};
    use crate::models::Status;
    use crate::tui::widgets::task_list::{CLOSED_SEPARATOR, EMPTY_LIST_MESSAGE};
    use ratatui::backend::TestBackend;
    use ratatui::layout::Position;
    use ratatui::Terminal;

    const WIDTH: u16 = 80;
    const HEIGHT: u16 = 14;

    fn test_app() -> App {
        App::new(Database::open_in_memory().unwrap(), Theme::default()).unwrap()
    }

    fn draw(terminal: &mut Terminal<TestBackend>, app: &mut App) -> Vec<String> {
        terminal
            .draw(|f| {
                let layout = Layout::calculate(f.area(), app.last_error.is_some());
                render(f, app, &layout);
            })
            .unwrap();

        let buf = terminal.backend().buffer();
        (0..HEIGHT)
            .map(|y| (0..WIDTH).map(|x| buf[(x, y)].symbol()).collect::<String>())
            .collect()
    }

    fn screen(app: &mut App) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).unwrap();
        draw(&mut terminal, app)
    }

    fn row_of(lines: &[String], needle: &str) -> Option<usize> {
        lines.iter().position(|line| line.contains(needle))
    }

    fn add(app: &mut App, title: &str) {
        app.database.create_task(title, app.time_filter).unwrap();
        app.refresh_tasks();
    }

    #[test]
    fn test_empty_list_prompt_and_filter_label() {
        let mut app = test_app();
        let lines = screen(&mut app);

        assert!(row_of(&lines, EMPTY_LIST_MESSAGE).is_some());
        assert!(row_of(&lines, " today ").is_some());
        assert!(row_of(&lines, "n:new").is_some());
        assert!(row_of(&lines, CLOSED_SEPARATOR).is_none());
    }

    #[test]
    fn test_header_follows_filter() {
        let mut app = test_app();
        app.cycle_time_filter();
        let lines = screen(&mut app);
        assert!(row_of(&lines, "this week").is_some());
    }

    #[test]
    fn test_closed_task_renders_after_separator() {
        let mut app = test_app();
        add(&mut app, "Buy milk");
        add(&mut app, "Walk dog");
        app.toggle_selected_closed();

        let lines = screen(&mut app);
        let active = row_of(&lines, "Buy milk").unwrap();
        let separator = row_of(&lines, CLOSED_SEPARATOR).unwrap();
        let closed = row_of(&lines, "Walk dog").unwrap();
        assert!(active < separator);
        assert!(separator < closed);
        assert!(lines[closed].contains(Status::Closed.icon()));
    }

    #[test]
    fn test_no_separator_when_every_task_is_closed() {
        let mut app = test_app();
        add(&mut app, "Buy milk");
        app.toggle_selected_closed();

        let lines = screen(&mut app);
        assert!(row_of(&lines, "Buy milk").is_some());
        assert!(row_of(&lines, CLOSED_SEPARATOR).is_none());
    }

    #[test]
    fn test_cursor_row_is_marked() {
        let mut app = test_app();
        add(&mut app, "first");
        add(&mut app, "second");
        app.move_selection_down();

        let lines = screen(&mut app);
        let selected = &app.tasks[app.selected_index].title;
        let row = row_of(&lines, selected).unwrap();
        assert!(lines[row].contains("> "));
    }

    #[test]
    fn test_cursor_follows_task_across_separator() {
        let mut app = test_app();
        add(&mut app, "keep open");
        add(&mut app, "close me");
        app.toggle_selected_closed();
        let closed_index = app.tasks.iter().position(|t| t.title == "close me").unwrap();
        app.selected_index = closed_index;
        app.sync_list_state();

        let lines = screen(&mut app);
        let row = row_of(&lines, "close me").unwrap();
        assert!(lines[row].contains("> "));
        assert!(!lines[row_of(&lines, "keep open").unwrap()].contains("> "));
    }

    #[test]
    fn test_entry_box_and_cursor() {
        let mut app = test_app();
        app.enter_create_mode();
        for ch in "Buy".chars() {
            app.input.insert_char(ch);
        }

        let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).unwrap();
        let lines = draw(&mut terminal, &mut app);

        let row = row_of(&lines, "New todo:").unwrap();
        assert!(lines[row].contains("New todo: Buy"));
        // Border + label + one space + three typed characters
        let cursor_x = 1 + "New todo:".len() as u16 + 1 + 3;
        assert_eq!(
            terminal.get_cursor_position().unwrap(),
            Position::new(cursor_x, row as u16)
        );
    }

    #[test]
    fn test_edit_box_label() {
        let mut app = test_app();
        add(&mut app, "Buy milk");
        app.enter_edit_mode();

        let lines = screen(&mut app);
        assert!(row_of(&lines, "Edit: Buy milk").is_some());
    }

    #[test]
    fn test_delete_prompt() {
        let mut app = test_app();
        add(&mut app, "Buy milk");
        app.request_delete();

        let lines = screen(&mut app);
        assert!(row_of(&lines, "Delete 'Buy milk'? (y/n)").is_some());
        assert!(row_of(&lines, "n:new").is_none());
    }

    #[test]
    fn test_error_line() {
        let mut app = test_app();
        app.last_error = Some(DatabaseError::Directory("disk full".to_string()));

        let lines = screen(&mut app);
        let row = row_of(&lines, "Error: Failed to create database directory: disk full").unwrap();
        assert_eq!(row, HEIGHT as usize - 2);
    }

    #[test]
    fn test_scenario_close_then_reopen() {
        let mut app = test_app();
        add(&mut app, "Buy milk");
        add(&mut app, "Other");
        let milk = app.tasks.iter().position(|t| t.title == "Buy milk").unwrap();
        app.selected_index = milk;
        app.toggle_selected_closed();

        let lines = screen(&mut app);
        assert!(row_of(&lines, CLOSED_SEPARATOR).unwrap() < row_of(&lines, "Buy milk").unwrap());

        let milk = app.tasks.iter().position(|t| t.title == "Buy milk").unwrap();
        app.selected_index = milk;
        app.toggle_selected_closed();
        assert!(app.tasks.iter().all(|t| t.status == Status::Pending));

        let lines = screen(&mut app);
        assert!(row_of(&lines, CLOSED_SEPARATOR).is_none());
        assert!(row_of(&lines, "Buy milk").is_some());
    }
}
