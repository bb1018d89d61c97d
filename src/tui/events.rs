use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use crate::tui::app::{App, Mode};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;

/// Guard that ensures terminal state is restored even on panic.
/// If the terminal is left in raw mode or the alternate screen, the
/// user's shell is unusable afterwards.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut guard = Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: false,
        };
        execute!(io::stdout(), EnterAlternateScreen)?;
        guard.alternate_screen_enabled = true;
        Ok(guard)
    }

    /// Restore terminal state on normal exit; drop then has nothing left to do
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Already on a cleanup path, errors are ignored
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

/// Draw, block for one event, handle it to completion, repeat until quit
pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    let mut guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    loop {
        terminal.draw(|f| {
            let layout = Layout::calculate(f.area(), app.last_error.is_some());
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        match event::read()? {
            // Only Press events; Windows also reports releases
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                if handle_key_event(&mut app, key_event) {
                    break;
                }
            }
            // Resize and everything else just trigger a redraw
            _ => {}
        }
    }

    guard.restore()?;
    tracing::info!("session ended");

    Ok(())
}

/// Route a key to the handler for the current mode.
/// Returns true when the session should end.
pub fn handle_key_event(app: &mut App, key_event: KeyEvent) -> bool {
    if is_interrupt(key_event) {
        return true;
    }

    match app.mode {
        Mode::List => handle_list_mode(app, key_event),
        Mode::NewEntry | Mode::EditEntry => {
            handle_input_mode(app, key_event);
            false
        }
        Mode::ConfirmDelete => {
            handle_confirm_delete_mode(app, key_event);
            false
        }
    }
}

fn is_interrupt(key_event: KeyEvent) -> bool {
    key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
}

fn handle_list_mode(app: &mut App, key_event: KeyEvent) -> bool {
    match key_event.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => app.move_selection_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_selection_up(),
        KeyCode::Char('n') => app.enter_create_mode(),
        KeyCode::Char('e') => app.enter_edit_mode(),
        KeyCode::Char('d') => app.request_delete(),
        KeyCode::Char(' ') | KeyCode::Char('s') => app.cycle_selected_status(),
        KeyCode::Char('x') => app.toggle_selected_closed(),
        KeyCode::Char('t') => app.cycle_time_filter(),
        _ => {}
    }
    false
}

fn handle_input_mode(app: &mut App, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Enter => app.submit_input(),
        KeyCode::Esc => app.exit_input_mode(),
        KeyCode::Backspace => app.input.delete_char(),
        KeyCode::Delete => app.input.delete_char_forward(),
        KeyCode::Left => app.input.move_cursor_left(),
        KeyCode::Right => app.input.move_cursor_right(),
        KeyCode::Home => app.input.move_cursor_home(),
        KeyCode::End => app.input.move_cursor_end(),
        KeyCode::Char(ch) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input.insert_char(ch)
        }
        _ => {}
    }
}

fn handle_confirm_delete_mode(app: &mut App, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
        // Ignore all other keys while the question is shown
        _ => {}
    }
}
