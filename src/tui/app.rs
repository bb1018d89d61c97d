use crate::config::Theme;
use crate::database::{Database, DatabaseError};
use crate::models::{Task, TimeTag};
use crate::tui::widgets::editor::LineInput;
use ratatui::widgets::ListState;

/// Filter the session starts with
pub const DEFAULT_TIME_FILTER: TimeTag = TimeTag::Today;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    List,
    NewEntry,
    EditEntry,
    ConfirmDelete,
}

/// Interactive session: the cached list, the cursor and the current mode.
/// `tasks` always mirrors the last successful `list_filtered` call.
pub struct App {
    pub database: Database,
    pub theme: Theme,

    pub tasks: Vec<Task>,
    pub selected_index: usize,
    pub list_state: ListState,
    pub mode: Mode,
    pub time_filter: TimeTag,
    pub input: LineInput,

    /// Most recent in-session storage error
    pub last_error: Option<DatabaseError>,
}

impl App {
    /// Build a session and load the default filter. A failing first load is fatal.
    pub fn new(database: Database, theme: Theme) -> Result<Self, DatabaseError> {
        let tasks = database.list_filtered(DEFAULT_TIME_FILTER)?;
        tracing::info!(count = tasks.len(), "session started");

        let mut app = Self {
            database,
            theme,
            tasks,
            selected_index: 0,
            list_state: ListState::default(),
            mode: Mode::List,
            time_filter: DEFAULT_TIME_FILTER,
            input: LineInput::new(),
            last_error: None,
        };
        app.sync_list_state();
        Ok(app)
    }

    /// Re-read the active filter from the store. On failure the previous
    /// list stays on screen and the error is recorded.
    pub fn refresh_tasks(&mut self) {
        match self.database.list_filtered(self.time_filter) {
            Ok(tasks) => self.tasks = tasks,
            Err(e) => self.record_error(e),
        }
        self.adjust_selected_index();
    }

    pub fn record_error(&mut self, error: DatabaseError) {
        tracing::warn!(error = %error, mode = ?self.mode, "storage operation failed");
        self.last_error = Some(error);
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.selected_index)
    }

    /// Clamp the cursor into `[0, len - 1]`
    pub fn adjust_selected_index(&mut self) {
        if self.selected_index >= self.tasks.len() {
            self.selected_index = self.tasks.len().saturating_sub(1);
        }
        self.sync_list_state();
    }

    /// Sync ListState with selected_index for proper scrolling
    pub fn sync_list_state(&mut self) {
        if self.tasks.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(self.selected_index));
        }
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.sync_list_state();
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index < self.tasks.len().saturating_sub(1) {
            self.selected_index += 1;
            self.sync_list_state();
        }
    }

    pub fn enter_create_mode(&mut self) {
        self.input.clear();
        self.input.focus();
        self.mode = Mode::NewEntry;
    }

    pub fn enter_edit_mode(&mut self) {
        let Some(title) = self.selected_task().map(|t| t.title.clone()) else {
            return;
        };
        self.input.set_value(&title);
        self.input.focus();
        self.mode = Mode::EditEntry;
    }

    pub fn request_delete(&mut self) {
        if !self.tasks.is_empty() {
            self.mode = Mode::ConfirmDelete;
        }
    }

    /// Advance the selected task's status (pending → in progress → done)
    pub fn cycle_selected_status(&mut self) {
        self.update_selected(|task| task.status = task.status.next());
    }

    /// Close the selected task, or reopen it if already closed
    pub fn toggle_selected_closed(&mut self) {
        self.update_selected(|task| task.status = task.status.toggle_closed());
    }

    /// Move to the next time bucket and start from the top of its list
    pub fn cycle_time_filter(&mut self) {
        self.time_filter = self.time_filter.next_filter();
        tracing::debug!(filter = %self.time_filter, "time filter changed");
        self.refresh_tasks();
        self.selected_index = 0;
        self.sync_list_state();
    }

    /// Save the input buffer: create in NewEntry, retitle in EditEntry.
    /// Blank input just returns to the list.
    pub fn submit_input(&mut self) {
        let title = self.input.value().trim().to_string();

        if !title.is_empty() {
            match self.mode {
                Mode::NewEntry => {
                    if let Err(e) = self.database.create_task(&title, self.time_filter) {
                        self.record_error(e);
                    }
                    self.refresh_tasks();
                }
                Mode::EditEntry => {
                    if !self.tasks.is_empty() {
                        self.update_selected(|task| task.title = title);
                    }
                }
                Mode::List | Mode::ConfirmDelete => {}
            }
        }

        self.exit_input_mode();
    }

    /// Leave NewEntry/EditEntry without saving
    pub fn exit_input_mode(&mut self) {
        self.input.blur();
        self.mode = Mode::List;
    }

    pub fn confirm_delete(&mut self) {
        if let Some(id) = self.selected_task().map(|t| t.id) {
            if let Err(e) = self.database.delete_task(id) {
                self.record_error(e);
            }
            self.refresh_tasks();
        }
        self.mode = Mode::List;
    }

    pub fn cancel_delete(&mut self) {
        self.mode = Mode::List;
    }

    /// Apply `change` to the selected task, persist it and re-read the list
    fn update_selected(&mut self, change: impl FnOnce(&mut Task)) {
        let Some(task) = self.tasks.get_mut(self.selected_index) else {
            return;
        };
        change(task);
        if let Err(e) = self.database.update_task(task) {
            self.record_error(e);
        }
        self.refresh_tasks();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;

    fn test_app() -> App {
        App::new(Database::open_in_memory().unwrap(), Theme::default()).unwrap()
    }

    fn test_app_with(titles: &[&str]) -> App {
        let db = Database::open_in_memory().unwrap();
        for (i, title) in titles.iter().enumerate() {
            db.conn()
                .execute(
                    "INSERT INTO todos (title, status, time_tag, created_at, updated_at)
                     VALUES (?1, 'pending', 'today', ?2, ?2)",
                    rusqlite::params![title, 1_000 - i as i64],
                )
                .unwrap();
        }
        App::new(db, Theme::default()).unwrap()
    }

    #[test]
    fn test_new_starts_in_list_mode_with_today_filter() {
        let app = test_app_with(&["a"]);
        assert_eq!(app.mode, Mode::List);
        assert_eq!(app.time_filter, TimeTag::Today);
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.list_state.selected(), Some(0));
        assert!(app.last_error.is_none());
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut app = test_app_with(&["a", "b"]);
        app.move_selection_up();
        assert_eq!(app.selected_index, 0);
        app.move_selection_down();
        app.move_selection_down();
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn test_selection_on_empty_list() {
        let mut app = test_app();
        app.move_selection_down();
        app.move_selection_up();
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.list_state.selected(), None);
    }

    #[test]
    fn test_submit_creates_task_in_active_filter() {
        let mut app = test_app();
        app.cycle_time_filter();
        app.enter_create_mode();
        app.input.set_value("  Plan trip ");
        app.submit_input();

        assert_eq!(app.mode, Mode::List);
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.tasks[0].title, "Plan trip");
        assert_eq!(app.tasks[0].time_tag, TimeTag::Week);
        assert_eq!(app.tasks[0].status, Status::Pending);
        assert!(!app.input.is_focused());
    }

    #[test]
    fn test_submit_blank_input_creates_nothing() {
        let mut app = test_app();
        app.enter_create_mode();
        app.input.set_value("   ");
        app.submit_input();

        assert_eq!(app.mode, Mode::List);
        assert!(app.tasks.is_empty());
        assert!(app.database.list_filtered(TimeTag::None).unwrap().is_empty());
    }

    #[test]
    fn test_edit_retitles_selected_task() {
        let mut app = test_app_with(&["first", "second"]);
        app.move_selection_down();
        app.enter_edit_mode();
        assert_eq!(app.input.value(), "second");

        app.input.set_value("second, revised");
        app.submit_input();

        let id = app.tasks[1].id;
        assert_eq!(app.database.get_task(id).unwrap().title, "second, revised");
        assert_eq!(app.tasks[1].title, "second, revised");
    }

    #[test]
    fn test_edit_mode_requires_a_task() {
        let mut app = test_app();
        app.enter_edit_mode();
        assert_eq!(app.mode, Mode::List);
        app.request_delete();
        assert_eq!(app.mode, Mode::List);
    }

    #[test]
    fn test_filter_change_resets_cursor_and_keeps_tags() {
        let mut app = test_app_with(&["a", "b", "c"]);
        app.move_selection_down();
        app.move_selection_down();

        app.cycle_time_filter();
        assert_eq!(app.time_filter, TimeTag::Week);
        assert_eq!(app.selected_index, 0);
        assert!(app.tasks.is_empty());

        let all = app.database.list_filtered(TimeTag::None).unwrap();
        assert!(all.iter().all(|t| t.time_tag == TimeTag::Today));

        app.cycle_time_filter();
        app.cycle_time_filter();
        assert_eq!(app.time_filter, TimeTag::Today);
        assert_eq!(app.tasks.len(), 3);
    }

    #[test]
    fn test_delete_last_row_moves_cursor_up() {
        let mut app = test_app_with(&["a", "b", "c"]);
        app.move_selection_down();
        app.move_selection_down();
        app.request_delete();
        app.confirm_delete();

        assert_eq!(app.mode, Mode::List);
        assert_eq!(app.tasks.len(), 2);
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn test_update_failure_is_recorded_and_session_continues() {
        let mut app = test_app_with(&["gone"]);
        let id = app.tasks[0].id;
        app.database.delete_task(id).unwrap();

        app.cycle_selected_status();

        assert!(matches!(
            app.last_error,
            Some(DatabaseError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
        ));
        // The refresh after the failed write still mirrors the store
        assert!(app.tasks.is_empty());
        assert_eq!(app.mode, Mode::List);
    }

    #[test]
    fn test_session_starts_despite_unreadable_row() {
        let db = Database::open_in_memory().unwrap();
        db.create_task("readable", TimeTag::Today).unwrap();
        db.conn()
            .execute(
                "INSERT INTO todos (title, status, time_tag, created_at, updated_at)
                 VALUES ('odd', 'archived', 'today', 1, 1)",
                [],
            )
            .unwrap();

        let app = App::new(db, Theme::default()).unwrap();
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.tasks[0].title, "readable");
        assert!(app.last_error.is_none());
    }
}
