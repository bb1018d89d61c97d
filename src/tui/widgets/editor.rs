use ratatui::layout::Rect;

/// Maximum number of characters a title may have
pub const TITLE_CHAR_LIMIT: usize = 100;

/// Single-line text input used for new and edited titles
#[derive(Debug, Clone)]
pub struct LineInput {
    chars: Vec<char>,
    cursor: usize,       // Position in chars, 0..=len
    scroll_col: usize,   // First visible column
    focused: bool,
    char_limit: usize,
}

impl Default for LineInput {
    fn default() -> Self {
        Self::new()
    }
}

impl LineInput {
    pub fn new() -> Self {
        Self::with_limit(TITLE_CHAR_LIMIT)
    }

    pub fn with_limit(char_limit: usize) -> Self {
        Self {
            chars: Vec::new(),
            cursor: 0,
            scroll_col: 0,
            focused: false,
            char_limit,
        }
    }

    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    /// Replace the contents and move the cursor to the end
    pub fn set_value(&mut self, value: &str) {
        self.chars = value.chars().take(self.char_limit).collect();
        self.cursor = self.chars.len();
        self.scroll_col = 0;
    }

    pub fn clear(&mut self) {
        self.set_value("");
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' || ch == '\r' || self.chars.len() >= self.char_limit {
            return;
        }
        self.chars.insert(self.cursor, ch);
        self.cursor += 1;
    }

    /// Backspace: remove the character before the cursor
    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
        }
    }

    /// Delete: remove the character under the cursor
    pub fn delete_char_forward(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.chars.len() {
            self.cursor += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.chars.len();
    }

    /// Keep the cursor inside a viewport `width` columns wide
    pub fn update_horizontal_scroll(&mut self, width: usize) {
        if width == 0 {
            self.scroll_col = self.cursor;
            return;
        }
        if self.cursor < self.scroll_col {
            self.scroll_col = self.cursor;
        } else if self.cursor >= self.scroll_col + width {
            self.scroll_col = self.cursor + 1 - width;
        }
    }

    /// The slice of text visible in a viewport `width` columns wide
    pub fn visible_text(&self, width: usize) -> String {
        self.chars.iter().skip(self.scroll_col).take(width).collect()
    }

    /// Screen position of the cursor when the text is drawn at `area`
    pub fn get_cursor_screen_pos(&self, area: Rect) -> Option<(u16, u16)> {
        if !self.focused || area.width == 0 || area.height == 0 {
            return None;
        }
        let offset = self.cursor.saturating_sub(self.scroll_col) as u16;
        Some((area.x + offset.min(area.width - 1), area.y))
    }
}
