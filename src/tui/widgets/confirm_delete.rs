use ratatui::widgets::Paragraph;
use ratatui::style::{Modifier, Style};
use ratatui::Frame;
use ratatui::layout::Rect;
use crate::config::Theme;
use crate::tui::widgets::color::parse_color;
use crate::utils::truncate_with_ellipsis;

/// Width of `Delete ''? (y/n)` around the title
const PROMPT_OVERHEAD: usize = 16;

pub fn delete_prompt(title: &str, max_width: usize) -> String {
    let title = truncate_with_ellipsis(title, max_width.saturating_sub(PROMPT_OVERHEAD));
    format!("Delete '{}'? (y/n)", title)
}

pub fn render_confirm_delete(f: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    let paragraph = Paragraph::new(delete_prompt(title, area.width as usize)).style(
        Style::default()
            .fg(parse_color(&theme.error))
            .add_modifier(Modifier::BOLD),
    );
    f.render_widget(paragraph, area);
}
