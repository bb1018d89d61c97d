use ratatui::widgets::Paragraph;
use ratatui::style::Style;
use ratatui::Frame;
use ratatui::layout::Rect;
use crate::config::Theme;
use crate::tui::widgets::color::parse_color;
use crate::utils::truncate_with_ellipsis;

pub const KEY_HINTS: [&str; 7] = [
    "n:new",
    "e:edit",
    "d:delete",
    "s:status",
    "t:tag",
    "x:close",
    "q:quit",
];

const SEPARATOR: &str = "  ";
const ELLIPSIS: &str = "...";

/// Join as many hints as fit in `max_width`, marking dropped ones with an ellipsis
pub fn fit_hints(hints: &[&str], max_width: usize) -> String {
    let mut text = String::new();

    for (i, hint) in hints.iter().enumerate() {
        let current_len = text.chars().count();
        let would_be_len = if i == 0 {
            hint.chars().count()
        } else {
            current_len + SEPARATOR.len() + hint.chars().count()
        };

        if would_be_len > max_width {
            if text.is_empty() {
                // Even the first hint is too long
                text = truncate_with_ellipsis(hint, max_width);
            } else if current_len + ELLIPSIS.len() <= max_width {
                text.push_str(ELLIPSIS);
            } else {
                let keep = max_width.saturating_sub(ELLIPSIS.len());
                text = text.chars().take(keep).collect::<String>() + ELLIPSIS;
            }
            break;
        }

        if i > 0 {
            text.push_str(SEPARATOR);
        }
        text.push_str(hint);
    }

    text
}

pub fn render_status_bar(f: &mut Frame, area: Rect, theme: &Theme) {
    let content = fit_hints(&KEY_HINTS, area.width as usize);
    let paragraph = Paragraph::new(content).style(Style::default().fg(parse_color(&theme.subtle)));
    f.render_widget(paragraph, area);
}
