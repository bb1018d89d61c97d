use ratatui::style::Color;

use crate::config::Theme;
use crate::models::Status;

/// Parse a colour string into a ratatui Color.
/// Accepts basic named colours, `#RRGGBB` and `#RGB`.
/// Anything else falls back to `Color::Reset`.
pub fn parse_color(color_str: &str) -> Color {
    let s = color_str.trim().to_lowercase();

    match s.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" => Color::Gray,
        _ if s.starts_with('#') => parse_hex_color(&s).unwrap_or(Color::Reset),
        _ => Color::Reset,
    }
}

/// Parse hex colour format (#RRGGBB or #RGB)
fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        3 => {
            // #RGB -> #RRGGBB
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| (v << 4) | v);
            Some(Color::Rgb(digit(0)?, digit(1)?, digit(2)?))
        }
        _ => None,
    }
}

pub fn status_color(theme: &Theme, status: Status) -> Color {
    let color = match status {
        Status::Pending => &theme.pending,
        Status::InProgress => &theme.in_progress,
        Status::Done => &theme.done,
        Status::Closed => &theme.closed,
    };
    parse_color(color)
}
