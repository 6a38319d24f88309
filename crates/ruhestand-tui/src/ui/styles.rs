use ratatui::style::{Color, Modifier, Style};

// Color palette
pub const PRIMARY: Color = Color::Rgb(222, 165, 84);
pub const MUTED: Color = Color::Rgb(128, 128, 128);
pub const HIGHLIGHT: Color = Color::Rgb(48, 48, 64);

/// Digit/chart color when no accent preference is stored.
pub const DEFAULT_ACCENT: Color = Color::Rgb(255, 152, 0);

/// Parse a `#rrggbb` preference value.
pub fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

pub fn bg_color(pref: Option<&str>) -> Color {
    pref.and_then(parse_hex_color).unwrap_or(Color::Reset)
}

pub fn accent_color(pref: Option<&str>) -> Color {
    pref.and_then(parse_hex_color).unwrap_or(DEFAULT_ACCENT)
}

// Styles
pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn unit_value_style(accent: Color) -> Style {
    Style::default().fg(accent).add_modifier(Modifier::BOLD)
}

pub fn done_style(accent: Color) -> Style {
    Style::default().fg(accent).add_modifier(Modifier::BOLD)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn selected_style() -> Style {
    Style::default().bg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::Rgb(32, 32, 40)).fg(Color::White)
}

pub fn help_key_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    Style::default().fg(Color::White)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff9800"), Some(Color::Rgb(255, 152, 0)));
        assert_eq!(parse_hex_color("#000000"), Some(Color::Rgb(0, 0, 0)));
        assert_eq!(parse_hex_color("ff9800"), None);
        assert_eq!(parse_hex_color("#ff98"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn test_color_fallbacks() {
        assert_eq!(bg_color(None), Color::Reset);
        assert_eq!(accent_color(None), DEFAULT_ACCENT);
        assert_eq!(accent_color(Some("#61afef")), Color::Rgb(0x61, 0xaf, 0xef));
        assert_eq!(accent_color(Some("broken")), DEFAULT_ACCENT);
    }
}
