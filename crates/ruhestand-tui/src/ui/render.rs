use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

use ruhestand_core::countdown::{progress_split, Countdown};

use crate::app::{App, AppState, CacheStatus};

use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    // Background wash from the persisted preference
    let bg = styles::bg_color(app.prefs.bg_color.as_deref());
    frame.render_widget(Block::default().style(Style::default().bg(bg)), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(1), // Subtitle
            Constraint::Min(7),    // Countdown units
            Constraint::Length(3), // Progress chart
            Constraint::Length(1), // Chart legend
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_subtitle(frame, app, chunks[1]);
    render_countdown(frame, app, chunks[2]);
    render_chart(frame, app, chunks[3]);
    render_legend(frame, app, chunks[4]);
    render_status_bar(frame, app, chunks[5]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame, app),
        AppState::EditingDate => render_edit_overlay(
            frame,
            app.strings().ui_target_date,
            &app.date_input,
            "",
        ),
        AppState::EditingTitle => render_edit_overlay(
            frame,
            app.strings().ui_custom_title,
            &app.title_input,
            app.strings().title_placeholder,
        ),
        _ => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("  {}", app.display_title());
    let hourglass = if app.hourglass_flipped() { "⏳" } else { "⌛" };
    let right = format!("{}  [?]  ", hourglass);

    let padding = (area.width as usize)
        .saturating_sub(title.chars().count())
        .saturating_sub(right.chars().count());

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(right, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_subtitle(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(Span::styled(
        format!("  {}", app.strings().subtitle),
        styles::muted_style(),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

fn render_countdown(frame: &mut Frame, app: &App, area: Rect) {
    let accent = styles::accent_color(app.prefs.accent_color.as_deref());

    match app.countdown {
        Countdown::Done => {
            let lines = vec![
                Line::from(""),
                Line::from(""),
                Line::from(Span::styled(app.strings().done, styles::done_style(accent))),
            ];
            frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
        }
        Countdown::Remaining { duration, .. } => {
            let values = [
                duration.years,
                duration.months,
                duration.days,
                duration.hours,
                duration.minutes,
                duration.seconds,
            ];
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, 6); 6])
                .split(area);

            for (i, value) in values.iter().enumerate() {
                let text = vec![
                    Line::from(""),
                    Line::from(Span::styled(value.to_string(), styles::unit_value_style(accent))),
                    Line::from(Span::styled(app.strings().unit_labels[i], styles::muted_style())),
                ];
                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(styles::border_style(false));
                frame.render_widget(
                    Paragraph::new(text).alignment(Alignment::Center).block(block),
                    cells[i],
                );
            }
        }
    }
}

fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let accent = styles::accent_color(app.prefs.accent_color.as_deref());

    let (ratio, label) = match app.countdown {
        Countdown::Remaining { remaining_days, .. } => {
            let split = progress_split(remaining_days, app.max_days);
            (split.ratio(), app.prefs.language.center_label(remaining_days))
        }
        Countdown::Done => (1.0, String::new()),
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styles::border_style(false)),
        )
        .gauge_style(Style::default().fg(accent))
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, area);
}

fn render_legend(frame: &mut Frame, app: &App, area: Rect) {
    let accent = styles::accent_color(app.prefs.accent_color.as_deref());
    let legend = app.strings().chart_legend;

    let line = Line::from(vec![
        Span::raw("  "),
        Span::styled("■ ", Style::default().fg(accent)),
        Span::styled(legend[0], styles::muted_style()),
        Span::raw("   "),
        Span::styled("■ ", styles::muted_style()),
        Span::styled(legend[1], styles::muted_style()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let strings = app.strings();

    let cache_text = match &app.cache_status {
        CacheStatus::Warming => "cache: updating...".to_string(),
        CacheStatus::Ready { stored, failed: 0 } => format!("cache: {} assets", stored),
        CacheStatus::Ready { stored, failed } => {
            format!("cache: {} assets, {} failed", stored, failed)
        }
        CacheStatus::Unavailable => "cache: offline".to_string(),
        CacheStatus::Unknown => match &app.cache_age {
            Some(age) => format!("cache: {}", age),
            None => "cache: never".to_string(),
        },
    };
    let left = format!(" {} ", cache_text);

    let right = format!(
        "[d] {} | [t] {} | [l] {} | [b/c] {} | [r] {} | [q] {} ",
        strings.ui_target_date,
        strings.ui_custom_title,
        strings.ui_language,
        strings.ui_colors,
        strings.ui_reset,
        strings.ui_quit,
    );

    let padding = (area.width as usize)
        .saturating_sub(left.chars().count())
        .saturating_sub(right.chars().count());

    let status_line = Line::from(vec![
        Span::styled(left, styles::muted_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(right, styles::muted_style()),
    ]);
    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

fn render_edit_overlay(frame: &mut Frame, label: &str, value: &str, placeholder: &str) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let field = if value.is_empty() && !placeholder.is_empty() {
        Span::styled(placeholder.to_string(), styles::muted_style())
    } else {
        Span::styled(format!("{}▌", value), styles::selected_style())
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![Span::raw("  ["), field, Span::raw("]")]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Enter ", styles::help_key_style()),
            Span::styled("✓   ", styles::help_desc_style()),
            Span::styled("Esc ", styles::help_key_style()),
            Span::styled("✗", styles::help_desc_style()),
        ]),
    ];

    let block = Block::default()
        .title(format!(" {} ", label))
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(46, 16, frame.area());
    frame.render_widget(Clear, area);

    let strings = app.strings();
    let version = env!("CARGO_PKG_VERSION");

    let key_rows: [(&str, &str); 8] = [
        ("d", strings.ui_target_date),
        ("t", strings.ui_custom_title),
        ("l", strings.ui_language),
        ("b/c", strings.ui_colors),
        ("r", strings.ui_reset),
        ("u", "Update cache"),
        ("?", "Help"),
        ("q", strings.ui_quit),
    ];

    let mut lines = vec![
        Line::from(Span::styled("  ruhestand", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
    ];
    for (key, description) in key_rows {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<8}", key), styles::help_key_style()),
            Span::styled(description, styles::help_desc_style()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Esc ", styles::help_key_style()),
        Span::styled("✗", styles::help_desc_style()),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
