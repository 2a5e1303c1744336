use crate::app::App;
use crate::gacha::engine::View;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

pub mod pull_view;
pub mod records_view;
pub mod shop_view;
pub mod status_view;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub text: Color,
    pub accent: Color,
    pub muted: Color,
    pub highlight_bg: Color,
    pub currency: Color,
}

impl Palette {
    pub fn for_theme(dark_mode: bool) -> Self {
        if dark_mode {
            Self {
                text: Color::Gray,
                accent: Color::LightCyan,
                muted: Color::DarkGray,
                highlight_bg: Color::Rgb(45, 55, 72),
                currency: Color::LightYellow,
            }
        } else {
            Self {
                text: Color::White,
                accent: Color::Cyan,
                muted: Color::Gray,
                highlight_bg: Color::DarkGray,
                currency: Color::Yellow,
            }
        }
    }
}

pub fn tier_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 {
        return Color::Reset;
    }
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|part| u8::from_str_radix(part, 16).ok())
    };
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Reset,
    }
}

pub fn render(frame: &mut Frame, app: &App, view: &View, messages: &[String]) {
    let palette = Palette::for_theme(view.snapshot.dark_mode);
    let size = frame.size();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(size);

    render_header(frame, layout[0], app, view, &palette);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(36),
            Constraint::Percentage(34),
            Constraint::Percentage(30),
        ])
        .split(layout[1]);

    pull_view::render(frame, columns[0], app, view, &palette);
    records_view::render(frame, columns[1], app, view, &palette);
    status_view::render(frame, columns[2], view, messages, &palette);

    render_footer(frame, layout[2], &palette);

    if app.shop_open {
        shop_view::render(frame, app, view, &palette);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, view: &View, palette: &Palette) {
    let tag = if app.tag_filter.is_empty() {
        "any".to_string()
    } else {
        app.tag_filter.clone()
    };
    let tag_style = if app.editing_tag {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default().fg(palette.accent)
    };
    let status = if view.pulling { "Opening..." } else { "Ready" };

    let lines = vec![
        Line::from(vec![
            Span::styled(
                "GIF Gacha",
                Style::default()
                    .fg(Color::LightMagenta)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  •  Coins: "),
            Span::styled(
                format!("{}", view.snapshot.currency),
                Style::default().fg(palette.currency),
            ),
            Span::raw("  •  Tag: "),
            Span::styled(tag, tag_style),
            Span::raw("  •  "),
            Span::styled(status, Style::default().fg(palette.text)),
        ]),
        Line::from(vec![Span::styled(
            if app.editing_tag {
                "Type a tag, Enter to finish."
            } else if view.snapshot.has_tag_mastery {
                "Tag mastery: combine tags like cats:funny."
            } else {
                "Press / to filter by tag."
            },
            Style::default().fg(palette.muted),
        )]),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut Frame, area: Rect, palette: &Palette) {
    let key = |label: &'static str| Span::styled(label, Style::default().fg(palette.currency));
    let instructions = Paragraph::new(Line::from(vec![
        key("[P]"),
        Span::raw(" pull  •  "),
        key("[/]"),
        Span::raw(" tag  •  "),
        key("[S]"),
        Span::raw(" shop  •  "),
        key("[F]"),
        Span::raw(" favorite  •  "),
        key("[O]"),
        Span::raw(" odds  •  "),
        key("[D]"),
        Span::raw(" details  •  "),
        key("[C]"),
        Span::raw(" clear  •  "),
        key("[X]"),
        Span::raw(" reset  •  "),
        key("[T]"),
        Span::raw(" theme  •  "),
        key("[Q]"),
        Span::raw(" save & quit"),
    ]))
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(instructions, area);
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
