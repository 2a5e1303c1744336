use super::{Palette, tier_color};
use crate::app::App;
use crate::gacha::engine::View;
use crate::gacha::pull::PullRecord;
use chrono::{Local, TimeZone};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

pub fn render(frame: &mut Frame, area: Rect, app: &App, view: &View, palette: &Palette) {
    let odds_height = if app.odds_open { 10 } else { 7 };
    let sections = Layout::vertical([Constraint::Min(6), Constraint::Length(odds_height)]).split(area);

    let block = Block::default().title("Current Pull").borders(Borders::ALL);
    let lines = match &view.current_pull {
        Some(record) if app.details_open => detail_lines(record, palette),
        Some(record) => summary_lines(record, palette),
        None if view.pulling => vec![Line::from("Opening the lootbox...")],
        None => vec![Line::from(Span::styled(
            "Nothing pulled yet. Press P.",
            Style::default().fg(palette.muted),
        ))],
    };
    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, sections[0]);

    render_odds(frame, sections[1], app, view, palette);
}

fn tier_span(record: &PullRecord) -> Span<'static> {
    Span::styled(
        record.tier_label.clone(),
        Style::default()
            .fg(tier_color(&record.tier_color))
            .add_modifier(Modifier::BOLD),
    )
}

fn summary_lines(record: &PullRecord, palette: &Palette) -> Vec<Line<'static>> {
    let star = if record.is_favorite { " ★" } else { "" };
    vec![
        Line::from(vec![tier_span(record), Span::raw(star)]),
        Line::from(Span::styled(
            record.identity.clone(),
            Style::default().fg(palette.text),
        )),
        Line::from(vec![
            Span::raw("+"),
            Span::styled(
                format!("{} coins", record.coin_value),
                Style::default().fg(palette.currency),
            ),
        ]),
    ]
}

fn detail_lines(record: &PullRecord, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = summary_lines(record, palette);
    let tags = if record.tags.is_empty() {
        "none".to_string()
    } else {
        record.tags.join(", ")
    };
    lines.push(Line::from(format!("Source: {}", record.source)));
    lines.push(Line::from(format!("Tags: {tags}")));
    lines.push(Line::from(format!("Pulled: {}", format_timestamp(record.timestamp))));
    lines
}

pub fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "unknown".to_string(),
    }
}

fn render_odds(frame: &mut Frame, area: Rect, app: &App, view: &View, palette: &Palette) {
    let title = if app.odds_open { "Odds (detailed)" } else { "Odds" };
    let mut lines: Vec<Line> = view
        .odds
        .iter()
        .map(|entry| {
            let mut spans = vec![
                Span::styled(
                    format!("{:<10}", entry.tier.label),
                    Style::default().fg(tier_color(entry.tier.color)),
                ),
                Span::raw(format!("{:>5.1}%", entry.percentage)),
            ];
            if app.odds_open {
                spans.push(Span::styled(
                    format!(
                        "  weight {:.1} (base {:.0}) • {} coins",
                        entry.weight, entry.tier.weight, entry.tier.value
                    ),
                    Style::default().fg(palette.muted),
                ));
            }
            Line::from(spans)
        })
        .collect();

    let boosts = &view.snapshot.active_boosts;
    if let Some(tier) = &boosts.guaranteed {
        lines.push(Line::from(Span::styled(
            format!("Next pull guaranteed {tier} or better"),
            Style::default().fg(palette.accent),
        )));
    }
    if let Some(count) = boosts.multipull {
        lines.push(Line::from(Span::styled(
            format!("Next pull opens {count} boxes"),
            Style::default().fg(palette.accent),
        )));
    }
    if app.odds_open {
        lines.push(Line::from(format!(
            "Coin multiplier x{:.2}",
            view.snapshot.currency_multiplier
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title(title).borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
