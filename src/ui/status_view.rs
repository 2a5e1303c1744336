use super::{Palette, tier_color};
use crate::gacha::collection;
use crate::gacha::engine::View;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

pub fn render(frame: &mut Frame, area: Rect, view: &View, messages: &[String], palette: &Palette) {
    let sections = Layout::vertical([
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Min(3),
    ])
    .split(area);

    let snapshot = &view.snapshot;
    let stats_lines = vec![
        Line::from(vec![
            Span::styled("Coins", Style::default().fg(palette.currency)),
            Span::raw(format!(": {}", snapshot.currency)),
            Span::raw(format!("    x{:.2}", snapshot.currency_multiplier)),
        ]),
        Line::from(format!("Catalogued GIFs: {}", snapshot.catalog.len())),
        Line::from(format!(
            "Tag mastery: {}",
            if snapshot.has_tag_mastery { "yes" } else { "no" }
        )),
        Line::from(format!(
            "Theme: {}",
            if snapshot.dark_mode { "dark" } else { "light" }
        )),
    ];
    let stats = Paragraph::new(stats_lines)
        .block(Block::default().title("Wallet").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(stats, sections[0]);

    let board: Vec<ListItem> = collection::leaderboard(&snapshot.collection)
        .into_iter()
        .map(|(tier, count)| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<10}", tier.label),
                    Style::default().fg(tier_color(tier.color)),
                ),
                Span::raw(format!("{count}")),
            ]))
        })
        .collect();
    frame.render_widget(
        List::new(board).block(Block::default().title("Leaderboard").borders(Borders::ALL)),
        sections[1],
    );

    let log_block = Block::default().title("Event Log").borders(Borders::ALL);
    let log_area = log_block.inner(sections[2]);
    frame.render_widget(log_block, sections[2]);

    let mut items: Vec<ListItem> = messages
        .iter()
        .map(|msg| ListItem::new(msg.clone()))
        .collect();
    if items.is_empty() {
        items.push(ListItem::new("No events yet. Feeling lucky?"));
    }
    frame.render_widget(List::new(items), log_area);
}
