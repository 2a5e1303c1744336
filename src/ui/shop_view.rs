use super::{Palette, centered_rect};
use crate::app::App;
use crate::gacha::engine::View;
use crate::gacha::shop::{self, ShopEffect};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

pub fn render(frame: &mut Frame, app: &App, view: &View, palette: &Palette) {
    let area = centered_rect(60, 70, frame.size());
    frame.render_widget(Clear, area);
    let block = Block::default().title("Shop").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(inner);

    let currency = view.snapshot.currency;
    let has_history = !view.snapshot.history.is_empty();
    let items: Vec<ListItem> = view
        .snapshot
        .shop_items
        .iter()
        .filter_map(|id| shop::item_by_id(*id))
        .map(|item| {
            let affordable = currency >= item.price;
            let usable = item.effect != ShopEffect::Reroll || has_history;
            let name_style = Style::default()
                .fg(if affordable && usable {
                    palette.currency
                } else {
                    palette.muted
                })
                .add_modifier(Modifier::BOLD);
            let mut line = vec![
                Span::styled(item.name, name_style),
                Span::raw(format!("  [{} coins]", item.price)),
            ];
            if item.stays_available() {
                line.push(Span::styled(
                    "  (repeatable)",
                    Style::default().fg(palette.muted),
                ));
            }
            ListItem::new(vec![Line::from(line), Line::from(item.description)])
        })
        .collect();

    let empty = items.is_empty();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Items"))
        .highlight_symbol("▶ ")
        .highlight_style(Style::default().bg(palette.highlight_bg).fg(Color::White));
    let mut state = ListState::default();
    if !empty {
        let selection = app
            .selected_shop_item
            .min(view.snapshot.shop_items.len().saturating_sub(1));
        state.select(Some(selection));
    }
    frame.render_stateful_widget(list, layout[0], &mut state);

    let footer = Paragraph::new(vec![Line::from(vec![
        Span::raw(format!("Coins: {currency}")),
        Span::raw("  •  Enter to purchase  •  Esc/S to close"),
    ])])
    .wrap(Wrap { trim: true });
    frame.render_widget(footer, layout[1]);
}
