use super::{Palette, tier_color};
use crate::app::{App, FocusTarget};
use crate::gacha::engine::View;
use crate::gacha::pull::PullRecord;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

pub fn render(frame: &mut Frame, area: Rect, app: &App, view: &View, palette: &Palette) {
    let sections =
        Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)]).split(area);

    let history_title = format!(
        "History ({}/{})",
        view.snapshot.history.len(),
        view.snapshot.history_capacity
    );
    render_list(
        frame,
        sections[0],
        &history_title,
        &view.snapshot.history,
        "No pulls yet.",
        app.focus() == FocusTarget::History,
        app.selected_history,
        palette,
    );

    let collection_title = format!("Collection ({})", view.snapshot.collection.len());
    render_list(
        frame,
        sections[1],
        &collection_title,
        &view.snapshot.collection,
        "Favorite a pull with F.",
        app.focus() == FocusTarget::Collection,
        app.selected_collection,
        palette,
    );
}

#[allow(clippy::too_many_arguments)]
fn render_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    records: &[PullRecord],
    empty: &str,
    focused: bool,
    selected: usize,
    palette: &Palette,
) {
    let border_style = if focused {
        Style::default().fg(palette.accent)
    } else {
        Style::default()
    };

    let mut items: Vec<ListItem> = records
        .iter()
        .map(|record| {
            let star = if record.is_favorite { "★ " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::raw(star),
                Span::styled(
                    format!("{:<10}", record.tier_label),
                    Style::default().fg(tier_color(&record.tier_color)),
                ),
                Span::styled(
                    format!("+{:<4}", record.coin_value),
                    Style::default().fg(palette.currency),
                ),
                Span::styled(short_identity(&record.identity), Style::default().fg(palette.text)),
            ]))
        })
        .collect();

    if items.is_empty() {
        items.push(ListItem::new(Line::from(Span::styled(
            empty.to_string(),
            Style::default().fg(palette.muted),
        ))));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .highlight_style(Style::default().bg(palette.highlight_bg).fg(Color::White))
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    if focused && !records.is_empty() {
        state.select(Some(selected.min(records.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

pub fn short_identity(identity: &str) -> String {
    identity
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or(identity)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortens_urls_to_file_name() {
        assert_eq!(short_identity("https://media.tenor.com/x/abc.gif"), "abc.gif");
        assert_eq!(short_identity("plain"), "plain");
        assert_eq!(short_identity("offline://cats/0001.gif/"), "0001.gif");
    }
}
