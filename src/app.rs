#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    #[default]
    History,
    Collection,
}

#[derive(Debug, Default)]
pub struct App {
    focus: FocusTarget,
    pub selected_history: usize,
    pub selected_collection: usize,
    pub selected_shop_item: usize,
    pub shop_open: bool,
    pub odds_open: bool,
    pub details_open: bool,
    pub editing_tag: bool,
    pub confirm_reset: bool,
    pub tag_filter: String,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> FocusTarget {
        self.focus
    }

    pub fn next_focus(&mut self) {
        self.focus = match self.focus {
            FocusTarget::History => FocusTarget::Collection,
            FocusTarget::Collection => FocusTarget::History,
        };
    }

    pub fn toggle_shop(&mut self) {
        self.shop_open = !self.shop_open;
        if self.shop_open {
            self.selected_shop_item = 0;
        }
    }

    pub fn toggle_odds(&mut self) {
        self.odds_open = !self.odds_open;
    }

    pub fn toggle_details(&mut self) {
        self.details_open = !self.details_open;
    }

    pub fn selected(&self) -> usize {
        match self.focus {
            FocusTarget::History => self.selected_history,
            FocusTarget::Collection => self.selected_collection,
        }
    }

    pub fn move_selection(&mut self, len: usize, delta: isize) {
        if len == 0 {
            return;
        }
        let current = match self.focus {
            FocusTarget::History => &mut self.selected_history,
            FocusTarget::Collection => &mut self.selected_collection,
        };
        let mut idx = *current as isize + delta;
        if idx < 0 {
            idx = len as isize - 1;
        } else if idx >= len as isize {
            idx = 0;
        }
        *current = idx as usize;
    }

    pub fn clamp_selections(&mut self, history_len: usize, collection_len: usize, shop_len: usize) {
        self.selected_history = clamp(self.selected_history, history_len);
        self.selected_collection = clamp(self.selected_collection, collection_len);
        self.selected_shop_item = clamp(self.selected_shop_item, shop_len);
    }
}

fn clamp(selection: usize, len: usize) -> usize {
    if len == 0 { 0 } else { selection.min(len - 1) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_wraps_and_clamps() {
        let mut app = App::new();
        app.move_selection(3, -1);
        assert_eq!(app.selected(), 2);
        app.move_selection(3, 1);
        assert_eq!(app.selected(), 0);

        app.next_focus();
        assert_eq!(app.focus(), FocusTarget::Collection);
        app.move_selection(0, 1);
        assert_eq!(app.selected(), 0);

        app.selected_history = 9;
        app.selected_shop_item = 4;
        app.clamp_selections(2, 0, 0);
        assert_eq!(app.selected_history, 1);
        assert_eq!(app.selected_shop_item, 0);
    }
}
