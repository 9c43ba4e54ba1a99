use crate::markdown::MarkdownBlock;
use crate::notes::{DisplayItem, Note, NoteList};
use crate::search::{filter_with_query, FilterOutcome, SearchQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    List,
    Reader,
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct AppState {
    all_items: Vec<DisplayItem>,
    visible: FilterOutcome,
    /// Index into the visible items; always points at a note when set.
    selected: Option<usize>,
    search: SearchState,
    pub focus: FocusPane,
    pub reader_scroll: u16,
    document: Vec<MarkdownBlock>,
    rejected: usize,
    status_message: Option<String>,
}

impl AppState {
    pub fn new(list: NoteList, document: Vec<MarkdownBlock>) -> Self {
        let rejected = list.rejected.len();
        let visible = FilterOutcome::Items(list.items.clone());
        let mut state = Self {
            all_items: list.items,
            visible,
            selected: None,
            search: SearchState::default(),
            focus: FocusPane::List,
            reader_scroll: 0,
            document,
            rejected,
            status_message: None,
        };
        state.selected = state.note_positions().first().copied();
        if rejected > 0 {
            state.set_status_message(Some(format!(
                "Skipped {rejected} note(s) with unreadable dates"
            )));
        }
        state
    }

    pub fn visible_items(&self) -> &[DisplayItem] {
        self.visible.items()
    }

    pub fn has_notes(&self) -> bool {
        self.all_items.iter().any(|item| !item.is_separator())
    }

    pub fn is_no_results(&self) -> bool {
        self.visible.is_no_results()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected
    }

    pub fn document(&self) -> &[MarkdownBlock] {
        &self.document
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.selected
            .and_then(|idx| self.visible_items().get(idx))
            .and_then(DisplayItem::as_note)
    }

    /// 1-based rank of the selection among visible notes, and their count.
    pub fn selection_position(&self) -> (usize, usize) {
        let positions = self.note_positions();
        let rank = self
            .selected
            .and_then(|idx| positions.iter().position(|pos| *pos == idx))
            .map(|rank| rank + 1)
            .unwrap_or(0);
        (rank, positions.len())
    }

    pub fn move_selection(&mut self, delta: isize) {
        let positions = self.note_positions();
        if positions.is_empty() {
            self.selected = None;
            return;
        }
        let current = self
            .selected
            .and_then(|idx| positions.iter().position(|pos| *pos == idx))
            .unwrap_or(0) as isize;
        let max = positions.len() as isize - 1;
        let next = (current + delta).clamp(0, max) as usize;
        if self.selected != Some(positions[next]) {
            self.reader_scroll = 0;
        }
        self.selected = Some(positions[next]);
    }

    pub fn scroll_reader(&mut self, delta: i32) {
        let next = i32::from(self.reader_scroll) + delta;
        self.reader_scroll = next.clamp(0, i32::from(u16::MAX)) as u16;
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FocusPane::List => FocusPane::Reader,
            FocusPane::Reader => FocusPane::List,
        };
    }

    pub fn begin_search(&mut self) {
        self.search.active = true;
        self.focus = FocusPane::List;
    }

    pub fn push_search_char(&mut self, ch: char) {
        self.search.query.push(ch);
        self.apply_search();
    }

    pub fn pop_search_char(&mut self) {
        if self.search.query.pop().is_some() {
            self.apply_search();
        }
    }

    /// Leaves input mode but keeps the filter applied.
    pub fn finish_search(&mut self) {
        self.search.active = false;
    }

    pub fn cancel_search(&mut self) {
        self.search = SearchState::default();
        self.apply_search();
    }

    pub fn is_search_active(&self) -> bool {
        self.search.active
    }

    pub fn search_query(&self) -> &str {
        &self.search.query
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn set_status_message<S: Into<String>>(&mut self, message: Option<S>) {
        self.status_message = message.map(Into::into);
    }

    fn apply_search(&mut self) {
        let previous = self.selected_note().map(|note| note.id);
        let query = SearchQuery::parse(&self.search.query);
        self.visible = filter_with_query(&self.all_items, &query);
        let positions = self.note_positions();
        self.selected = previous
            .and_then(|id| {
                positions.iter().copied().find(|idx| {
                    self.visible_items()[*idx]
                        .as_note()
                        .map(|note| note.id == id)
                        .unwrap_or(false)
                })
            })
            .or_else(|| positions.first().copied());
        self.reader_scroll = 0;
    }

    fn note_positions(&self) -> Vec<usize> {
        self.visible_items()
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_separator())
            .map(|(idx, _)| idx)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::{NoteCalendar, NoteListBuilder, RawNote};
    use time::macros::date;

    fn state() -> AppState {
        let raw = vec![
            RawNote::new("Design review", "May 10, 11:40 AM", "a", false),
            RawNote::new("Morning memo", "May 10, 7:12 AM", "a", false),
            RawNote::new("Product sync", "May 9, 6:00 PM", "a", false),
            RawNote::new("Broken", "tomorrow", "a", false),
        ];
        let list = NoteListBuilder::new(NoteCalendar::fixed(date!(2025 - 05 - 10))).build(&raw);
        AppState::new(list, Vec::new())
    }

    fn selected_title(state: &AppState) -> Option<&str> {
        state.selected_note().map(|note| note.title.as_str())
    }

    #[test]
    fn selection_starts_on_first_note_and_skips_separators() {
        let mut state = state();
        assert_eq!(state.selected_index(), Some(1));
        assert_eq!(selected_title(&state), Some("Design review"));
        state.move_selection(1);
        assert_eq!(selected_title(&state), Some("Morning memo"));
        state.move_selection(1);
        assert_eq!(state.selected_index(), Some(4));
        assert_eq!(selected_title(&state), Some("Product sync"));
        state.move_selection(5);
        assert_eq!(selected_title(&state), Some("Product sync"));
        state.move_selection(-10);
        assert_eq!(state.selection_position(), (1, 3));
    }

    #[test]
    fn reports_rejected_notes() {
        let state = state();
        assert_eq!(state.rejected_count(), 1);
        assert!(state.status_message().is_some());
    }

    #[test]
    fn search_keeps_selection_when_still_visible() {
        let mut state = state();
        state.move_selection(2);
        state.begin_search();
        for ch in "sync".chars() {
            state.push_search_char(ch);
        }
        assert_eq!(selected_title(&state), Some("Product sync"));
        assert_eq!(state.visible_items().len(), 2);
        state.finish_search();
        assert!(!state.is_search_active());
        assert_eq!(state.search_query(), "sync");
    }

    #[test]
    fn no_results_clears_selection_until_cancelled() {
        let mut state = state();
        state.begin_search();
        state.push_search_char('z');
        assert!(state.is_no_results());
        assert!(state.selected_note().is_none());
        assert!(state.has_notes());
        state.cancel_search();
        assert!(!state.is_no_results());
        assert_eq!(selected_title(&state), Some("Design review"));
    }
}
