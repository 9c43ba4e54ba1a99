use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::ListState;
use ratatui::Terminal;

use crate::config::AppConfig;
use crate::markdown::MarkdownBlock;
use crate::notes::NoteList;
use crate::ui;

pub mod state;

pub use state::{AppState, FocusPane, SearchState};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

enum Action {
    Quit,
    SelectNext,
    SelectPrevious,
    ToggleFocus,
    StartSearch,
    ClearSearch,
}

pub struct App {
    pub config: Arc<AppConfig>,
    state: AppState,
    list_state: ListState,
    should_quit: bool,
}

impl App {
    pub fn new(config: Arc<AppConfig>, list: NoteList, document: Vec<MarkdownBlock>) -> Self {
        let state = AppState::new(list, document);
        let mut list_state = ListState::default();
        list_state.select(state.selected_index());
        Self {
            config,
            state,
            list_state,
            should_quit: false,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;
        let result = self.event_loop(&mut terminal);
        restore_terminal(&mut terminal)?;
        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let palette = self.config.palette();
        let show_icons = self.config.list.show_icons;
        loop {
            terminal
                .draw(|frame| {
                    self.list_state.select(self.state.selected_index());
                    ui::draw_app(frame, &self.state, &mut self.list_state, &palette, show_icons);
                })
                .context("rendering frame")?;

            if self.should_quit {
                break;
            }

            if event::poll(POLL_INTERVAL).context("polling for terminal events")? {
                if let Event::Key(key) = event::read().context("reading terminal event")? {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER);

        if self.state.is_search_active() {
            match key.code {
                KeyCode::Esc => self.state.cancel_search(),
                KeyCode::Enter => self.state.finish_search(),
                KeyCode::Backspace => self.state.pop_search_char(),
                KeyCode::Down => self.state.move_selection(1),
                KeyCode::Up => self.state.move_selection(-1),
                KeyCode::Char(ch) if plain => self.state.push_search_char(ch),
                _ => {}
            }
            return;
        }

        let action = match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::Quit)
            }
            KeyCode::Char('j') | KeyCode::Down => Some(Action::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::SelectPrevious),
            KeyCode::Tab | KeyCode::Enter => Some(Action::ToggleFocus),
            KeyCode::Char('/') if plain => Some(Action::StartSearch),
            KeyCode::Esc => Some(Action::ClearSearch),
            _ => None,
        };

        if let Some(action) = action {
            self.handle_action(action);
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::SelectNext => match self.state.focus {
                FocusPane::List => self.state.move_selection(1),
                FocusPane::Reader => self.state.scroll_reader(1),
            },
            Action::SelectPrevious => match self.state.focus {
                FocusPane::List => self.state.move_selection(-1),
                FocusPane::Reader => self.state.scroll_reader(-1),
            },
            Action::ToggleFocus => self.state.toggle_focus(),
            Action::StartSearch => {
                self.state.begin_search();
                self.state
                    .set_status_message(Some("Search titles • Enter keep filter • Esc clear"));
            }
            Action::ClearSearch => {
                if !self.state.search_query().is_empty() {
                    self.state.cancel_search();
                    self.state.set_status_message(Some("Search cleared"));
                }
            }
        }
        tracing::trace!(focus = ?self.state.focus, "handled key action");
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen).context("switching to alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal backend")?;
    terminal.hide_cursor().context("hiding cursor")?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    terminal.show_cursor().ok();
    disable_raw_mode().context("disabling raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("restoring screen state")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::{NoteCalendar, NoteListBuilder, RawNote};
    use time::macros::date;

    fn app() -> App {
        let raw = vec![
            RawNote::new("Design review", "May 10, 11:40 AM", "a", false),
            RawNote::new("Product sync", "May 9, 6:00 PM", "a", false),
        ];
        let list = NoteListBuilder::new(NoteCalendar::fixed(date!(2025 - 05 - 10))).build(&raw);
        App::new(Arc::new(AppConfig::default()), list, Vec::new())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn slash_enters_search_and_typing_filters() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        assert!(app.state().is_search_active());
        for ch in "sync".chars() {
            press(&mut app, KeyCode::Char(ch));
        }
        press(&mut app, KeyCode::Enter);
        assert!(!app.state().is_search_active());
        assert_eq!(
            app.state().selected_note().map(|n| n.title.as_str()),
            Some("Product sync")
        );
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state().search_query(), "");
        assert_eq!(app.state().visible_items().len(), 4);
    }

    #[test]
    fn reader_focus_scrolls_instead_of_moving_selection() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.state().reader_scroll, 1);
        assert_eq!(app.state().selection_position(), (1, 2));
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }
}
