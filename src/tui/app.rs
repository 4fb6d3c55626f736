use crate::tui::search::SearchState;
use crate::tui::table::TableState;
use crate::tui::ui;
use crate::{DirectoryClient, HubSeekError, ProfileRecord, SearchController};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct App {
    pub controller: SearchController,

    // Sub-states
    pub search: SearchState,
    pub table: TableState,

    pub status_message: String,

    // Quit flag
    pub should_quit: bool,
}

impl App {
    pub fn new(client: Arc<dyn DirectoryClient>, initial_query: Option<&str>) -> Self {
        let mut app = Self {
            controller: SearchController::new(client),
            search: SearchState::default(),
            table: TableState::default(),
            status_message: "Type a username and press Enter".to_string(),
            should_quit: false,
        };

        if let Some(query) = initial_query {
            app.search = SearchState::with_query(query);
            app.controller.set_input(query);
            app.submit();
        }

        app
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> crate::Result<()> {
        let tick_rate = Duration::from_millis(50);
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            // Rows on screen are known only after drawing
            let total = self.controller.profiles().len();
            let viewport = self.table.viewport(total);
            if self.controller.on_viewport(viewport) {
                self.status_message = format!("Loading page {}...", self.controller.page());
            }

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            if last_tick.elapsed() >= tick_rate {
                if self.controller.poll() > 0 && !self.controller.is_loading() {
                    self.status_message = "Ready".to_string();
                }
                last_tick = Instant::now();
            }

            if self.should_quit {
                self.controller.shutdown();
                return Ok(());
            }
        }
    }

    fn submit(&mut self) {
        if self.controller.submit() {
            self.table.reset();
            self.status_message = "Searching...".to_string();
        } else {
            self.status_message = "Nothing to search for".to_string();
        }
    }

    fn selected_profile(&self) -> Option<&ProfileRecord> {
        self.table
            .selected
            .and_then(|i| self.controller.profiles().get(i))
    }

    fn open_selected(&mut self) {
        let Some(url) = self.selected_profile().map(|p| p.html_url.clone()) else {
            return;
        };
        let result = open::that(&url).map_err(|e| HubSeekError::Browser(e.to_string()));
        self.report(result, format!("Opened {}", url));
    }

    fn copy_selected(&mut self) {
        let Some(url) = self.selected_profile().map(|p| p.html_url.clone()) else {
            return;
        };
        let result = arboard::Clipboard::new()
            .and_then(|mut clipboard| clipboard.set_text(url.clone()))
            .map_err(|e| HubSeekError::Clipboard(e.to_string()));
        self.report(result, format!("Copied {}", url));
    }

    fn report(&mut self, result: crate::Result<()>, success: String) {
        match result {
            Ok(()) => self.status_message = success,
            Err(e) => {
                tracing::warn!(error = %e, "desktop action failed");
                self.status_message = e.to_string();
            }
        }
    }

    // --- Key handling ---

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Global keys
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Esc => {
                if self.search.focused && !self.search.query.is_empty() {
                    self.search.clear();
                    self.controller.set_input("");
                } else if self.search.focused {
                    self.search.focused = false;
                } else {
                    self.should_quit = true;
                }
                return;
            }
            _ => {}
        }

        if self.search.focused {
            self.handle_search_key(key);
        } else {
            self.handle_table_key(key);
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let changed = match key.code {
            KeyCode::Char(c) => {
                self.search.insert_char(c);
                true
            }
            KeyCode::Backspace => self.search.backspace(),
            KeyCode::Delete => self.search.delete(),
            KeyCode::Left => {
                self.search.move_left();
                false
            }
            KeyCode::Right => {
                self.search.move_right();
                false
            }
            KeyCode::Home => {
                self.search.home();
                false
            }
            KeyCode::End => {
                self.search.end();
                false
            }
            KeyCode::Enter => {
                self.submit();
                if self.controller.is_submitted() {
                    self.search.focused = false;
                }
                false
            }
            KeyCode::Tab | KeyCode::Down => {
                self.search.focused = false;
                false
            }
            _ => false,
        };

        if changed {
            self.controller.set_input(self.search.query.as_str());
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) {
        let total = self.controller.profiles().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.table.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.table.select_next(total),
            KeyCode::PageUp => self.table.page_up(),
            KeyCode::PageDown => self.table.page_down(total),
            KeyCode::Home => self.table.select_first(),
            KeyCode::End => self.table.select_last(total),

            KeyCode::Enter => self.open_selected(),
            KeyCode::Char('y') => self.copy_selected(),

            KeyCode::Tab | KeyCode::Char('/') => {
                self.search.focused = true;
            }

            // Any other printable char focuses search and types it
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.focused = true;
                self.search.end();
                self.search.insert_char(c);
                self.controller.set_input(self.search.query.as_str());
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Result, SearchPage};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingClient {
        queries: Mutex<Vec<String>>,
    }

    impl DirectoryClient for RecordingClient {
        fn search(&self, query: &str, _page: u32, _per_page: u32) -> Result<SearchPage> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok(SearchPage {
                items: Vec::new(),
                total_count: 0,
            })
        }
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_updates_input_without_searching() {
        let client = Arc::new(RecordingClient::default());
        let mut app = App::new(client.clone(), None);

        type_text(&mut app, "octo");
        press(&mut app, KeyCode::Backspace);

        assert_eq!(app.controller.input(), "oct");
        assert!(!app.controller.is_submitted());
        assert!(client.queries.lock().unwrap().is_empty());
    }

    #[test]
    fn enter_submits_and_moves_focus_to_results() {
        let client = Arc::new(RecordingClient::default());
        let mut app = App::new(client.clone(), None);

        type_text(&mut app, "octocat");
        press(&mut app, KeyCode::Enter);

        assert!(app.controller.is_submitted());
        assert!(app.controller.is_loading());
        assert!(!app.search.focused);
        assert!(app.controller.wait_idle(Duration::from_secs(5)));
        assert_eq!(*client.queries.lock().unwrap(), vec!["octocat".to_string()]);
    }

    #[test]
    fn enter_on_empty_query_keeps_focus() {
        let client = Arc::new(RecordingClient::default());
        let mut app = App::new(client, None);

        press(&mut app, KeyCode::Enter);

        assert!(app.search.focused);
        assert!(!app.controller.is_submitted());
        assert_eq!(app.status_message, "Nothing to search for");
    }

    #[test]
    fn initial_query_is_submitted() {
        let client = Arc::new(RecordingClient::default());
        let mut app = App::new(client.clone(), Some("rust"));

        assert_eq!(app.search.query, "rust");
        assert!(app.controller.wait_idle(Duration::from_secs(5)));
        assert_eq!(*client.queries.lock().unwrap(), vec!["rust".to_string()]);
    }

    #[test]
    fn escape_clears_then_unfocuses_then_quits() {
        let client = Arc::new(RecordingClient::default());
        let mut app = App::new(client, None);
        type_text(&mut app, "ab");

        press(&mut app, KeyCode::Esc);
        assert!(app.search.query.is_empty());
        assert_eq!(app.controller.input(), "");

        press(&mut app, KeyCode::Esc);
        assert!(!app.search.focused);

        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }
}
