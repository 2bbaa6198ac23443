use anyhow::Result;
use popcorn_config::Config;
use popcorn_models::{SearchResultSummary, WatchSummary, WatchlistEntry};
use popcorn_sources::MovieSource;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, warn};
use crate::details::{DetailsFetcher, DetailsState, DEFAULT_TITLE};
use crate::keys::{Key, KeyBindings};
use crate::rating::StarRating;
use crate::search::{SearchQueryFetcher, SearchState};
use crate::watchlist::Watchlist;

/// Actions reachable from global key bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    FocusSearch,
    CloseDetails,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Results,
    Watchlist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub min_query_len: usize,
    pub max_rating: u8,
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            min_query_len: config.search.min_query_len,
            max_rating: config.rating.max_rating,
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Everything one interactive screen shows, and the intents that change it.
///
/// The session owns the watchlist; renderers only borrow it.
pub struct Session {
    search: SearchQueryFetcher,
    details: DetailsFetcher,
    watchlist: Watchlist,
    bindings: KeyBindings<Intent>,
    rating: StarRating,
    max_rating: u8,
    focus: Focus,
    query: String,
    result_cursor: usize,
    watchlist_cursor: usize,
    panel_open: bool,
    status: Option<String>,
    changed: Arc<Notify>,
}

impl Session {
    pub fn new(source: Arc<dyn MovieSource>, watchlist: Watchlist, options: SessionOptions) -> Self {
        let changed = Arc::new(Notify::new());
        let mut bindings = KeyBindings::new();
        bindings.bind(Key::Enter, Intent::FocusSearch);
        bindings.bind(Key::Escape, Intent::CloseDetails);

        Self {
            search: SearchQueryFetcher::new(Arc::clone(&source), options.min_query_len, Arc::clone(&changed)),
            details: DetailsFetcher::new(source, Arc::clone(&changed)),
            watchlist,
            bindings,
            rating: StarRating::new(options.max_rating),
            max_rating: options.max_rating,
            focus: Focus::Results,
            query: String::new(),
            result_cursor: 0,
            watchlist_cursor: 0,
            panel_open: false,
            status: None,
            changed,
        }
    }

    /// Notified whenever a fetch commits new state
    pub fn changed(&self) -> Arc<Notify> {
        Arc::clone(&self.changed)
    }

    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        let mut consumed = false;
        for intent in self.bindings.dispatch(key) {
            consumed |= self.apply_intent(intent);
        }
        if consumed {
            return KeyOutcome::Continue;
        }

        match self.focus {
            Focus::Search => {
                self.handle_search_key(key);
                KeyOutcome::Continue
            }
            Focus::Results | Focus::Watchlist => self.handle_list_key(key),
        }
    }

    /// Returns whether the intent did anything
    fn apply_intent(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::FocusSearch if self.focus != Focus::Search => {
                self.focus = Focus::Search;
                true
            }
            Intent::CloseDetails if self.panel_open => {
                self.close_details();
                true
            }
            _ => false,
        }
    }

    fn handle_search_key(&mut self, key: Key) {
        match key {
            Key::Char(c) => {
                let mut query = self.query.clone();
                query.push(c);
                self.set_query(&query);
            }
            Key::Backspace => {
                let mut query = self.query.clone();
                query.pop();
                self.set_query(&query);
            }
            Key::Tab | Key::Down | Key::Escape => self.focus = Focus::Results,
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key: Key) -> KeyOutcome {
        if self.panel_open {
            match key {
                Key::Right => {
                    let next = self.rating.filled().saturating_add(1);
                    self.hover_rating(next);
                    return KeyOutcome::Continue;
                }
                Key::Left => {
                    let previous = self.rating.filled().saturating_sub(1);
                    self.hover_rating(previous);
                    return KeyOutcome::Continue;
                }
                Key::Backspace if self.rating.preview().is_some() => {
                    self.leave_rating();
                    return KeyOutcome::Continue;
                }
                Key::Char(' ') => {
                    if let Some(preview) = self.rating.preview() {
                        self.rate(preview);
                    }
                    return KeyOutcome::Continue;
                }
                Key::Char(c) if c.is_ascii_digit() => {
                    let value = c.to_digit(10).map(|d| if d == 0 { 10 } else { d as u8 }).unwrap_or(0);
                    self.rate(value);
                    return KeyOutcome::Continue;
                }
                Key::Char('a') => {
                    // Failures are already reported through the status line
                    let _ = self.add_selected_to_watchlist();
                    return KeyOutcome::Continue;
                }
                _ => {}
            }
        }

        match key {
            Key::Char('q') => return KeyOutcome::Quit,
            Key::Tab => {
                self.focus = match self.focus {
                    Focus::Results => Focus::Watchlist,
                    _ => Focus::Results,
                };
            }
            Key::Up => self.move_cursor(-1),
            Key::Down => self.move_cursor(1),
            Key::Char('o') if self.focus == Focus::Results => {
                if let Some(result) = self.highlighted_result() {
                    self.open_details(&result.imdb_id);
                }
            }
            Key::Char('d') if self.focus == Focus::Watchlist => {
                if let Some(entry) = self.highlighted_entry() {
                    let imdb_id = entry.imdb_id.clone();
                    let _ = self.remove_from_watchlist(&imdb_id);
                }
            }
            _ => {}
        }
        KeyOutcome::Continue
    }

    fn move_cursor(&mut self, delta: isize) {
        let (cursor, len) = match self.focus {
            Focus::Watchlist => (&mut self.watchlist_cursor, self.watchlist.len()),
            _ => (&mut self.result_cursor, self.search.state().results.len()),
        };
        if len == 0 {
            *cursor = 0;
            return;
        }
        let current = (*cursor).min(len - 1) as isize;
        *cursor = (current + delta).clamp(0, len as isize - 1) as usize;
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.result_cursor = 0;
        self.search.set_query(query);
    }

    pub fn open_details(&mut self, imdb_id: &str) {
        let state = self.details.state();
        // A failed load is retried instead of treated as already open
        let already_open = self.panel_open
            && state.selected_id.as_deref() == Some(imdb_id)
            && state.error.is_none();
        if already_open {
            return;
        }
        debug!(imdb_id = %imdb_id, "Opening details panel");
        self.panel_open = true;
        self.status = None;
        self.rating = StarRating::new(self.max_rating);
        self.details.select(imdb_id);
    }

    pub fn close_details(&mut self) {
        self.panel_open = false;
        self.rating = StarRating::new(self.max_rating);
        self.details.close();
    }

    pub fn hover_rating(&mut self, value: u8) {
        self.rating.hover(value);
    }

    pub fn leave_rating(&mut self) {
        self.rating.leave();
    }

    pub fn rate(&mut self, value: u8) -> u8 {
        let committed = self.rating.click(value);
        self.rating.leave();
        committed
    }

    /// Add the loaded detail with the committed rating, then close the panel.
    ///
    /// Returns `Ok(false)` when nothing was added: no detail loaded, no rating
    /// yet, or the title is already on the watchlist.
    pub fn add_selected_to_watchlist(&mut self) -> Result<bool> {
        let Some(detail) = self.details.state().detail else {
            self.status = Some("Details are still loading".to_string());
            return Ok(false);
        };
        if self.watchlist.contains(&detail.imdb_id) {
            self.status = Some("Already added to watchlist".to_string());
            return Ok(false);
        }
        let Some(user_rating) = self.rating.rating() else {
            self.status = Some("Rate the movie before adding it".to_string());
            return Ok(false);
        };

        let entry = WatchlistEntry::from_detail(&detail, user_rating, self.rating.times_rated());
        let saved = self.watchlist.add(entry);
        self.close_details();

        match saved {
            Ok(()) => {
                self.status = None;
                Ok(true)
            }
            Err(e) => {
                warn!("Failed to save watchlist: {}", e);
                self.status = Some(format!("Could not save watchlist: {}", e));
                Err(e)
            }
        }
    }

    pub fn remove_from_watchlist(&mut self, imdb_id: &str) -> Result<usize> {
        match self.watchlist.remove(imdb_id) {
            Ok(removed) => {
                self.watchlist_cursor = self.watchlist_cursor.min(self.watchlist.len().saturating_sub(1));
                Ok(removed)
            }
            Err(e) => {
                warn!("Failed to save watchlist: {}", e);
                self.status = Some(format!("Could not save watchlist: {}", e));
                Err(e)
            }
        }
    }

    /// Wait for pending searches and detail loads
    pub async fn settle(&mut self) {
        self.search.settle().await;
        self.details.settle().await;
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn search_state(&self) -> SearchState {
        self.search.state()
    }

    pub fn details_state(&self) -> DetailsState {
        self.details.state()
    }

    pub fn watchlist(&self) -> &Watchlist {
        &self.watchlist
    }

    pub fn summary(&self) -> WatchSummary {
        self.watchlist.summary()
    }

    pub fn rating(&self) -> &StarRating {
        &self.rating
    }

    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn result_cursor(&self) -> usize {
        self.result_cursor
    }

    pub fn watchlist_cursor(&self) -> usize {
        self.watchlist_cursor
    }

    pub fn highlighted_result(&self) -> Option<SearchResultSummary> {
        let results = self.search.state().results;
        let index = self.result_cursor.min(results.len().checked_sub(1)?);
        results.into_iter().nth(index)
    }

    pub fn highlighted_entry(&self) -> Option<&WatchlistEntry> {
        let entries = self.watchlist.entries();
        entries.get(self.watchlist_cursor.min(entries.len().checked_sub(1)?))
    }

    /// Whether the title in the details panel is already on the watchlist
    pub fn selected_in_watchlist(&self) -> bool {
        self.details
            .state()
            .selected_id
            .map(|id| self.watchlist.contains(&id))
            .unwrap_or(false)
    }

    pub fn display_title(&self) -> String {
        if self.panel_open {
            self.details.display_title()
        } else {
            DEFAULT_TITLE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test_support::{detail, result, FakeSource};

    fn session(source: &Arc<FakeSource>) -> Session {
        let watchlist = Watchlist::load(Arc::new(MemoryStore::new()), "watched");
        let source: Arc<dyn MovieSource> = source.clone();
        Session::new(source, watchlist, SessionOptions::default())
    }

    fn type_text(session: &mut Session, text: &str) {
        for c in text.chars() {
            session.handle_key(Key::Char(c));
        }
    }

    #[tokio::test]
    async fn test_enter_focuses_search_only_when_unfocused() {
        let source = Arc::new(FakeSource::new());
        let mut session = session(&source);

        assert_eq!(session.focus(), Focus::Results);
        session.handle_key(Key::Enter);
        assert_eq!(session.focus(), Focus::Search);

        session.handle_key(Key::Enter);
        assert_eq!(session.focus(), Focus::Search);
        assert_eq!(session.query(), "");
    }

    #[tokio::test]
    async fn test_typing_searches_from_third_character() {
        let source = Arc::new(FakeSource::new());
        let mut session = session(&source);
        source.respond_search("Tit", Ok(vec![result("tt0120338", "Titanic")]));

        session.handle_key(Key::Enter);
        type_text(&mut session, "Ti");
        assert!(source.calls().is_empty());

        type_text(&mut session, "t");
        session.settle().await;
        assert_eq!(source.calls(), vec!["search:Tit"]);
        assert_eq!(session.search_state().results.len(), 1);

        session.handle_key(Key::Backspace);
        assert_eq!(session.query(), "Ti");
        assert!(session.search_state().results.is_empty());
    }

    #[tokio::test]
    async fn test_escape_closes_details() {
        let source = Arc::new(FakeSource::new());
        let mut session = session(&source);
        source.respond_detail("tt0133093", Ok(detail("tt0133093", "The Matrix")));

        session.open_details("tt0133093");
        session.settle().await;
        assert_eq!(session.display_title(), "usePopcorn: The Matrix");

        session.handle_key(Key::Escape);
        assert!(!session.panel_open());
        assert_eq!(session.display_title(), DEFAULT_TITLE);
    }

    #[tokio::test]
    async fn test_rate_and_add_flow() {
        let source = Arc::new(FakeSource::new());
        let mut session = session(&source);
        source.respond_search("Matrix", Ok(vec![result("tt0133093", "The Matrix")]));
        source.respond_detail("tt0133093", Ok(detail("tt0133093", "The Matrix")));

        session.set_query("Matrix");
        session.settle().await;
        session.handle_key(Key::Char('o'));
        session.settle().await;
        assert!(session.panel_open());

        session.handle_key(Key::Right);
        session.handle_key(Key::Right);
        assert_eq!(session.rating().filled(), 2);
        session.handle_key(Key::Char(' '));
        session.handle_key(Key::Char('9'));
        assert_eq!(session.rating().rating(), Some(9));

        session.handle_key(Key::Char('a'));
        assert!(!session.panel_open());
        let entries = session.watchlist().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].imdb_id, "tt0133093");
        assert_eq!(entries[0].user_rating, 9);
        assert_eq!(entries[0].times_rated, 2);
        assert_eq!(session.summary().count, 1);
    }

    #[tokio::test]
    async fn test_add_requires_rating() {
        let source = Arc::new(FakeSource::new());
        let mut session = session(&source);
        source.respond_detail("tt0133093", Ok(detail("tt0133093", "The Matrix")));

        session.open_details("tt0133093");
        session.settle().await;

        assert!(!session.add_selected_to_watchlist().unwrap());
        assert!(session.watchlist().is_empty());
        assert!(session.panel_open());
        assert_eq!(session.status(), Some("Rate the movie before adding it"));
    }

    #[tokio::test]
    async fn test_add_disabled_when_already_present() {
        let source = Arc::new(FakeSource::new());
        let mut session = session(&source);

        source.respond_detail("tt1", Ok(detail("tt1", "One")));
        session.open_details("tt1");
        session.settle().await;
        session.rate(7);
        assert!(session.add_selected_to_watchlist().unwrap());

        source.respond_detail("tt1", Ok(detail("tt1", "One")));
        session.open_details("tt1");
        session.settle().await;
        assert!(session.selected_in_watchlist());
        session.rate(8);
        assert!(!session.add_selected_to_watchlist().unwrap());
        assert_eq!(session.watchlist().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_highlighted_entry() {
        let source = Arc::new(FakeSource::new());
        let mut session = session(&source);

        for (id, title) in [("tt1", "One"), ("tt2", "Two")] {
            source.respond_detail(id, Ok(detail(id, title)));
            session.open_details(id);
            session.settle().await;
            session.rate(5);
            session.add_selected_to_watchlist().unwrap();
        }

        session.handle_key(Key::Tab);
        assert_eq!(session.focus(), Focus::Watchlist);
        session.handle_key(Key::Down);
        session.handle_key(Key::Char('d'));

        let ids: Vec<&str> = session.watchlist().entries().iter().map(|e| e.imdb_id.as_str()).collect();
        assert_eq!(ids, vec!["tt1"]);
        assert_eq!(session.watchlist_cursor(), 0);
    }

    #[tokio::test]
    async fn test_backspace_drops_preview_without_rating() {
        let source = Arc::new(FakeSource::new());
        let mut session = session(&source);
        source.respond_detail("tt0133093", Ok(detail("tt0133093", "The Matrix")));

        session.open_details("tt0133093");
        session.settle().await;
        session.handle_key(Key::Char('4'));
        session.handle_key(Key::Right);
        assert_eq!(session.rating().preview(), Some(5));

        session.handle_key(Key::Backspace);
        assert_eq!(session.rating().preview(), None);
        assert_eq!(session.rating().rating(), Some(4));
        assert_eq!(session.rating().filled(), 4);
        assert!(session.panel_open());
    }

    #[tokio::test]
    async fn test_open_again_retries_failed_detail() {
        let source = Arc::new(FakeSource::new());
        let mut session = session(&source);
        source.respond_search("Matrix", Ok(vec![result("tt0133093", "The Matrix")]));

        session.set_query("Matrix");
        session.settle().await;
        // No answer registered: the load fails
        session.handle_key(Key::Char('o'));
        session.settle().await;
        assert!(session.details_state().error.is_some());

        source.respond_detail("tt0133093", Ok(detail("tt0133093", "The Matrix")));
        session.handle_key(Key::Char('o'));
        session.settle().await;

        let state = session.details_state();
        assert_eq!(state.error, None);
        assert_eq!(state.detail.unwrap().title, "The Matrix");
        assert!(session.panel_open());
    }

    #[tokio::test]
    async fn test_quit_key() {
        let source = Arc::new(FakeSource::new());
        let mut session = session(&source);
        assert_eq!(session.handle_key(Key::Char('q')), KeyOutcome::Quit);

        session.handle_key(Key::Enter);
        assert_eq!(session.handle_key(Key::Char('q')), KeyOutcome::Continue);
        assert_eq!(session.query(), "q");
    }
}
