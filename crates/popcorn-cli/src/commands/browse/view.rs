use crate::commands::watchlist::summary_line;
use crate::output::format_average;
use owo_colors::OwoColorize;
use popcorn_core::{Focus, Session, StarRating};
use popcorn_models::MovieDetail;

const MIN_RULE_WIDTH: usize = 20;
const MAX_RULE_WIDTH: usize = 80;

/// Whole screen as one string; the caller clears the terminal before writing it
pub fn render_screen(session: &Session, width: usize) -> String {
    let rule = "─".repeat(width.clamp(MIN_RULE_WIDTH, MAX_RULE_WIDTH));
    let mut lines = Vec::new();

    lines.push(header(session));
    if let Some(line) = status_line(session) {
        lines.push(line);
    }
    lines.push(rule.dimmed().to_string());

    lines.extend(results_section(session));
    lines.push(rule.dimmed().to_string());

    if session.panel_open() {
        lines.extend(details_section(session));
    } else {
        lines.extend(watchlist_section(session));
    }
    lines.push(rule.dimmed().to_string());
    lines.push(help_line(session).dimmed().to_string());

    let mut screen = lines.join("\n");
    screen.push('\n');
    screen
}

fn header(session: &Session) -> String {
    let state = session.search_state();
    let search_box = match (session.focus(), session.query().is_empty()) {
        (Focus::Search, _) => format!("{}▏", session.query()).reversed().to_string(),
        (_, true) => "Search movies...".dimmed().to_string(),
        (_, false) => session.query().to_string(),
    };
    format!(
        "🍿 {}   {}   Found {} results",
        "usePopcorn".bold(),
        search_box,
        state.results.len()
    )
}

fn status_line(session: &Session) -> Option<String> {
    let state = session.search_state();
    if state.is_loading {
        return Some("Loading...".yellow().to_string());
    }
    if let Some(error) = state.error {
        return Some(format!("⛔️ {}", error).red().to_string());
    }
    session.status().map(|status| status.yellow().to_string())
}

fn section_title(title: &str, focused: bool) -> String {
    if focused {
        title.bold().underline().to_string()
    } else {
        title.bold().to_string()
    }
}

fn results_section(session: &Session) -> Vec<String> {
    let focused = session.focus() == Focus::Results;
    let state = session.search_state();
    let mut lines = vec![section_title("Results", focused)];

    let cursor = session.result_cursor().min(state.results.len().saturating_sub(1));
    for (index, result) in state.results.iter().enumerate() {
        let text = format!("{} ({})", result.title, result.year);
        lines.push(cursor_row(&text, focused && index == cursor));
    }
    lines
}

fn watchlist_section(session: &Session) -> Vec<String> {
    let focused = session.focus() == Focus::Watchlist;
    let watchlist = session.watchlist();
    let mut lines = vec![
        section_title("Movies you watched", focused),
        summary_line(&session.summary()),
    ];

    let cursor = session.watchlist_cursor().min(watchlist.len().saturating_sub(1));
    for (index, entry) in watchlist.entries().iter().enumerate() {
        let text = format!(
            "{}  ⭐️ {:.1}  🌟 {}  ⏳ {} min",
            entry.title, entry.critic_rating, entry.user_rating, entry.runtime_minutes
        );
        lines.push(cursor_row(&text, focused && index == cursor));
    }
    lines
}

fn details_section(session: &Session) -> Vec<String> {
    let state = session.details_state();
    if state.is_loading {
        return vec!["Loading...".yellow().to_string()];
    }
    if let Some(error) = state.error {
        return vec![format!("⛔️ {}", error).red().to_string()];
    }
    let Some(detail) = state.detail else {
        return Vec::new();
    };

    let mut lines = detail_lines(&detail);
    lines.push(String::new());

    let existing = session
        .watchlist()
        .entries()
        .iter()
        .find(|entry| entry.imdb_id == detail.imdb_id);
    match existing {
        Some(entry) => lines.push(format!("You rated this movie {} 🌟", entry.user_rating)),
        None => {
            lines.push(stars(session.rating()));
            if session.rating().rating().is_some() {
                lines.push("Press 'a' to add to watchlist".green().to_string());
            }
        }
    }
    lines
}

fn detail_lines(detail: &MovieDetail) -> Vec<String> {
    vec![
        format!("{} ({})", detail.title.bold(), detail.year),
        format!("{} • {} min", detail.genre, detail.runtime_minutes),
        format!("⭐️ {} IMDb rating", format_average(detail.critic_rating)),
        detail.plot.italic().to_string(),
        format!("Starring {}", detail.actors),
        format!("Directed by {}", detail.director),
    ]
}

fn stars(rating: &StarRating) -> String {
    let filled = rating.filled().min(rating.max()) as usize;
    let empty = rating.max() as usize - filled;
    let label = rating.label().map(|value| value.to_string()).unwrap_or_default();
    format!(
        "{}{} {}",
        "★".repeat(filled).yellow(),
        "☆".repeat(empty),
        label
    )
}

fn cursor_row(text: &str, highlighted: bool) -> String {
    if highlighted {
        format!("{} {}", "›".cyan(), text.cyan())
    } else {
        format!("  {}", text)
    }
}

fn help_line(session: &Session) -> &'static str {
    match (session.focus(), session.panel_open()) {
        (Focus::Search, _) => "type to search · tab/↓ results · esc leave search",
        (_, true) => "←/→ preview · ⌫ drop preview · space rate · 1-9,0 rate · a add · esc close · q quit",
        (Focus::Results, false) => "enter search · ↑/↓ move · o open · tab watchlist · q quit",
        (Focus::Watchlist, false) => "enter search · ↑/↓ move · d remove · tab results · q quit",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use popcorn_core::{Key, MemoryStore, SessionOptions, Watchlist};
    use popcorn_models::SearchResultSummary;
    use popcorn_sources::{MovieSource, SourceError};
    use std::sync::Arc;

    struct StubSource;

    #[async_trait]
    impl MovieSource for StubSource {
        fn source_name(&self) -> &str {
            "stub"
        }

        async fn search(&self, query: &str) -> Result<Vec<SearchResultSummary>, SourceError> {
            if query != "Titanic" {
                return Err(SourceError::NotFound("Movie not found!".to_string()));
            }
            Ok(vec![SearchResultSummary {
                imdb_id: "tt0120338".to_string(),
                title: "Titanic".to_string(),
                year: "1997".to_string(),
                poster_url: String::new(),
            }])
        }

        async fn get_detail(&self, imdb_id: &str) -> Result<MovieDetail, SourceError> {
            Ok(MovieDetail {
                imdb_id: imdb_id.to_string(),
                title: "Titanic".to_string(),
                year: "1997".to_string(),
                director: "James Cameron".to_string(),
                poster_url: String::new(),
                plot: "A seventeen-year-old aristocrat falls in love.".to_string(),
                genre: "Drama, Romance".to_string(),
                actors: "Leonardo DiCaprio, Kate Winslet".to_string(),
                critic_rating: 7.9,
                runtime_minutes: 194,
            })
        }
    }

    fn session() -> Session {
        let watchlist = Watchlist::load(Arc::new(MemoryStore::new()), "watched");
        Session::new(Arc::new(StubSource), watchlist, SessionOptions::default())
    }

    #[tokio::test]
    async fn test_empty_screen_shows_zero_summary() {
        let session = session();
        let screen = render_screen(&session, 60);
        assert!(screen.contains("Found 0 results"));
        assert!(screen.contains("0 movies"));
        assert!(screen.contains("0.00"));
    }

    #[tokio::test]
    async fn test_results_and_not_found() {
        let mut session = session();
        session.set_query("Titanic");
        session.settle().await;
        let screen = render_screen(&session, 60);
        assert!(screen.contains("Titanic (1997)"));
        assert!(screen.contains("Found 1 results"));

        session.set_query("zzzzqqq");
        session.settle().await;
        let screen = render_screen(&session, 60);
        assert!(screen.contains("Movie not found"));
        assert!(screen.contains("Found 0 results"));
    }

    #[tokio::test]
    async fn test_details_panel_and_rating() {
        let mut session = session();
        session.open_details("tt0120338");
        session.settle().await;
        session.handle_key(Key::Char('8'));

        let screen = render_screen(&session, 60);
        assert!(screen.contains("Directed by James Cameron"));
        assert!(screen.contains("194 min"));
        assert!(screen.contains("Press 'a' to add to watchlist"));

        session.handle_key(Key::Char('a'));
        let screen = render_screen(&session, 60);
        assert!(screen.contains("Movies you watched"));
        assert!(screen.contains("1 movies"));
        assert!(screen.contains("🌟 8"));
    }

    #[test]
    fn test_stars_follow_preview() {
        let mut rating = StarRating::new(5);
        rating.click(2);
        rating.hover(4);
        let rendered = stars(&rating);
        assert!(rendered.contains("☆"));
        assert!(rendered.ends_with(" 2"));
    }
}
