mod view;

use super::watchlist::summary_line;
use super::AppContext;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use console::Term;
use popcorn_core::{Key, KeyOutcome, Session, SessionOptions, DEFAULT_TITLE};
use std::io;
use std::sync::mpsc as std_mpsc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub async fn run_browse(ctx: &AppContext, output: &Output) -> Result<()> {
    let term = Term::stdout();
    if !term.is_term() {
        return Err(eyre!(
            "The interactive screen needs a terminal. Use 'popcorn search <query>' in scripts."
        ));
    }

    let mut session = Session::new(ctx.source()?, ctx.watchlist()?, SessionOptions::from_config(&ctx.config));
    info!(entries = session.watchlist().len(), "Interactive session started");

    let mut reader = KeyReader::spawn();
    term.hide_cursor()?;
    let outcome = event_loop(&term, &mut session, &mut reader).await;

    // Restore the terminal before reporting anything
    let _ = term.clear_screen();
    let _ = term.show_cursor();
    set_window_title(&term, DEFAULT_TITLE);
    outcome?;

    info!("Interactive session ended");
    output.success(format!("Watchlist: {}", summary_line(&session.summary())));
    Ok(())
}

async fn event_loop(term: &Term, session: &mut Session, reader: &mut KeyReader) -> Result<()> {
    let changed = session.changed();
    let mut title = String::new();
    reader.request();

    loop {
        let width = term.size().1 as usize;
        term.clear_screen()?;
        term.write_str(&view::render_screen(session, width))?;

        let next_title = session.display_title();
        if next_title != title {
            set_window_title(term, &next_title);
            title = next_title;
        }

        tokio::select! {
            input = reader.next() => {
                match input {
                    Some(Ok(Input::Key(key))) => {
                        if session.handle_key(key) == KeyOutcome::Quit {
                            return Ok(());
                        }
                    }
                    Some(Ok(Input::Interrupt)) | None => return Ok(()),
                    Some(Ok(Input::Ignored)) => {}
                    Some(Err(e)) => return Err(eyre!("Failed to read from terminal: {}", e)),
                }
                reader.request();
            }
            _ = changed.notified() => {
                debug!("Fetch committed, redrawing");
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Key(Key),
    Interrupt,
    Ignored,
}

fn map_key(key: console::Key) -> Input {
    use console::Key as TermKey;
    match key {
        TermKey::Enter => Input::Key(Key::Enter),
        TermKey::Escape => Input::Key(Key::Escape),
        TermKey::Tab => Input::Key(Key::Tab),
        TermKey::Backspace => Input::Key(Key::Backspace),
        TermKey::ArrowUp => Input::Key(Key::Up),
        TermKey::ArrowDown => Input::Key(Key::Down),
        TermKey::ArrowLeft => Input::Key(Key::Left),
        TermKey::ArrowRight => Input::Key(Key::Right),
        TermKey::CtrlC | TermKey::Char('\u{3}') => Input::Interrupt,
        TermKey::Char(c) if !c.is_control() => Input::Key(Key::Char(c)),
        _ => Input::Ignored,
    }
}

/// Reads keys on a dedicated thread, one per request, so the terminal is
/// only in raw mode while the event loop is actually waiting for input.
struct KeyReader {
    requests: std_mpsc::Sender<()>,
    inputs: mpsc::UnboundedReceiver<io::Result<Input>>,
}

impl KeyReader {
    fn spawn() -> Self {
        let (requests, pending) = std_mpsc::channel::<()>();
        let (tx, inputs) = mpsc::unbounded_channel();

        std::thread::spawn(move || {
            let term = Term::stdout();
            // Ends once the reader is dropped and the request channel closes
            while pending.recv().is_ok() {
                let input = term.read_key().map(map_key);
                let failed = input.is_err();
                if tx.send(input).is_err() || failed {
                    break;
                }
            }
        });

        Self { requests, inputs }
    }

    fn request(&self) {
        if self.requests.send(()).is_err() {
            warn!("Key reader thread has stopped");
        }
    }

    async fn next(&mut self) -> Option<io::Result<Input>> {
        self.inputs.recv().await
    }
}

fn set_window_title(term: &Term, title: &str) {
    if let Err(e) = term.write_str(&format!("\x1b]0;{}\x07", title)) {
        debug!("Could not set window title: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_key_translates_navigation() {
        assert_eq!(map_key(console::Key::Enter), Input::Key(Key::Enter));
        assert_eq!(map_key(console::Key::Escape), Input::Key(Key::Escape));
        assert_eq!(map_key(console::Key::ArrowLeft), Input::Key(Key::Left));
        assert_eq!(map_key(console::Key::Char('q')), Input::Key(Key::Char('q')));
    }

    #[test]
    fn test_map_key_interrupt_and_unknown() {
        assert_eq!(map_key(console::Key::CtrlC), Input::Interrupt);
        assert_eq!(map_key(console::Key::Char('\u{3}')), Input::Interrupt);
        assert_eq!(map_key(console::Key::Home), Input::Ignored);
        assert_eq!(map_key(console::Key::Char('\u{7}')), Input::Ignored);
    }
}
