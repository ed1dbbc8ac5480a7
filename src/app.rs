use std::error::Error;

use ratatui::{backend::Backend, Terminal};

use crate::corpus::{Corpus, CorpusError};
use crate::runtime::{Key, KeySource};
use crate::session::Session;

pub const DEFAULT_TICK_MS: u64 = 100;

/// The screens a run of the program moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    Start,
    Typing,
    Complete,
    ReplayPrompt,
    Terminated,
}

/// Owns the corpus, the current session (absent until the first test starts)
/// and the screen state. Rendering and key capture are injected into [`run`].
#[derive(Debug)]
pub struct App {
    pub corpus: Corpus,
    pub session: Option<Session>,
    pub state: ScreenState,
}

impl App {
    pub fn new(corpus: Corpus) -> Self {
        Self {
            corpus,
            session: None,
            state: ScreenState::Start,
        }
    }

    /// Pick a fresh passage and enter the typing screen with an empty buffer
    /// and a new clock.
    pub fn begin_session(&mut self) -> Result<(), CorpusError> {
        let passage = self.corpus.pick()?;
        self.session = Some(Session::new(passage));
        self.state = ScreenState::Typing;
        Ok(())
    }
}

/// Drive the state machine until it terminates.
///
/// Each loop iteration is one tick: draw first, then act on the current
/// state. In the typing state the completion check runs before the poll, so
/// the keystroke that completes the passage ends the session without any
/// later key being consumed on the same tick. Blocking waits happen only on
/// the start and replay screens, where no clock is running.
pub fn run<B: Backend, K: KeySource>(
    terminal: &mut Terminal<B>,
    keys: &K,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    while app.state != ScreenState::Terminated {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match app.state {
            ScreenState::Start => match keys.wait() {
                Key::Cancel => app.state = ScreenState::Terminated,
                _ => app.begin_session()?,
            },
            ScreenState::Typing => {
                if let Some(session) = app.session.as_mut() {
                    if session.is_complete() {
                        session.finish();
                        app.state = ScreenState::Complete;
                    } else {
                        match keys.poll() {
                            Key::Cancel => {
                                log::debug!("session cancelled");
                                app.state = ScreenState::Terminated;
                            }
                            Key::Backspace => session.backspace(),
                            Key::Printable(c) => session.write(c),
                            Key::NoInput => {}
                        }
                    }
                } else {
                    app.state = ScreenState::Start;
                }
            }
            ScreenState::Complete => app.state = ScreenState::ReplayPrompt,
            ScreenState::ReplayPrompt => match keys.wait() {
                Key::Cancel => app.state = ScreenState::Terminated,
                _ => app.state = ScreenState::Start,
            },
            ScreenState::Terminated => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::TestKeySource;
    use ratatui::backend::TestBackend;
    use std::sync::mpsc;
    use std::time::Duration;

    fn single_passage_app(passage: &str) -> App {
        App::new(Corpus::from_passage(passage).unwrap())
    }

    fn run_with_keys(app: &mut App, events: Vec<Key>) {
        let (tx, rx) = mpsc::channel();
        for event in events {
            tx.send(event).unwrap();
        }
        // Dropping the sender makes any further wait() resolve to Cancel,
        // so the loop always terminates.
        drop(tx);

        let keys = TestKeySource::new(rx, Duration::from_millis(1));
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        run(&mut terminal, &keys, app).unwrap();
    }

    #[test]
    fn test_new_app_starts_on_welcome_screen() {
        let app = single_passage_app("cat");

        assert_eq!(app.state, ScreenState::Start);
        assert!(app.session.is_none());
    }

    #[test]
    fn test_begin_session_resets_everything() {
        let mut app = single_passage_app("cat");

        app.begin_session().unwrap();
        assert_eq!(app.state, ScreenState::Typing);

        let session = app.session.as_mut().unwrap();
        session.write('c');
        assert_eq!(session.typed().len(), 1);

        app.begin_session().unwrap();
        let session = app.session.as_ref().unwrap();
        assert!(session.typed().is_empty());
        assert_eq!(session.passage(), "cat");
    }

    #[test]
    fn test_full_session_reaches_completion() {
        let mut app = single_passage_app("cat");

        run_with_keys(
            &mut app,
            vec![
                Key::Printable(' '), // leave the welcome screen
                Key::Printable('c'),
                Key::Printable('a'),
                Key::Printable('t'),
            ],
        );

        assert_eq!(app.state, ScreenState::Terminated);
        let session = app.session.unwrap();
        assert!(session.is_complete());
        assert_eq!(session.typed().iter().collect::<String>(), "cat");
    }

    #[test]
    fn test_cancel_during_typing_skips_completion() {
        let mut app = single_passage_app("cat");

        run_with_keys(
            &mut app,
            vec![Key::Printable(' '), Key::Printable('c'), Key::Cancel],
        );

        assert_eq!(app.state, ScreenState::Terminated);
        let session = app.session.unwrap();
        assert!(!session.is_complete());
        assert_eq!(session.typed().iter().collect::<String>(), "c");
    }

    #[test]
    fn test_cancel_on_welcome_screen_quits() {
        let mut app = single_passage_app("cat");

        run_with_keys(&mut app, vec![Key::Cancel]);

        assert_eq!(app.state, ScreenState::Terminated);
        assert!(app.session.is_none());
    }

    #[test]
    fn test_replay_starts_a_fresh_session() {
        let mut app = single_passage_app("cat");

        run_with_keys(
            &mut app,
            vec![
                Key::Printable(' '),
                Key::Printable('c'),
                Key::Printable('a'),
                Key::Printable('t'),
                Key::Printable('r'), // replay from the completion screen
                Key::Printable(' '), // leave the welcome screen again
                Key::Cancel,         // cancel the second session
            ],
        );

        assert_eq!(app.state, ScreenState::Terminated);
        let session = app.session.unwrap();
        assert!(session.typed().is_empty());
        assert!(!session.is_complete());
    }

    #[test]
    fn test_backspace_events_reach_the_buffer() {
        let mut app = single_passage_app("ab");

        run_with_keys(
            &mut app,
            vec![
                Key::Printable(' '),
                Key::Printable('x'),
                Key::Backspace,
                Key::Printable('a'),
                Key::Cancel,
            ],
        );

        let session = app.session.unwrap();
        assert_eq!(session.typed().iter().collect::<String>(), "a");
    }
}
