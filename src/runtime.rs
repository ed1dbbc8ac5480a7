use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A classified keystroke as the session controller sees it.
///
/// `NoInput` is a first-class value, not an error: it is what a non-blocking
/// poll returns when nothing is pending, and what unmapped keys collapse to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Printable(char),
    Backspace,
    Cancel,
    NoInput,
}

/// Source of keystrokes with two distinct capabilities: a tick-bounded poll
/// for the typing loop and a blocking wait for the screens where no clock is
/// running. The two are separate methods by design, never a mode flag.
pub trait KeySource {
    /// Return the next pending key, or `NoInput` once the tick interval has
    /// passed without one. Never blocks longer than a tick, never errors.
    fn poll(&self) -> Key;

    /// Block until a key arrives. If the underlying source is gone the
    /// result degrades to `Cancel` so the caller unwinds instead of hanging.
    fn wait(&self) -> Key;
}

/// Translate a terminal key event into a [`Key`].
pub fn map_key(key: KeyEvent) -> Key {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Key::Cancel,
        KeyCode::Esc => Key::Cancel,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Char(c) => Key::Printable(c),
        _ => Key::NoInput,
    }
}

/// Production key source: a reader thread feeds crossterm events through
/// [`map_key`] into a channel; the app side drains it with `recv_timeout`.
pub struct CrosstermKeySource {
    rx: Receiver<Key>,
    tick: Duration,
}

impl CrosstermKeySource {
    pub fn new(tick: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    // Release/repeat events would double every keystroke on
                    // terminals that report them.
                    if key.kind == KeyEventKind::Release {
                        continue;
                    }
                    if tx.send(map_key(key)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                // Transient read failures are not fatal; keep reading.
                Err(_) => continue,
            }
        });

        Self { rx, tick }
    }
}

impl KeySource for CrosstermKeySource {
    fn poll(&self) -> Key {
        // Timeout and disconnect both mean "nothing to act on this tick".
        self.rx.recv_timeout(self.tick).unwrap_or(Key::NoInput)
    }

    fn wait(&self) -> Key {
        self.rx.recv().unwrap_or(Key::Cancel)
    }
}

/// Channel-fed key source for headless tests.
pub struct TestKeySource {
    rx: Receiver<Key>,
    tick: Duration,
}

impl TestKeySource {
    pub fn new(rx: Receiver<Key>, tick: Duration) -> Self {
        Self { rx, tick }
    }
}

impl KeySource for TestKeySource {
    fn poll(&self) -> Key {
        self.rx.recv_timeout(self.tick).unwrap_or(Key::NoInput)
    }

    fn wait(&self) -> Key {
        self.rx.recv().unwrap_or(Key::Cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_map_printable() {
        assert_eq!(map_key(press(KeyCode::Char('a'))), Key::Printable('a'));
        assert_eq!(map_key(press(KeyCode::Char(' '))), Key::Printable(' '));
        assert_eq!(map_key(press(KeyCode::Char('!'))), Key::Printable('!'));
    }

    #[test]
    fn test_map_backspace() {
        assert_eq!(map_key(press(KeyCode::Backspace)), Key::Backspace);
    }

    #[test]
    fn test_map_cancel_keys() {
        assert_eq!(map_key(press(KeyCode::Esc)), Key::Cancel);
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Key::Cancel
        );
    }

    #[test]
    fn test_plain_c_is_printable() {
        assert_eq!(map_key(press(KeyCode::Char('c'))), Key::Printable('c'));
    }

    #[test]
    fn test_unmapped_keys_are_no_input() {
        assert_eq!(map_key(press(KeyCode::Left)), Key::NoInput);
        assert_eq!(map_key(press(KeyCode::Enter)), Key::NoInput);
        assert_eq!(map_key(press(KeyCode::F(1))), Key::NoInput);
    }

    #[test]
    fn test_poll_times_out_to_no_input() {
        let (_tx, rx) = mpsc::channel();
        let keys = TestKeySource::new(rx, Duration::from_millis(1));

        assert_eq!(keys.poll(), Key::NoInput);
    }

    #[test]
    fn test_poll_passes_through_pending_key() {
        let (tx, rx) = mpsc::channel();
        tx.send(Key::Printable('x')).unwrap();
        let keys = TestKeySource::new(rx, Duration::from_millis(10));

        assert_eq!(keys.poll(), Key::Printable('x'));
    }

    #[test]
    fn test_poll_on_disconnected_channel_is_no_input() {
        let (tx, rx) = mpsc::channel::<Key>();
        drop(tx);
        let keys = TestKeySource::new(rx, Duration::from_millis(1));

        assert_eq!(keys.poll(), Key::NoInput);
    }

    #[test]
    fn test_wait_on_disconnected_channel_is_cancel() {
        let (tx, rx) = mpsc::channel::<Key>();
        drop(tx);
        let keys = TestKeySource::new(rx, Duration::from_millis(1));

        assert_eq!(keys.wait(), Key::Cancel);
    }

    #[test]
    fn test_wait_returns_pending_key() {
        let (tx, rx) = mpsc::channel();
        tx.send(Key::Backspace).unwrap();
        let keys = TestKeySource::new(rx, Duration::from_millis(1));

        assert_eq!(keys.wait(), Key::Backspace);
    }
}
