use std::time::Instant;

use crate::scoring::{self, Outcome};

/// One typing session: the target passage, what has been typed so far, and
/// the clock that started when the session did.
///
/// The typed buffer is owned exclusively here and only ever changes through
/// [`Session::write`] and [`Session::backspace`], which keep the invariant
/// `typed.len() <= char count of passage`.
#[derive(Debug)]
pub struct Session {
    passage: String,
    passage_len: usize,
    typed: Vec<char>,
    started_at: Instant,
    finished_at: Option<Instant>,
    keystrokes: usize,
    mistakes: usize,
}

impl Session {
    /// Start a session over `passage`; the clock starts now.
    pub fn new(passage: String) -> Self {
        let passage_len = passage.chars().count();
        log::debug!("session started, passage of {passage_len} chars");
        Self {
            passage,
            passage_len,
            typed: vec![],
            started_at: Instant::now(),
            finished_at: None,
            keystrokes: 0,
            mistakes: 0,
        }
    }

    pub fn passage(&self) -> &str {
        &self.passage
    }

    pub fn typed(&self) -> &[char] {
        &self.typed
    }

    pub fn char_count(&self) -> usize {
        self.passage_len
    }

    pub fn get_expected_char(&self, idx: usize) -> Option<char> {
        self.passage.chars().nth(idx)
    }

    /// Append one typed character. Input past the end of the passage is
    /// dropped without error; the buffer never outgrows the target.
    pub fn write(&mut self, c: char) {
        let idx = self.typed.len();
        if idx >= self.passage_len {
            return;
        }

        self.keystrokes += 1;
        if self.get_expected_char(idx) != Some(c) {
            self.mistakes += 1;
        }
        self.typed.push(c);
    }

    /// Remove the most recent character. A no-op on an empty buffer.
    pub fn backspace(&mut self) {
        self.typed.pop();
    }

    /// Seconds since the session clock started, frozen once [`finish`] has
    /// been called.
    ///
    /// [`finish`]: Session::finish
    pub fn elapsed_secs(&self) -> f64 {
        self.finished_at
            .unwrap_or_else(Instant::now)
            .duration_since(self.started_at)
            .as_secs_f64()
    }

    /// Pin the clock so the completion screen shows the final figures.
    pub fn finish(&mut self) {
        if self.finished_at.is_none() {
            self.finished_at = Some(Instant::now());
            log::debug!(
                "session finished: {} wpm, {} keystrokes, {} mistakes",
                self.wpm(),
                self.keystrokes,
                self.mistakes
            );
        }
    }

    pub fn wpm(&self) -> u64 {
        scoring::compute_wpm(self.typed.len(), self.elapsed_secs())
    }

    pub fn outcomes(&self) -> Vec<Outcome> {
        scoring::classify(&self.passage, &self.typed)
    }

    pub fn is_complete(&self) -> bool {
        scoring::is_complete(&self.passage, &self.typed)
    }

    /// Share of keystrokes that were correct when entered, as a rounded
    /// percentage. Corrected mistakes still count against this, unlike the
    /// live colouring which only sees the current buffer.
    pub fn accuracy(&self) -> u64 {
        if self.keystrokes == 0 {
            return 100;
        }
        let correct = self.keystrokes - self.mistakes;
        ((correct as f64 / self.keystrokes as f64) * 100.0).round() as u64
    }
}
