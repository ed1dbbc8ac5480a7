//! Pure scoring: live wpm, per-character correctness, completion.
//!
//! Everything here is a function of its arguments so the hot loop can call
//! it every tick and tests can pin the exact numbers.

/// How a typed character compares against the target at its position.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// Words-per-minute for `typed_len` characters over `elapsed_secs`.
///
/// Elapsed time is clamped to a minimum of one second, and a "word" is the
/// usual five characters: `round((typed_len / (elapsed/60)) / 5)`.
pub fn compute_wpm(typed_len: usize, elapsed_secs: f64) -> u64 {
    let elapsed = elapsed_secs.max(1.0);
    ((typed_len as f64 / (elapsed / 60.0)) / 5.0).round() as u64
}

/// Compare `typed` position-by-position against `target`.
///
/// The result always has exactly `typed.len()` entries. A position past the
/// end of the target counts as `Incorrect`; the session's buffer bound keeps
/// that from happening in practice.
pub fn classify(target: &str, typed: &[char]) -> Vec<Outcome> {
    let target: Vec<char> = target.chars().collect();
    typed
        .iter()
        .enumerate()
        .map(|(idx, c)| match target.get(idx) {
            Some(expected) if expected == c => Outcome::Correct,
            _ => Outcome::Incorrect,
        })
        .collect()
}

/// True iff `typed` reproduces `target` exactly, same length and order.
pub fn is_complete(target: &str, typed: &[char]) -> bool {
    typed.len() == target.chars().count() && typed.iter().copied().eq(target.chars())
}
