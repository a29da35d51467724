//! Fixation point calculation.
//!
//! Words are horizontally shifted so that the fixation letter sits at a
//! fixed column, slightly left of the word's center, matching where the
//! eye naturally lands during a saccade. The index is chosen by word
//! length:
//! - 1 char → index 0
//! - 2-4 chars → index 1
//! - 5-8 chars → index 2
//! - longer → a third of the way in

/// Returns the 0-based char index of the fixation character for `word`.
///
/// Always a valid index for a non-empty word; returns 0 for the empty
/// string, which callers must not render.
pub fn fixation_index(word: &str) -> usize {
    let len = word.chars().count();
    match len {
        0..=1 => 0,
        2..=4 => 1,
        5..=8 => 2,
        _ => len / 3,
    }
}
