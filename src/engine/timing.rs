//! Per-token delay model.
//!
//! Each token is shown for the nominal WPM-derived duration scaled by a
//! word-length multiplier, plus an extra pause when punctuation, a line
//! break, or a headline calls for one. When several pause triggers apply
//! at once the largest single one wins; they are never summed.

use std::time::Duration;

use crate::engine::token::Token;

/// Punctuation that closes a sentence and earns the full pause.
const SENTENCE_ENDINGS: [char; 3] = ['.', '!', '?'];

/// Punctuation that closes a clause and earns half a pause.
const CLAUSE_ENDINGS: [char; 3] = [',', ';', ':'];

/// Hyphen, en dash, and em dash endings earn three quarters of a pause.
const DASH_ENDINGS: [char; 3] = ['-', '\u{2013}', '\u{2014}'];

/// Computes how long `token` stays on screen.
///
/// `base = 60 / rate_wpm` seconds, scaled by the word-length multiplier,
/// plus the largest applicable extra pause. Callers are expected to keep
/// `rate_wpm` within sane bounds (the config clamps to 100-1000); the
/// result is always positive for a non-empty token.
pub fn delay_for(token: &Token, rate_wpm: u32, base_pause_ms: u32) -> Duration {
    let base_delay = 60.0 / f64::from(rate_wpm.max(1));
    let adjusted = base_delay * length_multiplier(token);
    let extra_ms = extra_pause_ms(token, base_pause_ms);
    Duration::from_secs_f64(adjusted + extra_ms / 1000.0)
}

/// Length multiplier over the text with non-alphanumeric characters
/// stripped. Sentence-ending tokens are pinned to 1.0 so the sentence
/// pause is added onto a full nominal duration, not a scaled one.
fn length_multiplier(token: &Token) -> f64 {
    if ends_with_any(&token.text, &SENTENCE_ENDINGS) {
        return 1.0;
    }
    let stripped_len = token
        .text
        .chars()
        .filter(|c| c.is_alphanumeric())
        .count();
    match stripped_len {
        0..=2 => 0.6,
        3 => 0.75,
        4..=5 => 1.0,
        6..=7 => 1.15,
        8..=10 => 1.3,
        _ => 1.5,
    }
}

/// The largest extra pause any single trigger earns, in milliseconds.
fn extra_pause_ms(token: &Token, base_pause_ms: u32) -> f64 {
    let base = f64::from(base_pause_ms);
    let triggers = [
        (token.forces_pause_after, base),
        (token.is_headline_start, base),
        (ends_with_any(&token.text, &SENTENCE_ENDINGS), base),
        (ends_with_any(&token.text, &CLAUSE_ENDINGS), base / 2.0),
        (
            ends_with_any(&token.text, &DASH_ENDINGS) || token.text.ends_with("..."),
            base * 0.75,
        ),
    ];
    triggers
        .iter()
        .filter(|(applies, _)| *applies)
        .map(|(_, pause)| *pause)
        .fold(0.0, f64::max)
}

fn ends_with_any(text: &str, endings: &[char]) -> bool {
    text.chars().last().map_or(false, |c| endings.contains(&c))
}
