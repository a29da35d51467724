//! Splits raw text into display tokens.
//!
//! Lines are processed independently: each non-empty line contributes one
//! token per whitespace-separated word, the line's last word carries the
//! line-break pause, and short lines that read like titles mark their
//! first word as a headline. Empty lines contribute nothing.

use crate::engine::token::Token;

/// Maximum word count for a line to qualify as a headline.
const HEADLINE_MAX_WORDS: usize = 8;

/// Punctuation that disqualifies a line's last word from headline status.
const TERMINAL_PUNCTUATION: [char; 4] = ['.', '!', '?', ','];

/// Tokenizes `text` line by line. Pure and deterministic: the same input
/// always yields the same sequence. Empty or whitespace-only input yields
/// an empty sequence.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();

    for line in text.lines() {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        let headline = is_headline(line, &words);
        let last = words.len() - 1;
        for (i, word) in words.iter().enumerate() {
            tokens.push(Token {
                text: (*word).to_string(),
                forces_pause_after: i == last,
                is_headline_start: headline && i == 0,
            });
        }
    }

    // No rendered line break follows the very last token
    if let Some(token) = tokens.last_mut() {
        token.forces_pause_after = false;
    }

    tokens
}

/// A line reads like a headline when it is short and either its last word
/// lacks terminal punctuation or the whole line is shouted in uppercase.
fn is_headline(line: &str, words: &[&str]) -> bool {
    if words.len() > HEADLINE_MAX_WORDS {
        return false;
    }
    let last_word = words[words.len() - 1];
    let ends_terminal = last_word
        .chars()
        .last()
        .map_or(false, |c| TERMINAL_PUNCTUATION.contains(&c));
    !ends_terminal || is_all_uppercase(line)
}

/// True when the line has at least one cased character and none of them
/// are lowercase.
fn is_all_uppercase(line: &str) -> bool {
    let mut has_cased = false;
    for c in line.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}
