//! Command parsing for the TUI command deck.
//!
//! The deck accepts:
//! - `:q` / `:quit` and `:h` / `:help`
//! - `:w N` / `:wpm N` and `:p N` / `:pause N` for the live settings
//! - `@path` to read a text file, `@@` to read the clipboard
//! - any other non-empty input is read as the text itself

use crate::app::AppEvent;

/// Commands that can be parsed from command deck input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    SetWpm(u32),
    SetPause(u32),
    LoadFile(String),
    LoadClipboard,
    ReadText(String),
    Invalid(String),
    None,
}

/// Parse one deck input line into a Command.
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    if input.is_empty() {
        return Command::None;
    }

    if let Some(cmd) = input.strip_prefix(':') {
        let mut parts = cmd.split_whitespace();
        return match (parts.next(), parts.next()) {
            (Some("q") | Some("quit"), _) => Command::Quit,
            (Some("h") | Some("help"), _) => Command::Help,
            (Some("w") | Some("wpm"), Some(arg)) => match arg.parse() {
                Ok(wpm) => Command::SetWpm(wpm),
                Err(_) => Command::Invalid(input.to_string()),
            },
            (Some("p") | Some("pause"), Some(arg)) => match arg.parse() {
                Ok(pause_ms) => Command::SetPause(pause_ms),
                Err(_) => Command::Invalid(input.to_string()),
            },
            _ => Command::Invalid(input.to_string()),
        };
    }

    if let Some(rest) = input.strip_prefix('@') {
        let path = rest.trim();
        return if path.is_empty() || path == "@" {
            Command::LoadClipboard
        } else {
            Command::LoadFile(path.to_string())
        };
    }

    Command::ReadText(input.to_string())
}

/// Convert a parsed command into an AppEvent.
///
/// This is the translation layer between deck input and the app core.
pub fn command_to_app_event(command: Command) -> AppEvent {
    match command {
        Command::Quit => AppEvent::Quit,
        Command::Help => AppEvent::Help,
        Command::SetWpm(wpm) => AppEvent::SetWpm(wpm),
        Command::SetPause(pause_ms) => AppEvent::SetPause(pause_ms),
        Command::LoadFile(path) => AppEvent::LoadFile(path),
        Command::LoadClipboard => AppEvent::LoadClipboard,
        Command::ReadText(text) => AppEvent::ReadText(text),
        Command::Invalid(input) => AppEvent::Invalid(input),
        Command::None => AppEvent::None,
    }
}
