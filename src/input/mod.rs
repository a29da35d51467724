//! Text acquisition: files and the clipboard. Typed text arrives
//! through the command deck and needs no provider.

use std::path::PathBuf;

use thiserror::Error;

pub mod clipboard;
pub mod file;

pub use clipboard::load_clipboard;
pub use file::load_file;

/// Why a text source produced nothing readable. Surfaced as a deck
/// status line, never a crash.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("could not read file: {0}")]
    Io(#[source] std::io::Error),

    #[error("the source contains no readable text")]
    EmptyText,

    #[error("clipboard error: {0}")]
    Clipboard(String),
}
