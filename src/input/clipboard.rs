use arboard::Clipboard;

use crate::input::LoadError;

/// Captures the clipboard's current text contents, rejecting
/// whitespace-only captures the same way file loading does.
pub fn load_clipboard() -> Result<String, LoadError> {
    let mut clipboard = Clipboard::new().map_err(|err| LoadError::Clipboard(err.to_string()))?;
    let text = clipboard
        .get_text()
        .map_err(|err| LoadError::Clipboard(err.to_string()))?;
    if text.trim().is_empty() {
        return Err(LoadError::EmptyText);
    }
    Ok(text)
}
