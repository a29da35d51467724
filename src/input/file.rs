use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::input::LoadError;

/// Reads a UTF-8 text file for playback. Whitespace-only content is
/// rejected here so the deck can report it instead of loading an empty
/// session.
pub fn load_file(path: impl AsRef<Path>) -> Result<String, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            LoadError::FileNotFound(path.to_path_buf())
        } else {
            LoadError::Io(err)
        }
    })?;
    if text.trim().is_empty() {
        return Err(LoadError::EmptyText);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("glance-file-test-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_load_file_returns_contents() {
        let path = temp_path("ok.txt");
        fs::write(&path, "Hello world\nSecond line").unwrap();
        let text = load_file(&path).unwrap();
        assert_eq!(text, "Hello world\nSecond line");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_file_missing_file() {
        let path = temp_path("does-not-exist.txt");
        assert!(matches!(
            load_file(&path),
            Err(LoadError::FileNotFound(p)) if p == path
        ));
    }

    #[test]
    fn test_load_file_empty_file() {
        let path = temp_path("empty.txt");
        fs::write(&path, "").unwrap();
        assert!(matches!(load_file(&path), Err(LoadError::EmptyText)));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_file_whitespace_only_file() {
        let path = temp_path("blank.txt");
        fs::write(&path, "  \n\t\n").unwrap();
        assert!(matches!(load_file(&path), Err(LoadError::EmptyText)));
        let _ = fs::remove_file(&path);
    }
}
