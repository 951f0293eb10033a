//! Removal of generated files that rendered to nothing.

use crate::error::{Error, Result};
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// Returns true if `buf` holds no non-whitespace character.
pub fn is_only_whitespace(buf: &[u8]) -> bool {
    buf.iter().all(u8::is_ascii_whitespace)
}

/// Deletes `path` if its contents are empty or whitespace-only.
///
/// A file that cannot be read back is left alone: the failure is logged and
/// `Ok(false)` returned, so pruning never aborts a render.
///
/// # Returns
/// * `Result<bool>` - Whether the file was removed
///
/// # Errors
/// * `Error::PathError` if the file was found blank but could not be removed
pub fn prune<P: AsRef<Path>>(path: P) -> Result<bool> {
    let path = path.as_ref();
    let contents = match fs::read(path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!("Couldn't read back '{}' to check for blank output: {}", path.display(), e);
            return Ok(false);
        }
    };

    if !is_only_whitespace(&contents) {
        return Ok(false);
    }

    debug!("Removing blank file {}", path.display());
    fs::remove_file(path).map_err(|e| Error::path("remove", path, e))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_detection() {
        assert!(is_only_whitespace(b""));
        assert!(is_only_whitespace(b" \t\r\n\n"));
        assert!(!is_only_whitespace(b"  x  "));
        assert!(!is_only_whitespace("\u{a0}".as_bytes()));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(!prune(dir.path().join("gone.txt")).unwrap());
    }
}
