/*
 * Filesystem access outside the vault: the mirror destination and the sync
 * error log. Kept behind `DestinationOperations` so the sync engine can be
 * tested against an in-memory destination that records writes or fails on
 * demand.
 */
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

pub trait DestinationOperations: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
    /* Recursive and idempotent. */
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
    /* Replaces any existing file at `path`. */
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
    /* Creates the file if needed. */
    fn append_text(&self, path: &Path, text: &str) -> io::Result<()>;
}

pub struct CoreDestination {}

impl CoreDestination {
    pub fn new() -> Self {
        CoreDestination {}
    }
}

impl Default for CoreDestination {
    fn default() -> Self {
        Self::new()
    }
}

impl DestinationOperations for CoreDestination {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        log::trace!("CoreDestination: Writing {} bytes to {path:?}", contents.len());
        fs::write(path, contents)
    }

    fn append_text(&self, path: &Path, text: &str) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(text.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_overwrites_existing_file() -> io::Result<()> {
        let dir = tempdir()?;
        let destination = CoreDestination::new();
        let target = dir.path().join("note.md");

        destination.write(&target, b"first version, longer")?;
        destination.write(&target, b"second")?;

        assert_eq!(fs::read(&target)?, b"second");
        Ok(())
    }

    #[test]
    fn test_create_dir_all_is_idempotent() -> io::Result<()> {
        let dir = tempdir()?;
        let destination = CoreDestination::new();
        let nested = dir.path().join("a").join("b").join("c");

        destination.create_dir_all(&nested)?;
        destination.create_dir_all(&nested)?;

        assert!(destination.exists(&nested));
        Ok(())
    }

    #[test]
    fn test_append_text_accumulates() -> io::Result<()> {
        let dir = tempdir()?;
        let destination = CoreDestination::new();
        let log_path = dir.path().join("sync-errors.log");
        assert!(!destination.exists(&log_path));

        destination.append_text(&log_path, "one\n")?;
        destination.append_text(&log_path, "two\n")?;

        assert_eq!(fs::read_to_string(&log_path)?, "one\ntwo\n");
        Ok(())
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let destination = CoreDestination::new();
        let result = destination.write(&dir.path().join("missing").join("x.md"), b"x");
        assert!(result.is_err());
    }
}
