use super::path_utils;
use ignore::WalkBuilder;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/*
 * This module models the vault: the directory whose files are mirrored. It
 * defines the handle type handed around the rest of the application
 * (`VaultFile`), the metadata snapshot returned by a stat call (`FileStat`),
 * the trait `VaultOperations` abstracting vault access, and the directory
 * backed implementation `CoreVault`.
 *
 * All vault paths are relative and `/`-separated regardless of platform.
 */

#[derive(Debug)]
pub enum VaultError {
    Io(io::Error),
    WalkError(ignore::Error),
    InvalidRoot(PathBuf),
}

impl From<io::Error> for VaultError {
    fn from(err: io::Error) -> Self {
        VaultError::Io(err)
    }
}

impl From<ignore::Error> for VaultError {
    fn from(err: ignore::Error) -> Self {
        VaultError::WalkError(err)
    }
}

impl std::fmt::Display for VaultError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VaultError::Io(e) => write!(f, "I/O error: {e}"),
            VaultError::WalkError(e) => write!(f, "Vault traversal error: {e}"),
            VaultError::InvalidRoot(p) => write!(f, "Vault root is not a directory: {p:?}"),
        }
    }
}

impl std::error::Error for VaultError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VaultError::Io(e) => Some(e),
            VaultError::WalkError(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, VaultError>;

/*
 * A handle to a file in the vault. Only the vault path is stored; name,
 * extension and parent folder are derived from it.
 */
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VaultFile {
    path: String,
}

impl VaultFile {
    pub fn new(path: impl Into<String>) -> Self {
        VaultFile { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /* Text after the last dot of the name, empty when there is none (or only a leading dot). */
    pub fn extension(&self) -> &str {
        match self.name().rfind('.') {
            Some(idx) if idx > 0 => &self.name()[idx + 1..],
            _ => "",
        }
    }

    /* `None` for files at the vault root. */
    pub fn parent_path(&self) -> Option<&str> {
        self.path.rsplit_once('/').map(|(parent, _)| parent)
    }
}

/* Metadata for a vault file at the moment of the stat call. */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    /* Modification time in milliseconds since the Unix epoch. */
    pub mtime: u64,
    pub size: u64,
}

pub fn system_time_to_millis(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

pub trait VaultOperations: Send + Sync {
    /* Resolves a vault path to a handle, or `None` if no such file exists. */
    fn get_file(&self, path: &str) -> Option<VaultFile>;
    fn read_binary(&self, file: &VaultFile) -> io::Result<Vec<u8>>;
    /* `Ok(None)` when the file does not exist (any more). */
    fn stat(&self, path: &str) -> io::Result<Option<FileStat>>;
    /* Every file in the vault, sorted by path. */
    fn list_files(&self) -> Result<Vec<VaultFile>>;
}

/*
 * A vault rooted at a directory on disk. Hidden entries (names starting with
 * a dot, which includes the application's own `.vault-sync` directory) are not
 * part of the vault.
 */
pub struct CoreVault {
    root: PathBuf,
}

impl CoreVault {
    pub fn new(root: &Path) -> Self {
        CoreVault {
            root: root.to_path_buf(),
        }
    }

    /* Hidden paths resolve to nothing, matching what `list_files` enumerates. */
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        if path.split('/').any(|segment| segment.starts_with('.')) {
            return None;
        }
        path_utils::join_vault_path(&self.root, path)
    }
}

impl VaultOperations for CoreVault {
    fn get_file(&self, path: &str) -> Option<VaultFile> {
        let full_path = self.resolve(path)?;
        if full_path.is_file() {
            Some(VaultFile::new(path))
        } else {
            log::trace!("CoreVault: No file at vault path '{path}'.");
            None
        }
    }

    fn read_binary(&self, file: &VaultFile) -> io::Result<Vec<u8>> {
        let full_path = self.resolve(file.path()).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid vault path: {}", file.path()),
            )
        })?;
        fs::read(full_path)
    }

    fn stat(&self, path: &str) -> io::Result<Option<FileStat>> {
        let Some(full_path) = self.resolve(path) else {
            return Ok(None);
        };
        match fs::metadata(&full_path) {
            Ok(metadata) if metadata.is_file() => Ok(Some(FileStat {
                mtime: system_time_to_millis(metadata.modified()?),
                size: metadata.len(),
            })),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn list_files(&self) -> Result<Vec<VaultFile>> {
        if !self.root.is_dir() {
            return Err(VaultError::InvalidRoot(self.root.clone()));
        }
        log::debug!("CoreVault: Listing files under {:?}", self.root);

        let mut walker_builder = WalkBuilder::new(&self.root);
        walker_builder
            .standard_filters(false) // A vault is not a repository; ignore files do not apply.
            .hidden(true)
            .sort_by_file_path(|a, b| a.cmp(b));

        let mut files = Vec::new();
        for entry_result in walker_builder.build() {
            let entry = entry_result?;
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            match path_utils::to_vault_path(relative) {
                Some(vault_path) => files.push(VaultFile::new(vault_path)),
                None => log::warn!(
                    "CoreVault: Skipping {:?}, it has no valid vault path.",
                    entry.path()
                ),
            }
        }
        files.sort();
        log::debug!("CoreVault: Found {} files.", files.len());
        Ok(files)
    }
}
