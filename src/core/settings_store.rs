/*
 * This module persists `SyncSettings`. The settings live as pretty-printed JSON
 * in `<vault>/.vault-sync/data.json`; loading merges whatever the file holds
 * over the defaults, so a missing file or missing fields are not errors.
 *
 * It includes a trait for settings persistence (`SettingsStoreOperations`) so
 * the sync engine and the application logic can be tested with an in-memory
 * store, and the concrete file-backed implementation (`CoreSettingsStore`).
 */
use super::path_utils;
use super::settings::SyncSettings;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE_NAME: &str = "data.json";

#[derive(Debug)]
pub enum SettingsError {
    Io(io::Error),
    Serde(serde_json::Error),
    NoConfigDirectory(PathBuf),
}

impl From<io::Error> for SettingsError {
    fn from(err: io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Serde(err)
    }
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "Settings I/O error: {e}"),
            SettingsError::Serde(e) => write!(f, "Settings serialization error: {e}"),
            SettingsError::NoConfigDirectory(p) => {
                write!(f, "Could not create settings directory under {p:?}")
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Serde(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SettingsError>;

pub trait SettingsStoreOperations: Send + Sync {
    /* Loads the persisted settings merged over defaults. A missing file yields the defaults. */
    fn load(&self) -> Result<SyncSettings>;
    fn save(&self, settings: &SyncSettings) -> Result<()>;
}

pub struct CoreSettingsStore {
    vault_root: PathBuf,
}

impl CoreSettingsStore {
    pub fn new(vault_root: &Path) -> Self {
        CoreSettingsStore {
            vault_root: vault_root.to_path_buf(),
        }
    }

    pub fn settings_file_path(&self) -> PathBuf {
        self.vault_root
            .join(path_utils::VAULT_CONFIG_DIR_NAME)
            .join(SETTINGS_FILE_NAME)
    }
}

impl SettingsStoreOperations for CoreSettingsStore {
    fn load(&self) -> Result<SyncSettings> {
        let file_path = self.settings_file_path();
        log::trace!("CoreSettingsStore: Loading settings from {file_path:?}");
        if !file_path.exists() {
            log::debug!("CoreSettingsStore: No settings file at {file_path:?}, using defaults.");
            return Ok(SyncSettings::default());
        }

        let file = File::open(&file_path)?;
        let reader = BufReader::new(file);
        let mut settings: SyncSettings = serde_json::from_reader(reader)?;
        settings.normalize();
        log::debug!(
            "CoreSettingsStore: Loaded settings with {} selected files from {:?}.",
            settings.selected_files.len(),
            file_path
        );
        Ok(settings)
    }

    fn save(&self, settings: &SyncSettings) -> Result<()> {
        let config_dir = path_utils::ensure_vault_config_dir(&self.vault_root)
            .ok_or_else(|| SettingsError::NoConfigDirectory(self.vault_root.clone()))?;
        let file_path = config_dir.join(SETTINGS_FILE_NAME);

        let file = File::create(&file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, settings)?;
        writer.flush()?;
        log::debug!("CoreSettingsStore: Saved settings to {file_path:?}.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::FileTypeFilter;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_without_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let store = CoreSettingsStore::new(dir.path());
        let settings = store.load().unwrap();
        assert_eq!(settings, SyncSettings::default());
    }

    #[test]
    fn test_save_then_load_keeps_sync_times_and_selection() {
        let dir = tempdir().unwrap();
        let store = CoreSettingsStore::new(dir.path());
        let mut settings = SyncSettings::default();
        settings.destination_path = "/tmp/mirror".into();
        settings.selected_files = vec!["notes/a.md".into(), "b.png".into()];
        settings.last_sync_times.insert("notes/a.md".into(), 1_700_000_000_123);
        settings.file_type_filter = FileTypeFilter::Png;
        settings.collapsed_folders.insert("notes".into());

        store.save(&settings).unwrap();
        assert!(store.settings_file_path().is_file());

        let loaded = store.load().unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_merges_partial_file_and_drops_duplicates() {
        let dir = tempdir().unwrap();
        let store = CoreSettingsStore::new(dir.path());
        fs::create_dir_all(dir.path().join(path_utils::VAULT_CONFIG_DIR_NAME)).unwrap();
        fs::write(
            store.settings_file_path(),
            r#"{ "selectedFiles": ["a.md", "a.md", "b.md"], "allowSyncOutsideScope": true }"#,
        )
        .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.selected_files, vec!["a.md".to_string(), "b.md".to_string()]);
        assert!(loaded.allow_sync_outside_scope);
        assert_eq!(loaded.destination_path, "");
    }

    #[test]
    fn test_load_corrupt_file_is_serde_error() {
        let dir = tempdir().unwrap();
        let store = CoreSettingsStore::new(dir.path());
        fs::create_dir_all(dir.path().join(path_utils::VAULT_CONFIG_DIR_NAME)).unwrap();
        fs::write(store.settings_file_path(), "{ not json").unwrap();

        assert!(matches!(store.load(), Err(SettingsError::Serde(_))));
    }
}
