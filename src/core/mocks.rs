/*
 * In-memory implementations of the collaborator traits, shared by the unit
 * tests of the sync engine and of the application logic. Each mock records the
 * calls made against it and can be told to fail specific operations.
 */
use crate::core::destination::DestinationOperations;
use crate::core::settings::SyncSettings;
use crate::core::settings_store::{self, SettingsError, SettingsStoreOperations};
use crate::core::vault::{self, FileStat, VaultFile, VaultOperations};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub struct MockVault {
    files: Mutex<HashMap<String, (Vec<u8>, u64)>>,
    stat_failures: Mutex<HashSet<String>>,
    read_failures: Mutex<HashSet<String>>,
    /* Files that still resolve but are gone by the time they are stat'ed. */
    vanish_before_stat: Mutex<HashSet<String>>,
    /* Files whose mtime jumps by the given amount every time they are read. */
    touch_on_read: Mutex<HashMap<String, u64>>,
    read_calls: Mutex<Vec<String>>,
}

impl MockVault {
    pub fn new() -> Self {
        MockVault {
            files: Mutex::new(HashMap::new()),
            stat_failures: Mutex::new(HashSet::new()),
            read_failures: Mutex::new(HashSet::new()),
            vanish_before_stat: Mutex::new(HashSet::new()),
            touch_on_read: Mutex::new(HashMap::new()),
            read_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn add_file(&self, path: &str, content: &[u8], mtime: u64) {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), (content.to_vec(), mtime));
    }

    pub fn set_mtime(&self, path: &str, mtime: u64) {
        if let Some(entry) = self.files.lock().unwrap().get_mut(path) {
            entry.1 = mtime;
        }
    }

    pub fn remove_file(&self, path: &str) {
        self.files.lock().unwrap().remove(path);
    }

    pub fn fail_stat_for(&self, path: &str) {
        self.stat_failures.lock().unwrap().insert(path.to_string());
    }

    pub fn fail_read_for(&self, path: &str) {
        self.read_failures.lock().unwrap().insert(path.to_string());
    }

    pub fn vanish_before_stat(&self, path: &str) {
        self.vanish_before_stat
            .lock()
            .unwrap()
            .insert(path.to_string());
    }

    pub fn touch_on_read(&self, path: &str, delta: u64) {
        self.touch_on_read
            .lock()
            .unwrap()
            .insert(path.to_string(), delta);
    }

    pub fn mtime_of(&self, path: &str) -> Option<u64> {
        self.files.lock().unwrap().get(path).map(|(_, mtime)| *mtime)
    }

    pub fn get_read_calls(&self) -> Vec<String> {
        self.read_calls.lock().unwrap().clone()
    }
}

impl VaultOperations for MockVault {
    fn get_file(&self, path: &str) -> Option<VaultFile> {
        self.files
            .lock()
            .unwrap()
            .contains_key(path)
            .then(|| VaultFile::new(path))
    }

    fn read_binary(&self, file: &VaultFile) -> io::Result<Vec<u8>> {
        self.read_calls.lock().unwrap().push(file.path().to_string());
        if self.read_failures.lock().unwrap().contains(file.path()) {
            return Err(io::Error::new(io::ErrorKind::Other, "mock read failure"));
        }
        let mut files = self.files.lock().unwrap();
        let entry = files
            .get_mut(file.path())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "mock file vanished"))?;
        let content = entry.0.clone();
        if let Some(delta) = self.touch_on_read.lock().unwrap().get(file.path()) {
            entry.1 += delta;
        }
        Ok(content)
    }

    fn stat(&self, path: &str) -> io::Result<Option<FileStat>> {
        if self.stat_failures.lock().unwrap().contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "mock stat failure"));
        }
        if self.vanish_before_stat.lock().unwrap().contains(path) {
            return Ok(None);
        }
        Ok(self
            .files
            .lock()
            .unwrap()
            .get(path)
            .map(|(content, mtime)| FileStat {
                mtime: *mtime,
                size: content.len() as u64,
            }))
    }

    fn list_files(&self) -> vault::Result<Vec<VaultFile>> {
        let mut files: Vec<VaultFile> = self
            .files
            .lock()
            .unwrap()
            .keys()
            .map(VaultFile::new)
            .collect();
        files.sort();
        Ok(files)
    }
}

pub struct MockDestination {
    existing_dirs: Mutex<HashSet<PathBuf>>,
    written: Mutex<HashMap<PathBuf, Vec<u8>>>,
    write_calls: Mutex<Vec<PathBuf>>,
    create_dir_calls: Mutex<Vec<PathBuf>>,
    appended: Mutex<HashMap<PathBuf, String>>,
    fail_writes_under: Mutex<Vec<PathBuf>>,
    fail_appends: Mutex<bool>,
}

impl MockDestination {
    pub fn new() -> Self {
        MockDestination {
            existing_dirs: Mutex::new(HashSet::new()),
            written: Mutex::new(HashMap::new()),
            write_calls: Mutex::new(Vec::new()),
            create_dir_calls: Mutex::new(Vec::new()),
            appended: Mutex::new(HashMap::new()),
            fail_writes_under: Mutex::new(Vec::new()),
            fail_appends: Mutex::new(false),
        }
    }

    pub fn add_existing_dir(&self, path: &Path) {
        self.existing_dirs.lock().unwrap().insert(path.to_path_buf());
    }

    pub fn fail_writes_under(&self, path: &Path) {
        self.fail_writes_under
            .lock()
            .unwrap()
            .push(path.to_path_buf());
    }

    pub fn set_fail_appends(&self, fail: bool) {
        *self.fail_appends.lock().unwrap() = fail;
    }

    pub fn written_content(&self, path: &Path) -> Option<Vec<u8>> {
        self.written.lock().unwrap().get(path).cloned()
    }

    pub fn get_write_calls(&self) -> Vec<PathBuf> {
        self.write_calls.lock().unwrap().clone()
    }

    pub fn get_create_dir_calls(&self) -> Vec<PathBuf> {
        self.create_dir_calls.lock().unwrap().clone()
    }

    pub fn appended_text(&self, path: &Path) -> Option<String> {
        self.appended.lock().unwrap().get(path).cloned()
    }
}

impl DestinationOperations for MockDestination {
    fn exists(&self, path: &Path) -> bool {
        self.existing_dirs.lock().unwrap().contains(path)
            || self.written.lock().unwrap().contains_key(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.create_dir_calls
            .lock()
            .unwrap()
            .push(path.to_path_buf());
        let mut dirs = self.existing_dirs.lock().unwrap();
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                dirs.insert(ancestor.to_path_buf());
            }
        }
        Ok(())
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.write_calls.lock().unwrap().push(path.to_path_buf());
        if self
            .fail_writes_under
            .lock()
            .unwrap()
            .iter()
            .any(|prefix| path.starts_with(prefix))
        {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "mock write failure"));
        }
        let parent_exists = path
            .parent()
            .is_none_or(|parent| self.existing_dirs.lock().unwrap().contains(parent));
        if !parent_exists {
            return Err(io::Error::new(io::ErrorKind::NotFound, "mock parent missing"));
        }
        self.written
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn append_text(&self, path: &Path, text: &str) -> io::Result<()> {
        if *self.fail_appends.lock().unwrap() {
            return Err(io::Error::new(io::ErrorKind::Other, "mock append failure"));
        }
        self.appended
            .lock()
            .unwrap()
            .entry(path.to_path_buf())
            .or_default()
            .push_str(text);
        Ok(())
    }
}

pub struct MockSettingsStore {
    stored: Mutex<Option<SyncSettings>>,
    save_calls: Mutex<Vec<SyncSettings>>,
    fail_saves: Mutex<bool>,
    fail_loads: Mutex<bool>,
}

impl MockSettingsStore {
    pub fn new() -> Self {
        MockSettingsStore {
            stored: Mutex::new(None),
            save_calls: Mutex::new(Vec::new()),
            fail_saves: Mutex::new(false),
            fail_loads: Mutex::new(false),
        }
    }

    pub fn with_settings(settings: SyncSettings) -> Self {
        let store = Self::new();
        *store.stored.lock().unwrap() = Some(settings);
        store
    }

    pub fn set_fail_saves(&self, fail: bool) {
        *self.fail_saves.lock().unwrap() = fail;
    }

    pub fn set_fail_loads(&self, fail: bool) {
        *self.fail_loads.lock().unwrap() = fail;
    }

    pub fn get_save_calls(&self) -> Vec<SyncSettings> {
        self.save_calls.lock().unwrap().clone()
    }
}

impl SettingsStoreOperations for MockSettingsStore {
    fn load(&self) -> settings_store::Result<SyncSettings> {
        if *self.fail_loads.lock().unwrap() {
            return Err(SettingsError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                "mock load failure",
            )));
        }
        Ok(self.stored.lock().unwrap().clone().unwrap_or_default())
    }

    fn save(&self, settings: &SyncSettings) -> settings_store::Result<()> {
        self.save_calls.lock().unwrap().push(settings.clone());
        if *self.fail_saves.lock().unwrap() {
            return Err(SettingsError::Io(io::Error::new(
                io::ErrorKind::Other,
                "mock save failure",
            )));
        }
        *self.stored.lock().unwrap() = Some(settings.clone());
        Ok(())
    }
}
