use super::notices::{self, DEFAULT_TIMEOUT_MS, Notice, SHORT_TIMEOUT_MS};
use super::settings_panel;
use crate::core::{
    DestinationOperations, FileTypeFilter, SelectionStore, SettingsError,
    SettingsStoreOperations, SyncEngine, SyncOutcome, SyncReport, SyncSettings, VaultFile,
    VaultOperations, build_folder_tree, filter_files, selection,
};
use std::path::PathBuf;
use std::sync::Arc;

pub const APP_NAME: &str = "VaultSync";

/*
 * Processes the user's triggers (sync everything, sync the current file, edit
 * settings, edit the selection) in a front-end agnostic manner and answers
 * with the notices to show. It owns the loaded settings, the settings panel's
 * working selection, and the `SyncEngine`; collaborators are injected so the
 * whole flow can be driven by tests.
 */
pub struct VaultSyncApp {
    pub(crate) settings: SyncSettings,
    pub(crate) selection: SelectionStore,
    vault: Arc<dyn VaultOperations>,
    settings_store: Arc<dyn SettingsStoreOperations>,
    engine: SyncEngine,
}

impl VaultSyncApp {
    /*
     * Loads the persisted settings and seeds the working selection from them.
     * Settings that exist but cannot be read are an error: running on defaults
     * would overwrite the stored selection and sync times at the next save.
     */
    pub fn new(
        vault: Arc<dyn VaultOperations>,
        destination: Arc<dyn DestinationOperations>,
        settings_store: Arc<dyn SettingsStoreOperations>,
        log_file_path: PathBuf,
    ) -> Result<Self, SettingsError> {
        let settings = settings_store.load().inspect_err(|e| {
            log::error!("VaultSyncApp: Failed to load settings: {e}");
        })?;
        let selection = SelectionStore::new(&settings);
        let engine = SyncEngine::new(
            vault.clone(),
            destination,
            settings_store.clone(),
            log_file_path,
        );
        Ok(VaultSyncApp {
            settings,
            selection,
            vault,
            settings_store,
            engine,
        })
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    fn save_settings(&self) {
        if let Err(e) = self.settings_store.save(&self.settings) {
            log::error!("VaultSyncApp: Failed to save settings: {e}");
        }
    }

    fn log_file_name(&self) -> String {
        self.engine
            .log_file_path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.engine.log_file_path().display().to_string())
    }

    /* Per-file lines of a run; shown on the terminal with `--verbose`. */
    fn log_report(report: &SyncReport) {
        log::info!("VaultSyncApp: Sync run started at {}.", report.started_at);
        for (path, outcome) in &report.outcomes {
            match outcome {
                SyncOutcome::Synced { mtime } => {
                    log::info!("VaultSyncApp: synced {path} (mtime {mtime})")
                }
                SyncOutcome::Skipped => log::debug!("VaultSyncApp: unchanged {path}"),
                SyncOutcome::NotFound => log::info!("VaultSyncApp: not found {path}"),
                SyncOutcome::Errored(message) => {
                    log::info!("VaultSyncApp: failed {path}: {message}")
                }
            }
        }
    }

    /* The one-click icon and the "Sync selected files" command. */
    pub fn on_sync_all(&mut self) -> Vec<Notice> {
        log::debug!("VaultSyncApp: Sync of all selected files requested.");
        match self.engine.sync_all(&mut self.settings) {
            Ok(report) => {
                Self::log_report(&report);
                let log_file_name = report.log_written.then(|| self.log_file_name());
                vec![
                    Notice::new("Starting sync check...", DEFAULT_TIMEOUT_MS),
                    notices::run_summary(&report.summary, log_file_name.as_deref()),
                ]
            }
            Err(e) => {
                log::info!("VaultSyncApp: Sync not started: {e}");
                vec![Notice::advisory(&e)]
            }
        }
    }

    /* The "Sync current file" command. */
    pub fn on_sync_current_file(&mut self, active_file: Option<&str>) -> Vec<Notice> {
        let Some(path) = active_file else {
            return vec![Notice::new("No active file to sync", DEFAULT_TIMEOUT_MS)];
        };
        let name = VaultFile::new(path).name().to_string();
        match self.engine.sync_one(&mut self.settings, path) {
            Ok(SyncOutcome::Synced { .. }) => vec![Notice::new(
                format!("Successfully synced {name}!"),
                SHORT_TIMEOUT_MS,
            )],
            Ok(SyncOutcome::Skipped) => vec![Notice::new(
                format!("{name} is already up to date"),
                SHORT_TIMEOUT_MS,
            )],
            Ok(SyncOutcome::NotFound) => vec![Notice::new(
                format!("Failed to sync {name}: file not found in vault"),
                DEFAULT_TIMEOUT_MS,
            )],
            Ok(SyncOutcome::Errored(message)) => vec![Notice::new(
                format!("Failed to sync {name}: {message}"),
                DEFAULT_TIMEOUT_MS,
            )],
            Err(e) => vec![Notice::advisory(&e)],
        }
    }

    pub fn on_set_destination_path(&mut self, value: &str) {
        self.settings.destination_path = value.to_string();
        self.save_settings();
    }

    pub fn on_set_allow_sync_outside_scope(&mut self, allow: bool) {
        self.settings.allow_sync_outside_scope = allow;
        self.save_settings();
    }

    pub fn on_set_file_type_filter(&mut self, filter: FileTypeFilter) {
        self.settings.file_type_filter = filter;
        self.save_settings();
    }

    /* Vault files matching the current filter; an unreadable vault lists nothing. */
    pub fn filtered_files(&self) -> Vec<VaultFile> {
        match self.vault.list_files() {
            Ok(files) => filter_files(&files, self.settings.file_type_filter),
            Err(e) => {
                log::error!("VaultSyncApp: Failed to list vault files: {e}");
                Vec::new()
            }
        }
    }

    pub fn on_toggle_file(&mut self, path: &str) -> Vec<Notice> {
        if !self.filtered_files().iter().any(|f| f.path() == path) {
            return vec![Notice::new(
                format!("{path} is not in the file list"),
                DEFAULT_TIMEOUT_MS,
            )];
        }
        self.selection.toggle_file(path);
        Vec::new()
    }

    pub fn on_toggle_folder(&mut self, folder_path: &str) -> Vec<Notice> {
        let files = self.filtered_files();
        let tree = build_folder_tree(&files);
        match tree.find(folder_path).filter(|node| !node.is_root()) {
            Some(folder) => {
                self.selection.toggle_folder(folder);
                Vec::new()
            }
            None => vec![Notice::new(
                format!("{folder_path} is not a folder in the file list"),
                DEFAULT_TIMEOUT_MS,
            )],
        }
    }

    pub fn on_toggle_all(&mut self) {
        let files = self.filtered_files();
        self.selection.toggle_all(&files);
    }

    /* Collapse state is view state and is persisted straight away. */
    pub fn on_toggle_folder_collapsed(&mut self, folder_path: &str) {
        self.settings.toggle_folder_collapsed(folder_path);
        self.save_settings();
    }

    pub fn on_toggle_collapse_all(&mut self) {
        let files = self.filtered_files();
        selection::toggle_collapse_all(&mut self.settings, &files);
        self.save_settings();
    }

    /* The settings panel's Save button. */
    pub fn on_save_selection(&mut self) -> Vec<Notice> {
        self.selection.save(&mut self.settings);
        self.save_settings();
        vec![Notice::new("File selection saved", DEFAULT_TIMEOUT_MS)]
    }

    pub fn render_settings_panel(&self) -> String {
        settings_panel::render_panel(&self.settings, &self.selection, &self.filtered_files())
    }
}
