/*
 * The incremental mirror. A file is copied when its live modification time is
 * strictly newer than the time recorded for its last copy; the recorded time is
 * always the one observed in that comparison, fixed before the bytes are read,
 * so a write racing with the copy is picked up again by the next run.
 *
 * `SyncEngine` performs whole-selection runs (`sync_all`) and single-file runs
 * (`sync_one`) against injected vault, destination and settings collaborators.
 * Failures of individual files are recorded and never stop a run; failures to
 * persist settings or to write the error log are only reported to the log
 * facade.
 */
use super::destination::DestinationOperations;
use super::path_utils;
use super::settings::SyncSettings;
use super::settings_store::SettingsStoreOperations;
use super::sync_log;
use super::vault::{VaultFile, VaultOperations};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use time::OffsetDateTime;

#[derive(Debug)]
pub enum SyncError {
    DestinationNotSet,
    DestinationMissing(PathBuf),
    NoFilesSelected,
    OutsideScope(String),
    FileNotFound,
    StatUnavailable(Option<io::Error>),
    ReadFailed(io::Error),
    CopyFailed { target: PathBuf, source: io::Error },
    LogWriteFailed(io::Error),
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::DestinationNotSet => {
                write!(f, "Please set a destination path in settings first")
            }
            SyncError::DestinationMissing(p) => {
                write!(f, "Destination path does not exist: {}", p.display())
            }
            SyncError::NoFilesSelected => {
                write!(f, "No files selected. Please select files in settings first")
            }
            SyncError::OutsideScope(path) => write!(
                f,
                "{path} is not in the monitored scope. Enable \"allow syncing files outside monitored scope\" in settings to override."
            ),
            SyncError::FileNotFound => write!(f, "file not found in vault"),
            SyncError::StatUnavailable(Some(e)) => write!(f, "could not get file stats: {e}"),
            SyncError::StatUnavailable(None) => write!(f, "could not get file stats"),
            SyncError::ReadFailed(e) => write!(f, "could not read file: {e}"),
            SyncError::CopyFailed { target, source } => {
                write!(f, "could not write {}: {source}", target.display())
            }
            SyncError::LogWriteFailed(e) => write!(f, "could not write sync log: {e}"),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::StatUnavailable(Some(e)) => Some(e),
            SyncError::ReadFailed(e) => Some(e),
            SyncError::CopyFailed { source, .. } => Some(source),
            SyncError::LogWriteFailed(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

/* What happened to one file during a run. */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Synced { mtime: u64 },
    Skipped,
    NotFound,
    Errored(String),
}

/*
 * Counts for a run plus the failure lines, in processing order.
 * `NotFound` outcomes count as failures.
 */
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub synced: usize,
    pub skipped: usize,
    pub errored: usize,
    pub errors: Vec<String>,
}

impl SyncSummary {
    pub fn record(&mut self, path: &str, outcome: &SyncOutcome) {
        match outcome {
            SyncOutcome::Synced { .. } => self.synced += 1,
            SyncOutcome::Skipped => self.skipped += 1,
            SyncOutcome::NotFound => {
                self.errored += 1;
                self.errors
                    .push(format!("{path}: {}", SyncError::FileNotFound));
            }
            SyncOutcome::Errored(message) => {
                self.errored += 1;
                self.errors.push(format!("{path}: {message}"));
            }
        }
    }

    pub fn summary_line(&self) -> String {
        format!(
            "{} succeeded, {} skipped, {} failed",
            self.synced, self.skipped, self.errored
        )
    }
}

#[derive(Debug, Clone)]
pub struct SyncReport {
    pub started_at: String,
    pub outcomes: Vec<(String, SyncOutcome)>,
    pub summary: SyncSummary,
    /* True when a failure block was appended to the sync log. */
    pub log_written: bool,
}

pub struct SyncEngine {
    vault: Arc<dyn VaultOperations>,
    destination: Arc<dyn DestinationOperations>,
    settings_store: Arc<dyn SettingsStoreOperations>,
    log_file_path: PathBuf,
}

impl SyncEngine {
    pub fn new(
        vault: Arc<dyn VaultOperations>,
        destination: Arc<dyn DestinationOperations>,
        settings_store: Arc<dyn SettingsStoreOperations>,
        log_file_path: PathBuf,
    ) -> Self {
        SyncEngine {
            vault,
            destination,
            settings_store,
            log_file_path,
        }
    }

    pub fn log_file_path(&self) -> &Path {
        &self.log_file_path
    }

    fn check_destination(&self, settings: &SyncSettings) -> Result<PathBuf> {
        let trimmed = settings.destination_path.trim();
        if trimmed.is_empty() {
            return Err(SyncError::DestinationNotSet);
        }
        let root = PathBuf::from(trimmed);
        if !self.destination.exists(&root) {
            return Err(SyncError::DestinationMissing(root));
        }
        Ok(root)
    }

    /*
     * Mirrors every stale file of the selection. Configuration problems abort
     * before any I/O; everything else is recorded per file. Settings are
     * persisted once at the end if anything was copied, and a failure block is
     * appended to the sync log if anything failed.
     */
    pub fn sync_all(&self, settings: &mut SyncSettings) -> Result<SyncReport> {
        let destination_root = self.check_destination(settings)?;
        if settings.selected_files.is_empty() {
            return Err(SyncError::NoFilesSelected);
        }

        let started_at = sync_log::format_timestamp(OffsetDateTime::now_utc());
        log::info!(
            "SyncEngine: Starting sync of {} selected files to {:?}.",
            settings.selected_files.len(),
            destination_root
        );

        let selected = settings.selected_files.clone();
        let mut summary = SyncSummary::default();
        let mut outcomes = Vec::with_capacity(selected.len());
        for path in selected {
            let outcome = self.sync_file(settings, &destination_root, &path);
            summary.record(&path, &outcome);
            outcomes.push((path, outcome));
        }

        if summary.synced > 0 {
            self.persist(settings);
        }

        let mut log_written = false;
        if summary.errored > 0 {
            let block =
                sync_log::format_run_block(&started_at, &summary.errors, &summary.summary_line());
            match self.append_run_log(&block) {
                Ok(()) => log_written = true,
                Err(e) => log::error!("SyncEngine: {e}"),
            }
        }

        log::info!("SyncEngine: Sync finished: {}.", summary.summary_line());
        Ok(SyncReport {
            started_at,
            outcomes,
            summary,
            log_written,
        })
    }

    /*
     * Mirrors one explicitly named file, typically the one being edited.
     * Files outside the selection are refused unless the settings allow it.
     * Settings are persisted right away when the file was copied.
     */
    pub fn sync_one(&self, settings: &mut SyncSettings, path: &str) -> Result<SyncOutcome> {
        let destination_root = self.check_destination(settings)?;
        if !settings.allow_sync_outside_scope && !settings.is_selected(path) {
            return Err(SyncError::OutsideScope(path.to_string()));
        }

        let outcome = self.sync_file(settings, &destination_root, path);
        if matches!(outcome, SyncOutcome::Synced { .. }) {
            self.persist(settings);
        }
        Ok(outcome)
    }

    /* One iteration of a run: resolve, stat, compare, copy. */
    fn sync_file(
        &self,
        settings: &mut SyncSettings,
        destination_root: &Path,
        path: &str,
    ) -> SyncOutcome {
        let Some(file) = self.vault.get_file(path) else {
            log::warn!("SyncEngine: Selected file '{path}' not found in vault.");
            return SyncOutcome::NotFound;
        };

        let stat = match self.vault.stat(file.path()) {
            Ok(Some(stat)) => stat,
            Ok(None) => return Self::errored(path, SyncError::StatUnavailable(None)),
            Err(e) => return Self::errored(path, SyncError::StatUnavailable(Some(e))),
        };

        let last_sync_time = settings.last_sync_time(path);
        if stat.mtime <= last_sync_time {
            log::trace!(
                "SyncEngine: '{path}' unchanged (mtime {} <= {last_sync_time}).",
                stat.mtime
            );
            return SyncOutcome::Skipped;
        }

        match self.perform_file_sync(settings, destination_root, &file, stat.mtime) {
            Ok(()) => SyncOutcome::Synced { mtime: stat.mtime },
            Err(e) => Self::errored(path, e),
        }
    }

    fn errored(path: &str, error: SyncError) -> SyncOutcome {
        log::warn!("SyncEngine: Failed to sync '{path}': {error}");
        SyncOutcome::Errored(error.to_string())
    }

    /*
     * Copies `file` to `<destination_root>/<vault path>` and records
     * `mtime_to_record` as its last sync time once the write succeeded.
     * Existing files at the destination are overwritten.
     */
    pub(crate) fn perform_file_sync(
        &self,
        settings: &mut SyncSettings,
        destination_root: &Path,
        file: &VaultFile,
        mtime_to_record: u64,
    ) -> Result<()> {
        let content = self.vault.read_binary(file).map_err(SyncError::ReadFailed)?;

        let target = path_utils::join_vault_path(destination_root, file.path()).ok_or_else(|| {
            SyncError::CopyFailed {
                target: destination_root.to_path_buf(),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("invalid vault path '{}'", file.path()),
                ),
            }
        })?;

        if let Some(parent) = target.parent()
            && !self.destination.exists(parent)
        {
            self.destination
                .create_dir_all(parent)
                .map_err(|source| SyncError::CopyFailed {
                    target: parent.to_path_buf(),
                    source,
                })?;
        }

        self.destination
            .write(&target, &content)
            .map_err(|source| SyncError::CopyFailed {
                target: target.clone(),
                source,
            })?;

        settings
            .last_sync_times
            .insert(file.path().to_string(), mtime_to_record);
        log::debug!(
            "SyncEngine: Copied '{}' ({} bytes) to {:?}.",
            file.path(),
            content.len(),
            target
        );
        Ok(())
    }

    fn persist(&self, settings: &SyncSettings) {
        if let Err(e) = self.settings_store.save(settings) {
            log::error!("SyncEngine: Failed to persist settings after sync: {e}");
        }
    }

    fn append_run_log(&self, block: &str) -> Result<()> {
        self.destination
            .append_text(&self.log_file_path, block)
            .map_err(SyncError::LogWriteFailed)
    }
}
