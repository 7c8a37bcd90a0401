/*
 * This module holds the settings panel's working copy of the file selection.
 * Toggles only touch the working copy and raise the unsaved-changes flag; the
 * persisted selection changes when `save` commits the working copy into the
 * settings. Folder collapse state is not part of the working copy: it lives in
 * the settings and is changed (and persisted by the caller) immediately.
 */
use super::folder_tree::{self, FolderNode};
use super::settings::SyncSettings;
use super::vault::VaultFile;
use std::collections::HashSet;

/* Tri-state checkbox value for a folder, or two-state for a file. */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Unchecked,
    Checked,
    /* Some, but not all, of the folder's files are selected. */
    Indeterminate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionStore {
    working: Vec<String>,
    has_unsaved_changes: bool,
}

impl SelectionStore {
    pub fn new(settings: &SyncSettings) -> Self {
        SelectionStore {
            working: settings.selected_files.clone(),
            has_unsaved_changes: false,
        }
    }

    pub fn is_selected(&self, path: &str) -> bool {
        self.working.iter().any(|p| p == path)
    }

    pub fn selected_count(&self) -> usize {
        self.working.len()
    }

    #[cfg(test)]
    pub fn selected_files(&self) -> &[String] {
        &self.working
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    fn set_membership(&mut self, paths: &[String], selected: bool) {
        if selected {
            for path in paths {
                if !self.is_selected(path) {
                    self.working.push(path.clone());
                }
            }
        } else {
            let removed: HashSet<&String> = paths.iter().collect();
            self.working.retain(|p| !removed.contains(p));
        }
        self.has_unsaved_changes = true;
    }

    pub fn toggle_file(&mut self, path: &str) {
        let selected = !self.is_selected(path);
        self.set_membership(&[path.to_string()], selected);
    }

    /*
     * Checked when every path is selected, Indeterminate for a non-empty proper
     * subset, Unchecked otherwise (including an empty path list).
     */
    pub fn check_state_for(&self, paths: &[String]) -> CheckState {
        let selected = paths.iter().filter(|p| self.is_selected(p)).count();
        if paths.is_empty() || selected == 0 {
            CheckState::Unchecked
        } else if selected == paths.len() {
            CheckState::Checked
        } else {
            CheckState::Indeterminate
        }
    }

    pub fn folder_check_state(&self, folder: &FolderNode) -> CheckState {
        self.check_state_for(&folder.all_file_paths())
    }

    /*
     * Clicking a folder checkbox: a fully selected folder is deselected,
     * anything else (unchecked or indeterminate) becomes fully selected.
     * Applies to every file below the folder.
     */
    pub fn toggle_folder(&mut self, folder: &FolderNode) {
        let paths = folder.all_file_paths();
        let select = self.check_state_for(&paths) != CheckState::Checked;
        log::debug!(
            "SelectionStore: {} {} files under '{}'.",
            if select { "Selecting" } else { "Deselecting" },
            paths.len(),
            folder.path
        );
        self.set_membership(&paths, select);
    }

    pub fn all_selected(&self, files: &[VaultFile]) -> bool {
        !files.is_empty() && files.iter().all(|f| self.is_selected(f.path()))
    }

    /*
     * The bulk "Select all" / "Deselect all" button. It only covers `files`,
     * the currently filtered list; selections outside it are left alone.
     */
    pub fn toggle_all(&mut self, files: &[VaultFile]) {
        let paths: Vec<String> = files.iter().map(|f| f.path().to_string()).collect();
        let select = !self.all_selected(files);
        self.set_membership(&paths, select);
    }

    pub fn save(&mut self, settings: &mut SyncSettings) {
        settings.selected_files = self.working.clone();
        self.has_unsaved_changes = false;
    }
}

/*
 * The expand/collapse-all button shows "Expand" when more than half of the
 * folders holding filtered files are collapsed.
 */
pub fn is_mostly_collapsed(settings: &SyncSettings, files: &[VaultFile]) -> bool {
    let total_folders = folder_tree::folder_paths(files).len();
    settings.collapsed_folders.len() * 2 > total_folders
}

/* Expands everything if mostly collapsed, otherwise collapses every folder holding `files`. */
pub fn toggle_collapse_all(settings: &mut SyncSettings, files: &[VaultFile]) {
    if is_mostly_collapsed(settings, files) {
        settings.collapsed_folders.clear();
    } else {
        settings.collapsed_folders = folder_tree::folder_paths(files);
    }
}
