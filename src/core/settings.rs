use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

/*
 * Selects which vault files are listed in the settings panel.
 * Persisted as the plain strings the settings file has always used ("all",
 * ".md", ...). Unknown strings fall back to `All` so that a hand-edited or
 * newer settings file still loads.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FileTypeFilter {
    #[default]
    All,
    Markdown,
    Png,
    Jpeg,
    Pdf,
    Text,
}

impl FileTypeFilter {
    pub const ALL_CHOICES: [FileTypeFilter; 6] = [
        FileTypeFilter::All,
        FileTypeFilter::Markdown,
        FileTypeFilter::Png,
        FileTypeFilter::Jpeg,
        FileTypeFilter::Pdf,
        FileTypeFilter::Text,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileTypeFilter::All => "all",
            FileTypeFilter::Markdown => ".md",
            FileTypeFilter::Png => ".png",
            FileTypeFilter::Jpeg => ".jpg",
            FileTypeFilter::Pdf => ".pdf",
            FileTypeFilter::Text => ".txt",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileTypeFilter::All => "All files",
            FileTypeFilter::Markdown => "Markdown",
            FileTypeFilter::Png => "PNG images",
            FileTypeFilter::Jpeg => "JPEG images",
            FileTypeFilter::Pdf => "PDF documents",
            FileTypeFilter::Text => "Text",
        }
    }

    pub fn parse(value: &str) -> Option<FileTypeFilter> {
        Self::ALL_CHOICES
            .into_iter()
            .find(|choice| choice.as_str() == value)
    }

    /* Extension comparison is exact; "MD" does not match the Markdown filter. */
    pub fn matches_extension(&self, extension: &str) -> bool {
        match self {
            FileTypeFilter::All => true,
            other => other.as_str().trim_start_matches('.') == extension,
        }
    }
}

impl From<String> for FileTypeFilter {
    fn from(value: String) -> Self {
        FileTypeFilter::parse(&value).unwrap_or_else(|| {
            log::warn!("SyncSettings: Unknown file type filter '{value}', falling back to 'all'.");
            FileTypeFilter::All
        })
    }
}

impl From<FileTypeFilter> for String {
    fn from(filter: FileTypeFilter) -> Self {
        filter.as_str().to_string()
    }
}

impl fmt::Display for FileTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/*
 * The persisted state of the mirror: where files go, which files are
 * monitored, when each was last copied, and the settings panel's view state.
 * `#[serde(default)]` on the struct is what merges a partial settings file
 * over the defaults.
 */
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncSettings {
    pub destination_path: String,
    pub selected_files: Vec<String>,
    /* Vault path -> modification time (epoch milliseconds) of the version last copied. */
    pub last_sync_times: BTreeMap<String, u64>,
    pub file_type_filter: FileTypeFilter,
    pub collapsed_folders: BTreeSet<String>,
    pub allow_sync_outside_scope: bool,
}

impl SyncSettings {
    /*
     * Drops repeated entries from `selected_files`, keeping the first occurrence.
     * Called after loading so the rest of the code can treat the list as a set.
     */
    pub fn normalize(&mut self) {
        let mut seen = HashSet::new();
        let before = self.selected_files.len();
        self.selected_files.retain(|path| seen.insert(path.clone()));
        if self.selected_files.len() != before {
            log::debug!(
                "SyncSettings: Dropped {} duplicate selected file entries.",
                before - self.selected_files.len()
            );
        }
    }

    pub fn is_selected(&self, path: &str) -> bool {
        self.selected_files.iter().any(|p| p == path)
    }

    pub fn last_sync_time(&self, path: &str) -> u64 {
        self.last_sync_times.get(path).copied().unwrap_or(0)
    }

    pub fn is_folder_collapsed(&self, folder_path: &str) -> bool {
        self.collapsed_folders.contains(folder_path)
    }

    pub fn toggle_folder_collapsed(&mut self, folder_path: &str) {
        if !self.collapsed_folders.remove(folder_path) {
            self.collapsed_folders.insert(folder_path.to_string());
        }
    }
}
