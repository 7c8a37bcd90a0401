/*
 * The folder hierarchy shown in the settings panel. It is derived from a flat
 * list of vault files every time it is needed and never stored; the functions
 * here are pure.
 */
use super::settings::FileTypeFilter;
use super::vault::VaultFile;
use std::collections::{BTreeMap, BTreeSet};

pub const ROOT_FOLDER_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq)]
pub struct FolderNode {
    pub path: String,
    pub name: String,
    /* Keyed by the child folder's full vault path. */
    pub children: BTreeMap<String, FolderNode>,
    /* Files directly inside this folder. */
    pub files: Vec<VaultFile>,
}

impl FolderNode {
    fn new(path: &str, name: &str) -> Self {
        FolderNode {
            path: path.to_string(),
            name: name.to_string(),
            children: BTreeMap::new(),
            files: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.path == ROOT_FOLDER_PATH
    }

    /* Every file in this folder and all of its subfolders. */
    pub fn all_files(&self) -> Vec<&VaultFile> {
        let mut files: Vec<&VaultFile> = self.files.iter().collect();
        for child in self.children.values() {
            files.extend(child.all_files());
        }
        files
    }

    pub fn all_file_paths(&self) -> Vec<String> {
        self.all_files()
            .into_iter()
            .map(|f| f.path().to_string())
            .collect()
    }

    /* Looks up a folder anywhere below (or at) this node by its vault path. */
    pub fn find(&self, folder_path: &str) -> Option<&FolderNode> {
        if self.path == folder_path {
            return Some(self);
        }
        self.children
            .values()
            .filter(|child| {
                folder_path == child.path || folder_path.starts_with(&format!("{}/", child.path))
            })
            .find_map(|child| child.find(folder_path))
    }

    pub fn sorted_children(&self) -> Vec<&FolderNode> {
        let mut children: Vec<&FolderNode> = self.children.values().collect();
        children.sort_by(|a, b| compare_names(&a.name, &b.name));
        children
    }

    pub fn sorted_files(&self) -> Vec<&VaultFile> {
        let mut files: Vec<&VaultFile> = self.files.iter().collect();
        files.sort_by(|a, b| compare_names(a.name(), b.name()));
        files
    }
}

/* Case-insensitive first, so "apple" sorts before "Banana"; exact order breaks ties. */
fn compare_names(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/* The vault files the settings panel lists for the given filter. */
pub fn filter_files(files: &[VaultFile], filter: FileTypeFilter) -> Vec<VaultFile> {
    files
        .iter()
        .filter(|f| filter.matches_extension(f.extension()))
        .cloned()
        .collect()
}

/*
 * Groups files under their chain of parent folders. The returned node is the
 * vault root (`/`); root-level files sit directly in it.
 */
pub fn build_folder_tree(files: &[VaultFile]) -> FolderNode {
    let mut root = FolderNode::new(ROOT_FOLDER_PATH, ROOT_FOLDER_PATH);

    for file in files {
        let mut current = &mut root;
        let mut current_path = String::new();
        if let Some(parent) = file.parent_path() {
            for part in parent.split('/') {
                if current_path.is_empty() {
                    current_path.push_str(part);
                } else {
                    current_path.push('/');
                    current_path.push_str(part);
                }
                current = current
                    .children
                    .entry(current_path.clone())
                    .or_insert_with(|| FolderNode::new(&current_path, part));
            }
        }
        current.files.push(file.clone());
    }

    root
}

/* The folders that directly contain at least one of `files`. */
pub fn folder_paths(files: &[VaultFile]) -> BTreeSet<String> {
    files
        .iter()
        .filter_map(|f| f.parent_path())
        .map(str::to_string)
        .collect()
}
