/*
 * This module provides utility functions for locating and creating the
 * directories the application writes to: the per-user local configuration
 * directory (diagnostic log) and the per-vault configuration directory
 * (settings file and sync error log). It also converts between on-disk paths
 * and the `/`-separated vault paths used everywhere else.
 */
use directories::ProjectDirs;
use std::fs;
use std::path::{Component, Path, PathBuf};

/* Name of the per-vault directory holding settings and the sync error log. */
pub const VAULT_CONFIG_DIR_NAME: &str = ".vault-sync";

/*
 * Retrieves the application's local configuration directory, creating it if
 * necessary. Returns `None` if the platform has no such directory or it could
 * not be created.
 */
pub fn get_base_app_config_local_dir(app_name: &str) -> Option<PathBuf> {
    log::trace!("PathUtils: Attempting to get base app config local dir for '{app_name}'");
    ProjectDirs::from("", "", app_name).and_then(|proj_dirs| {
        let config_path = proj_dirs.config_local_dir();
        if !config_path.exists() {
            if let Err(e) = fs::create_dir_all(config_path) {
                log::error!(
                    "PathUtils: Failed to create base app config directory {config_path:?}: {e}"
                );
                return None;
            }
            log::debug!("PathUtils: Created base app config directory: {config_path:?}");
        }
        Some(config_path.to_path_buf())
    })
}

/*
 * Returns `<vault_root>/.vault-sync`, creating it if it does not exist yet.
 */
pub fn ensure_vault_config_dir(vault_root: &Path) -> Option<PathBuf> {
    let config_dir = vault_root.join(VAULT_CONFIG_DIR_NAME);
    if !config_dir.exists() {
        if let Err(e) = fs::create_dir_all(&config_dir) {
            log::error!("PathUtils: Failed to create vault config dir {config_dir:?}: {e}");
            return None;
        }
        log::debug!("PathUtils: Created vault config directory: {config_dir:?}");
    }
    Some(config_dir)
}

/*
 * Converts a relative on-disk path to a vault path (`a/b/c.md`).
 * Returns `None` for anything that is not a plain chain of normal components.
 */
pub fn to_vault_path(relative: &Path) -> Option<String> {
    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_str()?.to_string()),
            _ => return None,
        }
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

/*
 * Joins a vault path onto `base`, one segment at a time.
 * Empty, `.` and `..` segments make the path unusable and yield `None`, as do
 * segments that the platform would interpret as roots or prefixes.
 */
pub fn join_vault_path(base: &Path, vault_path: &str) -> Option<PathBuf> {
    let mut joined = base.to_path_buf();
    for segment in vault_path.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return None;
        }
        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => joined.push(segment),
            _ => return None,
        }
    }
    Some(joined)
}
