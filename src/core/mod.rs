/*
 * This module consolidates the core, platform-agnostic logic of the application.
 * It re-exports the settings model, the collaborator abstractions
 * (`VaultOperations`, `DestinationOperations`, `SettingsStoreOperations`) with
 * their concrete implementations, the incremental `SyncEngine`, and the
 * selection bookkeeping behind the settings panel.
 */
pub mod destination;
pub mod folder_tree;
pub mod path_utils;
pub mod selection;
pub mod settings;
pub mod settings_store;
pub mod sync_engine;
pub mod sync_log;
pub mod vault;

#[cfg(test)]
pub mod mocks;

pub use destination::{CoreDestination, DestinationOperations};
pub use folder_tree::{FolderNode, build_folder_tree, filter_files};
pub use selection::SelectionStore;
pub use settings::{FileTypeFilter, SyncSettings};
pub use settings_store::{CoreSettingsStore, SettingsError, SettingsStoreOperations};
pub use sync_engine::{SyncEngine, SyncError, SyncOutcome, SyncReport, SyncSummary};
pub use vault::{CoreVault, VaultFile, VaultOperations};
