/*
 * This module provides the application logic layer, centered around
 * `VaultSyncApp` which acts as the presenter between the user's triggers and
 * the core. It also includes the notice wording and the plain-text settings
 * panel. Unit tests for `VaultSyncApp` are in `handler_tests.rs`.
 */
pub mod handler;
pub mod notices;
pub mod settings_panel;


pub use handler::{APP_NAME, VaultSyncApp};
pub use notices::Notice;
