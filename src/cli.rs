use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "vault-sync")]
#[command(about = "Mirror selected vault files to a destination directory", long_about = None)]
pub struct Cli {
    /// Vault directory to mirror from
    #[arg(long, default_value = ".")]
    pub vault: PathBuf,

    /// Log debug output to the terminal
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sync every selected file that changed since its last sync
    Sync,
    /// Sync a single file, given as a vault-relative path
    SyncFile { path: Option<String> },
    /// Set the directory files are mirrored into
    SetDestination { path: String },
    /// Allow or refuse `sync-file` for files outside the selection
    AllowOutsideScope {
        #[arg(action = clap::ArgAction::Set)]
        allow: bool,
    },
    /// Limit the file list to one type: all, .md, .png, .jpg, .pdf, .txt
    Filter { filter: String },
    /// Show the settings panel with the file tree
    Tree,
    /// Toggle the selection of one or more files
    ToggleFile {
        #[arg(required = true)]
        paths: Vec<String>,
        /// Preview the change without saving the selection
        #[arg(long)]
        no_save: bool,
    },
    /// Select every file in a folder, or deselect them if all are selected
    ToggleFolder {
        path: String,
        /// Preview the change without saving the selection
        #[arg(long)]
        no_save: bool,
    },
    /// Select every listed file, or deselect them if all are selected
    ToggleAll {
        /// Preview the change without saving the selection
        #[arg(long)]
        no_save: bool,
    },
    /// Collapse or expand a folder in the tree
    Collapse { folder: String },
    /// Collapse every folder, or expand them all if most are collapsed
    ToggleCollapseAll,
}
