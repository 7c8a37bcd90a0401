// src/main.rs

mod app_logic;
mod cli;
mod core;

use crate::app_logic::{APP_NAME, Notice, VaultSyncApp};
use crate::cli::{Cli, Commands};
use crate::core::sync_log::SYNC_LOG_FILE_NAME;
use crate::core::{
    CoreDestination, CoreSettingsStore, CoreVault, FileTypeFilter, path_utils,
};
use clap::Parser;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::File;
use std::process::ExitCode;
use std::sync::Arc;

const DIAGNOSTIC_LOG_FILE_NAME: &str = "vault-sync.log";

/*
 * Sets up the diagnostic channel: warnings (or everything with `--verbose`) on
 * the terminal, and a debug-level log file in the per-user config directory
 * when one is available.
 */
fn initialize_logging(verbose: bool) {
    let term_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        term_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Some(config_dir) = path_utils::get_base_app_config_local_dir(APP_NAME) {
        let log_path = config_dir.join(DIAGNOSTIC_LOG_FILE_NAME);
        match File::create(&log_path) {
            Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file)),
            Err(e) => eprintln!("Could not create log file {log_path:?}: {e}"),
        }
    }

    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("Could not initialize logging: {e}");
    }
}

fn print_notices(notices: &[Notice]) {
    for notice in notices {
        println!("{notice}");
    }
}

/* Applies a selection edit, then shows the panel and commits unless previewing. */
fn finish_selection_edit(app: &mut VaultSyncApp, no_save: bool) {
    print!("{}", app.render_settings_panel());
    if !no_save && app.selection().has_unsaved_changes() {
        print_notices(&app.on_save_selection());
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    initialize_logging(cli.verbose);
    log::debug!("Starting {APP_NAME} for vault {:?}", cli.vault);

    if !cli.vault.is_dir() {
        eprintln!("Vault directory {:?} does not exist.", cli.vault);
        return ExitCode::FAILURE;
    }

    let log_file_path = path_utils::ensure_vault_config_dir(&cli.vault)
        .unwrap_or_else(|| cli.vault.join(path_utils::VAULT_CONFIG_DIR_NAME))
        .join(SYNC_LOG_FILE_NAME);
    let settings_store = CoreSettingsStore::new(&cli.vault);
    let settings_file_path = settings_store.settings_file_path();
    let mut app = match VaultSyncApp::new(
        Arc::new(CoreVault::new(&cli.vault)),
        Arc::new(CoreDestination::new()),
        Arc::new(settings_store),
        log_file_path,
    ) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Could not read settings from {settings_file_path:?}: {e}");
            eprintln!("Fix or remove the file and try again.");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Sync => print_notices(&app.on_sync_all()),
        Commands::SyncFile { path } => {
            print_notices(&app.on_sync_current_file(path.as_deref()))
        }
        Commands::SetDestination { path } => {
            app.on_set_destination_path(&path);
            println!("Destination path set to {}", app.settings().destination_path);
        }
        Commands::AllowOutsideScope { allow } => {
            app.on_set_allow_sync_outside_scope(allow);
            println!(
                "Allow syncing files outside monitored scope: {}",
                app.settings().allow_sync_outside_scope
            );
        }
        Commands::Filter { filter } => match FileTypeFilter::parse(&filter) {
            Some(parsed) => {
                app.on_set_file_type_filter(parsed);
                print!("{}", app.render_settings_panel());
            }
            None => {
                let choices: Vec<&str> = FileTypeFilter::ALL_CHOICES
                    .iter()
                    .map(|f| f.as_str())
                    .collect();
                eprintln!(
                    "Unknown filter '{filter}'. Choose one of: {}",
                    choices.join(", ")
                );
                return ExitCode::FAILURE;
            }
        },
        Commands::Tree => print!("{}", app.render_settings_panel()),
        Commands::ToggleFile { paths, no_save } => {
            for path in &paths {
                print_notices(&app.on_toggle_file(path));
            }
            finish_selection_edit(&mut app, no_save);
        }
        Commands::ToggleFolder { path, no_save } => {
            print_notices(&app.on_toggle_folder(&path));
            finish_selection_edit(&mut app, no_save);
        }
        Commands::ToggleAll { no_save } => {
            app.on_toggle_all();
            finish_selection_edit(&mut app, no_save);
        }
        Commands::Collapse { folder } => {
            app.on_toggle_folder_collapsed(&folder);
            print!("{}", app.render_settings_panel());
        }
        Commands::ToggleCollapseAll => {
            app.on_toggle_collapse_all();
            print!("{}", app.render_settings_panel());
        }
    }

    ExitCode::SUCCESS
}
