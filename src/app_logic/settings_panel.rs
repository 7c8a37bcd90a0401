/*
 * Plain-text rendition of the settings panel: the configuration fields, the
 * two bulk buttons, the selection status line and the file tree with
 * tri-state checkboxes. Everything here is recomputed from the current state
 * on each render.
 */
use crate::core::selection::{self, CheckState, SelectionStore};
use crate::core::{FolderNode, SyncSettings, VaultFile, build_folder_tree};

const INDENT: &str = "  ";
const COLLAPSED_MARKER: &str = "▶";
const EXPANDED_MARKER: &str = "▼";

fn checkbox(state: CheckState) -> &'static str {
    match state {
        CheckState::Unchecked => "[ ]",
        CheckState::Checked => "[x]",
        CheckState::Indeterminate => "[-]",
    }
}

pub fn status_line(selected_count: usize, total_count: usize, unsaved: bool) -> String {
    if unsaved {
        format!("Selected: {selected_count} / {total_count} files (unsaved changes)")
    } else {
        format!("Selected: {selected_count} / {total_count} files")
    }
}

pub fn select_toggle_label(all_selected: bool) -> &'static str {
    if all_selected { "Deselect all" } else { "Select all" }
}

pub fn folder_toggle_label(mostly_collapsed: bool) -> &'static str {
    if mostly_collapsed { "Expand" } else { "Collapse" }
}

/*
 * One line per visible row. At each level the child folders come first
 * (sorted by name); an expanded folder is followed by its own files and then
 * its subfolders. Files at the vault root come last.
 */
pub fn render_tree(
    root: &FolderNode,
    selection: &SelectionStore,
    settings: &SyncSettings,
) -> Vec<String> {
    let mut lines = Vec::new();
    render_folder_contents(root, selection, settings, 0, &mut lines);
    for file in root.sorted_files() {
        lines.push(file_line(file, selection, 0));
    }
    lines
}

fn render_folder_contents(
    node: &FolderNode,
    selection: &SelectionStore,
    settings: &SyncSettings,
    depth: usize,
    lines: &mut Vec<String>,
) {
    for child in node.sorted_children() {
        let collapsed = settings.is_folder_collapsed(&child.path);
        let marker = if collapsed { COLLAPSED_MARKER } else { EXPANDED_MARKER };
        lines.push(format!(
            "{}{marker} {} {}",
            INDENT.repeat(depth),
            checkbox(selection.folder_check_state(child)),
            child.name
        ));
        if !collapsed {
            for file in child.sorted_files() {
                lines.push(file_line(file, selection, depth + 1));
            }
            render_folder_contents(child, selection, settings, depth + 1, lines);
        }
    }
}

fn file_line(file: &VaultFile, selection: &SelectionStore, depth: usize) -> String {
    let state = if selection.is_selected(file.path()) {
        CheckState::Checked
    } else {
        CheckState::Unchecked
    };
    // Files sit one level deeper than the folder headers next to them.
    format!("{}{} {}", INDENT.repeat(depth + 1), checkbox(state), file.name())
}

pub fn render_panel(
    settings: &SyncSettings,
    selection: &SelectionStore,
    filtered_files: &[VaultFile],
) -> String {
    let mut lines = vec!["Synchronization".to_string()];
    let destination = if settings.destination_path.trim().is_empty() {
        "(not set)"
    } else {
        settings.destination_path.as_str()
    };
    lines.push(format!("Destination path: {destination}"));
    lines.push(format!(
        "Allow syncing files outside monitored scope: {}",
        if settings.allow_sync_outside_scope { "yes" } else { "no" }
    ));
    lines.push(format!(
        "File type filter: {} ({})",
        settings.file_type_filter.label(),
        settings.file_type_filter
    ));
    lines.push(format!(
        "[{}] [{}]",
        select_toggle_label(selection.all_selected(filtered_files)),
        folder_toggle_label(selection::is_mostly_collapsed(settings, filtered_files))
    ));
    lines.push(status_line(
        selection.selected_count(),
        filtered_files.len(),
        selection.has_unsaved_changes(),
    ));
    lines.push(String::new());

    if filtered_files.is_empty() {
        lines.push("No files found matching the filter.".to_string());
    } else {
        let tree = build_folder_tree(filtered_files);
        lines.extend(render_tree(&tree, selection, settings));
    }

    let mut panel = lines.join("\n");
    panel.push('\n');
    panel
}
