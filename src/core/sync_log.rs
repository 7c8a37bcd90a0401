/*
 * Formatting of the append-only sync error log. Each run with failures adds
 * one block: a header carrying the run's start time, one `<path>: <message>`
 * line per failed file, and a trailing totals line.
 */
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const SYNC_LOG_FILE_NAME: &str = "sync-errors.log";

pub fn format_timestamp(at: OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_else(|e| {
        log::warn!("SyncLog: Could not format timestamp as RFC 3339: {e}");
        at.unix_timestamp().to_string()
    })
}

pub fn format_run_block(started_at: &str, error_lines: &[String], summary_line: &str) -> String {
    let mut block = format!("\n=== Sync Started at {started_at} ===\n");
    for line in error_lines {
        block.push_str(line);
        block.push('\n');
    }
    block.push_str(&format!("Total: {summary_line}\n"));
    block
}
