/*
 * User-facing notices: short messages shown for a limited time. The wording of
 * the run summary depends on the mix of outcomes.
 */
use crate::core::{SyncError, SyncSummary};
use std::fmt;

pub const SHORT_TIMEOUT_MS: u32 = 3000;
pub const DEFAULT_TIMEOUT_MS: u32 = 5000;
pub const LONG_TIMEOUT_MS: u32 = 7000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub timeout_ms: u32,
}

impl Notice {
    pub fn new(message: impl Into<String>, timeout_ms: u32) -> Self {
        Notice {
            message: message.into(),
            timeout_ms,
        }
    }

    /* An advisory explaining why a command did nothing. */
    pub fn advisory(error: &SyncError) -> Self {
        Notice::new(error.to_string(), DEFAULT_TIMEOUT_MS)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/*
 * `log_file_name` is the log the failures of this run were appended to, or
 * `None` if that append failed, in which case the notice does not point at it.
 */
pub fn run_summary(summary: &SyncSummary, log_file_name: Option<&str>) -> Notice {
    if summary.errored > 0 {
        let mut message = format!(
            "Synced {} files with {} errors.",
            summary.synced, summary.errored
        );
        if let Some(name) = log_file_name {
            message.push_str(&format!(" Check {name}."));
        }
        Notice::new(message, LONG_TIMEOUT_MS)
    } else if summary.synced == 0 {
        Notice::new(
            format!("All {} checked files are up to date!", summary.skipped),
            SHORT_TIMEOUT_MS,
        )
    } else {
        Notice::new(
            format!(
                "Synced {} files! ({} unchanged)",
                summary.synced, summary.skipped
            ),
            DEFAULT_TIMEOUT_MS,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(synced: usize, skipped: usize, errored: usize) -> SyncSummary {
        SyncSummary {
            synced,
            skipped,
            errored,
            errors: Vec::new(),
        }
    }

    #[test]
    fn test_run_summary_wording() {
        assert_eq!(
            run_summary(&summary(0, 4, 0), Some("sync-errors.log")).message,
            "All 4 checked files are up to date!"
        );
        assert_eq!(
            run_summary(&summary(2, 3, 0), Some("sync-errors.log")).message,
            "Synced 2 files! (3 unchanged)"
        );
        let with_errors = run_summary(&summary(1, 0, 2), Some("sync-errors.log"));
        assert_eq!(
            with_errors.message,
            "Synced 1 files with 2 errors. Check sync-errors.log."
        );
        assert_eq!(with_errors.timeout_ms, LONG_TIMEOUT_MS);
    }

    #[test]
    fn test_run_summary_without_written_log() {
        let notice = run_summary(&summary(0, 1, 1), None);
        assert_eq!(notice.message, "Synced 0 files with 1 errors.");
        assert_eq!(notice.timeout_ms, LONG_TIMEOUT_MS);
    }

    #[test]
    fn test_advisory_uses_error_text() {
        let notice = Notice::advisory(&SyncError::NoFilesSelected);
        assert_eq!(
            notice.message,
            "No files selected. Please select files in settings first"
        );
        assert_eq!(notice.timeout_ms, DEFAULT_TIMEOUT_MS);
    }
}
