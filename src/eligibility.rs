use chrono::{DateTime, Local, NaiveDate};
use std::fs;
use std::path::Path;
use tracing::debug;

/// True iff `path` is a regular file whose last-modified calendar date
/// (local clock, day granularity) equals `run_date`.
///
/// The comparison deliberately discards sub-day precision: a run started
/// just before midnight may skip an artifact modified just after. The
/// run date is captured once at run start, not re-read per artifact.
pub fn is_eligible(path: &Path, run_date: NaiveDate) -> bool {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) => {
            debug!(error = ?e, path = %path.display(), "Artifact missing or unreadable");
            return false;
        }
    };
    if !meta.is_file() {
        debug!(path = %path.display(), "Artifact path is not a regular file");
        return false;
    }
    let modified = match meta.modified() {
        Ok(time) => time,
        Err(e) => {
            debug!(error = ?e, path = %path.display(), "No modification time available");
            return false;
        }
    };
    let modified: DateTime<Local> = modified.into();
    modified.date_naive() == run_date
}
