//! # Folder Cleanup
//!
//! Once a new wallpaper is applied, every other file in the destination
//! folder is deleted. Sub-directories are left alone.
//!
//! Deletions are independent: a file that cannot be removed is logged and
//! recorded, and the remaining files are still processed.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// What a cleanup pass did.
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    /// Files that could not be deleted, with the error text.
    pub failed: Vec<(PathBuf, String)>,
}

/// Deletes every regular file in `dir` except `keep`.
///
/// # Arguments
/// * `dir` - The destination folder
/// * `keep` - The file just applied as wallpaper (absolute path)
///
/// # Returns
/// * `Ok(report)` - The folder was listed; see the report for per-file results
/// * `Err(_)` - The folder itself could not be resolved or listed
pub fn cleanup_folder(dir: &Path, keep: &Path) -> Result<CleanupReport> {
    // Same resolution as the fetcher, so `keep` compares equal to its entry
    let dir = std::fs::canonicalize(dir).map_err(Error::io("resolve", dir))?;
    let entries = std::fs::read_dir(&dir).map_err(Error::io("list", &dir))?;

    let mut report = CleanupReport::default();

    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {}: {e}", dir.display());
                continue;
            }
        };

        if path == keep || !path.is_file() {
            continue;
        }

        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!("Deleted: {}", path.display());
                report.removed.push(path);
            }
            Err(e) => {
                tracing::warn!("Could not delete {}: {e}", path.display());
                report.failed.push((path, e.to_string()));
            }
        }
    }

    Ok(report)
}
