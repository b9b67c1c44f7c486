//! Backup copies of the original document.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default backup suffix, inserted between the file stem and extension.
pub const BACKUP_SUFFIX: &str = "backup";

/// Path of the backup for `path`: `report.docx` becomes `report.backup.docx`.
pub fn backup_path<P: AsRef<Path>>(path: P, suffix: &str) -> PathBuf {
    let path = path.as_ref();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name = match path.extension() {
        Some(ext) => format!("{}.{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}.{}", stem, suffix),
    };
    path.with_file_name(name)
}

/// Copy `path` to its backup location and confirm the copy.
///
/// The copy is flushed to disk and its length compared with the source
/// before this returns, so the original is only overwritten once a full
/// backup exists. An existing backup is replaced.
pub fn create_backup<P: AsRef<Path>>(path: P, suffix: &str) -> Result<PathBuf> {
    let path = path.as_ref();
    let target = backup_path(path, suffix);

    let copied = fs::copy(path, &target).map_err(|e| {
        Error::WriteFailure(format!("cannot create backup {}: {}", target.display(), e))
    })?;

    File::open(&target)
        .and_then(|f| f.sync_all())
        .map_err(|e| Error::WriteFailure(format!("cannot sync backup {}: {}", target.display(), e)))?;

    let expected = fs::metadata(path)?.len();
    let actual = fs::metadata(&target)?.len();
    if copied != expected || actual != expected {
        return Err(Error::WriteFailure(format!(
            "backup {} is incomplete ({} of {} bytes)",
            target.display(),
            actual,
            expected
        )));
    }

    log::info!("Backup written to {}", target.display());
    Ok(target)
}
