//! Cleaning pipeline: scan, select, excise, verify and write back.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::detector::{blank_runs, scan, segment, DetectOptions, ScanReport};
use crate::error::{Error, Result};
use crate::excise::{excise, excise_blank_runs, Selection};
use crate::model::{Document, PageSegment};
use crate::package::{create_backup, Package, BACKUP_SUFFIX};
use crate::parser::parse;
use crate::render::serialize;

/// Options for removing pages from a document.
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// Detection options (blank-run detection and threshold)
    pub detect: DetectOptions,

    /// Segments to remove
    pub selection: Selection,

    /// Whether to copy the original file aside before overwriting it
    pub backup: bool,

    /// Suffix inserted into the backup file name
    pub backup_suffix: String,

    /// Compute the result without writing anything
    pub dry_run: bool,
}

impl CleanOptions {
    /// Create new clean options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the selection of segments to remove.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Set detection options.
    pub fn with_detect_options(mut self, detect: DetectOptions) -> Self {
        self.detect = detect;
        self
    }

    /// Also remove runs of empty paragraphs inside pages with content.
    pub fn with_blank_runs(mut self, enabled: bool) -> Self {
        self.detect = self.detect.with_blank_runs(enabled);
        self
    }

    /// Enable or disable the backup copy.
    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    /// Set the backup suffix.
    pub fn with_backup_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.backup_suffix = suffix.into();
        self
    }

    /// Enable dry-run mode.
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            detect: DetectOptions::default(),
            selection: Selection::All,
            backup: true,
            backup_suffix: BACKUP_SUFFIX.to_string(),
            dry_run: false,
        }
    }
}

/// Outcome of a clean operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
    /// Scan of the document before any change
    pub scan: ScanReport,

    /// Segments that were removed
    pub removed_pages: Vec<PageSegment>,

    /// Number of blank runs removed
    pub removed_runs: usize,

    /// Body blocks before cleaning
    pub blocks_before: usize,

    /// Body blocks after cleaning
    pub blocks_after: usize,

    /// Backup file, if one was written
    pub backup: Option<PathBuf>,

    /// Whether the body differs from the original
    pub changed: bool,

    /// Whether the document was written
    pub written: bool,
}

/// Run the cleaning steps on a package in memory.
///
/// Returns the new main part bytes when the body changed. Nothing is
/// written here; every structural check has passed once this returns.
pub(crate) fn clean_package(
    package: &Package,
    options: &CleanOptions,
) -> Result<(Option<Vec<u8>>, CleanReport)> {
    let xml = package.main_document()?;
    let doc = parse(&xml)?;
    let report = scan(&doc, &options.detect);

    let targets = options.selection.resolve(&report.segments)?;
    let mut edited = excise(&doc, &targets)?;

    let mut removed_runs = 0;
    if options.detect.blank_runs {
        // Re-detect on the edited body; excision shifts block positions
        let runs = blank_runs(&edited, &segment(&edited), options.detect.min_blank_run);
        removed_runs = runs.len();
        edited = excise_blank_runs(&edited, &runs)?;
    }

    let clean = CleanReport {
        blocks_before: doc.len(),
        blocks_after: edited.len(),
        scan: report,
        removed_pages: targets,
        removed_runs,
        changed: edited != doc,
        ..Default::default()
    };

    if !clean.changed {
        log::info!("Nothing to remove");
        return Ok((None, clean));
    }

    let bytes = serialize(&edited)?;
    verify(&edited, &bytes)?;
    Ok((Some(bytes), clean))
}

/// Re-parse the serialized body and confirm it matches what was built.
fn verify(expected: &Document, bytes: &[u8]) -> Result<()> {
    let reparsed = parse(bytes)?;
    if reparsed.len() != expected.len() || reparsed.terminal_index() != expected.terminal_index()
    {
        return Err(Error::Serialization(format!(
            "re-parsed body has {} blocks, expected {}",
            reparsed.len(),
            expected.len()
        )));
    }
    Ok(())
}

/// Clean a file in place.
pub(crate) fn clean_path(path: &Path, options: &CleanOptions) -> Result<CleanReport> {
    let mut package = Package::open(path)?;
    let (bytes, mut report) = clean_package(&package, options)?;

    let Some(bytes) = bytes else {
        return Ok(report);
    };

    if options.dry_run {
        log::info!(
            "Dry run: would remove {} page(s) from {}",
            report.removed_pages.len(),
            path.display()
        );
        return Ok(report);
    }

    if options.backup {
        report.backup = Some(create_backup(path, &options.backup_suffix)?);
    }

    let main_part = package.main_part().to_string();
    package.replace(&main_part, bytes)?;
    package.save(path)?;
    report.written = true;

    Ok(report)
}
