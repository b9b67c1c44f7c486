//! # unblank
//!
//! Detect and remove visually empty pages from DOCX documents.
//!
//! The library edits the main document part of a DOCX package directly.
//! The body is split into page segments at explicit page and section
//! boundaries, each segment is classified by whether it carries any visible
//! content, and selected segments are removed without disturbing the
//! body's final section properties. Every other part of the package is
//! written back byte-for-byte.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unblank::{clean_file, scan_file, CleanOptions, DetectOptions};
//!
//! fn main() -> unblank::Result<()> {
//!     // List the pages and their classification
//!     let report = scan_file("report.docx", &DetectOptions::default())?;
//!     println!("{}", unblank::render::to_text(&report));
//!
//!     // Remove every empty page, keeping report.backup.docx
//!     let result = clean_file("report.docx", &CleanOptions::default())?;
//!     println!("Removed {} page(s)", result.removed_pages.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Lossless**: untouched body blocks and package entries keep their bytes
//! - **Safe write-back**: backup first, then an atomic rename over the original
//! - **Blank runs**: optional removal of Enter-filled space inside pages

pub mod clean;
pub mod detect;
pub mod detector;
pub mod error;
pub mod excise;
pub mod model;
pub mod package;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use clean::{CleanOptions, CleanReport};
pub use detect::{detect_format_from_bytes, detect_format_from_path, ContainerFormat};
pub use detector::{DetectOptions, ScanReport};
pub use error::{Error, Result};
pub use excise::Selection;
pub use model::{BlankRun, Block, BlockKind, Classification, Document, PageSegment};
pub use package::Package;
pub use render::JsonFormat;

use std::path::Path;

/// Scan a DOCX file for empty pages.
///
/// # Example
///
/// ```no_run
/// use unblank::{scan_file, DetectOptions};
///
/// let report = scan_file("report.docx", &DetectOptions::default()).unwrap();
/// println!("{} of {} pages are empty", report.empty_count(), report.segments.len());
/// ```
pub fn scan_file<P: AsRef<Path>>(path: P, options: &DetectOptions) -> Result<ScanReport> {
    let package = Package::open(path)?;
    scan_package(&package, options)
}

/// Scan a DOCX package held in memory.
pub fn scan_bytes(data: &[u8], options: &DetectOptions) -> Result<ScanReport> {
    let package = Package::from_bytes(data.to_vec())?;
    scan_package(&package, options)
}

fn scan_package(package: &Package, options: &DetectOptions) -> Result<ScanReport> {
    let doc = parser::parse(&package.main_document()?)?;
    Ok(detector::scan(&doc, options))
}

/// Remove the selected pages from a DOCX file in place.
///
/// The body is edited and checked in memory first. Only when every check
/// has passed is the backup written (unless disabled) and then the
/// original replaced. Any error before that point leaves the file
/// untouched; in a dry run nothing is ever written.
///
/// # Example
///
/// ```no_run
/// use unblank::{clean_file, CleanOptions, Selection};
///
/// let options = CleanOptions::new()
///     .with_selection(Selection::parse("2,4-5").unwrap())
///     .with_backup(true);
/// let report = clean_file("report.docx", &options).unwrap();
/// assert!(report.written || !report.changed);
/// ```
pub fn clean_file<P: AsRef<Path>>(path: P, options: &CleanOptions) -> Result<CleanReport> {
    clean::clean_path(path.as_ref(), options)
}

/// Remove the selected pages from a DOCX package held in memory.
///
/// Returns the rewritten package, or the input unchanged when nothing was
/// removed. Backup and dry-run options do not apply.
pub fn clean_bytes(data: &[u8], options: &CleanOptions) -> Result<(Vec<u8>, CleanReport)> {
    let mut package = Package::from_bytes(data.to_vec())?;
    let (bytes, report) = clean::clean_package(&package, options)?;

    match bytes {
        Some(bytes) => {
            let main_part = package.main_part().to_string();
            package.replace(&main_part, bytes)?;
            Ok((package.to_bytes()?, report))
        }
        None => Ok((data.to_vec(), report)),
    }
}
