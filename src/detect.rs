//! Container format detection and validation.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Kind of ZIP record found at the start of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    /// Regular archive starting with a local file header
    Zip,
    /// Archive with no entries (end-of-central-directory record only)
    EmptyZip,
}

impl std::fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerFormat::Zip => write!(f, "ZIP"),
            ContainerFormat::EmptyZip => write!(f, "ZIP (empty)"),
        }
    }
}

/// ZIP local file header signature: PK\x03\x04
const LOCAL_HEADER_MAGIC: &[u8] = b"PK\x03\x04";
/// ZIP end-of-central-directory signature: PK\x05\x06
const EMPTY_ARCHIVE_MAGIC: &[u8] = b"PK\x05\x06";
const MAGIC_LEN: usize = 4;

/// Legacy binary Word documents start with the OLE compound file signature.
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Detect the container format from a file path.
///
/// # Example
/// ```no_run
/// use unblank::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("report.docx").unwrap();
/// println!("Container: {}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<ContainerFormat> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; 8];
    let read = reader.read(&mut header)?;
    detect_format_from_bytes(&header[..read])
}

/// Detect the container format from the leading bytes of a file.
///
/// # Returns
/// * `Ok(ContainerFormat)` if the data starts with a ZIP signature
/// * `Err(Error::NotAnArchive)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<ContainerFormat> {
    if data.starts_with(OLE_MAGIC) {
        return Err(Error::NotAnArchive(
            "legacy binary .doc file; only .docx packages are supported".to_string(),
        ));
    }

    if data.len() < MAGIC_LEN {
        return Err(Error::NotAnArchive("file is too short".to_string()));
    }

    if data.starts_with(LOCAL_HEADER_MAGIC) {
        Ok(ContainerFormat::Zip)
    } else if data.starts_with(EMPTY_ARCHIVE_MAGIC) {
        Ok(ContainerFormat::EmptyZip)
    } else {
        Err(Error::NotAnArchive("missing ZIP signature".to_string()))
    }
}

/// Check if a file looks like a ZIP-based package.
pub fn is_package<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if a path carries the `.docx` extension (case-insensitive).
pub fn has_docx_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("docx"))
        .unwrap_or(false)
}
