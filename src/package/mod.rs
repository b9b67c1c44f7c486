//! DOCX package access.
//!
//! A [`Package`] holds the raw container bytes in memory. Entries are read
//! on demand; replaced entries are kept aside until the package is written
//! back, at which point every other entry is copied without recompression.

pub mod backup;
mod rels;

pub use backup::{backup_path, create_backup, BACKUP_SUFFIX};
pub use rels::{CONTENT_TYPES, DEFAULT_MAIN_PART, PACKAGE_RELS};

use std::collections::BTreeMap;
use std::fs;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};

/// An opened DOCX package.
#[derive(Debug, Clone)]
pub struct Package {
    data: Vec<u8>,
    names: Vec<String>,
    main_part: String,
    replaced: BTreeMap<String, Vec<u8>>,
}

impl Package {
    /// Open a package from a file.
    ///
    /// # Example
    /// ```no_run
    /// use unblank::package::Package;
    ///
    /// let package = Package::open("report.docx").unwrap();
    /// println!("Main part: {}", package.main_part());
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Open a package from its bytes.
    ///
    /// Fails with [`Error::NotAnArchive`] when the bytes are not a ZIP
    /// container and [`Error::CorruptArchive`] when the content types entry
    /// or the main document part is missing.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        detect_format_from_bytes(&data)?;

        let mut archive = ZipArchive::new(Cursor::new(data.as_slice()))
            .map_err(|e| Error::NotAnArchive(e.to_string()))?;

        let mut names = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let file = archive.by_index_raw(i)?;
            names.push(file.name().to_string());
        }

        if !names.iter().any(|n| n == CONTENT_TYPES) {
            return Err(Error::CorruptArchive(format!("missing {}", CONTENT_TYPES)));
        }

        let related = if names.iter().any(|n| n == PACKAGE_RELS) {
            let rels = read_entry(&mut archive, PACKAGE_RELS)?;
            rels::find_main_part(&rels)?
        } else {
            None
        };
        let main_part = related.unwrap_or_else(|| DEFAULT_MAIN_PART.to_string());

        if !names.contains(&main_part) {
            return Err(Error::CorruptArchive(format!(
                "main document part {} not found",
                main_part
            )));
        }

        log::debug!(
            "Opened package: {} entries, main part {}",
            names.len(),
            main_part
        );

        drop(archive);
        Ok(Self {
            data,
            names,
            main_part,
            replaced: BTreeMap::new(),
        })
    }

    /// Name of the main document part, e.g. `word/document.xml`.
    pub fn main_part(&self) -> &str {
        &self.main_part
    }

    /// Entry names in archive order.
    pub fn entry_names(&self) -> &[String] {
        &self.names
    }

    /// Whether any entry has been replaced.
    pub fn is_modified(&self) -> bool {
        !self.replaced.is_empty()
    }

    /// Read an entry's uncompressed bytes, including pending replacements.
    pub fn entry(&self, name: &str) -> Result<Vec<u8>> {
        if let Some(bytes) = self.replaced.get(name) {
            return Ok(bytes.clone());
        }
        let mut archive = self.archive()?;
        read_entry(&mut archive, name)
    }

    /// Read the main document part.
    pub fn main_document(&self) -> Result<Vec<u8>> {
        self.entry(&self.main_part)
    }

    /// Replace an existing entry's contents.
    pub fn replace(&mut self, name: &str, bytes: Vec<u8>) -> Result<()> {
        if !self.names.iter().any(|n| n == name) {
            return Err(Error::InvalidInput(format!("no entry named {}", name)));
        }
        self.replaced.insert(name.to_string(), bytes);
        Ok(())
    }

    /// Write the package to a new buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Cursor::new(Vec::with_capacity(self.data.len()));
        self.write_to(&mut out)?;
        Ok(out.into_inner())
    }

    /// Write the package to `path`, replacing it atomically.
    ///
    /// The archive is written to a temporary file next to `path` and
    /// renamed over it once complete. On failure the target is untouched.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let write_failure =
            |e: &dyn std::fmt::Display| Error::WriteFailure(format!("{}: {}", path.display(), e));

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| write_failure(&e))?;
        if let Ok(metadata) = fs::metadata(path) {
            fs::set_permissions(tmp.path(), metadata.permissions())
                .map_err(|e| write_failure(&e))?;
        }
        self.write_to(tmp.as_file_mut()).map_err(|e| match e {
            Error::Io(io) => write_failure(&io),
            other => other,
        })?;
        tmp.as_file().sync_all().map_err(|e| write_failure(&e))?;
        tmp.persist(path).map_err(|e| write_failure(&e.error))?;

        log::info!("Wrote {}", path.display());
        Ok(())
    }

    fn archive(&self) -> Result<ZipArchive<Cursor<&[u8]>>> {
        ZipArchive::new(Cursor::new(self.data.as_slice()))
            .map_err(|e| Error::CorruptArchive(e.to_string()))
    }

    fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut archive = self.archive()?;
        let mut zip = ZipWriter::new(writer);

        for i in 0..archive.len() {
            let file = archive.by_index_raw(i)?;

            let Some(bytes) = self.replaced.get(file.name()) else {
                zip.raw_copy_file(file)?;
                continue;
            };

            let method = match file.compression() {
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            };
            let mut options = SimpleFileOptions::default().compression_method(method);
            if let Some(modified) = file.last_modified() {
                options = options.last_modified_time(modified);
            }
            if let Some(mode) = file.unix_mode() {
                options = options.unix_permissions(mode);
            }

            let name = file.name().to_string();
            drop(file);

            log::debug!("Recompressing {} ({} bytes, {:?})", name, bytes.len(), method);
            zip.start_file(name, options)?;
            zip.write_all(bytes)?;
        }

        zip.finish()?;
        Ok(())
    }
}

/// Largest buffer reserved up front from an entry's declared size.
const MAX_PREALLOC: u64 = 16 * 1024 * 1024;

/// Buffer size to reserve for an entry; the declared size is not trusted.
fn initial_capacity(declared: u64) -> usize {
    declared.min(MAX_PREALLOC) as usize
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Vec<u8>> {
    let mut file = archive
        .by_name(name)
        .map_err(|e| Error::CorruptArchive(format!("cannot read {}: {}", name, e)))?;
    let mut bytes = Vec::with_capacity(initial_capacity(file.size()));
    file.read_to_end(&mut bytes)
        .map_err(|e| Error::CorruptArchive(format!("cannot read {}: {}", name, e)))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, bytes) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(bytes).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    const BODY: &[u8] = b"<w:document><w:body><w:sectPr/></w:body></w:document>";

    #[test]
    fn test_open_default_main_part() {
        let data = build(&[(CONTENT_TYPES, b"<Types/>"), (DEFAULT_MAIN_PART, BODY)]);
        let package = Package::from_bytes(data).unwrap();
        assert_eq!(package.main_part(), DEFAULT_MAIN_PART);
        assert_eq!(package.main_document().unwrap(), BODY);
        assert!(!package.is_modified());
    }

    #[test]
    fn test_main_part_from_rels() {
        let rels = br#"<Relationships><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document2.xml"/></Relationships>"#;
        let data = build(&[
            (CONTENT_TYPES, b"<Types/>"),
            (PACKAGE_RELS, rels),
            ("word/document2.xml", BODY),
        ]);
        let package = Package::from_bytes(data).unwrap();
        assert_eq!(package.main_part(), "word/document2.xml");
    }

    #[test]
    fn test_missing_content_types() {
        let data = build(&[(DEFAULT_MAIN_PART, BODY)]);
        assert!(matches!(
            Package::from_bytes(data),
            Err(Error::CorruptArchive(_))
        ));
    }

    #[test]
    fn test_missing_main_part() {
        let data = build(&[(CONTENT_TYPES, b"<Types/>")]);
        assert!(matches!(
            Package::from_bytes(data),
            Err(Error::CorruptArchive(_))
        ));
    }

    #[test]
    fn test_not_an_archive() {
        assert!(matches!(
            Package::from_bytes(b"plain text, not a package".to_vec()),
            Err(Error::NotAnArchive(_))
        ));
    }

    #[test]
    fn test_replace_and_write() {
        let data = build(&[
            (CONTENT_TYPES, b"<Types/>"),
            (DEFAULT_MAIN_PART, BODY),
            ("word/styles.xml", b"<w:styles/>"),
        ]);
        let mut package = Package::from_bytes(data).unwrap();

        let edited = b"<w:document><w:body><w:p/><w:sectPr/></w:body></w:document>".to_vec();
        package.replace(DEFAULT_MAIN_PART, edited.clone()).unwrap();
        assert!(package.is_modified());

        let reopened = Package::from_bytes(package.to_bytes().unwrap()).unwrap();
        assert_eq!(reopened.main_document().unwrap(), edited);
        assert_eq!(reopened.entry("word/styles.xml").unwrap(), b"<w:styles/>");
        assert_eq!(reopened.entry_names(), package.entry_names());
    }

    #[test]
    fn test_replace_unknown_entry() {
        let data = build(&[(CONTENT_TYPES, b"<Types/>"), (DEFAULT_MAIN_PART, BODY)]);
        let mut package = Package::from_bytes(data).unwrap();
        assert!(matches!(
            package.replace("word/missing.xml", Vec::new()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_declared_size_is_capped() {
        assert_eq!(initial_capacity(512), 512);
        assert_eq!(initial_capacity(u64::MAX), MAX_PREALLOC as usize);
    }

    #[test]
    fn test_save_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        let data = build(&[(CONTENT_TYPES, b"<Types/>"), (DEFAULT_MAIN_PART, BODY)]);
        let package = Package::from_bytes(data).unwrap();

        package.save(&path).unwrap();
        let reopened = Package::open(&path).unwrap();
        assert_eq!(reopened.main_document().unwrap(), BODY);
        // Only the target remains in the directory
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
