//! Package relationship lookup.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Error, Result};

/// Package-level relationships entry.
pub const PACKAGE_RELS: &str = "_rels/.rels";
/// Content types entry every package must carry.
pub const CONTENT_TYPES: &str = "[Content_Types].xml";
/// Conventional location of the main document part.
pub const DEFAULT_MAIN_PART: &str = "word/document.xml";

const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const STRICT_OFFICE_DOCUMENT_REL: &str =
    "http://purl.oclc.org/ooxml/officeDocument/relationships/officeDocument";

/// Find the main document target in a package relationships part.
///
/// Returns the entry name without a leading slash, or `None` when the part
/// has no office document relationship.
pub fn find_main_part(rels_xml: &[u8]) -> Result<Option<String>> {
    let mut reader = Reader::from_reader(rels_xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                if e.local_name().as_ref() != b"Relationship" {
                    continue;
                }

                let mut reltype = None;
                let mut target = None;
                let mut external = false;

                for attr in e.attributes() {
                    let attr = attr.map_err(|e| Error::MalformedMarkup(e.to_string()))?;
                    match attr.key.as_ref() {
                        b"Type" => reltype = Some(attr.unescape_value()?.into_owned()),
                        b"Target" => target = Some(attr.unescape_value()?.into_owned()),
                        b"TargetMode" => external = attr.value.as_ref() == b"External",
                        _ => {}
                    }
                }

                if external {
                    continue;
                }
                if let (Some(rt), Some(tr)) = (reltype, target) {
                    if rt == OFFICE_DOCUMENT_REL || rt == STRICT_OFFICE_DOCUMENT_REL {
                        return Ok(Some(tr.trim_start_matches('/').to_string()));
                    }
                }
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => {
                return Err(Error::CorruptArchive(format!(
                    "{} is not readable: {}",
                    PACKAGE_RELS, e
                )))
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_main_part() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="/word/main.xml"/>
</Relationships>"#;
        assert_eq!(find_main_part(xml).unwrap().as_deref(), Some("word/main.xml"));
    }

    #[test]
    fn test_no_office_document() {
        let xml = br#"<Relationships><Relationship Id="rId1" Type="other" Target="x.xml"/></Relationships>"#;
        assert_eq!(find_main_part(xml).unwrap(), None);
    }

    #[test]
    fn test_unreadable_rels() {
        assert!(matches!(
            find_main_part(b"<Relationships><Relationship"),
            Err(Error::CorruptArchive(_))
        ));
    }
}
