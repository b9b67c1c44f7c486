//! Body serialization back to part XML.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::model::Document;

/// Serialize a document back into main-part XML.
///
/// Untouched blocks are emitted exactly as parsed. Before returning, the
/// output is checked independently of the excision step: the body must
/// end with its single terminal section properties node and the bytes
/// must be well-formed XML. Fails with [`Error::Serialization`] otherwise.
pub fn serialize(doc: &Document) -> Result<Vec<u8>> {
    doc.check_terminal().map_err(Error::Serialization)?;

    let size = doc.prolog().len()
        + doc.epilog().len()
        + doc
            .blocks()
            .iter()
            .map(|b| b.leading.len() + b.markup.len())
            .sum::<usize>();

    let mut out = Vec::with_capacity(size);
    out.extend_from_slice(doc.prolog());
    for block in doc.blocks() {
        block.write_to(&mut out);
    }
    out.extend_from_slice(doc.epilog());

    check_well_formed(&out)?;

    log::debug!("Serialized {} blocks into {} bytes", doc.len(), out.len());
    Ok(out)
}

/// Verify that `data` is a single well-formed element tree.
fn check_well_formed(data: &[u8]) -> Result<()> {
    let mut reader = Reader::from_reader(data);
    let mut depth = 0usize;
    let mut roots = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::Serialization(format!("output is not well-formed: {}", e)))?;

        match event {
            Event::Start(_) => {
                if depth == 0 {
                    roots += 1;
                }
                depth += 1;
            }
            Event::Empty(_) if depth == 0 => roots += 1,
            Event::End(_) => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    Error::Serialization("output has an unmatched end tag".to_string())
                })?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 || roots != 1 {
        return Err(Error::Serialization(format!(
            "output must have one closed root element (roots: {}, open: {})",
            roots, depth
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, BlockKind, ContentSummary};
    use crate::parser::parse;

    const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <w:body>
    <w:p w:rsidR="00AB12CD"><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="3"/></w:numPr></w:pPr><w:r><w:t>Item</w:t></w:r></w:p>
    <w:sdt><w:sdtContent><w:p><w:r><w:t>Wrapped</w:t></w:r></w:p></w:sdtContent></w:sdt>
    <w:p/>
    <w:sectPr w:rsidR="00AB12CD"><w:headerReference w:type="default" r:id="rId7"/></w:sectPr>
  </w:body>
</w:document>
"#;

    #[test]
    fn test_roundtrip_byte_for_byte() {
        let doc = parse(DOC.as_bytes()).unwrap();
        let out = serialize(&doc).unwrap();
        assert_eq!(out, DOC.as_bytes());
    }

    #[test]
    fn test_missing_terminal_rejected() {
        let doc = parse(b"<w:document><w:body><w:p/></w:body></w:document>").unwrap();
        assert!(matches!(serialize(&doc), Err(Error::Serialization(_))));
    }

    #[test]
    fn test_broken_block_markup_rejected() {
        let doc = parse(DOC.as_bytes()).unwrap();
        let mut blocks = doc.blocks().to_vec();
        blocks[0] = Block::new(
            BlockKind::Paragraph(ContentSummary::default()),
            "",
            "<w:p><w:r>",
        );
        let broken = doc.with_blocks(blocks);
        assert!(matches!(serialize(&broken), Err(Error::Serialization(_))));
    }

    #[test]
    fn test_well_formed_check() {
        assert!(check_well_formed(b"<a><b/></a>").is_ok());
        assert!(check_well_formed(b"<a/><b/>").is_err());
        assert!(check_well_formed(b"<a>").is_err());
        assert!(check_well_formed(b"").is_err());
    }
}
