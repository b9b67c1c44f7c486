//! Document body parser using quick-xml.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::model::{Block, Document};

use super::scan::{tag_start, ElementScanner};

/// Parse the main document part into a [`Document`].
///
/// # Example
///
/// ```
/// use unblank::parser::parse;
///
/// let xml = br#"<w:document xmlns:w="urn:w"><w:body><w:p/><w:sectPr/></w:body></w:document>"#;
/// let doc = parse(xml).unwrap();
/// assert_eq!(doc.len(), 2);
/// ```
pub fn parse(data: &[u8]) -> Result<Document> {
    BodyParser::new(data).parse()
}

/// Streaming parser for the `w:body` of a WordprocessingML main part.
///
/// Only direct children of the body are split into blocks. Their byte
/// spans are taken from the input, so everything outside the blocks
/// (declaration, namespaces, whitespace) is carried over untouched.
pub struct BodyParser<'a> {
    data: &'a [u8],
    reader: Reader<&'a [u8]>,
    /// Open element depth outside the body
    depth: usize,
}

impl<'a> BodyParser<'a> {
    /// Create a parser over the raw part bytes.
    pub fn new(data: &'a [u8]) -> Self {
        let mut reader = Reader::from_reader(data);
        reader.config_mut().trim_text(false);
        Self {
            data,
            reader,
            depth: 0,
        }
    }

    /// Parse the body into blocks.
    pub fn parse(mut self) -> Result<Document> {
        let (body_start, has_children) = self.find_body()?;

        let (blocks, epilog_start) = if has_children {
            self.read_blocks(body_start)?
        } else {
            (Vec::new(), body_start)
        };

        self.finish()?;

        log::debug!(
            "Parsed body: {} blocks, {} bytes",
            blocks.len(),
            self.data.len()
        );

        Ok(Document::new(
            self.data[..body_start].to_vec(),
            blocks,
            self.data[epilog_start..].to_vec(),
        ))
    }

    /// Advance to the `body` child of the root element.
    ///
    /// Returns the offset just after the body start tag and whether the
    /// body was written as a start tag (`<w:body>`) rather than empty.
    fn find_body(&mut self) -> Result<(usize, bool)> {
        loop {
            let event = self.reader.read_event()?;
            let pos = self.reader.buffer_position() as usize;

            match event {
                Event::Start(e) => {
                    if self.depth == 1 && e.local_name().as_ref() == b"body" {
                        self.depth += 1;
                        return Ok((pos, true));
                    }
                    self.depth += 1;
                }
                Event::Empty(e) => {
                    if self.depth == 1 && e.local_name().as_ref() == b"body" {
                        return Ok((pos, false));
                    }
                }
                Event::End(_) => self.leave()?,
                Event::Eof => {
                    return Err(Error::MalformedMarkup(
                        "document has no body element".to_string(),
                    ));
                }
                _ => {}
            }
        }
    }

    /// Split the body's children into blocks, stopping at `</w:body>`.
    ///
    /// Returns the blocks and the offset where the epilog begins.
    fn read_blocks(&mut self, body_start: usize) -> Result<(Vec<Block>, usize)> {
        let mut blocks = Vec::new();
        let mut cursor = body_start;

        loop {
            let event = self.reader.read_event()?;
            let pos = self.reader.buffer_position() as usize;

            match event {
                Event::Start(e) => {
                    let start = tag_start(self.data, pos);
                    let e = e.into_owned();
                    let kind = ElementScanner::new(self.data, start).scan(
                        &mut self.reader,
                        &e,
                        false,
                    )?;
                    let end = self.reader.buffer_position() as usize;
                    blocks.push(Block::new(
                        kind,
                        &self.data[cursor..start],
                        &self.data[start..end],
                    ));
                    cursor = end;
                }
                Event::Empty(e) => {
                    let start = tag_start(self.data, pos);
                    let e = e.into_owned();
                    let kind =
                        ElementScanner::new(self.data, start).scan(&mut self.reader, &e, true)?;
                    blocks.push(Block::new(
                        kind,
                        &self.data[cursor..start],
                        &self.data[start..pos],
                    ));
                    cursor = pos;
                }
                Event::End(_) => {
                    self.leave()?;
                    return Ok((blocks, cursor));
                }
                Event::Eof => {
                    return Err(Error::MalformedMarkup("body element is not closed".to_string()));
                }
                _ => {}
            }
        }
    }

    /// Consume the rest of the input, checking that every element closes.
    fn finish(&mut self) -> Result<()> {
        loop {
            match self.reader.read_event()? {
                Event::Start(_) => self.depth += 1,
                Event::End(_) => self.leave()?,
                Event::Eof => break,
                _ => {}
            }
        }

        if self.depth != 0 {
            return Err(Error::MalformedMarkup(format!(
                "{} element(s) left open at end of document",
                self.depth
            )));
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        self.depth = self
            .depth
            .checked_sub(1)
            .ok_or_else(|| Error::MalformedMarkup("unmatched end tag".to_string()))?;
        Ok(())
    }
}
