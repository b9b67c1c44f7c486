//! Content scanning for a single top-level body element.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::model::{BlockKind, ContentSummary, Opaque, SectionBreak, SectionStart};

/// Inline elements that render as graphics.
const GRAPHIC_ELEMENTS: &[&[u8]] = &[b"drawing", b"pict", b"object"];

/// Inline elements belonging to fields.
const FIELD_ELEMENTS: &[&[u8]] = &[b"fldChar", b"instrText", b"fldSimple"];

/// Other inline elements that produce visible output.
const VISIBLE_ELEMENTS: &[&[u8]] = &[
    b"sym",
    b"footnoteReference",
    b"endnoteReference",
    b"oMath",
    b"oMathPara",
    b"noBreakHyphen",
    b"pgNum",
    b"contentPart",
];

/// Body-level markers that never carry content.
const INERT_ELEMENTS: &[&[u8]] = &[
    b"bookmarkStart",
    b"bookmarkEnd",
    b"proofErr",
    b"permStart",
    b"permEnd",
    b"commentRangeStart",
    b"commentRangeEnd",
    b"moveFromRangeStart",
    b"moveFromRangeEnd",
    b"moveToRangeStart",
    b"moveToRangeEnd",
    b"customXmlInsRangeStart",
    b"customXmlInsRangeEnd",
    b"customXmlDelRangeStart",
    b"customXmlDelRangeEnd",
];

/// Walks the events of one body child and summarizes its content.
pub(super) struct ElementScanner<'a> {
    data: &'a [u8],
    /// Absolute offset of the element's `<`
    origin: usize,
    /// Open element local names, outermost first
    stack: Vec<Vec<u8>>,
    summary: ContentSummary,
    /// Depth of open `w:t` elements
    text_depth: usize,
    /// Set once `w:pPr/w:sectPr` is seen in a paragraph
    section: Option<SectionStart>,
    /// Absolute start of an open `<w:br w:type="page">` element
    open_break: Option<usize>,
}

impl<'a> ElementScanner<'a> {
    pub(super) fn new(data: &'a [u8], origin: usize) -> Self {
        Self {
            data,
            origin,
            stack: Vec::new(),
            summary: ContentSummary::default(),
            text_depth: 0,
            section: None,
            open_break: None,
        }
    }

    /// Consume the element that started with `root` and classify it.
    ///
    /// When `is_empty` is false the reader is positioned right after the
    /// root start tag and is advanced past the matching end tag.
    pub(super) fn scan(
        mut self,
        reader: &mut Reader<&'a [u8]>,
        root: &BytesStart<'_>,
        is_empty: bool,
    ) -> Result<BlockKind> {
        let root_name = root.local_name().as_ref().to_vec();

        if root_name.as_slice() == b"sectPr" {
            self.section = Some(SectionStart::default());
        }

        if !is_empty {
            self.stack.push(root_name.clone());
            self.walk(reader)?;
        }

        Ok(self.into_kind(&root_name))
    }

    fn walk(&mut self, reader: &mut Reader<&'a [u8]>) -> Result<()> {
        while !self.stack.is_empty() {
            let event = reader.read_event()?;
            let pos = reader.buffer_position() as usize;

            match event {
                Event::Start(e) => {
                    self.open(&e, pos, false)?;
                    self.stack.push(e.local_name().as_ref().to_vec());
                }
                Event::Empty(e) => {
                    self.open(&e, pos, true)?;
                }
                Event::End(e) => {
                    let name = e.local_name();
                    let name = name.as_ref();
                    if name == b"t" {
                        self.text_depth = self.text_depth.saturating_sub(1);
                    }
                    if name == b"br" {
                        if let Some(start) = self.open_break.take() {
                            self.push_break(start, pos);
                        }
                    }
                    self.stack.pop();
                }
                Event::Text(t) if self.text_depth > 0 && self.wants_text() => {
                    let text = t
                        .unescape()
                        .map_err(|e| Error::MalformedMarkup(e.to_string()))?;
                    if text.chars().any(|c| !c.is_whitespace()) {
                        self.summary.has_text = true;
                        self.saw_visible();
                    }
                }
                Event::CData(t) if self.text_depth > 0 => {
                    if String::from_utf8_lossy(&t).chars().any(|c| !c.is_whitespace()) {
                        self.summary.has_text = true;
                        self.saw_visible();
                    }
                }
                Event::Eof => {
                    return Err(Error::MalformedMarkup(
                        "unexpected end of document inside body element".to_string(),
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Inspect a start or empty tag at the current stack position.
    fn open(&mut self, e: &BytesStart<'_>, pos: usize, is_empty: bool) -> Result<()> {
        let name = e.local_name();
        let name = name.as_ref();

        match name {
            b"t" if !is_empty => self.text_depth += 1,
            b"lastRenderedPageBreak" => self.summary.rendered_page_breaks += 1,
            b"br" if !self.in_element(b"txbxContent") => {
                if attribute(e, b"type")?.as_deref() == Some(b"page".as_slice()) {
                    let start = tag_start(self.data, pos);
                    if is_empty {
                        self.push_break(start, pos);
                    } else {
                        self.open_break = Some(start);
                    }
                }
            }
            b"sectPr" if self.path_is(&[b"p", b"pPr"]) => {
                self.section = Some(SectionStart::default());
            }
            b"type" if self.path_is(&[b"p", b"pPr", b"sectPr"]) || self.path_is(&[b"sectPr"]) => {
                if let Some(val) = attribute(e, b"val")? {
                    self.section = Some(SectionStart::from_val(&val));
                }
            }
            _ if GRAPHIC_ELEMENTS.contains(&name) => {
                self.summary.has_graphics = true;
                self.saw_visible();
            }
            _ if FIELD_ELEMENTS.contains(&name) => {
                self.summary.has_field = true;
                self.saw_visible();
            }
            _ if VISIBLE_ELEMENTS.contains(&name) => {
                self.summary.has_other_visible = true;
                self.saw_visible();
            }
            _ => {}
        }
        Ok(())
    }

    fn push_break(&mut self, start: usize, end: usize) {
        self.summary
            .page_break_spans
            .push(start - self.origin..end - self.origin);
        // Only content after the last break moves to the next page
        self.summary.visible_after_break = false;
    }

    /// Record visible content at the current position.
    fn saw_visible(&mut self) {
        if self.summary.has_page_break() || self.open_break.is_some() {
            self.summary.visible_after_break = true;
        }
    }

    /// Whether a text node could still change the summary.
    fn wants_text(&self) -> bool {
        !self.summary.has_text
            || (self.summary.has_page_break() && !self.summary.visible_after_break)
    }

    fn path_is(&self, path: &[&[u8]]) -> bool {
        self.stack.len() == path.len()
            && self
                .stack
                .iter()
                .zip(path)
                .all(|(open, expected)| open.as_slice() == *expected)
    }

    fn in_element(&self, name: &[u8]) -> bool {
        self.stack.iter().any(|open| open.as_slice() == name)
    }

    fn into_kind(self, root_name: &[u8]) -> BlockKind {
        match root_name {
            b"p" => match self.section {
                Some(start) => BlockKind::SectionBreak(SectionBreak {
                    terminal: false,
                    start,
                    content: self.summary,
                }),
                None if self.summary.has_page_break() => BlockKind::PageBreak(self.summary),
                None => BlockKind::Paragraph(self.summary),
            },
            b"tbl" => BlockKind::Table,
            b"sectPr" => BlockKind::SectionBreak(SectionBreak {
                terminal: true,
                start: self.section.unwrap_or_default(),
                content: ContentSummary::default(),
            }),
            other => BlockKind::Opaque(Opaque {
                name: String::from_utf8_lossy(other).into_owned(),
                inert: INERT_ELEMENTS.contains(&other),
                content: self.summary,
            }),
        }
    }
}

/// Offset of the `<` opening the tag that ends at `end`.
///
/// Attribute values cannot contain a raw `<`, so the last one before the end
/// of a start tag is its first byte.
pub(super) fn tag_start(data: &[u8], end: usize) -> usize {
    data[..end]
        .iter()
        .rposition(|&b| b == b'<')
        .unwrap_or(0)
}

/// Raw value of the attribute with the given local name.
fn attribute(e: &BytesStart<'_>, local: &[u8]) -> Result<Option<Vec<u8>>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::MalformedMarkup(err.to_string()))?;
        if attr.key.local_name().as_ref() == local {
            return Ok(Some(attr.value.into_owned()));
        }
    }
    Ok(None)
}
