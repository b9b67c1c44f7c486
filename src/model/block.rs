//! Block-level types.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Facts about the inline content of a paragraph-like block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSummary {
    /// Non-whitespace text in `w:t` runs
    pub has_text: bool,

    /// Drawings, VML pictures or embedded objects
    pub has_graphics: bool,

    /// Field characters, instructions or simple fields
    pub has_field: bool,

    /// Symbols, note references, math and similar inline content
    pub has_other_visible: bool,

    /// Number of `w:lastRenderedPageBreak` markers
    pub rendered_page_breaks: u32,

    /// Visible content follows the last page break, so it renders on the next page
    #[serde(default)]
    pub visible_after_break: bool,

    /// Byte spans of `w:br w:type="page"` elements, relative to the block markup
    #[serde(skip)]
    pub page_break_spans: Vec<Range<usize>>,
}

impl ContentSummary {
    /// Whether anything in the block would render visibly.
    pub fn is_visible(&self) -> bool {
        self.has_text || self.has_graphics || self.has_field || self.has_other_visible
    }

    /// Whether the block contains an explicit page break.
    pub fn has_page_break(&self) -> bool {
        !self.page_break_spans.is_empty()
    }
}

/// How a section starts relative to the previous one (`w:sectPr/w:type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionStart {
    /// Section continues on the same page
    Continuous,
    /// Section starts in the next column
    NextColumn,
    /// Section starts on the next page (schema default)
    #[default]
    NextPage,
    /// Section starts on the next even page
    EvenPage,
    /// Section starts on the next odd page
    OddPage,
}

impl SectionStart {
    /// Parse a `w:val` attribute value. Unknown values fall back to the default.
    pub fn from_val(val: &[u8]) -> Self {
        match val {
            b"continuous" => SectionStart::Continuous,
            b"nextColumn" => SectionStart::NextColumn,
            b"evenPage" => SectionStart::EvenPage,
            b"oddPage" => SectionStart::OddPage,
            _ => SectionStart::NextPage,
        }
    }

    /// Whether a section of this type begins a new page.
    pub fn starts_page(self) -> bool {
        matches!(
            self,
            SectionStart::NextPage | SectionStart::EvenPage | SectionStart::OddPage
        )
    }
}

/// A section boundary: a paragraph carrying `w:pPr/w:sectPr`, or the
/// body-level `w:sectPr` that describes the last section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBreak {
    /// True for the body-level section properties node
    pub terminal: bool,

    /// Start type of the section that follows
    pub start: SectionStart,

    /// Content of the carrying paragraph (empty for the terminal node)
    pub content: ContentSummary,
}

/// A body element the model does not interpret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opaque {
    /// Local element name, e.g. `sdt` or `bookmarkStart`
    pub name: String,

    /// Known zero-content marker
    pub inert: bool,

    /// Whatever visible content a scan of the element found
    pub content: ContentSummary,
}

/// Kind of a top-level body element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// A `w:p` with no boundary semantics
    Paragraph(ContentSummary),

    /// A `w:p` containing a page break
    PageBreak(ContentSummary),

    /// A section boundary
    SectionBreak(SectionBreak),

    /// A `w:tbl`
    Table,

    /// Anything else, kept verbatim
    Opaque(Opaque),
}

/// A top-level element of the document body together with its exact markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Interpreted kind
    pub kind: BlockKind,

    /// Inter-element bytes (whitespace, comments) preceding the element
    pub leading: Vec<u8>,

    /// Exact original serialization of the element
    pub markup: Vec<u8>,
}

impl Block {
    /// Create a block from its kind and markup.
    pub fn new(kind: BlockKind, leading: impl Into<Vec<u8>>, markup: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            leading: leading.into(),
            markup: markup.into(),
        }
    }

    /// Whether this block closes a page segment.
    pub fn is_boundary(&self) -> bool {
        match &self.kind {
            BlockKind::PageBreak(_) => true,
            BlockKind::SectionBreak(section) => section.terminal || section.start.starts_page(),
            _ => false,
        }
    }

    /// Whether this is the body-level section properties node.
    pub fn is_terminal(&self) -> bool {
        matches!(&self.kind, BlockKind::SectionBreak(s) if s.terminal)
    }

    /// Whether this is a plain paragraph (no break semantics).
    pub fn is_paragraph(&self) -> bool {
        matches!(self.kind, BlockKind::Paragraph(_))
    }

    /// Whether this is a table.
    pub fn is_table(&self) -> bool {
        matches!(self.kind, BlockKind::Table)
    }

    /// Inline content summary, if the block has one.
    pub fn content(&self) -> Option<&ContentSummary> {
        match &self.kind {
            BlockKind::Paragraph(c) | BlockKind::PageBreak(c) => Some(c),
            BlockKind::SectionBreak(s) => Some(&s.content),
            BlockKind::Opaque(o) => Some(&o.content),
            BlockKind::Table => None,
        }
    }

    /// Whether the block contributes visible content to its page.
    ///
    /// Tables always count. Unknown elements count unless they are known
    /// markers with nothing visible inside.
    pub fn has_visible_content(&self) -> bool {
        match &self.kind {
            BlockKind::Table => true,
            BlockKind::Opaque(o) => !o.inert || o.content.is_visible(),
            _ => self.content().map(ContentSummary::is_visible).unwrap_or(false),
        }
    }

    /// Whether the block breaks the page and then puts visible content on
    /// the next one, as in `<w:br w:type="page"/>` followed by text.
    pub fn carries_content_forward(&self) -> bool {
        matches!(&self.kind, BlockKind::PageBreak(c) if c.visible_after_break)
    }

    /// Number of `w:lastRenderedPageBreak` markers in the block.
    pub fn rendered_page_breaks(&self) -> u32 {
        self.content().map(|c| c.rendered_page_breaks).unwrap_or(0)
    }

    /// Short name of the block kind for reports and logs.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            BlockKind::Paragraph(_) => "paragraph",
            BlockKind::PageBreak(_) => "page-break",
            BlockKind::SectionBreak(s) if s.terminal => "section-properties",
            BlockKind::SectionBreak(_) => "section-break",
            BlockKind::Table => "table",
            BlockKind::Opaque(_) => "opaque",
        }
    }

    /// Append leading bytes and markup to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.leading);
        out.extend_from_slice(&self.markup);
    }

    /// Copy of a page-break paragraph with its page-break elements removed.
    ///
    /// Returns `None` for any block that is not a `PageBreak`.
    pub fn without_page_breaks(&self) -> Option<Block> {
        let BlockKind::PageBreak(content) = &self.kind else {
            return None;
        };

        let mut markup = Vec::with_capacity(self.markup.len());
        let mut cursor = 0;
        for span in &content.page_break_spans {
            markup.extend_from_slice(&self.markup[cursor..span.start]);
            cursor = span.end;
        }
        markup.extend_from_slice(&self.markup[cursor..]);

        let content = ContentSummary {
            page_break_spans: Vec::new(),
            visible_after_break: false,
            ..content.clone()
        };

        Some(Block {
            kind: BlockKind::Paragraph(content),
            leading: self.leading.clone(),
            markup,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(terminal: bool, start: SectionStart) -> Block {
        Block::new(
            BlockKind::SectionBreak(SectionBreak {
                terminal,
                start,
                content: ContentSummary::default(),
            }),
            "",
            "<w:sectPr/>",
        )
    }

    #[test]
    fn test_section_start_parsing() {
        assert_eq!(SectionStart::from_val(b"continuous"), SectionStart::Continuous);
        assert_eq!(SectionStart::from_val(b"oddPage"), SectionStart::OddPage);
        assert_eq!(SectionStart::from_val(b"bogus"), SectionStart::NextPage);
        assert!(SectionStart::EvenPage.starts_page());
        assert!(!SectionStart::NextColumn.starts_page());
    }

    #[test]
    fn test_boundaries() {
        assert!(section(true, SectionStart::Continuous).is_boundary());
        assert!(section(false, SectionStart::NextPage).is_boundary());
        assert!(!section(false, SectionStart::Continuous).is_boundary());

        let para = Block::new(BlockKind::Paragraph(ContentSummary::default()), "", "<w:p/>");
        assert!(!para.is_boundary());
        assert!(!para.has_visible_content());
    }

    #[test]
    fn test_opaque_visibility() {
        let marker = Block::new(
            BlockKind::Opaque(Opaque {
                name: "bookmarkEnd".into(),
                inert: true,
                content: ContentSummary::default(),
            }),
            "",
            "<w:bookmarkEnd w:id=\"0\"/>",
        );
        assert!(!marker.has_visible_content());

        let unknown = Block::new(
            BlockKind::Opaque(Opaque {
                name: "altChunk".into(),
                inert: false,
                content: ContentSummary::default(),
            }),
            "",
            "<w:altChunk r:id=\"rId9\"/>",
        );
        assert!(unknown.has_visible_content());
    }

    #[test]
    fn test_without_page_breaks() {
        let markup = "<w:p><w:r><w:t>x</w:t><w:br w:type=\"page\"/></w:r></w:p>";
        let start = markup.find("<w:br").unwrap();
        let end = start + "<w:br w:type=\"page\"/>".len();
        let block = Block::new(
            BlockKind::PageBreak(ContentSummary {
                has_text: true,
                page_break_spans: vec![start..end],
                ..Default::default()
            }),
            "\n",
            markup,
        );

        let stripped = block.without_page_breaks().unwrap();
        assert_eq!(stripped.markup, b"<w:p><w:r><w:t>x</w:t></w:r></w:p>");
        assert_eq!(stripped.leading, b"\n");
        assert!(stripped.is_paragraph());
        assert!(stripped.has_visible_content());
    }
}
