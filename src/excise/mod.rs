//! Page excision module.
//!
//! Removes selected page segments from a document while keeping the body's
//! terminal section properties in place.

mod selection;

pub use selection::{Selection, MAX_PAGE_NUMBER};

use crate::detector::segment;
use crate::error::{Error, Result};
use crate::model::{BlankRun, Block, BlockKind, Document, PageSegment};

/// Remove the blocks of the given segments.
///
/// Every block in a targeted segment is removed, boundary included, except
/// the terminal section properties node, which stays after the nearest
/// remaining block. Adjacent targets collapse into one deletion. If removing
/// the last segment leaves the terminal node directly after a page break,
/// that break would open the same empty page again, so it is dropped (or
/// stripped from its paragraph when the paragraph has content).
///
/// The input is not modified. Fails with [`Error::StructuralViolation`]
/// when the document does not have exactly one terminal node at the end,
/// or when a target does not match the document's current segmentation.
pub fn excise(doc: &Document, targets: &[PageSegment]) -> Result<Document> {
    let terminal = doc.check_terminal().map_err(Error::StructuralViolation)?;

    if targets.is_empty() {
        return Ok(doc.clone());
    }

    let current = segment(doc);
    for target in targets {
        if current.get(target.index) != Some(target) {
            return Err(Error::StructuralViolation(format!(
                "page {} does not match the document's current pages",
                target.index + 1
            )));
        }
        if !target.is_blank() {
            log::warn!(
                "Removing page {} even though it has visible content",
                target.index + 1
            );
        }
    }

    let mut remove = vec![false; doc.len()];
    for target in targets {
        remove[target.range()].fill(true);
    }
    let terminal_targeted = remove[terminal];
    remove[terminal] = false;

    let mut blocks: Vec<Block> = doc
        .blocks()
        .iter()
        .zip(&remove)
        .filter(|(_, &removed)| !removed)
        .map(|(block, _)| block.clone())
        .collect();

    if terminal_targeted {
        relink_terminal(&mut blocks);
    }

    let result = doc.with_blocks(blocks);
    result.check_terminal().map_err(Error::StructuralViolation)?;

    log::info!(
        "Removed {} page(s), {} of {} blocks",
        targets.len(),
        doc.len() - result.len(),
        doc.len()
    );

    Ok(result)
}

/// Resolve a selection and excise it in one step.
pub fn excise_selection(doc: &Document, selection: &Selection) -> Result<Document> {
    let targets = selection.resolve(&segment(doc))?;
    excise(doc, &targets)
}

/// Remove runs of empty paragraphs.
///
/// Every block in a run must be a plain paragraph without visible content;
/// anything else means the runs do not belong to this document and fails
/// with [`Error::StructuralViolation`].
pub fn excise_blank_runs(doc: &Document, runs: &[BlankRun]) -> Result<Document> {
    doc.check_terminal().map_err(Error::StructuralViolation)?;

    let mut remove = vec![false; doc.len()];
    for run in runs {
        let blocks = doc.blocks().get(run.range()).ok_or_else(|| {
            Error::StructuralViolation(format!(
                "blank run {}..{} is outside the body",
                run.start, run.end
            ))
        })?;
        if blocks
            .iter()
            .any(|b| !b.is_paragraph() || b.has_visible_content())
        {
            return Err(Error::StructuralViolation(format!(
                "blank run {}..{} contains content",
                run.start, run.end
            )));
        }
        remove[run.range()].fill(true);
    }

    let blocks: Vec<Block> = doc
        .blocks()
        .iter()
        .zip(&remove)
        .filter(|(_, &removed)| !removed)
        .map(|(block, _)| block.clone())
        .collect();

    let result = doc.with_blocks(blocks);
    result.check_terminal().map_err(Error::StructuralViolation)?;

    log::info!(
        "Removed {} blank run(s), {} paragraphs",
        runs.len(),
        doc.len() - result.len()
    );

    Ok(result)
}

/// Re-link the terminal node to the content before it.
///
/// `blocks` ends with the terminal node.
fn relink_terminal(blocks: &mut Vec<Block>) {
    let Some(prev) = blocks.len().checked_sub(2) else {
        return;
    };

    let dangling = &blocks[prev];
    match &dangling.kind {
        BlockKind::PageBreak(content) if !content.is_visible() => {
            log::debug!("Dropping page break left before the final section");
            blocks.remove(prev);
        }
        BlockKind::PageBreak(content) if content.visible_after_break => {
            log::warn!("Page break before the final section starts a page with content; kept");
        }
        BlockKind::PageBreak(_) => {
            if let Some(stripped) = dangling.without_page_breaks() {
                log::debug!("Stripping page break from the paragraph before the final section");
                blocks[prev] = stripped;
            }
        }
        BlockKind::SectionBreak(section) if !section.terminal && section.start.starts_page() => {
            log::warn!("A section break still precedes the final section; its page is kept");
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn body(inner: &str) -> Document {
        let xml = format!("<w:document><w:body>{}</w:body></w:document>", inner);
        parse(xml.as_bytes()).unwrap()
    }

    const TEXT: &str = "<w:p><w:r><w:t>Text</w:t></w:r></w:p>";
    const BLANK: &str = r#"<w:p><w:r><w:t xml:space="preserve"> </w:t></w:r></w:p>"#;
    const BREAK: &str = r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#;
    const SECT: &str = "<w:sectPr/>";

    fn kinds(doc: &Document) -> Vec<&'static str> {
        doc.blocks().iter().map(Block::kind_name).collect()
    }

    #[test]
    fn test_remove_middle_empty_page() {
        let doc = body(&format!("{TEXT}{BREAK}{BLANK}{BREAK}{TEXT}{SECT}"));
        let result = excise_selection(&doc, &Selection::All).unwrap();

        assert_eq!(
            kinds(&result),
            vec!["paragraph", "page-break", "paragraph", "section-properties"]
        );
        assert_eq!(segment(&result).len(), 2);
        // Input left untouched
        assert_eq!(doc.len(), 6);
    }

    #[test]
    fn test_ghost_page_keeps_terminal() {
        let doc = body(&format!("{TEXT}{BREAK}{SECT}"));
        let segments = segment(&doc);
        assert!(segments[1].is_blank());

        let result = excise(&doc, &segments[1..]).unwrap();
        assert_eq!(kinds(&result), vec!["paragraph", "section-properties"]);
        assert_eq!(result.terminal_count(), 1);
        assert_eq!(segment(&result).len(), 1);
    }

    #[test]
    fn test_trailing_empty_paragraphs_removed() {
        let doc = body(&format!("{TEXT}{BREAK}{BLANK}{BLANK}{SECT}"));
        let result = excise_selection(&doc, &Selection::All).unwrap();
        assert_eq!(kinds(&result), vec!["paragraph", "section-properties"]);
    }

    #[test]
    fn test_break_with_text_is_stripped() {
        let ending = r#"<w:p><w:r><w:t>End</w:t><w:br w:type="page"/></w:r></w:p>"#;
        let doc = body(&format!("{ending}{BLANK}{SECT}"));
        let result = excise_selection(&doc, &Selection::All).unwrap();

        assert_eq!(kinds(&result), vec!["paragraph", "section-properties"]);
        assert_eq!(
            result.blocks()[0].markup,
            b"<w:p><w:r><w:t>End</w:t></w:r></w:p>"
        );
        assert_eq!(segment(&result).len(), 1);
    }

    #[test]
    fn test_text_after_break_is_not_removed() {
        let chapter = r#"<w:p><w:r><w:br w:type="page"/></w:r><w:r><w:t>Chapter 2</w:t></w:r></w:p>"#;
        let doc = body(&format!("{TEXT}{chapter}{SECT}"));

        let result = excise_selection(&doc, &Selection::All).unwrap();
        assert_eq!(result, doc);
    }

    #[test]
    fn test_selected_page_keeps_break_with_content_after() {
        let chapter = r#"<w:p><w:r><w:br w:type="page"/></w:r><w:r><w:t>Chapter 2</w:t></w:r></w:p>"#;
        let doc = body(&format!("{TEXT}{chapter}{SECT}"));

        // Selecting the last page removes nothing but the terminal, which stays
        let result = excise_selection(&doc, &Selection::Indices(vec![1])).unwrap();
        assert_eq!(result.blocks()[1].markup, chapter.as_bytes());
        assert_eq!(segment(&result).len(), 2);
    }

    #[test]
    fn test_adjacent_empty_pages_collapse() {
        let doc = body(&format!("{TEXT}{BREAK}{BREAK}{BLANK}{BREAK}{TEXT}{SECT}"));
        let segments = segment(&doc);
        assert_eq!(segments.len(), 4);

        let result = excise(&doc, &segments[1..3]).unwrap();
        assert_eq!(
            kinds(&result),
            vec!["paragraph", "page-break", "paragraph", "section-properties"]
        );
    }

    #[test]
    fn test_section_break_before_terminal_is_kept() {
        let section = "<w:p><w:pPr><w:sectPr/></w:pPr></w:p>";
        let doc = body(&format!("{TEXT}{section}{BLANK}{SECT}"));
        let result = excise_selection(&doc, &Selection::All).unwrap();
        assert_eq!(
            kinds(&result),
            vec!["paragraph", "section-break", "section-properties"]
        );
    }

    #[test]
    fn test_missing_terminal_is_violation() {
        let doc = body(&format!("{TEXT}{BREAK}{BLANK}"));
        let segments = segment(&doc);
        let result = excise(&doc, &segments[1..]);
        assert!(matches!(result, Err(Error::StructuralViolation(_))));
    }

    #[test]
    fn test_stale_segment_is_violation() {
        let doc = body(&format!("{TEXT}{BREAK}{BLANK}{SECT}"));
        let mut stale = segment(&doc)[1].clone();
        stale.end += 1;
        let result = excise(&doc, &[stale]);
        assert!(matches!(result, Err(Error::StructuralViolation(_))));
    }

    #[test]
    fn test_unknown_index_is_invalid_input() {
        let doc = body(&format!("{TEXT}{BREAK}{BLANK}{SECT}"));
        let result = excise_selection(&doc, &Selection::Indices(vec![5]));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_every_selection_keeps_one_terminal() {
        let doc = body(&format!("{BLANK}{BREAK}{TEXT}{BREAK}{BREAK}{BLANK}{SECT}"));
        let count = segment(&doc).len();
        for mask in 0u32..(1 << count) {
            let indices: Vec<usize> = (0..count).filter(|i| mask & (1 << i) != 0).collect();
            let result = excise_selection(&doc, &Selection::Indices(indices)).unwrap();
            assert_eq!(result.terminal_count(), 1);
            assert_eq!(result.terminal_index(), Some(result.len() - 1));
        }
    }

    #[test]
    fn test_excise_blank_runs() {
        let doc = body(&format!("{TEXT}{}{TEXT}{SECT}", "<w:p/>".repeat(4)));
        let runs = crate::detector::blank_runs(&doc, &segment(&doc), 3);
        let result = excise_blank_runs(&doc, &runs).unwrap();
        assert_eq!(
            kinds(&result),
            vec!["paragraph", "paragraph", "section-properties"]
        );
    }

    #[test]
    fn test_blank_run_with_content_rejected() {
        let doc = body(&format!("{TEXT}{BLANK}{SECT}"));
        let bogus = BlankRun {
            start: 0,
            end: 2,
            segment: 0,
        };
        assert!(matches!(
            excise_blank_runs(&doc, &[bogus]),
            Err(Error::StructuralViolation(_))
        ));
    }
}
