//! Page segmentation and emptiness classification.

use crate::model::{Block, Classification, Document, PageSegment};

/// Partition the body into page segments.
///
/// A segment opens at the start of the body and after every boundary
/// block; the boundary belongs to the segment it closes. Blocks after the
/// last boundary form a final segment without one. The returned segments
/// cover every block exactly once, in document order.
///
/// Content after the page break inside a break paragraph renders on the
/// next page, so the segment after such a boundary is never empty.
pub fn segment(doc: &Document) -> Vec<PageSegment> {
    let blocks = doc.blocks();
    let use_rendered = doc.rendered_page_breaks() > 0;

    let mut segments = Vec::new();
    let mut start = 0;
    let mut boundaries_before = 0u32;
    let mut rendered_before = 0u32;
    let mut carried = false;

    for (i, block) in blocks.iter().enumerate() {
        if !block.is_boundary() {
            continue;
        }

        segments.push(build(
            segments.len(),
            &blocks[start..=i],
            start,
            Some(i),
            carried,
            estimate(use_rendered, boundaries_before, rendered_before),
        ));
        rendered_before += count_rendered(&blocks[start..=i]);
        boundaries_before += 1;
        carried = block.carries_content_forward();
        start = i + 1;
    }

    if start < blocks.len() {
        segments.push(build(
            segments.len(),
            &blocks[start..],
            start,
            None,
            carried,
            estimate(use_rendered, boundaries_before, rendered_before),
        ));
    }

    log::debug!(
        "Segmented {} blocks into {} pages ({} empty)",
        blocks.len(),
        segments.len(),
        segments.iter().filter(|s| s.is_blank()).count()
    );

    segments
}

/// Classify a run of blocks.
///
/// The run is empty when it holds no table, no paragraph with visible
/// content, and no unknown element other than known markers.
pub fn classify(blocks: &[Block]) -> Classification {
    if blocks.iter().any(Block::has_visible_content) {
        Classification::NonEmpty
    } else {
        Classification::Empty
    }
}

fn build(
    index: usize,
    blocks: &[Block],
    start: usize,
    boundary: Option<usize>,
    carried: bool,
    page_estimate: u32,
) -> PageSegment {
    let classification = if carried {
        Classification::NonEmpty
    } else {
        classify(blocks)
    };

    PageSegment {
        index,
        start,
        end: start + blocks.len(),
        classification,
        boundary,
        page_estimate,
    }
}

/// Page number where a segment begins.
///
/// Word records where it last broke pages with `w:lastRenderedPageBreak`;
/// when those markers exist they are a better guide than explicit breaks.
fn estimate(use_rendered: bool, boundaries_before: u32, rendered_before: u32) -> u32 {
    if use_rendered {
        1 + rendered_before
    } else {
        1 + boundaries_before
    }
}

fn count_rendered(blocks: &[Block]) -> u32 {
    blocks.iter().map(Block::rendered_page_breaks).sum()
}
