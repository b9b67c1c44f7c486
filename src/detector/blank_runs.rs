//! Detection of Enter-filled space inside pages with content.

use crate::model::{BlankRun, Document, PageSegment};

/// Find runs of at least `min_len` consecutive empty plain paragraphs.
///
/// Only segments with content are searched; empty segments are removed
/// whole instead. Break and section paragraphs end a run and are never part
/// of one.
pub fn blank_runs(doc: &Document, segments: &[PageSegment], min_len: usize) -> Vec<BlankRun> {
    let blocks = doc.blocks();
    let min_len = min_len.max(1);
    let mut runs = Vec::new();

    for segment in segments.iter().filter(|s| !s.is_blank()) {
        let mut run_start: Option<usize> = None;

        for i in segment.range() {
            let block = &blocks[i];
            if block.is_paragraph() && !block.has_visible_content() {
                run_start.get_or_insert(i);
                continue;
            }
            if let Some(start) = run_start.take() {
                push_run(&mut runs, start, i, segment.index, min_len);
            }
        }

        if let Some(start) = run_start {
            push_run(&mut runs, start, segment.end, segment.index, min_len);
        }
    }

    log::debug!("Found {} blank runs of {}+ paragraphs", runs.len(), min_len);
    runs
}

fn push_run(runs: &mut Vec<BlankRun>, start: usize, end: usize, segment: usize, min_len: usize) {
    if end - start >= min_len {
        runs.push(BlankRun {
            start,
            end,
            segment,
        });
    }
}
