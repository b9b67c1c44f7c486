//! Empty-page detection module.
//!
//! Splits the body into page segments at explicit page and section
//! boundaries and classifies each one by content presence. Emptiness is a
//! property of the markup, not of rendered layout.

mod blank_runs;
mod options;
mod segments;

pub use blank_runs::blank_runs;
pub use options::{DetectOptions, DEFAULT_MIN_BLANK_RUN};
pub use segments::{classify, segment};

use crate::model::{BlankRun, Document, PageSegment};
use serde::{Deserialize, Serialize};

/// Result of scanning a document for empty pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Number of body blocks
    pub block_count: usize,

    /// All page segments in document order
    pub segments: Vec<PageSegment>,

    /// Runs of empty paragraphs inside pages with content
    pub blank_runs: Vec<BlankRun>,
}

impl ScanReport {
    /// Segments classified as empty.
    pub fn empty_segments(&self) -> impl Iterator<Item = &PageSegment> {
        self.segments.iter().filter(|s| s.is_blank())
    }

    /// Number of empty segments.
    pub fn empty_count(&self) -> usize {
        self.empty_segments().count()
    }

    /// Whether nothing removable was found.
    pub fn is_clean(&self) -> bool {
        self.empty_count() == 0 && self.blank_runs.is_empty()
    }
}

/// Scan a parsed document.
pub fn scan(doc: &Document, options: &DetectOptions) -> ScanReport {
    let segments = segment(doc);
    let blank_runs = if options.blank_runs {
        blank_runs(doc, &segments, options.min_blank_run)
    } else {
        Vec::new()
    };

    ScanReport {
        block_count: doc.len(),
        segments,
        blank_runs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_scan_report() {
        let xml = format!(
            r#"<w:document><w:body><w:p><w:r><w:t>A</w:t></w:r></w:p>{}<w:p><w:r><w:br w:type="page"/></w:r></w:p><w:sectPr/></w:body></w:document>"#,
            "<w:p/>".repeat(3)
        );
        let doc = parse(xml.as_bytes()).unwrap();

        let report = scan(&doc, &DetectOptions::default());
        assert_eq!(report.block_count, 6);
        assert_eq!(report.segments.len(), 2);
        assert_eq!(report.empty_count(), 1);
        assert!(report.blank_runs.is_empty());
        assert!(!report.is_clean());

        let report = scan(&doc, &DetectOptions::new().with_blank_runs(true).with_min_blank_run(3));
        assert_eq!(report.blank_runs.len(), 1);
    }
}
