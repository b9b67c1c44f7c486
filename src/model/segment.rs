//! Page segment types.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Whether a page segment has visible content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Nothing on the page would render
    Empty,
    /// The page has visible content
    NonEmpty,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Empty => write!(f, "empty"),
            Classification::NonEmpty => write!(f, "content"),
        }
    }
}

/// A contiguous run of blocks approximating one rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSegment {
    /// Position of the segment in document order (0-indexed)
    pub index: usize,

    /// First block index
    pub start: usize,

    /// One past the last block index
    pub end: usize,

    /// Emptiness classification
    pub classification: Classification,

    /// Index of the boundary block closing the segment, if any
    pub boundary: Option<usize>,

    /// Estimated page number where the segment begins (1-indexed)
    pub page_estimate: u32,
}

impl PageSegment {
    /// Block index range of the segment.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of blocks in the segment.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the segment covers no blocks.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether the segment was classified as empty.
    pub fn is_blank(&self) -> bool {
        self.classification == Classification::Empty
    }
}

/// A run of consecutive empty paragraphs inside a page with content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlankRun {
    /// First block index
    pub start: usize,

    /// One past the last block index
    pub end: usize,

    /// Index of the segment containing the run
    pub segment: usize,
}

impl BlankRun {
    /// Block index range of the run.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of paragraphs in the run.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the run covers no blocks.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
