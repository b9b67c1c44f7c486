//! Document model types for DOCX body content.
//!
//! This module defines the representation that bridges body parsing,
//! empty-page detection and excision. Every block keeps its exact original
//! markup so untouched content is written back byte-for-byte.

mod block;
mod document;
mod segment;

pub use block::{Block, BlockKind, ContentSummary, Opaque, SectionBreak, SectionStart};
pub use document::Document;
pub use segment::{BlankRun, Classification, PageSegment};
