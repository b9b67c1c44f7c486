//! Document-level types.

use super::Block;

/// A parsed document body.
///
/// Holds the bytes around the body's children verbatim, so that writing
/// `prolog`, every block, and `epilog` in order reproduces the part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Everything up to and including the `<w:body>` start tag
    prolog: Vec<u8>,

    /// Top-level body elements in document order
    blocks: Vec<Block>,

    /// Trailing inter-element bytes, `</w:body>` and everything after
    epilog: Vec<u8>,
}

impl Document {
    /// Create a document from its parts.
    pub fn new(prolog: Vec<u8>, blocks: Vec<Block>, epilog: Vec<u8>) -> Self {
        Self {
            prolog,
            blocks,
            epilog,
        }
    }

    /// Create a copy of this document with a different block sequence.
    pub fn with_blocks(&self, blocks: Vec<Block>) -> Self {
        Self {
            prolog: self.prolog.clone(),
            blocks,
            epilog: self.epilog.clone(),
        }
    }

    /// Bytes before the first block.
    pub fn prolog(&self) -> &[u8] {
        &self.prolog
    }

    /// Bytes after the last block.
    pub fn epilog(&self) -> &[u8] {
        &self.epilog
    }

    /// Body blocks in document order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Get a block by index.
    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Number of blocks in the body.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the body has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of body-level section properties nodes.
    pub fn terminal_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_terminal()).count()
    }

    /// Index of the terminal section properties node, when it is the last block.
    pub fn terminal_index(&self) -> Option<usize> {
        let last = self.blocks.len().checked_sub(1)?;
        self.blocks[last].is_terminal().then_some(last)
    }

    /// Verify the single-terminal invariant, returning the terminal index.
    ///
    /// The body must contain exactly one body-level `w:sectPr` and it must be
    /// the final block.
    pub fn check_terminal(&self) -> std::result::Result<usize, String> {
        match self.terminal_count() {
            0 => Err("body has no terminal section properties".to_string()),
            1 => self
                .terminal_index()
                .ok_or_else(|| "terminal section properties is not the last block".to_string()),
            n => Err(format!("body has {} terminal section properties nodes", n)),
        }
    }

    /// Total number of `w:lastRenderedPageBreak` markers in the body.
    pub fn rendered_page_breaks(&self) -> u32 {
        self.blocks.iter().map(Block::rendered_page_breaks).sum()
    }
}
