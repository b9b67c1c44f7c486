//! Segment selection for excision.

use crate::error::{Error, Result};
use crate::model::PageSegment;

/// Largest page number accepted in a selection.
pub const MAX_PAGE_NUMBER: usize = 100_000;

/// Which page segments to remove.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Every segment classified as empty
    #[default]
    All,
    /// Specific segments by index (0-indexed)
    Indices(Vec<usize>),
}

impl Selection {
    /// Parse a user selection string.
    ///
    /// Accepts `all` / `a`, or a comma-separated list of 1-indexed segment
    /// numbers and ranges such as `2,4-6`. Numbers above
    /// [`MAX_PAGE_NUMBER`] are rejected.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case("a") {
            return Ok(Selection::All);
        }
        if s.is_empty() {
            return Err(Error::InvalidInput("empty selection".to_string()));
        }

        let mut indices = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if let Some((start, end)) = part.split_once('-') {
                let start = parse_number(start)?;
                let end = parse_number(end)?;
                if start > end {
                    return Err(Error::InvalidInput(format!("invalid range: {}", part)));
                }
                indices.extend((start..=end).map(|n| n - 1));
            } else {
                indices.push(parse_number(part)? - 1);
            }
        }

        if indices.is_empty() {
            return Err(Error::InvalidInput("empty selection".to_string()));
        }

        indices.sort_unstable();
        indices.dedup();
        Ok(Selection::Indices(indices))
    }

    /// Resolve the selection against the segments of a document.
    ///
    /// Fails with [`Error::InvalidInput`] when an index names a segment the
    /// document does not have.
    pub fn resolve(&self, segments: &[PageSegment]) -> Result<Vec<PageSegment>> {
        match self {
            Selection::All => Ok(segments.iter().filter(|s| s.is_blank()).cloned().collect()),
            Selection::Indices(indices) => {
                let mut selected = Vec::with_capacity(indices.len());
                for &index in indices {
                    let segment = segments.get(index).ok_or_else(|| {
                        Error::InvalidInput(format!(
                            "page {} does not exist (document has {} pages)",
                            index + 1,
                            segments.len()
                        ))
                    })?;
                    selected.push(segment.clone());
                }
                selected.sort_by_key(|s| s.index);
                selected.dedup_by_key(|s| s.index);
                Ok(selected)
            }
        }
    }
}

fn parse_number(s: &str) -> Result<usize> {
    let s = s.trim();
    match s.parse::<usize>() {
        Ok(n) if n > MAX_PAGE_NUMBER => Err(Error::InvalidInput(format!(
            "page number {} is too large (at most {})",
            n, MAX_PAGE_NUMBER
        ))),
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(Error::InvalidInput(format!("invalid page number: '{}'", s))),
    }
}
