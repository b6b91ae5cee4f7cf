//! Page range selection ("all" or "start-end")

use crate::error::{Error, Result};
use std::ops::Range;
use std::str::FromStr;

/// Requested pages, validated before the document is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageRange {
    #[default]
    All,
    /// 1-indexed inclusive bounds as written by the caller
    Span { start: i64, end: i64 },
}

impl PageRange {
    /// Resolve against the document's page count into 0-indexed page indices.
    ///
    /// Bounds are clamped to the document; an inverted span is empty.
    pub fn resolve(&self, page_count: usize) -> Range<usize> {
        match *self {
            PageRange::All => 0..page_count,
            PageRange::Span { start, end } => {
                let start = usize::try_from(start.saturating_sub(1)).unwrap_or(0);
                let end = usize::try_from(end).unwrap_or(0).min(page_count);
                if start >= end {
                    0..0
                } else {
                    start..end
                }
            }
        }
    }
}

impl FromStr for PageRange {
    type Err = Error;

    fn from_str(range: &str) -> Result<Self> {
        parse_page_range(range)
    }
}

/// Parse page range string ("all" or e.g. "1-3")
pub fn parse_page_range(range: &str) -> Result<PageRange> {
    if range == "all" {
        return Ok(PageRange::All);
    }

    let invalid = || Error::InvalidPageRange {
        range: range.to_string(),
    };

    // Exactly two bounds; a sign on either one adds a separator and is rejected
    let bounds: Vec<&str> = range.split('-').collect();
    let [start, end] = bounds.as_slice() else {
        return Err(invalid());
    };
    let start: i64 = start.trim().parse().map_err(|_| invalid())?;
    let end: i64 = end.trim().parse().map_err(|_| invalid())?;

    Ok(PageRange::Span { start, end })
}
