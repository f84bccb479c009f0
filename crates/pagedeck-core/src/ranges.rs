//! Range specification parsing
//!
//! Converts the free-text range field ("1-3, 4-10"), the "every page on
//! its own" mode, and explicit page selections into validated lists of
//! inclusive index spans over the working collection. One span drives one
//! output file.

use serde::{Deserialize, Serialize};

use crate::error::DeckError;
use crate::page::{PageId, PageRef};

/// An inclusive span of collection indices, 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: usize,
    pub end: usize,
}

impl PageRange {
    /// Number of pages covered; a span is never empty.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Parse a textual range expression like `"1-3, 4-10"` against a
/// collection of `total_pages` pages.
///
/// Tokens are comma-separated, 1-based, either `"N"` or `"N-M"`;
/// whitespace around tokens and around the dash is ignored. Tokens are
/// validated in order and each failure names the offending token. Valid
/// tokens are kept in literal order: overlapping or out-of-order ranges
/// are allowed and are not merged, since each token is meant to become
/// its own output document.
pub fn parse_range_text(text: &str, total_pages: usize) -> Result<Vec<PageRange>, DeckError> {
    let mut ranges = Vec::new();

    for raw in text.split(',') {
        let token = raw.trim();
        if token.is_empty() {
            continue;
        }

        let (start, end) = match token.split_once('-') {
            Some((a, b)) => {
                let start: usize = a.trim().parse().map_err(|_| not_a_number(token))?;
                let end: usize = b.trim().parse().map_err(|_| not_a_number(token))?;
                (start, end)
            }
            None => {
                let page: usize = token.parse().map_err(|_| not_a_number(token))?;
                (page, page)
            }
        };

        if start < 1 || end < start {
            return Err(DeckError::InvalidRange(format!(
                "\"{token}\" must satisfy 1 <= start <= end"
            )));
        }
        if end > total_pages {
            return Err(DeckError::InvalidRange(format!(
                "\"{token}\" exceeds the document ({total_pages} pages)"
            )));
        }

        ranges.push(PageRange {
            start: start - 1,
            end: end - 1,
        });
    }

    if ranges.is_empty() {
        return Err(DeckError::InvalidRange(format!(
            "\"{}\" contains no ranges",
            text.trim()
        )));
    }

    Ok(ranges)
}

fn not_a_number(token: &str) -> DeckError {
    DeckError::InvalidRange(format!("\"{token}\" is not a page number"))
}

/// The "split everything" spec: one singleton range per page.
pub fn one_per_page(total_pages: usize) -> Vec<PageRange> {
    (0..total_pages)
        .map(|i| PageRange { start: i, end: i })
        .collect()
}

/// Collapse an explicit page selection into a single span covering the
/// lowest through highest selected index.
///
/// Any unselected pages sitting between the extremes are included. That
/// is the documented behavior of the selection mode (one contiguous
/// excerpt), not an oversight. Selected ids that no longer resolve to a
/// collection index are ignored; if nothing resolves the selection is
/// empty.
pub fn span_of_selection(
    selected: &[PageId],
    pages: &[PageRef],
) -> Result<Vec<PageRange>, DeckError> {
    let mut indices: Vec<usize> = selected
        .iter()
        .filter_map(|id| pages.iter().position(|p| p.id == *id))
        .collect();
    indices.sort_unstable();

    match (indices.first(), indices.last()) {
        (Some(&start), Some(&end)) => Ok(vec![PageRange { start, end }]),
        _ => Err(DeckError::SelectionEmpty),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Arbitrary input never panics, it either parses or errors.
        #[test]
        fn parse_never_panics(text in ".{0,40}", total in 0usize..50) {
            let _ = parse_range_text(&text, total);
        }

        /// Whatever parses is in bounds.
        #[test]
        fn parsed_ranges_are_in_bounds(text in "[0-9, -]{0,30}", total in 1usize..50) {
            if let Ok(spec) = parse_range_text(&text, total) {
                for r in spec {
                    prop_assert!(r.start <= r.end);
                    prop_assert!(r.end < total);
                }
            }
        }
    }
}
