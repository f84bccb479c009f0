//! Operation planner
//!
//! Translates the working collection (merge) or collection + range spec
//! (split) into the exact ordered extraction instructions handed to the
//! PDF capability. Planning never touches byte content, so everything
//! here is testable without a PDF library; execution lives in
//! [`crate::exec`].

use serde::{Deserialize, Serialize};

use crate::error::DeckError;
use crate::page::{FileId, PageRef, Rotation};
use crate::ranges::PageRange;

/// Name given to the merged output artifact.
pub const MERGE_OUTPUT_NAME: &str = "merged.pdf";

/// One extraction instruction: copy `page_index` from `file`, applying
/// `rotation` to the copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCopy {
    pub file: FileId,
    pub page_index: u32,
    pub rotation: Rotation,
}

impl PageCopy {
    fn from_ref(page: &PageRef) -> Self {
        Self {
            file: page.file,
            page_index: page.page_index,
            rotation: page.rotation,
        }
    }
}

/// The instructions for one split output, tagged with its 1-based
/// position among the produced artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPart {
    pub ordinal: usize,
    pub copies: Vec<PageCopy>,
}

/// Plan a merge: one instruction per collection element, in collection
/// order, carrying each element's current rotation.
///
/// Every element must still resolve to a loaded file; this is checked
/// here, before any external call is issued, so a partial merge is never
/// started. An empty collection has nothing to merge.
pub fn plan_merge(pages: &[PageRef], loaded: &[FileId]) -> Result<Vec<PageCopy>, DeckError> {
    if pages.is_empty() {
        return Err(DeckError::SelectionEmpty);
    }
    check_sources(pages, loaded)?;
    Ok(pages.iter().map(PageCopy::from_ref).collect())
}

/// Plan a split: one output per range, part N covering exactly the
/// collection elements at indices `[start, end]` of range N.
pub fn plan_split(
    pages: &[PageRef],
    ranges: &[PageRange],
    loaded: &[FileId],
) -> Result<Vec<SplitPart>, DeckError> {
    if ranges.is_empty() {
        return Err(DeckError::InvalidRange("no ranges specified".into()));
    }
    for range in ranges {
        if range.end >= pages.len() {
            return Err(DeckError::OutOfRange {
                index: range.end,
                len: pages.len(),
            });
        }
    }
    check_sources(pages, loaded)?;

    Ok(ranges
        .iter()
        .enumerate()
        .map(|(i, range)| SplitPart {
            ordinal: i + 1,
            copies: pages[range.start..=range.end]
                .iter()
                .map(PageCopy::from_ref)
                .collect(),
        })
        .collect())
}

fn check_sources(pages: &[PageRef], loaded: &[FileId]) -> Result<(), DeckError> {
    for page in pages {
        if !loaded.contains(&page.file) {
            return Err(DeckError::MissingSource { file: page.file });
        }
    }
    Ok(())
}

/// Deterministic artifact name for split part `ordinal` of `name`.
pub fn part_name(name: &str, ordinal: usize) -> String {
    let stem = name.strip_suffix(".pdf").unwrap_or(name);
    format!("{stem}_part{ordinal}.pdf")
}
