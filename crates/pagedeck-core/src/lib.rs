//! PDF page merge and split
//!
//! Client-side PDF composition: files are loaded into page references,
//! edited as an ordered working collection (reorder, rotate, duplicate,
//! remove), then planned and executed into output documents using lopdf.
//!
//! The crate is layered so the interesting parts stay independently
//! testable:
//! - [`page`] / [`collection`]: the page-reference model and the pure
//!   editing operations over the working sequence
//! - [`ranges`]: range-expression parsing and selection spans
//! - [`plan`]: translation of a collection (+ ranges) into extraction
//!   instructions, with no PDF library in sight
//! - [`backend`] / [`exec`]: the lopdf-backed capability and the plan
//!   executor
//! - [`workspace`]: the mutable state driven by UI commands

pub mod backend;
pub mod collection;
pub mod command;
pub mod error;
pub mod exec;
pub mod page;
pub mod plan;
pub mod ranges;
pub mod render;
pub mod workspace;

#[cfg(test)]
pub(crate) mod testutil;

pub use backend::{LopdfBackend, PdfBackend};
pub use command::DeckCommand;
pub use error::DeckError;
pub use exec::OutputArtifact;
pub use page::{FileId, PageId, PageRef, Rotation, Thumbnail};
pub use plan::{PageCopy, SplitPart, MERGE_OUTPUT_NAME};
pub use ranges::PageRange;
pub use render::{PlaceholderRenderer, RenderError, ThumbnailRenderer};
pub use workspace::{DeckMode, LoadedFile, Workspace};

/// Parse PDF bytes and return the page count.
pub fn get_page_count(bytes: &[u8]) -> Result<u32, DeckError> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| DeckError::Load(e.to_string()))?;
    Ok(doc.get_pages().len() as u32)
}
