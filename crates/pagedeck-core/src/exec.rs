//! Plan execution
//!
//! Runs the planner's instruction lists against a [`PdfBackend`]. Each
//! distinct source document is loaded once per execution; instructions
//! are then issued in plan order. Output artifacts are fully assembled
//! before anything is returned, so a failure never leaves the caller
//! with a partial download.

use std::collections::HashMap;

use crate::backend::PdfBackend;
use crate::error::DeckError;
use crate::page::FileId;
use crate::plan::{self, PageCopy, SplitPart};
use crate::workspace::LoadedFile;

/// One finished output: a name for the download and the PDF bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Execute a merge plan into a single artifact named
/// [`plan::MERGE_OUTPUT_NAME`].
pub fn execute_merge<B: PdfBackend>(
    backend: &B,
    files: &[LoadedFile],
    copies: &[PageCopy],
) -> Result<OutputArtifact, DeckError> {
    let sources = load_sources(backend, files, copies)?;

    let mut dest = backend.create();
    for copy in copies {
        backend.copy_page(&mut dest, &sources[&copy.file], copy.page_index, copy.rotation)?;
    }

    let bytes = backend.save(dest)?;
    tracing::debug!(pages = copies.len(), size = bytes.len(), "merge complete");
    Ok(OutputArtifact {
        name: plan::MERGE_OUTPUT_NAME.to_string(),
        bytes,
    })
}

/// Execute a split plan, producing one artifact per part, named
/// `{stem}_part{N}.pdf`.
pub fn execute_split<B: PdfBackend>(
    backend: &B,
    files: &[LoadedFile],
    parts: &[SplitPart],
    source_name: &str,
) -> Result<Vec<OutputArtifact>, DeckError> {
    let all_copies: Vec<PageCopy> = parts.iter().flat_map(|p| p.copies.iter().copied()).collect();
    let sources = load_sources(backend, files, &all_copies)?;

    let mut outputs = Vec::with_capacity(parts.len());
    for part in parts {
        let mut dest = backend.create();
        for copy in &part.copies {
            backend.copy_page(&mut dest, &sources[&copy.file], copy.page_index, copy.rotation)?;
        }
        let bytes = backend.save(dest)?;
        tracing::debug!(
            part = part.ordinal,
            pages = part.copies.len(),
            size = bytes.len(),
            "split part complete"
        );
        outputs.push(OutputArtifact {
            name: plan::part_name(source_name, part.ordinal),
            bytes,
        });
    }

    Ok(outputs)
}

/// Parse each distinct source document exactly once.
fn load_sources<B: PdfBackend>(
    backend: &B,
    files: &[LoadedFile],
    copies: &[PageCopy],
) -> Result<HashMap<FileId, B::Doc>, DeckError> {
    let mut sources = HashMap::new();
    for copy in copies {
        if sources.contains_key(&copy.file) {
            continue;
        }
        let file = files
            .iter()
            .find(|f| f.id == copy.file)
            .ok_or(DeckError::MissingSource { file: copy.file })?;
        let doc = backend
            .load(&file.bytes)
            .map_err(|e| DeckError::Execution(format!("reloading {}: {e}", file.name)))?;
        sources.insert(copy.file, doc);
    }
    Ok(sources)
}
