//! Workspace state
//!
//! The single mutable point of truth behind the UI: loaded files plus
//! the editable working collection. Edits arrive as [`DeckCommand`]s and
//! are applied through the pure collection functions, committing each
//! result in one assignment so no half-applied edit is ever observable.

use serde::{Deserialize, Serialize};

use crate::backend::PdfBackend;
use crate::collection;
use crate::command::DeckCommand;
use crate::error::DeckError;
use crate::exec::{self, OutputArtifact};
use crate::page::{FileId, PageId, PageRef, Thumbnail};
use crate::plan::{self, PageCopy, SplitPart};
use crate::ranges::{self, PageRange};
use crate::render::{render_or_placeholder, ThumbnailRenderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckMode {
    /// Combine pages from many documents into one.
    Merge,
    /// Partition one working document into many.
    Split,
}

/// A source file held in memory: raw bytes plus the page references it
/// produced at load time. `pages` is frozen at load; the editable
/// sequence is the workspace collection.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub id: FileId,
    pub name: String,
    pub bytes: Vec<u8>,
    pub page_count: u32,
    pub pages: Vec<PageRef>,
}

pub struct Workspace {
    mode: DeckMode,
    next_id: u64,
    files: Vec<LoadedFile>,
    collection: Vec<PageRef>,
}

impl Workspace {
    pub fn new(mode: DeckMode) -> Self {
        Self {
            mode,
            next_id: 1,
            files: Vec::new(),
            collection: Vec::new(),
        }
    }

    pub fn mode(&self) -> DeckMode {
        self.mode
    }

    pub fn files(&self) -> &[LoadedFile] {
        &self.files
    }

    pub fn pages(&self) -> &[PageRef] {
        &self.collection
    }

    pub fn page(&self, id: PageId) -> Option<&PageRef> {
        self.collection.iter().find(|p| p.id == id)
    }

    pub fn file(&self, id: FileId) -> Option<&LoadedFile> {
        self.files.iter().find(|f| f.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    fn mint(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Load one uploaded file: parse it, mint a file id and one page
    /// reference per page (rotation 0, thumbnail rendered now or replaced
    /// by the placeholder), and register it.
    ///
    /// In merge mode the new pages are appended to the collection; in
    /// split mode they become the working collection (one document is
    /// worked on at a time, the previous one stays loaded and can be
    /// selected again). A failing file leaves the workspace untouched, so
    /// other files in the same batch load independently.
    pub fn load_file<B, R>(
        &mut self,
        name: &str,
        bytes: Vec<u8>,
        backend: &B,
        renderer: &R,
    ) -> Result<FileId, DeckError>
    where
        B: PdfBackend,
        R: ThumbnailRenderer + ?Sized,
    {
        let doc = backend.load(&bytes)?;
        let page_count = backend.page_count(&doc);

        let file_id = self.mint();
        let mut pages = Vec::with_capacity(page_count as usize);
        for index in 0..page_count {
            let id = self.mint();
            let thumbnail = render_or_placeholder(renderer, &bytes, index);
            pages.push(PageRef::new(id, file_id, index, thumbnail));
        }

        match self.mode {
            DeckMode::Merge => self.collection.extend(pages.iter().cloned()),
            DeckMode::Split => self.collection = pages.clone(),
        }

        tracing::debug!(file = file_id, name, pages = page_count, "file loaded");
        self.files.push(LoadedFile {
            id: file_id,
            name: name.to_string(),
            bytes,
            page_count,
            pages,
        });
        Ok(file_id)
    }

    /// Make a previously loaded file the working document (split mode).
    pub fn select_file(&mut self, id: FileId) -> Result<(), DeckError> {
        let file = self
            .file(id)
            .ok_or(DeckError::MissingSource { file: id })?;
        self.collection = file.pages.clone();
        Ok(())
    }

    /// Unload a file and drop all of its pages from the collection in the
    /// same step. Unknown ids are tolerated.
    pub fn remove_file(&mut self, id: FileId) {
        self.files.retain(|f| f.id != id);
        self.collection = collection::remove_file(&self.collection, id);
    }

    /// Apply one edit. The replacement collection is computed first and
    /// committed in a single assignment.
    pub fn apply(&mut self, command: DeckCommand) -> Result<(), DeckError> {
        match command {
            DeckCommand::Reorder { from, to } => {
                self.collection = collection::reorder(&self.collection, from, to)?;
            }
            DeckCommand::Rotate { page } => {
                self.collection = collection::rotate(&self.collection, page);
            }
            DeckCommand::Duplicate { page } => {
                let fresh = self.mint();
                self.collection = collection::duplicate(&self.collection, page, fresh);
            }
            DeckCommand::RemovePage { page } => {
                self.collection = collection::remove(&self.collection, page);
            }
            DeckCommand::RemoveFile { file } => {
                self.remove_file(file);
            }
            DeckCommand::Clear => {
                self.collection = collection::clear(&self.collection);
            }
        }
        Ok(())
    }

    /// Install an externally rendered thumbnail for a page, replacing the
    /// load-time placeholder wherever that page id appears.
    pub fn set_page_thumbnail(&mut self, id: PageId, thumbnail: Thumbnail) -> bool {
        let mut found = false;
        for page in self.collection.iter_mut() {
            if page.id == id {
                page.thumbnail = thumbnail.clone();
                found = true;
            }
        }
        for file in self.files.iter_mut() {
            for page in file.pages.iter_mut() {
                if page.id == id {
                    page.thumbnail = thumbnail.clone();
                    found = true;
                }
            }
        }
        found
    }

    fn loaded_ids(&self) -> Vec<FileId> {
        self.files.iter().map(|f| f.id).collect()
    }

    pub fn plan_merge(&self) -> Result<Vec<PageCopy>, DeckError> {
        plan::plan_merge(&self.collection, &self.loaded_ids())
    }

    pub fn plan_split(&self, ranges: &[PageRange]) -> Result<Vec<SplitPart>, DeckError> {
        plan::plan_split(&self.collection, ranges, &self.loaded_ids())
    }

    /// Parse the free-text range field against the current collection.
    pub fn parse_ranges(&self, text: &str) -> Result<Vec<PageRange>, DeckError> {
        ranges::parse_range_text(text, self.collection.len())
    }

    /// One singleton range per collection page.
    pub fn every_page_ranges(&self) -> Vec<PageRange> {
        ranges::one_per_page(self.collection.len())
    }

    /// The min-to-max span of an explicit selection.
    pub fn selection_ranges(&self, selected: &[PageId]) -> Result<Vec<PageRange>, DeckError> {
        ranges::span_of_selection(selected, &self.collection)
    }

    /// Plan and run a merge. Planning happens first, so a stale source is
    /// caught before any document is parsed, and the executed plan is a
    /// snapshot: edits applied after this call starts cannot change what
    /// gets exported.
    pub fn execute_merge<B: PdfBackend>(&self, backend: &B) -> Result<OutputArtifact, DeckError> {
        let copies = self.plan_merge()?;
        exec::execute_merge(backend, &self.files, &copies)
    }

    /// Plan and run a split over the given ranges.
    pub fn execute_split<B: PdfBackend>(
        &self,
        backend: &B,
        ranges: &[PageRange],
    ) -> Result<Vec<OutputArtifact>, DeckError> {
        let parts = self.plan_split(ranges)?;
        exec::execute_split(backend, &self.files, &parts, &self.working_name())
    }

    /// Display name of the file the collection is drawn from, used as the
    /// stem for split artifact names.
    fn working_name(&self) -> String {
        self.collection
            .first()
            .and_then(|p| self.file(p.file))
            .map(|f| f.name.clone())
            .unwrap_or_else(|| "document.pdf".to_string())
    }
}
