//! Stateful page-deck session
//!
//! Holds the workspace in Rust memory behind a wasm-bindgen API, so the
//! JavaScript side only handles DOM events, PDF.js thumbnail rendering
//! and download triggers. Every edit goes through the core command path
//! and is applied atomically.

use js_sys::{Array, Object, Reflect, Uint8Array};
use pagedeck_core::{
    DeckCommand, DeckError, DeckMode, LopdfBackend, PageId, PageRange, PlaceholderRenderer,
    Thumbnail, Workspace,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::validation;

/// Session mode, mirrored into JS.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Merge,
    Split,
}

impl From<SessionMode> for DeckMode {
    fn from(mode: SessionMode) -> Self {
        match mode {
            SessionMode::Merge => DeckMode::Merge,
            SessionMode::Split => DeckMode::Split,
        }
    }
}

/// How the split boundaries are chosen.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMethod {
    /// Every page becomes its own document.
    EveryPage,
    /// Boundaries come from the free-text range field.
    Ranges,
    /// One document spanning the explicitly selected pages.
    Selection,
}

/// Example shown in the range field before the user types anything.
const DEFAULT_RANGE_TEXT: &str = "1-3, 4-10";

#[derive(Serialize)]
struct FileView {
    id: u64,
    name: String,
    page_count: u32,
    size_bytes: usize,
    page_ids: Vec<u64>,
}

#[derive(Serialize)]
struct PageView {
    id: u64,
    file: u64,
    file_name: String,
    page_index: u32,
    rotation: i32,
    thumbnail: String,
    selected: bool,
}

/// Stateful session driving one merge or split workflow.
#[wasm_bindgen]
pub struct PageDeckSession {
    workspace: Workspace,
    split_method: SplitMethod,
    range_text: String,
    selected: Vec<PageId>,
    progress_callback: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl PageDeckSession {
    #[wasm_bindgen(constructor)]
    pub fn new(mode: SessionMode) -> Self {
        Self {
            workspace: Workspace::new(mode.into()),
            split_method: SplitMethod::EveryPage,
            range_text: DEFAULT_RANGE_TEXT.to_string(),
            selected: Vec::new(),
            progress_callback: None,
        }
    }

    /// Callback signature: (current: number, total: number, message: string).
    #[wasm_bindgen(js_name = setProgressCallback)]
    pub fn set_progress_callback(&mut self, callback: js_sys::Function) {
        self.progress_callback = Some(callback);
    }

    /// Load one dropped/selected file. Errors are per-file; other files
    /// in the same batch are unaffected.
    #[wasm_bindgen(js_name = addDocument)]
    pub fn add_document(&mut self, name: &str, bytes: &[u8]) -> Result<JsValue, JsValue> {
        let view = self
            .add_document_internal(name, bytes)
            .map_err(|e| JsValue::from_str(&e))?;
        serde_wasm_bindgen::to_value(&view)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Unload a file, dropping its pages from the collection.
    #[wasm_bindgen(js_name = removeDocument)]
    pub fn remove_document(&mut self, file_id: u64) {
        self.workspace.remove_file(file_id);
        self.prune_selection();
    }

    /// Make a loaded file the working document (split mode file list).
    #[wasm_bindgen(js_name = selectDocument)]
    pub fn select_document(&mut self, file_id: u64) -> Result<(), JsValue> {
        self.workspace.select_file(file_id).map_err(to_js)?;
        self.selected.clear();
        Ok(())
    }

    #[wasm_bindgen(js_name = listDocuments)]
    pub fn list_documents(&self) -> Result<JsValue, JsValue> {
        let views: Vec<FileView> = self
            .workspace
            .files()
            .iter()
            .map(|f| FileView {
                id: f.id,
                name: f.name.clone(),
                page_count: f.page_count,
                size_bytes: f.bytes.len(),
                page_ids: f.pages.iter().map(|p| p.id).collect(),
            })
            .collect();
        serde_wasm_bindgen::to_value(&views)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// The working collection, in output order, for the page grid.
    #[wasm_bindgen(js_name = listPages)]
    pub fn list_pages(&self) -> Result<JsValue, JsValue> {
        let views: Vec<PageView> = self
            .workspace
            .pages()
            .iter()
            .map(|p| PageView {
                id: p.id,
                file: p.file,
                file_name: self
                    .workspace
                    .file(p.file)
                    .map(|f| f.name.clone())
                    .unwrap_or_default(),
                page_index: p.page_index,
                rotation: p.rotation.degrees(),
                thumbnail: p.thumbnail.as_data_url().to_string(),
                selected: self.selected.contains(&p.id),
            })
            .collect();
        serde_wasm_bindgen::to_value(&views)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    #[wasm_bindgen(js_name = pageCount)]
    pub fn page_count(&self) -> usize {
        self.workspace.pages().len()
    }

    #[wasm_bindgen(js_name = documentCount)]
    pub fn document_count(&self) -> usize {
        self.workspace.files().len()
    }

    /// Drag-and-drop reorder: move the card at `from` to `to`.
    #[wasm_bindgen(js_name = reorderPages)]
    pub fn reorder_pages(&mut self, from: usize, to: usize) -> Result<(), JsValue> {
        self.workspace
            .apply(DeckCommand::Reorder { from, to })
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = rotatePage)]
    pub fn rotate_page(&mut self, page_id: u64) -> Result<(), JsValue> {
        self.workspace
            .apply(DeckCommand::Rotate { page: page_id })
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = duplicatePage)]
    pub fn duplicate_page(&mut self, page_id: u64) -> Result<(), JsValue> {
        self.workspace
            .apply(DeckCommand::Duplicate { page: page_id })
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = removePage)]
    pub fn remove_page(&mut self, page_id: u64) -> Result<(), JsValue> {
        self.remove_page_internal(page_id).map_err(to_js)
    }

    /// Empty the working collection. The UI asks for confirmation first.
    #[wasm_bindgen(js_name = clearAll)]
    pub fn clear_all(&mut self) -> Result<(), JsValue> {
        self.workspace.apply(DeckCommand::Clear).map_err(to_js)?;
        self.selected.clear();
        Ok(())
    }

    /// Install a PDF.js-rendered thumbnail over the load-time placeholder.
    #[wasm_bindgen(js_name = setPageThumbnail)]
    pub fn set_page_thumbnail(&mut self, page_id: u64, data_url: &str) -> bool {
        self.workspace
            .set_page_thumbnail(page_id, Thumbnail::from_data_url(data_url))
    }

    #[wasm_bindgen(js_name = pageThumbnail)]
    pub fn page_thumbnail(&self, page_id: u64) -> Option<String> {
        self.workspace
            .page(page_id)
            .map(|p| p.thumbnail.as_data_url().to_string())
    }

    #[wasm_bindgen(js_name = setSplitMethod)]
    pub fn set_split_method(&mut self, method: SplitMethod) {
        self.split_method = method;
    }

    #[wasm_bindgen(js_name = rangeText)]
    pub fn range_text(&self) -> String {
        self.range_text.clone()
    }

    /// Update the free-text range field. Validation is immediate so the
    /// UI can flag the offending token while the user types.
    #[wasm_bindgen(js_name = setRangeText)]
    pub fn set_range_text(&mut self, text: &str) -> Result<(), JsValue> {
        self.set_range_text_internal(text).map_err(to_js)
    }

    #[wasm_bindgen(js_name = togglePageSelected)]
    pub fn toggle_page_selected(&mut self, page_id: u64) {
        if let Some(pos) = self.selected.iter().position(|&id| id == page_id) {
            self.selected.remove(pos);
        } else if self.workspace.page(page_id).is_some() {
            self.selected.push(page_id);
        }
    }

    #[wasm_bindgen(js_name = selectedCount)]
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Whether the primary action can run right now.
    #[wasm_bindgen(js_name = canExecute)]
    pub fn can_execute(&self) -> bool {
        if self.workspace.pages().is_empty() {
            return false;
        }
        match self.workspace.mode() {
            DeckMode::Merge => true,
            DeckMode::Split => match self.split_method {
                SplitMethod::EveryPage => true,
                SplitMethod::Ranges => self.workspace.parse_ranges(&self.range_text).is_ok(),
                SplitMethod::Selection => !self.selected.is_empty(),
            },
        }
    }

    /// Run the current operation and hand back `[{ name, bytes }]` for
    /// the JS side to turn into downloads. The plan is snapshotted before
    /// execution starts, so edits cannot race the export.
    pub fn execute(&self) -> Result<JsValue, JsValue> {
        let artifacts = self.execute_internal().map_err(|e| JsValue::from_str(&e))?;

        let list = Array::new();
        for artifact in &artifacts {
            let entry = Object::new();
            Reflect::set(&entry, &"name".into(), &JsValue::from_str(&artifact.name))?;
            let bytes = Uint8Array::new_with_length(artifact.bytes.len() as u32);
            bytes.copy_from(&artifact.bytes);
            Reflect::set(&entry, &"bytes".into(), &bytes)?;
            list.push(&entry);
        }
        Ok(list.into())
    }

    fn report_progress(&self, current: u32, total: u32, message: &str) {
        if let Some(ref callback) = self.progress_callback {
            let _ = callback.call3(
                &JsValue::null(),
                &JsValue::from(current),
                &JsValue::from(total),
                &JsValue::from_str(message),
            );
        }
    }
}

/// Internals shared with native tests (no JsValue in signatures).
impl PageDeckSession {
    fn add_document_internal(&mut self, name: &str, bytes: &[u8]) -> Result<FileView, String> {
        validation::quick_check(bytes)?;

        let file_id = self
            .workspace
            .load_file(name, bytes.to_vec(), &LopdfBackend, &PlaceholderRenderer)
            .map_err(|e| e.to_string())?;

        let file = self
            .workspace
            .file(file_id)
            .ok_or_else(|| "file vanished after load".to_string())?;
        Ok(FileView {
            id: file.id,
            name: file.name.clone(),
            page_count: file.page_count,
            size_bytes: file.bytes.len(),
            page_ids: file.pages.iter().map(|p| p.id).collect(),
        })
    }

    fn set_range_text_internal(&mut self, text: &str) -> Result<(), DeckError> {
        self.workspace.parse_ranges(text)?;
        self.range_text = text.to_string();
        Ok(())
    }

    fn remove_page_internal(&mut self, page_id: u64) -> Result<(), DeckError> {
        self.workspace
            .apply(DeckCommand::RemovePage { page: page_id })?;
        self.prune_selection();
        Ok(())
    }

    fn current_ranges(&self) -> Result<Vec<PageRange>, DeckError> {
        match self.split_method {
            SplitMethod::EveryPage => Ok(self.workspace.every_page_ranges()),
            SplitMethod::Ranges => self.workspace.parse_ranges(&self.range_text),
            SplitMethod::Selection => self.workspace.selection_ranges(&self.selected),
        }
    }

    fn execute_internal(&self) -> Result<Vec<pagedeck_core::OutputArtifact>, String> {
        self.report_progress(0, 100, "Planning...");

        let artifacts = match self.workspace.mode() {
            DeckMode::Merge => {
                self.report_progress(10, 100, "Merging pages...");
                vec![self
                    .workspace
                    .execute_merge(&LopdfBackend)
                    .map_err(|e| e.to_string())?]
            }
            DeckMode::Split => {
                let ranges = self.current_ranges().map_err(|e| e.to_string())?;
                self.report_progress(10, 100, "Extracting pages...");
                self.workspace
                    .execute_split(&LopdfBackend, &ranges)
                    .map_err(|e| e.to_string())?
            }
        };

        self.report_progress(100, 100, "Complete");
        Ok(artifacts)
    }

    /// Drop selection entries whose pages are gone.
    fn prune_selection(&mut self) {
        let workspace = &self.workspace;
        self.selected.retain(|&id| workspace.page(id).is_some());
    }
}

fn to_js(err: DeckError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
