//! WASM bindings for the page-deck PDF tool
//!
//! State lives in Rust behind [`PageDeckSession`]; JavaScript handles
//! DOM events, PDF.js thumbnail rendering and download triggers.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { PageDeckSession, SessionMode, SplitMethod } from './pkg/pagedeck_wasm.js';
//!
//! await init();
//!
//! // Merge mode
//! const session = new PageDeckSession(SessionMode.Merge);
//! session.addDocument("a.pdf", bytesA);
//! session.addDocument("b.pdf", bytesB);
//! session.reorderPages(0, 3);
//! session.rotatePage(pageId);
//! for (const { name, bytes } of session.execute()) downloadBlob(bytes, name);
//!
//! // Split mode
//! const session = new PageDeckSession(SessionMode.Split);
//! session.addDocument("report.pdf", bytes);
//! session.setSplitMethod(SplitMethod.Ranges);
//! session.setRangeText("1-3, 4-10");
//! for (const { name, bytes } of session.execute()) downloadBlob(bytes, name);
//! ```

pub mod page_info;
pub mod session;
pub mod validation;

#[cfg(test)]
pub(crate) mod testpdf;

use wasm_bindgen::prelude::*;

pub use page_info::{Orientation, PageMetrics};
pub use session::{PageDeckSession, SessionMode, SplitMethod};
pub use validation::PdfSummary;

/// Called automatically by wasm-bindgen on module load.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Cheap structural check before a file is accepted into a session.
#[wasm_bindgen]
pub fn quick_validate(bytes: &[u8]) -> Result<(), JsValue> {
    validation::quick_check(bytes).map_err(|e| JsValue::from_str(&e))
}

/// Parse and summarize a PDF without creating a session, for pre-commit
/// file info display.
#[wasm_bindgen]
pub fn get_pdf_info(bytes: &[u8]) -> Result<JsValue, JsValue> {
    let summary = validation::inspect(bytes).map_err(|e| JsValue::from_str(&e))?;
    serde_wasm_bindgen::to_value(&summary)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Human-readable file size for the file list.
#[wasm_bindgen]
pub fn format_bytes(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;
    const GB: usize = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_version() {
        assert!(!get_version().is_empty());
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(500), "500 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1048576), "1.0 MB");
        assert_eq!(format_bytes(2621440), "2.5 MB");
        assert_eq!(format_bytes(1073741824), "1.0 GB");
    }
}
