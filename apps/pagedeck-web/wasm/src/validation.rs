//! Pre-flight PDF validation
//!
//! Cheap checks run before a file enters the session, so the UI can show
//! a per-file error without waiting for a full parse, plus a summary
//! extractor for the file list.

use lopdf::Document;
use serde::Serialize;

/// Summary shown next to a loaded file.
#[derive(Debug, Clone, Serialize, Default)]
pub struct PdfSummary {
    pub page_count: u32,
    /// Header version, e.g. "1.7".
    pub version: String,
    pub encrypted: bool,
    pub size_bytes: usize,
    pub title: Option<String>,
    pub author: Option<String>,
}

/// Structural sniff without parsing: header magic and trailing EOF marker.
pub fn quick_check(bytes: &[u8]) -> Result<(), String> {
    if bytes.len() < 8 {
        return Err("File too small to be a PDF".to_string());
    }
    if !bytes.starts_with(b"%PDF-") {
        return Err("Not a PDF file (missing %PDF- header)".to_string());
    }

    let tail_len = bytes.len().min(1024);
    let tail = &bytes[bytes.len() - tail_len..];
    if !tail.windows(5).any(|w| w == b"%%EOF") {
        return Err("PDF appears truncated (missing %%EOF marker)".to_string());
    }

    Ok(())
}

/// Full parse plus metadata extraction.
pub fn inspect(bytes: &[u8]) -> Result<PdfSummary, String> {
    quick_check(bytes)?;

    let doc = Document::load_mem(bytes).map_err(|e| format!("Failed to parse PDF: {e}"))?;

    let page_count = doc.get_pages().len() as u32;
    if page_count == 0 {
        return Err("PDF has no pages".to_string());
    }

    Ok(PdfSummary {
        page_count,
        version: header_version(bytes),
        encrypted: doc.is_encrypted(),
        size_bytes: bytes.len(),
        title: info_string(&doc, b"Title"),
        author: info_string(&doc, b"Author"),
    })
}

/// Version digits out of the `%PDF-x.y` header.
fn header_version(bytes: &[u8]) -> String {
    bytes
        .get(5..8)
        .and_then(|v| std::str::from_utf8(v).ok())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "1.4".to_string())
}

/// A text entry from the trailer's Info dictionary, if present and
/// non-empty.
fn info_string(doc: &Document, key: &[u8]) -> Option<String> {
    let info_id = doc.trailer.get(b"Info").ok()?.as_reference().ok()?;
    let dict = doc.objects.get(&info_id)?.as_dict().ok()?;
    let raw = dict.get(key).ok()?.as_str().ok()?;
    let text = String::from_utf8_lossy(raw);
    if text.is_empty() {
        None
    } else {
        Some(text.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testpdf::create_test_pdf;

    #[test]
    fn test_quick_check_rejects_non_pdf() {
        assert!(quick_check(b"definitely not a pdf").is_err());
        assert!(quick_check(b"tiny").is_err());
    }

    #[test]
    fn test_quick_check_accepts_generated_pdf() {
        assert!(quick_check(&create_test_pdf(1)).is_ok());
    }

    #[test]
    fn test_inspect_reports_pages_and_version() {
        let summary = inspect(&create_test_pdf(5)).unwrap();
        assert_eq!(summary.page_count, 5);
        assert_eq!(summary.version, "1.7");
        assert!(!summary.encrypted);
    }

    #[test]
    fn test_inspect_rejects_invalid_bytes() {
        assert!(inspect(b"%PDF-1.7 but cut off").is_err());
    }

    #[test]
    fn test_header_version() {
        assert_eq!(header_version(b"%PDF-1.4\n"), "1.4");
        assert_eq!(header_version(b"%PDF-2.0\n"), "2.0");
    }
}
