use thiserror::Error;

use crate::page::FileId;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Failed to parse PDF: {0}")]
    Load(String),

    #[error("Invalid page range: {0}")]
    InvalidRange(String),

    #[error("Index {index} is out of range for {len} pages")]
    OutOfRange { index: usize, len: usize },

    #[error("Source file {file} is no longer loaded")]
    MissingSource { file: FileId },

    #[error("No pages selected")]
    SelectionEmpty,

    #[error("PDF operation failed: {0}")]
    Execution(String),
}
