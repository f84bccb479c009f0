use serde::{Deserialize, Serialize};

use crate::page::{FileId, PageId};

/// One user edit, applied atomically to the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DeckCommand {
    Reorder { from: usize, to: usize },
    Rotate { page: PageId },
    Duplicate { page: PageId },
    RemovePage { page: PageId },
    RemoveFile { file: FileId },
    Clear,
}

impl DeckCommand {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
