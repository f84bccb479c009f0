//! Page reference model
//!
//! A [`PageRef`] is a lightweight record denoting one page of output: it
//! points at a loaded source file and an original page index, and carries
//! the rotation to apply on export. References are what the user reorders,
//! rotates, duplicates and removes; the underlying file bytes are never
//! touched until a plan is executed.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Identifier for a page reference, unique within a workspace even across
/// duplicates. Minted by the workspace counter, never derived from content.
pub type PageId = u64;

/// Identifier for a loaded source file.
pub type FileId = u64;

/// Page rotation in quarter turns. The only legal states are the four
/// multiples of 90 degrees; arbitrary angles are normalized on the way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }

    /// One more quarter turn clockwise.
    pub fn turned(self) -> Self {
        match self {
            Rotation::R0 => Rotation::R90,
            Rotation::R90 => Rotation::R180,
            Rotation::R180 => Rotation::R270,
            Rotation::R270 => Rotation::R0,
        }
    }

    /// Normalize an angle in degrees into the four legal states.
    pub fn from_degrees(angle: i32) -> Self {
        let wrapped = angle.rem_euclid(360);
        match wrapped {
            90 => Rotation::R90,
            180 => Rotation::R180,
            270 => Rotation::R270,
            _ => Rotation::R0,
        }
    }
}

impl From<i32> for Rotation {
    fn from(angle: i32) -> Self {
        Rotation::from_degrees(angle)
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> i32 {
        rotation.degrees()
    }
}

/// Opaque handle to a rendered page image, stored as a data URL.
///
/// Cached once at load time and shared (cheap clone) between the file's
/// own page list, the working collection, and any duplicates. Edits never
/// regenerate it; rotation is applied visually by the UI, not baked in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Thumbnail {
    data_url: Arc<str>,
}

impl Thumbnail {
    pub fn from_data_url(url: impl Into<String>) -> Self {
        Self {
            data_url: Arc::from(url.into()),
        }
    }

    pub fn from_png_bytes(bytes: &[u8]) -> Self {
        Self::from_data_url(format!("data:image/png;base64,{}", BASE64.encode(bytes)))
    }

    pub fn as_data_url(&self) -> &str {
        &self.data_url
    }
}

impl From<String> for Thumbnail {
    fn from(url: String) -> Self {
        Thumbnail::from_data_url(url)
    }
}

impl From<Thumbnail> for String {
    fn from(thumbnail: Thumbnail) -> String {
        thumbnail.data_url.to_string()
    }
}

/// One page of output, drawn from one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRef {
    pub id: PageId,
    /// The loaded file this page originates from.
    pub file: FileId,
    /// Zero-based index into the original source file. Never mutated after
    /// creation; reordering and duplication move references around, they
    /// never change what source content a reference points to.
    pub page_index: u32,
    pub rotation: Rotation,
    pub thumbnail: Thumbnail,
}

impl PageRef {
    pub fn new(id: PageId, file: FileId, page_index: u32, thumbnail: Thumbnail) -> Self {
        Self {
            id,
            file,
            page_index,
            rotation: Rotation::R0,
            thumbnail,
        }
    }

    /// A copy rotated one quarter turn further. Pure; committing the change
    /// is the collection editor's job.
    pub fn rotated(&self) -> Self {
        Self {
            rotation: self.rotation.turned(),
            ..self.clone()
        }
    }

    /// A copy under a fresh identity. Everything but the id is shared; the
    /// caller mints `new_id` so that no two references ever share one.
    pub fn duplicated(&self, new_id: PageId) -> Self {
        Self {
            id: new_id,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(id: PageId) -> PageRef {
        PageRef::new(id, 1, 0, Thumbnail::from_data_url("data:,"))
    }

    #[test]
    fn test_new_page_starts_unrotated() {
        assert_eq!(page(7).rotation, Rotation::R0);
    }

    #[test]
    fn test_rotated_advances_quarter_turn() {
        let p = page(1);
        assert_eq!(p.rotated().rotation, Rotation::R90);
        assert_eq!(p.rotated().rotated().rotation, Rotation::R180);
    }

    #[test]
    fn test_four_rotations_return_to_start() {
        let p = page(1);
        let four = p.rotated().rotated().rotated().rotated();
        assert_eq!(four.rotation, p.rotation);
    }

    #[test]
    fn test_rotated_leaves_original_untouched() {
        let p = page(1);
        let _ = p.rotated();
        assert_eq!(p.rotation, Rotation::R0);
    }

    #[test]
    fn test_duplicated_copies_all_but_id() {
        let p = page(3).rotated();
        let d = p.duplicated(9);
        assert_eq!(d.id, 9);
        assert_eq!(d.file, p.file);
        assert_eq!(d.page_index, p.page_index);
        assert_eq!(d.rotation, p.rotation);
        assert_eq!(d.thumbnail, p.thumbnail);
        assert_ne!(d.id, p.id);
    }

    #[test]
    fn test_from_degrees_normalizes() {
        assert_eq!(Rotation::from_degrees(0), Rotation::R0);
        assert_eq!(Rotation::from_degrees(360), Rotation::R0);
        assert_eq!(Rotation::from_degrees(450), Rotation::R90);
        assert_eq!(Rotation::from_degrees(-90), Rotation::R270);
        assert_eq!(Rotation::from_degrees(-180), Rotation::R180);
    }

    #[test]
    fn test_rotation_serializes_as_degrees() {
        let json = serde_json::to_string(&Rotation::R270).unwrap();
        assert_eq!(json, "270");
        let back: Rotation = serde_json::from_str("90").unwrap();
        assert_eq!(back, Rotation::R90);
    }

    #[test]
    fn test_thumbnail_from_png_bytes_is_data_url() {
        let t = Thumbnail::from_png_bytes(&[1, 2, 3]);
        assert!(t.as_data_url().starts_with("data:image/png;base64,"));
    }
}
