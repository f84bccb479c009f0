//! Collection editor
//!
//! Pure operations over the ordered working sequence of [`PageRef`]s.
//! Every function returns a fresh vector and leaves its input untouched,
//! so the caller can commit the result in a single assignment; no
//! intermediate state is ever observable.

use crate::error::DeckError;
use crate::page::{FileId, PageId, PageRef};

/// Move the element at `from` so that it ends up at index `to`.
///
/// Implemented as one splice (remove, then reinsert into the shortened
/// sequence), which is how a drag-and-drop reorder behaves.
pub fn reorder(pages: &[PageRef], from: usize, to: usize) -> Result<Vec<PageRef>, DeckError> {
    let len = pages.len();
    if from >= len {
        return Err(DeckError::OutOfRange { index: from, len });
    }
    if to >= len {
        return Err(DeckError::OutOfRange { index: to, len });
    }

    let mut out = pages.to_vec();
    let moved = out.remove(from);
    out.insert(to, moved);
    Ok(out)
}

/// Remove the first element with a matching id. Removing an id that is
/// already gone is a no-op, not an error.
pub fn remove(pages: &[PageRef], id: PageId) -> Vec<PageRef> {
    let mut out = pages.to_vec();
    if let Some(pos) = out.iter().position(|p| p.id == id) {
        out.remove(pos);
    }
    out
}

/// Rotate the matching element one quarter turn, leaving all others and
/// the sequence order untouched.
pub fn rotate(pages: &[PageRef], id: PageId) -> Vec<PageRef> {
    pages
        .iter()
        .map(|p| if p.id == id { p.rotated() } else { p.clone() })
        .collect()
}

/// Insert a duplicate immediately after the original. The caller mints
/// `new_id`; an unknown `id` is a silent no-op.
pub fn duplicate(pages: &[PageRef], id: PageId, new_id: PageId) -> Vec<PageRef> {
    let mut out = pages.to_vec();
    if let Some(pos) = out.iter().position(|p| p.id == id) {
        let copy = out[pos].duplicated(new_id);
        out.insert(pos + 1, copy);
    }
    out
}

/// Drop every page belonging to one source file. Used to cascade a file
/// deletion through the collection in a single step.
pub fn remove_file(pages: &[PageRef], file: FileId) -> Vec<PageRef> {
    pages.iter().filter(|p| p.file != file).cloned().collect()
}

pub fn clear(_pages: &[PageRef]) -> Vec<PageRef> {
    Vec::new()
}

/// Current index of the page with the given id, if present.
pub fn index_of(pages: &[PageRef], id: PageId) -> Option<usize> {
    pages.iter().position(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Rotation, Thumbnail};
    use pretty_assertions::assert_eq;

    fn seq(ids: &[PageId]) -> Vec<PageRef> {
        ids.iter()
            .map(|&id| PageRef::new(id, 1, id as u32, Thumbnail::from_data_url("data:,")))
            .collect()
    }

    fn ids(pages: &[PageRef]) -> Vec<PageId> {
        pages.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_reorder_moves_element() {
        let pages = seq(&[10, 11, 12, 13]);
        let out = reorder(&pages, 0, 3).unwrap();
        assert_eq!(ids(&out), vec![11, 12, 13, 10]);
    }

    #[test]
    fn test_reorder_backwards() {
        let pages = seq(&[10, 11, 12, 13]);
        let out = reorder(&pages, 3, 1).unwrap();
        assert_eq!(ids(&out), vec![10, 13, 11, 12]);
    }

    #[test]
    fn test_reorder_same_index_is_identity() {
        let pages = seq(&[10, 11, 12]);
        let out = reorder(&pages, 1, 1).unwrap();
        assert_eq!(ids(&out), vec![10, 11, 12]);
    }

    #[test]
    fn test_reorder_out_of_range_fails() {
        let pages = seq(&[10, 11]);
        assert!(matches!(
            reorder(&pages, 2, 0),
            Err(DeckError::OutOfRange { index: 2, len: 2 })
        ));
        assert!(matches!(
            reorder(&pages, 0, 5),
            Err(DeckError::OutOfRange { index: 5, len: 2 })
        ));
    }

    #[test]
    fn test_reorder_does_not_mutate_input() {
        let pages = seq(&[10, 11, 12]);
        let _ = reorder(&pages, 0, 2).unwrap();
        assert_eq!(ids(&pages), vec![10, 11, 12]);
    }

    #[test]
    fn test_remove_drops_matching_id() {
        let pages = seq(&[10, 11, 12]);
        let out = remove(&pages, 11);
        assert_eq!(ids(&out), vec![10, 12]);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let pages = seq(&[10, 11]);
        let out = remove(&pages, 99);
        assert_eq!(ids(&out), vec![10, 11]);
    }

    #[test]
    fn test_rotate_touches_only_target() {
        let pages = seq(&[10, 11, 12]);
        let out = rotate(&pages, 11);
        assert_eq!(out[0].rotation, Rotation::R0);
        assert_eq!(out[1].rotation, Rotation::R90);
        assert_eq!(out[2].rotation, Rotation::R0);
        assert_eq!(ids(&out), vec![10, 11, 12]);
    }

    #[test]
    fn test_duplicate_inserts_after_original() {
        let pages = seq(&[10, 11, 12]);
        let out = duplicate(&pages, 11, 99);
        assert_eq!(ids(&out), vec![10, 11, 99, 12]);
        assert_eq!(out[2].page_index, out[1].page_index);
    }

    #[test]
    fn test_duplicate_never_shares_ids() {
        let pages = seq(&[10, 11]);
        let out = duplicate(&pages, 10, 99);
        let mut seen = std::collections::HashSet::new();
        assert!(out.iter().all(|p| seen.insert(p.id)));
    }

    #[test]
    fn test_duplicate_unknown_id_is_noop() {
        let pages = seq(&[10, 11]);
        let out = duplicate(&pages, 42, 99);
        assert_eq!(ids(&out), vec![10, 11]);
    }

    #[test]
    fn test_remove_file_cascades() {
        let mut pages = seq(&[10, 11, 12]);
        pages[1].file = 2;
        let out = remove_file(&pages, 1);
        assert_eq!(ids(&out), vec![11]);
    }

    #[test]
    fn test_clear_empties() {
        let pages = seq(&[10, 11]);
        assert!(clear(&pages).is_empty());
    }

    #[test]
    fn test_index_of() {
        let pages = seq(&[10, 11, 12]);
        assert_eq!(index_of(&pages, 12), Some(2));
        assert_eq!(index_of(&pages, 99), None);
    }
}
