//! PDF capability boundary
//!
//! The planner only produces instruction lists; actually loading
//! documents, copying pages and serializing output goes through
//! [`PdfBackend`]. The shipped implementation is [`LopdfBackend`], which
//! copies a page by importing the page object's dependency closure into
//! the destination with remapped object ids.

use std::collections::{BTreeSet, VecDeque};

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::DeckError;
use crate::page::Rotation;

/// The byte-level PDF manipulation capability consumed by the executor.
pub trait PdfBackend {
    type Doc;

    /// Parse a document; fails with [`DeckError::Load`] on non-PDF bytes.
    fn load(&self, bytes: &[u8]) -> Result<Self::Doc, DeckError>;

    /// A fresh empty destination document.
    fn create(&self) -> Self::Doc;

    fn page_count(&self, doc: &Self::Doc) -> u32;

    /// Copy page `page_index` (0-based) of `src` into `dest`, applying
    /// `rotation` to the copy. Appends to the end of `dest`'s page tree.
    fn copy_page(
        &self,
        dest: &mut Self::Doc,
        src: &Self::Doc,
        page_index: u32,
        rotation: Rotation,
    ) -> Result<(), DeckError>;

    /// Serialize and consume the document.
    fn save(&self, doc: Self::Doc) -> Result<Vec<u8>, DeckError>;
}

/// lopdf-backed implementation.
pub struct LopdfBackend;

impl PdfBackend for LopdfBackend {
    type Doc = Document;

    fn load(&self, bytes: &[u8]) -> Result<Document, DeckError> {
        let doc = Document::load_mem(bytes).map_err(|e| DeckError::Load(e.to_string()))?;
        if doc.get_pages().is_empty() {
            return Err(DeckError::Load("PDF has no pages".into()));
        }
        Ok(doc)
    }

    fn create(&self) -> Document {
        let mut doc = Document::with_version("1.7");

        let pages_id = doc.new_object_id();
        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Count", Object::Integer(0));
        pages.set("Kids", Object::Array(Vec::new()));
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(Object::Dictionary(catalog));

        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc
    }

    fn page_count(&self, doc: &Document) -> u32 {
        doc.get_pages().len() as u32
    }

    fn copy_page(
        &self,
        dest: &mut Document,
        src: &Document,
        page_index: u32,
        rotation: Rotation,
    ) -> Result<(), DeckError> {
        let pages = src.get_pages();
        let page_id = pages
            .get(&(page_index + 1))
            .copied()
            .ok_or_else(|| {
                DeckError::Execution(format!(
                    "page index {} out of range for source with {} pages",
                    page_index,
                    pages.len()
                ))
            })?;

        let mut page_dict = src
            .objects
            .get(&page_id)
            .ok_or_else(|| DeckError::Execution("page object not found".into()))?
            .as_dict()
            .map_err(|_| DeckError::Execution("page is not a dictionary".into()))?
            .clone();

        // Pull attributes the page inherits from its ancestors before the
        // parent link is cut; the copy must stand on its own.
        let inheritable: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];
        for key in inheritable {
            if page_dict.get(key).is_err() {
                if let Some(value) = inherited_entry(src, &page_dict, key) {
                    page_dict.set(key, value);
                }
            }
        }
        page_dict.remove(b"Parent");

        // Import the page's dependency closure, shifting every object id
        // past the destination's current maximum.
        let offset = dest.max_id;
        for id in dependency_closure(src, &page_dict) {
            if let Some(object) = src.objects.get(&id) {
                dest.objects
                    .insert((id.0 + offset, id.1), shift_refs(object.clone(), offset));
            }
        }

        let Object::Dictionary(mut page_dict) = shift_refs(Object::Dictionary(page_dict), offset)
        else {
            return Err(DeckError::Execution("page dictionary lost in remap".into()));
        };

        let pages_root = pages_root_id(dest)?;
        page_dict.set("Parent", Object::Reference(pages_root));
        if rotation != Rotation::R0 {
            page_dict.set("Rotate", Object::Integer(i64::from(rotation.degrees())));
        }

        let new_page_id = (page_id.0 + offset, page_id.1);
        dest.objects.insert(new_page_id, Object::Dictionary(page_dict));
        dest.max_id = dest.max_id.max(offset + src.max_id);

        append_to_page_tree(dest, pages_root, new_page_id)
    }

    fn save(&self, mut doc: Document) -> Result<Vec<u8>, DeckError> {
        doc.prune_objects();
        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| DeckError::Execution(format!("failed to save PDF: {e}")))?;
        Ok(buffer)
    }
}

/// All object ids reachable from `page_dict` through the source's object
/// table. The Parent key has already been stripped, so the walk cannot
/// climb back into the page tree and drag every sibling along.
fn dependency_closure(src: &Document, page_dict: &Dictionary) -> Vec<ObjectId> {
    let mut queue = VecDeque::new();
    push_refs(&Object::Dictionary(page_dict.clone()), &mut queue);

    let mut visited = BTreeSet::new();
    while let Some(id) = queue.pop_front() {
        if !visited.insert(id) {
            continue;
        }
        if let Some(object) = src.objects.get(&id) {
            push_refs(object, &mut queue);
        }
    }

    visited.into_iter().collect()
}

fn push_refs(object: &Object, queue: &mut VecDeque<ObjectId>) {
    match object {
        Object::Reference(id) => queue.push_back(*id),
        Object::Array(items) => {
            for item in items {
                push_refs(item, queue);
            }
        }
        Object::Dictionary(dict) => {
            for (key, value) in dict.iter() {
                // Parent links are back-edges into the page tree; following
                // one would import every sibling page.
                if key.as_slice() == b"Parent" {
                    continue;
                }
                push_refs(value, queue);
            }
        }
        Object::Stream(stream) => {
            for (key, value) in stream.dict.iter() {
                if key.as_slice() == b"Parent" {
                    continue;
                }
                push_refs(value, queue);
            }
        }
        _ => {}
    }
}

/// Rewrite every reference inside an object by the id offset.
fn shift_refs(object: Object, offset: u32) -> Object {
    match object {
        Object::Reference(id) => Object::Reference((id.0 + offset, id.1)),
        Object::Array(items) => {
            Object::Array(items.into_iter().map(|o| shift_refs(o, offset)).collect())
        }
        Object::Dictionary(mut dict) => {
            for (_, value) in dict.iter_mut() {
                *value = shift_refs(value.clone(), offset);
            }
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            for (_, value) in stream.dict.iter_mut() {
                *value = shift_refs(value.clone(), offset);
            }
            Object::Stream(stream)
        }
        other => other,
    }
}

/// Walk the Parent chain looking for an inheritable page attribute.
fn inherited_entry(doc: &Document, page_dict: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent = page_dict.get(b"Parent").ok()?.as_reference().ok()?;
    loop {
        let dict = doc.objects.get(&parent)?.as_dict().ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value.clone());
        }
        parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
    }
}

fn pages_root_id(doc: &Document) -> Result<ObjectId, DeckError> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .map_err(|_| DeckError::Execution("no Root in trailer".into()))?
        .as_reference()
        .map_err(|_| DeckError::Execution("Root is not a reference".into()))?;

    let catalog = doc
        .objects
        .get(&catalog_id)
        .ok_or_else(|| DeckError::Execution("catalog not found".into()))?
        .as_dict()
        .map_err(|_| DeckError::Execution("invalid catalog".into()))?;

    catalog
        .get(b"Pages")
        .map_err(|_| DeckError::Execution("no Pages in catalog".into()))?
        .as_reference()
        .map_err(|_| DeckError::Execution("Pages is not a reference".into()))
}

fn append_to_page_tree(
    doc: &mut Document,
    pages_root: ObjectId,
    page_id: ObjectId,
) -> Result<(), DeckError> {
    let Some(Object::Dictionary(pages_dict)) = doc.objects.get_mut(&pages_root) else {
        return Err(DeckError::Execution("invalid pages dictionary".into()));
    };

    let count = pages_dict
        .get(b"Count")
        .ok()
        .and_then(|c| c.as_i64().ok())
        .unwrap_or(0);

    let mut kids = match pages_dict.get(b"Kids").ok() {
        Some(Object::Array(kids)) => kids.clone(),
        _ => Vec::new(),
    };
    kids.push(Object::Reference(page_id));

    pages_dict.set("Kids", Object::Array(kids));
    pages_dict.set("Count", Object::Integer(count + 1));
    Ok(())
}
