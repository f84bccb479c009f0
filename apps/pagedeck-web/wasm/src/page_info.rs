//! Per-page metadata for the UI grid
//!
//! The thumbnail grid wants page dimensions and orientation up front so
//! cards can reserve the right aspect ratio before a thumbnail arrives.

use lopdf::{Dictionary, Document, Object};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PageMetrics {
    /// 1-indexed page number.
    pub page_num: u32,
    /// Width in points.
    pub width: f32,
    /// Height in points.
    pub height: f32,
    /// Rotation baked into the source page (0, 90, 180, 270).
    pub rotation: i32,
    pub orientation: Orientation,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
    Square,
}

impl PageMetrics {
    pub fn read(doc: &Document, page_num: u32) -> Result<Self, String> {
        let pages = doc.get_pages();
        let page_id = pages
            .get(&page_num)
            .ok_or_else(|| format!("page {page_num} not found"))?;
        let dict = doc
            .objects
            .get(page_id)
            .and_then(|obj| obj.as_dict().ok())
            .ok_or_else(|| format!("page {page_num} has no dictionary"))?;

        let media_box = page_attribute(doc, dict, b"MediaBox")
            .and_then(|obj| box_bounds(&obj))
            // fall back to US Letter when the tree carries no MediaBox
            .unwrap_or([0.0, 0.0, 612.0, 792.0]);
        let width = (media_box[2] - media_box[0]) as f32;
        let height = (media_box[3] - media_box[1]) as f32;

        let rotation = page_attribute(doc, dict, b"Rotate")
            .and_then(|obj| obj.as_i64().ok())
            .map(|angle| (angle as i32).rem_euclid(360))
            .unwrap_or(0);

        // rotation swaps the visible axes
        let (visible_w, visible_h) = if rotation == 90 || rotation == 270 {
            (height, width)
        } else {
            (width, height)
        };
        let orientation = if (visible_w - visible_h).abs() < 1.0 {
            Orientation::Square
        } else if visible_w > visible_h {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        };

        Ok(Self {
            page_num,
            width,
            height,
            rotation,
            orientation,
        })
    }
}

/// A page attribute, walking up the Parent chain for inheritable keys.
fn page_attribute(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<Object> {
    if let Ok(value) = dict.get(key) {
        return Some(value.clone());
    }
    let mut parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
    loop {
        let node = doc.objects.get(&parent)?.as_dict().ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").ok()?.as_reference().ok()?;
    }
}

fn box_bounds(obj: &Object) -> Option<[f64; 4]> {
    let array = obj.as_array().ok()?;
    if array.len() != 4 {
        return None;
    }
    let mut bounds = [0.0; 4];
    for (slot, value) in bounds.iter_mut().zip(array) {
        *slot = match value {
            Object::Integer(n) => *n as f64,
            Object::Real(n) => *n as f64,
            _ => return None,
        };
    }
    Some(bounds)
}
