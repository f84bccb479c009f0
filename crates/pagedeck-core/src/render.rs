//! Thumbnail rendering boundary
//!
//! Actual page rasterization is an external capability (in the browser
//! it is PDF.js, feeding rendered data URLs back in). This module owns
//! the trait for that collaborator and the fallback path: when rendering
//! fails the page gets a generated placeholder labeled with its 1-based
//! number, and the failure never reaches the caller.

use thiserror::Error;

use crate::page::Thumbnail;

#[derive(Error, Debug)]
#[error("thumbnail rendering failed: {0}")]
pub struct RenderError(pub String);

/// External page-to-image collaborator.
pub trait ThumbnailRenderer {
    fn render(&self, bytes: &[u8], page_index: u32) -> Result<Thumbnail, RenderError>;
}

/// Render a page, substituting the placeholder on failure. Rendering
/// problems must never block loading or editing, so this cannot fail.
pub fn render_or_placeholder<R>(renderer: &R, bytes: &[u8], page_index: u32) -> Thumbnail
where
    R: ThumbnailRenderer + ?Sized,
{
    match renderer.render(bytes, page_index) {
        Ok(thumbnail) => thumbnail,
        Err(e) => {
            tracing::warn!(page = page_index + 1, error = %e, "using placeholder thumbnail");
            placeholder(page_index)
        }
    }
}

/// Renderer for headless use: every page gets the labeled placeholder.
pub struct PlaceholderRenderer;

impl ThumbnailRenderer for PlaceholderRenderer {
    fn render(&self, _bytes: &[u8], page_index: u32) -> Result<Thumbnail, RenderError> {
        Ok(placeholder(page_index))
    }
}

const THUMB_WIDTH: usize = 150;
const THUMB_HEIGHT: usize = 200;

const BACKGROUND: u8 = 0xF0;
const BORDER: u8 = 0xCC;
const INK: u8 = 0x66;

/// A light-gray page stand-in labeled with the 1-based page number.
pub fn placeholder(page_index: u32) -> Thumbnail {
    let mut pixels = vec![BACKGROUND; THUMB_WIDTH * THUMB_HEIGHT];

    for x in 0..THUMB_WIDTH {
        pixels[x] = BORDER;
        pixels[(THUMB_HEIGHT - 1) * THUMB_WIDTH + x] = BORDER;
    }
    for y in 0..THUMB_HEIGHT {
        pixels[y * THUMB_WIDTH] = BORDER;
        pixels[y * THUMB_WIDTH + THUMB_WIDTH - 1] = BORDER;
    }

    draw_label(&mut pixels, page_index + 1);

    let png = encode_gray_png(THUMB_WIDTH as u32, THUMB_HEIGHT as u32, &pixels)
        .unwrap_or_default();
    Thumbnail::from_png_bytes(&png)
}

/// 3x5 digit glyphs, one bit per pixel, high bit first.
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111], // 0
    [0b010, 0b110, 0b010, 0b010, 0b111], // 1
    [0b111, 0b001, 0b111, 0b100, 0b111], // 2
    [0b111, 0b001, 0b111, 0b001, 0b111], // 3
    [0b101, 0b101, 0b111, 0b001, 0b001], // 4
    [0b111, 0b100, 0b111, 0b001, 0b111], // 5
    [0b111, 0b100, 0b111, 0b101, 0b111], // 6
    [0b111, 0b001, 0b001, 0b010, 0b010], // 7
    [0b111, 0b101, 0b111, 0b101, 0b111], // 8
    [0b111, 0b101, 0b111, 0b001, 0b111], // 9
];

fn draw_label(pixels: &mut [u8], page_number: u32) {
    let label = page_number.to_string();

    // 3x5 glyphs at 4x scale, one scaled column of spacing between them
    let scale = 4;
    let advance = 4 * scale;
    let text_width = label.len() * advance - scale;
    if text_width > THUMB_WIDTH - 2 {
        return;
    }
    let x0 = (THUMB_WIDTH - text_width) / 2;
    let y0 = (THUMB_HEIGHT - 5 * scale) / 2;

    for (pos, byte) in label.bytes().enumerate() {
        let glyph = &DIGITS[(byte - b'0') as usize];
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..3 {
                if bits & (0b100 >> col) == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        let x = x0 + pos * advance + col * scale + dx;
                        let y = y0 + row * scale + dy;
                        pixels[y * THUMB_WIDTH + x] = INK;
                    }
                }
            }
        }
    }
}

fn encode_gray_png(width: u32, height: u32, pixels: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().ok()?;
        writer.write_image_data(pixels).ok()?;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;

    struct FailingRenderer;

    impl ThumbnailRenderer for FailingRenderer {
        fn render(&self, _bytes: &[u8], _page_index: u32) -> Result<Thumbnail, RenderError> {
            Err(RenderError("no canvas here".into()))
        }
    }

    fn decode_png(thumbnail: &Thumbnail) -> (u32, u32) {
        let url = thumbnail.as_data_url();
        let b64 = url.strip_prefix("data:image/png;base64,").unwrap();
        let bytes = BASE64.decode(b64).unwrap();
        let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        (info.width, info.height)
    }

    #[test]
    fn test_placeholder_is_valid_png() {
        let (w, h) = decode_png(&placeholder(0));
        assert_eq!((w, h), (150, 200));
    }

    #[test]
    fn test_placeholder_labels_differ() {
        assert_ne!(placeholder(0), placeholder(1));
        assert_ne!(placeholder(8), placeholder(98));
    }

    #[test]
    fn test_placeholder_survives_large_page_numbers() {
        let (w, h) = decode_png(&placeholder(1_000_000));
        assert_eq!((w, h), (150, 200));
    }

    #[test]
    fn test_fallback_on_render_failure() {
        let thumb = render_or_placeholder(&FailingRenderer, b"irrelevant", 4);
        assert_eq!(thumb, placeholder(4));
    }

    #[test]
    fn test_placeholder_renderer_always_succeeds() {
        let thumb = render_or_placeholder(&PlaceholderRenderer, b"", 0);
        assert_eq!(thumb, placeholder(0));
    }
}
