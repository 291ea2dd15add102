//! Serializes laid-out pages into a PDF file.

use std::collections::HashMap;
use std::sync::Arc;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};
use tracing::debug;

use crate::error::MicroloanError;
use crate::layout::geometry::PageSize;
use crate::layout::glyphs::encode_winansi;
use crate::layout::writer::{Page, PlacedContent, PlacedItem};
use crate::raster::Bitmap;
use crate::MicroloanResult;

const REGULAR_FONT: &[u8] = b"F1";
const BOLD_FONT: &[u8] = b"F2";
// Baseline sits this far below the top of the glyph box, as a fraction of the size.
const ASCENT: f32 = 0.8;
const LINE_WIDTH: f32 = 0.5;

/// Allocates object ids in write order.
struct Refs(i32);

impl Refs {
    fn next(&mut self) -> Ref {
        self.0 += 1;
        Ref::new(self.0)
    }
}

struct ImageObject {
    name: String,
    id: Ref,
}

/// Produce PDF bytes for `pages`. Every page gets the same media box.
pub fn serialize(pages: &[Page], page_size: PageSize) -> MicroloanResult<Vec<u8>> {
    if !(page_size.width > 0.0 && page_size.height > 0.0) {
        return Err(MicroloanError::RenderFailed(format!(
            "invalid page size {}x{}",
            page_size.width, page_size.height
        )));
    }

    let mut pdf = Pdf::new();
    let mut refs = Refs(0);
    let catalog_id = refs.next();
    let pages_id = refs.next();
    let regular_id = refs.next();
    let bold_id = refs.next();

    pdf.type1_font(regular_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(bold_id)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    // One XObject per distinct bitmap, however many slices reference it.
    let mut images: HashMap<*const Bitmap, ImageObject> = HashMap::new();
    for item in pages.iter().flat_map(|p| p.items.iter()) {
        if let PlacedContent::Image { bitmap, .. } = &item.content {
            let key = Arc::as_ptr(bitmap);
            if images.contains_key(&key) {
                continue;
            }
            let id = refs.next();
            embed_bitmap(&mut pdf, id, bitmap)?;
            let name = format!("Im{}", images.len() + 1);
            images.insert(key, ImageObject { name, id });
        }
    }

    let page_ids: Vec<(Ref, Ref)> = pages.iter().map(|_| (refs.next(), refs.next())).collect();

    for (page, (page_id, content_id)) in pages.iter().zip(&page_ids) {
        let mut content = Content::new();
        let mut used: Vec<&ImageObject> = Vec::new();
        for item in &page.items {
            draw_item(&mut content, item, page_size.height, &images, &mut used);
        }
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(*content_id, &compressed).filter(Filter::FlateDecode);

        let mut writer = pdf.page(*page_id);
        writer
            .media_box(Rect::new(0.0, 0.0, page_size.width, page_size.height))
            .parent(pages_id)
            .contents(*content_id);
        let mut resources = writer.resources();
        {
            let mut fonts = resources.fonts();
            fonts.pair(Name(REGULAR_FONT), regular_id);
            fonts.pair(Name(BOLD_FONT), bold_id);
        }
        if !used.is_empty() {
            let mut xobjects = resources.x_objects();
            for image in used {
                xobjects.pair(Name(image.name.as_bytes()), image.id);
            }
        }
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(pages.len() as i32);

    let bytes = pdf.finish();
    debug!(pages = pages.len(), images = images.len(), bytes = bytes.len(), "pdf serialized");
    Ok(bytes)
}

fn embed_bitmap(pdf: &mut Pdf, id: Ref, bitmap: &Bitmap) -> MicroloanResult<()> {
    let width = i32::try_from(bitmap.width())
        .map_err(|_| MicroloanError::RenderFailed("bitmap too wide".into()))?;
    let height = i32::try_from(bitmap.height())
        .map_err(|_| MicroloanError::RenderFailed("bitmap too tall".into()))?;
    let compressed = miniz_oxide::deflate::compress_to_vec_zlib(bitmap.pixels(), 6);
    let mut xobj = pdf.image_xobject(id, &compressed);
    xobj.filter(Filter::FlateDecode);
    xobj.width(width);
    xobj.height(height);
    xobj.color_space().device_rgb();
    xobj.bits_per_component(8);
    Ok(())
}

fn draw_item<'a>(
    content: &mut Content,
    item: &PlacedItem,
    page_height: f32,
    images: &'a HashMap<*const Bitmap, ImageObject>,
    used: &mut Vec<&'a ImageObject>,
) {
    match &item.content {
        PlacedContent::Text { text, style } => {
            let font = if style.bold { BOLD_FONT } else { REGULAR_FONT };
            let baseline = item.y + (item.height - style.size) / 2.0 + ASCENT * style.size;
            let bytes = encode_winansi(text);
            content
                .begin_text()
                .set_font(Name(font), style.size)
                .next_line(item.x, page_height - baseline)
                .show(Str(&bytes))
                .end_text();
        }
        PlacedContent::Line { width } => {
            let y = page_height - item.y;
            content.set_line_width(LINE_WIDTH);
            content.move_to(item.x, y);
            content.line_to(item.x + width, y);
            content.stroke();
        }
        PlacedContent::Image {
            bitmap,
            full_height,
            source_offset,
        } => {
            let Some(image) = images.get(&Arc::as_ptr(bitmap)) else {
                return;
            };
            if !used.iter().any(|u| u.id == image.id) {
                used.push(image);
            }
            let clip_bottom = page_height - item.bottom();
            let image_bottom = page_height - (item.y - source_offset + full_height);
            content.save_state();
            content.rect(item.x, clip_bottom, item.width, item.height);
            content.clip_nonzero();
            content.end_path();
            content.transform([item.width, 0.0, 0.0, *full_height, item.x, image_bottom]);
            content.x_object(Name(image.name.as_bytes()));
            content.restore_state();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::block::Block;
    use crate::layout::geometry::Margins;
    use crate::layout::writer::write;

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn test_pdf_header_and_page_objects() {
        let blocks: Vec<Block> = (0..120)
            .map(|i| Block::paragraph(format!("Строка {i}")))
            .collect();
        let pages = write(&blocks, PageSize::A4, Margins::default()).unwrap();
        assert!(pages.len() >= 2);

        let bytes = serialize(&pages, PageSize::A4).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(count(&bytes, b"/MediaBox"), pages.len());
        assert_eq!(count(&bytes, b"/BaseFont /Helvetica-Bold"), 1);
        assert_eq!(count(&bytes, b"/WinAnsiEncoding"), 2);
    }

    #[test]
    fn test_shared_bitmap_embedded_once() {
        let bitmap = Arc::new(Bitmap::from_rgb(4, 40, vec![200; 4 * 40 * 3]).unwrap());
        let pages = write(
            &[Block::Bitmap(Arc::clone(&bitmap))],
            PageSize {
                width: 200.0,
                height: 200.0,
            },
            Margins::uniform(20.0),
        )
        .unwrap();
        assert!(pages.len() > 1);
        let bytes = serialize(
            &pages,
            PageSize {
                width: 200.0,
                height: 200.0,
            },
        )
        .unwrap();
        assert_eq!(count(&bytes, b"/Subtype /Image"), 1);
        assert_eq!(count(&bytes, b"/MediaBox"), pages.len());
    }

    #[test]
    fn test_empty_page_list_still_serializes() {
        let bytes = serialize(&[Page::default()], PageSize::A4).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_invalid_page_size() {
        let result = serialize(
            &[],
            PageSize {
                width: 0.0,
                height: 10.0,
            },
        );
        assert!(matches!(result, Err(MicroloanError::RenderFailed(_))));
    }
}
