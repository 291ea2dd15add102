use std::sync::Arc;

use tracing::debug;

use crate::document::block::{column_alignment, Alignment, Block, BlockKind};
use crate::document::sink::DocumentSink;
use crate::error::MicroloanError;
use crate::layout::geometry::{printable_area, FontStyle, Margins, PageSize, Typography};
use crate::layout::metrics::{wrap_text, FontMetrics, HelveticaMetrics};
use crate::raster::Bitmap;
use crate::MicroloanResult;

// Slices thinner than this are treated as rounding noise.
const SLICE_EPSILON: f32 = 0.01;
const CELL_PADDING_X: f32 = 3.0;
const CELL_PADDING_Y: f32 = 2.0;
const FIRST_COLUMN_WEIGHT: f32 = 0.6;
const LABEL_FRACTION: f32 = 0.4;
const SIGNATURE_LINE_START: f32 = 0.45;
const SIGNATURE_LINE_FRACTION: f32 = 0.3;

/// What gets drawn at a placed position.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacedContent {
    Text { text: String, style: FontStyle },
    /// Horizontal stroke starting at the item's x, y.
    Line { width: f32 },
    /// A horizontal band of a bitmap scaled to `full_height`. `source_offset`
    /// is how far down the scaled image this band starts.
    Image {
        bitmap: Arc<Bitmap>,
        full_height: f32,
        source_offset: f32,
    },
}

/// Positioned content. Coordinates are points from the page's top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedItem {
    pub kind: BlockKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub content: PlacedContent,
}

impl PlacedItem {
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn text(&self) -> Option<&str> {
        match &self.content {
            PlacedContent::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    pub items: Vec<PlacedItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    WritingPage,
    PageBreak,
}

/// Lays blocks onto fixed-size pages, breaking whenever the next line would
/// cross the bottom margin.
pub struct PaginatedDocumentWriter<M: FontMetrics = HelveticaMetrics> {
    page: PageSize,
    margins: Margins,
    typography: Typography,
    metrics: M,
    pages: Vec<Page>,
    current: Page,
    y: f32,
    state: WriterState,
    last: Option<BlockKind>,
}

impl PaginatedDocumentWriter<HelveticaMetrics> {
    pub fn a4() -> MicroloanResult<Self> {
        Self::new(
            PageSize::A4,
            Margins::default(),
            Typography::default(),
            HelveticaMetrics,
        )
    }
}

impl<M: FontMetrics> PaginatedDocumentWriter<M> {
    pub fn new(
        page: PageSize,
        margins: Margins,
        typography: Typography,
        metrics: M,
    ) -> MicroloanResult<Self> {
        let (width, height) = printable_area(&page, &margins);
        if !(width > 0.0 && height > 0.0) {
            return Err(MicroloanError::LayoutOverflow(format!(
                "printable area is {width:.2}x{height:.2}pt"
            )));
        }
        typography.validate()?;
        Ok(Self {
            page,
            margins,
            typography,
            metrics,
            pages: Vec::new(),
            current: Page {
                number: 1,
                items: Vec::new(),
            },
            y: margins.top,
            state: WriterState::WritingPage,
            last: None,
        })
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Current cursor position, measured from the top of the page.
    pub fn cursor(&self) -> f32 {
        self.y
    }

    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    fn printable_width(&self) -> f32 {
        self.page.width - self.margins.left - self.margins.right
    }

    fn printable_height(&self) -> f32 {
        self.page.height - self.margins.top - self.margins.bottom
    }

    fn bottom_limit(&self) -> f32 {
        self.page.height - self.margins.bottom
    }

    fn at_page_top(&self) -> bool {
        self.current.items.is_empty() && self.y <= self.margins.top
    }

    fn break_page(&mut self) {
        self.state = WriterState::PageBreak;
        let next = Page {
            number: self.current.number + 1,
            items: Vec::new(),
        };
        let done = std::mem::replace(&mut self.current, next);
        debug!(
            page = done.number,
            items = done.items.len(),
            cursor = self.y,
            "page break"
        );
        self.pages.push(done);
        self.y = self.margins.top;
        self.state = WriterState::WritingPage;
    }

    /// Break the page unless `height` more points fit above the bottom margin.
    fn ensure_room(&mut self, height: f32) -> MicroloanResult<()> {
        if height > self.printable_height() {
            return Err(MicroloanError::LayoutOverflow(format!(
                "{height:.2}pt of content cannot fit in {:.2}pt of page",
                self.printable_height()
            )));
        }
        if self.y + height > self.bottom_limit() && !self.at_page_top() {
            self.break_page();
        }
        Ok(())
    }

    fn push(&mut self, kind: BlockKind, x: f32, width: f32, height: f32, content: PlacedContent) {
        self.current.items.push(PlacedItem {
            kind,
            x,
            y: self.y,
            width,
            height,
            content,
        });
    }

    fn aligned_x(&self, text: &str, style: FontStyle, x0: f32, width: f32, align: Alignment) -> (f32, f32) {
        let measured = self.metrics.measure(text, style);
        let x = match align {
            Alignment::Left => x0,
            Alignment::Center => x0 + (width - measured) / 2.0,
            Alignment::Right => x0 + width - measured,
        };
        (x, measured)
    }

    fn place_lines(
        &mut self,
        kind: BlockKind,
        text: &str,
        style: FontStyle,
        align: Alignment,
    ) -> MicroloanResult<()> {
        let width = self.printable_width();
        let lines = wrap_text(&self.metrics, text, style, width)?;
        let line_height = self.typography.line_height(style.size);
        for line in lines {
            self.ensure_room(line_height)?;
            let (x, measured) = self.aligned_x(&line, style, self.margins.left, width, align);
            self.push(
                kind,
                x,
                measured,
                line_height,
                PlacedContent::Text { text: line, style },
            );
            self.y += line_height;
        }
        Ok(())
    }

    fn separate(&mut self, kind: BlockKind) {
        let joined = matches!(
            (self.last, kind),
            (Some(BlockKind::TableRow), BlockKind::TableRow)
                | (Some(BlockKind::LabeledValue), BlockKind::LabeledValue)
        );
        if self.last.is_some() && !joined && !self.at_page_top() {
            self.y += self.typography.paragraph_gap;
        }
    }

    fn heading(&mut self, text: &str, level: u8) -> MicroloanResult<()> {
        let t = self.typography;
        let size = match level {
            1 => t.heading_size,
            2 => t.subheading_size,
            _ => t.body_size,
        };
        let style = FontStyle::bold(size);
        // Keep every line of the heading on the same page as the first line after it.
        let lines = wrap_text(&self.metrics, text, style, self.printable_width())?.len();
        let kept = lines as f32 * t.line_height(size) + t.paragraph_gap + t.line_height(t.body_size);
        if kept <= self.printable_height() {
            self.ensure_room(kept)?;
        }
        self.place_lines(BlockKind::Heading, text, style, Alignment::Center)
    }

    fn labeled_value(&mut self, label: &str, value: &str) -> MicroloanResult<()> {
        let style = FontStyle::regular(self.typography.body_size);
        let label_width = self.printable_width() * LABEL_FRACTION;
        let value_width = self.printable_width() - label_width;
        let labels = wrap_text(&self.metrics, label, style, label_width - CELL_PADDING_X)?;
        let values = wrap_text(&self.metrics, value, style, value_width)?;
        let line_height = self.typography.line_height(style.size);

        for i in 0..labels.len().max(values.len()) {
            self.ensure_room(line_height)?;
            let left = self.margins.left;
            if let Some(l) = labels.get(i).filter(|l| !l.is_empty()) {
                let w = self.metrics.measure(l, style);
                self.push(
                    BlockKind::LabeledValue,
                    left,
                    w,
                    line_height,
                    PlacedContent::Text {
                        text: l.clone(),
                        style,
                    },
                );
            }
            if let Some(v) = values.get(i).filter(|v| !v.is_empty()) {
                let w = self.metrics.measure(v, style);
                self.push(
                    BlockKind::LabeledValue,
                    left + label_width,
                    w,
                    line_height,
                    PlacedContent::Text {
                        text: v.clone(),
                        style,
                    },
                );
            }
            self.y += line_height;
        }
        Ok(())
    }

    fn column_widths(&self, columns: usize) -> Vec<f32> {
        let total_weight = FIRST_COLUMN_WEIGHT + (columns.saturating_sub(1)) as f32;
        (0..columns)
            .map(|i| {
                let weight = if i == 0 { FIRST_COLUMN_WEIGHT } else { 1.0 };
                self.printable_width() * weight / total_weight
            })
            .collect()
    }

    fn table_row(&mut self, cells: &[String], header: bool) -> MicroloanResult<()> {
        let size = self.typography.table_size;
        let style = if header {
            FontStyle::bold(size)
        } else {
            FontStyle::regular(size)
        };
        let line_height = self.typography.line_height(size);
        let widths = self.column_widths(cells.len().max(1));

        let mut wrapped = Vec::with_capacity(cells.len());
        for (cell, width) in cells.iter().zip(&widths) {
            wrapped.push(wrap_text(&self.metrics, cell, style, width - 2.0 * CELL_PADDING_X)?);
        }
        let tallest = wrapped.iter().map(Vec::len).max().unwrap_or(1);
        let row_height = tallest as f32 * line_height + 2.0 * CELL_PADDING_Y;

        let table_start = self.last != Some(BlockKind::TableRow);
        self.ensure_room(row_height)?;
        let full_width = self.printable_width();
        if table_start || self.at_page_top() {
            self.push(
                BlockKind::TableRow,
                self.margins.left,
                full_width,
                0.0,
                PlacedContent::Line { width: full_width },
            );
        }

        let mut x0 = self.margins.left;
        let top = self.y;
        for (i, (lines, width)) in wrapped.into_iter().zip(&widths).enumerate() {
            self.y = top + CELL_PADDING_Y;
            let inner = width - 2.0 * CELL_PADDING_X;
            for line in lines {
                let (x, measured) =
                    self.aligned_x(&line, style, x0 + CELL_PADDING_X, inner, column_alignment(i));
                self.push(
                    BlockKind::TableRow,
                    x,
                    measured,
                    line_height,
                    PlacedContent::Text { text: line, style },
                );
                self.y += line_height;
            }
            x0 += width;
        }

        self.y = top + row_height;
        self.push(
            BlockKind::TableRow,
            self.margins.left,
            full_width,
            0.0,
            PlacedContent::Line { width: full_width },
        );
        Ok(())
    }

    fn signature(&mut self, role: &str, caption: &str, signer: Option<&str>) -> MicroloanResult<()> {
        let t = self.typography;
        let body = FontStyle::regular(t.body_size);
        let small = FontStyle::regular(t.caption_size);
        let body_height = t.line_height(t.body_size);
        let caption_height = t.line_height(t.caption_size);

        let left = self.margins.left;
        let width = self.printable_width();
        let line_x = left + width * SIGNATURE_LINE_START;
        let line_width = width * SIGNATURE_LINE_FRACTION;
        let signer_x = line_x + line_width + CELL_PADDING_X * 2.0;

        let roles = wrap_text(&self.metrics, role, body, line_x - left - CELL_PADDING_X)?;
        let signers = match signer.filter(|s| !s.is_empty()) {
            Some(name) => wrap_text(&self.metrics, name, body, left + width - signer_x)?,
            None => Vec::new(),
        };
        // The blank line and its caption sit beside the first row; extra role
        // or signer lines continue below in their own columns.
        let rows = roles.len().max(signers.len()).max(1);
        let height = (rows as f32 * body_height).max(body_height + caption_height);
        self.ensure_room(height)?;

        let top = self.y;
        for (i, line) in roles.into_iter().enumerate() {
            self.y = top + i as f32 * body_height;
            self.place_text(BlockKind::SignatureLine, left, line, body, body_height);
        }
        for (i, line) in signers.into_iter().enumerate() {
            self.y = top + i as f32 * body_height;
            self.place_text(BlockKind::SignatureLine, signer_x, line, body, body_height);
        }

        self.y = top + body_height * 0.8;
        self.push(
            BlockKind::SignatureLine,
            line_x,
            line_width,
            0.0,
            PlacedContent::Line { width: line_width },
        );
        self.y = top + body_height;
        let (x, measured) = self.aligned_x(caption, small, line_x, line_width, Alignment::Center);
        self.push(
            BlockKind::SignatureLine,
            x,
            measured,
            caption_height,
            PlacedContent::Text {
                text: caption.to_string(),
                style: small,
            },
        );
        self.y = top + height;
        Ok(())
    }

    fn place_text(&mut self, kind: BlockKind, x: f32, text: String, style: FontStyle, height: f32) {
        let width = self.metrics.measure(&text, style);
        self.push(kind, x, width, height, PlacedContent::Text { text, style });
    }

    fn rule(&mut self) -> MicroloanResult<()> {
        let gap = self.typography.paragraph_gap;
        self.ensure_room(gap)?;
        self.y += gap / 2.0;
        let width = self.printable_width();
        self.push(
            BlockKind::Rule,
            self.margins.left,
            width,
            0.0,
            PlacedContent::Line { width },
        );
        self.y += gap / 2.0;
        Ok(())
    }

    /// Scale `bitmap` to the printable width and slice it down the pages.
    fn bitmap(&mut self, bitmap: &Arc<Bitmap>) -> MicroloanResult<()> {
        if bitmap.width() == 0 || bitmap.height() == 0 {
            return Err(MicroloanError::LayoutOverflow(
                "cannot place an empty bitmap".into(),
            ));
        }
        let width = self.printable_width();
        let full_height = bitmap.height() as f32 * width / bitmap.width() as f32;
        let mut drawn = 0.0f32;

        while full_height - drawn > SLICE_EPSILON {
            let available = self.bottom_limit() - self.y;
            if available <= SLICE_EPSILON {
                if self.at_page_top() {
                    return Err(MicroloanError::LayoutOverflow(format!(
                        "{available:.3}pt of page is too little to slice a bitmap into"
                    )));
                }
                self.break_page();
                continue;
            }
            let slice = available.min(full_height - drawn);
            debug!(
                page = self.current.number,
                offset = drawn,
                height = slice,
                "bitmap slice"
            );
            self.push(
                BlockKind::Bitmap,
                self.margins.left,
                width,
                slice,
                PlacedContent::Image {
                    bitmap: Arc::clone(bitmap),
                    full_height,
                    source_offset: drawn,
                },
            );
            drawn += slice;
            self.y += slice;
            if full_height - drawn > SLICE_EPSILON {
                self.break_page();
            }
        }
        Ok(())
    }
}

impl<M: FontMetrics> DocumentSink for PaginatedDocumentWriter<M> {
    type Output = Vec<Page>;

    fn write_block(&mut self, block: &Block) -> MicroloanResult<()> {
        let kind = block.kind();
        self.separate(kind);
        let body = FontStyle::regular(self.typography.body_size);

        match block {
            Block::Heading { text, level } => self.heading(text, *level)?,
            Block::Paragraph { text, align } => {
                self.place_lines(BlockKind::Paragraph, text, body, *align)?
            }
            Block::LabeledValue { label, value } => self.labeled_value(label, value)?,
            Block::TableRow { cells, header } => self.table_row(cells, *header)?,
            Block::SignatureLine {
                role,
                caption,
                signer,
            } => self.signature(role, caption, signer.as_deref())?,
            Block::Rule => self.rule()?,
            Block::Spacer => {
                if !self.at_page_top() {
                    self.y += self.typography.line_height(body.size);
                }
            }
            Block::Bitmap(bitmap) => self.bitmap(bitmap)?,
        }
        self.last = Some(kind);
        Ok(())
    }

    fn finish(mut self) -> MicroloanResult<Vec<Page>> {
        self.pages.push(self.current);
        debug!(pages = self.pages.len(), "layout finished");
        Ok(self.pages)
    }
}

/// Lay `blocks` out with the default typography and Helvetica metrics.
pub fn write(blocks: &[Block], page: PageSize, margins: Margins) -> MicroloanResult<Vec<Page>> {
    write_with(blocks, page, margins, Typography::default(), HelveticaMetrics)
}

pub fn write_with<M: FontMetrics>(
    blocks: &[Block],
    page: PageSize,
    margins: Margins,
    typography: Typography,
    metrics: M,
) -> MicroloanResult<Vec<Page>> {
    let mut writer = PaginatedDocumentWriter::new(page, margins, typography, metrics)?;
    for block in blocks {
        writer.write_block(block)?;
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_page() -> (PageSize, Margins) {
        (
            PageSize {
                width: 200.0,
                height: 200.0,
            },
            Margins::uniform(20.0),
        )
    }

    #[test]
    fn test_single_paragraph_fits_one_page() {
        let pages = write(
            &[Block::paragraph("Hello")],
            PageSize::A4,
            Margins::default(),
        )
        .unwrap();
        assert_eq!(pages.len(), 1);
        let item = &pages[0].items[0];
        assert_eq!(item.text(), Some("Hello"));
        assert!((item.x - 56.7).abs() < 1e-3);
        assert!((item.y - 56.7).abs() < 1e-3);
    }

    #[test]
    fn test_alignment_changes_only_x() {
        let blocks = [
            Block::paragraph("Text"),
            Block::centered("Text"),
            Block::right("Text"),
        ];
        let pages = write(&blocks, PageSize::A4, Margins::default()).unwrap();
        let items = &pages[0].items;
        assert!(items[0].x < items[1].x && items[1].x < items[2].x);
        assert!((items[2].x + items[2].width - (595.28 - 56.7)).abs() < 1e-3);
        assert_eq!(items[0].width, items[2].width);
    }

    #[test]
    fn test_long_document_breaks_pages() {
        let (page, margins) = small_page();
        let blocks: Vec<Block> = (0..40)
            .map(|i| Block::paragraph(format!("Line number {i}")))
            .collect();
        let pages = write(&blocks, page, margins).unwrap();
        assert!(pages.len() >= 2);
        for (i, p) in pages.iter().enumerate() {
            assert_eq!(p.number, i + 1);
            assert!(!p.items.is_empty());
            for item in &p.items {
                assert!(item.bottom() <= 180.0, "{item:?}");
                assert!(item.y >= 20.0);
            }
        }
    }

    #[test]
    fn test_table_rows_never_split() {
        let (page, margins) = small_page();
        let mut blocks = vec![Block::table_header(["Day", "Payment"])];
        blocks.extend((1..=30).map(|d| Block::table_row([d.to_string(), "2667".into()])));
        let pages = write(&blocks, page, margins).unwrap();
        assert!(pages.len() >= 2);
        for p in &pages {
            let texts: Vec<&PlacedItem> = p.items.iter().filter(|i| i.text().is_some()).collect();
            // every row contributes its two cells on the same page
            assert_eq!(texts.len() % 2, 0);
        }
        // each continuation page opens with a rule above the first row
        for p in pages.iter().skip(1) {
            assert!(matches!(p.items[0].content, PlacedContent::Line { .. }));
        }
    }

    #[test]
    fn test_bitmap_waterfall_covers_full_height() {
        let (page, margins) = small_page();
        let bitmap = Arc::new(Bitmap::from_rgb(10, 40, vec![255; 10 * 40 * 3]).unwrap());
        let pages = write(&[Block::Bitmap(Arc::clone(&bitmap))], page, margins).unwrap();

        // 160pt wide => 640pt tall => four 160pt pages
        assert_eq!(pages.len(), 4);
        let mut expected_offset = 0.0;
        for p in &pages {
            assert_eq!(p.items.len(), 1);
            let item = &p.items[0];
            match &item.content {
                PlacedContent::Image {
                    full_height,
                    source_offset,
                    ..
                } => {
                    assert!((full_height - 640.0).abs() < 1e-3);
                    assert!((source_offset - expected_offset).abs() < 1e-3);
                }
                other => panic!("unexpected content {other:?}"),
            }
            expected_offset += item.height;
        }
        assert!((expected_offset - 640.0).abs() < 0.02);
    }

    #[test]
    fn test_bitmap_after_text_starts_on_same_page() {
        let (page, margins) = small_page();
        let bitmap = Arc::new(Bitmap::from_rgb(16, 8, vec![0; 16 * 8 * 3]).unwrap());
        let pages = write(
            &[Block::paragraph("Header"), Block::Bitmap(bitmap)],
            page,
            margins,
        )
        .unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].items.len(), 2);
    }

    #[test]
    fn test_zero_printable_area_is_overflow() {
        let result = PaginatedDocumentWriter::new(
            PageSize {
                width: 100.0,
                height: 100.0,
            },
            Margins::uniform(50.0),
            Typography::default(),
            HelveticaMetrics,
        );
        assert!(matches!(result, Err(MicroloanError::LayoutOverflow(_))));
    }

    #[test]
    fn test_oversized_line_is_overflow() {
        let typography = Typography {
            body_size: 400.0,
            ..Typography::default()
        };
        let (page, margins) = small_page();
        let result = write_with(
            &[Block::paragraph("x")],
            page,
            margins,
            typography,
            HelveticaMetrics,
        );
        assert!(matches!(result, Err(MicroloanError::LayoutOverflow(_))));
    }

    #[test]
    fn test_state_returns_to_writing_after_break() {
        let (page, margins) = small_page();
        let mut writer =
            PaginatedDocumentWriter::new(page, margins, Typography::default(), HelveticaMetrics)
                .unwrap();
        for i in 0..30 {
            writer.write_block(&Block::paragraph(format!("row {i}"))).unwrap();
        }
        assert!(writer.page_count() >= 2);
        assert_eq!(writer.state(), WriterState::WritingPage);
        assert!(writer.cursor() <= 180.0);
    }

    fn placed_texts(pages: &[Page]) -> Vec<&str> {
        pages
            .iter()
            .flat_map(|p| p.items.iter())
            .filter_map(PlacedItem::text)
            .collect()
    }

    #[test]
    fn test_signature_places_every_wrapped_line() {
        let blocks = [Block::signature(
            "Директор ООО \"ЭКОРРА ФИНАНСОВЫЙ ЦЕНТР\"",
            "(подпись)",
            Some("Константинопольский Александр Владимирович".into()),
        )];
        let pages = write(&blocks, PageSize::A4, Margins::default()).unwrap();
        let joined = placed_texts(&pages).join(" ");
        for word in ["ЦЕНТР\"", "Константинопольский", "Александр", "Владимирович", "(подпись)"] {
            assert!(joined.contains(word), "{word} missing from {joined}");
        }

        // continuation lines stack below the first row in the same column
        let signer_lines: Vec<&PlacedItem> = pages[0]
            .items
            .iter()
            .filter(|i| i.text().is_some_and(|t| t.contains("Константинопольский") || t.contains("Владимирович")))
            .collect();
        assert!(signer_lines.len() >= 2);
        assert!(signer_lines[1].y > signer_lines[0].y);
        assert!((signer_lines[1].x - signer_lines[0].x).abs() < 1e-3);
    }

    #[test]
    fn test_signature_block_moves_whole_to_next_page() {
        let (page, margins) = small_page();
        let mut writer =
            PaginatedDocumentWriter::new(page, margins, Typography::default(), HelveticaMetrics)
                .unwrap();
        while writer.cursor() < 150.0 {
            writer.write_block(&Block::paragraph("x")).unwrap();
        }
        writer
            .write_block(&Block::signature("Role", "(sign)", Some("Alpha Beta Gamma Delta".into())))
            .unwrap();
        let pages = writer.finish().unwrap();
        let last = pages.last().unwrap();
        assert!(last.items.iter().any(|i| i.text() == Some("Role")));
        assert!(last.items.iter().any(|i| i.text() == Some("(sign)")));
        for item in pages.iter().flat_map(|p| p.items.iter()) {
            assert!(item.bottom() <= 180.0, "{item:?}");
        }
    }

    #[test]
    fn test_wrapped_heading_stays_with_next_line() {
        let (page, margins) = small_page();
        let mut blocks: Vec<Block> = (0..7).map(|i| Block::paragraph(format!("row {i}"))).collect();
        blocks.push(Block::section("Long section heading that wraps"));
        blocks.push(Block::paragraph("body"));
        let pages = write(&blocks, page, margins).unwrap();

        let page_of = |needle: &str| {
            pages
                .iter()
                .position(|p| p.items.iter().any(|i| i.text().is_some_and(|t| t.contains(needle))))
                .unwrap()
        };
        assert_eq!(page_of("Long"), page_of("body"));
        assert_eq!(page_of("wraps"), page_of("body"));
    }
}
