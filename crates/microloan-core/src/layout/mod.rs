//! Page layout: geometry, glyph metrics and the paginated writer.

pub mod geometry;
pub mod glyphs;
pub mod metrics;
pub mod writer;

pub use geometry::{FontStyle, Margins, PageSize, Typography};
pub use metrics::{wrap_text, FontMetrics, HelveticaMetrics};
pub use writer::{
    write, write_with, Page, PaginatedDocumentWriter, PlacedContent, PlacedItem, WriterState,
};
