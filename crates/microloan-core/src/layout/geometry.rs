use serde::{Deserialize, Serialize};

use crate::error::MicroloanError;
use crate::MicroloanResult;

/// Page dimensions in PDF points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub const A4: PageSize = PageSize {
        width: 595.28,
        height: 841.89,
    };
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

/// Page margins in points. 56.7 pt is 20 mm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Margins {
    pub fn uniform(value: f32) -> Self {
        Margins {
            top: value,
            bottom: value,
            left: value,
            right: value,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Margins::uniform(56.7)
    }
}

/// Font sizes per block kind plus vertical rhythm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Typography {
    pub heading_size: f32,
    pub subheading_size: f32,
    pub body_size: f32,
    pub table_size: f32,
    pub caption_size: f32,
    /// Line height as a multiple of the font size.
    pub line_spacing: f32,
    /// Extra space after every block, in points.
    pub paragraph_gap: f32,
}

impl Default for Typography {
    fn default() -> Self {
        Typography {
            heading_size: 14.0,
            subheading_size: 11.5,
            body_size: 10.0,
            table_size: 9.0,
            caption_size: 7.5,
            line_spacing: 1.35,
            paragraph_gap: 4.0,
        }
    }
}

impl Typography {
    pub fn line_height(&self, size: f32) -> f32 {
        size * self.line_spacing
    }

    pub fn validate(&self) -> MicroloanResult<()> {
        let sizes = [
            ("typography.heading_size", self.heading_size),
            ("typography.subheading_size", self.subheading_size),
            ("typography.body_size", self.body_size),
            ("typography.table_size", self.table_size),
            ("typography.caption_size", self.caption_size),
            ("typography.line_spacing", self.line_spacing),
        ];
        for (field, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(MicroloanError::InvalidConfig {
                    field: field.into(),
                    reason: format!("must be positive, got {value}"),
                });
            }
        }
        if !(self.paragraph_gap.is_finite() && self.paragraph_gap >= 0.0) {
            return Err(MicroloanError::InvalidConfig {
                field: "typography.paragraph_gap".into(),
                reason: format!("must not be negative, got {}", self.paragraph_gap),
            });
        }
        Ok(())
    }
}

/// Font selection for a run of text. Only the two base-14 Helvetica faces exist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontStyle {
    pub size: f32,
    pub bold: bool,
}

impl FontStyle {
    pub fn regular(size: f32) -> Self {
        FontStyle { size, bold: false }
    }

    pub fn bold(size: f32) -> Self {
        FontStyle { size, bold: true }
    }
}

/// Printable width and the y coordinate content must not cross, for one page setup.
pub fn printable_area(page: &PageSize, margins: &Margins) -> (f32, f32) {
    (
        page.width - margins.left - margins.right,
        page.height - margins.top - margins.bottom,
    )
}
