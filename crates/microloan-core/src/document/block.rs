use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::raster::Bitmap;

/// Horizontal placement of a line. Only the x coordinate depends on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// What a block is, independent of its payload. Sinks pick fonts and spacing from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    Heading,
    Paragraph,
    LabeledValue,
    TableRow,
    SignatureLine,
    Rule,
    Spacer,
    Bitmap,
}

/// A unit of document content. Blocks never carry coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Level 1 is the document title, level 2 a section title.
    Heading { text: String, level: u8 },
    Paragraph { text: String, align: Alignment },
    LabeledValue { label: String, value: String },
    /// Consecutive rows form one table. The first column is left aligned,
    /// the rest right aligned.
    TableRow { cells: Vec<String>, header: bool },
    SignatureLine {
        role: String,
        caption: String,
        signer: Option<String>,
    },
    Rule,
    Spacer,
    Bitmap(Arc<Bitmap>),
}

impl Block {
    pub fn title(text: impl Into<String>) -> Self {
        Block::Heading {
            text: text.into(),
            level: 1,
        }
    }

    pub fn section(text: impl Into<String>) -> Self {
        Block::Heading {
            text: text.into(),
            level: 2,
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph {
            text: text.into(),
            align: Alignment::Left,
        }
    }

    pub fn centered(text: impl Into<String>) -> Self {
        Block::Paragraph {
            text: text.into(),
            align: Alignment::Center,
        }
    }

    pub fn right(text: impl Into<String>) -> Self {
        Block::Paragraph {
            text: text.into(),
            align: Alignment::Right,
        }
    }

    pub fn labeled(label: impl Into<String>, value: impl Into<String>) -> Self {
        Block::LabeledValue {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn table_header<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Block::TableRow {
            cells: cells.into_iter().map(Into::into).collect(),
            header: true,
        }
    }

    pub fn table_row<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Block::TableRow {
            cells: cells.into_iter().map(Into::into).collect(),
            header: false,
        }
    }

    pub fn signature(
        role: impl Into<String>,
        caption: impl Into<String>,
        signer: Option<String>,
    ) -> Self {
        Block::SignatureLine {
            role: role.into(),
            caption: caption.into(),
            signer,
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Heading { .. } => BlockKind::Heading,
            Block::Paragraph { .. } => BlockKind::Paragraph,
            Block::LabeledValue { .. } => BlockKind::LabeledValue,
            Block::TableRow { .. } => BlockKind::TableRow,
            Block::SignatureLine { .. } => BlockKind::SignatureLine,
            Block::Rule => BlockKind::Rule,
            Block::Spacer => BlockKind::Spacer,
            Block::Bitmap(_) => BlockKind::Bitmap,
        }
    }
}

/// Cell alignment shared by every sink.
pub fn column_alignment(index: usize) -> Alignment {
    if index == 0 {
        Alignment::Left
    } else {
        Alignment::Right
    }
}
