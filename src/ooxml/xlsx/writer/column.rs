//! Resolved column descriptors.
//!
//! Discovering columns from user types is the caller's business; the writer
//! only consumes the finished descriptors.

use crate::common::error::{Error, Result};
use crate::ooxml::xlsx::format::CellStyle;

/// Upper bound on a column width in character units.
pub const MAX_COLUMN_WIDTH: f64 = 255.0;

/// How a column's width is decided.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ColumnWidth {
    /// Derived from content when auto-width is requested
    #[default]
    Auto,
    /// Always exactly this many character units
    Fixed(f64),
}

/// One column of a streamed sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Header text
    pub name: String,
    /// Style of data cells
    pub style: CellStyle,
    /// Style of the header cell; bold default font when unset
    pub header_style: Option<CellStyle>,
    /// Whether text values may go to the shared strings table
    pub shareable: bool,
    pub width: ColumnWidth,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            style: CellStyle::default(),
            header_style: None,
            shareable: true,
            width: ColumnWidth::Auto,
        }
    }

    pub fn with_style(mut self, style: CellStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_header_style(mut self, style: CellStyle) -> Self {
        self.header_style = Some(style);
        self
    }

    pub fn shareable(mut self, shareable: bool) -> Self {
        self.shareable = shareable;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = ColumnWidth::Fixed(width);
        self
    }

    /// Reject widths a reader cannot display.
    pub fn validate(&self) -> Result<()> {
        if let ColumnWidth::Fixed(width) = self.width {
            if !width.is_finite() || width <= 0.0 {
                return Err(Error::InvalidColumn(format!(
                    "column '{}' has non-positive width {}",
                    self.name, width
                )));
            }
            if width > MAX_COLUMN_WIDTH {
                return Err(Error::InvalidColumn(format!(
                    "column '{}' is wider than {} characters",
                    self.name, MAX_COLUMN_WIDTH
                )));
            }
        }
        Ok(())
    }
}
