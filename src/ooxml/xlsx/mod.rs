//! Excel (.xlsx) worksheet generation.
//!
//! - `format`: cell style descriptors (fonts, fills, borders, alignment)
//! - `styles`: number format codes and the built-in format table
//! - `writer`: the streaming worksheet writer and its registries

pub mod format;
pub mod styles;
pub mod writer;

pub use format::{
    CellBorder, CellBorderLineStyle, CellBorderSide, CellFill, CellFillPatternType, CellFont,
    CellStyle, HorizontalAlignment, VerticalAlignment,
};
