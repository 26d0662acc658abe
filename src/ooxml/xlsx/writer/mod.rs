//! Streaming worksheet writer for XLSX.
//!
//! Rows flow one way: a [`RowSource`] feeds the [`StreamingWorksheetWriter`],
//! which consults the document-wide [`StyleRegistry`] and
//! [`SharedStringTable`] and serializes each row straight to disk. Parts are
//! split at the row limit, and the [`ColumnWidthRewriter`] optionally patches
//! final column widths into each sealed part.

pub mod cell;
pub mod column;
pub mod options;
pub mod reference;
pub mod rewrite;
pub mod sheet;
pub mod source;
pub mod strings;
pub mod style_key;
pub mod styles;
pub mod width;
pub mod workbook;

#[cfg(test)]
mod tests;

// Re-export main types
pub use cell::{CellValue, Row, StringCell};
pub use column::{Column, ColumnWidth, MAX_COLUMN_WIDTH};
pub use options::{DEFAULT_COLUMN_WIDTH, MAX_COLUMNS_PER_SHEET, MAX_ROWS_PER_SHEET, WriterOptions};
pub use reference::{
    ColumnLetters, MAX_COLUMN_NUMBER, cell_reference, column_to_letters, letters_to_column,
};
pub use rewrite::ColumnWidthRewriter;
pub use sheet::{HeaderLayout, HeaderRegion, PartState, SealedPart, StreamingWorksheetWriter, WorksheetPart};
pub use source::{IterSource, RowSource};
pub use strings::{DEFAULT_SHARED_STRING_CAPACITY, SharedStringTable};
pub use style_key::{StyleField, StyleFields, StyleKey};
pub use styles::{ComponentTable, StyleRegistry, XfRecord};
pub use width::WidthAccumulator;
pub use workbook::{PartEntry, SheetSpec, StreamingWorkbook, WorkbookManifest, display_name};
