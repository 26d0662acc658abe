//! Sheetstream - streaming SpreadsheetML worksheet writer
//!
//! This library encodes row data into OOXML worksheet parts without buffering
//! a sheet in memory. Repeated styling and text are deduplicated into
//! document-wide tables, sheets longer than the row limit are split into
//! continuation parts, and column widths are patched in after the fact.
//!
//! # Features
//!
//! - **Style interning**: fonts, fills, borders and number formats are stored
//!   once and addressed through a packed [`StyleKey`](ooxml::xlsx::writer::StyleKey)
//! - **Shared strings**: a bounded table that degrades to inline text when full
//! - **Pagination**: parts are sealed at the row limit and continued seamlessly
//! - **Column widths**: an optional post-pass rewrites only the sheet header
//!
//! # Example - Streaming a sheet
//!
//! ```no_run
//! use sheetstream::ooxml::xlsx::writer::{
//!     CellValue, Column, IterSource, SheetSpec, StreamingWorkbook, WriterOptions,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = WriterOptions::new().with_auto_width(true).with_frozen_header(true);
//! let mut workbook = StreamingWorkbook::create("out", options)?;
//!
//! let sheet = SheetSpec::new("Orders", vec![Column::new("Id"), Column::new("Customer")]);
//! let rows = (1..=100_000).map(|i| vec![CellValue::from(i), CellValue::text("ACME")]);
//! workbook.write_sheet(&sheet, &mut IterSource::new(rows))?;
//!
//! let manifest = workbook.finish()?;
//! for part in &manifest.parts {
//!     println!("{} -> {}", part.display_name, part.path.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod ooxml;

// Re-export error types
pub use common::{Error, Result};
