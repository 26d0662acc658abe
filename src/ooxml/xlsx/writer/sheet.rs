//! Streaming worksheet writer.
//!
//! Rows are pulled from a [`RowSource`] and serialized straight into a
//! worksheet part on disk; nothing but the current row is held in memory.
//! When a part reaches the row limit it is sealed and a continuation part is
//! opened that inherits the column descriptors, resolved styles and watermark
//! of the first, restarts its row numbering at 1, and keeps pulling from the
//! same source.
//!
//! Every part is laid out as:
//!
//! ```text
//! [preamble][placeholder region][<cols>?<sheetData> rows </sheetData> footer]
//! ^0        ^header_len         ^header_len + base_len
//! ```
//!
//! The placeholder region carries the values only known once the part is
//! sealed (the dimension end cell). Its offsets are recorded in a
//! [`HeaderLayout`] so that the [`ColumnWidthRewriter`](super::ColumnWidthRewriter)
//! can regenerate it without re-serializing the rows.

use super::cell::{CellValue, Row, StringCell};
use super::column::{Column, ColumnWidth};
use super::options::WriterOptions;
use super::reference::{cell_reference, write_cell_reference};
use super::rewrite::ColumnWidthRewriter;
use super::source::RowSource;
use super::strings::SharedStringTable;
use super::style_key::{StyleField, StyleKey};
use super::styles::StyleRegistry;
use super::width::{BOOL_WIDTH, MIN_DATE_WIDTH, WidthAccumulator};
use crate::common::error::{Error, Result};
use crate::common::xml::{needs_space_preserve, write_escaped};
use crate::ooxml::xlsx::format::CellStyle;
use crate::ooxml::xlsx::styles::number_format::{
    BUILTIN_DATE_FORMAT_ID, display_width_hint, is_date_format,
};
use once_cell::unsync::OnceCell;
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const WORKSHEET_OPEN: &str = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#;
const PAGE_MARGINS: &str =
    r#"<pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/>"#;

/// Bytes reserved for the dimension element: fits `<dimension ref="A1:XFD1048576"/>`.
pub(crate) const DIMENSION_SLOT_LEN: usize = 32;

/// Value written for non-finite doubles.
const NUM_ERROR: &str = "#NUM!";

/// Lifecycle of one worksheet part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartState {
    /// File created, nothing written
    Before,
    /// Preamble and placeholder region written
    Header,
    /// Rows being streamed
    Body,
    /// Footer written
    After,
    /// Placeholders patched and file closed
    Sealed,
}

/// Byte offsets of the placeholder region of a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLayout {
    /// Length of everything before the placeholder region
    pub header_len: u64,
    /// Length of the placeholder region
    pub base_len: u64,
    /// Length of a `<cols>` element written right after the region
    pub cols_len: u64,
    /// Absolute offset of the reserved dimension slot, if one was written
    pub dimension_slot: Option<u64>,
}

/// Content of the placeholder region, regenerated on every patch.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRegion {
    /// Reserve a dimension slot at the start of the region
    pub dimension: bool,
    /// Freeze the first row
    pub freeze_header: bool,
    pub default_column_width: f64,
}

impl HeaderRegion {
    /// Serialize the region.
    ///
    /// With `dimension_ref` unset the slot is filled with the placeholder
    /// reference `A1`; either way it occupies exactly [`DIMENSION_SLOT_LEN`]
    /// bytes.
    pub(crate) fn write(&self, out: &mut Vec<u8>, dimension_ref: Option<&str>) {
        if self.dimension {
            write_dimension_slot(out, dimension_ref.unwrap_or("A1"));
        }

        out.extend_from_slice(b"<sheetViews><sheetView workbookViewId=\"0\"");
        if self.freeze_header {
            out.extend_from_slice(
                br#"><pane ySplit="1" topLeftCell="A2" activePane="bottomLeft" state="frozen"/><selection pane="bottomLeft"/></sheetView></sheetViews>"#,
            );
        } else {
            out.extend_from_slice(b"/></sheetViews>");
        }

        out.extend_from_slice(br#"<sheetFormatPr defaultRowHeight="15" defaultColWidth=""#);
        write_f64(out, self.default_column_width);
        out.extend_from_slice(b"\"/>");
    }
}

fn write_dimension_slot(out: &mut Vec<u8>, dimension_ref: &str) {
    let start = out.len();
    out.extend_from_slice(b"<dimension ref=\"");
    out.extend_from_slice(dimension_ref.as_bytes());
    out.extend_from_slice(b"\"/>");
    // Inter-element whitespace keeps the slot width constant
    let written = out.len() - start;
    out.resize(start + DIMENSION_SLOT_LEN.max(written), b' ');
}

#[inline]
fn write_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(itoa::Buffer::new().format(value).as_bytes());
}

#[inline]
fn write_f64(out: &mut Vec<u8>, value: f64) {
    // Integral values print without a fraction ("12", not "12.0")
    if value.fract() == 0.0 && value.abs() < 1e15 {
        out.extend_from_slice(itoa::Buffer::new().format(value as i64).as_bytes());
    } else {
        out.extend_from_slice(ryu::Buffer::new().format_finite(value).as_bytes());
    }
}

/// Column descriptor with its styles resolved against the registry.
#[derive(Debug, Clone)]
struct ResolvedColumn {
    name: String,
    xf: u32,
    /// Style for date cells: the column style, given a date format if it has none
    date_key: StyleKey,
    /// Resolved on the first date cell
    date_xf: OnceCell<u32>,
    header_xf: u32,
    shareable: bool,
    width: ColumnWidth,
    /// Numbers in this column render through a date format
    date_formatted: bool,
    date_width: f64,
}

impl ResolvedColumn {
    fn date_xf(&self, styles: &StyleRegistry) -> Result<u32> {
        self.date_xf.get_or_try_init(|| styles.resolve(self.date_key)).copied()
    }
}

/// A part that has been written completely and closed.
#[derive(Debug, Clone)]
pub struct SealedPart {
    pub path: PathBuf,
    /// Zero-based position among the parts of one logical sheet
    pub index: u32,
    /// Rows written, header included
    pub rows: u32,
    /// Data rows written
    pub data_rows: u32,
    /// Widest row, in cells
    pub columns: u32,
    /// Final `ref` of the dimension element
    pub dimension: String,
    pub layout: HeaderLayout,
    pub region: HeaderRegion,
    pub widths: WidthAccumulator,
    pub width_specs: Vec<ColumnWidth>,
}

/// One physical worksheet file being written.
#[derive(Debug)]
pub struct WorksheetPart {
    path: PathBuf,
    index: u32,
    out: BufWriter<File>,
    state: PartState,
    layout: HeaderLayout,
    rows: u32,
    data_rows: u32,
    columns: u32,
    widths: WidthAccumulator,
}

impl WorksheetPart {
    /// Create the part file. Nothing is written yet.
    pub fn create(path: impl Into<PathBuf>, index: u32, columns: usize) -> Result<Self> {
        let path = path.into();
        let file = File::create(&path)?;
        log::debug!("opened worksheet part {} at {}", index, path.display());
        Ok(Self {
            path,
            index,
            out: BufWriter::with_capacity(64 * 1024, file),
            state: PartState::Before,
            layout: HeaderLayout {
                header_len: 0,
                base_len: 0,
                cols_len: 0,
                dimension_slot: None,
            },
            rows: 0,
            data_rows: 0,
            columns: 0,
            widths: WidthAccumulator::new(columns),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> PartState {
        self.state
    }

    pub fn layout(&self) -> HeaderLayout {
        self.layout
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn data_rows(&self) -> u32 {
        self.data_rows
    }

    fn expect_state(&self, expected: &[PartState], action: &str) -> Result<()> {
        if expected.contains(&self.state) {
            Ok(())
        } else {
            Err(Error::InvalidState(format!(
                "cannot {} a worksheet part in state {:?}",
                action, self.state
            )))
        }
    }

    /// Write the preamble and placeholder region, recording their lengths.
    fn write_header(&mut self, region: &HeaderRegion, fixed_cols: Option<&[u8]>) -> Result<()> {
        self.expect_state(&[PartState::Before], "write the header of")?;

        let mut buf = Vec::with_capacity(1024);
        buf.extend_from_slice(XML_DECLARATION.as_bytes());
        buf.push(b'\n');
        buf.extend_from_slice(WORKSHEET_OPEN.as_bytes());
        let header_len = buf.len();

        region.write(&mut buf, None);
        let base_len = buf.len() - header_len;

        let cols = fixed_cols.unwrap_or_default();
        buf.extend_from_slice(cols);
        buf.extend_from_slice(b"<sheetData>");
        self.out.write_all(&buf)?;

        self.layout = HeaderLayout {
            header_len: header_len as u64,
            base_len: base_len as u64,
            cols_len: cols.len() as u64,
            dimension_slot: region.dimension.then_some(header_len as u64),
        };
        self.state = PartState::Header;
        Ok(())
    }

    /// Append one serialized row.
    fn write_row_bytes(&mut self, bytes: &[u8], cells: u32, is_data: bool) -> Result<()> {
        self.expect_state(&[PartState::Header, PartState::Body], "write a row to")?;
        self.out.write_all(bytes)?;
        self.state = PartState::Body;
        self.rows += 1;
        if is_data {
            self.data_rows += 1;
        }
        self.columns = self.columns.max(cells);
        Ok(())
    }

    fn write_footer(&mut self, watermark_rel_id: Option<&str>) -> Result<()> {
        self.expect_state(&[PartState::Header, PartState::Body], "write the footer of")?;

        let mut buf = Vec::with_capacity(256);
        buf.extend_from_slice(b"</sheetData>");
        buf.extend_from_slice(PAGE_MARGINS.as_bytes());
        if let Some(rel_id) = watermark_rel_id {
            buf.extend_from_slice(b"<picture r:id=\"");
            write_escaped(&mut buf, rel_id);
            buf.extend_from_slice(b"\"/>");
        }
        buf.extend_from_slice(b"</worksheet>");
        self.out.write_all(&buf)?;

        self.state = PartState::After;
        Ok(())
    }

    /// Final `ref` of the dimension element.
    pub fn dimension(&self) -> String {
        if self.rows <= 1 && self.columns <= 1 {
            return "A1".to_string();
        }
        format!("A1:{}", cell_reference(self.columns.max(1), self.rows.max(1)))
    }

    /// Patch the dimension slot in place and close the file.
    fn seal(mut self, region: HeaderRegion, width_specs: Vec<ColumnWidth>) -> Result<SealedPart> {
        self.expect_state(&[PartState::After], "seal")?;

        let dimension = self.dimension();
        if let Some(offset) = self.layout.dimension_slot {
            let mut slot = Vec::with_capacity(DIMENSION_SLOT_LEN);
            write_dimension_slot(&mut slot, &dimension);
            self.out.seek(SeekFrom::Start(offset))?;
            self.out.write_all(&slot)?;
        }
        self.out.flush()?;
        self.state = PartState::Sealed;
        log::debug!(
            "sealed worksheet part {} ({} rows, dimension {})",
            self.index,
            self.rows,
            dimension
        );

        Ok(SealedPart {
            path: self.path,
            index: self.index,
            rows: self.rows,
            data_rows: self.data_rows,
            columns: self.columns,
            dimension,
            layout: self.layout,
            region,
            widths: self.widths,
            width_specs,
        })
    }
}

/// Writes one logical sheet, splitting it into parts at the row limit.
///
/// The style registry and shared strings table are borrowed; several writers
/// may share them from different threads.
#[derive(Debug)]
pub struct StreamingWorksheetWriter<'a> {
    styles: &'a StyleRegistry,
    strings: &'a SharedStringTable,
    options: &'a WriterOptions,
    columns: Vec<ResolvedColumn>,
    region: HeaderRegion,
    fixed_cols: Option<Vec<u8>>,
    watermark_rel_id: Option<String>,
    rewriter: Option<ColumnWidthRewriter>,
    /// Reused for every row
    row_buf: Vec<u8>,
}

impl<'a> StreamingWorksheetWriter<'a> {
    /// Validate the sheet configuration and resolve every column style.
    ///
    /// Configuration errors, including a column count over the limit, are
    /// reported here, before any part file exists.
    pub fn new(
        styles: &'a StyleRegistry,
        strings: &'a SharedStringTable,
        options: &'a WriterOptions,
        columns: &[Column],
    ) -> Result<Self> {
        options.validate()?;
        if columns.len() > options.max_columns as usize {
            return Err(Error::ColumnLimitExceeded {
                columns: columns.len(),
                limit: options.max_columns as usize,
            });
        }

        let header_style = CellStyle::header();
        let resolved = columns
            .iter()
            .map(|column| -> Result<ResolvedColumn> {
                column.validate()?;
                let key = styles.key_for(&column.style)?;
                let xf = styles.resolve(key)?;
                let has_format = key.has_field(StyleField::NumberFormat);
                let (date_key, date_xf) = if has_format {
                    (key, OnceCell::with_value(xf))
                } else {
                    let date_key = key
                        .clear_field(StyleField::NumberFormat)
                        .set_field(StyleField::NumberFormat, BUILTIN_DATE_FORMAT_ID)?;
                    (date_key, OnceCell::new())
                };
                let date_code = styles.number_format_code(date_key.field(StyleField::NumberFormat));
                let date_formatted = has_format && date_code.as_deref().is_some_and(is_date_format);
                let date_width = date_code.map_or(MIN_DATE_WIDTH, |code| {
                    (display_width_hint(&code) as f64).max(MIN_DATE_WIDTH)
                });
                let header_xf = if options.write_header {
                    styles.style_index(column.header_style.as_ref().unwrap_or(&header_style))?
                } else {
                    0
                };

                Ok(ResolvedColumn {
                    name: column.name.clone(),
                    xf,
                    date_key,
                    date_xf,
                    header_xf,
                    shareable: column.shareable,
                    width: column.width,
                    date_formatted,
                    date_width,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let fixed_cols = (!options.auto_width)
            .then(|| fixed_cols_element(&resolved))
            .flatten();

        Ok(Self {
            styles,
            strings,
            options,
            columns: resolved,
            region: HeaderRegion {
                dimension: true,
                freeze_header: options.freeze_header && options.write_header,
                default_column_width: options.default_column_width,
            },
            fixed_cols,
            watermark_rel_id: None,
            rewriter: options.auto_width.then(|| ColumnWidthRewriter::new(options)),
            row_buf: Vec::with_capacity(4096),
        })
    }

    /// Reference a watermark image relationship from every part.
    pub fn with_watermark(mut self, rel_id: impl Into<String>) -> Self {
        self.watermark_rel_id = Some(rel_id.into());
        self
    }

    /// Number of columns declared for the sheet.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Stream every row of `source` into as many parts as the row limit
    /// requires. `part_path` maps a zero-based part index to its file path.
    pub fn write<S, F>(&mut self, source: &mut S, mut part_path: F) -> Result<Vec<SealedPart>>
    where
        S: RowSource + ?Sized,
        F: FnMut(u32) -> PathBuf,
    {
        let capacity = self.options.data_rows_per_part();
        let mut sealed = Vec::new();
        let mut part = self.open_part(0, part_path(0))?;

        while let Some(batch) = source.next_batch()? {
            if batch.is_empty() {
                break;
            }
            for row in &batch {
                if part.data_rows >= capacity {
                    log::trace!(
                        "row limit {} reached in part {}, continuing in a new part",
                        self.options.max_rows_per_part,
                        part.index
                    );
                    sealed.push(self.finish_part(part)?);
                    let index = sealed.len() as u32;
                    part = self.open_part(index, part_path(index))?;
                }
                self.write_row(&mut part, row)?;
            }
        }

        sealed.push(self.finish_part(part)?);
        Ok(sealed)
    }

    fn open_part(&mut self, index: u32, path: PathBuf) -> Result<WorksheetPart> {
        let mut part = WorksheetPart::create(path, index, self.columns.len())?;
        part.write_header(&self.region, self.fixed_cols.as_deref())?;
        if self.options.write_header {
            self.write_header_row(&mut part)?;
        }
        Ok(part)
    }

    fn finish_part(&mut self, mut part: WorksheetPart) -> Result<SealedPart> {
        part.write_footer(self.watermark_rel_id.as_deref())?;
        let specs = self.columns.iter().map(|c| c.width).collect();
        let mut sealed = part.seal(self.region.clone(), specs)?;
        if let Some(rewriter) = &self.rewriter {
            rewriter.rewrite(&mut sealed)?;
        }
        Ok(sealed)
    }

    fn write_header_row(&mut self, part: &mut WorksheetPart) -> Result<()> {
        let row_number = part.rows + 1;
        let mut buf = std::mem::take(&mut self.row_buf);
        buf.clear();
        open_row(&mut buf, row_number, self.columns.len() as u32);

        for (i, column) in self.columns.iter().enumerate() {
            let col = i as u32 + 1;
            let shared = column.shareable.then(|| self.strings.push(&column.name)).flatten();
            match shared {
                Some(index) => write_shared(&mut buf, col, row_number, column.header_xf, index),
                None => write_inline(&mut buf, col, row_number, column.header_xf, &column.name),
            }
            part.widths.observe(i, column.name.len() as f64);
        }
        buf.extend_from_slice(b"</row>");

        let result = part.write_row_bytes(&buf, self.columns.len() as u32, false);
        self.row_buf = buf;
        result
    }

    /// Serialize one data row into the part.
    fn write_row(&mut self, part: &mut WorksheetPart, row: &Row) -> Result<()> {
        let row_number = part.rows + 1;
        if row.len() > self.columns.len() {
            return Err(Error::RowTooWide {
                row: row_number,
                cells: row.len(),
                columns: self.columns.len(),
            });
        }

        let mut buf = std::mem::take(&mut self.row_buf);
        buf.clear();
        open_row(&mut buf, row_number, row.len() as u32);
        let mut result = Ok(());
        for (i, value) in row.iter().enumerate() {
            result = self.write_cell(&mut buf, &mut part.widths, i, row_number, value);
            if result.is_err() {
                break;
            }
        }
        buf.extend_from_slice(b"</row>");

        let result = result.and_then(|()| part.write_row_bytes(&buf, row.len() as u32, true));
        self.row_buf = buf;
        result
    }

    fn write_cell(
        &self,
        buf: &mut Vec<u8>,
        widths: &mut WidthAccumulator,
        i: usize,
        row: u32,
        value: &CellValue,
    ) -> Result<()> {
        let column = &self.columns[i];
        let col = i as u32 + 1;
        let xf = column.xf;

        let width = match value {
            CellValue::Blank => {
                open_cell(buf, col, row, None, xf);
                buf.extend_from_slice(b"/>");
                None
            },
            CellValue::Bool(b) => {
                open_cell(buf, col, row, Some("b"), xf);
                buf.extend_from_slice(if *b { b"><v>1</v></c>" } else { b"><v>0</v></c>" });
                Some(BOOL_WIDTH)
            },
            CellValue::Integer(n) => Some(numeric_width(
                column,
                write_number(buf, col, row, xf, itoa::Buffer::new().format(*n)),
            )),
            CellValue::Long(n) => Some(numeric_width(
                column,
                write_number(buf, col, row, xf, itoa::Buffer::new().format(*n)),
            )),
            CellValue::Double(d) => Some(numeric_width(column, write_double(buf, col, row, xf, *d))),
            CellValue::Decimal(d) => Some(numeric_width(
                column,
                write_number(buf, col, row, xf, &d.to_string()),
            )),
            CellValue::DateSerial(d) => {
                write_double(buf, col, row, column.date_xf(self.styles)?, *d);
                Some(column.date_width)
            },
            CellValue::String(s) => Some(self.write_string(buf, column, col, row, s)?),
        };

        if let Some(width) = width {
            widths.observe(i, width);
        }
        Ok(())
    }

    /// Route a string through the shared table when allowed, falling back to
    /// inline text. Returns the measured width.
    fn write_string(
        &self,
        buf: &mut Vec<u8>,
        column: &ResolvedColumn,
        col: u32,
        row: u32,
        value: &StringCell,
    ) -> Result<f64> {
        let xf = column.xf;
        match value {
            StringCell::Text(text) => {
                let shared = (column.shareable && !text.is_empty())
                    .then(|| self.strings.push(text))
                    .flatten();
                match shared {
                    Some(index) => write_shared(buf, col, row, xf, index),
                    None => write_inline(buf, col, row, xf, text),
                }
                Ok(text.len() as f64)
            },
            StringCell::Char(c) => {
                let shared = column.shareable.then(|| self.strings.push_char(*c)).flatten();
                match shared {
                    Some(index) => write_shared(buf, col, row, xf, index),
                    None => write_inline(buf, col, row, xf, c.encode_utf8(&mut [0u8; 4])),
                }
                Ok(c.len_utf8() as f64)
            },
            StringCell::Shared(index) => {
                if *index as usize >= self.strings.unique_count() {
                    return Err(Error::InvalidState(format!(
                        "cell {} references shared string {} but the table holds {}",
                        cell_reference(col, row),
                        index,
                        self.strings.unique_count()
                    )));
                }
                write_shared(buf, col, row, xf, *index);
                if self.rewriter.is_some() {
                    Ok(self.strings.get(*index).map_or(0.0, |s| s.len() as f64))
                } else {
                    Ok(0.0)
                }
            },
            StringCell::Inline(text) => {
                write_inline(buf, col, row, xf, text);
                Ok(text.len() as f64)
            },
        }
    }
}

/// Numbers shown through a date format are as wide as the rendered date.
#[inline]
fn numeric_width(column: &ResolvedColumn, rendered: f64) -> f64 {
    if column.date_formatted {
        column.date_width
    } else {
        rendered
    }
}

fn fixed_cols_element(columns: &[ResolvedColumn]) -> Option<Vec<u8>> {
    let mut fixed = columns.iter().enumerate().filter_map(|(i, c)| match c.width {
        ColumnWidth::Fixed(width) => Some((i as u32 + 1, width)),
        ColumnWidth::Auto => None,
    });
    let first = fixed.next()?;

    let mut out = b"<cols>".to_vec();
    for (col, width) in std::iter::once(first).chain(fixed) {
        write_col(&mut out, col, width);
    }
    out.extend_from_slice(b"</cols>");
    Some(out)
}

/// Append one `<col>` element.
pub(crate) fn write_col(out: &mut Vec<u8>, col: u32, width: f64) {
    out.extend_from_slice(b"<col min=\"");
    write_u32(out, col);
    out.extend_from_slice(b"\" max=\"");
    write_u32(out, col);
    out.extend_from_slice(b"\" width=\"");
    write_f64(out, width);
    out.extend_from_slice(b"\" customWidth=\"1\"/>");
}

fn open_row(buf: &mut Vec<u8>, row: u32, cells: u32) {
    buf.extend_from_slice(b"<row r=\"");
    write_u32(buf, row);
    if cells > 0 {
        buf.extend_from_slice(b"\" spans=\"1:");
        write_u32(buf, cells);
    }
    buf.extend_from_slice(b"\">");
}

/// Write `<c r=".." t=".." s=".."` without closing the start tag.
fn open_cell(buf: &mut Vec<u8>, col: u32, row: u32, cell_type: Option<&str>, xf: u32) {
    buf.extend_from_slice(b"<c r=\"");
    write_cell_reference(buf, col, row);
    buf.push(b'"');
    if let Some(t) = cell_type {
        buf.extend_from_slice(b" t=\"");
        buf.extend_from_slice(t.as_bytes());
        buf.push(b'"');
    }
    if xf != 0 {
        buf.extend_from_slice(b" s=\"");
        write_u32(buf, xf);
        buf.push(b'"');
    }
}

/// Numeric cell; returns the rendered width.
fn write_number(buf: &mut Vec<u8>, col: u32, row: u32, xf: u32, text: &str) -> f64 {
    open_cell(buf, col, row, None, xf);
    buf.extend_from_slice(b"><v>");
    buf.extend_from_slice(text.as_bytes());
    buf.extend_from_slice(b"</v></c>");
    text.len() as f64
}

fn write_double(buf: &mut Vec<u8>, col: u32, row: u32, xf: u32, value: f64) -> f64 {
    if value.is_finite() {
        let mut text = Vec::with_capacity(24);
        write_f64(&mut text, value);
        // ryu and itoa only emit ASCII
        let text = std::str::from_utf8(&text).unwrap_or("0");
        return write_number(buf, col, row, xf, text);
    }

    log::warn!(
        "non-finite value {} at {} written as {}",
        value,
        cell_reference(col, row),
        NUM_ERROR
    );
    open_cell(buf, col, row, Some("e"), xf);
    buf.extend_from_slice(b"><v>");
    buf.extend_from_slice(NUM_ERROR.as_bytes());
    buf.extend_from_slice(b"</v></c>");
    NUM_ERROR.len() as f64
}

fn write_shared(buf: &mut Vec<u8>, col: u32, row: u32, xf: u32, index: u32) {
    open_cell(buf, col, row, Some("s"), xf);
    buf.extend_from_slice(b"><v>");
    write_u32(buf, index);
    buf.extend_from_slice(b"</v></c>");
}

fn write_inline(buf: &mut Vec<u8>, col: u32, row: u32, xf: u32, text: &str) {
    open_cell(buf, col, row, Some("inlineStr"), xf);
    if needs_space_preserve(text) {
        buf.extend_from_slice(br#"><is><t xml:space="preserve">"#);
    } else {
        buf.extend_from_slice(b"><is><t>");
    }
    write_escaped(buf, text);
    buf.extend_from_slice(b"</t></is></c>");
}
