//! Document-level orchestration of streamed worksheets.
//!
//! A [`StreamingWorkbook`] owns the registries every sheet of one document
//! shares, lays the sheet parts out under `xl/worksheets/`, and writes the
//! style and shared-string manifests once all sheets are done. Packaging the
//! directory into a zip container is left to the caller.

use super::column::Column;
use super::options::WriterOptions;
use super::sheet::{SealedPart, StreamingWorksheetWriter};
use super::source::RowSource;
use super::strings::SharedStringTable;
use super::styles::StyleRegistry;
use crate::common::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// One logical sheet to be written.
#[derive(Debug, Clone)]
pub struct SheetSpec {
    /// Display name of the first part
    pub name: String,
    pub columns: Vec<Column>,
    /// Relationship id of a background picture referenced from every part
    pub watermark_rel_id: Option<String>,
}

impl SheetSpec {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
            watermark_rel_id: None,
        }
    }

    pub fn with_watermark(mut self, rel_id: impl Into<String>) -> Self {
        self.watermark_rel_id = Some(rel_id.into());
        self
    }
}

/// A written worksheet part as listed in the manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct PartEntry {
    /// Logical sheet the part belongs to
    pub sheet_name: String,
    /// `Name` for the first part, `Name (2)`, `Name (3)`, ... for continuations
    pub display_name: String,
    pub path: PathBuf,
    pub rows: u32,
    pub dimension: String,
}

/// Everything a packager needs to assemble the document.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookManifest {
    pub parts: Vec<PartEntry>,
    pub styles_path: PathBuf,
    pub shared_strings_path: PathBuf,
    pub unique_strings: usize,
    pub string_references: u64,
    pub cell_formats: usize,
}

/// Writes the sheets of one document under a root directory.
#[derive(Debug)]
pub struct StreamingWorkbook {
    root: PathBuf,
    options: WriterOptions,
    styles: StyleRegistry,
    strings: SharedStringTable,
    parts: Vec<PartEntry>,
}

impl StreamingWorkbook {
    /// Prepare `root/xl/worksheets` for a new document.
    pub fn create(root: impl Into<PathBuf>, options: WriterOptions) -> Result<Self> {
        options.validate()?;
        let root = root.into();
        fs::create_dir_all(root.join("xl").join("worksheets"))?;
        log::info!("streaming workbook into {}", root.display());

        Ok(Self {
            strings: SharedStringTable::with_capacity(options.shared_string_capacity),
            styles: StyleRegistry::new(),
            root,
            options,
            parts: Vec::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    pub fn shared_strings(&self) -> &SharedStringTable {
        &self.strings
    }

    /// Parts written so far, across all sheets.
    pub fn parts(&self) -> &[PartEntry] {
        &self.parts
    }

    /// Stream one logical sheet, returning the entries of its parts.
    ///
    /// A configuration error aborts this sheet only; sheets already written
    /// stay in the manifest.
    pub fn write_sheet<S>(&mut self, sheet: &SheetSpec, source: &mut S) -> Result<&[PartEntry]>
    where
        S: RowSource + ?Sized,
    {
        let mut writer =
            StreamingWorksheetWriter::new(&self.styles, &self.strings, &self.options, &sheet.columns)?;
        if let Some(rel_id) = &sheet.watermark_rel_id {
            writer = writer.with_watermark(rel_id.clone());
        }

        let first = self.parts.len();
        let dir = self.root.join("xl").join("worksheets");
        let sealed = writer.write(source, |i| {
            dir.join(format!("sheet{}.xml", first + i as usize + 1))
        })?;

        log::info!("sheet '{}' written as {} part(s)", sheet.name, sealed.len());
        self.parts
            .extend(sealed.iter().map(|part| part_entry(&sheet.name, part)));
        Ok(&self.parts[first..])
    }

    /// Write the style and shared-string manifests.
    pub fn finish(self) -> Result<WorkbookManifest> {
        let xl = self.root.join("xl");
        let styles_path = xl.join("styles.xml");
        let shared_strings_path = xl.join("sharedStrings.xml");

        fs::write(&styles_path, self.styles.to_xml()?)?;
        fs::write(&shared_strings_path, self.strings.to_xml()?)?;
        log::info!(
            "workbook finished: {} part(s), {} unique strings, {} cell formats",
            self.parts.len(),
            self.strings.unique_count(),
            self.styles.xf_count()
        );

        Ok(WorkbookManifest {
            unique_strings: self.strings.unique_count(),
            string_references: self.strings.count(),
            cell_formats: self.styles.xf_count(),
            parts: self.parts,
            styles_path,
            shared_strings_path,
        })
    }
}

fn part_entry(sheet_name: &str, part: &SealedPart) -> PartEntry {
    PartEntry {
        sheet_name: sheet_name.to_string(),
        display_name: display_name(sheet_name, part.index),
        path: part.path.clone(),
        rows: part.rows,
        dimension: part.dimension.clone(),
    }
}

/// Name shown for the part at a zero-based index of a logical sheet.
pub fn display_name(sheet_name: &str, index: u32) -> String {
    if index == 0 {
        sheet_name.to_string()
    } else {
        format!("{} ({})", sheet_name, index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::Error;
    use crate::ooxml::xlsx::writer::cell::{CellValue, Row};
    use crate::ooxml::xlsx::writer::source::IterSource;
    use tempfile::tempdir;

    fn rows(n: i32) -> impl Iterator<Item = Row> {
        (0..n).map(|i| vec![CellValue::Integer(i), CellValue::text("label")])
    }

    #[test]
    fn test_display_names() {
        assert_eq!(display_name("Orders", 0), "Orders");
        assert_eq!(display_name("Orders", 1), "Orders (2)");
        assert_eq!(display_name("Orders", 9), "Orders (10)");
    }

    #[test]
    fn test_workbook_layout() {
        let dir = tempdir().unwrap();
        let options = WriterOptions::new().with_max_rows_per_part(4);
        let mut workbook = StreamingWorkbook::create(dir.path(), options).unwrap();
        let columns = vec![Column::new("id"), Column::new("label")];

        let orders = workbook
            .write_sheet(&SheetSpec::new("Orders", columns.clone()), &mut IterSource::new(rows(7)))
            .unwrap()
            .to_vec();
        let names: Vec<_> = orders.iter().map(|p| p.display_name.as_str()).collect();
        assert_eq!(names, ["Orders", "Orders (2)", "Orders (3)"]);
        assert_eq!(orders[2].rows, 2);

        let lines = workbook
            .write_sheet(&SheetSpec::new("Lines", columns), &mut IterSource::new(rows(1)))
            .unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].path.ends_with("xl/worksheets/sheet4.xml"));

        let manifest = workbook.finish().unwrap();
        assert_eq!(manifest.parts.len(), 4);
        // "id", "label" headers and the "label" values
        assert_eq!(manifest.unique_strings, 2);
        assert_eq!(manifest.string_references, 4 * 2 + 8);

        let styles = fs::read_to_string(&manifest.styles_path).unwrap();
        assert!(styles.contains("<b/>"));
        let sst = fs::read_to_string(&manifest.shared_strings_path).unwrap();
        assert!(sst.contains(r#"count="16" uniqueCount="2""#));
    }

    #[test]
    fn test_failed_sheet_keeps_previous_parts() {
        let dir = tempdir().unwrap();
        let options = WriterOptions::new().with_max_columns(1);
        let mut workbook = StreamingWorkbook::create(dir.path(), options).unwrap();

        let ok = SheetSpec::new("One", vec![Column::new("a")]);
        workbook
            .write_sheet(&ok, &mut IterSource::new(std::iter::empty::<Row>()))
            .unwrap();

        let wide = SheetSpec::new("Wide", vec![Column::new("a"), Column::new("b")]);
        let err = workbook
            .write_sheet(&wide, &mut IterSource::new(std::iter::empty::<Row>()))
            .unwrap_err();
        assert!(matches!(err, Error::ColumnLimitExceeded { .. }));
        assert_eq!(workbook.parts().len(), 1);
        assert!(!dir.path().join("xl/worksheets/sheet2.xml").exists());
    }

    #[test]
    fn test_invalid_options_rejected_up_front() {
        let dir = tempdir().unwrap();
        let options = WriterOptions::new().with_max_rows_per_part(1);
        assert!(matches!(
            StreamingWorkbook::create(dir.path().join("out"), options),
            Err(Error::InvalidOptions(_))
        ));
        assert!(!dir.path().join("out").exists());
    }
}
