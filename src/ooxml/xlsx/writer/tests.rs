//! Cross-component tests for the streaming writer.

use super::*;
use crate::common::error::{Error, Result};
use crate::ooxml::xlsx::format::CellStyle;
use proptest::prelude::*;
use std::fs;
use std::path::Path;
use std::thread;
use tempfile::tempdir;

/// Values of column A of every data row, in part order.
fn column_a_values(parts: &[SealedPart], skip_header: bool) -> Vec<i64> {
    let mut values = Vec::new();
    for part in parts {
        let xml = fs::read_to_string(&part.path).unwrap();
        for (i, row) in xml.split("<row ").skip(1).enumerate() {
            if skip_header && i == 0 {
                continue;
            }
            let start = row.find("<v>").unwrap() + 3;
            let end = row[start..].find("</v>").unwrap() + start;
            values.push(row[start..end].parse().unwrap());
        }
    }
    values
}

fn write_sheet(
    styles: &StyleRegistry,
    strings: &SharedStringTable,
    options: &WriterOptions,
    columns: &[Column],
    rows: Vec<Row>,
    dir: &Path,
    prefix: &str,
) -> Result<Vec<SealedPart>> {
    let mut writer = StreamingWorksheetWriter::new(styles, strings, options, columns)?;
    let mut source = IterSource::with_batch_size(rows.into_iter(), 7);
    writer.write(&mut source, |i| dir.join(format!("{}{}.xml", prefix, i + 1)))
}

#[test]
fn test_pagination_splits_at_row_limit() {
    let dir = tempdir().unwrap();
    let styles = StyleRegistry::new();
    let strings = SharedStringTable::new();
    let options = WriterOptions::new().with_max_rows_per_part(10);
    let rows: Vec<Row> = (0..25).map(|i| vec![CellValue::Long(i)]).collect();

    let parts = write_sheet(&styles, &strings, &options, &[Column::new("n")], rows, dir.path(), "s")
        .unwrap();

    // 9 data rows per part after the header
    assert_eq!(parts.len(), 3);
    assert_eq!(
        parts.iter().map(|p| p.data_rows).collect::<Vec<_>>(),
        vec![9, 9, 7]
    );
    assert!(parts.iter().all(|p| p.rows <= 10));
    assert_eq!(parts[1].dimension, "A1:A10");
    assert_eq!(parts[2].dimension, "A1:A8");
    assert_eq!(column_a_values(&parts, true), (0..25).collect::<Vec<_>>());

    // Continuations restart numbering and repeat the header
    let second = fs::read_to_string(&parts[1].path).unwrap();
    assert!(second.contains(r#"<row r="1" spans="1:1"><c r="A1" t="s""#));
    assert!(second.contains(r#"<c r="A2"><v>9</v></c>"#));
}

#[test]
fn test_exact_multiple_leaves_no_empty_part() {
    let dir = tempdir().unwrap();
    let styles = StyleRegistry::new();
    let strings = SharedStringTable::new();
    let options = WriterOptions::new().with_max_rows_per_part(5).with_header(false);
    let rows: Vec<Row> = (0..10).map(|i| vec![CellValue::Long(i)]).collect();

    let parts = write_sheet(&styles, &strings, &options, &[Column::new("n")], rows, dir.path(), "s")
        .unwrap();
    assert_eq!(parts.len(), 2);
    assert_eq!(column_a_values(&parts, false), (0..10).collect::<Vec<_>>());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn test_auto_width_applies_to_every_part() {
    let dir = tempdir().unwrap();
    let styles = StyleRegistry::new();
    let strings = SharedStringTable::new();
    let options = WriterOptions::new()
        .with_max_rows_per_part(3)
        .with_header(false)
        .with_auto_width(true)
        .with_width_padding(1.5);
    let columns = vec![Column::new("text"), Column::new("fixed").with_width(12.0)];
    let rows = ["a", "bb", "ccc", "dddddd"]
        .iter()
        .map(|s| vec![CellValue::text(*s), CellValue::Double(3.25)])
        .collect();

    let parts = write_sheet(&styles, &strings, &options, &columns, rows, dir.path(), "w").unwrap();
    assert_eq!(parts.len(), 2);

    let first = fs::read_to_string(&parts[0].path).unwrap();
    assert!(first.contains(r#"<col min="1" max="1" width="4.5" customWidth="1"/>"#));
    assert!(first.contains(r#"<col min="2" max="2" width="12" customWidth="1"/>"#));
    assert!(first.contains(r#"<dimension ref="A1:B3"/>"#));

    let second = fs::read_to_string(&parts[1].path).unwrap();
    assert!(second.contains(r#"<col min="1" max="1" width="7.5" customWidth="1"/>"#));
    assert!(second.contains(r#"<dimension ref="A1:B1"/>"#));
}

#[test]
fn test_column_limit_creates_no_file() {
    let dir = tempdir().unwrap();
    let styles = StyleRegistry::new();
    let strings = SharedStringTable::new();
    let options = WriterOptions::new();
    let columns: Vec<Column> = (0..MAX_COLUMNS_PER_SHEET + 1)
        .map(|i| Column::new(column_to_letters(i + 1)))
        .collect();

    let err = write_sheet(&styles, &strings, &options, &columns, Vec::new(), dir.path(), "s")
        .unwrap_err();
    assert!(matches!(err, Error::ColumnLimitExceeded { limit: 16_384, .. }));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_capacity_exhaustion_degrades_to_inline() {
    let dir = tempdir().unwrap();
    let styles = StyleRegistry::new();
    let strings = SharedStringTable::with_capacity(3);
    let options = WriterOptions::new().with_header(false);
    let rows = ["x", "y", "z", "w", "x"]
        .iter()
        .map(|s| vec![CellValue::text(*s)])
        .collect();

    let parts = write_sheet(&styles, &strings, &options, &[Column::new("v")], rows, dir.path(), "s")
        .unwrap();
    let xml = fs::read_to_string(&parts[0].path).unwrap();

    assert!(xml.contains(r#"<c r="A3" t="s"><v>2</v></c>"#));
    assert!(xml.contains(r#"<c r="A4" t="inlineStr"><is><t>w</t></is></c>"#));
    assert!(xml.contains(r#"<c r="A5" t="s"><v>0</v></c>"#));
    assert_eq!(strings.unique_count(), 3);
    assert_eq!(strings.count(), 4);
}

#[test]
fn test_watermark_inherited_by_continuations() {
    let dir = tempdir().unwrap();
    let styles = StyleRegistry::new();
    let strings = SharedStringTable::new();
    let options = WriterOptions::new().with_max_rows_per_part(2);
    let columns = vec![Column::new("n")];
    let mut writer = StreamingWorksheetWriter::new(&styles, &strings, &options, &columns)
        .unwrap()
        .with_watermark("rId7");
    let mut source = IterSource::new((0..3).map(|i| vec![CellValue::Integer(i)]));

    let parts = writer
        .write(&mut source, |i| dir.path().join(format!("p{}.xml", i)))
        .unwrap();
    assert_eq!(parts.len(), 3);
    for part in &parts {
        let xml = fs::read_to_string(&part.path).unwrap();
        assert!(xml.ends_with(r#"<picture r:id="rId7"/></worksheet>"#));
    }
}

#[test]
fn test_source_error_propagates() {
    let dir = tempdir().unwrap();
    let styles = StyleRegistry::new();
    let strings = SharedStringTable::new();
    let options = WriterOptions::new();
    let columns = vec![Column::new("n")];
    let mut writer = StreamingWorksheetWriter::new(&styles, &strings, &options, &columns).unwrap();

    let mut calls = 0;
    let mut source = || -> Result<Option<Vec<Row>>> {
        calls += 1;
        if calls == 1 {
            Ok(Some(vec![vec![CellValue::Integer(1)]]))
        } else {
            Err(Error::Io(std::io::Error::other("source closed")))
        }
    };
    let err = writer
        .write(&mut source, |i| dir.path().join(format!("p{}.xml", i)))
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_concurrent_sheets_share_registries() {
    let dir = tempdir().unwrap();
    let styles = StyleRegistry::new();
    let strings = SharedStringTable::new();
    let options = WriterOptions::new().with_max_rows_per_part(50);
    let columns = vec![
        Column::new("label").with_style(CellStyle::new().with_number_format("@")),
        Column::new("amount").with_style(CellStyle::new().with_number_format("#,##0.000")),
    ];

    let results: Vec<Vec<SealedPart>> = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let (styles, strings, options, columns) = (&styles, &strings, &options, &columns);
                let dir = dir.path();
                s.spawn(move || {
                    let rows = (0..120)
                        .map(|i| vec![CellValue::text(format!("k{}", i % 10)), CellValue::Double(i as f64)])
                        .collect();
                    write_sheet(styles, strings, options, columns, rows, dir, &format!("t{}_", t)).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(results.iter().all(|parts| parts.len() == 3));
    // "label", "amount" and k0..k9
    assert_eq!(strings.unique_count(), 12);
    // Default, text, custom format, header bold
    assert_eq!(styles.xf_count(), 4);
    assert_eq!(styles.custom_format_count(), 1);
    assert!(styles.to_xml().unwrap().contains(r##"<numFmt numFmtId="176" formatCode="#,##0.000"/>"##));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_parts_reassemble_input(rows in 0usize..60, limit in 2u32..12, header in any::<bool>()) {
        let dir = tempdir().unwrap();
        let styles = StyleRegistry::new();
        let strings = SharedStringTable::new();
        let options = WriterOptions::new().with_max_rows_per_part(limit).with_header(header);
        let input: Vec<Row> = (0..rows as i64).map(|i| vec![CellValue::Long(i)]).collect();

        let parts = write_sheet(&styles, &strings, &options, &[Column::new("n")], input, dir.path(), "p")
            .unwrap();

        let per_part = options.data_rows_per_part() as usize;
        let expected_parts = rows.div_ceil(per_part).max(1);
        prop_assert_eq!(parts.len(), expected_parts);
        prop_assert!(parts.iter().all(|p| p.rows <= limit));
        prop_assert_eq!(column_a_values(&parts, header), (0..rows as i64).collect::<Vec<_>>());
    }
}
