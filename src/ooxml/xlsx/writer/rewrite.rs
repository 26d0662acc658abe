//! Post-pass that injects computed column widths into a sealed part.
//!
//! Column widths are only known once every row has been seen, but `<cols>`
//! must precede `<sheetData>`. Instead of buffering the sheet, the sealed file
//! is moved aside and copied back in three byte ranges, with only the
//! placeholder region regenerated:
//!
//! 1. `[0, header_len)` copied verbatim
//! 2. the region rebuilt with the final dimension, followed by a fresh `<cols>`
//! 3. `[header_len + base_len + cols_len, end)` copied verbatim

use super::options::WriterOptions;
use super::sheet::{SealedPart, write_col};
use crate::common::error::Result;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Rewrites sealed parts with their final column widths.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnWidthRewriter {
    padding: f64,
    default_width: f64,
    max_width: f64,
}

impl ColumnWidthRewriter {
    pub fn new(options: &WriterOptions) -> Self {
        Self {
            padding: options.width_padding,
            default_width: options.default_column_width,
            max_width: options.max_column_width,
        }
    }

    /// Final width of every column of a part.
    pub fn column_widths(&self, part: &SealedPart) -> Vec<f64> {
        part.widths
            .resolve(&part.width_specs, self.padding, self.default_width, self.max_width)
    }

    /// Rebuild the placeholder region of `part` and splice in `<cols>`.
    ///
    /// On success `part.layout` describes the rewritten file, so a part can be
    /// rewritten again. The temporary copy is removed on every exit path;
    /// failing to remove it is logged and otherwise ignored.
    pub fn rewrite(&self, part: &mut SealedPart) -> Result<()> {
        let widths = self.column_widths(part);
        let tmp = temp_path(&part.path);

        fs::rename(&part.path, &tmp)?;
        let result = self.copy_with_widths(&tmp, part, &widths);

        if let Err(e) = fs::remove_file(&tmp) {
            log::warn!("failed to remove temporary file {}: {}", tmp.display(), e);
        }

        let (base_len, cols_len) = result?;
        part.layout.base_len = base_len;
        part.layout.cols_len = cols_len;
        log::debug!(
            "rewrote {} with {} column widths",
            part.path.display(),
            widths.len()
        );
        Ok(())
    }

    /// Returns the lengths of the regenerated region and of the new `<cols>`.
    fn copy_with_widths(&self, tmp: &Path, part: &SealedPart, widths: &[f64]) -> Result<(u64, u64)> {
        let layout = part.layout;
        let mut input = BufReader::new(File::open(tmp)?);
        let mut output = BufWriter::with_capacity(64 * 1024, File::create(&part.path)?);

        let copied = io::copy(&mut input.by_ref().take(layout.header_len), &mut output)?;
        if copied != layout.header_len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "{} is shorter than its recorded header ({} < {} bytes)",
                    tmp.display(),
                    copied,
                    layout.header_len
                ),
            )
            .into());
        }

        let mut region = Vec::with_capacity(layout.base_len as usize + widths.len() * 48 + 16);
        let dimension = layout.dimension_slot.map(|_| part.dimension.as_str());
        part.region.write(&mut region, dimension);
        let base_len = region.len() as u64;
        if !widths.is_empty() {
            region.extend_from_slice(b"<cols>");
            for (i, width) in widths.iter().enumerate() {
                write_col(&mut region, i as u32 + 1, *width);
            }
            region.extend_from_slice(b"</cols>");
        }
        output.write_all(&region)?;
        let cols_len = region.len() as u64 - base_len;

        input.seek(SeekFrom::Start(layout.header_len + layout.base_len + layout.cols_len))?;
        io::copy(&mut input, &mut output)?;
        output.flush()?;
        Ok((base_len, cols_len))
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
