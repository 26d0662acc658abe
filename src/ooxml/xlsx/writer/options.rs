//! Writer configuration.

use super::column::MAX_COLUMN_WIDTH;
use super::reference::MAX_COLUMN_NUMBER;
use super::strings::DEFAULT_SHARED_STRING_CAPACITY;
use crate::common::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Most rows a single worksheet part can hold.
pub const MAX_ROWS_PER_SHEET: u32 = 1_048_576;

/// Most columns a single worksheet can hold.
pub const MAX_COLUMNS_PER_SHEET: u32 = MAX_COLUMN_NUMBER;

/// Default column width in character units.
pub const DEFAULT_COLUMN_WIDTH: f64 = 8.43;

/// Options shared by every sheet of a streamed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    /// Rows per physical part, header row included
    pub max_rows_per_part: u32,
    /// Columns per sheet; exceeding it is a configuration error
    pub max_columns: u32,
    /// Unique entries the shared strings table accepts
    pub shared_string_capacity: usize,
    /// Write column names as the first row of every part
    pub write_header: bool,
    /// Freeze the header row in place while scrolling
    pub freeze_header: bool,
    /// Patch content-derived column widths in after each part is sealed
    pub auto_width: bool,
    /// Added to the widest observed content of auto-width columns
    pub width_padding: f64,
    /// Width of columns nothing was measured for
    pub default_column_width: f64,
    /// Upper bound applied to auto widths
    pub max_column_width: f64,
    /// Rows pulled per batch by iterator-backed sources
    pub row_batch_size: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            max_rows_per_part: MAX_ROWS_PER_SHEET,
            max_columns: MAX_COLUMNS_PER_SHEET,
            shared_string_capacity: DEFAULT_SHARED_STRING_CAPACITY,
            write_header: true,
            freeze_header: false,
            auto_width: false,
            width_padding: 2.0,
            default_column_width: DEFAULT_COLUMN_WIDTH,
            max_column_width: MAX_COLUMN_WIDTH,
            row_batch_size: 1024,
        }
    }
}

impl WriterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_rows_per_part(mut self, rows: u32) -> Self {
        self.max_rows_per_part = rows;
        self
    }

    pub fn with_max_columns(mut self, columns: u32) -> Self {
        self.max_columns = columns;
        self
    }

    pub fn with_shared_string_capacity(mut self, capacity: usize) -> Self {
        self.shared_string_capacity = capacity;
        self
    }

    pub fn with_header(mut self, write_header: bool) -> Self {
        self.write_header = write_header;
        self
    }

    pub fn with_frozen_header(mut self, freeze: bool) -> Self {
        self.freeze_header = freeze;
        self
    }

    pub fn with_auto_width(mut self, auto_width: bool) -> Self {
        self.auto_width = auto_width;
        self
    }

    pub fn with_width_padding(mut self, padding: f64) -> Self {
        self.width_padding = padding;
        self
    }

    pub fn with_default_column_width(mut self, width: f64) -> Self {
        self.default_column_width = width;
        self
    }

    pub fn with_row_batch_size(mut self, size: usize) -> Self {
        self.row_batch_size = size;
        self
    }

    /// Rows reserved at the top of every part.
    #[inline]
    pub fn header_rows(&self) -> u32 {
        u32::from(self.write_header)
    }

    /// Data rows that fit into one part.
    #[inline]
    pub fn data_rows_per_part(&self) -> u32 {
        self.max_rows_per_part.saturating_sub(self.header_rows())
    }

    /// Check every option against the format limits.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidOptions(msg));

        if self.max_rows_per_part == 0 || self.max_rows_per_part > MAX_ROWS_PER_SHEET {
            return invalid(format!(
                "max_rows_per_part must be in 1..={}, got {}",
                MAX_ROWS_PER_SHEET, self.max_rows_per_part
            ));
        }
        if self.data_rows_per_part() == 0 {
            return invalid("a part must hold at least one data row besides the header".to_string());
        }
        if self.max_columns == 0 || self.max_columns > MAX_COLUMNS_PER_SHEET {
            return invalid(format!(
                "max_columns must be in 1..={}, got {}",
                MAX_COLUMNS_PER_SHEET, self.max_columns
            ));
        }
        if self.row_batch_size == 0 {
            return invalid("row_batch_size must be positive".to_string());
        }
        for (name, width) in [
            ("default_column_width", self.default_column_width),
            ("max_column_width", self.max_column_width),
        ] {
            if !width.is_finite() || width <= 0.0 || width > MAX_COLUMN_WIDTH {
                return invalid(format!("{} must be in (0, {}], got {}", name, MAX_COLUMN_WIDTH, width));
            }
        }
        if !self.width_padding.is_finite() || self.width_padding < 0.0 {
            return invalid(format!("width_padding must be non-negative, got {}", self.width_padding));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = WriterOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.data_rows_per_part(), MAX_ROWS_PER_SHEET - 1);
        assert_eq!(options.shared_string_capacity, 8192);
    }

    #[test]
    fn test_limits_are_enforced() {
        assert!(WriterOptions::new().with_max_rows_per_part(0).validate().is_err());
        assert!(WriterOptions::new().with_max_rows_per_part(MAX_ROWS_PER_SHEET + 1).validate().is_err());
        assert!(WriterOptions::new().with_max_rows_per_part(1).validate().is_err());
        assert!(WriterOptions::new()
            .with_max_rows_per_part(1)
            .with_header(false)
            .validate()
            .is_ok());
        assert!(WriterOptions::new().with_max_columns(20_000).validate().is_err());
        assert!(WriterOptions::new().with_default_column_width(0.0).validate().is_err());
        assert!(WriterOptions::new().with_width_padding(-1.0).validate().is_err());
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let options: WriterOptions =
            serde_json::from_str(r#"{"max_rows_per_part": 100, "auto_width": true}"#).unwrap();
        assert_eq!(options.max_rows_per_part, 100);
        assert!(options.auto_width);
        assert!(options.write_header);
        assert_eq!(options.max_columns, MAX_COLUMNS_PER_SHEET);
    }
}
