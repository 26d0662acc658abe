//! Cell values accepted by the streaming writer.
//!
//! The variant is decided once when a row is built; the writer then matches
//! on the tag without inspecting the value any further.

use rust_decimal::Decimal;

/// One row of cells in column order.
pub type Row = Vec<CellValue>;

/// Types of data that can be written to a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Styled empty cell
    Blank,
    /// Boolean value, written as `1`/`0`
    Bool(bool),
    /// 32-bit signed integer
    Integer(i32),
    /// 64-bit signed integer
    Long(i64),
    /// 64-bit floating point number
    Double(f64),
    /// Arbitrary precision decimal, written with its exact digits
    Decimal(Decimal),
    /// Date/time already converted to a serial day number
    DateSerial(f64),
    /// String content
    String(StringCell),
}

/// String cell content.
///
/// `Text` and `Char` are routed through the shared strings table when the
/// column allows it; `Shared` and `Inline` are written as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringCell {
    /// Text the writer may share or inline
    Text(String),
    /// Single character the writer may share or inline
    Char(char),
    /// Index into the document's shared strings table
    Shared(u32),
    /// Text always written inline
    Inline(String),
}

impl CellValue {
    /// Shorthand for a shareable text cell.
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::String(StringCell::Text(value.into()))
    }

    /// Shorthand for a text cell that is never shared.
    pub fn inline(value: impl Into<String>) -> Self {
        CellValue::String(StringCell::Inline(value.into()))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Blank)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Integer(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Long(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Double(value)
    }
}

impl From<Decimal> for CellValue {
    fn from(value: Decimal) -> Self {
        CellValue::Decimal(value)
    }
}

impl From<char> for CellValue {
    fn from(value: char) -> Self {
        CellValue::String(StringCell::Char(value))
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::text(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(StringCell::Text(value))
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Blank, Into::into)
    }
}

impl From<chrono::NaiveDate> for CellValue {
    fn from(value: chrono::NaiveDate) -> Self {
        CellValue::DateSerial(crate::common::date::date_to_serial(value))
    }
}

impl From<chrono::NaiveDateTime> for CellValue {
    fn from(value: chrono::NaiveDateTime) -> Self {
        CellValue::DateSerial(crate::common::date::datetime_to_serial(value))
    }
}
