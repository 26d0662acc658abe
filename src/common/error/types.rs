//! Unified error types for the streaming writer.
//!
//! Errors fall into two families: configuration errors, detected before or at
//! the start of a write and aborting only the affected worksheet, and I/O
//! errors, which propagate to the caller untouched.
use thiserror::Error;

/// Main error type for sheetstream operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error while writing a part or performing the width rewrite
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// More columns were declared than a single sheet can hold
    #[error("Column limit exceeded: {columns} columns declared, at most {limit} allowed")]
    ColumnLimitExceeded { columns: usize, limit: usize },

    /// A row carried more cells than the sheet declares columns
    #[error("Row {row} has {cells} cells but the sheet declares {columns} columns")]
    RowTooWide { row: u32, cells: usize, columns: usize },

    /// Invalid style parameters (unnamed font, non-positive size, ...)
    #[error("Invalid style: {0}")]
    InvalidStyle(String),

    /// Invalid column descriptor (e.g. non-positive fixed width)
    #[error("Invalid column: {0}")]
    InvalidColumn(String),

    /// Writer options outside the format limits
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// A style component table outgrew its bit-field in the packed style key
    #[error("Too many {component} definitions: at most {limit} are supported")]
    StyleCapacity { component: &'static str, limit: usize },

    /// The writer was driven out of order
    #[error("Invalid writer state: {0}")]
    InvalidState(String),

    /// XML formatting error
    #[error("XML error: {0}")]
    XmlError(String),
}

impl Error {
    /// Whether this error stems from caller configuration rather than I/O.
    ///
    /// Configuration errors are raised before any bytes of the affected
    /// worksheet are committed (or, for [`Error::RowTooWide`], abort only the
    /// current part).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::ColumnLimitExceeded { .. }
                | Error::RowTooWide { .. }
                | Error::InvalidStyle(_)
                | Error::InvalidColumn(_)
                | Error::InvalidOptions(_)
                | Error::StyleCapacity { .. }
        )
    }
}

/// Result type for sheetstream operations.
pub type Result<T> = std::result::Result<T, Error>;
