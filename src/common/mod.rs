//! Common types and utilities shared by the writer components.

pub mod date;
pub mod error;
pub mod xml;

// Re-exports for convenience
pub use date::{date_to_serial, datetime_to_serial, time_to_serial};
pub use error::{Error, Result};
