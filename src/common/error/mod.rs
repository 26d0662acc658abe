//! Unified error types for sheetstream.
//!
//! This module provides a single error type covering configuration, capacity
//! and I/O failures raised by the writer components.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
