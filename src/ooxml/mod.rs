//! Office Open XML (OOXML) format implementation.
//!
//! Only the SpreadsheetML worksheet writer lives here; packaging the parts
//! into a zip container is left to the caller.

pub mod xlsx;
