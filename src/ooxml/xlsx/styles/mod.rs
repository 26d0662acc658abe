//! Built-in number formats and format-code classification.
//!
//! The component types themselves (fonts, fills, borders, alignment) live in
//! [`format`](super::format); interning happens in the
//! [`StyleRegistry`](super::writer::StyleRegistry).

pub mod number_format;

pub use number_format::{
    BUILTIN_DATE_FORMAT_ID, FIRST_CUSTOM_FORMAT_ID, MAX_FORMAT_ID,
    builtin_format_code, builtin_format_id, is_date_format,
};
