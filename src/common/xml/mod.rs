//! XML text helpers shared by the part writers.

mod escape;

pub use escape::{escape_xml, needs_space_preserve, write_escaped};
