//! Shared strings table for streamed workbooks.
//!
//! Readers render a shared string once and reference it by index from any
//! number of cells, so repeated labels shrink the output dramatically. The
//! table is bounded: once it holds `capacity` unique entries, unseen strings
//! are rejected and the caller writes them inline instead.

use crate::common::error::Result;
use crate::common::xml::{escape_xml, needs_space_preserve};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::Write as FmtWrite;

/// Unique-entry bound used when no capacity is configured.
pub const DEFAULT_SHARED_STRING_CAPACITY: usize = 8192;

#[derive(Debug, Default)]
struct TableState {
    /// Unique strings in insertion order
    strings: Vec<Box<str>>,
    /// Map from string to index for fast lookup
    index: HashMap<Box<str>, u32>,
    /// Accepted pushes, duplicates included
    references: u64,
}

/// Bounded, document-wide shared strings table.
///
/// Mutation is serialized internally so concurrent sheet writers may share
/// one table by reference.
#[derive(Debug)]
pub struct SharedStringTable {
    state: Mutex<TableState>,
    capacity: usize,
}

impl SharedStringTable {
    /// Create a table with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SHARED_STRING_CAPACITY)
    }

    /// Create a table holding at most `capacity` unique strings.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(TableState::default()),
            capacity,
        }
    }

    /// Add a string and return its index.
    ///
    /// Returns the existing index for a string seen before. Returns `None`
    /// when the string is new and the table is full; such values must be
    /// written inline.
    pub fn push(&self, value: &str) -> Option<u32> {
        let mut state = self.state.lock();
        if let Some(&index) = state.index.get(value) {
            state.references += 1;
            return Some(index);
        }
        if state.strings.len() >= self.capacity {
            return None;
        }

        let index = state.strings.len() as u32;
        let owned: Box<str> = value.into();
        state.strings.push(owned.clone());
        state.index.insert(owned, index);
        state.references += 1;
        Some(index)
    }

    /// Add a single-character string.
    ///
    /// The lookup encodes into a stack buffer, so only the first occurrence of
    /// a character allocates.
    pub fn push_char(&self, c: char) -> Option<u32> {
        let mut buf = [0u8; 4];
        self.push(c.encode_utf8(&mut buf))
    }

    /// Index of a previously accepted string.
    pub fn find(&self, value: &str) -> Option<u32> {
        self.state.lock().index.get(value).copied()
    }

    /// The string stored at an index.
    pub fn get(&self, index: u32) -> Option<String> {
        self.state
            .lock()
            .strings
            .get(index as usize)
            .map(|s| s.to_string())
    }

    /// Number of unique strings (`uniqueCount`).
    pub fn unique_count(&self) -> usize {
        self.state.lock().strings.len()
    }

    /// Number of accepted references, duplicates included (`count`).
    pub fn count(&self) -> u64 {
        self.state.lock().references
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.state.lock().strings.len() >= self.capacity
    }

    /// Serialize the shared strings table to XML.
    pub fn to_xml(&self) -> Result<String> {
        let state = self.state.lock();
        let mut xml = String::with_capacity(4096 + state.strings.len() * 16);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        write!(
            xml,
            r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{}" uniqueCount="{}">"#,
            state.references,
            state.strings.len()
        )?;

        for s in &state.strings {
            if needs_space_preserve(s) {
                write!(xml, r#"<si><t xml:space="preserve">{}</t></si>"#, escape_xml(s))?;
            } else {
                write!(xml, "<si><t>{}</t></si>", escape_xml(s))?;
            }
        }

        xml.push_str("</sst>");
        Ok(xml)
    }
}

impl Default for SharedStringTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_shared_strings() {
        let ss = SharedStringTable::new();
        let idx1 = ss.push("Hello");
        let idx2 = ss.push("World");
        let idx3 = ss.push("Hello"); // Duplicate

        assert_eq!(idx1, Some(0));
        assert_eq!(idx2, Some(1));
        assert_eq!(idx3, Some(0));
        assert_eq!(ss.unique_count(), 2);
        assert_eq!(ss.count(), 3);
    }

    #[test]
    fn test_capacity_rejects_new_strings_only() {
        let ss = SharedStringTable::with_capacity(2);
        assert_eq!(ss.push("a"), Some(0));
        assert_eq!(ss.push("b"), Some(1));
        assert!(ss.is_full());

        assert_eq!(ss.push("c"), None);
        assert_eq!(ss.find("c"), None);
        assert_eq!(ss.push("a"), Some(0));
        assert_eq!(ss.find("b"), Some(1));
        // Rejected pushes are not references
        assert_eq!(ss.count(), 3);
        assert_eq!(ss.unique_count(), 2);
    }

    #[test]
    fn test_char_fast_path_shares_with_strings() {
        let ss = SharedStringTable::new();
        assert_eq!(ss.push_char('x'), Some(0));
        assert_eq!(ss.push("x"), Some(0));
        assert_eq!(ss.push_char('é'), Some(1));
        assert_eq!(ss.get(1).as_deref(), Some("é"));
    }

    #[test]
    fn test_generate_xml() {
        let ss = SharedStringTable::new();
        ss.push("R&D");
        ss.push(" padded ");
        ss.push("R&D");

        let xml = ss.to_xml().unwrap();
        assert!(xml.contains(r#"count="3" uniqueCount="2""#));
        assert!(xml.contains("<si><t>R&amp;D</t></si>"));
        assert!(xml.contains(r#"<si><t xml:space="preserve"> padded </t></si>"#));
    }

    proptest! {
        #[test]
        fn prop_indices_are_stable_and_dense(values in proptest::collection::vec("[a-z]{0,4}", 1..64)) {
            let ss = SharedStringTable::new();
            let first: Vec<u32> = values.iter().map(|v| ss.push(v).unwrap()).collect();
            let second: Vec<u32> = values.iter().map(|v| ss.push(v).unwrap()).collect();
            prop_assert_eq!(&first, &second);

            for (value, index) in values.iter().zip(&first) {
                prop_assert_eq!(ss.find(value), Some(*index));
                prop_assert!((*index as usize) < ss.unique_count());
            }
            prop_assert_eq!(ss.count(), 2 * values.len() as u64);
        }

        #[test]
        fn prop_exhausted_table_keeps_accepted_strings(capacity in 1usize..16, extra in 1usize..16) {
            let ss = SharedStringTable::with_capacity(capacity);
            for i in 0..capacity {
                prop_assert_eq!(ss.push(&format!("s{}", i)), Some(i as u32));
            }
            for i in 0..extra {
                prop_assert_eq!(ss.push(&format!("new{}", i)), None);
                prop_assert_eq!(ss.find(&format!("new{}", i)), None);
            }
            for i in 0..capacity {
                prop_assert_eq!(ss.find(&format!("s{}", i)), Some(i as u32));
            }
        }
    }
}
