//! Column letters and A1 cell references.
//!
//! Column names use bijective base-26: the digits are A-Z and there is no
//! digit for zero, so 26 is `Z` and 27 is `AA`. A positional base-26
//! conversion would misrender every multiple of 26.

/// Largest 1-based column number a sheet can address (`XFD`).
pub const MAX_COLUMN_NUMBER: u32 = 16_384;

/// Stack buffer holding up to three column letters.
#[derive(Debug, Clone, Copy)]
pub struct ColumnLetters {
    buf: [u8; 3],
    len: u8,
}

impl ColumnLetters {
    /// Encode a 1-based column number.
    ///
    /// Numbers beyond three letters (18 278) are clamped; callers enforce the
    /// sheet column limit long before that.
    pub fn new(column: u32) -> Self {
        let n = column.clamp(1, 18_278);
        let mut buf = [0u8; 3];

        if n <= 26 {
            buf[0] = letter(n);
            return Self { buf, len: 1 };
        }

        if n <= 702 {
            let (t, w) = carry(n / 26, n % 26);
            buf[0] = letter(t);
            buf[1] = letter(w);
            return Self { buf, len: 2 };
        }

        let (rest, w) = carry(n / 26, n % 26);
        let (t, m) = carry(rest / 26, rest % 26);
        buf[0] = letter(t);
        buf[1] = letter(m);
        buf[2] = letter(w);
        Self { buf, len: 3 }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len as usize]
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        // Only ASCII A-Z is ever stored
        std::str::from_utf8(self.as_bytes()).unwrap_or("")
    }
}

/// Borrow one from the quotient when the remainder is zero.
#[inline]
fn carry(t: u32, w: u32) -> (u32, u32) {
    if w == 0 { (t - 1, 26) } else { (t, w) }
}

#[inline]
fn letter(digit: u32) -> u8 {
    b'A' + (digit - 1) as u8
}

/// Convert a 1-based column number to letters (e.g., 1 -> "A", 27 -> "AA").
pub fn column_to_letters(column: u32) -> String {
    ColumnLetters::new(column).as_str().to_string()
}

/// Convert letters back to a 1-based column number.
///
/// Returns `None` for empty input, non-letters, or more than three letters.
pub fn letters_to_column(letters: &str) -> Option<u32> {
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }
    letters.bytes().try_fold(0u32, |acc, b| {
        let b = b.to_ascii_uppercase();
        b.is_ascii_uppercase()
            .then(|| acc * 26 + u32::from(b - b'A' + 1))
    })
}

/// A1-style reference for a 1-based column and row.
pub fn cell_reference(column: u32, row: u32) -> String {
    let mut out = String::with_capacity(10);
    out.push_str(ColumnLetters::new(column).as_str());
    out.push_str(itoa::Buffer::new().format(row));
    out
}

/// Append an A1-style reference to a byte buffer.
#[inline]
pub(crate) fn write_cell_reference(out: &mut Vec<u8>, column: u32, row: u32) {
    out.extend_from_slice(ColumnLetters::new(column).as_bytes());
    out.extend_from_slice(itoa::Buffer::new().format(row).as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_boundary_columns() {
        let cases = [
            (1, "A"),
            (26, "Z"),
            (27, "AA"),
            (52, "AZ"),
            (53, "BA"),
            (676, "YZ"),
            (702, "ZZ"),
            (703, "AAA"),
            (728, "AAZ"),
            (1378, "AZZ"),
            (2054, "BZZ"),
            (18_278, "ZZZ"),
            (16_384, "XFD"),
        ];
        for (n, expected) in cases {
            assert_eq!(column_to_letters(n), expected, "column {}", n);
            assert_eq!(letters_to_column(expected), Some(n), "letters {}", expected);
        }
    }

    #[test]
    fn test_invalid_letters() {
        assert_eq!(letters_to_column(""), None);
        assert_eq!(letters_to_column("A1"), None);
        assert_eq!(letters_to_column("ABCD"), None);
        assert_eq!(letters_to_column("xfd"), Some(16_384));
    }

    #[test]
    fn test_cell_reference() {
        assert_eq!(cell_reference(1, 1), "A1");
        assert_eq!(cell_reference(28, 1_048_576), "AB1048576");

        let mut buf = Vec::new();
        write_cell_reference(&mut buf, 703, 12);
        assert_eq!(buf, b"AAA12");
    }

    proptest! {
        #[test]
        fn prop_letters_round_trip(n in 1u32..=MAX_COLUMN_NUMBER) {
            let letters = column_to_letters(n);
            prop_assert_eq!(letters_to_column(&letters), Some(n));
        }
    }
}
