//! Number format definitions and the built-in format table.

/// First id handed out to custom format codes.
///
/// Readers reserve 0-163 for built-ins; ids up to 175 are left free so that
/// locale-specific built-ins never collide with formats written here.
pub const FIRST_CUSTOM_FORMAT_ID: u32 = 176;

/// Largest id that still fits the number-format field of a style key.
pub const MAX_FORMAT_ID: u32 = 255;

/// Built-in short date format ("mm-dd-yy"), applied to date cells whose
/// column style carries no number format.
pub const BUILTIN_DATE_FORMAT_ID: u32 = 14;

/// Whether a format code renders its value as a date or a time of day.
///
/// Only the first section is inspected. Quoted literals, escaped characters,
/// fill and padding characters, and bracketed modifiers such as `[Red]` or
/// `[$-409]` are skipped. Elapsed-time codes (`[h]:mm`, `[ss]`) are durations
/// and do not count.
pub fn is_date_format(code: &str) -> bool {
    let mut chars = code.char_indices();
    let mut date_token = false;

    while let Some((i, c)) = chars.next() {
        match c {
            ';' => break,
            '"' => {
                for (_, q) in chars.by_ref() {
                    if q == '"' {
                        break;
                    }
                }
            },
            '\\' | '_' | '*' => {
                chars.next();
            },
            '[' => {
                let end = code[i..].find(']').map_or(code.len(), |n| i + n);
                let modifier = &code[i + 1..end];
                if !modifier.is_empty()
                    && modifier
                        .chars()
                        .all(|m| matches!(m.to_ascii_lowercase(), 'h' | 'm' | 's'))
                {
                    return false;
                }
                for _ in chars.by_ref().take_while(|&(_, b)| b != ']') {}
            },
            'a' | 'A' => {
                let rest = &code[i..];
                let is_meridiem = |marker: &str| {
                    rest.get(..marker.len())
                        .is_some_and(|s| s.eq_ignore_ascii_case(marker))
                };
                if is_meridiem("am/pm") || is_meridiem("a/p") {
                    date_token = true;
                }
            },
            'd' | 'm' | 'y' | 'h' | 's' | 'D' | 'M' | 'Y' | 'H' | 'S' => date_token = true,
            _ => {},
        }
    }
    date_token
}

const BUILTIN_IDS: [u32; 28] = [
    0, 1, 2, 3, 4, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 37, 38, 39, 40, 45, 46,
    47, 48, 49,
];

/// Get the format code for a built-in number format ID.
///
/// Returns `None` if the ID is not a recognized built-in format.
pub fn builtin_format_code(id: u32) -> Option<&'static str> {
    match id {
        0 => Some("General"),
        1 => Some("0"),
        2 => Some("0.00"),
        3 => Some("#,##0"),
        4 => Some("#,##0.00"),
        9 => Some("0%"),
        10 => Some("0.00%"),
        11 => Some("0.00E+00"),
        12 => Some("# ?/?"),
        13 => Some("# ??/??"),
        14 => Some("mm-dd-yy"),
        15 => Some("d-mmm-yy"),
        16 => Some("d-mmm"),
        17 => Some("mmm-yy"),
        18 => Some("h:mm AM/PM"),
        19 => Some("h:mm:ss AM/PM"),
        20 => Some("h:mm"),
        21 => Some("h:mm:ss"),
        22 => Some("m/d/yy h:mm"),
        37 => Some("#,##0 ;(#,##0)"),
        38 => Some("#,##0 ;[Red](#,##0)"),
        39 => Some("#,##0.00;(#,##0.00)"),
        40 => Some("#,##0.00;[Red](#,##0.00)"),
        45 => Some("mm:ss"),
        46 => Some("[h]:mm:ss"),
        47 => Some("mmss.0"),
        48 => Some("##0.0E+0"),
        49 => Some("@"),
        _ => None,
    }
}

/// Reverse lookup: the well-known id of a built-in format code.
pub fn builtin_format_id(code: &str) -> Option<u32> {
    BUILTIN_IDS
        .iter()
        .copied()
        .find(|&id| builtin_format_code(id) == Some(code))
}

/// Approximate rendered width of a format code, for width estimation.
pub(crate) fn display_width_hint(code: &str) -> usize {
    // Quotes and escapes render without their delimiters
    code.chars().filter(|c| !matches!(c, '"' | '\\' | '_')).count()
}
