use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::fmt::Write as FmtWrite;

// Static initialization: automaton is built only once, thread-safe
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

const ENTITIES: [&str; 5] = ["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"];

#[inline]
fn has_markup(bytes: &[u8]) -> bool {
    memchr::memchr3(b'&', b'<', b'>', bytes).is_some()
        || memchr::memchr2(b'"', b'\'', bytes).is_some()
}

#[inline]
fn is_forbidden_control(c: char) -> bool {
    (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r')
}

/// Escape XML special characters.
///
/// Control characters that XML 1.0 cannot carry are written with the
/// SpreadsheetML `_xHHHH_` notation; text that already looks like that
/// notation has its underscore encoded so readers decode it back verbatim.
/// Input without anything to escape is returned borrowed.
///
/// # Examples
///
/// ```
/// use sheetstream::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<tag>\"hello\"</tag>"), "&lt;tag&gt;&quot;hello&quot;&lt;/tag&gt;");
/// assert_eq!(escape_xml("bell\u{7}"), "bell_x0007_");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let encode = s.chars().any(is_forbidden_control) || has_encoded_literal(bytes);
    if !encode && !has_markup(bytes) {
        return Cow::Borrowed(s);
    }

    let text = if encode {
        Cow::Owned(encode_special(s))
    } else {
        Cow::Borrowed(s)
    };
    if !has_markup(text.as_bytes()) {
        return text;
    }
    Cow::Owned(XML_ESCAPER.replace_all(&text, &ENTITIES))
}

/// Whether `bytes[i..]` starts with text a reader would decode as `_xHHHH_`.
#[inline]
fn is_encoded_literal(bytes: &[u8], i: usize) -> bool {
    bytes.len() >= i + 7
        && bytes[i] == b'_'
        && bytes[i + 1] == b'x'
        && bytes[i + 2..i + 6].iter().all(u8::is_ascii_hexdigit)
        && bytes[i + 6] == b'_'
}

fn has_encoded_literal(bytes: &[u8]) -> bool {
    memchr::memchr_iter(b'_', bytes).any(|i| is_encoded_literal(bytes, i))
}

/// Encode control characters, and the underscore of literal `_xHHHH_` text
/// as `_x005F_`.
fn encode_special(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len() + 8);
    for (i, c) in s.char_indices() {
        if is_forbidden_control(c) {
            // Writing into a String cannot fail
            let _ = write!(out, "_x{:04X}_", c as u32);
        } else if c == '_' && is_encoded_literal(bytes, i) {
            out.push_str("_x005F_");
        } else {
            out.push(c);
        }
    }
    out
}

/// Append the escaped form of `s` to a byte buffer.
#[inline]
pub fn write_escaped(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(escape_xml(s).as_bytes());
}

/// Whether a text node needs `xml:space="preserve"` to keep its whitespace.
#[inline]
pub fn needs_space_preserve(s: &str) -> bool {
    s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace)
}
