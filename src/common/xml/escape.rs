use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use std::borrow::Cow;

const ENTITIES: [&str; 5] = ["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"];

// Static initialization: automaton is built only once, thread-safe
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

/// Escape a string for use in text and attribute values.
///
/// Besides the five XML entities, characters that XML 1.0 cannot carry at
/// all (C0 controls other than tab, line feed and carriage return, and
/// U+FFFE/U+FFFF) are written as `_xHHHH_`. An underscore that would
/// otherwise start such a sequence is written as `_x005F_`, so readers
/// decode the original text.
///
/// # Examples
///
/// ```
/// use sheetwright::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<tag>\"hello\"</tag>"), "&lt;tag&gt;&quot;hello&quot;&lt;/tag&gt;");
/// assert_eq!(escape_xml("bell\u{7}"), "bell_x0007_");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    XML_ESCAPER.replace_all(&encode_xstring(s), &ENTITIES)
}

fn is_restricted(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
}

/// Whether `s` starts with `_xHHHH_`.
fn starts_escape_sequence(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 7
        && b[0] == b'_'
        && matches!(b[1], b'x' | b'X')
        && b[2..6].iter().all(u8::is_ascii_hexdigit)
        && b[6] == b'_'
}

fn encode_xstring(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_restricted) && !s.contains("_x") && !s.contains("_X") {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 14);
    for (i, c) in s.char_indices() {
        if is_restricted(c) {
            out.push_str(&format!("_x{:04X}_", c as u32));
        } else if c == '_' && starts_escape_sequence(&s[i..]) {
            out.push_str("_x005F_");
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}
