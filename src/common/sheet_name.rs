//! Worksheet name sanitizing.

/// Longest sheet name spreadsheet applications accept.
pub const MAX_SHEET_NAME_LEN: usize = 31;

const FORBIDDEN: [char; 8] = ['-', '/', '\\', '?', '*', ':', '[', ']'];

/// Rewrite `name` into a form spreadsheet applications accept as a tab name.
///
/// The name is trimmed, the reserved name `History` gets a `1` appended,
/// forbidden characters become `_`, one leading and one trailing apostrophe
/// are removed, an empty result becomes `"1"` and the result is cut to
/// [`MAX_SHEET_NAME_LEN`] characters.
///
/// Sheet names are not rewritten implicitly; pass untrusted names through
/// this function before opening a sheet with them.
///
/// # Examples
///
/// ```
/// use sheetwright::common::excel_compatible_sheet_name;
/// assert_eq!(excel_compatible_sheet_name(" Q1/Q2 "), "Q1_Q2");
/// assert_eq!(excel_compatible_sheet_name("history"), "history1");
/// ```
pub fn excel_compatible_sheet_name(name: &str) -> String {
    let mut res = name.trim().to_string();
    if res.eq_ignore_ascii_case("history") {
        res.push('1');
    }

    let mut res: String = res
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect();

    if res.starts_with('\'') {
        res.remove(0);
    }
    if res.ends_with('\'') {
        res.pop();
    }

    if res.is_empty() {
        return "1".to_string();
    }

    match res.char_indices().nth(MAX_SHEET_NAME_LEN) {
        Some((cut, _)) => res[..cut].to_string(),
        None => res,
    }
}

/// Whether two tab names clash. Spreadsheet applications compare sheet
/// names without regard to case.
pub fn sheet_names_clash(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}
