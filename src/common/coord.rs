//! Cell coordinate encoding.
//!
//! Rows and columns are zero-based everywhere in the public API; the A1
//! notation written to the package is one-based for rows and uses the
//! bijective base-26 letter scheme for columns (`A`..`Z`, `AA`..`ZZ`, `AAA`..).

use crate::common::error::{Error, Result};

/// Number of columns a worksheet can hold (`A` through `XFD`).
pub const MAX_COLUMNS: u32 = 16_384;

/// Convert a zero-based column index to its column letters.
///
/// # Examples
///
/// ```
/// use sheetwright::common::column_letters;
/// assert_eq!(column_letters(0), "A");
/// assert_eq!(column_letters(27), "AB");
/// ```
pub fn column_letters(col: u32) -> String {
    // u32::MAX needs 7 letters
    let mut buf = [0u8; 7];
    let mut pos = buf.len();
    let mut n = u64::from(col) + 1;

    while n > 0 {
        n -= 1;
        pos -= 1;
        buf[pos] = b'A' + (n % 26) as u8;
        n /= 26;
    }

    buf[pos..].iter().map(|&b| b as char).collect()
}

/// Build the A1-style reference for a zero-based `(row, col)` pair.
///
/// # Examples
///
/// ```
/// use sheetwright::common::cell_reference;
/// assert_eq!(cell_reference(2, 0), "A3");
/// assert_eq!(cell_reference(2, 702), "AAA3");
/// ```
pub fn cell_reference(row: u32, col: u32) -> String {
    let mut reference = column_letters(col);
    reference.push_str(itoa::Buffer::new().format(u64::from(row) + 1));
    reference
}

/// Reject zero-based column indices past the last worksheet column.
pub(crate) fn check_column(col: u32) -> Result<()> {
    if col >= MAX_COLUMNS {
        return Err(Error::invalid_argument(format!(
            "column {} ({}) is past the last column XFD",
            col,
            column_letters(col)
        )));
    }
    Ok(())
}
