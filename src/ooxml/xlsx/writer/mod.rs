//! XLSX package writing.
//!
//! Two writers share the part serializers in this module:
//!
//! - [`Workbook`] keeps every sheet in memory and writes the package in one
//!   call, as often as needed.
//! - [`StreamingWorkbook`] writes rows as they are produced and never holds
//!   more than one row.
//!
//! Both take their styles from a [`StyleRegistry`], which turns into the
//! `xl/styles.xml` table through [`StylesBuilder`].

mod cells;
pub mod package;
pub mod sheet;
pub mod streaming;
pub mod style;
pub mod styles;
pub mod width;
pub mod workbook;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export main types
pub use package::{Compression, WriteOptions};
pub use sheet::{CellMut, Sheet};
pub use streaming::{Row, SheetOptions, StreamingWorkbook};
pub use style::{BorderBuilder, FontBuilder, Style, StyleBuilder, StyleId, StyleRegistry};
pub use styles::StylesBuilder;
pub use width::{DEFAULT_COLUMN_WIDTH, DefaultWidthEstimator, WidthEstimator};
pub use workbook::Workbook;
