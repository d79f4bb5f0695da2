//! Format-independent helpers shared by the spreadsheet writer.
//!
//! Coordinate and calendar encoding live here, together with the unified
//! error type and the XML escaping used by every part serializer.

// Submodule declarations
pub mod coord;
pub mod date;
pub mod error;
pub mod sheet_name;
pub mod xml;

// Re-exports for convenience
pub use coord::{MAX_COLUMNS, cell_reference, column_letters};
pub use date::{ExcelDate, INVALID_SERIAL_DATE, excel_serial_date};
pub use error::{Error, Result};
pub use sheet_name::{excel_compatible_sheet_name, sheet_names_clash};
