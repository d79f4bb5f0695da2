//! Sheetwright - A Rust library for writing Microsoft Excel (.xlsx) workbooks
//!
//! This library produces Office Open XML spreadsheet packages with shared,
//! deduplicated cell styles and two ways of writing them.
//!
//! # Features
//!
//! - **Buffered writing**: Build sheets cell by cell in any order, then write
//!   the package as many times as needed
//! - **Streaming writing**: Write sheets row by row from an iterator, keeping
//!   at most one row in memory
//! - **Styles**: Fonts, fills, borders, alignment, rotation and number formats
//!   with fluent builders
//! - **Dates**: Calendar values from `chrono` stored as serial dates
//! - **Exact numbers**: `Decimal` values written digit for digit
//! - **Column fitting**: Estimate column widths from cell text
//!
//! # Example - Buffered workbook
//!
//! ```no_run
//! use sheetwright::{Color, Workbook};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut workbook = Workbook::new();
//! let header = workbook
//!     .define_style()
//!     .bg_color(Color::Silver)
//!     .font()
//!     .bold(true)
//!     .build();
//! let money = workbook.define_style().number_format("#,##0.00").build();
//!
//! let sheet = workbook.sheet("Sales");
//! sheet.set_value_at(0, 0, "Region").with_style(header);
//! sheet.set_value_at(0, 1, "Revenue").with_style(header);
//! sheet.set_value_at(1, 0, "North");
//! sheet.set_value_at(1, 1, 10_500.25).with_style(money);
//! sheet.set_formula_at(2, 1, "SUM(B2:B2)");
//!
//! workbook.auto_resize_all_columns("Sales")?;
//! workbook.save("sales.xlsx")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Streaming workbook
//!
//! ```no_run
//! use sheetwright::{Row, StreamingWorkbook};
//! use std::fs::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut workbook = StreamingWorkbook::new(File::create("numbers.xlsx")?);
//! let bold = workbook.define_style()?.font().bold(true).build();
//!
//! let header = Row::new().with_styled_value("n", bold).with_styled_value("n²", bold);
//! let rows = (1..=100_000).map(|n: i64| Row::new().with_value(n).with_value(n * n));
//! workbook.with_sheet("Squares", std::iter::once(header).chain(rows))?;
//!
//! workbook.close()?;
//! # Ok(())
//! # }
//! ```

/// Format-independent helpers
///
/// Cell coordinates, serial dates, sheet names, XML escaping and the
/// crate-wide error type.
pub mod common;

/// OOXML (Office Open XML) spreadsheet writer
pub mod ooxml;

// Re-export commonly used types for convenience
pub use common::{
    Error, ExcelDate, Result, cell_reference, column_letters, excel_compatible_sheet_name,
    excel_serial_date,
};
pub use ooxml::xlsx::{
    ArgbColor, BorderBuilder, BorderEdge, Cell, CellMut, CellValue, Color, Compression,
    DefaultWidthEstimator, DiagonalDirection, FontBuilder, FontUnderline, HorizontalAlignment,
    LineStyle, NumberFormat, Pattern, ReadingOrder, Row, Sheet, SheetOptions, StreamingWorkbook,
    Style, StyleBuilder, StyleId, StyleRegistry, VerticalAlignment, WidthEstimator, Workbook,
    WriteOptions,
};
pub use rust_decimal::Decimal;
