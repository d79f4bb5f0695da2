//! Excel (.xlsx) spreadsheet writing.
//!
//! Cell values and style descriptors live in [`cell`] and [`format`]; the
//! package writers are in [`writer`].

pub mod cell;
pub mod format;
pub mod writer;

pub use cell::{Cell, CellValue};
pub use format::{
    ArgbColor, BorderDesc, BorderEdge, BorderLine, Color, DiagonalDirection, FillDesc, FontDesc,
    FontUnderline, HorizontalAlignment, LineStyle, NumberFormat, Pattern, ReadingOrder,
    VerticalAlignment,
};
pub use writer::{
    BorderBuilder, CellMut, Compression, DefaultWidthEstimator, FontBuilder, Row, Sheet,
    SheetOptions, StreamingWorkbook, Style, StyleBuilder, StyleId, StyleRegistry, StylesBuilder,
    WidthEstimator, Workbook, WriteOptions,
};
