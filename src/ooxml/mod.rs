//! Office Open XML (OOXML) output.
//!
//! Only the SpreadsheetML flavour is produced: see [`xlsx`].

pub mod xlsx;
