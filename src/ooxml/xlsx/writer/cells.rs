//! Worksheet XML shared by the buffered and the streaming writer.
//!
//! A worksheet part is written in three steps: the header up to and
//! including the opening `<sheetData>` tag, one `<row>` element per
//! non-empty row, and the closing tags. The header fixes the column widths,
//! so they must be known before the first row.

use crate::common::Result;
use crate::common::coord::cell_reference;
use crate::common::xml::escape_xml;
use crate::ooxml::xlsx::cell::{Cell, CellValue};
use crate::ooxml::xlsx::format::ReadingOrder;
use crate::ooxml::xlsx::writer::styles::XfIndex;
use crate::ooxml::xlsx::writer::width::DEFAULT_COLUMN_WIDTH;
use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;

/// Closing tags of a worksheet part.
pub(crate) const WORKSHEET_END: &str = "</sheetData></worksheet>";

/// Sheet-level settings written before the row data.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WorksheetHeader<'a> {
    /// Whether this is the first (selected) tab
    pub first: bool,
    pub reading_order: Option<ReadingOrder>,
    pub column_widths: &'a BTreeMap<u32, f64>,
    /// Last column that gets a `<col>` entry, at most `XFD`
    pub last_column: u32,
}

impl WorksheetHeader<'_> {
    /// Write everything up to the opening `<sheetData>` tag.
    pub(crate) fn write(&self, xml: &mut String) -> Result<()> {
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
        );
        xml.push_str(
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );

        xml.push_str(r#"<sheetViews><sheetView workbookViewId="0""#);
        if self.first {
            xml.push_str(r#" tabSelected="1""#);
        }
        if self.reading_order == Some(ReadingOrder::RightToLeft) {
            xml.push_str(r#" rightToLeft="1""#);
        }
        xml.push_str("/></sheetViews>");

        self.write_cols(xml)?;

        xml.push_str("<sheetData>");
        Ok(())
    }

    fn write_cols(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<cols>");
        for col in 0..=self.last_column {
            // NOTE: Excel uses 1-based column numbering for min/max attributes
            let number = u64::from(col) + 1;
            write!(xml, r#"<col min="{}" max="{}""#, number, number)?;
            match self.column_widths.get(&col) {
                Some(width) => write!(xml, r#" width="{}" customWidth="1"/>"#, width)?,
                None => write!(xml, r#" width="{}"/>"#, DEFAULT_COLUMN_WIDTH)?,
            }
        }
        xml.push_str("</cols>");
        Ok(())
    }
}

/// Write one `<row>` element; rows without cells are skipped.
pub(crate) fn write_row<'c, I>(
    xml: &mut String,
    row: u32,
    height: Option<f64>,
    cells: I,
    xf: &XfIndex,
) -> Result<()>
where
    I: IntoIterator<Item = (u32, &'c Cell)>,
{
    let mut cells = cells.into_iter().peekable();
    if cells.peek().is_none() {
        return Ok(());
    }

    // NOTE: Excel uses 1-based row numbering
    write!(xml, r#"<row r="{}""#, u64::from(row) + 1)?;
    if let Some(height) = height {
        write!(xml, r#" ht="{}" customHeight="1""#, height)?;
    }
    xml.push('>');

    for (col, cell) in cells {
        write_cell(xml, &cell_reference(row, col), cell, xf.resolve(cell.style))?;
    }

    xml.push_str("</row>");
    Ok(())
}

fn write_cell(xml: &mut String, cell_ref: &str, cell: &Cell, style: u32) -> Result<()> {
    match cell.value {
        CellValue::String(ref s) => {
            write!(xml, r#"<c r="{}" t="inlineStr" s="{}"><is>"#, cell_ref, style)?;
            if needs_space_preserve(s) {
                xml.push_str(r#"<t xml:space="preserve">"#);
            } else {
                xml.push_str("<t>");
            }
            xml.push_str(&escape_xml(s));
            xml.push_str("</t></is></c>");
        },
        CellValue::Number(n) | CellValue::Date(n) => {
            write!(xml, r#"<c r="{}" t="n" s="{}">"#, cell_ref, style)?;
            if n.is_finite() {
                write!(xml, "<v>{}</v>", n)?;
            } else {
                log::warn!("{} holds non-finite number {}, writing it empty", cell_ref, n);
            }
            xml.push_str("</c>");
        },
        CellValue::Decimal(d) => {
            write!(xml, r#"<c r="{}" t="n" s="{}"><v>{}</v></c>"#, cell_ref, style, d)?;
        },
        CellValue::Bool(b) => {
            write!(
                xml,
                r#"<c r="{}" t="b" s="{}"><v>{}</v></c>"#,
                cell_ref,
                style,
                if b { "1" } else { "0" }
            )?;
        },
        CellValue::Formula {
            ref expr,
            ref cached,
        } => {
            write!(xml, r#"<c r="{}" t="n" s="{}">"#, cell_ref, style)?;
            write!(xml, "<f>{}</f>", escape_xml(expr))?;
            if let Some(cached) = cached {
                write!(xml, "<v>{}</v>", escape_xml(cached))?;
            }
            xml.push_str("</c>");
        },
    }
    Ok(())
}

fn needs_space_preserve(s: &str) -> bool {
    s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace)
}
