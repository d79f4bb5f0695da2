//! Buffered worksheet.
//!
//! A [`Sheet`] keeps a sparse grid of cells keyed by row and then column,
//! together with row heights, column widths and the sheet reading order.
//! Nothing is serialized until the owning workbook is written.

use crate::common::coord::check_column;
use crate::common::{Error, Result};
use crate::ooxml::xlsx::cell::{Cell, CellValue};
use crate::ooxml::xlsx::format::ReadingOrder;
use crate::ooxml::xlsx::writer::cells::{WORKSHEET_END, WorksheetHeader, write_row};
use crate::ooxml::xlsx::writer::style::{StyleId, StyleRegistry};
use crate::ooxml::xlsx::writer::styles::XfIndex;
use crate::ooxml::xlsx::writer::width::{DEFAULT_COLUMN_WIDTH, WidthEstimator};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

/// A worksheet of a buffered [`Workbook`](super::Workbook).
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    /// Cells by row, then column
    rows: BTreeMap<u32, BTreeMap<u32, Cell>>,
    /// Row heights in points (row -> height)
    row_heights: BTreeMap<u32, f64>,
    /// Column widths in character units (col -> width)
    column_widths: BTreeMap<u32, f64>,
    reading_order: Option<ReadingOrder>,
}

/// Mutable handle to a cell that was just set.
#[derive(Debug)]
pub struct CellMut<'a> {
    cell: &'a mut Cell,
}

impl CellMut<'_> {
    /// Attach a style to the cell.
    pub fn with_style(self, style: StyleId) -> Self {
        self.cell.style = Some(style);
        self
    }

    /// Remove the style from the cell.
    pub fn clear_style(self) -> Self {
        self.cell.style = None;
        self
    }

    pub fn cell(&self) -> &Cell {
        self.cell
    }
}

impl Sheet {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            rows: BTreeMap::new(),
            row_heights: BTreeMap::new(),
            column_widths: BTreeMap::new(),
            reading_order: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the value at zero-based `(row, col)`.
    ///
    /// Any previous cell there, including its style, is replaced.
    pub fn set_value_at(&mut self, row: u32, col: u32, value: impl Into<CellValue>) -> CellMut<'_> {
        let new_cell = Cell::new(value);
        let cell = match self.rows.entry(row).or_default().entry(col) {
            Entry::Occupied(entry) => {
                let cell = entry.into_mut();
                *cell = new_cell;
                cell
            },
            Entry::Vacant(entry) => entry.insert(new_cell),
        };
        CellMut { cell }
    }

    /// Set a formula without a cached result.
    pub fn set_formula_at(&mut self, row: u32, col: u32, expr: impl Into<String>) -> CellMut<'_> {
        self.set_value_at(row, col, CellValue::formula(expr))
    }

    /// Set a formula with the result shown until the reader recalculates.
    pub fn set_formula_with_result_at(
        &mut self,
        row: u32,
        col: u32,
        expr: impl Into<String>,
        result: impl Into<String>,
    ) -> CellMut<'_> {
        self.set_value_at(row, col, CellValue::formula_with_result(expr, result))
    }

    /// Remove and return the cell at `(row, col)`.
    ///
    /// The returned cell no longer carries a style.
    pub fn remove_cell_at(&mut self, row: u32, col: u32) -> Option<Cell> {
        let cells = self.rows.get_mut(&row)?;
        let mut removed = cells.remove(&col)?;
        if cells.is_empty() {
            self.rows.remove(&row);
        }
        removed.style = None;
        Some(removed)
    }

    pub fn get_cell_at(&self, row: u32, col: u32) -> Option<&Cell> {
        self.rows.get(&row)?.get(&col)
    }

    /// Highest column holding a cell, 0 for an empty sheet.
    pub fn max_used_column(&self) -> u32 {
        self.rows
            .values()
            .filter_map(|cells| cells.keys().next_back().copied())
            .max()
            .unwrap_or(0)
    }

    /// Set the height of a row in points.
    pub fn set_row_height(&mut self, row: u32, height: f64) -> Result<()> {
        check_dimension("row height", height)?;
        self.row_heights.insert(row, height);
        Ok(())
    }

    pub fn row_height(&self, row: u32) -> Option<f64> {
        self.row_heights.get(&row).copied()
    }

    /// Set the width of a column in character units.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a column past `XFD` or a
    /// negative or non-finite width.
    pub fn set_column_width(&mut self, col: u32, width: f64) -> Result<()> {
        check_column(col)?;
        check_dimension("column width", width)?;
        self.column_widths.insert(col, width);
        Ok(())
    }

    pub fn column_width(&self, col: u32) -> Option<f64> {
        self.column_widths.get(&col).copied()
    }

    pub fn set_reading_order(&mut self, order: ReadingOrder) {
        self.reading_order = Some(order);
    }

    pub fn reading_order(&self) -> Option<ReadingOrder> {
        self.reading_order
    }

    /// Fit a column to its widest text cell.
    ///
    /// Only string and boolean cells are measured. The width is set only
    /// when the widest cell needs more than the default 8.43 units; the new
    /// width is returned in that case. Scans every row, so call it once,
    /// right before writing.
    pub fn auto_resize_column_with(
        &mut self,
        col: u32,
        styles: &StyleRegistry,
        estimator: &dyn WidthEstimator,
    ) -> Option<f64> {
        let widest = self
            .rows
            .values()
            .filter_map(|cells| cells.get(&col))
            .filter_map(|cell| {
                let text = cell.value.formatted_text()?;
                let style = cell.style.and_then(|id| styles.get(id));
                Some(estimator.text_width(text, style))
            })
            .fold(None, |max: Option<f64>, width| {
                Some(max.map_or(width, |m| m.max(width)))
            })
            .filter(|&width| width > DEFAULT_COLUMN_WIDTH)?;

        self.column_widths.insert(col, widest);
        Some(widest)
    }

    /// [`auto_resize_column_with`](Self::auto_resize_column_with) for
    /// every column holding at least one cell.
    pub fn auto_resize_all_columns_with(
        &mut self,
        styles: &StyleRegistry,
        estimator: &dyn WidthEstimator,
    ) {
        let used: BTreeSet<u32> = self
            .rows
            .values()
            .flat_map(|cells| cells.keys().copied())
            .collect();
        for col in used {
            self.auto_resize_column_with(col, styles, estimator);
        }
    }

    /// Serialize the worksheet part.
    ///
    /// Fails with [`Error::InvalidArgument`] when a cell lies past column
    /// `XFD`; the grid itself accepts any index.
    pub(crate) fn to_xml(&self, first: bool, xf: &XfIndex) -> Result<String> {
        let cell_count: usize = self.rows.values().map(BTreeMap::len).sum();
        let mut xml = String::with_capacity(1024 + 64 * cell_count);

        let last_column = self
            .column_widths
            .keys()
            .next_back()
            .map_or(0, |&col| col)
            .max(self.max_used_column());
        check_column(last_column)?;
        WorksheetHeader {
            first,
            reading_order: self.reading_order,
            column_widths: &self.column_widths,
            last_column,
        }
        .write(&mut xml)?;

        for (&row, cells) in &self.rows {
            write_row(
                &mut xml,
                row,
                self.row_height(row),
                cells.iter().map(|(&col, cell)| (col, cell)),
                xf,
            )?;
        }

        xml.push_str(WORKSHEET_END);
        Ok(xml)
    }
}

pub(crate) fn check_dimension(what: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::invalid_argument(format!(
            "{} must be a finite non-negative number, got {}",
            what, value
        )));
    }
    Ok(())
}
