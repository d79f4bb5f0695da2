//! Forward-only workbook writer.
//!
//! [`StreamingWorkbook`] writes each sheet straight into the ZIP container
//! as its rows are pulled from the caller's iterator, holding at most one
//! row in memory. The sink only needs [`Write`]: pipes, sockets and
//! response bodies work as well as files. The session moves through these
//! states:
//!
//! - *Open*: styles may be defined.
//! - *Styles committed*: entered when the first sheet starts; `xl/styles.xml`
//!   has been written and no further styles may be defined.
//! - *Writing sheet*: rows of one sheet are being written.
//! - *Ended*: the workbook manifests have been written.
//!
//! [`close`](StreamingWorkbook::close) ends the session if needed and hands
//! back the sink.

use crate::common::coord::{MAX_COLUMNS, check_column};
use crate::common::{Error, Result, sheet_names_clash};
use crate::ooxml::xlsx::cell::{Cell, CellValue};
use crate::ooxml::xlsx::format::ReadingOrder;
use crate::ooxml::xlsx::writer::cells::{WORKSHEET_END, WorksheetHeader, write_row};
use crate::ooxml::xlsx::writer::package::{
    PackageWriter, STYLES_PART, WriteOptions, worksheet_part_name,
};
use crate::ooxml::xlsx::writer::sheet::check_dimension;
use crate::ooxml::xlsx::writer::style::{StyleBuilder, StyleId, StyleRegistry};
use crate::ooxml::xlsx::writer::styles::{StylesBuilder, XfIndex};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::io::Write;
use zip::write::StreamWriter;

/// One row handed to the streaming writer.
///
/// Cells are positional: the n-th entry lands in the n-th column, and `None`
/// leaves that column empty.
#[derive(Debug, Clone, Default)]
pub struct Row {
    cells: Vec<Option<Cell>>,
    height: Option<f64>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row of unstyled cells, one per value.
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        values.into_iter().map(|v| Some(Cell::new(v))).collect()
    }

    /// Append a cell in the next column.
    pub fn with_cell(mut self, cell: Cell) -> Self {
        self.cells.push(Some(cell));
        self
    }

    pub fn with_value(self, value: impl Into<CellValue>) -> Self {
        self.with_cell(Cell::new(value))
    }

    pub fn with_styled_value(self, value: impl Into<CellValue>, style: StyleId) -> Self {
        self.with_cell(Cell::new(value).with_style(style))
    }

    /// Leave the next column empty.
    pub fn skip(mut self) -> Self {
        self.cells.push(None);
        self
    }

    /// Custom row height in points.
    pub fn height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn cells(&self) -> &[Option<Cell>] {
        &self.cells
    }

    /// Whether the row has no cell at all. Empty rows are not written but
    /// still take up a row number.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

impl FromIterator<Option<Cell>> for Row {
    fn from_iter<T: IntoIterator<Item = Option<Cell>>>(iter: T) -> Self {
        Row {
            cells: iter.into_iter().collect(),
            height: None,
        }
    }
}

impl From<Vec<Cell>> for Row {
    fn from(cells: Vec<Cell>) -> Self {
        cells.into_iter().map(Some).collect()
    }
}

/// Sheet settings that must be known before the first row is written.
#[derive(Debug, Clone, Default)]
pub struct SheetOptions {
    column_widths: BTreeMap<u32, f64>,
    reading_order: Option<ReadingOrder>,
}

impl SheetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom column width in character units.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a column past `XFD` or a
    /// negative or non-finite width.
    pub fn column_width(mut self, col: u32, width: f64) -> Result<Self> {
        check_column(col)?;
        check_dimension("column width", width)?;
        self.column_widths.insert(col, width);
        Ok(self)
    }

    pub fn reading_order(mut self, order: ReadingOrder) -> Self {
        self.reading_order = Some(order);
        self
    }

    /// Last column that gets a `<col>` entry; a single default column when
    /// no width was given.
    fn last_column(&self) -> u32 {
        self.column_widths.keys().next_back().copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Open,
    StylesCommitted(XfIndex),
    WritingSheet,
    Ended,
}

/// Workbook written sheet by sheet into any [`Write`] sink.
///
/// # Examples
///
/// ```
/// use sheetwright::{Row, StreamingWorkbook};
///
/// # fn main() -> sheetwright::Result<()> {
/// let mut workbook = StreamingWorkbook::new(Vec::new());
/// let bold = workbook.define_style()?.font().bold(true).build();
///
/// let header = Row::new().with_styled_value("Name", bold);
/// let rows = (1..=3).map(|i| Row::new().with_value(format!("item {}", i)).with_value(i));
/// workbook.with_sheet("Items", std::iter::once(header).chain(rows))?;
///
/// let bytes = workbook.close()?;
/// assert!(bytes.starts_with(b"PK"));
/// # Ok(())
/// # }
/// ```
pub struct StreamingWorkbook<W: Write> {
    /// `None` once the container has been finished
    package: Option<PackageWriter<StreamWriter<W>>>,
    styles: StyleRegistry,
    sheet_names: Vec<String>,
    state: State,
}

impl<W: Write> StreamingWorkbook<W> {
    pub fn new(sink: W) -> Self {
        Self::with_options(sink, &WriteOptions::default())
    }

    pub fn with_options(sink: W, options: &WriteOptions) -> Self {
        Self {
            package: Some(PackageWriter::new_stream(sink, options)),
            styles: StyleRegistry::new(),
            sheet_names: Vec::new(),
            state: State::Open,
        }
    }

    /// Start defining a style.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalState`] once the first sheet has started.
    pub fn define_style(&mut self) -> Result<StyleBuilder<'_>> {
        match self.state {
            State::Open => Ok(self.styles.define()),
            _ => Err(Error::illegal_state(
                "styles cannot be defined after the first sheet has started",
            )),
        }
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    /// Names of the sheets written so far, in tab order.
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.sheet_names.iter().map(String::as_str)
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.state, State::Ended)
    }

    /// Write a sheet from `rows`, pulling one row at a time.
    ///
    /// The first call commits the style table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when a sheet of the same name
    /// (ignoring case) was already written; the session is left as it was.
    pub fn with_sheet<I>(&mut self, name: impl Into<String>, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = Row>,
    {
        self.with_sheet_options(name, &SheetOptions::default(), rows)
    }

    pub fn with_sheet_options<I>(
        &mut self,
        name: impl Into<String>,
        options: &SheetOptions,
        rows: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = Row>,
    {
        self.write_sheet(name.into(), options, rows.into_iter().map(Ok::<_, Infallible>))
    }

    /// Write a sheet from a fallible row source.
    ///
    /// On the first `Err` the sheet is closed with the rows written so far
    /// and the error is returned as [`Error::RowSource`]. The session stays
    /// usable.
    pub fn try_with_sheet<I, E>(
        &mut self,
        name: impl Into<String>,
        options: &SheetOptions,
        rows: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = std::result::Result<Row, E>>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        self.write_sheet(name.into(), options, rows)
    }

    fn write_sheet<I, E>(&mut self, name: String, options: &SheetOptions, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = std::result::Result<Row, E>>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        match self.state {
            State::Open | State::StylesCommitted(_) => {},
            State::WritingSheet => {
                return Err(Error::illegal_state("a previous sheet failed while writing"));
            },
            State::Ended => {
                return Err(Error::illegal_state("cannot write a sheet after end"));
            },
        }
        if self.sheet_names.iter().any(|n| sheet_names_clash(n, &name)) {
            return Err(Error::invalid_argument(format!(
                "a sheet named {:?} was already written",
                name
            )));
        }
        let xf = match self.state {
            State::StylesCommitted(xf) => xf,
            _ => self.commit_styles()?,
        };

        let index = self.sheet_names.len();
        let package = self
            .package
            .as_mut()
            .ok_or_else(|| Error::illegal_state("workbook already closed"))?;

        self.state = State::WritingSheet;
        package.start_part(&worksheet_part_name(index))?;
        log::debug!("writing sheet {:?}", name);
        self.sheet_names.push(name);

        let mut xml = String::with_capacity(1024);
        WorksheetHeader {
            first: index == 0,
            reading_order: options.reading_order,
            column_widths: &options.column_widths,
            last_column: options.last_column(),
        }
        .write(&mut xml)?;
        package.write_chunk(xml.as_bytes())?;

        let mut outcome = Ok(());
        let mut written = 0u32;
        for (row_index, row) in (0u32..).zip(rows) {
            let row = match row {
                Ok(row) => row,
                Err(err) => {
                    outcome = Err(Error::RowSource(err.into()));
                    break;
                },
            };
            if let Some(height) = row.height
                && let Err(err) = check_dimension("row height", height)
            {
                outcome = Err(err);
                break;
            }
            if row.cells.len() > MAX_COLUMNS as usize {
                outcome = Err(Error::invalid_argument(format!(
                    "row {} has {} cells, more than the {} worksheet columns",
                    row_index + 1,
                    row.cells.len(),
                    MAX_COLUMNS
                )));
                break;
            }

            xml.clear();
            let cells = (0u32..)
                .zip(&row.cells)
                .filter_map(|(col, cell)| cell.as_ref().map(|cell| (col, cell)));
            write_row(&mut xml, row_index, row.height, cells, &xf)?;
            package.write_chunk(xml.as_bytes())?;
            written = row_index + 1;
        }

        package.write_chunk(WORKSHEET_END.as_bytes())?;
        self.state = State::StylesCommitted(xf);
        log::debug!("finished sheet #{} after {} row(s)", index + 1, written);
        outcome
    }

    /// Serialize the style table and leave the open state.
    fn commit_styles(&mut self) -> Result<XfIndex> {
        let builder = StylesBuilder::from_registry(&self.styles);
        let xml = builder.to_xml()?;
        self.package
            .as_mut()
            .ok_or_else(|| Error::illegal_state("workbook already closed"))?
            .add_part(STYLES_PART, xml.as_bytes())?;

        let xf = builder.xf_index();
        self.state = State::StylesCommitted(xf);
        log::debug!("committed {} style(s)", self.styles.len());
        Ok(xf)
    }

    /// Write the workbook manifests for the sheets written so far.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalState`] when called a second time.
    pub fn end(&mut self) -> Result<()> {
        match self.state {
            State::Open => {
                self.commit_styles()?;
            },
            State::StylesCommitted(_) => {},
            State::WritingSheet => {
                return Err(Error::illegal_state(
                    "cannot end after a sheet failed while writing",
                ));
            },
            State::Ended => return Err(Error::illegal_state("workbook already ended")),
        }

        self.package
            .as_mut()
            .ok_or_else(|| Error::illegal_state("workbook already closed"))?
            .add_manifests(&self.sheet_names)?;
        self.state = State::Ended;
        log::debug!("ended workbook with {} sheet(s)", self.sheet_names.len());
        Ok(())
    }

    /// End the session if needed, finish the container and return the sink.
    ///
    /// Unlike [`end`](Self::end), closing an already ended session is not
    /// an error.
    pub fn close(mut self) -> Result<W> {
        let result = self.finish();
        // Nothing left for drop to do, even when finishing failed
        self.package = None;
        result
    }

    fn finish(&mut self) -> Result<W> {
        if !self.is_ended() {
            self.end()?;
        }
        let sink = self
            .package
            .take()
            .ok_or_else(|| Error::illegal_state("workbook already closed"))?
            .finish()?;
        Ok(sink.into_inner())
    }
}

impl<W: Write> Drop for StreamingWorkbook<W> {
    fn drop(&mut self) {
        if self.package.is_some()
            && let Err(err) = self.finish()
        {
            log::warn!("closing dropped streaming workbook failed: {}", err);
        }
    }
}
