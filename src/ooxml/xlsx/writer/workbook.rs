//! Buffered workbook.
//!
//! Holds every sheet in memory until [`Workbook::write`] assembles the
//! package. Writing does not consume or mark the workbook, so it can be
//! written again after further edits.

use crate::common::{Error, Result, sheet_names_clash};
use crate::ooxml::xlsx::writer::package::{
    PackageWriter, STYLES_PART, WriteOptions, worksheet_part_name,
};
use crate::ooxml::xlsx::writer::sheet::Sheet;
use crate::ooxml::xlsx::writer::style::{StyleBuilder, StyleRegistry};
use crate::ooxml::xlsx::writer::styles::StylesBuilder;
use crate::ooxml::xlsx::writer::width::{DefaultWidthEstimator, WidthEstimator};
use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;

/// Workbook whose sheets are kept in memory.
///
/// # Examples
///
/// ```
/// use sheetwright::Workbook;
///
/// # fn main() -> sheetwright::Result<()> {
/// let mut workbook = Workbook::new();
/// let bold = workbook.define_style().font().bold(true).build();
///
/// let sheet = workbook.sheet("Report");
/// sheet.set_value_at(0, 0, "Total").with_style(bold);
/// sheet.set_value_at(0, 1, 1234.5);
///
/// let bytes = workbook.to_bytes()?;
/// assert!(bytes.starts_with(b"PK"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Workbook {
    /// Sheets in tab order
    sheets: Vec<Sheet>,
    styles: StyleRegistry,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the sheet called `name`, creating it at the end of the tab order
    /// if it does not exist yet. Names are matched without regard to case,
    /// and the sheet keeps the spelling it was created with.
    pub fn sheet(&mut self, name: &str) -> &mut Sheet {
        let index = match self.sheets.iter().position(|s| sheet_names_clash(s.name(), name)) {
            Some(index) => index,
            None => {
                self.sheets.push(Sheet::new(name.to_string()));
                self.sheets.len() - 1
            },
        };
        &mut self.sheets[index]
    }

    pub fn get_sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| sheet_names_clash(s.name(), name))
    }

    /// Sheet names in tab order.
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.sheets.iter().map(Sheet::name)
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Start defining a style shared by all sheets.
    pub fn define_style(&mut self) -> StyleBuilder<'_> {
        self.styles.define()
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    /// Fit a column of a sheet to its text, see
    /// [`Sheet::auto_resize_column_with`].
    pub fn auto_resize_column(&mut self, sheet: &str, col: u32) -> Result<Option<f64>> {
        self.auto_resize_column_with(sheet, col, &DefaultWidthEstimator)
    }

    pub fn auto_resize_column_with(
        &mut self,
        sheet: &str,
        col: u32,
        estimator: &dyn WidthEstimator,
    ) -> Result<Option<f64>> {
        let styles = &self.styles;
        let sheet = Self::find_sheet_mut(&mut self.sheets, sheet)?;
        Ok(sheet.auto_resize_column_with(col, styles, estimator))
    }

    /// Fit every used column of a sheet.
    pub fn auto_resize_all_columns(&mut self, sheet: &str) -> Result<()> {
        self.auto_resize_all_columns_with(sheet, &DefaultWidthEstimator)
    }

    pub fn auto_resize_all_columns_with(
        &mut self,
        sheet: &str,
        estimator: &dyn WidthEstimator,
    ) -> Result<()> {
        let styles = &self.styles;
        let sheet = Self::find_sheet_mut(&mut self.sheets, sheet)?;
        sheet.auto_resize_all_columns_with(styles, estimator);
        Ok(())
    }

    fn find_sheet_mut<'s>(sheets: &'s mut [Sheet], name: &str) -> Result<&'s mut Sheet> {
        sheets
            .iter_mut()
            .find(|s| sheet_names_clash(s.name(), name))
            .ok_or_else(|| Error::invalid_argument(format!("no sheet named {:?}", name)))
    }

    /// Write the package to `sink` with default options.
    pub fn write<W: Write + Seek>(&self, sink: W) -> Result<W> {
        self.write_with_options(sink, &WriteOptions::default())
    }

    /// Write the package to `sink`.
    ///
    /// The style table is generated from every style defined so far; styles
    /// defined later only apply to later writes.
    pub fn write_with_options<W: Write + Seek>(&self, sink: W, options: &WriteOptions) -> Result<W> {
        let styles = StylesBuilder::from_registry(&self.styles);
        let xf = styles.xf_index();
        let names: Vec<&str> = self.sheet_names().collect();

        let mut package = PackageWriter::new(sink, options);
        package.add_manifests(&names)?;
        package.add_part(STYLES_PART, styles.to_xml()?.as_bytes())?;
        for (index, sheet) in self.sheets.iter().enumerate() {
            let xml = sheet.to_xml(index == 0, &xf)?;
            package.add_part(&worksheet_part_name(index), xml.as_bytes())?;
        }

        log::debug!(
            "wrote workbook with {} sheet(s) and {} style(s)",
            self.sheets.len(),
            self.styles.len()
        );
        package.finish()
    }

    /// Write the package into memory.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.write(Cursor::new(Vec::new()))?.into_inner())
    }

    /// Write the package to a file, replacing it if present.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.save_with_options(path, &WriteOptions::default())
    }

    pub fn save_with_options<P: AsRef<Path>>(&self, path: P, options: &WriteOptions) -> Result<()> {
        let file = BufWriter::new(File::create(path)?);
        let mut file = self.write_with_options(file, options)?;
        file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::xlsx::cell::CellValue;
    use crate::ooxml::xlsx::format::Color;
    use crate::ooxml::xlsx::writer::package::{
        CONTENT_TYPES_PART, ROOT_RELS_PART, WORKBOOK_PART, WORKBOOK_RELS_PART,
    };
    use crate::ooxml::xlsx::writer::test_support::{self, ReadBack};
    use calamine::{Data, Reader};
    use chrono::NaiveDate;

    fn two_sheet_workbook() -> Workbook {
        let mut workbook = Workbook::new();
        let bold = workbook.define_style().font().bold(true).build();
        let two_decimals = workbook.define_style().number_format("0.00").build();

        let sheet = workbook.sheet("test");
        sheet.set_value_at(0, 0, "Hello éé èè Michał").with_style(bold);
        sheet.set_value_at(1, 0, "Header");
        sheet.set_value_at(1, 1, 42.01).with_style(two_decimals);
        sheet.set_value_at(1, 2, true);

        let date_style = workbook
            .define_style()
            .number_format("dd-mm-yyyy HH:mm:ss")
            .bg_color(Color::Yellow)
            .build();
        let when = NaiveDate::from_ymd_opt(2017, 4, 4)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap();

        let sheet = workbook.sheet("test2");
        sheet.set_value_at(0, 0, "independent");
        sheet.set_value_at(1, 2, 1);
        sheet.set_value_at(2, 2, 2);
        sheet.set_value_at(3, 0, when).with_style(date_style);
        sheet.set_formula_at(3, 2, "SUM(C2:C3)");
        workbook
    }

    #[test]
    fn test_sheet_first_request_wins() {
        let mut workbook = Workbook::new();
        workbook.sheet("b").set_value_at(0, 0, 1);
        workbook.sheet("a");
        workbook.sheet("b").set_value_at(0, 1, 2);

        assert_eq!(workbook.sheet_names().collect::<Vec<_>>(), vec!["b", "a"]);
        let b = workbook.get_sheet("b").unwrap();
        assert!(b.get_cell_at(0, 0).is_some() && b.get_cell_at(0, 1).is_some());
    }

    #[test]
    fn test_sheet_names_match_ignoring_case() {
        let mut workbook = Workbook::new();
        workbook.sheet("Data").set_value_at(0, 0, 1);
        workbook.sheet("DATA").set_value_at(1, 0, 2);

        assert_eq!(workbook.sheet_names().collect::<Vec<_>>(), vec!["Data"]);
        assert_eq!(workbook.get_sheet("data").unwrap().name(), "Data");

        let read = ReadBack::from_bytes(&workbook.to_bytes().unwrap());
        assert_eq!(read.sheet_names, vec!["Data"]);
    }

    #[test]
    fn test_round_trip_two_sheets() {
        let workbook = two_sheet_workbook();
        let bytes = workbook.to_bytes().unwrap();

        let mut xlsx = test_support::open_with_calamine(&bytes);
        assert_eq!(xlsx.sheet_names(), vec!["test", "test2"]);

        let test = xlsx.worksheet_range("test").unwrap();
        assert_eq!(
            test.get_value((0, 0)),
            Some(&Data::String("Hello éé èè Michał".to_string()))
        );
        assert_eq!(test.get_value((1, 0)), Some(&Data::String("Header".to_string())));
        assert_eq!(test.get_value((1, 1)), Some(&Data::Float(42.01)));
        assert_eq!(test.get_value((1, 2)), Some(&Data::Bool(true)));

        let test2 = xlsx.worksheet_range("test2").unwrap();
        assert_eq!(test2.get_value((2, 2)), Some(&Data::Float(2.0)));
        let serial = test_support::date_serial(test2.get_value((3, 0)).unwrap());
        assert_eq!(
            test_support::serial_to_datetime(serial),
            NaiveDate::from_ymd_opt(2017, 4, 4).unwrap().and_hms_opt(20, 0, 0).unwrap()
        );
        let formulas = xlsx.worksheet_formula("test2").unwrap();
        assert_eq!(formulas.get_value((3, 2)).map(String::as_str), Some("SUM(C2:C3)"));

        let read = ReadBack::from_bytes(&bytes);
        let font = read.font_of(read.cell("test", "A1").unwrap());
        assert!(font.bold);
        assert!(!font.italic);
        let number = read.cell("test", "B2").unwrap();
        assert_eq!(read.number_format_of(number).as_deref(), Some("0.00"));
        let date = read.cell("test2", "A4").unwrap();
        assert_eq!(
            read.number_format_of(date).as_deref(),
            Some("dd-mm-yyyy HH:mm:ss")
        );
        assert_eq!(read.cell("test2", "C4").unwrap().value, None);
    }

    #[test]
    fn test_all_parts_present_in_order() {
        let workbook = two_sheet_workbook();
        let read = ReadBack::from_bytes(&workbook.to_bytes().unwrap());
        assert_eq!(
            read.part_names,
            vec![
                CONTENT_TYPES_PART,
                ROOT_RELS_PART,
                WORKBOOK_PART,
                WORKBOOK_RELS_PART,
                STYLES_PART,
                "xl/worksheets/sheet1.xml",
                "xl/worksheets/sheet2.xml",
            ]
        );
    }

    #[test]
    fn test_unstyled_cells_render_default_style() {
        let workbook = two_sheet_workbook();
        let read = ReadBack::from_bytes(&workbook.to_bytes().unwrap());
        assert_eq!(read.cell("test", "A2").unwrap().style, 0);
        assert_eq!(read.cell("test2", "C2").unwrap().style, 0);
    }

    #[test]
    fn test_write_is_repeatable() {
        let mut workbook = two_sheet_workbook();
        let first = workbook.to_bytes().unwrap();
        let second = workbook.to_bytes().unwrap();
        assert_eq!(
            ReadBack::from_bytes(&first).sheet_names,
            ReadBack::from_bytes(&second).sheet_names
        );

        workbook.sheet("third").set_value_at(0, 0, "later");
        let read = ReadBack::from_bytes(&workbook.to_bytes().unwrap());
        assert_eq!(read.sheet_names, vec!["test", "test2", "third"]);
        assert_eq!(read.cell("third", "A1").unwrap().text.as_deref(), Some("later"));
    }

    #[test]
    fn test_style_from_other_workbook_is_default() {
        let mut other = Workbook::new();
        let foreign = other.define_style().font().bold(true).build();

        let mut workbook = Workbook::new();
        workbook.define_style().font().italic(true).build();
        workbook.sheet("s").set_value_at(0, 0, "x").with_style(foreign);

        let read = ReadBack::from_bytes(&workbook.to_bytes().unwrap());
        assert_eq!(read.cell("s", "A1").unwrap().style, 0);
    }

    #[test]
    fn test_auto_resize_through_workbook() {
        let mut workbook = Workbook::new();
        let sheet = workbook.sheet("s");
        sheet.set_value_at(0, 0, "tiny");
        sheet.set_value_at(0, 1, "a header that is clearly wider than default");

        assert_eq!(workbook.auto_resize_column("s", 0).unwrap(), None);
        workbook.auto_resize_all_columns("s").unwrap();
        let sheet = workbook.get_sheet("s").unwrap();
        assert!(sheet.column_width(0).is_none());
        assert!(sheet.column_width(1).unwrap() > 8.43);

        assert!(matches!(
            workbook.auto_resize_column("missing", 0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");

        let mut workbook = Workbook::new();
        workbook.sheet("data").set_value_at(0, 0, CellValue::Number(1.0));
        workbook.save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let read = ReadBack::from_bytes(&bytes);
        assert_eq!(read.sheet_names, vec!["data"]);
        assert_eq!(read.cell("data", "A1").unwrap().value.as_deref(), Some("1"));
    }
}
