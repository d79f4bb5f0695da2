//! Cell values as they are written to a worksheet.

use crate::common::date::{ExcelDate, excel_serial_date};
use crate::ooxml::xlsx::writer::style::StyleId;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use rust_decimal::Decimal;

/// Types of data that can be stored in a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Inline string
    String(String),
    /// 64-bit floating point number
    Number(f64),
    /// Exact decimal, written digit for digit
    Decimal(Decimal),
    /// Boolean value
    Bool(bool),
    /// Date/time value (stored as a 1900-system day serial)
    Date(f64),
    /// Formula with an optional cached result
    Formula {
        expr: String,
        cached: Option<String>,
    },
}

impl CellValue {
    /// Date value from any chrono date or date-time.
    pub fn date<D: ExcelDate + ?Sized>(value: &D) -> Self {
        CellValue::Date(excel_serial_date(value))
    }

    /// Formula without a cached result; readers compute it on open.
    pub fn formula(expr: impl Into<String>) -> Self {
        CellValue::Formula {
            expr: expr.into(),
            cached: None,
        }
    }

    /// Formula carrying the result a reader shows before recalculation.
    pub fn formula_with_result(expr: impl Into<String>, cached: impl Into<String>) -> Self {
        CellValue::Formula {
            expr: expr.into(),
            cached: Some(cached.into()),
        }
    }

    /// Text a reader would display without applying a number format.
    ///
    /// Only strings and booleans have one; numeric values depend on their
    /// number format and are not measured.
    pub fn formatted_text(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            CellValue::Bool(true) => Some("TRUE"),
            CellValue::Bool(false) => Some("FALSE"),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<f32> for CellValue {
    fn from(value: f32) -> Self {
        CellValue::Number(f64::from(value))
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(f64::from(value))
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Number(f64::from(value))
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<Decimal> for CellValue {
    fn from(value: Decimal) -> Self {
        CellValue::Decimal(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::date(&value)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::date(&value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for CellValue {
    fn from(value: DateTime<Tz>) -> Self {
        CellValue::date(&value)
    }
}

/// A value together with the style it renders with.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    pub style: Option<StyleId>,
}

impl Cell {
    pub fn new(value: impl Into<CellValue>) -> Self {
        Self {
            value: value.into(),
            style: None,
        }
    }

    /// Attach a style, replacing any previous one.
    pub fn with_style(mut self, style: StyleId) -> Self {
        self.style = Some(style);
        self
    }
}

impl From<CellValue> for Cell {
    fn from(value: CellValue) -> Self {
        Cell::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_text() {
        assert_eq!(CellValue::from("abc").formatted_text(), Some("abc"));
        assert_eq!(CellValue::from(true).formatted_text(), Some("TRUE"));
        assert_eq!(CellValue::from(false).formatted_text(), Some("FALSE"));
        assert_eq!(CellValue::from(1.5).formatted_text(), None);
        assert_eq!(CellValue::formula("SUM(A1:A2)").formatted_text(), None);
    }

    #[test]
    fn test_dates_convert_to_serial() {
        let day = NaiveDate::from_ymd_opt(1900, 3, 1).unwrap();
        assert_eq!(CellValue::from(day), CellValue::Date(61.0));
    }

    #[test]
    fn test_integers_are_numbers() {
        assert_eq!(CellValue::from(42), CellValue::Number(42.0));
        assert_eq!(CellValue::from(-7i64), CellValue::Number(-7.0));
    }

    #[test]
    fn test_decimals_stay_exact() {
        let price = Decimal::new(1999, 2);
        assert_eq!(CellValue::from(price), CellValue::Decimal(price));
        assert_eq!(CellValue::from(price).formatted_text(), None);
    }
}
