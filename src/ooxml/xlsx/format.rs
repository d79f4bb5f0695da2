//! Formatting vocabulary shared by the style builder and the style table.

use crate::common::{Error, Result};
use std::str::FromStr;

/// Font used when a style does not name one.
pub const DEFAULT_FONT_NAME: &str = "Calibri";

/// Font size in points used when a style does not set one.
pub const DEFAULT_FONT_SIZE: f64 = 11.0;

/// Number format of a style: a built-in index or a custom format code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumberFormat {
    /// Index into the format's built-in table (`0..=0x16` or `0x25..=0x31`)
    Builtin(u16),
    /// Custom format code such as `"0.00"` or `"dd-mm-yyyy HH:mm:ss"`
    Custom(String),
}

impl NumberFormat {
    /// Whether `index` names a built-in number format.
    pub fn is_valid_builtin(index: u16) -> bool {
        (0..=0x16).contains(&index) || (0x25..=0x31).contains(&index)
    }
}

/// Predefined colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Blue,
    Brown,
    Cyan,
    Gray,
    Green,
    Lime,
    Magenta,
    Navy,
    Orange,
    Pink,
    Purple,
    Red,
    Silver,
    White,
    Yellow,
}

impl Color {
    /// `#rrggbb` form of the color.
    pub fn hex(self) -> &'static str {
        match self {
            Self::Black => "#000000",
            Self::Blue => "#0000FF",
            Self::Brown => "#800000",
            Self::Cyan => "#00FFFF",
            Self::Gray => "#808080",
            Self::Green => "#008000",
            Self::Lime => "#00FF00",
            Self::Magenta => "#FF00FF",
            Self::Navy => "#000080",
            Self::Orange => "#FF6600",
            Self::Pink => "#FF00FF",
            Self::Purple => "#800080",
            Self::Red => "#FF0000",
            Self::Silver => "#C0C0C0",
            Self::White => "#FFFFFF",
            Self::Yellow => "#FFFF00",
        }
    }
}

/// A color in the `AARRGGBB` form written to the style table.
///
/// Built from a [`Color`] or parsed from a `#rrggbb` / `rrggbb` string. The
/// alpha channel is always `FF`; an alpha given in an 8-digit input is
/// replaced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArgbColor(String);

impl ArgbColor {
    /// Parse a hex color string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] unless the input is 6 or 8 hex
    /// digits, optionally preceded by `#`.
    pub fn from_hex(color: &str) -> Result<Self> {
        let digits = color.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if !matches!(digits.len(), 6 | 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::invalid_argument(format!(
                "color must be 6 or 8 hex digits, got {:?}",
                color
            )));
        }
        let rgb = &digits[digits.len() - 6..];
        Ok(ArgbColor(format!("FF{}", rgb.to_ascii_uppercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Color> for ArgbColor {
    fn from(color: Color) -> Self {
        // Predefined colors are always `#RRGGBB`
        ArgbColor(format!("FF{}", &color.hex()[1..]))
    }
}

impl FromStr for ArgbColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ArgbColor::from_hex(s)
    }
}

impl TryFrom<&str> for ArgbColor {
    type Error = Error;

    fn try_from(color: &str) -> Result<Self> {
        ArgbColor::from_hex(color)
    }
}

/// Underline variants of a font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontUnderline {
    #[default]
    None,
    Single,
    Double,
    SingleAccounting,
    DoubleAccounting,
}

impl FontUnderline {
    /// `None` when no `<u>` element is written, `Some(None)` for a bare
    /// `<u/>` and `Some(Some(val))` when the element carries a value.
    pub(crate) fn element_val(self) -> Option<Option<&'static str>> {
        match self {
            Self::None => None,
            Self::Single => Some(None),
            Self::Double => Some(Some("double")),
            Self::SingleAccounting => Some(Some("singleAccounting")),
            Self::DoubleAccounting => Some(Some("doubleAccounting")),
        }
    }
}

/// Fill pattern kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    DarkDown,
    DarkGray,
    DarkGrid,
    DarkHorizontal,
    DarkTrellis,
    DarkUp,
    DarkVertical,
    Gray0625,
    Gray125,
    LightDown,
    LightGray,
    LightGrid,
    LightHorizontal,
    LightTrellis,
    LightUp,
    LightVertical,
    MediumGray,
    None,
    Solid,
}

impl Pattern {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::DarkDown => "darkDown",
            Self::DarkGray => "darkGray",
            Self::DarkGrid => "darkGrid",
            Self::DarkHorizontal => "darkHorizontal",
            Self::DarkTrellis => "darkTrellis",
            Self::DarkUp => "darkUp",
            Self::DarkVertical => "darkVertical",
            Self::Gray0625 => "gray0625",
            Self::Gray125 => "gray125",
            Self::LightDown => "lightDown",
            Self::LightGray => "lightGray",
            Self::LightGrid => "lightGrid",
            Self::LightHorizontal => "lightHorizontal",
            Self::LightTrellis => "lightTrellis",
            Self::LightUp => "lightUp",
            Self::LightVertical => "lightVertical",
            Self::MediumGray => "mediumGray",
            Self::None => "none",
            Self::Solid => "solid",
        }
    }
}

/// Border line styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    None,
    Thin,
    Medium,
    Dashed,
    Dotted,
    Thick,
    Double,
    Hair,
    MediumDashed,
    DashDot,
    MediumDashDot,
    DashDotDot,
    MediumDashDotDot,
    SlantDashDot,
}

impl LineStyle {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Thin => "thin",
            Self::Medium => "medium",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
            Self::Thick => "thick",
            Self::Double => "double",
            Self::Hair => "hair",
            Self::MediumDashed => "mediumDashed",
            Self::DashDot => "dashDot",
            Self::MediumDashDot => "mediumDashDot",
            Self::DashDotDot => "dashDotDot",
            Self::MediumDashDotDot => "mediumDashDotDot",
            Self::SlantDashDot => "slantDashDot",
        }
    }
}

/// The four outer edges of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderEdge {
    Left,
    Right,
    Top,
    Bottom,
}

impl BorderEdge {
    /// Edges in the order the border element lists them.
    pub const ALL: [BorderEdge; 4] = [Self::Left, Self::Right, Self::Top, Self::Bottom];

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Direction of a diagonal border line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagonalDirection {
    /// Bottom-left to top-right (`diagonalUp`)
    BottomLeftToTopRight,
    /// Top-left to bottom-right (`diagonalDown`)
    TopLeftToBottomRight,
    Both,
}

impl DiagonalDirection {
    pub(crate) fn is_up(self) -> bool {
        matches!(self, Self::BottomLeftToTopRight | Self::Both)
    }

    pub(crate) fn is_down(self) -> bool {
        matches!(self, Self::TopLeftToBottomRight | Self::Both)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlignment {
    General,
    Left,
    Center,
    Right,
    Fill,
    Justify,
    CenterContinuous,
    Distributed,
}

impl HorizontalAlignment {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Fill => "fill",
            Self::Justify => "justify",
            Self::CenterContinuous => "centerContinuous",
            Self::Distributed => "distributed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlignment {
    Top,
    Center,
    Bottom,
    Justify,
    Distributed,
}

impl VerticalAlignment {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Center => "center",
            Self::Bottom => "bottom",
            Self::Justify => "justify",
            Self::Distributed => "distributed",
        }
    }
}

/// Text direction of a cell or a whole sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingOrder {
    LeftToRight,
    RightToLeft,
}

impl ReadingOrder {
    /// Value of the `readingOrder` alignment attribute.
    pub(crate) fn val(self) -> u8 {
        match self {
            Self::LeftToRight => 1,
            Self::RightToLeft => 2,
        }
    }
}

/// Font properties of a style.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDesc {
    pub name: String,
    pub size: f64,
    pub color: Option<ArgbColor>,
    pub bold: bool,
    pub italic: bool,
    pub underline: FontUnderline,
    pub strike_out: bool,
}

impl Default for FontDesc {
    fn default() -> Self {
        Self {
            name: DEFAULT_FONT_NAME.to_string(),
            size: DEFAULT_FONT_SIZE,
            color: None,
            bold: false,
            italic: false,
            underline: FontUnderline::None,
            strike_out: false,
        }
    }
}

/// Fill properties of a style.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillDesc {
    pub background: Option<ArgbColor>,
    pub foreground: Option<ArgbColor>,
    pub pattern: Option<Pattern>,
}

/// Line style and color of one border line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BorderLine {
    pub style: Option<LineStyle>,
    pub color: Option<ArgbColor>,
}

impl BorderLine {
    pub(crate) fn is_set(&self) -> bool {
        self.style.is_some() || self.color.is_some()
    }
}

/// Border properties of a style.
///
/// `style` and `color` apply to every edge that does not set its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BorderDesc {
    pub style: Option<LineStyle>,
    pub color: Option<ArgbColor>,
    pub edges: [BorderLine; 4],
    pub diagonal: BorderLine,
    pub diagonal_direction: Option<DiagonalDirection>,
}

impl BorderDesc {
    pub fn edge(&self, edge: BorderEdge) -> &BorderLine {
        &self.edges[edge.index()]
    }

    pub(crate) fn edge_mut(&mut self, edge: BorderEdge) -> &mut BorderLine {
        &mut self.edges[edge.index()]
    }

    pub(crate) fn is_set(&self) -> bool {
        self.style.is_some()
            || self.color.is_some()
            || self.edges.iter().any(BorderLine::is_set)
            || self.diagonal.is_set()
            || self.diagonal_direction.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ranges() {
        assert!(NumberFormat::is_valid_builtin(0));
        assert!(NumberFormat::is_valid_builtin(0x16));
        assert!(!NumberFormat::is_valid_builtin(0x17));
        assert!(!NumberFormat::is_valid_builtin(0x24));
        assert!(NumberFormat::is_valid_builtin(0x25));
        assert!(NumberFormat::is_valid_builtin(0x31));
        assert!(!NumberFormat::is_valid_builtin(0x32));
    }

    #[test]
    fn test_argb_normalization() {
        assert_eq!(ArgbColor::from_hex("#ffcc00").unwrap().as_str(), "FFFFCC00");
        assert_eq!(ArgbColor::from_hex(" 00ff00 ").unwrap().as_str(), "FF00FF00");
        assert_eq!(ArgbColor::from_hex("#80123abc").unwrap().as_str(), "FF123ABC");
        assert_eq!("C0C0C0".parse::<ArgbColor>().unwrap().as_str(), "FFC0C0C0");
        assert_eq!(ArgbColor::from(Color::Orange).as_str(), "FFFF6600");
    }

    #[test]
    fn test_argb_rejects_malformed() {
        for bad in ["", "#", "ff00", "#12345", "1234567", "zzzzzz", "#ff00gg", "ff&00\"", "##ff0000"] {
            assert!(
                matches!(ArgbColor::from_hex(bad), Err(Error::InvalidArgument(_))),
                "{:?} accepted",
                bad
            );
        }
        assert!(ArgbColor::try_from("ff\"0000").is_err());
    }

    #[test]
    fn test_predefined_colors_are_valid_hex() {
        for color in [Color::Black, Color::Navy, Color::Pink, Color::Yellow] {
            assert_eq!(
                ArgbColor::from(color),
                ArgbColor::from_hex(color.hex()).unwrap()
            );
        }
    }

    #[test]
    fn test_underline_rendering() {
        assert_eq!(FontUnderline::None.element_val(), None);
        assert_eq!(FontUnderline::Single.element_val(), Some(None));
        assert_eq!(
            FontUnderline::DoubleAccounting.element_val(),
            Some(Some("doubleAccounting"))
        );
    }

    #[test]
    fn test_diagonal_flags() {
        assert!(DiagonalDirection::BottomLeftToTopRight.is_up());
        assert!(!DiagonalDirection::BottomLeftToTopRight.is_down());
        assert!(!DiagonalDirection::TopLeftToBottomRight.is_up());
        assert!(DiagonalDirection::Both.is_up() && DiagonalDirection::Both.is_down());
    }

    #[test]
    fn test_empty_border_is_unset() {
        let mut border = BorderDesc::default();
        assert!(!border.is_set());
        border.edge_mut(BorderEdge::Top).color = Some(Color::Red.into());
        assert!(border.is_set());
        assert_eq!(border.edge(BorderEdge::Top).color.as_ref().unwrap().as_str(), "FFFF0000");
    }
}
