//! Styles.xml generator for XLSX files.
//!
//! This module turns the styles of a [`StyleRegistry`] into the styles.xml
//! part. Every registered style gets one cell format (xf) record, in creation
//! order, after the reserved default record at index 0. Fonts, fills and
//! borders are appended per style without structural deduplication; custom
//! number format codes are shared by string.

use crate::common::Result;
use crate::common::xml::escape_xml;
use crate::ooxml::xlsx::format::{
    ArgbColor, BorderDesc, BorderEdge, FillDesc, FontDesc, LineStyle, NumberFormat,
    Pattern,
};
use crate::ooxml::xlsx::writer::style::{Style, StyleId, StyleRegistry};
use std::collections::HashMap;
use std::fmt::Write as FmtWrite;

/// First id available to custom number formats.
pub const FIRST_CUSTOM_NUM_FMT_ID: u32 = 164;

/// Resolves style ids to cell format positions for one write.
///
/// Ids from another workbook, or created after the style table was
/// generated, resolve to the default format 0.
#[derive(Debug, Clone, Copy)]
pub(crate) struct XfIndex {
    registry: u64,
    styles: usize,
}

impl XfIndex {
    pub(crate) fn resolve(&self, style: Option<StyleId>) -> u32 {
        match style {
            Some(id) if id.registry() == self.registry && id.index() < self.styles => {
                id.index() as u32 + 1
            },
            _ => 0,
        }
    }
}

/// A fill record as written.
#[derive(Debug, Clone)]
struct FillEntry {
    pattern: Pattern,
    fg_color: Option<ArgbColor>,
    bg_color: Option<ArgbColor>,
}

/// A cell format record: indices into the other tables plus alignment.
#[derive(Debug, Clone, Default)]
struct XfEntry {
    num_fmt_id: u32,
    font_id: usize,
    fill_id: usize,
    border_id: usize,
    alignment: Option<Alignment>,
}

#[derive(Debug, Clone)]
struct Alignment {
    horizontal: &'static str,
    vertical: &'static str,
    text_rotation: u16,
    reading_order: Option<u8>,
}

/// Builder for generating styles.xml content.
///
/// Collects fonts, fills, borders, number formats and cell formats, assigns
/// their indices and writes the complete part.
#[derive(Debug)]
pub struct StylesBuilder {
    registry: u64,
    /// Fonts (index -> font), index 0 is the workbook default
    fonts: Vec<FontDesc>,
    /// Fills, indices 0 and 1 are reserved
    fills: Vec<FillEntry>,
    /// Borders, index 0 is "no border"
    borders: Vec<BorderDesc>,
    /// Custom number format codes, in id order
    number_formats: Vec<String>,
    /// Number format lookup (format code -> id)
    number_format_map: HashMap<String, u32>,
    /// Cell formats (XF records), index 0 is the default
    cell_formats: Vec<XfEntry>,
}

impl StylesBuilder {
    /// Create a builder holding only the reserved default records.
    fn new(registry: u64) -> Self {
        Self {
            registry,
            fonts: vec![FontDesc::default()],
            fills: vec![
                FillEntry {
                    pattern: Pattern::None,
                    fg_color: None,
                    bg_color: None,
                },
                FillEntry {
                    pattern: Pattern::Gray125,
                    fg_color: None,
                    bg_color: None,
                },
            ],
            borders: vec![BorderDesc::default()],
            number_formats: Vec::new(),
            number_format_map: HashMap::new(),
            cell_formats: vec![XfEntry::default()],
        }
    }

    /// Register every style of `registry`, in creation order.
    pub fn from_registry(registry: &StyleRegistry) -> Self {
        let mut builder = Self::new(registry.id());
        for (id, style) in registry.iter() {
            let xf = builder.add_style(style);
            log::trace!("style #{} -> xf {}", id.index(), xf);
        }
        builder
    }

    /// Id resolver matching the cell formats of this builder.
    pub(crate) fn xf_index(&self) -> XfIndex {
        XfIndex {
            registry: self.registry,
            styles: self.cell_formats.len() - 1,
        }
    }

    /// Number of cell formats, including the default.
    pub fn cell_format_count(&self) -> usize {
        self.cell_formats.len()
    }

    /// Append the records for one style and return its cell format index.
    fn add_style(&mut self, style: &Style) -> usize {
        let num_fmt_id = match style.number_format() {
            Some(NumberFormat::Builtin(index)) => u32::from(*index),
            Some(NumberFormat::Custom(code)) => self.add_number_format(code),
            None => 0,
        };

        let font_id = style.font().map_or(0, |font| self.add_font(font));
        let fill_id = style.fill().map_or(0, |fill| self.add_fill(fill));
        let border_id = style
            .border()
            .filter(|border| border.is_set())
            .map_or(0, |border| self.add_border(border));

        let alignment = style.has_alignment().then(|| Alignment {
            horizontal: style.horizontal_alignment().map_or("general", |h| h.as_str()),
            vertical: style.vertical_alignment().map_or("bottom", |v| v.as_str()),
            text_rotation: style.rotation().map_or(0, encode_rotation),
            reading_order: style.reading_order().map(|order| order.val()),
        });

        let index = self.cell_formats.len();
        self.cell_formats.push(XfEntry {
            num_fmt_id,
            font_id,
            fill_id,
            border_id,
            alignment,
        });
        index
    }

    fn add_font(&mut self, font: &FontDesc) -> usize {
        let index = self.fonts.len();
        self.fonts.push(font.clone());
        index
    }

    fn add_fill(&mut self, fill: &FillDesc) -> usize {
        // A lone background color also becomes the foreground so solid
        // fills render the same in every reader.
        let fg_color = fill.foreground.clone().or_else(|| fill.background.clone());
        let index = self.fills.len();
        self.fills.push(FillEntry {
            pattern: fill.pattern.unwrap_or(Pattern::Solid),
            fg_color,
            bg_color: fill.background.clone(),
        });
        index
    }

    fn add_border(&mut self, border: &BorderDesc) -> usize {
        let index = self.borders.len();
        self.borders.push(border.clone());
        index
    }

    /// Add a custom number format and return its id.
    fn add_number_format(&mut self, format: &str) -> u32 {
        if let Some(&id) = self.number_format_map.get(format) {
            return id;
        }

        let id = FIRST_CUSTOM_NUM_FMT_ID + self.number_formats.len() as u32;
        self.number_formats.push(format.to_string());
        self.number_format_map.insert(format.to_string(), id);
        id
    }

    /// Generate the complete styles.xml content.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(2048 + 256 * self.cell_formats.len());

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        if !self.number_formats.is_empty() {
            write!(xml, r#"<numFmts count="{}">"#, self.number_formats.len())?;
            for (i, code) in self.number_formats.iter().enumerate() {
                write!(
                    xml,
                    r#"<numFmt numFmtId="{}" formatCode="{}"/>"#,
                    FIRST_CUSTOM_NUM_FMT_ID + i as u32,
                    escape_xml(code)
                )?;
            }
            xml.push_str("</numFmts>");
        }

        write!(xml, r#"<fonts count="{}">"#, self.fonts.len())?;
        for font in &self.fonts {
            write_font(&mut xml, font)?;
        }
        xml.push_str("</fonts>");

        write!(xml, r#"<fills count="{}">"#, self.fills.len())?;
        for fill in &self.fills {
            write_fill(&mut xml, fill)?;
        }
        xml.push_str("</fills>");

        write!(xml, r#"<borders count="{}">"#, self.borders.len())?;
        for border in &self.borders {
            write_border(&mut xml, border)?;
        }
        xml.push_str("</borders>");

        xml.push_str(r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#);

        write!(xml, r#"<cellXfs count="{}">"#, self.cell_formats.len())?;
        for xf in &self.cell_formats {
            write_xf(&mut xml, xf)?;
        }
        xml.push_str("</cellXfs>");

        xml.push_str(r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#);
        xml.push_str("</styleSheet>");

        Ok(xml)
    }
}

/// Map builder rotation degrees to the `textRotation` attribute.
///
/// Upward angles are stored as-is, downward ones as `90 + |r|`, and the
/// stacked-text value 270 as 255.
fn encode_rotation(degrees: i16) -> u16 {
    match degrees {
        270 => 255,
        d if d < 0 => (90 - d) as u16,
        d => d as u16,
    }
}

fn write_font(xml: &mut String, font: &FontDesc) -> Result<()> {
    xml.push_str("<font>");

    if font.bold {
        xml.push_str("<b/>");
    }
    if font.italic {
        xml.push_str("<i/>");
    }
    if font.strike_out {
        xml.push_str("<strike/>");
    }
    match font.underline.element_val() {
        Some(Some(val)) => write!(xml, r#"<u val="{}"/>"#, val)?,
        Some(None) => xml.push_str("<u/>"),
        None => {},
    }

    write!(xml, r#"<sz val="{}"/>"#, font.size)?;
    if let Some(ref color) = font.color {
        write!(xml, r#"<color rgb="{}"/>"#, color.as_str())?;
    }
    write!(xml, r#"<name val="{}"/>"#, escape_xml(&font.name))?;
    xml.push_str(r#"<family val="2"/>"#);

    xml.push_str("</font>");
    Ok(())
}

fn write_fill(xml: &mut String, fill: &FillEntry) -> Result<()> {
    xml.push_str("<fill>");

    if fill.fg_color.is_none() && fill.bg_color.is_none() {
        write!(xml, r#"<patternFill patternType="{}"/>"#, fill.pattern.as_str())?;
    } else {
        write!(xml, r#"<patternFill patternType="{}">"#, fill.pattern.as_str())?;
        if let Some(ref fg_color) = fill.fg_color {
            write!(xml, r#"<fgColor rgb="{}"/>"#, fg_color.as_str())?;
        }
        if let Some(ref bg_color) = fill.bg_color {
            write!(xml, r#"<bgColor rgb="{}"/>"#, bg_color.as_str())?;
        }
        xml.push_str("</patternFill>");
    }

    xml.push_str("</fill>");
    Ok(())
}

fn write_border(xml: &mut String, border: &BorderDesc) -> Result<()> {
    xml.push_str("<border");
    if let Some(direction) = border.diagonal_direction {
        if direction.is_up() {
            xml.push_str(r#" diagonalUp="1""#);
        }
        if direction.is_down() {
            xml.push_str(r#" diagonalDown="1""#);
        }
    }
    xml.push('>');

    for edge in BorderEdge::ALL {
        let line = border.edge(edge);
        write_border_side(
            xml,
            edge.as_str(),
            line.style.or(border.style),
            line.color.as_ref().or(border.color.as_ref()),
        )?;
    }

    // The diagonal keeps its own style, thin unless given.
    let diagonal_style = border.diagonal.style.or(
        (border.diagonal_direction.is_some() || border.diagonal.color.is_some())
            .then_some(LineStyle::Thin),
    );
    let diagonal_color = border.diagonal.color.as_ref().or(border.color.as_ref());
    write_border_side(xml, "diagonal", diagonal_style, diagonal_color)?;

    xml.push_str("</border>");
    Ok(())
}

/// Write a single border side.
fn write_border_side(
    xml: &mut String,
    side: &str,
    style: Option<LineStyle>,
    color: Option<&ArgbColor>,
) -> Result<()> {
    match style {
        Some(style) => {
            write!(xml, r#"<{} style="{}">"#, side, style.as_str())?;
            if let Some(color) = color {
                write!(xml, r#"<color rgb="{}"/>"#, color.as_str())?;
            }
            write!(xml, "</{}>", side)?;
        },
        None => write!(xml, "<{}/>", side)?,
    }
    Ok(())
}

fn write_xf(xml: &mut String, xf: &XfEntry) -> Result<()> {
    write!(
        xml,
        r#"<xf numFmtId="{}" fontId="{}" fillId="{}" borderId="{}" xfId="0""#,
        xf.num_fmt_id, xf.font_id, xf.fill_id, xf.border_id
    )?;

    if xf.num_fmt_id != 0 {
        xml.push_str(r#" applyNumberFormat="1""#);
    }
    if xf.font_id != 0 {
        xml.push_str(r#" applyFont="1""#);
    }
    if xf.fill_id != 0 {
        xml.push_str(r#" applyFill="1""#);
    }
    if xf.border_id != 0 {
        xml.push_str(r#" applyBorder="1""#);
    }

    match xf.alignment {
        Some(ref alignment) => {
            xml.push_str(r#" applyAlignment="1">"#);
            write!(
                xml,
                r#"<alignment horizontal="{}" vertical="{}" textRotation="{}""#,
                alignment.horizontal, alignment.vertical, alignment.text_rotation
            )?;
            if let Some(order) = alignment.reading_order {
                write!(xml, r#" readingOrder="{}""#, order)?;
            }
            xml.push_str("/></xf>");
        },
        None => xml.push_str("/>"),
    }
    Ok(())
}
