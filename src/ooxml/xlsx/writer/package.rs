//! Package parts and the ZIP container around them.
//!
//! The workbook manifest wires parts together by relationship id: the
//! style table is always `rId1` and the sheet at position `i` (0-based, in
//! tab order) is `rId{i+2}` with `sheetId` `i+1` and part name
//! `xl/worksheets/sheet{i+1}.xml`.

use crate::common::Result;
use crate::common::xml::escape_xml;
use std::fmt::Write as FmtWrite;
use std::io::{Seek, Write};
use zip::write::{SimpleFileOptions, StreamWriter, ZipWriter};

/// Content types used by the package.
pub mod content_type {
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const SML_SHEET_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
    pub const SML_WORKSHEET: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
    pub const SML_STYLES: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";
}

/// Relationship types used by the package.
pub mod relationship_type {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const WORKSHEET: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
}

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub const ROOT_RELS_PART: &str = "_rels/.rels";
pub const WORKBOOK_PART: &str = "xl/workbook.xml";
pub const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
pub const STYLES_PART: &str = "xl/styles.xml";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const RELATIONSHIPS_START: &str =
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#;

/// Part name of the worksheet at 0-based position `index`.
pub fn worksheet_part_name(index: usize) -> String {
    format!("xl/worksheets/sheet{}.xml", index + 1)
}

/// Compression applied to every part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    Deflated,
    Stored,
}

/// Container settings for a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
    pub compression: Compression,
    /// Deflate level; the zip crate's default when `None`
    pub compression_level: Option<i64>,
}

impl WriteOptions {
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn compression_level(mut self, level: i64) -> Self {
        self.compression_level = Some(level);
        self
    }

    fn file_options(&self) -> SimpleFileOptions {
        match self.compression {
            Compression::Deflated => SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated)
                .compression_level(self.compression_level),
            Compression::Stored => {
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored)
            },
        }
    }
}

/// Generate [Content_Types].xml for a workbook with `sheet_count` sheets.
pub fn content_types_xml(sheet_count: usize) -> Result<String> {
    let mut xml = String::with_capacity(1024 + 160 * sheet_count);
    xml.push_str(XML_DECLARATION);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    write!(
        xml,
        r#"<Default Extension="rels" ContentType="{}"/>"#,
        content_type::RELATIONSHIPS
    )?;
    write!(xml, r#"<Default Extension="xml" ContentType="{}"/>"#, content_type::XML)?;
    write!(
        xml,
        r#"<Override PartName="/{}" ContentType="{}"/>"#,
        WORKBOOK_PART,
        content_type::SML_SHEET_MAIN
    )?;
    write!(
        xml,
        r#"<Override PartName="/{}" ContentType="{}"/>"#,
        STYLES_PART,
        content_type::SML_STYLES
    )?;
    for index in 0..sheet_count {
        write!(
            xml,
            r#"<Override PartName="/{}" ContentType="{}"/>"#,
            worksheet_part_name(index),
            content_type::SML_WORKSHEET
        )?;
    }
    xml.push_str("</Types>");
    Ok(xml)
}

/// Generate the root _rels/.rels file.
pub fn root_rels_xml() -> Result<String> {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECLARATION);
    xml.push_str(RELATIONSHIPS_START);
    write!(
        xml,
        r#"<Relationship Id="rId1" Type="{}" Target="{}"/>"#,
        relationship_type::OFFICE_DOCUMENT,
        WORKBOOK_PART
    )?;
    xml.push_str("</Relationships>");
    Ok(xml)
}

/// Generate xl/workbook.xml listing `sheet_names` in tab order.
pub fn workbook_xml<S: AsRef<str>>(sheet_names: &[S]) -> Result<String> {
    let mut xml = String::with_capacity(1024 + 96 * sheet_names.len());

    xml.push_str(XML_DECLARATION);
    xml.push_str(r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#);
    xml.push_str(
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );
    xml.push_str(r#"<bookViews><workbookView activeTab="0"/></bookViews>"#);

    xml.push_str("<sheets>");
    for (index, name) in sheet_names.iter().enumerate() {
        write!(
            xml,
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape_xml(name.as_ref()),
            index + 1,
            index + 2
        )?;
    }
    xml.push_str("</sheets>");

    // Formulas without cached results are evaluated when the file is opened.
    xml.push_str(r#"<calcPr calcId="124519" fullCalcOnLoad="1"/>"#);
    xml.push_str("</workbook>");
    Ok(xml)
}

/// Generate xl/_rels/workbook.xml.rels.
pub fn workbook_rels_xml(sheet_count: usize) -> Result<String> {
    let mut xml = String::with_capacity(512 + 160 * sheet_count);
    xml.push_str(XML_DECLARATION);
    xml.push_str(RELATIONSHIPS_START);
    write!(
        xml,
        r#"<Relationship Id="rId1" Type="{}" Target="styles.xml"/>"#,
        relationship_type::STYLES
    )?;
    for index in 0..sheet_count {
        write!(
            xml,
            r#"<Relationship Id="rId{}" Type="{}" Target="worksheets/sheet{}.xml"/>"#,
            index + 2,
            relationship_type::WORKSHEET,
            index + 1
        )?;
    }
    xml.push_str("</Relationships>");
    Ok(xml)
}

/// ZIP container receiving the package parts.
pub(crate) struct PackageWriter<W: Write + Seek> {
    zip_writer: ZipWriter<W>,
    options: WriteOptions,
}

impl<W: Write + Seek> PackageWriter<W> {
    pub(crate) fn new(sink: W, options: &WriteOptions) -> Self {
        Self {
            zip_writer: ZipWriter::new(sink),
            options: *options,
        }
    }

    /// Add a complete part.
    pub(crate) fn add_part(&mut self, name: &str, content: &[u8]) -> Result<()> {
        self.zip_writer.start_file(name, self.options.file_options())?;
        self.zip_writer.write_all(content)?;
        log::debug!("wrote part {} ({} bytes)", name, content.len());
        Ok(())
    }

    /// Open a part to be filled with [`write_chunk`](Self::write_chunk).
    pub(crate) fn start_part(&mut self, name: &str) -> Result<()> {
        self.zip_writer.start_file(name, self.options.file_options())?;
        log::debug!("started part {}", name);
        Ok(())
    }

    /// Append to the part opened last.
    pub(crate) fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        self.zip_writer.write_all(chunk)?;
        Ok(())
    }

    /// Write the four manifest parts for the given sheets.
    pub(crate) fn add_manifests<S: AsRef<str>>(&mut self, sheet_names: &[S]) -> Result<()> {
        self.add_part(CONTENT_TYPES_PART, content_types_xml(sheet_names.len())?.as_bytes())?;
        self.add_part(ROOT_RELS_PART, root_rels_xml()?.as_bytes())?;
        self.add_part(WORKBOOK_PART, workbook_xml(sheet_names)?.as_bytes())?;
        self.add_part(
            WORKBOOK_RELS_PART,
            workbook_rels_xml(sheet_names.len())?.as_bytes(),
        )?;
        Ok(())
    }

    /// Write the ZIP central directory and hand back the sink.
    pub(crate) fn finish(self) -> Result<W> {
        Ok(self.zip_writer.finish()?)
    }
}

impl<W: Write> PackageWriter<StreamWriter<W>> {
    /// Container over a forward-only sink. Entry sizes go into data
    /// descriptors after each part instead of being patched into the
    /// local headers.
    pub(crate) fn new_stream(sink: W, options: &WriteOptions) -> Self {
        Self {
            zip_writer: ZipWriter::new_stream(sink),
            options: *options,
        }
    }
}
