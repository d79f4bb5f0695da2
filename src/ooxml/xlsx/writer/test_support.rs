//! Helpers to read written workbooks back.
//!
//! Cell values go through calamine, an independent xlsx reader. The small
//! quick-xml reader below covers what calamine does not expose: archive
//! layout, raw parts and the fonts and number formats behind each cell.

use calamine::{Data, Xlsx};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::io::{Cursor, Read};

/// One `<c>` element as read back.
#[derive(Debug, Clone, Default)]
pub(crate) struct CellRecord {
    pub cell_type: Option<String>,
    pub style: usize,
    /// Content of `<v>`
    pub value: Option<String>,
    /// Content of the inline string `<t>`
    pub text: Option<String>,
    pub formula: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FontRecord {
    pub bold: bool,
    pub italic: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct XfRecord {
    num_fmt_id: u32,
    font_id: usize,
}

/// Parsed view of a written package.
#[derive(Debug, Default)]
pub(crate) struct ReadBack {
    /// ZIP entries in archive order
    pub part_names: Vec<String>,
    /// Sheet names in workbook order
    pub sheet_names: Vec<String>,
    parts: HashMap<String, String>,
    cells: HashMap<String, HashMap<String, CellRecord>>,
    fonts: Vec<FontRecord>,
    cell_xfs: Vec<XfRecord>,
    num_fmts: HashMap<u32, String>,
}

impl ReadBack {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut read = ReadBack::default();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).unwrap();
            let mut content = String::new();
            entry.read_to_string(&mut content).unwrap();
            read.part_names.push(entry.name().to_string());
            read.parts.insert(entry.name().to_string(), content);
        }

        let targets = read.relationship_targets();
        if let Some(workbook) = read.part("xl/workbook.xml") {
            let sheets = elements(workbook, b"sheet");
            for attrs in sheets {
                let name = attrs["name"].clone();
                let part = format!("xl/{}", targets[&attrs["id"]]);
                let cells = read.part(&part).map(parse_cells).unwrap_or_default();
                read.cells.insert(name.clone(), cells);
                read.sheet_names.push(name);
            }
        }
        if let Some(styles) = read.part("xl/styles.xml") {
            let (fonts, cell_xfs, num_fmts) = parse_styles(styles);
            read.fonts = fonts;
            read.cell_xfs = cell_xfs;
            read.num_fmts = num_fmts;
        }
        read
    }

    pub fn part(&self, name: &str) -> Option<&str> {
        self.parts.get(name).map(String::as_str)
    }

    pub fn cell(&self, sheet: &str, reference: &str) -> Option<&CellRecord> {
        self.cells.get(sheet)?.get(reference)
    }

    pub fn font_of(&self, cell: &CellRecord) -> FontRecord {
        let xf = self.cell_xfs[cell.style];
        self.fonts[xf.font_id]
    }

    /// Custom number format code of a cell, `None` for builtin formats.
    pub fn number_format_of(&self, cell: &CellRecord) -> Option<String> {
        let xf = self.cell_xfs[cell.style];
        self.num_fmts.get(&xf.num_fmt_id).cloned()
    }

    fn relationship_targets(&self) -> HashMap<String, String> {
        self.part("xl/_rels/workbook.xml.rels")
            .map(|rels| {
                elements(rels, b"Relationship")
                    .into_iter()
                    .map(|attrs| (attrs["Id"].clone(), attrs["Target"].clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Open written bytes with calamine.
pub(crate) fn open_with_calamine(bytes: &[u8]) -> Xlsx<Cursor<Vec<u8>>> {
    calamine::open_workbook_from_rs(Cursor::new(bytes.to_vec())).unwrap()
}

/// Serial of a date cell as calamine reports it.
pub(crate) fn date_serial(data: &Data) -> f64 {
    match data {
        Data::DateTime(date) => date.as_f64(),
        Data::Float(serial) => *serial,
        other => panic!("not a date cell: {:?}", other),
    }
}

/// Calendar time of a serial date, to the millisecond.
pub(crate) fn serial_to_datetime(serial: f64) -> NaiveDateTime {
    // Serial 60 is the nonexistent 1900-02-29
    let base = if serial < 61.0 {
        NaiveDate::from_ymd_opt(1899, 12, 31).unwrap()
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30).unwrap()
    };
    let millis = (serial * 86_400_000.0).round() as i64;
    base.and_hms_opt(0, 0, 0).unwrap() + Duration::milliseconds(millis)
}

fn attributes(e: &BytesStart<'_>) -> HashMap<String, String> {
    e.attributes()
        .flatten()
        .map(|attr| {
            let key = String::from_utf8(attr.key.local_name().as_ref().to_vec()).unwrap();
            (key, attr.unescape_value().unwrap().to_string())
        })
        .collect()
}

/// Attributes of every element with the given local name.
fn elements(xml: &str, name: &[u8]) -> Vec<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut found = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).unwrap() {
            Event::Start(ref e) | Event::Empty(ref e) if e.local_name().as_ref() == name => {
                found.push(attributes(e));
            },
            Event::Eof => break,
            _ => {},
        }
        buf.clear();
    }
    found
}

fn parse_cells(xml: &str) -> HashMap<String, CellRecord> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut cells = HashMap::new();
    let mut current: Option<(String, CellRecord)> = None;
    let mut in_text = false;
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf).unwrap() {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"c" => current = Some(cell_start(e)),
                b"v" | b"t" | b"f" => {
                    in_text = true;
                    text.clear();
                },
                _ => {},
            },
            Event::Empty(ref e) if e.local_name().as_ref() == b"c" => {
                let (reference, record) = cell_start(e);
                cells.insert(reference, record);
            },
            Event::Text(ref t) if in_text => {
                text.push_str(&String::from_utf8(t.to_vec()).unwrap());
            },
            Event::GeneralRef(ref r) if in_text => {
                text.push(match &**r {
                    b"amp" => '&',
                    b"lt" => '<',
                    b"gt" => '>',
                    b"quot" => '"',
                    b"apos" => '\'',
                    _ => char::REPLACEMENT_CHARACTER,
                });
            },
            Event::End(ref e) => match e.local_name().as_ref() {
                b"c" => {
                    if let Some((reference, record)) = current.take() {
                        cells.insert(reference, record);
                    }
                },
                tag @ (b"v" | b"t" | b"f") => {
                    if let Some((_, record)) = current.as_mut() {
                        let value = Some(std::mem::take(&mut text));
                        match tag {
                            b"v" => record.value = value,
                            b"t" => record.text = value,
                            _ => record.formula = value,
                        }
                    }
                    in_text = false;
                },
                _ => {},
            },
            Event::Eof => break,
            _ => {},
        }
        buf.clear();
    }
    cells
}

fn cell_start(e: &BytesStart<'_>) -> (String, CellRecord) {
    let attrs = attributes(e);
    let record = CellRecord {
        cell_type: attrs.get("t").cloned(),
        style: attrs.get("s").map_or(0, |s| s.parse().unwrap()),
        ..CellRecord::default()
    };
    (attrs["r"].clone(), record)
}

fn parse_styles(xml: &str) -> (Vec<FontRecord>, Vec<XfRecord>, HashMap<u32, String>) {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut fonts = Vec::new();
    let mut cell_xfs = Vec::new();
    let mut num_fmts = HashMap::new();
    let mut in_cell_xfs = false;

    loop {
        match reader.read_event_into(&mut buf).unwrap() {
            Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                b"numFmt" => {
                    let attrs = attributes(e);
                    num_fmts.insert(
                        attrs["numFmtId"].parse().unwrap(),
                        attrs["formatCode"].clone(),
                    );
                },
                b"font" => fonts.push(FontRecord::default()),
                b"b" => {
                    if let Some(font) = fonts.last_mut() {
                        font.bold = true;
                    }
                },
                b"i" => {
                    if let Some(font) = fonts.last_mut() {
                        font.italic = true;
                    }
                },
                b"cellXfs" => in_cell_xfs = true,
                b"xf" if in_cell_xfs => {
                    let attrs = attributes(e);
                    cell_xfs.push(XfRecord {
                        num_fmt_id: attrs["numFmtId"].parse().unwrap(),
                        font_id: attrs["fontId"].parse().unwrap(),
                    });
                },
                _ => {},
            },
            Event::End(ref e) if e.local_name().as_ref() == b"cellXfs" => in_cell_xfs = false,
            Event::Eof => break,
            _ => {},
        }
        buf.clear();
    }
    (fonts, cell_xfs, num_fmts)
}
