//! Report serialization: a single-sheet XLSX workbook or a CSV file.

use crate::config::report_config::OutputFormat;
use crate::domain::model::{PublicationRow, ReportTable};
use crate::utils::error::Result;
use quick_xml::escape::escape;
use std::borrow::Cow;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const SHEET_NAME: &str = "Sheet1";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

// style 1 is the bold header font
const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/></cellXfs></styleSheet>"#;

enum Cell<'a> {
    Text(&'a str),
    Number(i64),
}

fn column_letter(index: usize) -> char {
    (b'A' + index as u8) as char
}

/// Drops characters outside the XML 1.0 `Char` production, such as stray control codes in titles.
fn xml_text(text: &str) -> Cow<'_, str> {
    let allowed = |c: char| {
        matches!(
            c,
            '\t' | '\n' | '\r' | ' '..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
        )
    };
    if text.chars().all(allowed) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| allowed(c)).collect())
    }
}

fn write_cell(xml: &mut String, reference: &str, cell: &Cell<'_>, style: Option<u8>) {
    let style_attr = style.map(|s| format!(r#" s="{}""#, s)).unwrap_or_default();
    match cell {
        Cell::Text(text) => {
            let text = xml_text(text);
            let space = if text.trim() != text {
                r#" xml:space="preserve""#
            } else {
                ""
            };
            xml.push_str(&format!(
                r#"<c r="{}" t="inlineStr"{}><is><t{}>{}</t></is></c>"#,
                reference,
                style_attr,
                space,
                escape(&*text)
            ));
        }
        Cell::Number(value) => {
            xml.push_str(&format!(
                r#"<c r="{}"{}><v>{}</v></c>"#,
                reference, style_attr, value
            ));
        }
    }
}

fn row_cells(row: &PublicationRow) -> [Cell<'_>; 4] {
    [
        Cell::Text(&row.faculty_name),
        Cell::Text(&row.paper_title),
        Cell::Number(row.citations as i64),
        Cell::Number(row.year as i64),
    ]
}

fn sheet_xml(table: &ReportTable) -> String {
    let last_ref = format!(
        "{}{}",
        column_letter(ReportTable::COLUMNS.len() - 1),
        table.len() + 1
    );
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );
    xml.push_str(&format!(r#"<dimension ref="A1:{}"/><sheetData>"#, last_ref));

    xml.push_str(r#"<row r="1">"#);
    for (col, header) in ReportTable::COLUMNS.iter().enumerate() {
        let reference = format!("{}1", column_letter(col));
        write_cell(&mut xml, &reference, &Cell::Text(header), Some(1));
    }
    xml.push_str("</row>");

    for (index, row) in table.rows.iter().enumerate() {
        let row_number = index + 2;
        xml.push_str(&format!(r#"<row r="{}">"#, row_number));
        for (col, cell) in row_cells(row).iter().enumerate() {
            let reference = format!("{}{}", column_letter(col), row_number);
            write_cell(&mut xml, &reference, cell, None);
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

fn workbook_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        SHEET_NAME
    )
}

/// Header row followed by one row per publication, as an Office Open XML workbook.
pub fn render_xlsx(table: &ReportTable) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let parts: [(&str, String); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
        ("_rels/.rels", ROOT_RELS_XML.to_string()),
        ("xl/workbook.xml", workbook_xml()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML.to_string()),
        ("xl/styles.xml", STYLES_XML.to_string()),
        ("xl/worksheets/sheet1.xml", sheet_xml(table)),
    ];

    for (name, content) in &parts {
        zip.start_file(*name, SimpleFileOptions::default())?;
        zip.write_all(content.as_bytes())?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

pub fn render_csv(table: &ReportTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    // serialize() only emits headers with the first row; write them explicitly for empty tables
    if table.is_empty() {
        writer.write_record(ReportTable::COLUMNS)?;
    }
    for row in &table.rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| crate::utils::error::ReportError::IoError(e.into_error()))
}

pub fn render(table: &ReportTable, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Xlsx => render_xlsx(table),
        OutputFormat::Csv => render_csv(table),
    }
}
