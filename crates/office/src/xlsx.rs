//! Minimal XLSX writer: one worksheet, values only.

use crate::error::Result;
use crate::package::{write_package, xml_text, XML_DECLARATION};
use crate::table::format_number;
use std::fs;
use std::path::Path;

const SHEET_NAME: &str = "Sheet1";

const CONTENT_TYPES: &str = r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#;

/// Write `rows` as the only worksheet of a new workbook at `path`.
pub fn write_xlsx(path: &Path, rows: &[Vec<String>]) -> Result<()> {
    fs::write(path, xlsx_bytes(rows)?)?;
    Ok(())
}

/// Serialize `rows` as a single-sheet workbook.
///
/// Cells whose text is a plain number (one that formats back to the same
/// text) are stored as numbers; everything else as inline strings. Empty
/// cells are omitted.
pub fn xlsx_bytes(rows: &[Vec<String>]) -> Result<Vec<u8>> {
    let workbook = format!(
        r#"{}<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        XML_DECLARATION, SHEET_NAME
    );

    let parts = [
        ("[Content_Types].xml", format!("{}{}", XML_DECLARATION, CONTENT_TYPES)),
        ("_rels/.rels", format!("{}{}", XML_DECLARATION, PACKAGE_RELS)),
        ("xl/workbook.xml", workbook),
        ("xl/_rels/workbook.xml.rels", format!("{}{}", XML_DECLARATION, WORKBOOK_RELS)),
        ("xl/styles.xml", format!("{}{}", XML_DECLARATION, STYLES)),
        ("xl/worksheets/sheet1.xml", sheet_xml(rows)),
    ];
    write_package(&parts)
}

fn sheet_xml(rows: &[Vec<String>]) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#);

    for (r, row) in rows.iter().enumerate() {
        let row_number = r + 1;
        xml.push_str(&format!(r#"<row r="{}">"#, row_number));

        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let reference = format!("{}{}", column_name(c), row_number);
            match as_number(value) {
                Some(_) => {
                    xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, value));
                }
                None => {
                    xml.push_str(&format!(
                        r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                        reference,
                        xml_text(value)
                    ));
                }
            }
        }

        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

/// The numeric value of `text` if storing it as a number loses nothing.
fn as_number(text: &str) -> Option<f64> {
    let value: f64 = text.parse().ok()?;
    (value.is_finite() && format_number(value) == text).then_some(value)
}

/// Spreadsheet column letters for a zero-based index: 0 -> A, 26 -> AA.
fn column_name(index: usize) -> String {
    let mut name = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        name.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}
