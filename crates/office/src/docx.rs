//! DOCX body reading and writing.
//!
//! Only the document body matters here: paragraph text, tables as grids of
//! cell text, and explicit page breaks. Formatting is neither read nor
//! written.

use crate::error::Result;
use crate::package::{local_name, read_part, write_package, xml_text, XML_DECLARATION};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::{self, File};
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

const CONTENT_TYPES: &str = r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// US Letter with 1-inch margins, in twentieths of a point.
const SECTION: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#;

/// A top-level element of a document body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocxBlock {
    /// Paragraph text; line breaks inside the paragraph are `'\n'`.
    Paragraph(String),
    /// Table rows of cell text. Paragraphs within a cell are joined with `'\n'`.
    Table(Vec<Vec<String>>),
    PageBreak,
}

/// Read the body of the DOCX file at `path`.
pub fn read_docx(path: &Path) -> Result<Vec<DocxBlock>> {
    let file = File::open(path)?;
    read_docx_from(BufReader::new(file))
}

/// Read a DOCX body from any seekable reader.
pub fn read_docx_from<R: Read + Seek>(reader: R) -> Result<Vec<DocxBlock>> {
    let mut archive = ZipArchive::new(reader)?;
    let xml = read_part(&mut archive, DOCUMENT_PART)?;
    parse_body(&xml)
}

/// Parse `word/document.xml` into body blocks, in document order.
pub fn parse_body(xml: &str) -> Result<Vec<DocxBlock>> {
    let mut reader = Reader::from_str(xml);
    // Whitespace inside w:t is significant.
    reader.trim_text(false);

    let mut blocks = Vec::new();
    // Open paragraphs; text boxes nest a w:p inside another.
    let mut paragraphs: Vec<String> = Vec::new();
    let mut in_text = false;
    let mut page_break = false;

    // Nesting depth of w:tbl; only the outermost table forms rows and cells.
    let mut table_depth = 0usize;
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"tbl" => {
                        table_depth += 1;
                        if table_depth == 1 {
                            rows.clear();
                        }
                    }
                    b"tr" if table_depth == 1 => row.clear(),
                    b"tc" if table_depth == 1 => cell = Some(String::new()),
                    b"p" => {
                        if paragraphs.is_empty() {
                            page_break = false;
                        }
                        paragraphs.push(String::new());
                    }
                    b"t" => in_text = true,
                    _ => {}
                }
            }
            Event::Empty(ref e) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"tab" => push_open(&mut paragraphs, "\t"),
                    b"cr" => push_open(&mut paragraphs, "\n"),
                    b"br" => {
                        if is_page_break(e) {
                            page_break = true;
                        } else {
                            push_open(&mut paragraphs, "\n");
                        }
                    }
                    b"p" if table_depth == 0 && paragraphs.is_empty() => {
                        blocks.push(DocxBlock::Paragraph(String::new()))
                    }
                    b"tc" if table_depth == 1 => row.push(String::new()),
                    _ => {}
                }
            }
            Event::Text(ref e) => {
                if in_text {
                    push_open(&mut paragraphs, &e.unescape()?);
                }
            }
            Event::End(ref e) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"t" => in_text = false,
                    b"p" => {
                        let text = paragraphs.pop().unwrap_or_default();
                        if let Some(outer) = paragraphs.last_mut() {
                            if !outer.is_empty() && !text.is_empty() {
                                outer.push('\n');
                            }
                            outer.push_str(&text);
                            continue;
                        }
                        match cell.as_mut() {
                            Some(cell) if table_depth > 0 => {
                                if !cell.is_empty() && !text.is_empty() {
                                    cell.push('\n');
                                }
                                cell.push_str(&text);
                            }
                            _ => {
                                if !text.is_empty() || !page_break {
                                    blocks.push(DocxBlock::Paragraph(text));
                                }
                                if page_break {
                                    blocks.push(DocxBlock::PageBreak);
                                }
                            }
                        }
                        page_break = false;
                    }
                    b"tc" if table_depth == 1 => {
                        row.push(cell.take().unwrap_or_default());
                    }
                    b"tr" if table_depth == 1 => rows.push(std::mem::take(&mut row)),
                    b"tbl" => {
                        table_depth = table_depth.saturating_sub(1);
                        if table_depth == 0 {
                            blocks.push(DocxBlock::Table(std::mem::take(&mut rows)));
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    log::debug!("Parsed {} body blocks", blocks.len());
    Ok(blocks)
}

fn push_open(paragraphs: &mut [String], text: &str) {
    if let Some(paragraph) = paragraphs.last_mut() {
        paragraph.push_str(text);
    }
}

fn is_page_break(e: &BytesStart) -> bool {
    e.attributes()
        .flatten()
        .any(|attr| local_name(attr.key.as_ref()) == b"type" && attr.value.as_ref() == b"page")
}

/// Builds a minimal DOCX document.
#[derive(Debug, Clone, Default)]
pub struct DocxWriter {
    blocks: Vec<DocxBlock>,
}

impl DocxWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a paragraph. `'\n'` becomes a line break within it.
    pub fn paragraph(&mut self, text: &str) -> &mut Self {
        self.blocks.push(DocxBlock::Paragraph(text.to_string()));
        self
    }

    pub fn page_break(&mut self) -> &mut Self {
        self.blocks.push(DocxBlock::PageBreak);
        self
    }

    /// Append a table of plain cell text.
    pub fn table(&mut self, rows: Vec<Vec<String>>) -> &mut Self {
        self.blocks.push(DocxBlock::Table(rows));
        self
    }

    pub fn blocks(&self) -> &[DocxBlock] {
        &self.blocks
    }

    /// Serialize the package.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let parts = [
            ("[Content_Types].xml", format!("{}{}", XML_DECLARATION, CONTENT_TYPES)),
            ("_rels/.rels", format!("{}{}", XML_DECLARATION, PACKAGE_RELS)),
            (DOCUMENT_PART, self.document_xml()),
        ];
        write_package(&parts)
    }

    /// Write the package to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    fn document_xml(&self) -> String {
        let mut xml = String::from(XML_DECLARATION);
        xml.push_str(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
        );

        for block in &self.blocks {
            match block {
                DocxBlock::Paragraph(text) => push_paragraph(&mut xml, text),
                DocxBlock::PageBreak => xml.push_str(r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#),
                DocxBlock::Table(rows) => push_table(&mut xml, rows),
            }
        }

        xml.push_str(SECTION);
        xml.push_str("</w:body></w:document>");
        xml
    }
}

fn push_paragraph(xml: &mut String, text: &str) {
    xml.push_str("<w:p>");
    if !text.is_empty() {
        xml.push_str("<w:r>");
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                xml.push_str("<w:br/>");
            }
            let line = line.strip_suffix('\r').unwrap_or(line);
            if !line.is_empty() {
                xml.push_str(r#"<w:t xml:space="preserve">"#);
                xml.push_str(&xml_text(line));
                xml.push_str("</w:t>");
            }
        }
        xml.push_str("</w:r>");
    }
    xml.push_str("</w:p>");
}

fn push_table(xml: &mut String, rows: &[Vec<String>]) {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return;
    }

    xml.push_str(r#"<w:tbl><w:tblPr><w:tblW w:w="0" w:type="auto"/></w:tblPr><w:tblGrid>"#);
    for _ in 0..columns {
        xml.push_str("<w:gridCol/>");
    }
    xml.push_str("</w:tblGrid>");

    for row in rows {
        xml.push_str("<w:tr>");
        for column in 0..columns {
            xml.push_str("<w:tc>");
            push_paragraph(xml, row.get(column).map(String::as_str).unwrap_or(""));
            xml.push_str("</w:tc>");
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
}
