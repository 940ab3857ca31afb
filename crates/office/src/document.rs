//! PDF <-> DOCX conversion.

use crate::docx::{read_docx, DocxBlock, DocxWriter};
use crate::error::{OfficeError, Result};
use fconv_core::{Adapter, AdapterError, ConversionJob, FileFormat};
use fconv_pdf::{extract_pages, PageSetup, ParagraphStyle, PdfBuilder, TableStyle};
use std::fs;
use std::path::Path;

/// Space after each paragraph and table, in points.
const BLOCK_SPACING: f32 = 12.0;

/// Converts between PDF and DOCX through plain text and tables.
#[derive(Debug, Clone)]
pub struct DocumentAdapter {
    page: PageSetup,
    paragraph_style: ParagraphStyle,
    table_style: TableStyle,
}

impl DocumentAdapter {
    pub fn new() -> Self {
        Self {
            page: PageSetup::LETTER,
            paragraph_style: ParagraphStyle::normal(),
            table_style: TableStyle::document(),
        }
    }

    /// Page geometry for generated PDFs.
    pub fn with_page_setup(mut self, page: PageSetup) -> Self {
        self.page = page;
        self
    }

    pub fn with_table_style(mut self, style: TableStyle) -> Self {
        self.table_style = style;
        self
    }

    /// One paragraph per page with text, separated by page breaks.
    pub fn pdf_to_docx(&self, source: &Path, output: &Path) -> Result<()> {
        let pages = extract_pages(source)?;
        let mut writer = DocxWriter::new();

        for (index, text) in pages.iter().enumerate() {
            let text = text.trim_end();
            if !text.trim().is_empty() {
                writer.paragraph(text);
            }
            if index + 1 < pages.len() {
                writer.page_break();
            }
        }

        writer.save(output)?;
        log::debug!("Wrote {} pages of text to {}", pages.len(), output.display());
        Ok(())
    }

    /// Render the body of a DOCX file in document order.
    ///
    /// Blank paragraphs are skipped. Page breaks carry over.
    pub fn docx_to_pdf(&self, source: &Path, output: &Path) -> Result<()> {
        let blocks = read_docx(source)?;
        let mut builder = PdfBuilder::new(self.page);

        for block in &blocks {
            match block {
                DocxBlock::Paragraph(text) => {
                    if text.trim().is_empty() {
                        continue;
                    }
                    builder.paragraph(text, &self.paragraph_style)?;
                    builder.spacer(BLOCK_SPACING);
                }
                DocxBlock::Table(rows) => {
                    if rows.is_empty() {
                        continue;
                    }
                    builder.table(rows, &self.table_style)?;
                    builder.spacer(BLOCK_SPACING);
                }
                DocxBlock::PageBreak => builder.page_break()?,
            }
        }

        fs::write(output, builder.finish()?)?;
        Ok(())
    }
}

impl Default for DocumentAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapter for DocumentAdapter {
    fn convert(&self, job: &ConversionJob<'_>) -> std::result::Result<(), AdapterError> {
        match (job.source_format, job.target) {
            (FileFormat::Pdf, FileFormat::Docx) => self.pdf_to_docx(job.source, job.output)?,
            (FileFormat::Docx, FileFormat::Pdf) => self.docx_to_pdf(job.source, job.output)?,
            (from, to) => {
                return Err(OfficeError::UnsupportedConversion {
                    from: from.to_string(),
                    to: to.to_string(),
                }
                .into())
            }
        }
        Ok(())
    }
}
