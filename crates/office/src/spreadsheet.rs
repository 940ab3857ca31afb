//! Conversions between CSV, XLSX and XLS, and tables to PDF.

use crate::error::{OfficeError, Result};
use crate::table::{read_table, write_csv};
use crate::xlsx::write_xlsx;
use fconv_core::{Adapter, AdapterError, ConversionJob, FileFormat};
use fconv_pdf::{PageSetup, ParagraphStyle, PdfBuilder, TableStyle};
use std::fs;
use std::path::Path;

const DEFAULT_TITLE: &str = "Data Table";

/// Re-serializes tabular data between formats.
///
/// Only the first worksheet of a workbook is read.
#[derive(Debug, Clone)]
pub struct SpreadsheetAdapter {
    title: String,
    page: PageSetup,
    table_style: TableStyle,
}

impl SpreadsheetAdapter {
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            page: PageSetup::LETTER,
            table_style: TableStyle::spreadsheet(),
        }
    }

    /// Title printed above the table in PDF output.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_page_setup(mut self, page: PageSetup) -> Self {
        self.page = page;
        self
    }

    /// Render a grid as a titled PDF table. The first row is the header.
    pub fn table_to_pdf(&self, rows: &[Vec<String>], output: &Path) -> Result<()> {
        let mut builder = PdfBuilder::new(self.page);
        builder.paragraph(&self.title, &ParagraphStyle::title())?;
        builder.spacer(12.0);
        builder.table(rows, &self.table_style)?;

        fs::write(output, builder.finish()?)?;
        Ok(())
    }

    fn run(&self, job: &ConversionJob<'_>) -> Result<()> {
        let unsupported = || OfficeError::UnsupportedConversion {
            from: job.source_format.to_string(),
            to: job.target.to_string(),
        };

        if !matches!(
            job.source_format,
            FileFormat::Csv | FileFormat::Xlsx | FileFormat::Xls
        ) {
            return Err(unsupported());
        }

        let rows = read_table(job.source, job.source_format)?;
        log::debug!(
            "Read {} rows from {}",
            rows.len(),
            job.source.display()
        );

        match job.target {
            FileFormat::Xlsx => write_xlsx(job.output, &rows),
            FileFormat::Csv => write_csv(job.output, &rows),
            FileFormat::Pdf => self.table_to_pdf(&rows, job.output),
            _ => Err(unsupported()),
        }
    }
}

impl Default for SpreadsheetAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapter for SpreadsheetAdapter {
    fn convert(&self, job: &ConversionJob<'_>) -> std::result::Result<(), AdapterError> {
        self.run(job)?;
        Ok(())
    }
}
