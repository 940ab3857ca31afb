//! Error types for the office backend.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, OfficeError>;

/// Errors raised while reading or writing office documents and tables.
#[derive(Error, Debug)]
pub enum OfficeError {
    /// Failed to read or write a file.
    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),

    /// The ZIP container could not be read or written.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A package part is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A required part is missing from the package.
    #[error("Package part not found: {0}")]
    MissingPart(String),

    /// CSV data could not be parsed or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The workbook could not be read.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// The workbook contains no worksheet.
    #[error("Workbook has no worksheets: {0}")]
    EmptyWorkbook(PathBuf),

    /// Rendering to PDF or reading a PDF failed.
    #[error(transparent)]
    Pdf(#[from] fconv_pdf::PdfError),

    /// This backend has no conversion between the two formats.
    #[error("Cannot convert {from} to {to}")]
    UnsupportedConversion { from: String, to: String },
}
