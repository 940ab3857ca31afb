//! Error types for the PDF backend.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Errors raised while reading or writing PDF files.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to read or write a file.
    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),

    /// The PDF structure could not be parsed or serialized.
    #[error("PDF error: {0}")]
    Lopdf(#[from] lopdf::Error),

    /// Image data does not match its declared dimensions.
    #[error("Invalid image data: expected {expected} bytes, got {actual}")]
    ImageData { expected: usize, actual: usize },

    /// Text extracted from a PDF can only be written as Markdown here.
    #[error("Cannot write PDF text as {0}")]
    UnsupportedTarget(String),
}
