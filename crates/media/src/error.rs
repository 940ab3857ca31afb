//! Error types for the image backend.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, MediaError>;

/// Errors raised while decoding, encoding or embedding images.
#[derive(Error, Debug)]
pub enum MediaError {
    /// Failed to read or write a file.
    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),

    /// The image could not be decoded or encoded.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Embedding the image in a PDF failed.
    #[error(transparent)]
    Pdf(#[from] fconv_pdf::PdfError),

    /// The target is not an image format this backend writes.
    #[error("Cannot write an image as {0}")]
    UnsupportedTarget(String),
}
