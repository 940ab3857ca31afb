//! PDF backend for file conversion.
//!
//! Writes simple flowing documents (paragraphs, tables, images) with
//! `lopdf` and extracts per-page text for the PDF to DOCX and PDF to
//! Markdown routes.

pub mod error;
pub mod extract;
pub mod markdown;
pub mod metrics;
pub mod writer;

pub use error::{PdfError, Result};
pub use extract::extract_pages;
pub use markdown::MarkdownAdapter;
pub use writer::{
    wrap_text, Align, Color, Font, PageSetup, ParagraphStyle, PdfBuilder, RawImage, TableStyle, INCH,
};
