//! Per-page text extraction.

use crate::error::Result;
use lopdf::Document;
use std::path::Path;

/// Extract the text of every page, in page order.
///
/// A page without text yields an empty string. Text objects end with a
/// newline, so each line drawn separately comes back on its own line.
pub fn extract_pages(path: &Path) -> Result<Vec<String>> {
    let document = Document::load(path)?;
    let pages = document.get_pages();

    if pages.is_empty() {
        log::warn!("{} has no pages", path.display());
    }

    let mut texts = Vec::with_capacity(pages.len());
    for number in pages.keys() {
        let text = document.extract_text(&[*number])?;
        texts.push(text);
    }

    log::debug!("Extracted text from {} pages of {}", texts.len(), path.display());
    Ok(texts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::{PageSetup, ParagraphStyle, PdfBuilder};

    #[test]
    fn test_extract_pages_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("two.pdf");

        let mut builder = PdfBuilder::new(PageSetup::LETTER);
        builder.paragraph("Hello World", &ParagraphStyle::normal()).unwrap();
        builder.page_break().unwrap();
        builder.paragraph("Second Page", &ParagraphStyle::normal()).unwrap();
        std::fs::write(&path, builder.finish().unwrap()).unwrap();

        let pages = extract_pages(&path).unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("Hello World"));
        assert!(pages[1].contains("Second Page"));
    }

    #[test]
    fn test_not_a_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.pdf");
        std::fs::write(&path, b"plain text").unwrap();

        assert!(extract_pages(&path).is_err());
    }
}
