//! PDF to Markdown conversion.

use crate::error::{PdfError, Result};
use crate::extract::extract_pages;
use fconv_core::{Adapter, AdapterError, BomPolicy, ConversionJob, FileFormat, MarkdownClassifier};
use std::fs;
use std::path::Path;

/// Renders the text of a PDF as Markdown, one section per page.
#[derive(Debug, Clone, Default)]
pub struct MarkdownAdapter {
    classifier: MarkdownClassifier,
    bom: BomPolicy,
}

impl MarkdownAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom line classifier.
    pub fn with_classifier(mut self, classifier: MarkdownClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Control the byte-order mark on written files.
    pub fn with_bom_policy(mut self, bom: BomPolicy) -> Self {
        self.bom = bom;
        self
    }

    /// Markdown for the PDF at `source`.
    pub fn render(&self, source: &Path) -> Result<String> {
        let pages = extract_pages(source)?;
        Ok(self.classifier.render_pages(&pages))
    }

    /// Convert `source` and write the Markdown to `output`.
    pub fn write(&self, source: &Path, output: &Path) -> Result<()> {
        let markdown = self.render(source)?;
        fs::write(output, self.bom.encode(&markdown))?;
        Ok(())
    }
}

impl Adapter for MarkdownAdapter {
    fn convert(&self, job: &ConversionJob<'_>) -> std::result::Result<(), AdapterError> {
        if job.target != FileFormat::Md {
            return Err(PdfError::UnsupportedTarget(job.target.to_string()).into());
        }
        self.write(job.source, job.output)?;
        Ok(())
    }
}
