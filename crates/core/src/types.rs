//! Domain types for describing conversion requests and file formats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A single conversion request. Created per invocation, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// File to convert.
    pub source: PathBuf,

    /// Where the converted file is written.
    pub output: PathBuf,

    /// Requested target format token, e.g. "PDF" or "jpg".
    pub target: String,
}

impl ConversionRequest {
    /// Create a new request.
    pub fn new(
        source: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            target: target.into(),
        }
    }

    /// Lower-cased extension of the source path, without the dot.
    pub fn source_extension(&self) -> String {
        extension_of(&self.source)
    }
}

/// Lower-cased extension of a path, or an empty string when it has none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

/// Every file format the converter knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileFormat {
    Pdf,
    Docx,
    Md,
    #[serde(alias = "JPEG")]
    Jpg,
    Png,
    Gif,
    Bmp,
    Tiff,
    Webp,
    Csv,
    Xlsx,
    Xls,
}

impl FileFormat {
    /// All formats, in a stable order.
    pub const ALL: [FileFormat; 12] = [
        Self::Pdf,
        Self::Docx,
        Self::Md,
        Self::Jpg,
        Self::Png,
        Self::Gif,
        Self::Bmp,
        Self::Tiff,
        Self::Webp,
        Self::Csv,
        Self::Xlsx,
        Self::Xls,
    ];

    /// Detect format from a file extension (with or without the leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "md" => Some(Self::Md),
            "jpg" | "jpeg" => Some(Self::Jpg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "bmp" => Some(Self::Bmp),
            "tiff" => Some(Self::Tiff),
            "webp" => Some(Self::Webp),
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            _ => None,
        }
    }

    /// Detect format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        Self::from_extension(&extension_of(path))
    }

    /// Upper-case token used in the rule table and on the command line.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Md => "MD",
            Self::Jpg => "JPG",
            Self::Png => "PNG",
            Self::Gif => "GIF",
            Self::Bmp => "BMP",
            Self::Tiff => "TIFF",
            Self::Webp => "WEBP",
            Self::Csv => "CSV",
            Self::Xlsx => "XLSX",
            Self::Xls => "XLS",
        }
    }

    /// Canonical file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Md => "md",
            Self::Jpg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
            Self::Webp => "webp",
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Xls => "xls",
        }
    }

    /// The category this format belongs to when it is the source.
    pub fn category(&self) -> FormatCategory {
        match self {
            Self::Jpg | Self::Png | Self::Gif | Self::Bmp | Self::Tiff | Self::Webp => {
                FormatCategory::Image
            }
            Self::Pdf | Self::Docx => FormatCategory::Document,
            Self::Csv | Self::Xlsx | Self::Xls => FormatCategory::Spreadsheet,
            Self::Md => FormatCategory::Markdown,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for FileFormat {
    type Err = String;

    /// Parse a target token. Case-insensitive; "JPEG" is accepted for JPG.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_extension(s.trim()).ok_or_else(|| format!("unknown format '{}'", s))
    }
}

/// Broad family of formats, used to pick the adapter that handles a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatCategory {
    Image,
    Document,
    Spreadsheet,
    /// PDF text rendered as Markdown.
    Markdown,
}

impl FormatCategory {
    /// Pick the route for a source/target pair.
    ///
    /// A PDF source with an MD target goes through the Markdown classifier;
    /// everything else is handled by the source's own category.
    pub fn route(source: FileFormat, target: FileFormat) -> Self {
        if source == FileFormat::Pdf && target == FileFormat::Md {
            Self::Markdown
        } else {
            source.category()
        }
    }
}

impl fmt::Display for FormatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Image => "Image",
            Self::Document => "Document",
            Self::Spreadsheet => "Spreadsheet",
            Self::Markdown => "Markdown",
        };
        f.write_str(name)
    }
}
