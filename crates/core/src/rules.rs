//! The conversion rule table: which targets each source extension may produce.

use crate::types::FileFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while loading a rule table.
#[derive(Error, Debug)]
pub enum RulesError {
    /// The JSON document could not be parsed.
    #[error("Invalid rule table: {0}")]
    Json(#[from] serde_json::Error),

    /// A key does not name a known source format.
    #[error("Unknown source extension in rule table: '{0}'")]
    UnknownExtension(String),
}

/// Immutable mapping from lower-case source extension to its ordered targets.
///
/// Built once at startup and shared with the router; nothing else keeps an
/// allow-list of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Vec<FileFormat>>")]
#[serde(into = "BTreeMap<String, Vec<FileFormat>>")]
pub struct ConversionRules {
    rules: BTreeMap<String, Vec<FileFormat>>,
}

impl ConversionRules {
    /// Build a table from `(extension, targets)` pairs.
    ///
    /// Extensions are lower-cased and stripped of a leading dot; duplicate
    /// targets are dropped, keeping the first occurrence.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, RulesError>
    where
        I: IntoIterator<Item = (S, Vec<FileFormat>)>,
        S: AsRef<str>,
    {
        let mut rules = BTreeMap::new();

        for (ext, targets) in entries {
            let ext = normalize_extension(ext.as_ref());
            if FileFormat::from_extension(&ext).is_none() {
                return Err(RulesError::UnknownExtension(ext));
            }

            let mut unique: Vec<FileFormat> = Vec::with_capacity(targets.len());
            for target in targets {
                if !unique.contains(&target) {
                    unique.push(target);
                }
            }
            rules.insert(ext, unique);
        }

        Ok(Self { rules })
    }

    /// Parse a table from JSON such as `{"pdf": ["DOCX", "MD"]}`.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let raw: BTreeMap<String, Vec<FileFormat>> = serde_json::from_str(json)?;
        Self::from_entries(raw)
    }

    /// Ordered targets for an extension; empty when the extension is unknown.
    pub fn targets_for(&self, ext: &str) -> &[FileFormat] {
        self.rules
            .get(&normalize_extension(ext))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether the table allows converting `ext` into `target`.
    pub fn allows(&self, ext: &str, target: FileFormat) -> bool {
        self.targets_for(ext).contains(&target)
    }

    /// Every extension with at least one rule, sorted.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Iterate over `(extension, targets)` pairs, sorted by extension.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FileFormat])> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl Default for ConversionRules {
    fn default() -> Self {
        use FileFormat::*;

        let image_targets = vec![Jpg, Png, Gif, Bmp, Pdf];
        let entries = vec![
            ("pdf", vec![Docx, Md]),
            ("docx", vec![Pdf]),
            ("jpg", vec![Png, Gif, Bmp, Pdf]),
            ("jpeg", vec![Png, Gif, Bmp, Pdf]),
            ("png", vec![Jpg, Gif, Bmp, Pdf]),
            ("gif", vec![Jpg, Png, Bmp, Pdf]),
            ("bmp", vec![Jpg, Png, Gif, Pdf]),
            ("tiff", image_targets.clone()),
            ("webp", image_targets),
            ("csv", vec![Xlsx, Pdf]),
            ("xlsx", vec![Csv, Pdf]),
            ("xls", vec![Csv, Xlsx, Pdf]),
        ];

        let rules = entries
            .into_iter()
            .map(|(ext, targets)| (ext.to_string(), targets))
            .collect();
        Self { rules }
    }
}

impl TryFrom<BTreeMap<String, Vec<FileFormat>>> for ConversionRules {
    type Error = RulesError;

    fn try_from(raw: BTreeMap<String, Vec<FileFormat>>) -> Result<Self, Self::Error> {
        Self::from_entries(raw)
    }
}

impl From<ConversionRules> for BTreeMap<String, Vec<FileFormat>> {
    fn from(rules: ConversionRules) -> Self {
        rules.rules
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}
