//! User configuration, loaded from JSON.

use fconv_core::{
    BomPolicy, ClassifierConfig, ConversionRules, FormatCategory, MarkdownClassifier, Router,
};
use fconv_media::ImageAdapter;
use fconv_office::{DocumentAdapter, SpreadsheetAdapter};
use fconv_pdf::MarkdownAdapter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything configurable about a conversion run.
///
/// Every field is optional in JSON:
///
/// ```json
/// {
///   "rules": { "pdf": ["DOCX", "MD"], "png": ["JPG", "PDF"] },
///   "classifier": { "max_title_chars": 80, "prefix_numbered_items": true },
///   "bom": "never"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Replacement rule table; the built-in table when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<ConversionRules>,

    /// Thresholds for PDF to Markdown.
    pub classifier: ClassifierConfig,

    /// Byte-order mark on Markdown output.
    pub bom: BomPolicy,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn with_bom(mut self, bom: BomPolicy) -> Self {
        self.bom = bom;
        self
    }

    /// The rule table in effect.
    pub fn rules(&self) -> ConversionRules {
        self.rules.clone().unwrap_or_default()
    }

    /// Build a router with every backend registered.
    pub fn router(&self) -> Router {
        let classifier = MarkdownClassifier::new().with_config(self.classifier.clone());

        Router::new(self.rules())
            .with_adapter(FormatCategory::Image, ImageAdapter::new())
            .with_adapter(FormatCategory::Document, DocumentAdapter::new())
            .with_adapter(FormatCategory::Spreadsheet, SpreadsheetAdapter::new())
            .with_adapter(
                FormatCategory::Markdown,
                MarkdownAdapter::new()
                    .with_classifier(classifier)
                    .with_bom_policy(self.bom),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fconv_core::FileFormat;

    #[test]
    fn test_empty_json_is_default() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.rules(), ConversionRules::default());
    }

    #[test]
    fn test_partial_settings() {
        let settings = Settings::from_json(
            r#"{ "rules": { "png": ["JPG"] }, "classifier": { "h1_below": 20 }, "bom": "always" }"#,
        )
        .unwrap();

        assert_eq!(settings.bom, BomPolicy::Always);
        assert_eq!(settings.classifier.h1_below, 20);
        assert_eq!(settings.classifier.max_title_chars, 100);
        assert_eq!(settings.rules().targets_for("png"), &[FileFormat::Jpg]);
        assert!(settings.rules().targets_for("pdf").is_empty());
    }

    #[test]
    fn test_unknown_extension_in_rules_is_rejected() {
        let err = Settings::from_json(r#"{ "rules": { "exe": ["PDF"] } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fconv.json");
        fs::write(&path, r#"{ "bom": "never" }"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.bom, BomPolicy::Never);
        assert!(matches!(
            Settings::load(&dir.path().join("missing.json")),
            Err(SettingsError::Io(_))
        ));
    }

    #[test]
    fn test_router_uses_configured_rules() {
        let settings = Settings::from_json(r#"{ "rules": { "csv": ["XLSX"] } }"#).unwrap();
        let router = settings.router();
        assert_eq!(router.rules().targets_for("csv"), &[FileFormat::Xlsx]);
    }
}
