//! File conversion between document, image and spreadsheet formats.
//!
//! Brings the backends together behind one [`Router`]:
//!
//! ```no_run
//! let router = fconv::default_router();
//! let report = router.convert("report.csv", "out/report.xlsx", "XLSX")?;
//! println!("{:?}", report.method);
//! # Ok::<(), fconv::Error>(())
//! ```

pub mod settings;

pub use fconv_core::{
    BomPolicy, ClassifierConfig, ConversionHandle, ConversionMethod, ConversionReport,
    ConversionRequest, ConversionRules, Error, FileFormat, FormatCategory, Result, Router,
};
pub use fconv_core::worker;
pub use settings::{Settings, SettingsError};

/// A router with the built-in rule table and default backend settings.
pub fn default_router() -> Router {
    Settings::default().router()
}

#[cfg(test)]
mod tests;
