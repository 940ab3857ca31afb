//! Core domain types, conversion rules, format routing, and the
//! PDF text to Markdown classifier.

pub mod error;
pub mod markdown;
pub mod router;
pub mod rules;
pub mod types;
pub mod worker;

pub use error::{AdapterError, Error, Result};
pub use markdown::{BomPolicy, ClassifierConfig, LineKind, MarkdownClassifier};
pub use router::{Adapter, ConversionJob, ConversionMethod, ConversionReport, Router};
pub use rules::{ConversionRules, RulesError};
pub use types::{ConversionRequest, FileFormat, FormatCategory};
pub use worker::ConversionHandle;
