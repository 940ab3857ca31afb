//! Office document and spreadsheet backend for file conversion.
//!
//! Handles PDF <-> DOCX through plain text and tables, and moves tabular
//! data between CSV, XLSX, XLS and PDF.

pub mod document;
pub mod docx;
pub mod error;
mod package;
pub mod spreadsheet;
pub mod table;
pub mod xlsx;

pub use document::DocumentAdapter;
pub use docx::{read_docx, DocxBlock, DocxWriter};
pub use error::{OfficeError, Result};
pub use spreadsheet::SpreadsheetAdapter;
pub use table::{read_table, write_csv};
pub use xlsx::write_xlsx;
