//! Image backend for file conversion.
//!
//! Re-encodes between JPG, PNG, GIF, BMP, TIFF and WEBP, flattening
//! transparency where the target cannot store it, and lays out a single
//! image on a PDF page.

pub mod adapter;
pub mod encode;
pub mod error;

pub use adapter::ImageAdapter;
pub use encode::{encode, flatten_alpha};
pub use error::{MediaError, Result};
