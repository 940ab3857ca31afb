//! Reading and writing Office Open XML packages (ZIP containers of XML parts).

use crate::error::{OfficeError, Result};
use std::io::{Cursor, Read, Seek, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub(crate) const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Read a part from the archive as UTF-8 text.
pub(crate) fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive.by_name(path).map_err(|e| match e {
        zip::result::ZipError::FileNotFound => OfficeError::MissingPart(path.to_string()),
        other => OfficeError::Zip(other),
    })?;

    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(content)
}

/// Zip the given `(path, xml)` parts, in order, into a package.
pub(crate) fn write_package(parts: &[(&str, String)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (path, content) in parts {
        zip.start_file(*path, options)?;
        zip.write_all(content.as_bytes())?;
    }

    Ok(zip.finish()?.into_inner())
}

/// Extract the local name from a potentially namespaced XML element name.
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Escape text for XML content, dropping characters XML 1.0 cannot carry.
pub(crate) fn xml_text(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|&c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect();
    quick_xml::escape::escape(cleaned.as_str()).into_owned()
}
