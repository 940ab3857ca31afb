//! Tabular data as a grid of cell text.
//!
//! Every reader returns the first sheet (or the whole CSV file) as rows of
//! strings, header row included. Rows may differ in length.

use crate::error::{OfficeError, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use fconv_core::FileFormat;
use std::fs;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Read the grid of a CSV, XLSX or XLS file.
pub fn read_table(path: &Path, format: FileFormat) -> Result<Vec<Vec<String>>> {
    match format {
        FileFormat::Csv => read_csv(path),
        FileFormat::Xlsx | FileFormat::Xls => read_workbook(path),
        other => Err(OfficeError::UnsupportedConversion {
            from: other.to_string(),
            to: "table".to_string(),
        }),
    }
}

/// Read a UTF-8 CSV file, with or without a byte-order mark.
pub fn read_csv(path: &Path) -> Result<Vec<Vec<String>>> {
    let bytes = fs::read(path)?;
    let data = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Read the first worksheet of an XLSX or XLS workbook.
pub fn read_workbook(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| OfficeError::EmptyWorkbook(path.to_path_buf()))??;

    Ok(range_rows(&range))
}

/// Rows of a range, anchored at A1: cells above and left of the first
/// used cell come back empty.
fn range_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let Some((first_row, first_col)) = range.start() else {
        return Vec::new();
    };
    let width = first_col as usize + range.width();

    let mut rows = vec![vec![String::new(); width]; first_row as usize];
    rows.extend(range.rows().map(|row| {
        std::iter::repeat(String::new())
            .take(first_col as usize)
            .chain(row.iter().map(cell_text))
            .collect()
    }));
    rows
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_number(*f),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(stamp) if dt.is_datetime() => {
                let text = stamp.format("%Y-%m-%d %H:%M:%S").to_string();
                match text.strip_suffix(" 00:00:00") {
                    Some(date) => date.to_string(),
                    None => text,
                }
            }
            _ => format_number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#ERR:{:?}", e),
    }
}

/// Format a cell number: integral values without a fraction, others in
/// their shortest round-trip form.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

/// Write rows as UTF-8 CSV without a byte-order mark.
pub fn write_csv(path: &Path, rows: &[Vec<String>]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
