//! End-to-end conversions through the default router.

use super::*;
use calamine::{open_workbook_auto, Data, Reader};
use fconv_office::{read_docx, write_xlsx, DocxWriter};
use fconv_pdf::{PageSetup, ParagraphStyle, PdfBuilder};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};

fn write_fixture(dir: &Path, ext: &str) -> PathBuf {
    let path = dir.join(format!("fixture.{}", ext));
    match ext {
        "pdf" => {
            let mut builder = PdfBuilder::new(PageSetup::LETTER);
            builder.paragraph("SUMMARY", &ParagraphStyle::normal()).unwrap();
            builder.paragraph("- first item", &ParagraphStyle::normal()).unwrap();
            fs::write(&path, builder.finish().unwrap()).unwrap();
        }
        "docx" => {
            let mut writer = DocxWriter::new();
            writer
                .paragraph("Meeting notes")
                .table(vec![vec!["k".to_string(), "v".to_string()]]);
            writer.save(&path).unwrap();
        }
        "csv" => fs::write(&path, "a,b\n1,2\n").unwrap(),
        "xlsx" => write_xlsx(
            &path,
            &[
                vec!["a".to_string(), "b".to_string()],
                vec!["1".to_string(), "2".to_string()],
            ],
        )
        .unwrap(),
        _ => {
            let format = ImageFormat::from_extension(ext).expect("image extension");
            DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 12, Rgb([30, 60, 90])))
                .save_with_format(&path, format)
                .unwrap();
        }
    }
    path
}

fn assert_readable(path: &Path, format: FileFormat) {
    match format {
        FileFormat::Pdf => {
            let document = lopdf::Document::load(path).unwrap();
            assert!(!document.get_pages().is_empty());
        }
        FileFormat::Docx => {
            read_docx(path).unwrap();
        }
        FileFormat::Md => {
            let text = fs::read_to_string(path).unwrap();
            assert!(!text.trim().is_empty());
        }
        FileFormat::Csv => {
            let text = fs::read_to_string(path).unwrap();
            assert!(text.starts_with("a,b"));
        }
        FileFormat::Xlsx | FileFormat::Xls => {
            let mut workbook = open_workbook_auto(path).unwrap();
            assert!(workbook.worksheet_range_at(0).unwrap().is_ok());
        }
        _ => {
            image::open(path).unwrap();
        }
    }
}

#[test]
fn test_every_default_pair() {
    let dir = tempfile::tempdir().unwrap();
    let router = default_router();
    let rules = ConversionRules::default();

    for (ext, targets) in rules.iter() {
        // No XLS writer is available to build a fixture.
        if ext == "xls" {
            continue;
        }
        let source = write_fixture(dir.path(), ext);

        for target in targets {
            let output = dir
                .path()
                .join("out")
                .join(format!("{}_to.{}", ext, target.extension()));

            let report = router
                .convert(&source, &output, target.token())
                .unwrap_or_else(|e| panic!("{} -> {}: {}", ext, target, e));

            assert_eq!(report.target, *target);
            assert!(matches!(report.method, ConversionMethod::Converted(_)));
            assert_readable(&output, *target);
        }
    }
}

#[test]
fn test_unsupported_pairs_create_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let router = default_router();
    let png = write_fixture(dir.path(), "png");
    let csv = write_fixture(dir.path(), "csv");

    for (source, target) in [(&png, "DOCX"), (&png, "MD"), (&csv, "DOCX"), (&csv, "PNG")] {
        let output = dir.path().join("rejected").join(format!("out.{}", target.to_lowercase()));
        let err = router.convert(source, &output, target).unwrap_err();

        assert!(matches!(err, Error::UnsupportedFormatPair { .. }));
        assert!(!output.exists());
    }
    assert!(!dir.path().join("rejected").exists());
}

#[test]
fn test_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("data.xyz");
    fs::write(&source, b"whatever").unwrap();
    let output = dir.path().join("data.pdf");

    let err = default_router().convert(&source, &output, "PDF").unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormatPair { .. }));
    assert!(!output.exists());
}

#[test]
fn test_supported_targets() {
    let dir = tempfile::tempdir().unwrap();
    let router = default_router();
    let png = write_fixture(dir.path(), "png");

    let targets = router.supported_targets(&png);
    assert_eq!(
        targets,
        vec![FileFormat::Jpg, FileFormat::Gif, FileFormat::Bmp, FileFormat::Pdf]
    );
    assert_eq!(router.supported_targets(&png), targets);
    assert!(router.supported_targets(&dir.path().join("missing.png")).is_empty());
}

#[test]
fn test_png_jpg_png_keeps_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let router = default_router();
    let png = write_fixture(dir.path(), "png");
    let jpg = dir.path().join("mid.jpg");
    let back = dir.path().join("back.png");

    router.convert(&png, &jpg, "JPG").unwrap();
    router.convert(&jpg, &back, "PNG").unwrap();

    let decoded = image::open(&back).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (16, 12));
}

#[test]
fn test_rgba_png_to_jpg_is_opaque_white() {
    let dir = tempfile::tempdir().unwrap();
    let png = dir.path().join("clear.png");
    let jpg = dir.path().join("clear.jpg");
    RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 0])).save(&png).unwrap();

    default_router().convert(&png, &jpg, "JPG").unwrap();

    let decoded = image::open(&jpg).unwrap();
    assert!(!decoded.color().has_alpha());
    let [r, g, b] = decoded.to_rgb8().get_pixel(5, 5).0;
    assert!(r > 250 && g > 250 && b > 250);
}

#[test]
fn test_report_csv_to_xlsx() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("report.csv");
    fs::write(&csv, "a,b\n1,2\n").unwrap();
    let xlsx = dir.path().join("report.xlsx");

    default_router().convert(&csv, &xlsx, "XLSX").unwrap();

    let mut workbook = open_workbook_auto(&xlsx).unwrap();
    assert_eq!(workbook.sheet_names().len(), 1);
    let range = workbook.worksheet_range_at(0).unwrap().unwrap();
    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Float(f) => format!("{}", f),
                    Data::Int(i) => i.to_string(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect();
    assert_eq!(rows, vec![vec!["a", "b"], vec!["1", "2"]]);
}

#[test]
fn test_pdf_to_markdown_respects_settings() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_fixture(dir.path(), "pdf");
    let md = dir.path().join("notes.md");

    let settings = Settings::default().with_bom(BomPolicy::Always);
    settings.router().convert(&pdf, &md, "MD").unwrap();

    let bytes = fs::read(&md).unwrap();
    assert!(bytes.starts_with(&[0xEF, 0xBB, 0xBF]));
    let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
    assert!(text.starts_with("# SUMMARY"));
    assert!(text.contains("- first item"));
}

#[test]
fn test_same_format_copies() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_fixture(dir.path(), "csv");
    let copy = dir.path().join("copy/fixture.csv");

    let report = default_router().convert(&csv, &copy, "CSV").unwrap();
    assert_eq!(report.method, ConversionMethod::Copied);
    assert_eq!(fs::read(&copy).unwrap(), fs::read(&csv).unwrap());
}

#[test]
fn test_background_conversion() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_fixture(dir.path(), "csv");
    let pdf = dir.path().join("table.pdf");

    let router = std::sync::Arc::new(default_router());
    let handle = worker::spawn(router, ConversionRequest::new(&csv, &pdf, "PDF")).unwrap();
    let report = handle.wait().unwrap();

    assert_eq!(report.method, ConversionMethod::Converted(FormatCategory::Spreadsheet));
    assert!(pdf.exists());
}
