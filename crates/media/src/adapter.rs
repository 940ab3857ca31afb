//! Image conversion: re-encoding between raster formats and image to PDF.

use crate::encode::{encode, flatten_alpha};
use crate::error::Result;
use fconv_core::{Adapter, AdapterError, ConversionJob, FileFormat};
use fconv_pdf::{PageSetup, PdfBuilder, RawImage};
use image::imageops::FilterType;
use image::DynamicImage;
use std::fs;
use std::path::Path;

/// Converts raster images to other raster formats or to a one-page PDF.
#[derive(Debug, Clone)]
pub struct ImageAdapter {
    page: PageSetup,
    filter: FilterType,
}

impl ImageAdapter {
    pub fn new() -> Self {
        Self {
            page: PageSetup::LETTER,
            filter: FilterType::Lanczos3,
        }
    }

    /// Page geometry for image to PDF.
    pub fn with_page_setup(mut self, page: PageSetup) -> Self {
        self.page = page;
        self
    }

    /// Resampling filter used when fitting an image to the page.
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    /// Decode `source` and write it to `output` as `target`.
    pub fn reencode(&self, source: &Path, output: &Path, target: FileFormat) -> Result<()> {
        let image = image::open(source)?;
        let bytes = encode(image, target)?;
        fs::write(output, bytes)?;
        Ok(())
    }

    /// Place the image on a single page, scaled to fill the frame.
    pub fn image_to_pdf(&self, source: &Path, output: &Path) -> Result<()> {
        let image = image::open(source)?;
        let bytes = self.render_pdf(&image)?;
        fs::write(output, bytes)?;
        Ok(())
    }

    fn render_pdf(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        let scale = self.page.fit_scale(image.width(), image.height());
        let width = image.width() as f32 * scale;
        let height = image.height() as f32 * scale;

        let pixels_w = (width.round() as u32).max(1);
        let pixels_h = (height.round() as u32).max(1);
        log::debug!(
            "Fitting {}x{} image to {}x{} (scale {:.3})",
            image.width(),
            image.height(),
            pixels_w,
            pixels_h,
            scale
        );

        let resized = image.resize_exact(pixels_w, pixels_h, self.filter);
        let rgb = flatten_alpha(&resized);
        let raw = RawImage::new(rgb.width(), rgb.height(), rgb.into_raw())?;

        let mut builder = PdfBuilder::new(self.page);
        builder.image(&raw, width, height)?;
        Ok(builder.finish()?)
    }
}

impl Default for ImageAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapter for ImageAdapter {
    fn convert(&self, job: &ConversionJob<'_>) -> std::result::Result<(), AdapterError> {
        match job.target {
            FileFormat::Pdf => self.image_to_pdf(job.source, job.output)?,
            target => self.reencode(job.source, job.output, target)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};
    use lopdf::{Document, Object};

    fn job<'a>(source: &'a Path, output: &'a Path, from: FileFormat, to: FileFormat) -> ConversionJob<'a> {
        ConversionJob {
            source,
            output,
            source_format: from,
            target: to,
        }
    }

    #[test]
    fn test_png_to_jpg_to_png_keeps_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("in.png");
        let jpg = dir.path().join("mid.jpg");
        let back = dir.path().join("out.png");
        RgbaImage::from_pixel(37, 21, Rgba([200, 10, 10, 255]))
            .save(&png)
            .unwrap();

        let adapter = ImageAdapter::new();
        adapter.convert(&job(&png, &jpg, FileFormat::Png, FileFormat::Jpg)).unwrap();
        adapter.convert(&job(&jpg, &back, FileFormat::Jpg, FileFormat::Png)).unwrap();

        assert_eq!(image::open(&back).unwrap().dimensions(), (37, 21));
    }

    #[test]
    fn test_transparent_png_to_jpg_is_white() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("clear.png");
        let jpg = dir.path().join("clear.jpg");
        RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 0])).save(&png).unwrap();

        ImageAdapter::new()
            .convert(&job(&png, &jpg, FileFormat::Png, FileFormat::Jpg))
            .unwrap();

        let decoded = image::open(&jpg).unwrap();
        assert!(!decoded.color().has_alpha());
        let [r, g, b] = decoded.to_rgb8().get_pixel(4, 4).0;
        assert!(r > 250 && g > 250 && b > 250);
    }

    #[test]
    fn test_every_raster_target() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("in.png");
        RgbaImage::from_pixel(5, 4, Rgba([1, 2, 3, 128])).save(&png).unwrap();

        for (target, name) in [
            (FileFormat::Gif, "out.gif"),
            (FileFormat::Bmp, "out.bmp"),
            (FileFormat::Tiff, "out.tiff"),
            (FileFormat::Webp, "out.webp"),
        ] {
            let output = dir.path().join(name);
            ImageAdapter::new()
                .convert(&job(&png, &output, FileFormat::Png, target))
                .unwrap();
            assert_eq!(image::open(&output).unwrap().dimensions(), (5, 4));
        }
    }

    #[test]
    fn test_image_to_pdf_fits_frame() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("wide.png");
        let pdf = dir.path().join("wide.pdf");
        RgbaImage::from_pixel(1000, 500, Rgba([0, 128, 255, 255])).save(&png).unwrap();

        ImageAdapter::new()
            .convert(&job(&png, &pdf, FileFormat::Png, FileFormat::Pdf))
            .unwrap();

        let document = Document::load(&pdf).unwrap();
        assert_eq!(document.get_pages().len(), 1);

        let image = document
            .objects
            .values()
            .filter_map(|object| match object {
                Object::Stream(stream) => Some(stream),
                _ => None,
            })
            .find(|stream| {
                stream
                    .dict
                    .get(b"Subtype")
                    .and_then(Object::as_name)
                    .map(|name| name == b"Image")
                    .unwrap_or(false)
            })
            .expect("image XObject");

        assert_eq!(image.dict.get(b"Width").unwrap().as_i64().unwrap(), 468);
        assert_eq!(image.dict.get(b"Height").unwrap().as_i64().unwrap(), 234);
    }

    #[test]
    fn test_undecodable_source() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("broken.png");
        fs::write(&png, b"not really a png").unwrap();
        let output = dir.path().join("broken.jpg");

        let result = ImageAdapter::new().convert(&job(&png, &output, FileFormat::Png, FileFormat::Jpg));
        assert!(result.is_err());
        assert!(!output.exists());
    }
}
