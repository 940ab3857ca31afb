//! Pixel preparation and encoding per target format.

use crate::error::{MediaError, Result};
use fconv_core::FileFormat;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// The `image` codec for a target format, if it is a raster format.
pub fn image_format(target: FileFormat) -> Option<ImageFormat> {
    match target {
        FileFormat::Jpg => Some(ImageFormat::Jpeg),
        FileFormat::Png => Some(ImageFormat::Png),
        FileFormat::Gif => Some(ImageFormat::Gif),
        FileFormat::Bmp => Some(ImageFormat::Bmp),
        FileFormat::Tiff => Some(ImageFormat::Tiff),
        FileFormat::Webp => Some(ImageFormat::WebP),
        _ => None,
    }
}

/// Composite an image onto an opaque white background.
pub fn flatten_alpha(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let blend = |c: u8| ((c as u16 * a as u16 + 255 * (255 - a as u16)) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Convert pixels into a layout the encoder for `format` accepts.
///
/// Formats without an alpha channel get the image composited onto white;
/// the others keep their transparency.
pub fn prepare(image: DynamicImage, format: ImageFormat) -> DynamicImage {
    let has_alpha = image.color().has_alpha();
    match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(flatten_alpha(&image)),
        ImageFormat::Gif => DynamicImage::ImageRgba8(image.to_rgba8()),
        ImageFormat::Png => image,
        _ if has_alpha => DynamicImage::ImageRgba8(image.to_rgba8()),
        _ => DynamicImage::ImageRgb8(image.to_rgb8()),
    }
}

/// Encode an image for `target`.
pub fn encode(image: DynamicImage, target: FileFormat) -> Result<Vec<u8>> {
    let format =
        image_format(target).ok_or_else(|| MediaError::UnsupportedTarget(target.to_string()))?;

    let mut buffer = Cursor::new(Vec::new());
    prepare(image, format).write_to(&mut buffer, format)?;
    Ok(buffer.into_inner())
}
