//! In-process raster image re-encoding.

use image::{DynamicImage, ImageFormat, ImageReader};
use tracing::debug;

use super::{Collaborator, CollaboratorError, ConversionJob};

/// Raster formats accepted on both sides of an image conversion.
pub const IMAGE_FORMATS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp", "tiff", "tif"];

/// Whether `format` is one of [`IMAGE_FORMATS`].
pub fn is_image_format(format: &str) -> bool {
    IMAGE_FORMATS.contains(&format)
}

/// Re-encodes raster images with the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageEncoder;

impl ImageEncoder {
    /// Drop channels the target encoder cannot store.
    fn prepare(image: DynamicImage, format: ImageFormat) -> DynamicImage {
        match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
            ImageFormat::Gif | ImageFormat::WebP => DynamicImage::ImageRgba8(image.to_rgba8()),
            _ => image,
        }
    }
}

impl Collaborator for ImageEncoder {
    fn name(&self) -> &'static str {
        "image encoder"
    }

    fn convert(&self, job: &ConversionJob<'_>) -> Result<(), CollaboratorError> {
        let format = ImageFormat::from_extension(job.target_format).ok_or_else(|| {
            CollaboratorError::Rejected(format!("cannot encode images as '{}'", job.target_format))
        })?;

        // Resolved files may carry the wrong extension; trust the content.
        let image = ImageReader::open(job.input)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| CollaboratorError::Rejected(format!("cannot read image: {e}")))?;
        debug!(
            "Decoded {}x{} image from {}",
            image.width(),
            image.height(),
            job.input.display()
        );

        Self::prepare(image, format)
            .save_with_format(job.output, format)
            .map_err(|e| CollaboratorError::Rejected(format!("cannot write image: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::path::Path;
    use tempfile::TempDir;

    fn write_png(path: &Path) {
        let mut img = RgbaImage::new(4, 3);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgba([(x * 60) as u8, (y * 80) as u8, 120, 200]);
        }
        img.save_with_format(path, ImageFormat::Png).unwrap();
    }

    fn job<'a>(input: &'a Path, output: &'a Path, target: &'a str) -> ConversionJob<'a> {
        ConversionJob {
            input,
            output,
            source_format: "png",
            target_format: target,
        }
    }

    #[test]
    fn test_png_to_jpg() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.jpg");
        write_png(&input);

        ImageEncoder.convert(&job(&input, &output, "jpg")).unwrap();

        let decoded = image::open(&output).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 3));
        assert_eq!(image::ImageFormat::from_path(&output).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_png_to_bmp() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.bmp");
        write_png(&input);

        ImageEncoder.convert(&job(&input, &output, "bmp")).unwrap();
        assert!(output.is_file());
    }

    #[test]
    fn test_content_wins_over_extension() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("mislabelled.jpg");
        let output = dir.path().join("out.png");
        write_png(&input);

        ImageEncoder.convert(&job(&input, &output, "png")).unwrap();
        assert!(output.is_file());
    }

    #[test]
    fn test_unknown_target_is_rejected() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.xyz");
        write_png(&input);

        let err = ImageEncoder.convert(&job(&input, &output, "xyz")).unwrap_err();
        assert!(matches!(err, CollaboratorError::Rejected(_)));
        assert!(!output.exists());
    }

    #[test]
    fn test_corrupt_input_is_rejected() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.jpg");
        std::fs::write(&input, b"definitely not a png").unwrap();

        let err = ImageEncoder.convert(&job(&input, &output, "jpg")).unwrap_err();
        assert!(matches!(err, CollaboratorError::Rejected(_)));
    }

    #[test]
    fn test_image_format_set() {
        assert!(is_image_format("tif"));
        assert!(is_image_format("webp"));
        assert!(!is_image_format("pdf"));
    }
}
