//! Decoding and scaling of image files.

use super::{DecodedImage, PixelLayout, RenderOptions, ScaleMode};
use crate::error::Result;
use image::DynamicImage;
use image::imageops::FilterType;
use std::path::Path;

/// Decodes the file at `path` and applies `options`.
///
/// Blocking; call from a worker thread.
pub fn load_image_blocking(path: &Path, options: &RenderOptions) -> Result<DecodedImage> {
    let img = image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?;

    Ok(finish(img, options))
}

/// Scales a decoded image and converts it to the requested pixel layout.
pub fn finish(img: DynamicImage, options: &RenderOptions) -> DecodedImage {
    let img = match (options.target_size, options.scale_mode) {
        (Some((w, h)), ScaleMode::Fill) => img.resize_to_fill(w, h, FilterType::Triangle),
        (Some((w, h)), ScaleMode::Fit) => img.resize(w, h, FilterType::Triangle),
        (None, _) => img,
    };

    let (width, height) = (img.width(), img.height());
    if options.allow_low_color_fallback {
        DecodedImage {
            data: img.to_rgb8().into_raw(),
            width,
            height,
            layout: PixelLayout::Rgb8,
        }
    } else {
        DecodedImage {
            data: img.to_rgba8().into_raw(),
            width,
            height,
            layout: PixelLayout::Rgba8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn source(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255])))
    }

    #[test]
    fn thumbnails_fill_the_target_square() {
        let decoded = finish(source(400, 200), &RenderOptions::thumbnail(150));
        assert_eq!((decoded.width, decoded.height), (150, 150));
        assert_eq!(decoded.layout, PixelLayout::Rgb8);
        assert_eq!(decoded.data.len(), 150 * 150 * 3);
    }

    #[test]
    fn full_screen_keeps_native_size_with_alpha() {
        let decoded = finish(source(400, 200), &RenderOptions::full_screen());
        assert_eq!((decoded.width, decoded.height), (400, 200));
        assert_eq!(decoded.layout, PixelLayout::Rgba8);
        assert_eq!(decoded.data.len(), 400 * 200 * 4);
    }

    #[test]
    fn fit_with_target_preserves_aspect_ratio() {
        let options = RenderOptions {
            target_size: Some((100, 100)),
            ..RenderOptions::full_screen()
        };
        let decoded = finish(source(400, 200), &options);
        assert_eq!((decoded.width, decoded.height), (100, 50));
    }

    #[test]
    fn loads_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        source(8, 4).save(&path).unwrap();

        let decoded = load_image_blocking(&path, &RenderOptions::full_screen()).unwrap();
        assert_eq!((decoded.width, decoded.height), (8, 4));
    }

    #[test]
    fn garbage_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();

        assert!(load_image_blocking(&path, &RenderOptions::full_screen()).is_err());
    }
}
