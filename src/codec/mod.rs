//! Codec adapter: uniform decode/encode over the platform image codecs.
//!
//! Decoding goes through the `image` crate for every container it recognizes.
//! Encoding dispatches per target format: png and jpeg through the `image`
//! crate, webp through `libwebp` bindings because the `image` crate only
//! writes lossless webp and we need the quality knob.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use thiserror::Error;

use crate::options::TargetFormat;

/// An in-memory decoded raster, addressable by width and height.
#[derive(Debug)]
pub struct PixelSurface {
    image: DynamicImage,
}

impl PixelSurface {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// A surface with zero area cannot be encoded.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    #[cfg(test)]
    pub(crate) fn from_image(image: DynamicImage) -> Self {
        Self { image }
    }
}

/// Codec-level failures, wrapped into per-item errors by the converter.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unrecognized or corrupt image data")]
    Decode(#[source] image::ImageError),

    #[error("surface has zero area")]
    ZeroArea,

    #[error("encoding failed")]
    Encode(#[source] image::ImageError),
}

/// Decode raw bytes into a pixel surface.
///
/// Fails if the bytes are not a recognized or complete image (corrupt,
/// truncated, or unsupported container).
pub fn decode(bytes: &[u8]) -> Result<PixelSurface, CodecError> {
    let image = image::load_from_memory(bytes).map_err(CodecError::Decode)?;
    Ok(PixelSurface { image })
}

/// Encode a pixel surface under the target format.
///
/// `quality` is normalized into `[0.0, 1.0]` and is ignored for png.
/// No color-space conversion or downsampling happens beyond what the
/// underlying codec performs implicitly.
pub fn encode(
    surface: &PixelSurface,
    format: TargetFormat,
    quality: f32,
) -> Result<Vec<u8>, CodecError> {
    if surface.is_empty() {
        return Err(CodecError::ZeroArea);
    }

    match format {
        TargetFormat::Png => encode_png(surface),
        TargetFormat::Jpeg => encode_jpeg(surface, quality),
        TargetFormat::Webp => Ok(encode_webp(surface, quality)),
    }
}

fn encode_png(surface: &PixelSurface) -> Result<Vec<u8>, CodecError> {
    let mut out = Cursor::new(Vec::new());
    surface
        .image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(CodecError::Encode)?;
    Ok(out.into_inner())
}

fn encode_jpeg(surface: &PixelSurface, quality: f32) -> Result<Vec<u8>, CodecError> {
    // JPEG has no alpha channel; flatten to RGB first.
    let rgb = surface.image.to_rgb8();
    let mut out = Vec::new();
    let q = (quality * 100.0).round().clamp(1.0, 100.0) as u8;
    let mut encoder = JpegEncoder::new_with_quality(&mut out, q);
    encoder.encode_image(&rgb).map_err(CodecError::Encode)?;
    Ok(out)
}

fn encode_webp(surface: &PixelSurface, quality: f32) -> Vec<u8> {
    let rgba = surface.image.to_rgba8();
    let encoder = webp::Encoder::from_rgba(&rgba, surface.width(), surface.height());
    encoder.encode(quality * 100.0).to_vec()
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::*;

    fn test_surface(width: u32, height: u32) -> PixelSurface {
        let mut img = RgbaImage::new(width, height);
        for (x, y, px) in img.enumerate_pixels_mut() {
            *px = Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255]);
        }
        PixelSurface::from_image(img.into())
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        encode_png(&test_surface(width, height)).unwrap()
    }

    #[test]
    fn test_decode_valid_png() {
        let surface = decode(&png_bytes(4, 3)).unwrap();
        assert_eq!(surface.width(), 4);
        assert_eq!(surface.height(), 3);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn test_decode_truncated_fails() {
        let mut bytes = png_bytes(16, 16);
        bytes.truncate(bytes.len() / 2);
        assert!(decode(&bytes).is_err());
    }

    #[test]
    fn test_encode_all_formats_non_empty() {
        let surface = test_surface(8, 8);
        for format in [TargetFormat::Webp, TargetFormat::Jpeg, TargetFormat::Png] {
            let out = encode(&surface, format, 0.9).unwrap();
            assert!(!out.is_empty(), "{format} produced empty output");
        }
    }

    #[test]
    fn test_encode_output_matches_requested_format() {
        let surface = test_surface(8, 8);

        let png = encode(&surface, TargetFormat::Png, 0.9).unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);

        let jpeg = encode(&surface, TargetFormat::Jpeg, 0.9).unwrap();
        assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);

        let webp = encode(&surface, TargetFormat::Webp, 0.9).unwrap();
        assert_eq!(image::guess_format(&webp).unwrap(), ImageFormat::WebP);
    }

    #[test]
    fn test_quality_boundaries_accepted() {
        let surface = test_surface(8, 8);
        for format in [TargetFormat::Webp, TargetFormat::Jpeg] {
            assert!(encode(&surface, format, 0.01).is_ok());
            assert!(encode(&surface, format, 1.0).is_ok());
        }
    }

    #[test]
    fn test_png_ignores_quality() {
        let surface = test_surface(8, 8);
        let low = encode(&surface, TargetFormat::Png, 0.01).unwrap();
        let high = encode(&surface, TargetFormat::Png, 1.0).unwrap();
        assert_eq!(low, high);
    }

    #[test]
    fn test_zero_area_surface_rejected() {
        let surface = PixelSurface::from_image(DynamicImage::new_rgba8(0, 0));
        let err = encode(&surface, TargetFormat::Png, 0.9).unwrap_err();
        assert!(matches!(err, CodecError::ZeroArea));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let surface = test_surface(16, 16);
        let a = encode(&surface, TargetFormat::Webp, 0.8).unwrap();
        let b = encode(&surface, TargetFormat::Webp, 0.8).unwrap();
        assert_eq!(a.len(), b.len());
    }
}
