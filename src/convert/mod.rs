//! Single-item conversion: one input blob in, one artifact handle out.

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::codec;
use crate::error::ConvertError;
use crate::options::{ConversionOptions, TargetFormat};
use crate::store::{ArtifactHandle, ArtifactStore};

/// Where an input item's raw bytes come from.
///
/// Files are read lazily at conversion time so an unreadable source surfaces
/// as a per-item failure rather than killing the whole selection.
#[derive(Debug, Clone)]
pub enum InputSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// One user-provided file. Immutable once selected.
#[derive(Debug, Clone)]
pub struct InputItem {
    pub source: InputSource,
    pub file_name: String,
    /// Size of the original in bytes, for the savings report.
    pub size: u64,
}

impl InputItem {
    pub fn read(&self) -> io::Result<Cow<'_, [u8]>> {
        match &self.source {
            InputSource::Path(path) => fs::read(path).map(Cow::Owned),
            InputSource::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
        }
    }
}

/// One successfully converted output, owned by its batch slot.
#[derive(Debug, Clone)]
pub struct ConvertedItem {
    pub handle: ArtifactHandle,
    pub file_name: String,
    pub size: u64,
    pub format: TargetFormat,
}

/// Convert a single input under the given options.
///
/// decode -> encode -> derive filename -> issue handle. Any step's failure
/// short-circuits this item only.
pub fn convert_item(
    item: &InputItem,
    options: &ConversionOptions,
    store: &ArtifactStore,
) -> Result<ConvertedItem, ConvertError> {
    let bytes = item.read().map_err(|source| ConvertError::Read {
        name: item.file_name.clone(),
        source,
    })?;

    let surface = codec::decode(&bytes).map_err(|source| ConvertError::Load {
        name: item.file_name.clone(),
        source,
    })?;

    let encoded = codec::encode(&surface, options.format, options.normalized_quality()).map_err(
        |source| ConvertError::Encode {
            name: item.file_name.clone(),
            source,
        },
    )?;

    if encoded.is_empty() {
        return Err(ConvertError::EmptyResult {
            name: item.file_name.clone(),
        });
    }

    let file_name = output_file_name(&item.file_name, options.format);
    let size = encoded.len() as u64;
    let handle = store.issue(encoded);

    Ok(ConvertedItem {
        handle,
        file_name,
        size,
        format: options.format,
    })
}

/// Derive the output filename: strip the last dot-delimited extension and
/// append the target extension. A name without an extension keeps its whole
/// name as the stem.
pub fn output_file_name(original: &str, format: TargetFormat) -> String {
    let stem = match original.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => original,
    };
    format!("{stem}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, RgbaImage};
    use tempfile::TempDir;

    use super::*;

    fn png_fixture(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([(x * 16) as u8, (y * 16) as u8, 64, 255])
        });
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn memory_item(name: &str, bytes: Vec<u8>) -> InputItem {
        let size = bytes.len() as u64;
        InputItem {
            source: InputSource::Bytes(bytes),
            file_name: name.to_string(),
            size,
        }
    }

    fn webp_options() -> ConversionOptions {
        ConversionOptions {
            format: TargetFormat::Webp,
            quality: 90,
        }
    }

    #[test]
    fn test_output_file_name_replaces_extension() {
        assert_eq!(
            output_file_name("photo.tiff", TargetFormat::Webp),
            "photo.webp"
        );
        assert_eq!(output_file_name("a.b.c.jpg", TargetFormat::Png), "a.b.c.png");
    }

    #[test]
    fn test_output_file_name_without_extension() {
        assert_eq!(output_file_name("image", TargetFormat::Png), "image.png");
    }

    #[test]
    fn test_output_file_name_leading_dot() {
        // A bare dotfile has no extension to strip.
        assert_eq!(
            output_file_name(".hidden", TargetFormat::Webp),
            ".hidden.webp"
        );
    }

    #[test]
    fn test_convert_item_success() {
        let store = ArtifactStore::new();
        let item = memory_item("photo.png", png_fixture(8, 8));

        let converted = convert_item(&item, &webp_options(), &store).unwrap();
        assert_eq!(converted.file_name, "photo.webp");
        assert_eq!(converted.format, TargetFormat::Webp);
        assert!(converted.size > 0);

        let content = store.fetch(&converted.handle).unwrap();
        assert_eq!(content.len() as u64, converted.size);
        assert_eq!(
            image::guess_format(&content).unwrap(),
            ImageFormat::WebP
        );
    }

    #[test]
    fn test_convert_item_corrupt_bytes() {
        let store = ArtifactStore::new();
        let item = memory_item("broken.png", b"not an image at all".to_vec());

        let err = convert_item(&item, &webp_options(), &store).unwrap_err();
        assert!(matches!(err, ConvertError::Load { .. }));
        assert_eq!(err.file_name(), "broken.png");
        // A failed conversion must not leave a live handle behind.
        assert_eq!(store.live(), 0);
    }

    #[test]
    fn test_convert_item_unreadable_file() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new();
        let item = InputItem {
            source: InputSource::Path(dir.path().join("missing.png")),
            file_name: "missing.png".to_string(),
            size: 0,
        };

        let err = convert_item(&item, &webp_options(), &store).unwrap_err();
        assert!(matches!(err, ConvertError::Read { .. }));
        assert_eq!(format!("{err}"), "failed to read missing.png");
    }

    #[test]
    fn test_convert_item_deterministic() {
        let store = ArtifactStore::new();
        let item = memory_item("photo.png", png_fixture(16, 16));

        let first = convert_item(&item, &webp_options(), &store).unwrap();
        let second = convert_item(&item, &webp_options(), &store).unwrap();
        assert_eq!(first.size, second.size);
    }

    #[test]
    fn test_convert_item_quality_noop_for_png() {
        let store = ArtifactStore::new();
        let item = memory_item("photo.png", png_fixture(8, 8));
        let options = ConversionOptions {
            format: TargetFormat::Png,
            quality: 1,
        };
        // Quality must be accepted without error even though png ignores it.
        let converted = convert_item(&item, &options, &store).unwrap();
        assert_eq!(converted.file_name, "photo.png");
    }
}
