//! MIME type detection for selection filtering.
//!
//! Only entries whose type indicates an image are accepted into a batch.
//! Detection is extension-based, mirroring a browser's declared file type;
//! containers that pass here can still fail to decode later.

use std::path::Path;

/// Common MIME type constants.
pub mod types {
    pub const OCTET_STREAM: &str = "application/octet-stream";

    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const WEBP: &str = "image/webp";
    pub const AVIF: &str = "image/avif";
    pub const SVG: &str = "image/svg+xml";
    pub const ICO: &str = "image/x-icon";
    pub const BMP: &str = "image/bmp";
    pub const TIFF: &str = "image/tiff";
}

/// Guess MIME type from file extension.
pub fn from_path(path: &Path) -> &'static str {
    from_extension(path.extension().and_then(|e| e.to_str()))
}

/// Guess MIME type from an extension string.
pub fn from_extension(ext: Option<&str>) -> &'static str {
    let Some(ext) = ext else {
        return types::OCTET_STREAM;
    };
    match ext.to_ascii_lowercase().as_str() {
        "png" => types::PNG,
        "jpg" | "jpeg" => types::JPEG,
        "gif" => types::GIF,
        "webp" => types::WEBP,
        "avif" => types::AVIF,
        "svg" => types::SVG,
        "ico" => types::ICO,
        "bmp" => types::BMP,
        "tif" | "tiff" => types::TIFF,
        _ => types::OCTET_STREAM,
    }
}

/// Whether the path's declared type is an image.
pub fn is_image(path: &Path) -> bool {
    from_path(path).starts_with("image/")
}
