//! Target format and conversion options shared by a whole batch.

use std::fmt;

use clap::ValueEnum;

/// Output formats offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetFormat {
    Webp,
    Jpeg,
    Png,
}

impl TargetFormat {
    /// File extension appended to the output filename.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Webp => "webp",
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        }
    }

    /// Whether this format takes a lossy quality parameter.
    pub const fn is_lossy(self) -> bool {
        !matches!(self, Self::Png)
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// User-chosen conversion parameters.
///
/// Shared read-only by every item in a batch; the orchestrator snapshots the
/// value when a run starts so mid-run mutation cannot affect in-flight items.
#[derive(Debug, Clone, Copy)]
pub struct ConversionOptions {
    pub format: TargetFormat,
    /// Quality in `[1, 100]`. Ignored when `format` is png.
    pub quality: u8,
}

impl ConversionOptions {
    /// Quality normalized into `[0.0, 1.0]` for the codec adapter.
    pub fn normalized_quality(&self) -> f32 {
        f32::from(self.quality) / 100.0
    }
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            format: TargetFormat::Webp,
            quality: 90,
        }
    }
}
