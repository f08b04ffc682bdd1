//! Error types for selection, conversion and archiving.

use thiserror::Error;

use crate::codec::CodecError;

// ============================================================================
// SelectionError
// ============================================================================

/// Errors raised while filtering a user-supplied file list.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// Files were supplied, but none of them had an image MIME type.
    #[error("no valid image files selected")]
    NoValidImages,
}

// ============================================================================
// ConvertError
// ============================================================================

/// Per-item conversion failure.
///
/// These attach to a single batch slot and never abort sibling conversions.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The source bytes could not be read.
    #[error("failed to read {name}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The source bytes are not a recognized or complete image.
    #[error("failed to load {name}: it may be corrupt or in an unsupported format")]
    Load {
        name: String,
        #[source]
        source: CodecError,
    },

    /// The codec yielded an empty result.
    #[error("conversion failed for {name}: empty result")]
    EmptyResult { name: String },

    /// The codec could not produce output for the target format.
    #[error("conversion failed for {name}")]
    Encode {
        name: String,
        #[source]
        source: CodecError,
    },
}

impl ConvertError {
    /// Name of the input file this failure belongs to.
    pub fn file_name(&self) -> &str {
        match self {
            Self::Read { name, .. }
            | Self::Load { name, .. }
            | Self::EmptyResult { name }
            | Self::Encode { name, .. } => name,
        }
    }
}

// ============================================================================
// ArchiveError
// ============================================================================

/// Errors raised while bundling converted images into a zip archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The successful set is empty; there is nothing to archive.
    #[error("no converted images to archive")]
    Empty,

    /// An item's artifact handle was already released.
    #[error("missing content for {0}")]
    MissingContent(String),

    #[error("failed to write archive")]
    Zip(#[from] zip::result::ZipError),

    #[error("failed to write archive")]
    Io(#[from] std::io::Error),
}
