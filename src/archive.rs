//! Archive builder: bundle the successful set into one zip for download.

use std::io::{Cursor, Write};

use rustc_hash::FxHashMap;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::convert::ConvertedItem;
use crate::error::ArchiveError;
use crate::store::ArtifactStore;

/// Name offered for the single-download bundle.
pub const ARCHIVE_FILE_NAME: &str = "converted-images.zip";

/// Pack converted items into one compressed archive.
///
/// Entries land in a single flat directory, named by their output filename.
/// Two items with the same output name get an auto-suffix (`photo (1).webp`)
/// instead of silently overwriting each other. Fails when the set is empty
/// or when an item's handle was already released.
pub fn build_archive(
    items: &[&ConvertedItem],
    store: &ArtifactStore,
) -> Result<Vec<u8>, ArchiveError> {
    if items.is_empty() {
        return Err(ArchiveError::Empty);
    }

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let mut seen: FxHashMap<&str, usize> = FxHashMap::default();

    for item in items {
        let content = store
            .fetch(&item.handle)
            .ok_or_else(|| ArchiveError::MissingContent(item.file_name.clone()))?;

        let entry_name = match seen.get_mut(item.file_name.as_str()) {
            Some(count) => {
                *count += 1;
                dedup_name(&item.file_name, *count)
            }
            None => {
                seen.insert(&item.file_name, 0);
                item.file_name.clone()
            }
        };

        zip.start_file(entry_name, options)?;
        zip.write_all(&content)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// `photo.webp` + 1 -> `photo (1).webp`
fn dedup_name(name: &str, count: usize) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem} ({count}).{ext}"),
        _ => format!("{name} ({count})"),
    }
}
