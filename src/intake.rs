//! Selection intake: filter a user-supplied file list down to image inputs.

use std::fs;
use std::path::{Path, PathBuf};

use crate::convert::{InputItem, InputSource};
use crate::error::SelectionError;
use crate::utils::mime;

/// Advisory shown when some (but not all) entries were dropped.
pub const INVALID_TYPES_ADVISORY: &str = "some files were not valid image types and were ignored";

/// Result of filtering a file list.
#[derive(Debug, Default)]
pub struct Selection {
    /// Accepted inputs, in the user's selection order.
    pub items: Vec<InputItem>,
    /// Number of entries dropped for not being image-typed.
    pub ignored: usize,
}

impl Selection {
    /// Non-fatal advisory to surface to the user, if any entries were dropped.
    pub fn advisory(&self) -> Option<&'static str> {
        (self.ignored > 0).then_some(INVALID_TYPES_ADVISORY)
    }
}

/// Filter paths to entries whose type indicates an image.
///
/// Non-image entries are dropped with an advisory, not an error. Supplying
/// at least one path but zero image-typed entries is a selection error and
/// leaves any existing batch untouched. An empty path list yields an empty
/// selection.
pub fn select_files(paths: &[PathBuf]) -> Result<Selection, SelectionError> {
    let mut selection = Selection::default();

    for path in paths {
        if !mime::is_image(path) {
            selection.ignored += 1;
            continue;
        }
        selection.items.push(input_from_path(path));
    }

    if selection.items.is_empty() && !paths.is_empty() {
        return Err(SelectionError::NoValidImages);
    }

    Ok(selection)
}

fn input_from_path(path: &Path) -> InputItem {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    // An unreadable file still enters the batch; the read failure surfaces
    // as that item's conversion error.
    let size = fs::metadata(path).map(|meta| meta.len()).unwrap_or(0);

    InputItem {
        source: InputSource::Path(path.to_path_buf()),
        file_name,
        size,
    }
}
