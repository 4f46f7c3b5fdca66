use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::errors::{Result, SortError};

/// Replace the contents of `path` atomically.
///
/// The new text is written to a temporary file in the same directory, which
/// then takes over the original file's permissions and is renamed over it.
/// Readers see either the old or the new contents, never a partial file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(directory).map_err(|e| SortError::from_write(path, e))?;
    temp.write_all(contents)
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| SortError::from_write(path, e))?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(temp.path(), metadata.permissions())
            .map_err(|e| SortError::from_write(path, e))?;
    }

    temp.persist(path)
        .map_err(|e| SortError::from_write(path, e.error))?;
    Ok(())
}
