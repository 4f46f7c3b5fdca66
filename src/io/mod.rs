pub mod encoding;
pub mod walker;
pub mod writer;

pub use encoding::{decode_source, SourceText};
pub use walker::FileWalker;
pub use writer::write_atomic;

use crate::errors::{Result, SortError};
use std::fs;
use std::path::Path;

/// Read a file's raw bytes, mapping failures to user-facing I/O errors.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| SortError::from_read(path, e))
}
