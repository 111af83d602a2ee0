/// Persistence of relocated images and rewritten documents.
use std::path::Path;

use crate::error::Error;

/// Write fetched image bytes, creating or overwriting `destination`.
///
/// # Errors
///
/// Returns `Error::WriteFailed` if the file cannot be written.
pub fn write_image(destination: &Path, bytes: &[u8]) -> Result<(), Error> {
    return write_bytes(destination, bytes);
}

/// Overwrite the document with its rebuilt text.
///
/// # Errors
///
/// Returns `Error::WriteFailed` if the file cannot be written.
pub fn write_document(path: &Path, text: &str) -> Result<(), Error> {
    return write_bytes(path, text.as_bytes());
}

/// Full overwrite of `path` with `bytes`.
///
/// # Errors
///
/// Returns `Error::WriteFailed` wrapping the I/O error.
fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    return std::fs::write(path, bytes).map_err(|e| {
        return Error::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };
    });
}
