//! Reading documents from local files and standard input.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::{RenderDotError, Result};

/// Reads a document from a local file.
///
/// # Errors
///
/// Returns [`RenderDotError::InputNotFound`] when the path does not exist, is
/// not a file, or cannot be opened, and [`RenderDotError::Io`] for any other
/// read failure (such as invalid UTF-8).
pub fn fetch_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(RenderDotError::InputNotFound(path.to_path_buf()));
    }

    fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
            RenderDotError::InputNotFound(path.to_path_buf())
        }
        _ => RenderDotError::from(err),
    })
}

/// Reads a document from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(RenderDotError::from)?;

    Ok(buffer)
}
