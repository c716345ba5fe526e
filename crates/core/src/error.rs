//! Error types for renderdot operations.
//!
//! This module defines the main error type [`RenderDotError`] which represents
//! all possible errors that can occur while reading a document, locating the
//! embedded `renderDot` call, and parsing the DOT source it carries.
//!
//! # Example
//!
//! ```rust
//! use renderdot_core::{RenderDotError, Result};
//!
//! fn dot_source(html: &str) -> Result<String> {
//!     if html.is_empty() {
//!         return Err(RenderDotError::NotFound { call: "renderDot".to_string() });
//!     }
//!     // ... extraction logic
//!     # Ok(String::new())
//! }
//! ```

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Where in the input a malformed construct was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Byte offset into the text being decoded.
    Offset(usize),
    /// Zero-based statement index inside the DOT body, plus the byte offset of
    /// the offending character within the DOT source.
    Statement { index: usize, offset: usize },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Offset(offset) => write!(f, "offset {}", offset),
            Location::Statement { index, offset } => write!(f, "statement {} (offset {})", index, offset),
        }
    }
}

/// Coarse classification of a [`RenderDotError`].
///
/// The CLI maps each kind onto a distinct exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputNotFound,
    NotFound,
    MalformedInput,
    Other,
}

/// Main error type for extraction and parsing operations.
///
/// # Example
///
/// ```rust
/// use renderdot_core::{RenderDotError, extract_dep_graph};
///
/// match extract_dep_graph("<html><body>no graph here</body></html>") {
///     Ok(graph) => println!("{} nodes", graph.record().nodes().len()),
///     Err(RenderDotError::NotFound { call }) => println!("no {} call", call),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum RenderDotError {
    /// The source document does not exist.
    #[error("Input not found: {0}")]
    InputNotFound(PathBuf),

    /// No embedded DOT-producing call was found in the document.
    #[error("No {call}(...) call found in document")]
    NotFound { call: String },

    /// The embedded call's argument could not be decoded, or the DOT body
    /// contains an unterminated attribute list or quoted string.
    #[error("Malformed input at {location}: {reason}")]
    MalformedInput { location: Location, reason: String },

    /// HTML selector errors.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// JSON serialization errors.
    #[error("Failed to serialize output: {0}")]
    Serialize(String),

    /// Read/write errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderDotError {
    pub(crate) fn malformed(location: Location, reason: impl Into<String>) -> Self {
        RenderDotError::MalformedInput { location, reason: reason.into() }
    }

    /// Returns the coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RenderDotError::InputNotFound(_) => ErrorKind::InputNotFound,
            RenderDotError::NotFound { .. } => ErrorKind::NotFound,
            RenderDotError::MalformedInput { .. } => ErrorKind::MalformedInput,
            RenderDotError::HtmlParseError(_) | RenderDotError::Serialize(_) | RenderDotError::Io(_) => {
                ErrorKind::Other
            }
        }
    }
}

impl From<serde_json::Error> for RenderDotError {
    fn from(err: serde_json::Error) -> Self {
        RenderDotError::Serialize(err.to_string())
    }
}

/// Result type alias for RenderDotError.
pub type Result<T> = std::result::Result<T, RenderDotError>;
