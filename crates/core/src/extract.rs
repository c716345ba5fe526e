//! Locating the embedded `renderDot(...)` call in a document.
//!
//! Documentation generators embed their dependency graph as a string literal
//! passed to a rendering call inside an inline script, e.g.
//!
//! ```text
//! d3.select("#graph").graphviz().renderDot(`strict digraph "" { ... }`);
//! ```
//!
//! The [`Extractor`] finds the first such call by plain text search and
//! decodes its literal argument. No DOM is needed for this step.

use regex::Regex;
use tracing::debug;

use crate::error::{Location, RenderDotError, Result};
use crate::escape::{EscapeMode, unescape};

/// Default name of the rendering call.
pub const DEFAULT_CALL_NAME: &str = "renderDot";

/// A decoded DOT string found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedDot {
    /// The decoded DOT source.
    pub source: String,
    /// Byte offset of the opening delimiter in the document.
    pub offset: usize,
    /// The quote character that delimited the literal.
    pub delimiter: char,
}

/// Finds `<call>(<literal>)` in arbitrary text.
#[derive(Debug, Clone)]
pub struct Extractor {
    call_name: String,
    pattern: Regex,
}

impl Extractor {
    /// Creates an extractor for the given call name.
    ///
    /// # Errors
    ///
    /// Returns [`RenderDotError::HtmlParseError`] if the name does not form a
    /// valid search pattern.
    pub fn new(call_name: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(r"\b{}\s*\(\s*", regex::escape(call_name)))
            .map_err(|e| RenderDotError::HtmlParseError(format!("Invalid call pattern: {}", e)))?;

        Ok(Self { call_name: call_name.to_string(), pattern })
    }

    /// The call name this extractor searches for.
    pub fn call_name(&self) -> &str {
        &self.call_name
    }

    /// Returns the first call whose argument is a string literal.
    ///
    /// Calls passing something other than a literal (a variable, say) are
    /// skipped; the search continues after them.
    ///
    /// # Errors
    ///
    /// - [`RenderDotError::NotFound`] when no call with a literal argument exists.
    /// - [`RenderDotError::MalformedInput`] when the literal is unterminated or
    ///   contains an invalid escape.
    pub fn extract(&self, text: &str) -> Result<EmbeddedDot> {
        for found in self.pattern.find_iter(text) {
            let start = found.end();
            let Some(delimiter) = text[start..].chars().next().filter(|c| matches!(c, '`' | '"' | '\'')) else {
                debug!(offset = found.start(), "skipping {} call without a string literal", self.call_name);
                continue;
            };

            let body_start = start + delimiter.len_utf8();
            let body_end = find_closing(text, body_start, delimiter).ok_or_else(|| {
                RenderDotError::malformed(Location::Offset(start), "unterminated string literal")
            })?;

            let source = unescape(&text[body_start..body_end], EscapeMode::Script, body_start)?;
            debug!(offset = start, len = source.len(), "extracted DOT source");

            return Ok(EmbeddedDot { source, offset: start, delimiter });
        }

        Err(RenderDotError::NotFound { call: self.call_name.clone() })
    }
}

/// Byte index of the delimiter closing a literal whose body starts at `from`.
///
/// Single and double quoted literals cannot span raw line breaks, so a
/// newline before the closing quote means the literal is unterminated.
fn find_closing(text: &str, from: usize, delimiter: char) -> Option<usize> {
    let mut chars = text[from..].char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '\n' if delimiter != '`' => return None,
            c if c == delimiter => return Some(from + i),
            _ => {}
        }
    }

    None
}

/// Extracts the DOT source from the first `renderDot(...)` call in `text`.
///
/// # Example
///
/// ```rust
/// use renderdot_core::extract_dot;
///
/// let html = r#"<script>viz.renderDot("digraph { a -> b }");</script>"#;
/// assert_eq!(extract_dot(html).unwrap(), "digraph { a -> b }");
/// ```
pub fn extract_dot(text: &str) -> Result<String> {
    Extractor::new(DEFAULT_CALL_NAME)?.extract(text).map(|embedded| embedded.source)
}
