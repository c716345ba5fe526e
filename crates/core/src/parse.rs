//! HTML parsing and modal container discovery.
//!
//! Besides the embedded DOT string, blueprint-style documents carry one
//! hidden `<div class="dep-modal-container" id="<node>_modal">` per graph node
//! holding the node's rendered statement. This module wraps the DOM and
//! collects those containers.
//!
//! # Example
//!
//! ```rust
//! use renderdot_core::parse::Document;
//!
//! let html = r#"
//!     <div class="dep-modal-container" id="thm_a_modal"><p>A</p></div>
//!     <div class="dep-modal-container" id="def_b_modal"><p>B</p></div>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! let ids = doc.node_info("dep-modal-container", "_modal").unwrap();
//! assert_eq!(ids, vec!["thm_a", "def_b"]);
//! ```

use indexmap::IndexMap;
use scraper::{Html, Selector};
use tracing::warn;

use crate::{RenderDotError, Result};

/// Default class of the per-node modal containers.
pub const DEFAULT_MODAL_CLASS: &str = "dep-modal-container";

/// Default suffix appended to a node id to form its container id.
pub const DEFAULT_MODAL_SUFFIX: &str = "_modal";

/// Represents a parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// HTML parsing is error-tolerant, so this only fails for reasons outside
    /// the markup itself.
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html })
    }

    /// Gets the raw HTML representation.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`RenderDotError::HtmlParseError`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = Selector::parse(selector)
            .map_err(|e| RenderDotError::HtmlParseError(format!("Invalid selector: {}", e)))?;

        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Returns every `div` carrying `class`, in document order.
    pub fn modal_containers(&'_ self, class: &str) -> Result<Vec<Element<'_>>> {
        self.select(&format!("div.{}", escape_class(class)))
    }

    /// Collects node identifiers from the modal containers.
    ///
    /// Each container's `id` has `suffix` stripped when present. Containers
    /// without an id are skipped. Duplicates are removed, keeping the first
    /// occurrence.
    pub fn node_info(&self, class: &str, suffix: &str) -> Result<Vec<String>> {
        Ok(self.modal_nodes(class, suffix)?.0)
    }

    /// Maps each node identifier to the inner HTML of its modal container.
    ///
    /// When a container has exactly one child element, that element's HTML is
    /// used; otherwise the whole inner HTML is kept. The first container wins
    /// for duplicated ids.
    pub fn node_content(&self, class: &str, suffix: &str) -> Result<IndexMap<String, String>> {
        Ok(self.modal_nodes(class, suffix)?.1)
    }

    /// Collects both [`Document::node_info`] and [`Document::node_content`]
    /// from a single walk over the modal containers.
    pub fn modal_nodes(&self, class: &str, suffix: &str) -> Result<(Vec<String>, IndexMap<String, String>)> {
        let mut ids = Vec::new();
        let mut content = IndexMap::new();

        for container in self.modal_containers(class)? {
            let Some(id) = container.node_id(suffix) else {
                warn!(class, "skipping modal container without an id");
                continue;
            };
            if !content.contains_key(&id) {
                content.insert(id.clone(), container.sole_child_html());
                ids.push(id);
            }
        }

        Ok((ids, content))
    }
}

/// Escapes characters that would end a CSS class selector early.
fn escape_class(class: &str) -> String {
    let mut escaped = String::with_capacity(class.len());
    for c in class.chars() {
        if !(c.is_alphanumeric() || c == '-' || c == '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// A wrapper around scraper's ElementRef.
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: scraper::ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the inner HTML of this element.
    pub fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.element.value().attr(name)
    }

    /// The container's `id` with `suffix` removed, or `None` when the id is
    /// missing or empty.
    fn node_id(&self, suffix: &str) -> Option<String> {
        let id = self.attr("id")?.trim();
        let id = id.strip_suffix(suffix).unwrap_or(id);
        (!id.is_empty()).then(|| id.to_string())
    }

    fn sole_child_html(&self) -> String {
        let mut children = self.element.child_elements();
        match (children.next(), children.next()) {
            (Some(only), None) => only.html(),
            _ => self.inner_html().trim().to_string(),
        }
    }
}
