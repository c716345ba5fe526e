//! Main extraction API.
//!
//! This module ties the pieces together: locate the `renderDot` call, parse
//! the DOT source, and scan the surrounding document for modal containers.
//! The entry point is [`DepGraphExtractor`], along with the convenience
//! functions [`extract_dep_graph`] and [`extract_dep_graph_from_file`].
//!
//! # Example
//!
//! ```rust
//! use renderdot_core::extract_dep_graph;
//!
//! let html = r#"<script>g.renderDot(`strict digraph "" { "a" [shape=box]; "a" -> "b"; }`)</script>
//!     <div class="dep-modal-container" id="a_modal"><p>A</p></div>"#;
//!
//! let graph = extract_dep_graph(html).unwrap();
//! assert_eq!(graph.record().nodes()[0].id, "a");
//! assert_eq!(graph.node_info(), ["a"]);
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dot::{ParseReport, parse_dot_with_report};
use crate::extract::{DEFAULT_CALL_NAME, Extractor};
use crate::fetch::fetch_file;
use crate::parse::{DEFAULT_MODAL_CLASS, DEFAULT_MODAL_SUFFIX, Document};
use crate::record::GraphRecord;
use crate::Result;

/// Configuration for dependency graph extraction.
///
/// # Example
///
/// ```rust
/// use renderdot_core::DepGraphConfig;
///
/// let config = DepGraphConfig::builder()
///     .call_name("drawGraph")
///     .collect_node_info(false)
///     .build();
/// assert_eq!(config.call_name, "drawGraph");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepGraphConfig {
    /// Name of the rendering call carrying the DOT literal (default: `renderDot`).
    pub call_name: String,

    /// Class of the per-node modal containers (default: `dep-modal-container`).
    pub modal_class: String,

    /// Suffix stripped from container ids (default: `_modal`).
    pub modal_suffix: String,

    /// Whether to scan the document for modal containers (default: true).
    pub collect_node_info: bool,
}

impl Default for DepGraphConfig {
    fn default() -> Self {
        Self {
            call_name: DEFAULT_CALL_NAME.to_string(),
            modal_class: DEFAULT_MODAL_CLASS.to_string(),
            modal_suffix: DEFAULT_MODAL_SUFFIX.to_string(),
            collect_node_info: true,
        }
    }
}

impl DepGraphConfig {
    /// Creates a new builder for DepGraphConfig.
    pub fn builder() -> DepGraphConfigBuilder {
        DepGraphConfigBuilder::new()
    }
}

/// Builder for DepGraphConfig.
pub struct DepGraphConfigBuilder {
    config: DepGraphConfig,
}

impl DepGraphConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: DepGraphConfig::default() }
    }

    /// Sets the rendering call name.
    pub fn call_name(mut self, value: impl Into<String>) -> Self {
        self.config.call_name = value.into();
        self
    }

    /// Sets the modal container class.
    pub fn modal_class(mut self, value: impl Into<String>) -> Self {
        self.config.modal_class = value.into();
        self
    }

    /// Sets the suffix stripped from container ids.
    pub fn modal_suffix(mut self, value: impl Into<String>) -> Self {
        self.config.modal_suffix = value.into();
        self
    }

    /// Sets whether modal containers are collected.
    pub fn collect_node_info(mut self, value: bool) -> Self {
        self.config.collect_node_info = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> DepGraphConfig {
        self.config
    }
}

impl Default for DepGraphConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A parsed graph plus the container identifiers scraped from its document.
///
/// Serializes to the durable output shape: `graph`, `node`, `edge`, `nodes`,
/// `edges` and `node_info`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepGraph {
    #[serde(flatten)]
    record: GraphRecord,
    node_info: Vec<String>,
    #[serde(skip)]
    node_content: IndexMap<String, String>,
    #[serde(skip)]
    report: ParseReport,
}

impl DepGraph {
    /// Wraps a record with no container information.
    pub fn from_record(record: GraphRecord) -> Self {
        Self { record, ..Default::default() }
    }

    pub fn record(&self) -> &GraphRecord {
        &self.record
    }

    /// Container identifiers in document order, without duplicates.
    pub fn node_info(&self) -> &[String] {
        &self.node_info
    }

    /// Inner HTML of each node's modal container, keyed by node id.
    pub fn node_content(&self) -> &IndexMap<String, String> {
        &self.node_content
    }

    /// Statements the parser skipped.
    pub fn report(&self) -> &ParseReport {
        &self.report
    }
}

/// Main entry point for dependency graph extraction.
///
/// # Example
///
/// ```rust
/// use renderdot_core::{DepGraphConfig, DepGraphExtractor};
///
/// let extractor = DepGraphExtractor::with_config(DepGraphConfig::builder().collect_node_info(false).build()).unwrap();
/// let graph = extractor.extract("renderDot(`digraph { a -> b }`)").unwrap();
/// assert_eq!(graph.record().edges().len(), 1);
/// ```
pub struct DepGraphExtractor {
    config: DepGraphConfig,
    extractor: Extractor,
}

impl DepGraphExtractor {
    /// Creates an extractor with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(DepGraphConfig::default())
    }

    /// Creates an extractor with a custom configuration.
    ///
    /// The call pattern is compiled once here and reused by every
    /// [`DepGraphExtractor::extract`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::RenderDotError::HtmlParseError`] if `call_name` does not form
    /// a valid search pattern.
    pub fn with_config(config: DepGraphConfig) -> Result<Self> {
        let extractor = Extractor::new(&config.call_name)?;
        Ok(Self { config, extractor })
    }

    pub fn config(&self) -> &DepGraphConfig {
        &self.config
    }

    /// Extracts the dependency graph from document text.
    ///
    /// # Errors
    ///
    /// - [`crate::RenderDotError::NotFound`] when the document has no rendering call.
    /// - [`crate::RenderDotError::MalformedInput`] when the call's literal or the DOT
    ///   body is malformed.
    pub fn extract(&self, html: &str) -> Result<DepGraph> {
        let embedded = self.extractor.extract(html)?;
        let (record, report) = parse_dot_with_report(&embedded.source)?;

        let (node_info, node_content) = if self.config.collect_node_info {
            Document::parse(html)?.modal_nodes(&self.config.modal_class, &self.config.modal_suffix)?
        } else {
            Default::default()
        };

        debug!(
            nodes = record.nodes().len(),
            edges = record.edges().len(),
            node_info = node_info.len(),
            "extracted dependency graph"
        );

        Ok(DepGraph { record, node_info, node_content, report })
    }

    /// Reads a document from disk and extracts its dependency graph.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RenderDotError::InputNotFound`] when the file does not exist,
    /// plus everything [`DepGraphExtractor::extract`] can return.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<DepGraph> {
        let html = fetch_file(path)?;
        self.extract(&html)
    }
}

/// Convenience function for one-liner extraction with defaults.
pub fn extract_dep_graph(html: &str) -> Result<DepGraph> {
    DepGraphExtractor::new()?.extract(html)
}

/// Convenience function for extracting from a file with defaults.
pub fn extract_dep_graph_from_file<P: AsRef<Path>>(path: P) -> Result<DepGraph> {
    DepGraphExtractor::new()?.extract_file(path)
}
