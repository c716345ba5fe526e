use serde::Serialize;

use crate::Result;
use crate::blueprint::Blueprint;
use crate::depgraph::DepGraph;

/// Configuration for JSON output
#[derive(Debug, Clone)]
pub struct JsonConfig {
    /// Pretty print JSON output
    pub pretty: bool,
    /// Append a trailing newline
    pub trailing_newline: bool,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self { pretty: true, trailing_newline: true }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, config: &JsonConfig) -> Result<String> {
    let mut json = if config.pretty { serde_json::to_string_pretty(value)? } else { serde_json::to_string(value)? };
    if config.trailing_newline {
        json.push('\n');
    }
    Ok(json)
}

/// Convert a dependency graph to its JSON document
pub fn convert_to_json(graph: &DepGraph, config: &JsonConfig) -> Result<String> {
    to_json(graph, config)
}

/// Convert a blueprint view to JSON (for `--format blueprint`)
pub fn blueprint_to_json(blueprint: &Blueprint, config: &JsonConfig) -> Result<String> {
    to_json(blueprint, config)
}

/// JSON formatter with configurable options
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, graph: &DepGraph) -> Result<String> {
        convert_to_json(graph, &self.config)
    }

    pub fn blueprint(&self, graph: &DepGraph) -> Result<String> {
        blueprint_to_json(&Blueprint::from_graph(graph), &self.config)
    }
}
