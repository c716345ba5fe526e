pub mod analysis;
pub mod blueprint;
pub mod depgraph;
pub mod dot;
pub mod error;
pub mod escape;
pub mod extract;
pub mod fetch;
pub mod formatters;
pub mod parse;
pub mod record;

pub use analysis::{DegreeEntry, GraphSummary, ParallelEdge};
pub use blueprint::{Blueprint, BlueprintNode, NodeKind, TermStatus, TypeStatus};
pub use depgraph::{
    DepGraph, DepGraphConfig, DepGraphConfigBuilder, DepGraphExtractor, extract_dep_graph, extract_dep_graph_from_file,
};
pub use dot::{ParseReport, SkippedStatement, parse_dot, parse_dot_with_report};
pub use error::{ErrorKind, Location, RenderDotError, Result};
#[doc(hidden)]
pub use escape::{EscapeMode, unescape};
pub use extract::{EmbeddedDot, Extractor, extract_dot};
pub use fetch::{fetch_file, fetch_stdin};
pub use formatters::{JsonConfig, JsonFormatter, blueprint_to_json, convert_to_json};
pub use parse::Document;
pub use record::{AttributeMap, EdgeRecord, GraphDefaults, GraphRecord, NodeRecord};
