//! Post-parse summary of a dependency graph.
//!
//! The summary is informational: it reports the counts and the lenient-parse
//! leftovers (duplicate nodes, edges to undeclared nodes) that a consumer may
//! want to look at, without changing the record.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::Serialize;

use crate::depgraph::DepGraph;

/// How many nodes to list in the degree rankings by default.
pub const DEFAULT_TOP_N: usize = 5;

/// A node and its number of incident edges in one direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DegreeEntry {
    pub id: String,
    pub degree: usize,
}

/// An edge id shared by more than one edge statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParallelEdge {
    pub id: String,
    pub count: usize,
}

/// Counts and consistency findings for a parsed graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    /// Node statements, redeclarations included.
    pub node_count: usize,
    /// Distinct node ids among the node statements.
    pub distinct_node_count: usize,
    pub edge_count: usize,
    pub node_info_count: usize,
    pub skipped_statements: usize,
    /// Ids declared by more than one node statement.
    pub duplicate_nodes: Vec<String>,
    /// Edge endpoints with no node statement, in first-seen order.
    pub undeclared_endpoints: Vec<String>,
    /// Declared nodes touched by no edge.
    pub isolated_nodes: Vec<String>,
    /// `node_info` entries with no node statement.
    pub unmatched_node_info: Vec<String>,
    /// Most depended-upon nodes (edge targets).
    pub top_in_degree: Vec<DegreeEntry>,
    /// Nodes with the most dependencies (edge sources).
    pub top_out_degree: Vec<DegreeEntry>,
    /// Edge count per effective `style` (`solid` when unset).
    pub edge_styles: IndexMap<String, usize>,
    /// Distinct nodes per effective `shape` (`ellipse` when unset).
    pub node_shapes: IndexMap<String, usize>,
    /// Edge ids that occur more than once, in first-seen order.
    pub parallel_edges: Vec<ParallelEdge>,
}

impl GraphSummary {
    /// Summarizes a graph, ranking the top [`DEFAULT_TOP_N`] nodes.
    pub fn from_graph(graph: &DepGraph) -> Self {
        Self::with_top_n(graph, DEFAULT_TOP_N)
    }

    pub fn with_top_n(graph: &DepGraph, top_n: usize) -> Self {
        let record = graph.record();

        let mut declared: IndexMap<&str, usize> = IndexMap::new();
        for node in record.nodes() {
            *declared.entry(node.id.as_str()).or_default() += 1;
        }

        let duplicate_nodes = declared
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(id, _)| id.to_string())
            .collect();

        let mut in_degree: IndexMap<&str, usize> = IndexMap::new();
        let mut out_degree: IndexMap<&str, usize> = IndexMap::new();
        let mut undeclared: IndexMap<&str, ()> = IndexMap::new();
        let mut edge_styles: IndexMap<String, usize> = IndexMap::new();

        for edge in record.edges() {
            *out_degree.entry(edge.source.as_str()).or_default() += 1;
            *in_degree.entry(edge.target.as_str()).or_default() += 1;

            for endpoint in [edge.source.as_str(), edge.target.as_str()] {
                if !declared.contains_key(endpoint) {
                    undeclared.insert(endpoint, ());
                }
            }

            let style = record.edge_attribute(edge, "style").unwrap_or("solid");
            *edge_styles.entry(style.to_string()).or_default() += 1;
        }

        let isolated_nodes = declared
            .keys()
            .filter(|id| !in_degree.contains_key(*id) && !out_degree.contains_key(*id))
            .map(|id| id.to_string())
            .collect();

        let unmatched_node_info = graph
            .node_info()
            .iter()
            .filter(|id| !declared.contains_key(id.as_str()))
            .cloned()
            .collect();

        let node_shapes = group_nodes_by(graph, "shape", "ellipse")
            .into_iter()
            .map(|(shape, ids)| (shape, ids.len()))
            .collect();

        Self {
            node_count: record.nodes().len(),
            distinct_node_count: declared.len(),
            edge_count: record.edges().len(),
            node_info_count: graph.node_info().len(),
            skipped_statements: graph.report().skipped.len(),
            duplicate_nodes,
            undeclared_endpoints: undeclared.keys().map(|id| id.to_string()).collect(),
            isolated_nodes,
            unmatched_node_info,
            top_in_degree: rank(&in_degree, top_n),
            top_out_degree: rank(&out_degree, top_n),
            edge_styles,
            node_shapes,
            parallel_edges: parallel_edges(graph),
        }
    }

    /// True when every edge endpoint and every `node_info` entry refers to a
    /// declared node.
    pub fn is_consistent(&self) -> bool {
        self.undeclared_endpoints.is_empty() && self.unmatched_node_info.is_empty()
    }
}

/// Highest degrees first; ties keep first-seen order.
fn rank(degrees: &IndexMap<&str, usize>, top_n: usize) -> Vec<DegreeEntry> {
    let mut entries: Vec<DegreeEntry> = degrees
        .iter()
        .map(|(id, degree)| DegreeEntry { id: id.to_string(), degree: *degree })
        .collect();
    entries.sort_by(|a, b| b.degree.cmp(&a.degree));
    entries.truncate(top_n);
    entries
}

/// Groups distinct node ids by an attribute's effective value (explicit or
/// default), using `fallback` for nodes without the attribute.
fn group_nodes_by(graph: &DepGraph, key: &str, fallback: &str) -> IndexMap<String, Vec<String>> {
    let record = graph.record();
    let mut seen = HashSet::new();
    let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();

    for node in record.nodes() {
        if !seen.insert(node.id.as_str()) {
            continue;
        }
        let value = record.node_attribute(node, key).unwrap_or(fallback).to_string();
        groups.entry(value).or_default().push(node.id.clone());
    }

    groups
}

/// Edge ids shared by more than one edge.
fn parallel_edges(graph: &DepGraph) -> Vec<ParallelEdge> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order = Vec::new();

    for edge in graph.record().edges() {
        let count = counts.entry(edge.id.as_str()).or_default();
        if *count == 0 {
            order.push(edge.id.as_str());
        }
        *count += 1;
    }

    order
        .into_iter()
        .filter_map(|id| {
            counts
                .get(id)
                .filter(|count| **count > 1)
                .map(|count| ParallelEdge { id: id.to_string(), count: *count })
        })
        .collect()
}
