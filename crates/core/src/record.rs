//! The structured form of a parsed DOT graph.
//!
//! A [`GraphRecord`] is built in a single pass by [`crate::dot::parse_dot`]
//! and never mutated afterwards; the types here only expose read access.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Attribute name to value, in the order keys were first set.
pub type AttributeMap = IndexMap<String, String>;

/// Default attribute buckets populated by `graph [...]`, `node [...]` and
/// `edge [...]` statements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDefaults {
    pub graph: AttributeMap,
    pub node: AttributeMap,
    pub edge: AttributeMap,
}

/// A node statement with the attributes it set explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub attributes: AttributeMap,
}

/// An edge statement (or one hop of an edge chain).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// `"<source>-><target>"`. Not unique: parallel edges share it.
    pub id: String,
    pub source: String,
    pub target: String,
    pub attributes: AttributeMap,
}

impl EdgeRecord {
    pub fn new(source: impl Into<String>, target: impl Into<String>, attributes: AttributeMap) -> Self {
        let source = source.into();
        let target = target.into();
        Self { id: format!("{}->{}", source, target), source, target, attributes }
    }
}

/// A parsed graph: defaults, nodes and edges in source order.
///
/// Serializes to the `graph`, `node`, `edge`, `nodes` and `edges` keys; the
/// header information (`strict`, `directed`, name) is available through
/// accessors but is not part of the JSON output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphRecord {
    #[serde(skip)]
    strict: bool,
    #[serde(skip)]
    directed: bool,
    #[serde(skip)]
    name: Option<String>,
    #[serde(flatten)]
    defaults: GraphDefaults,
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
}

impl GraphRecord {
    pub(crate) fn new(
        header: GraphHeader, defaults: GraphDefaults, nodes: Vec<NodeRecord>, edges: Vec<EdgeRecord>,
    ) -> Self {
        Self { strict: header.strict, directed: header.directed, name: header.name, defaults, nodes, edges }
    }

    /// Whether the source declared the graph `strict`.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Whether the source declared a `digraph`. Headerless fragments count
    /// as directed.
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// The graph name, if one was given and is non-empty.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn defaults(&self) -> &GraphDefaults {
        &self.defaults
    }

    pub fn graph_attributes(&self) -> &AttributeMap {
        &self.defaults.graph
    }

    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    /// First node record with the given id.
    pub fn node(&self, id: &str) -> Option<&NodeRecord> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Looks up a node attribute, falling back to the `node` defaults when
    /// the node does not set it.
    pub fn node_attribute<'a>(&'a self, node: &'a NodeRecord, key: &str) -> Option<&'a str> {
        node.attributes
            .get(key)
            .or_else(|| self.defaults.node.get(key))
            .map(String::as_str)
    }

    /// Looks up an edge attribute, falling back to the `edge` defaults.
    pub fn edge_attribute<'a>(&'a self, edge: &'a EdgeRecord, key: &str) -> Option<&'a str> {
        edge.attributes
            .get(key)
            .or_else(|| self.defaults.edge.get(key))
            .map(String::as_str)
    }
}

/// Information from the `strict digraph NAME {` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GraphHeader {
    pub strict: bool,
    pub directed: bool,
    pub name: Option<String>,
}

impl Default for GraphHeader {
    fn default() -> Self {
        Self { strict: false, directed: true, name: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> AttributeMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_edge_id() {
        let edge = EdgeRecord::new("T1", "T2", AttributeMap::new());
        assert_eq!(edge.id, "T1->T2");
        assert_eq!(edge.source, "T1");
        assert_eq!(edge.target, "T2");
    }

    #[test]
    fn test_attribute_fallback() {
        let defaults = GraphDefaults {
            node: attrs(&[("shape", "ellipse"), ("color", "green")]),
            edge: attrs(&[("style", "solid")]),
            ..Default::default()
        };
        let node = NodeRecord { id: "a".into(), attributes: attrs(&[("shape", "box")]) };
        let edge = EdgeRecord::new("a", "b", AttributeMap::new());
        let record = GraphRecord::new(GraphHeader::default(), defaults, vec![node], vec![edge]);

        let node = &record.nodes()[0];
        assert_eq!(record.node_attribute(node, "shape"), Some("box"));
        assert_eq!(record.node_attribute(node, "color"), Some("green"));
        assert_eq!(record.node_attribute(node, "label"), None);
        assert_eq!(record.edge_attribute(&record.edges()[0], "style"), Some("solid"));
        assert!(node.attributes.get("color").is_none());
    }

    #[test]
    fn test_serialized_keys() {
        let record = GraphRecord::new(
            GraphHeader { strict: true, directed: true, name: Some("g".into()) },
            GraphDefaults::default(),
            vec![],
            vec![],
        );
        let value = serde_json::to_value(&record).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();

        assert_eq!(keys.len(), 5);
        for key in ["graph", "node", "edge", "nodes", "edges"] {
            assert!(keys.contains(&key), "missing {key}");
        }
    }

    #[test]
    fn test_attribute_order_preserved() {
        let node = NodeRecord { id: "n".into(), attributes: attrs(&[("z", "1"), ("a", "2"), ("m", "3")]) };
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"id":"n","attributes":{"z":"1","a":"2","m":"3"}}"#);
    }
}
