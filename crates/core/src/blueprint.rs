//! Blueprint interpretation of a dependency graph.
//!
//! Blueprint generators encode each node's role and progress in its DOT
//! styling: the shape says whether it is a theorem or a definition, the
//! border color tracks the statement, the fill color tracks the proof, and
//! dashed edges mark dependencies of the statement rather than of the proof.
//! [`Blueprint::from_graph`] decodes those conventions into one record per
//! node.
//!
//! Values outside the known palette are reported as `unrecognized`, missing
//! attributes as `unknown`; neither is an error.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::depgraph::DepGraph;
use crate::record::AttributeMap;

/// What a node declares, from its `shape`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Theorem,
    Definition,
    Unrecognized,
    Unknown,
}

impl NodeKind {
    pub fn from_shape(shape: Option<&str>) -> Self {
        match shape {
            Some("ellipse") => NodeKind::Theorem,
            Some("box") => NodeKind::Definition,
            Some(_) => NodeKind::Unrecognized,
            None => NodeKind::Unknown,
        }
    }
}

/// Progress of the formal statement, from the border `color`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeStatus {
    Stated,
    CanState,
    NotReady,
    Mathlib,
    Unrecognized,
    Unknown,
}

impl TypeStatus {
    pub fn from_color(color: Option<&str>) -> Self {
        match color {
            Some("green") => TypeStatus::Stated,
            Some("blue") => TypeStatus::CanState,
            Some(c) if c.eq_ignore_ascii_case("#FFAA33") => TypeStatus::NotReady,
            Some("darkgreen") => TypeStatus::Mathlib,
            Some(_) => TypeStatus::Unrecognized,
            None => TypeStatus::Unknown,
        }
    }
}

/// Progress of the proof or definition body, from the `fillcolor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TermStatus {
    Proved,
    Defined,
    CanProve,
    FullyProved,
    Unrecognized,
    Unknown,
}

impl TermStatus {
    pub fn from_fillcolor(fillcolor: Option<&str>) -> Self {
        let Some(fill) = fillcolor else {
            return TermStatus::Unknown;
        };

        match fill.to_ascii_uppercase().as_str() {
            "#9CEC8B" => TermStatus::Proved,
            "#B0ECA3" => TermStatus::Defined,
            "#A3D6FF" => TermStatus::CanProve,
            "#1CAC78" => TermStatus::FullyProved,
            _ => TermStatus::Unrecognized,
        }
    }
}

/// One node of the blueprint view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BlueprintNode {
    pub kind: NodeKind,
    pub label: String,
    /// Inner HTML of the node's modal container, empty when there is none.
    pub content: String,
    pub type_status: TypeStatus,
    pub term_status: TermStatus,
    /// Targets of dashed edges leaving this node.
    pub type_dependencies: Vec<String>,
    /// Targets of all other edges leaving this node.
    pub term_dependencies: Vec<String>,
}

/// Blueprint view of a whole graph, keyed by node id in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Blueprint {
    nodes: IndexMap<String, BlueprintNode>,
}

impl Blueprint {
    /// Builds the view from a parsed graph.
    ///
    /// A node declared more than once is merged, later attributes winning.
    /// Edges leaving an undeclared node are ignored.
    pub fn from_graph(graph: &DepGraph) -> Self {
        let record = graph.record();
        let defaults = record.defaults();

        let mut merged: IndexMap<&str, AttributeMap> = IndexMap::new();
        for node in record.nodes() {
            merged
                .entry(node.id.as_str())
                .or_default()
                .extend(node.attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        let mut nodes: IndexMap<String, BlueprintNode> = merged
            .into_iter()
            .map(|(id, attributes)| {
                let get = |key: &str| attributes.get(key).or_else(|| defaults.node.get(key)).map(String::as_str);
                let label = match get("label") {
                    Some(label) if label != "\\N" => label.to_string(),
                    _ => id.to_string(),
                };
                let node = BlueprintNode {
                    kind: NodeKind::from_shape(get("shape")),
                    label,
                    content: graph.node_content().get(id).cloned().unwrap_or_default(),
                    type_status: TypeStatus::from_color(get("color")),
                    term_status: TermStatus::from_fillcolor(get("fillcolor")),
                    type_dependencies: Vec::new(),
                    term_dependencies: Vec::new(),
                };
                (id.to_string(), node)
            })
            .collect();

        for edge in record.edges() {
            let dashed = record.edge_attribute(edge, "style") == Some("dashed");
            let Some(source) = nodes.get_mut(&edge.source) else {
                debug!(edge = edge.id.as_str(), "ignoring edge from undeclared node");
                continue;
            };
            if dashed {
                source.type_dependencies.push(edge.target.clone());
            } else {
                source.term_dependencies.push(edge.target.clone());
            }
        }

        Self { nodes }
    }

    pub fn nodes(&self) -> &IndexMap<String, BlueprintNode> {
        &self.nodes
    }

    pub fn get(&self, id: &str) -> Option<&BlueprintNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_dot;

    fn blueprint(dot: &str) -> Blueprint {
        Blueprint::from_graph(&DepGraph::from_record(parse_dot(dot).unwrap()))
    }

    #[test]
    fn test_kind_from_shape() {
        assert_eq!(NodeKind::from_shape(Some("ellipse")), NodeKind::Theorem);
        assert_eq!(NodeKind::from_shape(Some("box")), NodeKind::Definition);
        assert_eq!(NodeKind::from_shape(Some("diamond")), NodeKind::Unrecognized);
        assert_eq!(NodeKind::from_shape(None), NodeKind::Unknown);
    }

    #[test]
    fn test_statuses() {
        assert_eq!(TypeStatus::from_color(Some("green")), TypeStatus::Stated);
        assert_eq!(TypeStatus::from_color(Some("blue")), TypeStatus::CanState);
        assert_eq!(TypeStatus::from_color(Some("#ffaa33")), TypeStatus::NotReady);
        assert_eq!(TypeStatus::from_color(Some("darkgreen")), TypeStatus::Mathlib);
        assert_eq!(TypeStatus::from_color(Some("red")), TypeStatus::Unrecognized);
        assert_eq!(TypeStatus::from_color(None), TypeStatus::Unknown);

        assert_eq!(TermStatus::from_fillcolor(Some("#9CEC8B")), TermStatus::Proved);
        assert_eq!(TermStatus::from_fillcolor(Some("#b0eca3")), TermStatus::Defined);
        assert_eq!(TermStatus::from_fillcolor(Some("#A3D6FF")), TermStatus::CanProve);
        assert_eq!(TermStatus::from_fillcolor(Some("#1CAC78")), TermStatus::FullyProved);
        assert_eq!(TermStatus::from_fillcolor(Some("white")), TermStatus::Unrecognized);
        assert_eq!(TermStatus::from_fillcolor(None), TermStatus::Unknown);
    }

    #[test]
    fn test_dependencies_split_by_style() {
        let view = blueprint(
            r##"digraph {
                "thm" [shape=ellipse, color=green, fillcolor="#9CEC8B", label=thm];
                "def" [shape=box];
                "lem" [shape=ellipse];
                "thm" -> "def" [style=dashed];
                "thm" -> "lem";
                "ghost" -> "thm";
            }"##,
        );

        let thm = view.get("thm").unwrap();
        assert_eq!(thm.kind, NodeKind::Theorem);
        assert_eq!(thm.type_status, TypeStatus::Stated);
        assert_eq!(thm.term_status, TermStatus::Proved);
        assert_eq!(thm.type_dependencies, vec!["def"]);
        assert_eq!(thm.term_dependencies, vec!["lem"]);
        assert_eq!(view.len(), 3);
        assert!(view.get("ghost").is_none());
    }

    #[test]
    fn test_defaults_and_label_placeholder() {
        let view = blueprint(r#"digraph { node [shape=box, label="\N"]; edge [style=dashed]; a; a -> b; b [label="B"] }"#);

        let a = view.get("a").unwrap();
        assert_eq!(a.kind, NodeKind::Definition);
        assert_eq!(a.label, "a");
        assert_eq!(a.type_dependencies, vec!["b"]);
        assert_eq!(view.get("b").unwrap().label, "B");
    }

    #[test]
    fn test_redeclared_node_merges() {
        let view = blueprint("digraph { a [shape=box]; a [color=blue] }");
        let a = view.get("a").unwrap();
        assert_eq!(view.len(), 1);
        assert_eq!(a.kind, NodeKind::Definition);
        assert_eq!(a.type_status, TypeStatus::CanState);
    }

    #[test]
    fn test_serialized_field_names() {
        let view = blueprint("digraph { a [shape=box] }");
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["a"]["kind"], "definition");
        assert_eq!(value["a"]["type-status"], "unknown");
        assert!(value["a"]["term-dependencies"].as_array().unwrap().is_empty());
    }
}
