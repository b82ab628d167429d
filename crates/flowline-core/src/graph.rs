//! Flowchart graph model.
//!
//! A [`Graph`] is the raw material every pipeline stage consumes: a listing of
//! uniquely identified [`Node`]s and a list of directed [`Edge`]s. The graph
//! itself enforces only id uniqueness. Referential integrity, self-loops and
//! decision-branch labels are repaired downstream by the sanitizer.
//!
//! Node listing order is preserved and is semantically relevant: level
//! assignment infers the root from it.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use indexmap::IndexMap;
use log::warn;
use serde::Serialize;
use thiserror::Error;

/// Errors raised by direct graph edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("unknown node `{0}`")]
    UnknownNode(String),
}

/// The closed set of visual node kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Shape {
    /// A plain processing step (default)
    #[default]
    Process,
    /// A branching point; its outgoing edges must be labeled
    Decision,
    /// A start or end point, drawn as a pill
    Terminal,
    /// Data input or output, drawn as a parallelogram
    DataIo,
}

impl Shape {
    /// Returns true for shapes whose outgoing edges must carry a label.
    pub fn requires_labeled_branches(self) -> bool {
        matches!(self, Self::Decision)
    }
}

impl FromStr for Shape {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "process" => Ok(Self::Process),
            "decision" => Ok(Self::Decision),
            "terminal" | "pill" => Ok(Self::Terminal),
            "data-io" | "data_io" | "dataio" | "parallelogram" => Ok(Self::DataIo),
            _ => Err("Unsupported node shape"),
        }
    }
}

impl From<Shape> for &'static str {
    fn from(val: Shape) -> Self {
        match val {
            Shape::Process => "process",
            Shape::Decision => "decision",
            Shape::Terminal => "terminal",
            Shape::DataIo => "data-io",
        }
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// A single flowchart step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: String,
    label: String,
    shape: Shape,
}

impl Node {
    /// Creates a new node.
    ///
    /// # Arguments
    ///
    /// * `id` - Identifier, unique within a graph
    /// * `label` - Display text
    /// * `shape` - Visual kind
    pub fn new(id: impl Into<String>, label: impl Into<String>, shape: Shape) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            shape,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    fn set_label(&mut self, label: String) {
        self.label = label;
    }
}

/// A directed edge between two node ids, optionally labeled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    source: String,
    target: String,
    label: Option<String>,
}

impl Edge {
    /// Creates an unlabeled edge from `source` to `target`.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label: None,
        }
    }

    /// Returns the edge with the given label attached.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the label verbatim, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns true if the edge carries a label that is not blank.
    ///
    /// # Examples
    ///
    /// ```
    /// # use flowline_core::graph::Edge;
    /// assert!(Edge::new("a", "b").with_label("Yes").has_label());
    /// assert!(!Edge::new("a", "b").with_label("  ").has_label());
    /// assert!(!Edge::new("a", "b").has_label());
    /// ```
    pub fn has_label(&self) -> bool {
        self.label
            .as_deref()
            .is_some_and(|label| !label.trim().is_empty())
    }

    /// Returns true if the edge starts and ends at the same node.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// A flowchart graph: uniquely identified nodes in listing order plus a list
/// of directed edges.
///
/// Parallel edges between the same ordered pair are kept as distinct entries.
///
/// # Examples
///
/// ```
/// use flowline_core::graph::{Edge, Graph, Node, Shape};
///
/// let graph = Graph::from_parts(
///     [
///         Node::new("start", "Start", Shape::Terminal),
///         Node::new("work", "Do the work", Shape::Process),
///     ],
///     [Edge::new("start", "work")],
/// );
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edges().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    nodes: IndexMap<String, Node>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from node and edge listings.
    ///
    /// Nodes with an id that was already declared are dropped (first
    /// declaration wins). Edges are taken as-is.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = Node>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Self {
        let mut graph = Self::new();
        for node in nodes {
            graph.add_node(node);
        }
        graph.edges.extend(edges);
        graph
    }

    /// Appends a node, keeping the first declaration on id collision.
    ///
    /// Returns `false` if a node with the same id already existed.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.nodes.contains_key(node.id()) {
            warn!(node_id = node.id(); "Duplicate node id, keeping first declaration");
            return false;
        }
        self.nodes.insert(node.id.clone(), node);
        true
    }

    /// Appends an edge. Endpoints are not validated.
    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Returns a copy of this graph's nodes paired with a new edge list.
    pub fn with_edges(&self, edges: Vec<Edge>) -> Self {
        Self {
            nodes: self.nodes.clone(),
            edges,
        }
    }

    /// Returns the node with the given id, if it exists.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Returns the listing position of a node, if it exists.
    pub fn node_position(&self, id: &str) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    /// Checks if a node with the given id exists.
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Iterates nodes in listing order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Overwrites the label of one node.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if no node has the given id; the
    /// graph is left untouched.
    pub fn set_label(&mut self, id: &str, label: impl Into<String>) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::UnknownNode(id.to_string()))?;
        node.set_label(label.into());
        Ok(())
    }
}
