//! JSON interchange.
//!
//! [`parse_graph`] reads the graph format produced by the generation
//! collaborator:
//!
//! ```json
//! {
//!   "nodes": [{ "id": "start", "label": "Start", "shape": "pill" }],
//!   "edges": [{ "source": "start", "target": "next", "label": "Yes" }]
//! }
//! ```
//!
//! Generators often wrap their answer in a Markdown code fence; the fence is
//! stripped before decoding. [`to_json`] writes a [`PositionedGraph`] for a
//! renderer, adding `level`, `x` and `y` to every node.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use flowline_core::graph::{Edge, Graph, Node, Shape};

use crate::{
    error::FlowError,
    layout::{LayoutDirection, PositionedGraph},
};

#[derive(Debug, Deserialize)]
struct RawGraph {
    #[serde(default)]
    nodes: Vec<RawNode>,
    #[serde(default)]
    edges: Vec<RawEdge>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    id: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default, alias = "type")]
    shape: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEdge {
    #[serde(alias = "from")]
    source: String,
    #[serde(alias = "to")]
    target: String,
    #[serde(default)]
    label: Option<String>,
}

impl RawNode {
    fn into_node(self) -> Node {
        let shape = match self.shape.as_deref() {
            None => Shape::default(),
            Some(name) => name.parse().unwrap_or_else(|_| {
                warn!(node_id = self.id, shape = name; "Unknown node shape, using process");
                Shape::default()
            }),
        };
        let label = self.label.unwrap_or_else(|| self.id.clone());
        Node::new(self.id, label, shape)
    }
}

impl RawEdge {
    fn into_edge(self) -> Edge {
        let edge = Edge::new(self.source, self.target);
        match self.label {
            Some(label) => edge.with_label(label),
            None => edge,
        }
    }
}

/// Decodes a generator response into a [`Graph`].
///
/// Missing labels default to the node id; missing or unknown shapes default
/// to [`Shape::Process`]. Duplicate node ids keep their first declaration.
/// Edges are taken as-is and are not validated here.
///
/// # Errors
///
/// Returns [`FlowError::Parse`] if the text is not a graph document.
///
/// # Examples
///
/// ```
/// use flowline::codec::parse_graph;
/// use flowline_core::graph::Shape;
///
/// let graph = parse_graph(r#"{
///     "nodes": [
///         {"id": "s", "label": "Start", "shape": "pill"},
///         {"id": "r", "label": "Read", "shape": "parallelogram"}
///     ],
///     "edges": [{"from": "s", "to": "r"}]
/// }"#).unwrap();
///
/// assert_eq!(graph.node("s").unwrap().shape(), Shape::Terminal);
/// assert_eq!(graph.node("r").unwrap().shape(), Shape::DataIo);
/// assert_eq!(graph.edges()[0].target(), "r");
/// ```
pub fn parse_graph(text: &str) -> Result<Graph, FlowError> {
    let body = strip_code_fence(text);
    let raw: RawGraph =
        serde_json::from_str(body).map_err(|err| FlowError::new_parse_error(&err, body))?;

    debug!(
        nodes_count = raw.nodes.len(),
        edges_count = raw.edges.len();
        "Decoded graph"
    );

    Ok(Graph::from_parts(
        raw.nodes.into_iter().map(RawNode::into_node),
        raw.edges.into_iter().map(RawEdge::into_edge),
    ))
}

/// Returns the contents of a surrounding Markdown code fence, or the trimmed
/// text if there is none.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`) on the opening line.
    match rest.split_once('\n') {
        Some((_, body)) => body.trim(),
        None => rest.trim(),
    }
}

#[derive(Debug, Serialize)]
struct PositionedGraphOut<'a> {
    direction: LayoutDirection,
    width: f32,
    height: f32,
    node_width: f32,
    node_height: f32,
    nodes: Vec<PositionedNodeOut<'a>>,
    edges: Vec<EdgeOut<'a>>,
}

#[derive(Debug, Serialize)]
struct PositionedNodeOut<'a> {
    id: &'a str,
    label: &'a str,
    shape: Shape,
    level: usize,
    x: f32,
    y: f32,
}

#[derive(Debug, Serialize)]
struct EdgeOut<'a> {
    source: &'a str,
    target: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'a str>,
}

/// Encodes a [`PositionedGraph`] as pretty-printed JSON.
///
/// `x` and `y` are node centers.
///
/// # Errors
///
/// Returns [`FlowError::Export`] if serialization fails.
pub fn to_json(layout: &PositionedGraph) -> Result<String, FlowError> {
    let out = PositionedGraphOut {
        direction: layout.direction(),
        width: layout.canvas_size().width(),
        height: layout.canvas_size().height(),
        node_width: layout.node_size().width(),
        node_height: layout.node_size().height(),
        nodes: layout
            .nodes()
            .iter()
            .map(|node| PositionedNodeOut {
                id: node.id(),
                label: node.label(),
                shape: node.shape(),
                level: node.level(),
                x: node.position().x(),
                y: node.position().y(),
            })
            .collect(),
        edges: layout
            .edges()
            .iter()
            .map(|edge| EdgeOut {
                source: edge.source(),
                target: edge.target(),
                label: edge.label(),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&out).map_err(|err| FlowError::Export(Box::new(err)))
}
