//! Coordinate assignment.
//!
//! [`compute_layout`] levels a graph and hands it to the engine selected by a
//! [`LayoutDirection`], producing a [`PositionedGraph`] a renderer can draw
//! directly. Leveling is redone on every call; switching direction back and
//! forth on the same graph reproduces identical coordinates.

pub mod engines;

pub use engines::{EngineBuilder, LayoutEngine};

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use flowline_core::{
    geometry::{Bounds, Insets, Point, Size},
    graph::{Edge, Graph, GraphError, Node, Shape},
};

use crate::{config::GeometryConfig, rank::assign_levels};

/// Which coordinate strategy to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutDirection {
    /// One row per level, stacked top to bottom (default)
    #[default]
    #[serde(alias = "tb")]
    TopBottom,
    /// Fixed-width grid filled in alternating row direction
    #[serde(alias = "zigzag")]
    Snake,
}

impl FromStr for LayoutDirection {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top-bottom" | "tb" => Ok(Self::TopBottom),
            "snake" | "zigzag" => Ok(Self::Snake),
            _ => Err("Unsupported layout direction"),
        }
    }
}

impl From<LayoutDirection> for &'static str {
    fn from(val: LayoutDirection) -> Self {
        match val {
            LayoutDirection::TopBottom => "top-bottom",
            LayoutDirection::Snake => "snake",
        }
    }
}

impl Display for LayoutDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// A node with its level and center position.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    node: Node,
    level: usize,
    position: Point,
}

impl PositionedNode {
    pub fn id(&self) -> &str {
        self.node.id()
    }

    pub fn label(&self) -> &str {
        self.node.label()
    }

    pub fn shape(&self) -> Shape {
        self.node.shape()
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Returns the node's center.
    pub fn position(&self) -> Point {
        self.position
    }
}

/// A laid-out graph, ready for rendering.
///
/// Nodes keep the listing order of the source graph.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedGraph {
    graph: Graph,
    nodes: Vec<PositionedNode>,
    direction: LayoutDirection,
    node_size: Size,
    canvas_size: Size,
}

impl PositionedGraph {
    pub fn nodes(&self) -> &[PositionedNode] {
        &self.nodes
    }

    /// Returns the positioned node with the given id.
    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    pub fn edges(&self) -> &[Edge] {
        self.graph.edges()
    }

    /// Returns the graph this layout was computed from.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn direction(&self) -> LayoutDirection {
        self.direction
    }

    /// Returns the size of every node box.
    pub fn node_size(&self) -> Size {
        self.node_size
    }

    /// Returns the canvas extent: every node box plus the padding on the right
    /// and bottom edge. Zero for an empty graph.
    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    /// Returns the box a node occupies.
    pub fn node_bounds(&self, id: &str) -> Option<Bounds> {
        self.node(id)
            .map(|node| node.position().to_bounds(self.node_size))
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Overwrites the label of one node without touching its level or
    /// position.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if no node has the given id.
    pub fn set_label(&mut self, id: &str, label: impl Into<String>) -> Result<(), GraphError> {
        let label = label.into();
        self.graph.set_label(id, label.clone())?;
        if let Some(positioned) = self.nodes.iter_mut().find(|node| node.id() == id) {
            positioned.node = Node::new(positioned.id(), label, positioned.shape());
        }
        Ok(())
    }
}

/// Levels `graph` and assigns coordinates with the engine for `direction`.
///
/// The graph should already be sanitized. An empty graph yields an empty
/// layout. Geometry is taken as-is; see
/// [`GeometryConfig::validate`](crate::config::GeometryConfig::validate).
///
/// # Examples
///
/// ```
/// use flowline::{
///     config::GeometryConfig,
///     layout::{LayoutDirection, compute_layout},
/// };
/// use flowline_core::graph::{Edge, Graph, Node, Shape};
///
/// let graph = Graph::from_parts(
///     [
///         Node::new("start", "Start", Shape::Terminal),
///         Node::new("end", "End", Shape::Terminal),
///     ],
///     [Edge::new("start", "end")],
/// );
///
/// let layout = compute_layout(&graph, LayoutDirection::TopBottom, &GeometryConfig::default());
/// let start = layout.node("start").unwrap();
/// let end = layout.node("end").unwrap();
/// assert_eq!(start.level(), 0);
/// assert_eq!(end.level(), 1);
/// assert!(start.position().y() < end.position().y());
/// ```
pub fn compute_layout(
    graph: &Graph,
    direction: LayoutDirection,
    geometry: &GeometryConfig,
) -> PositionedGraph {
    let mut builder = EngineBuilder::new().with_geometry(geometry.clone());
    layout_with(&mut builder, graph, direction)
}

/// Same as [`compute_layout`] but reuses the engines cached in `builder`.
pub fn layout_with(
    builder: &mut EngineBuilder,
    graph: &Graph,
    direction: LayoutDirection,
) -> PositionedGraph {
    let node_size = builder.geometry().node_size();
    let insets = builder.geometry().insets();

    if graph.is_empty() {
        debug!("Empty graph, nothing to lay out");
        return PositionedGraph {
            graph: graph.clone(),
            nodes: Vec::new(),
            direction,
            node_size,
            canvas_size: Size::default(),
        };
    }

    let leveled = assign_levels(graph);
    let mut positions = builder.engine(direction).place(&leveled);

    let nodes: Vec<PositionedNode> = graph
        .nodes()
        .map(|node| PositionedNode {
            node: node.clone(),
            level: leveled.level(node.id()).unwrap_or_default(),
            // Engines place every node of the leveled graph.
            position: positions.remove(node.id()).unwrap_or_default(),
        })
        .collect();

    let canvas_size = canvas_size(&nodes, node_size, insets);
    info!(
        direction:% = direction,
        nodes_count = nodes.len(),
        width = canvas_size.width(),
        height = canvas_size.height();
        "Layout calculated"
    );

    PositionedGraph {
        graph: graph.clone(),
        nodes,
        direction,
        node_size,
        canvas_size,
    }
}

/// Right and bottom edge of all node boxes, extended by the padding.
fn canvas_size(nodes: &[PositionedNode], node_size: Size, insets: Insets) -> Size {
    nodes
        .iter()
        .map(|node| node.position().to_bounds(node_size))
        .reduce(|acc, bounds| acc.merge(&bounds))
        .map(|bounds| {
            let padded = bounds.add_padding(Insets::new(0.0, insets.right(), insets.bottom(), 0.0));
            Size::new(padded.max_x(), padded.max_y())
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::sanitize::sanitize;

    fn flow() -> Graph {
        Graph::from_parts(
            [
                Node::new("start", "Start", Shape::Terminal),
                Node::new("read", "Read input", Shape::DataIo),
                Node::new("valid", "Valid?", Shape::Decision),
                Node::new("save", "Save", Shape::Process),
                Node::new("warn", "Warn user", Shape::Process),
                Node::new("end", "End", Shape::Terminal),
            ],
            [
                Edge::new("start", "read"),
                Edge::new("read", "valid"),
                Edge::new("valid", "save").with_label("Yes"),
                Edge::new("valid", "warn").with_label("No"),
                Edge::new("save", "end"),
                Edge::new("warn", "read"),
            ],
        )
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!("top-bottom".parse(), Ok(LayoutDirection::TopBottom));
        assert_eq!("tb".parse(), Ok(LayoutDirection::TopBottom));
        assert_eq!("snake".parse(), Ok(LayoutDirection::Snake));
        assert_eq!("zigzag".parse(), Ok(LayoutDirection::Snake));
        assert!("sideways".parse::<LayoutDirection>().is_err());
        assert_eq!(LayoutDirection::Snake.to_string(), "snake");
    }

    #[test]
    fn test_switching_direction_is_reproducible() {
        let graph = sanitize(&flow());
        let geometry = GeometryConfig::default();
        let mut builder = EngineBuilder::new().with_geometry(geometry.clone());

        let tb_first = layout_with(&mut builder, &graph, LayoutDirection::TopBottom);
        let snake = layout_with(&mut builder, &graph, LayoutDirection::Snake);
        let tb_second = layout_with(&mut builder, &graph, LayoutDirection::TopBottom);

        assert_eq!(tb_first, tb_second);
        assert_eq!(
            snake,
            compute_layout(&graph, LayoutDirection::Snake, &geometry)
        );
        assert_ne!(tb_first, snake);
    }

    #[test]
    fn test_relayout_keeps_identity_label_and_shape() {
        let graph = sanitize(&flow());
        let geometry = GeometryConfig::default();

        let tb = compute_layout(&graph, LayoutDirection::TopBottom, &geometry);
        let snake = compute_layout(&graph, LayoutDirection::Snake, &geometry);

        for (a, b) in tb.nodes().iter().zip(snake.nodes()) {
            assert_eq!(a.id(), b.id());
            assert_eq!(a.label(), b.label());
            assert_eq!(a.shape(), b.shape());
            assert_eq!(a.level(), b.level());
        }
        assert_eq!(tb.edges(), snake.edges());
    }

    #[test]
    fn test_nodes_do_not_overlap() {
        let graph = sanitize(&flow());
        for direction in [LayoutDirection::TopBottom, LayoutDirection::Snake] {
            let layout = compute_layout(&graph, direction, &GeometryConfig::default());
            let bounds: Vec<_> = layout
                .nodes()
                .iter()
                .map(|node| layout.node_bounds(node.id()).unwrap())
                .collect();
            for (i, a) in bounds.iter().enumerate() {
                for b in &bounds[i + 1..] {
                    assert!(!a.intersects(b), "{direction}: {a:?} overlaps {b:?}");
                }
            }
        }
    }

    #[test]
    fn test_canvas_size_top_bottom() {
        // Levels: start 0, read 1, valid 2, save/warn 3, end 4.
        let layout = compute_layout(
            &sanitize(&flow()),
            LayoutDirection::TopBottom,
            &GeometryConfig::default(),
        );

        // Widest row holds two nodes: 2 * 280 = 560, plus a 30 margin
        // already inside it, then 50 padding on each side.
        let canvas = layout.canvas_size();
        assert_approx_eq!(f32, canvas.width(), 50.0 + 30.0 + 280.0 + 220.0 + 50.0);
        assert_approx_eq!(f32, canvas.height(), 50.0 + 4.0 * 240.0 + 140.0 + 50.0);
    }

    #[test]
    fn test_canvas_size_snake() {
        let layout = compute_layout(
            &sanitize(&flow()),
            LayoutDirection::Snake,
            &GeometryConfig::default(),
        );

        // Six nodes: one full row of four and a second row.
        let canvas = layout.canvas_size();
        assert_approx_eq!(f32, canvas.width(), 50.0 + 3.0 * 280.0 + 220.0 + 50.0);
        assert_approx_eq!(f32, canvas.height(), 50.0 + 240.0 + 140.0 + 50.0);
    }

    #[test]
    fn test_empty_graph_is_a_no_op() {
        let layout = compute_layout(
            &Graph::new(),
            LayoutDirection::TopBottom,
            &GeometryConfig::default(),
        );
        assert!(layout.is_empty());
        assert!(layout.canvas_size().is_zero());
        assert!(layout.edges().is_empty());
    }

    #[test]
    fn test_set_label_keeps_position() {
        let mut layout = compute_layout(
            &sanitize(&flow()),
            LayoutDirection::TopBottom,
            &GeometryConfig::default(),
        );
        let before = layout.node("save").unwrap().clone();

        layout.set_label("save", "Persist record").unwrap();

        let after = layout.node("save").unwrap();
        assert_eq!(after.label(), "Persist record");
        assert_eq!(after.position(), before.position());
        assert_eq!(after.level(), before.level());
        assert_eq!(after.shape(), before.shape());
        assert_eq!(
            layout.graph().node("save").unwrap().label(),
            "Persist record"
        );

        assert!(layout.set_label("nope", "x").is_err());
    }
}

#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::sanitize::sanitize;

    fn graph_strategy() -> impl Strategy<Value = Graph> {
        (1usize..12)
            .prop_flat_map(|count| {
                let edges = prop::collection::vec((0..count, 0..count), 0..24);
                (Just(count), edges)
            })
            .prop_map(|(count, edges)| {
                let nodes =
                    (0..count).map(|idx| Node::new(format!("n{idx}"), "step", Shape::Process));
                let edges = edges
                    .into_iter()
                    .map(|(s, t)| Edge::new(format!("n{s}"), format!("n{t}")));
                sanitize(&Graph::from_parts(nodes, edges))
            })
    }

    fn direction_strategy() -> impl Strategy<Value = LayoutDirection> {
        prop_oneof![Just(LayoutDirection::TopBottom), Just(LayoutDirection::Snake)]
    }

    fn check_deterministic(graph: &Graph, direction: LayoutDirection) -> Result<(), TestCaseError> {
        let geometry = GeometryConfig::default();
        let first = compute_layout(graph, direction, &geometry);
        let second = compute_layout(graph, direction, &geometry);
        prop_assert_eq!(first, second);
        Ok(())
    }

    /// Same-level neighbors in a row sit exactly one pitch apart.
    fn check_row_spacing(graph: &Graph) -> Result<(), TestCaseError> {
        let geometry = GeometryConfig::default();
        let layout = compute_layout(graph, LayoutDirection::TopBottom, &geometry);
        let leveled = assign_levels(graph);
        for row in leveled.rows() {
            for pair in row.windows(2) {
                let left = layout.node(pair[0]).unwrap().position();
                let right = layout.node(pair[1]).unwrap().position();
                prop_assert!(approx_eq!(f32, right.x() - left.x(), geometry.column_pitch()));
                prop_assert!(approx_eq!(f32, right.y(), left.y()));
            }
        }
        Ok(())
    }

    /// Consecutive nodes in one snake row sit exactly one pitch apart.
    fn check_snake_spacing(graph: &Graph) -> Result<(), TestCaseError> {
        let geometry = GeometryConfig::default();
        let layout = compute_layout(graph, LayoutDirection::Snake, &geometry);
        let leveled = assign_levels(graph);
        let order: Vec<&str> = leveled.sorted_ids().collect();
        for (index, pair) in order.windows(2).enumerate() {
            let columns = geometry.snake_columns();
            if (index + 1) % columns == 0 {
                continue;
            }
            let a = layout.node(pair[0]).unwrap().position();
            let b = layout.node(pair[1]).unwrap().position();
            prop_assert!(approx_eq!(f32, (b.x() - a.x()).abs(), geometry.column_pitch()));
            prop_assert!(approx_eq!(f32, a.y(), b.y()));
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn layout_is_deterministic(graph in graph_strategy(), direction in direction_strategy()) {
            check_deterministic(&graph, direction)?;
        }

        #[test]
        fn hierarchical_rows_are_evenly_spaced(graph in graph_strategy()) {
            check_row_spacing(&graph)?;
        }

        #[test]
        fn snake_rows_are_evenly_spaced(graph in graph_strategy()) {
            check_snake_spacing(&graph)?;
        }
    }
}
