//! Graph sanitization.
//!
//! Generated graphs routinely reference undeclared nodes, loop back onto
//! themselves, or branch out of a decision without saying which branch is
//! which. The sanitizer repairs these by omission: offending edges are
//! dropped, nodes are never touched.
//!
//! Every edge is checked against three rules, in this order:
//!
//! 1. Both endpoints must be declared nodes.
//! 2. The edge must not be a self-loop.
//! 3. An edge leaving a [`Shape::Decision`](flowline_core::graph::Shape::Decision)
//!    node must carry a non-blank label.
//!
//! An edge survives only if it passes all three. The order only decides which
//! [`DropReason`] gets reported.

use std::fmt::{self, Display};

use log::{debug, info};

use flowline_core::graph::{Edge, Graph};

/// Why an edge was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The source id is not a declared node.
    DanglingSource,
    /// The target id is not a declared node.
    DanglingTarget,
    /// Source and target are the same node.
    SelfLoop,
    /// The edge leaves a decision node without a label.
    UnlabeledDecisionBranch,
}

impl Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::DanglingSource => "source is not a declared node",
            Self::DanglingTarget => "target is not a declared node",
            Self::SelfLoop => "self-loop",
            Self::UnlabeledDecisionBranch => "unlabeled branch out of a decision",
        };
        write!(f, "{s}")
    }
}

/// An edge removed by the sanitizer, with the first rule it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedEdge {
    edge: Edge,
    reason: DropReason,
}

impl DroppedEdge {
    pub fn edge(&self) -> &Edge {
        &self.edge
    }

    pub fn reason(&self) -> DropReason {
        self.reason
    }
}

/// The outcome of [`sanitize_with_report`]: the repaired graph and the edges
/// that were removed from it.
#[derive(Debug, Clone)]
pub struct SanitizeReport {
    graph: Graph,
    dropped: Vec<DroppedEdge>,
}

impl SanitizeReport {
    /// Returns the repaired graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Returns the removed edges in input order.
    pub fn dropped(&self) -> &[DroppedEdge] {
        &self.dropped
    }

    /// Consumes the report, returning the repaired graph.
    pub fn into_graph(self) -> Graph {
        self.graph
    }
}

/// Returns a repaired copy of `graph`.
///
/// Node listing is carried over unchanged; only edges are removed. The
/// operation is idempotent.
///
/// # Examples
///
/// ```
/// use flowline::sanitize::sanitize;
/// use flowline_core::graph::{Edge, Graph, Node, Shape};
///
/// let graph = Graph::from_parts(
///     [
///         Node::new("check", "Valid?", Shape::Decision),
///         Node::new("ok", "Accept", Shape::Process),
///     ],
///     [
///         Edge::new("check", "ok").with_label("Yes"),
///         Edge::new("check", "ok"),
///         Edge::new("ok", "node99"),
///     ],
/// );
///
/// let clean = sanitize(&graph);
/// assert_eq!(clean.edges().len(), 1);
/// assert_eq!(clean.edges()[0].label(), Some("Yes"));
/// ```
pub fn sanitize(graph: &Graph) -> Graph {
    sanitize_with_report(graph).into_graph()
}

/// Same as [`sanitize`], additionally reporting every removed edge.
pub fn sanitize_with_report(graph: &Graph) -> SanitizeReport {
    let mut kept = Vec::with_capacity(graph.edges().len());
    let mut dropped = Vec::new();

    for edge in graph.edges() {
        match check_edge(graph, edge) {
            None => kept.push(edge.clone()),
            Some(reason) => {
                debug!(
                    source = edge.source(),
                    target = edge.target(),
                    reason:% = reason;
                    "Dropping edge"
                );
                dropped.push(DroppedEdge {
                    edge: edge.clone(),
                    reason,
                });
            }
        }
    }

    if !dropped.is_empty() {
        info!(
            dropped_count = dropped.len(),
            kept_count = kept.len();
            "Sanitized graph edges"
        );
    }

    SanitizeReport {
        graph: graph.with_edges(kept),
        dropped,
    }
}

/// Returns the first rule `edge` fails, or `None` if it may stay.
fn check_edge(graph: &Graph, edge: &Edge) -> Option<DropReason> {
    let Some(source) = graph.node(edge.source()) else {
        return Some(DropReason::DanglingSource);
    };
    if !graph.contains_node(edge.target()) {
        return Some(DropReason::DanglingTarget);
    }
    if edge.is_self_loop() {
        return Some(DropReason::SelfLoop);
    }
    if source.shape().requires_labeled_branches() && !edge.has_label() {
        return Some(DropReason::UnlabeledDecisionBranch);
    }
    None
}
