//! Level assignment.
//!
//! Every node receives an integer level: its breadth-first distance from an
//! inferred root. The result, a [`LeveledGraph`], also fixes the node order
//! the layout engines consume: level ascending, then id ascending.
//!
//! # Approximation
//!
//! Levels come from a *breadth-first freeze*: a node is visited once, the
//! first time it is discovered, and its level is never revised afterwards.
//! A merge point reached by a short path and a long path is therefore ranked
//! by the short one, one level below its nearest predecessor rather than below
//! its deepest. True longest-path ranking is not attempted. In exchange the
//! traversal terminates on cyclic graphs without any cycle handling.

use std::collections::{HashMap, HashSet, VecDeque};

use log::{debug, trace};
use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use flowline_core::graph::{Edge, Graph};

/// A graph with a level assigned to every node.
#[derive(Debug, Clone)]
pub struct LeveledGraph {
    graph: Graph,
    root: Option<String>,
    levels: HashMap<String, usize>,
    /// Index into `graph.edges()` of the edge each reached node was discovered through.
    discovered_by: HashMap<String, usize>,
    /// Node ids sorted by (level, id).
    order: Vec<String>,
}

impl LeveledGraph {
    /// Returns the underlying graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Returns the inferred root, or `None` for an empty graph.
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// Returns the level of a node, or `None` for an unknown id.
    pub fn level(&self, id: &str) -> Option<usize> {
        self.levels.get(id).copied()
    }

    /// Returns the highest assigned level, or `None` for an empty graph.
    pub fn max_level(&self) -> Option<usize> {
        self.levels.values().copied().max()
    }

    /// Returns the edge through which the traversal first reached `id`.
    ///
    /// The root and unreachable nodes have no discovering edge.
    pub fn discovering_edge(&self, id: &str) -> Option<&Edge> {
        self.discovered_by
            .get(id)
            .and_then(|&idx| self.graph.edges().get(idx))
    }

    /// Returns true if the traversal from the root reached `id`.
    pub fn is_reachable(&self, id: &str) -> bool {
        self.root.as_deref() == Some(id) || self.discovered_by.contains_key(id)
    }

    /// Returns the ids of nodes the traversal never reached, in listing order.
    ///
    /// These nodes keep level 0.
    pub fn unreachable(&self) -> Vec<&str> {
        self.graph
            .nodes()
            .map(|node| node.id())
            .filter(|id| !self.is_reachable(id))
            .collect()
    }

    /// Iterates node ids sorted by level, then by id.
    pub fn sorted_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Groups the sorted ids into one row per level.
    ///
    /// Row `i` holds the nodes at level `i`, in id order.
    pub fn rows(&self) -> Vec<Vec<&str>> {
        let mut rows: Vec<Vec<&str>> = Vec::new();
        for id in &self.order {
            let level = self.levels[id];
            while rows.len() <= level {
                rows.push(Vec::new());
            }
            rows[level].push(id);
        }
        rows
    }
}

/// Assigns a level to every node of `graph`.
///
/// The root is the first listed node that is never an edge target. When every
/// node is a target, the first listed node is used instead. Nodes the
/// traversal cannot reach keep level 0. Edges whose endpoints are not both
/// declared are ignored.
///
/// The input is not modified; the returned [`LeveledGraph`] owns a copy.
///
/// # Examples
///
/// ```
/// use flowline::rank::assign_levels;
/// use flowline_core::graph::{Edge, Graph, Node, Shape};
///
/// let graph = Graph::from_parts(
///     [
///         Node::new("b", "Second", Shape::Process),
///         Node::new("a", "First", Shape::Terminal),
///     ],
///     [Edge::new("a", "b")],
/// );
///
/// let leveled = assign_levels(&graph);
/// assert_eq!(leveled.root(), Some("a"));
/// assert_eq!(leveled.level("b"), Some(1));
/// ```
pub fn assign_levels(graph: &Graph) -> LeveledGraph {
    let root = infer_root(graph);
    let mut levels: HashMap<String, usize> = graph
        .nodes()
        .map(|node| (node.id().to_string(), 0))
        .collect();

    let discovered_by = match root {
        Some(root) => breadth_first_levels(graph, root, &mut levels),
        None => HashMap::new(),
    };

    let mut order: Vec<String> = levels.keys().cloned().collect();
    order.sort_by(|a, b| levels[a].cmp(&levels[b]).then_with(|| a.cmp(b)));

    debug!(
        root = root.unwrap_or_default(),
        nodes_count = order.len(),
        max_level = levels.values().copied().max().unwrap_or_default();
        "Levels assigned"
    );

    LeveledGraph {
        graph: graph.clone(),
        root: root.map(str::to_string),
        levels,
        discovered_by,
        order,
    }
}

/// Returns the first listed node that no edge targets, falling back to the
/// first listed node.
fn infer_root(graph: &Graph) -> Option<&str> {
    let targets: HashSet<&str> = graph.edges().iter().map(Edge::target).collect();
    graph
        .nodes()
        .map(|node| node.id())
        .find(|id| !targets.contains(id))
        .or_else(|| graph.nodes().next().map(|node| node.id()))
}

/// Runs the breadth-first freeze from `root`, writing levels into `levels`.
///
/// Returns, for each reached node other than the root, the index of the edge
/// it was discovered through. Outgoing edges are explored in listing order.
fn breadth_first_levels(
    graph: &Graph,
    root: &str,
    levels: &mut HashMap<String, usize>,
) -> HashMap<String, usize> {
    let flow_graph = to_petgraph(graph);
    let mut discovered_by = HashMap::new();

    // Node indices follow the listing order.
    let Some(root_idx) = graph.node_position(root).map(NodeIndex::new) else {
        return discovered_by;
    };

    let mut visited = HashSet::from([root_idx]);
    let mut queue = VecDeque::from([(root_idx, 0usize)]);

    while let Some((node_idx, level)) = queue.pop_front() {
        let id = flow_graph[node_idx];
        levels.insert(id.to_string(), level);
        trace!(node_id = id, level = level; "Visited node");

        // petgraph yields edges newest first.
        let mut outgoing: Vec<(usize, NodeIndex)> = flow_graph
            .edges(node_idx)
            .map(|edge| (*edge.weight(), edge.target()))
            .collect();
        outgoing.sort_unstable_by_key(|(edge_idx, _)| *edge_idx);

        for (edge_idx, child) in outgoing {
            if visited.insert(child) {
                discovered_by.insert(flow_graph[child].to_string(), edge_idx);
                queue.push_back((child, level + 1));
            }
        }
    }

    discovered_by
}

/// Builds a petgraph view with node ids as weights and edge listing indices
/// as edge weights.
fn to_petgraph(graph: &Graph) -> DiGraph<&str, usize> {
    let mut flow_graph = DiGraph::with_capacity(graph.node_count(), graph.edges().len());
    for node in graph.nodes() {
        flow_graph.add_node(node.id());
    }

    for (edge_idx, edge) in graph.edges().iter().enumerate() {
        if let (Some(source), Some(target)) = (
            graph.node_position(edge.source()),
            graph.node_position(edge.target()),
        ) {
            flow_graph.add_edge(NodeIndex::new(source), NodeIndex::new(target), edge_idx);
        }
    }

    flow_graph
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use flowline_core::graph::{Node, Shape};

    use super::*;

    fn graph_strategy() -> impl Strategy<Value = Graph> {
        (1usize..10)
            .prop_flat_map(|count| {
                let edges = prop::collection::vec((0..count, 0..count), 0..20);
                (Just(count), edges)
            })
            .prop_map(|(count, edges)| {
                let nodes =
                    (0..count).map(|idx| Node::new(format!("n{idx}"), "step", Shape::Process));
                let edges = edges
                    .into_iter()
                    .map(|(s, t)| Edge::new(format!("n{s}"), format!("n{t}")));
                Graph::from_parts(nodes, edges)
            })
    }

    fn check_root_is_level_zero(graph: &Graph) -> Result<(), TestCaseError> {
        let leveled = assign_levels(graph);
        let root = leveled.root().expect("non-empty graph has a root");
        prop_assert_eq!(leveled.level(root), Some(0));
        Ok(())
    }

    fn check_discovery_monotonic(graph: &Graph) -> Result<(), TestCaseError> {
        let leveled = assign_levels(graph);
        for node in graph.nodes() {
            if let Some(edge) = leveled.discovering_edge(node.id()) {
                prop_assert_eq!(edge.target(), node.id());
                let source_level = leveled.level(edge.source()).unwrap();
                prop_assert_eq!(leveled.level(node.id()), Some(source_level + 1));
            }
        }
        Ok(())
    }

    fn check_order_is_sorted_and_complete(graph: &Graph) -> Result<(), TestCaseError> {
        let leveled = assign_levels(graph);
        let order: Vec<&str> = leveled.sorted_ids().collect();
        prop_assert_eq!(order.len(), graph.node_count());
        for pair in order.windows(2) {
            let key = |id: &str| (leveled.level(id).unwrap(), id.to_string());
            prop_assert!(key(pair[0]) < key(pair[1]));
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn root_is_level_zero(graph in graph_strategy()) {
            check_root_is_level_zero(&graph)?;
        }

        #[test]
        fn discovery_edges_step_one_level(graph in graph_strategy()) {
            check_discovery_monotonic(&graph)?;
        }

        #[test]
        fn order_is_sorted_and_complete(graph in graph_strategy()) {
            check_order_is_sorted_and_complete(&graph)?;
        }
    }
}
