//! Hierarchical (top-bottom) layout engine
//!
//! Nodes sharing a level form one horizontal row. Rows are stacked by level,
//! top to bottom, and each row is centered against the widest row.

use std::collections::HashMap;

use log::trace;

use flowline_core::geometry::Point;

use crate::{config::GeometryConfig, layout::engines::LayoutEngine, rank::LeveledGraph};

/// Row-per-level layout engine.
pub struct Engine {
    geometry: GeometryConfig,
}

impl Engine {
    /// Create a new hierarchical engine with the given geometry
    pub fn new(geometry: GeometryConfig) -> Self {
        Self { geometry }
    }

    /// Width spanned by `count` boxes and the gaps between them
    fn row_width(&self, count: usize) -> f32 {
        count as f32 * self.geometry.column_pitch() - self.geometry.x_gap()
    }

    /// Reference width rows are centered against.
    ///
    /// Measured with a trailing gap, so even the widest row gets half a gap
    /// of margin on each side.
    fn max_row_width(&self, rows: &[Vec<&str>]) -> f32 {
        rows.iter()
            .map(|row| row.len() as f32 * self.geometry.column_pitch())
            .fold(0.0, f32::max)
    }
}

impl LayoutEngine for Engine {
    fn place(&self, leveled: &LeveledGraph) -> HashMap<String, Point> {
        let geometry = &self.geometry;
        let rows = leveled.rows();
        let max_row_width = self.max_row_width(&rows);
        let half_size = Point::new(geometry.node_width() / 2.0, geometry.node_height() / 2.0);

        let mut positions = HashMap::new();
        for (level, row) in rows.iter().enumerate() {
            if row.is_empty() {
                continue;
            }
            let offset = (max_row_width - self.row_width(row.len())) / 2.0;
            let y = geometry.padding() + level as f32 * geometry.row_pitch();

            for (idx, &id) in row.iter().enumerate() {
                let x = geometry.padding() + offset + idx as f32 * geometry.column_pitch();
                let center = Point::new(x, y).add_point(half_size);
                trace!(node_id = id, level = level, x = center.x(), y = center.y(); "Placed node");
                positions.insert(id.to_string(), center);
            }
        }

        positions
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use flowline_core::graph::{Edge, Graph, Node, Shape};

    use super::*;
    use crate::rank::assign_levels;

    fn node(id: &str) -> Node {
        Node::new(id, id, Shape::Process)
    }

    #[test]
    fn test_single_node() {
        let leveled = assign_levels(&Graph::from_parts([node("only")], []));
        let positions = Engine::new(GeometryConfig::default()).place(&leveled);

        // Widest row is 280 wide with a 220 box, so the box sits 30 in.
        let center = positions["only"];
        assert_approx_eq!(f32, center.x(), 50.0 + 30.0 + 110.0);
        assert_approx_eq!(f32, center.y(), 50.0 + 70.0);
    }

    #[test]
    fn test_rows_are_centered_against_widest() {
        let graph = Graph::from_parts(
            [node("r"), node("a"), node("b"), node("c")],
            [Edge::new("r", "a"), Edge::new("r", "b"), Edge::new("r", "c")],
        );
        let leveled = assign_levels(&graph);
        let positions = Engine::new(GeometryConfig::default()).place(&leveled);

        // Widest row: 3 * 280 = 840. Row of one: width 220, offset 310.
        assert_approx_eq!(f32, positions["r"].x(), 50.0 + 310.0 + 110.0);
        assert_approx_eq!(f32, positions["r"].y(), 120.0);

        // Row of three: width 780, offset 30.
        assert_approx_eq!(f32, positions["a"].x(), 50.0 + 30.0 + 110.0);
        assert_approx_eq!(f32, positions["b"].x(), 50.0 + 30.0 + 280.0 + 110.0);
        assert_approx_eq!(f32, positions["c"].x(), 50.0 + 30.0 + 560.0 + 110.0);
        for id in ["a", "b", "c"] {
            assert_approx_eq!(f32, positions[id].y(), 50.0 + 240.0 + 70.0);
        }

        // Both rows share a horizontal center.
        assert_approx_eq!(f32, positions["r"].x(), positions["b"].x());
    }

    #[test]
    fn test_custom_geometry() {
        let geometry = GeometryConfig::default()
            .with_node_size(100.0, 40.0)
            .with_gaps(20.0, 10.0)
            .with_padding(0.0);
        let graph = Graph::from_parts([node("a"), node("b")], [Edge::new("a", "b")]);
        let positions = Engine::new(geometry).place(&assign_levels(&graph));

        assert_approx_eq!(f32, positions["a"].x(), 10.0 + 50.0);
        assert_approx_eq!(f32, positions["a"].y(), 20.0);
        assert_approx_eq!(f32, positions["b"].y(), 50.0 + 20.0);
    }

    #[test]
    fn test_every_node_is_placed() {
        let graph = Graph::from_parts(
            [node("s"), node("x"), node("lonely")],
            [Edge::new("s", "x"), Edge::new("x", "s")],
        );
        let positions = Engine::new(GeometryConfig::default()).place(&assign_levels(&graph));

        assert_eq!(positions.len(), 3);
    }
}
