//! Snake (zig-zag) layout engine
//!
//! The sorted node sequence is poured into a grid with a fixed number of
//! columns. Even rows run left to right and odd rows right to left, so
//! consecutive nodes stay adjacent across a row break while the canvas height
//! grows only with `ceil(n / columns)`.

use std::collections::HashMap;

use log::trace;

use flowline_core::geometry::Point;

use crate::{config::GeometryConfig, layout::engines::LayoutEngine, rank::LeveledGraph};

/// Boustrophedon grid layout engine.
pub struct Engine {
    geometry: GeometryConfig,
}

impl Engine {
    /// Create a new snake engine with the given geometry
    pub fn new(geometry: GeometryConfig) -> Self {
        Self { geometry }
    }

    /// Grid cell `(row, column)` of the node at `index` in the sorted sequence.
    fn cell(&self, index: usize) -> (usize, usize) {
        let columns = self.geometry.snake_columns().max(1);
        let row = index / columns;
        let column = index % columns;
        if row % 2 == 1 {
            (row, columns - 1 - column)
        } else {
            (row, column)
        }
    }
}

impl LayoutEngine for Engine {
    fn place(&self, leveled: &LeveledGraph) -> HashMap<String, Point> {
        let geometry = &self.geometry;
        let half_size = Point::new(geometry.node_width() / 2.0, geometry.node_height() / 2.0);

        leveled
            .sorted_ids()
            .enumerate()
            .map(|(index, id)| {
                let (row, column) = self.cell(index);
                let top_left = Point::new(
                    geometry.padding() + column as f32 * geometry.column_pitch(),
                    geometry.padding() + row as f32 * geometry.row_pitch(),
                );
                let center = top_left.add_point(half_size);
                trace!(node_id = id, row = row, column = column; "Placed node");
                (id.to_string(), center)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use flowline_core::graph::{Edge, Graph, Node, Shape};

    use super::*;
    use crate::rank::assign_levels;

    /// `n0 -> n1 -> ... -> n{count-1}`, ids zero-padded so id order matches chain order.
    fn chain(count: usize) -> Graph {
        let nodes = (0..count).map(|idx| Node::new(format!("n{idx:02}"), "step", Shape::Process));
        let edges = (1..count).map(|idx| Edge::new(format!("n{:02}", idx - 1), format!("n{idx:02}")));
        Graph::from_parts(nodes, edges)
    }

    #[test]
    fn test_cells_alternate_direction() {
        let engine = Engine::new(GeometryConfig::default());

        let cells: Vec<_> = (0..9).map(|idx| engine.cell(idx)).collect();
        assert_eq!(
            cells,
            vec![
                (0, 0),
                (0, 1),
                (0, 2),
                (0, 3),
                (1, 3),
                (1, 2),
                (1, 1),
                (1, 0),
                (2, 0),
            ]
        );
    }

    #[test]
    fn test_nine_node_chain() {
        let leveled = assign_levels(&chain(9));
        let positions = Engine::new(GeometryConfig::default()).place(&leveled);

        let column_x = |column: f32| 50.0 + column * 280.0 + 110.0;
        let row_y = |row: f32| 50.0 + row * 240.0 + 70.0;

        assert_approx_eq!(f32, positions["n00"].x(), column_x(0.0));
        assert_approx_eq!(f32, positions["n03"].x(), column_x(3.0));
        assert_approx_eq!(f32, positions["n04"].x(), column_x(3.0));
        assert_approx_eq!(f32, positions["n04"].y(), row_y(1.0));
        assert_approx_eq!(f32, positions["n07"].x(), column_x(0.0));
        assert_approx_eq!(f32, positions["n07"].y(), row_y(1.0));
        assert_approx_eq!(f32, positions["n08"].x(), column_x(0.0));
        assert_approx_eq!(f32, positions["n08"].y(), row_y(2.0));
    }

    #[test]
    fn test_single_column() {
        let geometry = GeometryConfig::default().with_snake_columns(1);
        let positions = Engine::new(geometry).place(&assign_levels(&chain(3)));

        for (row, id) in ["n00", "n01", "n02"].iter().enumerate() {
            assert_approx_eq!(f32, positions[*id].x(), 160.0);
            assert_approx_eq!(f32, positions[*id].y(), 120.0 + row as f32 * 240.0);
        }
    }

    #[test]
    fn test_zero_columns_does_not_panic() {
        let geometry = GeometryConfig::default().with_snake_columns(0);
        let positions = Engine::new(geometry).place(&assign_levels(&chain(2)));
        assert_eq!(positions.len(), 2);
    }
}
