//! Layout engine selection.
//!
//! Each [`LayoutDirection`] maps to one coordinate strategy implementing
//! [`LayoutEngine`]. Engines are configured from a [`GeometryConfig`] and are
//! stateless between calls, so the same engine may place any number of graphs.

mod hierarchical;
mod snake;

pub use hierarchical::Engine as Hierarchical;
pub use snake::Engine as Snake;

use std::collections::HashMap;

use flowline_core::geometry::Point;

use crate::{config::GeometryConfig, layout::LayoutDirection, rank::LeveledGraph};

/// Trait defining the interface for coordinate assignment strategies.
pub trait LayoutEngine {
    /// Assign a center point to every node of `leveled`.
    ///
    /// The returned map is keyed by node id and must contain every node.
    fn place(&self, leveled: &LeveledGraph) -> HashMap<String, Point>;
}

/// Builder for creating and caching layout engines.
pub struct EngineBuilder {
    // One engine per direction, created on first use
    engines: HashMap<LayoutDirection, Box<dyn LayoutEngine>>,

    geometry: GeometryConfig,
}

impl EngineBuilder {
    /// Create a new engine builder with the default geometry
    pub fn new() -> Self {
        Self {
            engines: HashMap::new(),
            geometry: GeometryConfig::default(),
        }
    }

    /// Set the geometry handed to every engine
    pub fn with_geometry(mut self, geometry: GeometryConfig) -> Self {
        self.geometry = geometry;
        self.engines.clear();
        self
    }

    /// Returns the configured geometry
    pub fn geometry(&self) -> &GeometryConfig {
        &self.geometry
    }

    /// Get the engine for a direction with configured options
    pub fn engine(&mut self, direction: LayoutDirection) -> &dyn LayoutEngine {
        let engine = self.engines.entry(direction).or_insert_with(|| {
            let engine: Box<dyn LayoutEngine> = match direction {
                LayoutDirection::TopBottom => Box::new(Hierarchical::new(self.geometry.clone())),
                LayoutDirection::Snake => Box::new(Snake::new(self.geometry.clone())),
            };
            engine
        });
        // Dereference to avoid returning reference to temporary
        &**engine
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
