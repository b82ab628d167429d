//! Configuration types for flowline layout.
//!
//! This module provides configuration structures that control how flowcharts
//! are laid out and which defaults are handed to the generation collaborator.
//! All types implement [`serde::Deserialize`] for loading from external
//! sources; every field falls back to its default when omitted.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and generation settings.
//! - [`LayoutConfig`] - Selects the [`LayoutDirection`] and carries the [`GeometryConfig`].
//! - [`GeometryConfig`] - Node size, gaps, canvas padding and snake column count.
//! - [`GenerationConfig`] - Default [`Verbosity`] and [`Density`] for generation requests.
//!
//! # Example
//!
//! ```
//! # use flowline::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().geometry().node_width(), 220.0);
//! assert_eq!(config.layout().geometry().snake_columns(), 4);
//! assert!(config.layout().geometry().validate().is_ok());
//! ```

use serde::Deserialize;

use flowline_core::geometry::{Insets, Size};

use crate::{
    error::FlowError,
    layout::LayoutDirection,
    source::{Density, Verbosity},
};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Generation defaults section.
    #[serde(default)]
    generation: GenerationConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified sections.
    ///
    /// # Arguments
    ///
    /// * `layout` - Layout direction and geometry.
    /// * `generation` - Defaults for generation requests.
    pub fn new(layout: LayoutConfig, generation: GenerationConfig) -> Self {
        Self { layout, generation }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the generation configuration.
    pub fn generation(&self) -> &GenerationConfig {
        &self.generation
    }
}

/// Layout configuration.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Default [`LayoutDirection`].
    #[serde(default)]
    direction: LayoutDirection,

    /// Geometry shared by every layout engine.
    #[serde(default)]
    geometry: GeometryConfig,
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`].
    pub fn new(direction: LayoutDirection, geometry: GeometryConfig) -> Self {
        Self {
            direction,
            geometry,
        }
    }

    /// Returns the default [`LayoutDirection`].
    pub fn direction(&self) -> LayoutDirection {
        self.direction
    }

    /// Returns the [`GeometryConfig`].
    pub fn geometry(&self) -> &GeometryConfig {
        &self.geometry
    }
}

/// Geometry values injected into the layout engines.
///
/// Values are in abstract length units. The defaults match the stock theme
/// so that layouts stay visually stable across consumers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    node_width: f32,
    node_height: f32,
    x_gap: f32,
    y_gap: f32,
    padding: f32,
    snake_columns: usize,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            node_width: 220.0,
            node_height: 140.0,
            x_gap: 60.0,
            y_gap: 100.0,
            padding: 50.0,
            snake_columns: 4,
        }
    }
}

impl GeometryConfig {
    /// Sets the node box size.
    pub fn with_node_size(mut self, width: f32, height: f32) -> Self {
        self.node_width = width;
        self.node_height = height;
        self
    }

    /// Sets the horizontal and vertical gaps between node boxes.
    pub fn with_gaps(mut self, x_gap: f32, y_gap: f32) -> Self {
        self.x_gap = x_gap;
        self.y_gap = y_gap;
        self
    }

    /// Sets the canvas padding.
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the number of columns used by the snake layout.
    pub fn with_snake_columns(mut self, columns: usize) -> Self {
        self.snake_columns = columns;
        self
    }

    pub fn node_width(&self) -> f32 {
        self.node_width
    }

    pub fn node_height(&self) -> f32 {
        self.node_height
    }

    pub fn x_gap(&self) -> f32 {
        self.x_gap
    }

    pub fn y_gap(&self) -> f32 {
        self.y_gap
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn snake_columns(&self) -> usize {
        self.snake_columns
    }

    /// Returns the node box as a [`Size`].
    pub fn node_size(&self) -> Size {
        Size::new(self.node_width, self.node_height)
    }

    /// Returns the canvas padding as uniform [`Insets`].
    pub fn insets(&self) -> Insets {
        Insets::uniform(self.padding)
    }

    /// Distance between the centers of horizontally adjacent nodes.
    pub fn column_pitch(&self) -> f32 {
        self.node_width + self.x_gap
    }

    /// Distance between the centers of vertically adjacent nodes.
    pub fn row_pitch(&self) -> f32 {
        self.node_height + self.y_gap
    }

    /// Checks that the geometry can produce a sensible layout.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Config`] if a node dimension is not positive, a
    /// gap or the padding is negative, any value is not finite, or the snake
    /// column count is zero.
    pub fn validate(&self) -> Result<(), FlowError> {
        let values = [
            ("node_width", self.node_width),
            ("node_height", self.node_height),
            ("x_gap", self.x_gap),
            ("y_gap", self.y_gap),
            ("padding", self.padding),
        ];
        if let Some((name, _)) = values.iter().find(|(_, value)| !value.is_finite()) {
            return Err(FlowError::Config(format!("`{name}` must be finite")));
        }
        if self.node_width <= 0.0 || self.node_height <= 0.0 {
            return Err(FlowError::Config(
                "node dimensions must be positive".to_string(),
            ));
        }
        if let Some((name, _)) = values[2..].iter().find(|(_, value)| *value < 0.0) {
            return Err(FlowError::Config(format!("`{name}` must not be negative")));
        }
        if self.snake_columns == 0 {
            return Err(FlowError::Config(
                "`snake_columns` must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Defaults applied to generation requests built by
/// [`FlowBuilder::request`](crate::FlowBuilder::request).
#[derive(Debug, Default, Clone, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    verbosity: Verbosity,

    #[serde(default)]
    density: Density,
}

impl GenerationConfig {
    pub fn new(verbosity: Verbosity, density: Density) -> Self {
        Self { verbosity, density }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn density(&self) -> Density {
        self.density
    }
}
