//! Flowline - Layout engine for generated flowcharts.
//!
//! A generation collaborator proposes a raw graph of steps and transitions.
//! Flowline cleans it, assigns every step a level by breadth-first search
//! from an inferred root, and places each step on a 2-D canvas using either
//! a hierarchical (top-bottom) or a snake (zig-zag) strategy.

pub mod codec;
pub mod config;
pub mod layout;
pub mod rank;
pub mod sanitize;
pub mod source;

mod error;

pub use flowline_core::{geometry, graph};

pub use error::FlowError;

use std::{cell::RefCell, fmt};

use log::{debug, info, trace};

use flowline_core::graph::Graph;

use config::AppConfig;
use layout::{EngineBuilder, LayoutDirection, PositionedGraph};
use source::{GenerationRequest, GraphSource};

/// Builder for turning raw graphs into positioned flowcharts.
///
/// This provides an API for processing flowcharts through the decoding,
/// sanitizing and layout stages.
///
/// # Examples
///
/// ```rust
/// use flowline::{FlowBuilder, config::AppConfig, layout::LayoutDirection};
///
/// let source = r#"{
///     "nodes": [
///         {"id": "start", "label": "Start", "shape": "terminal"},
///         {"id": "ok", "label": "Looks good?", "shape": "decision"},
///         {"id": "end", "label": "End", "shape": "terminal"}
///     ],
///     "edges": [
///         {"source": "start", "target": "ok"},
///         {"source": "ok", "target": "end", "label": "Yes"},
///         {"source": "ok", "target": "start"}
///     ]
/// }"#;
///
/// let builder = FlowBuilder::new(AppConfig::default());
///
/// // Decode, clean and place in one step
/// let layout = builder
///     .process(source, LayoutDirection::Snake)
///     .expect("Failed to process");
///
/// // The unlabeled decision branch was dropped
/// assert_eq!(layout.edges().len(), 2);
///
/// // Or use default config
/// let builder = FlowBuilder::default();
/// ```
pub struct FlowBuilder {
    config: AppConfig,
    // Engines are created once per direction and reused across layouts
    engines: RefCell<EngineBuilder>,
}

impl Default for FlowBuilder {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl fmt::Debug for FlowBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl FlowBuilder {
    /// Create a new flow builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including layout and generation settings
    pub fn new(config: AppConfig) -> Self {
        let engines = EngineBuilder::new().with_geometry(config.layout().geometry().clone());
        Self {
            config,
            engines: RefCell::new(engines),
        }
    }

    /// Returns the configuration this builder was created with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Decode a generator response into a raw graph.
    ///
    /// The returned graph is not sanitized yet.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Parse`] if the text is not a graph document.
    pub fn parse(&self, source: &str) -> Result<Graph, FlowError> {
        info!("Parsing graph");

        let graph = codec::parse_graph(source)?;

        debug!(nodes_count = graph.node_count(); "Graph parsed successfully");
        trace!(graph:?; "Parsed graph");

        Ok(graph)
    }

    /// Remove every edge that would break layout.
    ///
    /// See [`sanitize::sanitize_with_report`] for the rules applied.
    pub fn sanitize(&self, graph: &Graph) -> Graph {
        info!(edges_count = graph.edges().len(); "Sanitizing graph");
        sanitize::sanitize_with_report(graph).into_graph()
    }

    /// Lay out a sanitized graph in the configured direction.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Config`] if the configured geometry is invalid.
    pub fn layout(&self, graph: &Graph) -> Result<PositionedGraph, FlowError> {
        self.layout_with_direction(graph, self.config.layout().direction())
    }

    /// Lay out a sanitized graph in the given direction.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Config`] if the configured geometry is invalid.
    pub fn layout_with_direction(
        &self,
        graph: &Graph,
        direction: LayoutDirection,
    ) -> Result<PositionedGraph, FlowError> {
        self.config.layout().geometry().validate()?;

        info!(direction:% = direction; "Computing layout");
        let mut engines = self.engines.borrow_mut();
        Ok(layout::layout_with(&mut engines, graph, direction))
    }

    /// Decode, sanitize and lay out a generator response.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Parse`] for undecodable input and
    /// [`FlowError::Config`] for invalid geometry.
    pub fn process(
        &self,
        source: &str,
        direction: LayoutDirection,
    ) -> Result<PositionedGraph, FlowError> {
        let raw = self.parse(source)?;
        let graph = self.sanitize(&raw);
        self.layout_with_direction(&graph, direction)
    }

    /// Build a generation request carrying the configured defaults.
    pub fn request(&self, prompt: impl Into<String>) -> GenerationRequest {
        let generation = self.config.generation();
        GenerationRequest::new(prompt)
            .with_verbosity(generation.verbosity())
            .with_density(generation.density())
    }

    /// Ask `source` for a graph, then sanitize and lay it out.
    ///
    /// If the collaborator fails, its error is returned unchanged and no
    /// layout is attempted.
    ///
    /// # Errors
    ///
    /// Returns whatever `source` reports (usually [`FlowError::Generation`])
    /// and [`FlowError::Config`] for invalid geometry.
    pub fn generate<S>(
        &self,
        source: &S,
        request: &GenerationRequest,
        direction: LayoutDirection,
    ) -> Result<PositionedGraph, FlowError>
    where
        S: GraphSource + ?Sized,
    {
        info!(
            verbosity:% = request.verbosity(),
            density:% = request.density();
            "Requesting graph from generator"
        );

        let raw = source.generate(request)?;
        debug!(nodes_count = raw.node_count(); "Generator returned graph");

        let graph = self.sanitize(&raw);
        self.layout_with_direction(&graph, direction)
    }

    /// Replace the label of one node in a computed layout.
    ///
    /// Level and position are left as they are; no re-layout happens.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Graph`] if no node has the given id. The layout
    /// is left untouched in that case.
    pub fn set_label(
        &self,
        layout: &mut PositionedGraph,
        id: &str,
        label: impl Into<String>,
    ) -> Result<(), FlowError> {
        info!(node_id = id; "Editing node label");
        layout.set_label(id, label)?;
        debug!(node_id = id; "Node label updated");
        Ok(())
    }

    /// Serialize a positioned graph for a renderer.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Export`] if serialization fails.
    pub fn export_json(&self, layout: &PositionedGraph) -> Result<String, FlowError> {
        let json = codec::to_json(layout)?;
        info!(bytes = json.len(); "Layout exported");
        Ok(json)
    }
}
