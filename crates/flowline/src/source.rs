//! Interface to the content-generation collaborator.
//!
//! Flowline does not talk to a generative model itself. A caller supplies a
//! [`GraphSource`] that turns a [`GenerationRequest`] into a raw [`Graph`];
//! network access, prompting and retries all live behind that trait. The
//! engine only ever receives a complete graph or an error.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use flowline_core::graph::Graph;

use crate::error::FlowError;

/// How much text the generator should put in node labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verbosity {
    /// Two to five word labels (default)
    #[default]
    Concise,
    /// Complete-sentence labels
    Sentence,
    /// Exhaustive, detailed labels
    Detailed,
}

impl FromStr for Verbosity {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "concise" => Ok(Self::Concise),
            "sentence" => Ok(Self::Sentence),
            "detailed" => Ok(Self::Detailed),
            _ => Err("Unsupported verbosity"),
        }
    }
}

impl Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Concise => "concise",
            Self::Sentence => "sentence",
            Self::Detailed => "detailed",
        };
        write!(f, "{s}")
    }
}

/// How many nodes the generator should aim for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Density {
    /// As few nodes as possible
    Minimal,
    /// A middle ground (default)
    #[default]
    Moderate,
    /// Standard level of detail
    Standard,
}

impl FromStr for Density {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minimal" => Ok(Self::Minimal),
            "moderate" => Ok(Self::Moderate),
            "standard" => Ok(Self::Standard),
            _ => Err("Unsupported density"),
        }
    }
}

impl Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Minimal => "minimal",
            Self::Moderate => "moderate",
            Self::Standard => "standard",
        };
        write!(f, "{s}")
    }
}

/// A single request to the generation collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    prompt: String,
    verbosity: Verbosity,
    density: Density,
}

impl GenerationRequest {
    /// Creates a request with default verbosity and density.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            verbosity: Verbosity::default(),
            density: Density::default(),
        }
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_density(mut self, density: Density) -> Self {
        self.density = density;
        self
    }

    /// Returns the free-text process description.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn density(&self) -> Density {
        self.density
    }
}

/// Something that proposes a raw graph for a process description.
///
/// The returned graph may violate any content invariant; it is sanitized
/// before layout. Implementations report their own failures (network,
/// authentication, model errors) as [`FlowError::Generation`].
///
/// Closures with the matching signature implement this trait:
///
/// ```
/// use flowline::{
///     FlowError,
///     source::{GenerationRequest, GraphSource},
/// };
/// use flowline_core::graph::{Graph, Node, Shape};
///
/// let source = |request: &GenerationRequest| {
///     let start = Node::new("start", request.prompt(), Shape::Terminal);
///     Ok::<_, FlowError>(Graph::from_parts([start], []))
/// };
///
/// let graph = source.generate(&GenerationRequest::new("Boil water")).unwrap();
/// assert_eq!(graph.node("start").unwrap().label(), "Boil water");
/// ```
pub trait GraphSource {
    /// Produce a raw graph for `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if no graph could be produced.
    fn generate(&self, request: &GenerationRequest) -> Result<Graph, FlowError>;
}

impl<F> GraphSource for F
where
    F: Fn(&GenerationRequest) -> Result<Graph, FlowError>,
{
    fn generate(&self, request: &GenerationRequest) -> Result<Graph, FlowError> {
        self(request)
    }
}
