//! Flowline Core Types
//!
//! This crate provides the foundational value types shared by the flowline
//! engine and its consumers. It includes:
//!
//! - **Geometry**: Points, sizes, bounds and insets ([`geometry`] module)
//! - **Graph**: Nodes, edges, shapes and the [`graph::Graph`] container ([`graph`] module)

pub mod geometry;
pub mod graph;
