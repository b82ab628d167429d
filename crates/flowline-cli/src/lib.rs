//! CLI logic for the Flowline layout tool.
//!
//! This module contains the core CLI logic: it reads a recorded generator
//! response, runs it through the Flowline pipeline, and writes the positioned
//! graph for a renderer.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use flowline::{FlowBuilder, FlowError};

/// Run the Flowline CLI application
///
/// This function processes the input file through the Flowline pipeline
/// and writes the resulting layout JSON to the output file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `FlowError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Export errors
pub fn run(args: &Args) -> Result<(), FlowError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing graph"
    );

    // Load configuration
    let app_config = config::load_config(args.config.as_ref())?;
    let direction = args
        .direction
        .unwrap_or_else(|| app_config.layout().direction());

    // Read input file
    let source = fs::read_to_string(&args.input)?;

    // Process graph using FlowBuilder API
    let builder = FlowBuilder::new(app_config);
    let layout = builder.process(&source, direction)?;
    let json = builder.export_json(&layout)?;

    // Write output file
    fs::write(&args.output, json)?;

    info!(output_file = args.output; "Layout exported successfully");

    Ok(())
}
