//! Command-line argument definitions for the Flowline CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, the layout
//! direction, configuration file selection, and logging verbosity.

use clap::Parser;

use flowline::layout::LayoutDirection;

/// Command-line arguments for the Flowline layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input graph (generator JSON)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output layout JSON file
    #[arg(short, long, default_value = "out.json")]
    pub output: String,

    /// Layout direction (top-bottom, snake); overrides the configuration
    #[arg(short, long)]
    pub direction: Option<LayoutDirection>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["flowline", "graph.json"]).unwrap();
        assert_eq!(args.input, "graph.json");
        assert_eq!(args.output, "out.json");
        assert_eq!(args.direction, None);
        assert_eq!(args.config, None);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_direction_flag() {
        let args = Args::try_parse_from(["flowline", "g.json", "-d", "zigzag"]).unwrap();
        assert_eq!(args.direction, Some(LayoutDirection::Snake));

        assert!(Args::try_parse_from(["flowline", "g.json", "--direction", "diagonal"]).is_err());
    }
}
