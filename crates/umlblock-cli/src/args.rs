//! Command-line argument definitions for the umlblock CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the diagram input, the block attributes,
//! the images directory, configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the umlblock tool
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the diagram source, or `-` for stdin
    #[arg(help = "Path to the diagram source, or - to read stdin")]
    pub input: String,

    /// Output format (txt, utxt, svg, png)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Image file name, relative to the images directory
    #[arg(short, long)]
    pub target: Option<String>,

    /// Extra block attribute as `key=value`; may be repeated
    #[arg(short, long = "attr", value_name = "KEY=VALUE")]
    pub attr: Vec<String>,

    /// Directory image files are written to
    #[arg(short, long)]
    pub images_dir: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
