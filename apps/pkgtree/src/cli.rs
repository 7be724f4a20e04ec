//! Command line interface definition

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// pkgtree - resolve package manifests into dependency trees
#[derive(Parser)]
#[command(name = "pkgtree")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Resolve a package manifest into a deduplicated dependency tree")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Registry base URL (overrides config file and environment)
    #[arg(long, global = true, value_name = "URL")]
    pub registry: Option<String>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a manifest file (or stdin) and print the tree
    #[command(alias = "r")]
    Resolve {
        /// Path to the manifest JSON ("-" or omitted reads stdin)
        manifest: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "tree")]
        format: Format,
    },

    /// Serve resolution over HTTP
    Serve {
        /// Listen address (host:port)
        #[arg(long, value_name = "ADDR")]
        listen: Option<String>,
    },
}

/// Output format for `resolve`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Indented human-readable tree
    Tree,
    /// Single recursive JSON document
    Json,
    /// Newline-delimited records, children before parents
    Ndjson,
}
