// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `pixeldag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pixeldag",
    version,
    about = "Run image-transformation pipelines described as a graph of typed nodes.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the workflow file (TOML).
    ///
    /// Default: `Pixeldag.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Pixeldag.toml")]
    pub workflow: String,

    /// Directory where images produced by output nodes are written.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PIXELDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the pipeline, but don't execute anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
