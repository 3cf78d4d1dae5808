//! Defines the command-line arguments and subcommands for the sml CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::syntax::parser::DEFAULT_MAX_DEPTH;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "sml",
    version,
    about = "Parse, check and convert sml documents."
)]
pub struct SmlArgs {
    /// Log parser and writer activity to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Maximum nesting depth of tag nodes.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    #[command(subcommand)]
    pub command: Command,
}

/// Output formats of the `convert` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// sml notation.
    Sml,
    /// XML; tag segments map to element, id and class.
    Xml,
    /// The document tree as JSON.
    Json,
    /// The document tree as YAML.
    Yaml,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a document and print it in another format.
    Convert {
        /// The document to convert.
        #[arg(required = true)]
        file: PathBuf,
        #[arg(short, long, value_enum, default_value_t = Format::Sml)]
        format: Format,
        /// One node per line, indented by depth.
        #[arg(short, long)]
        pretty: bool,
        /// Indentation unit for pretty output.
        #[arg(long, default_value = "    ")]
        indent: String,
        /// Element wrapping raw nodes in XML output.
        #[arg(long, default_value = "pre")]
        raw_tag: String,
    },
    /// Check a document, or every `.sml` file below a directory.
    Check {
        #[arg(required = true)]
        path: PathBuf,
    },
    /// Print the path/value pairs of a document.
    Values {
        #[arg(required = true)]
        file: PathBuf,
    },
}
