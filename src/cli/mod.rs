//! The sml command-line interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use crate::builder::PathValueBuilder;
use crate::cli::args::{Command, Format, SmlArgs};
use crate::cli::diagnostics::DocumentDiagnostic;
use crate::logging::{init_logging, LoggingConfig};
use crate::syntax::parser::{parse_str_with, read_document, ParseOptions, DEFAULT_MAX_DEPTH};
use crate::writer::{write_document, NativeProcessor, WriterContext, XmlProcessor};
use crate::{SmlError, TagNode};
use clap::Parser;
use miette::{miette, IntoDiagnostic, Report};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::{fs, process};
use walkdir::WalkDir;

/// Deepest tree the recursive serde serializers are handed.
const SERIALIZE_DEPTH_LIMIT: usize = DEFAULT_MAX_DEPTH;

pub mod args;
pub mod diagnostics;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = SmlArgs::parse();
    init_logging(LoggingConfig::verbose(args.verbose));
    let options = ParseOptions::default().with_max_depth(args.max_depth);

    let result = match args.command {
        Command::Convert {
            file,
            format,
            pretty,
            indent,
            raw_tag,
        } => handle_convert(&file, options, format, pretty, &indent, &raw_tag),
        Command::Check { path } => handle_check(&path, options),
        Command::Values { file } => handle_values(&file, options),
    };

    if let Err(report) = result {
        output::print_report(&report);
        process::exit(1);
    }
}

/// Reads and parses `path`, attaching the source text to any parse error.
fn load_document(path: &Path, options: ParseOptions) -> miette::Result<TagNode> {
    let text = read_source(path)?;
    match parse_str_with(&text, options) {
        Ok(root) => Ok(root),
        Err(error) => Err(Report::new(DocumentDiagnostic::new(
            error,
            path.display().to_string(),
            text,
        ))),
    }
}

fn read_source(path: &Path) -> miette::Result<String> {
    log::debug!("reading {}", path.display());
    fs::read_to_string(path)
        .map_err(SmlError::from)
        .map_err(|e| Report::new(e).wrap_err(format!("cannot read {}", path.display())))
}

/// Handles the `convert` subcommand.
fn handle_convert(
    path: &Path,
    options: ParseOptions,
    format: Format,
    pretty: bool,
    indent: &str,
    raw_tag: &str,
) -> miette::Result<()> {
    let root = load_document(path, options)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        Format::Sml | Format::Xml => {
            let mut ctx = if format == Format::Sml {
                WriterContext::new(NativeProcessor::new(), &mut out, pretty, indent)
            } else {
                WriterContext::new(XmlProcessor::new(raw_tag), &mut out, pretty, indent)
            };
            write_document(&root, &mut ctx)?;
            if !pretty {
                writeln!(out).into_diagnostic()?;
            }
        }
        Format::Json | Format::Yaml if root.depth() > SERIALIZE_DEPTH_LIMIT => {
            return Err(miette!(
                "document nests {} tag nodes deep; json and yaml output support at most {}",
                root.depth(),
                SERIALIZE_DEPTH_LIMIT
            ));
        }
        Format::Json => {
            let json = if pretty {
                serde_json::to_string_pretty(&root)
            } else {
                serde_json::to_string(&root)
            };
            writeln!(out, "{}", json.into_diagnostic()?).into_diagnostic()?;
        }
        Format::Yaml => {
            let yaml = serde_yaml::to_string(&root).into_diagnostic()?;
            write!(out, "{yaml}").into_diagnostic()?;
        }
    }
    Ok(())
}

/// Handles the `check` subcommand.
fn handle_check(path: &Path, options: ParseOptions) -> miette::Result<()> {
    let files = collect_documents(path)?;
    let mut failed = 0;
    for file in &files {
        match load_document(file, options) {
            Ok(_) => output::print_status(file, true),
            Err(report) => {
                failed += 1;
                output::print_status(file, false);
                output::print_report(&report);
            }
        }
    }
    if failed > 0 {
        return Err(miette!("{failed} of {} documents failed", files.len()));
    }
    Ok(())
}

/// `path` itself if it is a file, otherwise every `.sml` file below it.
fn collect_documents(path: &Path) -> miette::Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.into_diagnostic()?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "sml")
        {
            files.push(entry.into_path());
        }
    }
    log::debug!("found {} documents below {}", files.len(), path.display());
    Ok(files)
}

/// Handles the `values` subcommand.
fn handle_values(path: &Path, options: ParseOptions) -> miette::Result<()> {
    let text = read_source(path)?;
    let mut builder = PathValueBuilder::new();
    if let Err(error) = read_document(text.chars(), &mut builder, options) {
        return Err(Report::new(DocumentDiagnostic::new(
            error,
            path.display().to_string(),
            text,
        )));
    }
    let values = builder.finish()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (path, value) in values.iter() {
        if let Some(value) = value {
            writeln!(out, "{} = {value}", path.join("/")).into_diagnostic()?;
        }
    }
    Ok(())
}
